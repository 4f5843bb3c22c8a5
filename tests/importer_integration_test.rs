// ==========================================
// AssetImporter 集成测试（SQLite）
// ==========================================
// 测试目标: 验证完整的资产导入流程与落库结果
// ==========================================


use asset_inventory::config::{config_keys, ConfigManager};
use asset_inventory::domain::ImportErrorType;
use asset_inventory::importer::{AssetImporter, AssetImporterImpl, ImportError, ImportRequest};
use asset_inventory::logging;
use asset_inventory::repository::{AssetImportRepository, AssetImportRepositoryImpl};
use test_helpers::{
    campus_a, campus_b, create_test_db, insert_test_config, open_db, sample_file,
    AssetFileBuilder,
};

/// 创建测试用的 AssetImporter 实例
fn create_test_importer(
    db_path: &str,
) -> AssetImporterImpl<AssetImportRepositoryImpl, ConfigManager> {
    let import_repo =
        AssetImportRepositoryImpl::new(db_path).expect("Failed to create AssetImportRepository");
    let config = ConfigManager::new(db_path).expect("Failed to create ConfigManager");
    AssetImporterImpl::new(import_repo, config)
}

#[tokio::test]
async fn test_import_sample_file() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let outcome = importer
        .import_assets(ImportRequest::new(sample_file(), campus_a()).with_file_name("bens.txt"))
        .await
        .unwrap();

    let summary = &outcome.summary;
    assert_eq!(summary.total_records_processed, 3);
    assert_eq!(summary.total_records_inserted, 3);
    assert_eq!(summary.total_records_skipped, 0);
    assert!(summary.errors.is_empty(), "unexpected errors: {:?}", summary.errors);
    assert_eq!(outcome.rooms_created, 2);

    let repo = importer.repository();
    assert_eq!(repo.count_assets(Some(&campus_a())).await.unwrap(), 3);
    assert_eq!(repo.count_rooms(&campus_a()).await.unwrap(), 2);

    // 金额、名称、闲置标记落库
    let conn = open_db(&db_path);
    let (name, value, idle): (String, String, i64) = conn
        .query_row(
            "SELECT name, value, idle FROM asset WHERE tag = '000101'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(name, "POLTRONA FIXA ESPALDAR BAIXO");
    assert_eq!(value, "400.00");
    assert_eq!(idle, 0);

    let idle: i64 = conn
        .query_row("SELECT idle FROM asset WHERE tag = '000103'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(idle, 1);

    // 资产携带批次ID
    let batch_ids: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM asset WHERE import_batch_id = ?1",
            [&outcome.batch_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(batch_ids, 3);
}

#[tokio::test]
async fn test_reimport_is_idempotent() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    importer
        .import_assets(ImportRequest::new(sample_file(), campus_a()))
        .await
        .unwrap();
    let second = importer
        .import_assets(ImportRequest::new(sample_file(), campus_a()))
        .await
        .unwrap();

    assert_eq!(second.summary.total_records_processed, 3);
    assert_eq!(second.summary.total_records_inserted, 0);
    assert_eq!(second.summary.total_records_skipped, 3);
    assert!(second.summary.errors.is_empty());
    assert_eq!(second.rooms_created, 0);
    assert_eq!(importer.repository().count_assets(None).await.unwrap(), 3);
}

#[tokio::test]
async fn test_empty_buffer_yields_zero_summary() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let outcome = importer
        .import_assets(ImportRequest::new(Vec::new(), campus_a()))
        .await
        .unwrap();

    assert!(outcome.summary.is_empty());
    assert_eq!(outcome.summary.total_records_inserted, 0);
    assert_eq!(outcome.summary.total_records_skipped, 0);
    assert!(outcome.summary.errors.is_empty());
}

#[tokio::test]
async fn test_missing_campus_fails_before_processing() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let request = ImportRequest {
        content: sample_file(),
        campus_id: None,
        file_name: None,
    };
    let result = importer.import_assets(request).await;

    assert!(matches!(result, Err(ImportError::MissingCampusId)));
    let repo = importer.repository();
    assert_eq!(repo.count_assets(None).await.unwrap(), 0);
    assert!(repo.get_recent_batches(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_failure_is_per_record() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let content = AssetFileBuilder::new()
        .header()
        .asset("000201", "CADEIRA", "SALA 1 (BLOCO A)", "1500")
        .asset("000202", "MESA", "SALA 1 (BLOCO A)", "12,50")
        .asset("000203", "ESTANTE", "SALA 1 (BLOCO A)", "")
        .trailer()
        .build();

    let outcome = importer
        .import_assets(ImportRequest::new(content, campus_a()))
        .await
        .unwrap();
    let summary = &outcome.summary;

    assert_eq!(summary.total_records_processed, 3);
    assert_eq!(summary.total_records_inserted, 1);
    assert_eq!(summary.errors.len(), 2);
    assert!(summary
        .errors
        .iter()
        .all(|e| e.error_type == ImportErrorType::Validation));
    assert_eq!(summary.errors[0].line, Some(3));
    assert!(summary.errors[0].message.contains("000202"));
    assert_eq!(summary.errors[1].line, Some(4));
}

#[tokio::test]
async fn test_blank_tags_are_never_duplicates() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let content = AssetFileBuilder::new()
        .asset("", "CADEIRA", "SALA 1", "100")
        .asset("  ", "CADEIRA", "SALA 1", "100")
        .build();

    for _ in 0..2 {
        let outcome = importer
            .import_assets(ImportRequest::new(content.clone(), campus_a()))
            .await
            .unwrap();
        assert_eq!(outcome.summary.total_records_inserted, 2);
        assert_eq!(outcome.summary.total_records_skipped, 0);
    }
    assert_eq!(importer.repository().count_assets(None).await.unwrap(), 4);
}

#[tokio::test]
async fn test_duplicate_tag_within_file_is_write_error() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let content = AssetFileBuilder::new()
        .asset("000301", "CADEIRA", "SALA 1", "100")
        .asset("000301", "CADEIRA", "SALA 1", "100")
        .build();

    let outcome = importer
        .import_assets(ImportRequest::new(content, campus_a()))
        .await
        .unwrap();

    assert_eq!(outcome.summary.total_records_processed, 2);
    assert_eq!(outcome.summary.total_records_inserted, 1);
    assert_eq!(outcome.summary.errors.len(), 1);
    let error = &outcome.summary.errors[0];
    assert_eq!(error.error_type, ImportErrorType::WriteError);
    assert!(error.message.contains("000301"));
    assert_eq!(error.line, Some(2));
}

#[tokio::test]
async fn test_rooms_are_scoped_by_campus() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let file_a = AssetFileBuilder::new()
        .asset("000401", "CADEIRA", "SALA 1 (BLOCO A)", "100")
        .build();
    let file_b = AssetFileBuilder::new()
        .asset("000402", "CADEIRA", "SALA 1 (BLOCO A)", "100")
        .build();

    let a = importer
        .import_assets(ImportRequest::new(file_a, campus_a()))
        .await
        .unwrap();
    let b = importer
        .import_assets(ImportRequest::new(file_b, campus_b()))
        .await
        .unwrap();

    assert_eq!(a.rooms_created, 1);
    assert_eq!(b.rooms_created, 1);
    assert_eq!(importer.repository().count_rooms(&campus_b()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_configured_separator_and_marker() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    insert_test_config(&db_path, config_keys::FIELD_SEPARATOR, ";");
    insert_test_config(&db_path, config_keys::IDLE_MARKER, "BAIXADO");
    let importer = create_test_importer(&db_path);

    let content = AssetFileBuilder::with_separator(';')
        .header()
        .asset("000501", "PROJETOR. EPSON", "SALA BAIXADO (BLOCO D)", "250000")
        .trailer()
        .build();

    let outcome = importer
        .import_assets(ImportRequest::new(content, campus_a()))
        .await
        .unwrap();
    assert_eq!(outcome.summary.total_records_inserted, 1);

    let idle: i64 = open_db(&db_path)
        .query_row("SELECT idle FROM asset WHERE tag = '000501'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(idle, 1);
}

#[tokio::test]
async fn test_invalid_config_is_fatal() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    insert_test_config(&db_path, config_keys::INSERT_BATCH_SIZE, "0");
    let importer = create_test_importer(&db_path);

    let result = importer
        .import_assets(ImportRequest::new(sample_file(), campus_a()))
        .await;
    assert!(matches!(result, Err(ImportError::ConfigValueError { .. })));
    assert_eq!(importer.repository().count_assets(None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_windows_1252_file() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    // "SALA REUNIÃO" 以 Windows-1252 编码
    let mut content = b"2|000601|CADEIRA|SALA REUNI".to_vec();
    content.push(0xC3);
    content.extend_from_slice(b"O (BLOCO A)|100|JOSE|1\n");

    let outcome = importer
        .import_assets(ImportRequest::new(content, campus_a()))
        .await
        .unwrap();
    assert_eq!(outcome.summary.total_records_inserted, 1);

    let room: String = open_db(&db_path)
        .query_row("SELECT name FROM room", [], |row| row.get(0))
        .unwrap();
    assert_eq!(room, "SALA REUNIÃO");
}

#[tokio::test]
async fn test_batch_ledger_is_written() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let outcome = importer
        .import_assets(ImportRequest::new(sample_file(), campus_a()).with_file_name("bens.txt"))
        .await
        .unwrap();

    let batches = importer.repository().get_recent_batches(5).await.unwrap();
    assert_eq!(batches.len(), 1);
    let batch = &batches[0];
    assert_eq!(batch.batch_id, outcome.batch_id);
    assert_eq!(batch.file_name.as_deref(), Some("bens.txt"));
    assert_eq!(batch.processed, 3);
    assert_eq!(batch.inserted, 3);
    assert_eq!(batch.failed, 0);
}

#[tokio::test]
async fn test_batch_import_runs_each_request_independently() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path);

    let file_a = AssetFileBuilder::new()
        .asset("000701", "CADEIRA", "SALA 1", "100")
        .build();
    let file_b = AssetFileBuilder::new()
        .asset("000702", "CADEIRA", "SALA 2", "100")
        .build();

    let results = importer
        .batch_import(vec![
            ImportRequest::new(file_a, campus_a()),
            ImportRequest {
                content: b"2|000799|MESA|SALA 9|100".to_vec(),
                campus_id: None,
                file_name: Some("sem-campus.txt".to_string()),
            },
            ImportRequest::new(file_b, campus_b()),
        ])
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().summary.total_records_inserted, 1);
    assert!(matches!(results[1], Err(ImportError::MissingCampusId)));
    assert_eq!(results[2].as_ref().unwrap().summary.total_records_inserted, 1);
    assert_eq!(importer.repository().count_assets(None).await.unwrap(), 2);
}
