// ==========================================
// 资产盘点系统 - 资产导入器实现
// ==========================================
// 职责: 编排导入流程，从字节缓冲到数据库，产出 ImportSummary
// 流程: 分词 → 映射/规范化 → 房间解析 → 查重 → 分批插入 → 汇总 → 台账
// 约束: 只有前置条件/配置错误使整次导入失败；其余失败进入错误列表
// ==========================================

use crate::config::{ImportConfigReader, ImportSettings};
use crate::domain::{
    describe_tag, ErrorEntry, ImportBatch, ImportErrorType, ImportOutcome, ImportSummary,
};
use crate::importer::asset_importer_trait::{
    AssetImporter, FieldMapper, FieldNormalizer, FileParser, ImportRequest,
};
use crate::importer::batch_inserter::BatchInserter;
use crate::importer::conflict_handler::ConflictHandler;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldLayout;
use crate::importer::file_parser::{decode_content, DelimitedParser};
use crate::importer::import_stage::{ImportStage, StageTracker};
use crate::importer::room_resolver::RoomResolver;
use crate::repository::AssetImportRepository;
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn, Span};
use uuid::Uuid;

// ==========================================
// AssetImporterImpl - 资产导入器实现
// ==========================================
pub struct AssetImporterImpl<R, C>
where
    R: AssetImportRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    import_repo: R,

    // 配置读取器
    config: C,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    normalizer: Box<dyn FieldNormalizer>,
    room_resolver: RoomResolver,
    conflict_handler: ConflictHandler,
}

impl<R, C> AssetImporterImpl<R, C>
where
    R: AssetImportRepository,
    C: ImportConfigReader,
{
    /// 使用默认组件创建导入器（旧系统导出格式）
    pub fn new(import_repo: R, config: C) -> Self {
        Self::with_components(
            import_repo,
            config,
            Box::new(DelimitedParser),
            Box::new(FieldLayout::LEGACY),
            Box::new(DataCleaner),
        )
    }

    /// 指定分词/映射/规范化组件创建导入器
    pub fn with_components(
        import_repo: R,
        config: C,
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
        normalizer: Box<dyn FieldNormalizer>,
    ) -> Self {
        Self {
            import_repo,
            config,
            file_parser,
            field_mapper,
            normalizer,
            room_resolver: RoomResolver,
            conflict_handler: ConflictHandler,
        }
    }

    pub fn repository(&self) -> &R {
        &self.import_repo
    }
}

#[async_trait::async_trait]
impl<R, C> AssetImporter for AssetImporterImpl<R, C>
where
    R: AssetImportRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, request), fields(batch_id, campus_id, file_name = ?request.file_name))]
    async fn import_assets(&self, request: ImportRequest) -> ImportResult<ImportOutcome> {
        let start_time = Instant::now();
        let mut stage = StageTracker::default();

        // === 前置条件: 校区标识 ===
        let campus_id = request.campus_id.ok_or(ImportError::MissingCampusId)?;
        let batch_id = Uuid::new_v4().to_string();
        Span::current().record("batch_id", batch_id.as_str());
        Span::current().record("campus_id", campus_id.as_str());

        // 配置只在开始时读取一次
        let settings = ImportSettings::load(&self.config).await?;
        info!(bytes = request.content.len(), "开始导入资产数据");

        let mut summary = ImportSummary::default();
        let mut failed_records = 0usize;

        // === 步骤 1: 分词 ===
        stage.advance(ImportStage::Tokenizing);
        let content = decode_content(&request.content);
        let raw_records = self
            .file_parser
            .parse_records(&content, settings.field_separator);

        // === 步骤 2: 字段映射与规范化（逐条） ===
        stage.advance(ImportStage::Normalizing);
        let mut assets = Vec::new();
        for raw in raw_records {
            let mapped = self.field_mapper.map_record(&raw);
            match self.normalizer.normalize(&mapped, &campus_id, &settings) {
                Ok(Some(asset)) => {
                    summary.total_records_processed += 1;
                    assets.push(asset);
                }
                Ok(None) => {}
                Err(e) => {
                    summary.total_records_processed += 1;
                    failed_records += 1;
                    warn!(line = raw.line, error = %e, "记录校验失败");
                    let tag = mapped.tag.trim();
                    summary.errors.push(ErrorEntry::at_line(
                        ImportErrorType::Validation,
                        format!("{}: {}", describe_tag(Some(tag)), e),
                        raw.line,
                    ));
                }
            }
        }
        info!(
            records = summary.total_records_processed,
            valid = assets.len(),
            invalid = failed_records,
            "记录规范化完成"
        );

        // === 步骤 3: 房间解析 ===
        stage.advance(ImportStage::ResolvingRooms);
        let resolution = self
            .room_resolver
            .resolve(&self.import_repo, assets, &campus_id, &batch_id)
            .await;
        let rooms_created = resolution.rooms_created;
        failed_records += resolution.failed();
        summary.total_records_skipped += resolution.skipped;
        summary.errors.extend(resolution.errors);
        info!(
            rooms_created,
            bound = resolution.records.len(),
            skipped = resolution.skipped,
            "房间解析完成"
        );

        // === 步骤 4: 标签查重 ===
        stage.advance(ImportStage::Deduplicating);
        let records = resolution.records;
        let to_insert = match self
            .conflict_handler
            .find_existing(&self.import_repo, &records)
            .await
        {
            Ok(existing) => {
                let outcome = self.conflict_handler.split_existing(records, &existing);
                summary.total_records_skipped += outcome.skipped;
                info!(duplicates = outcome.skipped, "标签查重完成");
                outcome.fresh
            }
            Err(e) => {
                // 未查重的记录不插入
                error!(error = %e, "标签批量查重失败");
                failed_records += records.len();
                summary.errors.extend(records.iter().map(|r| {
                    ErrorEntry::at_line(
                        ImportErrorType::DuplicateCheckFailed,
                        format!("{}: 查重失败: {}", describe_tag(r.tag.as_deref()), e),
                        r.line,
                    )
                }));
                Vec::new()
            }
        };

        // === 步骤 5: 分批插入 ===
        stage.advance(ImportStage::Inserting);
        let inserted = BatchInserter::new(settings.insert_batch_size)
            .insert_all(&self.import_repo, &to_insert)
            .await;
        summary.total_records_inserted = inserted.inserted;
        failed_records += inserted.failed;
        summary.errors.extend(inserted.errors);
        info!(
            inserted = inserted.inserted,
            failed = inserted.failed,
            "资产插入完成"
        );

        // === 步骤 6: 汇总 ===
        stage.advance(ImportStage::Summarizing);
        debug_assert_eq!(
            summary.total_records_processed,
            summary.total_records_inserted + summary.total_records_skipped + failed_records
        );
        let elapsed_time = start_time.elapsed();

        // 台账写入失败不影响汇总结果
        let batch = ImportBatch {
            batch_id: batch_id.clone(),
            campus_id: campus_id.to_string(),
            file_name: request.file_name.clone(),
            processed: summary.total_records_processed as i64,
            inserted: summary.total_records_inserted as i64,
            skipped: summary.total_records_skipped as i64,
            failed: failed_records as i64,
            error_count: summary.errors.len() as i64,
            errors_json: serde_json::to_string(&summary.errors).ok(),
            elapsed_ms: elapsed_time.as_millis() as i64,
            imported_at: Utc::now(),
        };
        if let Err(e) = self.import_repo.insert_batch(&batch).await {
            warn!(error = %e, "导入批次台账写入失败");
        }

        stage.advance(ImportStage::Done);
        info!(
            processed = summary.total_records_processed,
            inserted = summary.total_records_inserted,
            skipped = summary.total_records_skipped,
            failed = failed_records,
            errors = summary.errors.len(),
            elapsed_ms = elapsed_time.as_millis() as u64,
            "资产数据导入完成"
        );

        Ok(ImportOutcome {
            batch_id,
            summary,
            rooms_created,
            elapsed_time,
        })
    }

    async fn batch_import(&self, requests: Vec<ImportRequest>) -> Vec<ImportResult<ImportOutcome>> {
        use futures::future::join_all;

        info!(count = requests.len(), "开始批量导入文件");

        let import_tasks = requests.into_iter().enumerate().map(|(idx, request)| {
            let file = request
                .file_name
                .clone()
                .unwrap_or_else(|| format!("#{}", idx + 1));
            async move {
                debug!(file = %file, "开始导入文件");
                let result = self.import_assets(request).await;
                match &result {
                    Ok(outcome) => info!(
                        file = %file,
                        inserted = outcome.summary.total_records_inserted,
                        "文件导入完成"
                    ),
                    Err(e) => error!(file = %file, error = %e, "文件导入失败"),
                }
                result
            }
        });

        // 并发执行所有导入任务
        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}
