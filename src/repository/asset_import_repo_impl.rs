// ==========================================
// 资产盘点系统 - 资产导入 Repository 实现
// ==========================================
// 职责: 实现导入相关数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{AssetRecord, CampusId, ImportBatch, RoomKey, RoomRef};
use crate::repository::asset_import_repo::AssetImportRepository;
use crate::repository::error::{BulkInsertError, RepositoryError, RepositoryResult, WriteError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};
use uuid::Uuid;

/// 单条 SQL 中 IN 列表的最大元素数（远低于 SQLITE_MAX_VARIABLE_NUMBER）
const IN_CLAUSE_CHUNK: usize = 500;

// ==========================================
// AssetImportRepositoryImpl
// ==========================================
pub struct AssetImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl AssetImportRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（共享连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在一个事务内逐条插入；约束违反只回滚该语句
    ///
    /// 非约束错误或事务已被 SQLite 整体回滚时立即中止，整批按 TotalFailure 返回
    fn bulk_insert_tx(
        conn: &Connection,
        records: &[AssetRecord],
    ) -> Result<usize, BulkInsertError> {
        let tx = conn
            .unchecked_transaction()
            .map_err(BulkInsertError::total)?;

        let mut write_errors = Vec::new();
        let mut inserted = 0;
        {
            let mut stmt = tx
                .prepare(
                    r#"
                    INSERT INTO asset (
                        asset_id, tag, name, room_id, campus_id, value,
                        responsible_name, responsible_id, idle, import_batch_id, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                    "#,
                )
                .map_err(BulkInsertError::total)?;

            for (index, record) in records.iter().enumerate() {
                let result = stmt.execute(params![
                    record.asset_id,
                    record.tag,
                    record.name,
                    record.room_id,
                    record.campus_id.as_str(),
                    record.value.to_string(),
                    record.responsible_name,
                    record.responsible_id,
                    record.idle as i32,
                    record.import_batch_id,
                    record.created_at,
                ]);

                match result {
                    Ok(_) => inserted += 1,
                    Err(e) if !is_constraint_violation(&e) || tx.is_autocommit() => {
                        warn!(index, tag = ?record.tag, error = %e, "资产写入中止，事务已回滚");
                        return Err(BulkInsertError::total(e));
                    }
                    Err(e) => {
                        let message = RepositoryError::from(e).to_string();
                        debug!(index, tag = ?record.tag, error = %message, "资产写入被拒绝");
                        write_errors.push(WriteError {
                            index,
                            tag: record.tag.clone(),
                            message,
                        });
                    }
                }
            }
        }

        tx.commit().map_err(BulkInsertError::total)?;

        if write_errors.is_empty() {
            Ok(inserted)
        } else {
            Err(BulkInsertError::PartialFailure { write_errors })
        }
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl AssetImportRepository for AssetImportRepositoryImpl {
    async fn find_rooms_by_combinations(
        &self,
        keys: &[RoomKey],
        campus_id: &CampusId,
    ) -> RepositoryResult<Vec<RoomRef>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.lock()?;
        let mut rooms = Vec::new();

        for chunk in keys.chunks(IN_CLAUSE_CHUNK) {
            let values = vec!["(?, ?)"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT room_id, name, block, created_at FROM room \
                 WHERE campus_id = ? AND (name, block) IN (VALUES {})",
                values
            );

            let mut bind: Vec<&str> = Vec::with_capacity(chunk.len() * 2 + 1);
            bind.push(campus_id.as_str());
            for key in chunk {
                bind.push(key.name.as_str());
                bind.push(key.block.as_str());
            }

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(bind.iter()), |row| {
                Ok(RoomRef {
                    room_id: row.get(0)?,
                    campus_id: campus_id.clone(),
                    name: row.get(1)?,
                    block: row.get(2)?,
                    created_at: row.get::<_, DateTime<Utc>>(3)?,
                })
            })?;

            for room in rows {
                rooms.push(room?);
            }
        }

        Ok(rooms)
    }

    async fn create_room(&self, key: &RoomKey, campus_id: &CampusId) -> RepositoryResult<RoomRef> {
        let room = RoomRef {
            room_id: Uuid::new_v4().to_string(),
            campus_id: campus_id.clone(),
            name: key.name.clone(),
            block: key.block.clone(),
            created_at: Utc::now(),
        };

        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO room (room_id, campus_id, name, block, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                room.room_id,
                room.campus_id.as_str(),
                room.name,
                room.block,
                room.created_at,
            ],
        )?;

        Ok(room)
    }

    async fn find_existing_tags(&self, tags: &[String]) -> RepositoryResult<Vec<String>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.lock()?;
        let mut existing = Vec::new();

        for chunk in tags.chunks(IN_CLAUSE_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!("SELECT tag FROM asset WHERE tag IN ({})", placeholders);

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                row.get::<_, String>(0)
            })?;
            for tag in rows {
                existing.push(tag?);
            }
        }

        Ok(existing)
    }

    async fn bulk_insert_assets(&self, records: &[AssetRecord]) -> Result<usize, BulkInsertError> {
        if records.is_empty() {
            return Ok(0);
        }

        let conn = self.lock().map_err(BulkInsertError::total)?;
        let result = Self::bulk_insert_tx(&conn, records);
        if let Err(BulkInsertError::TotalFailure { cause }) = &result {
            warn!(records = records.len(), cause = %cause, "批量插入整体失败");
        }
        result
    }

    async fn count_assets(&self, campus_id: Option<&CampusId>) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 = match campus_id {
            Some(campus) => conn.query_row(
                "SELECT COUNT(*) FROM asset WHERE campus_id = ?1",
                params![campus.as_str()],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM asset", [], |row| row.get(0))?,
        };
        Ok(count as usize)
    }

    async fn count_rooms(&self, campus_id: &CampusId) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM room WHERE campus_id = ?1",
            params![campus_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    async fn insert_batch(&self, batch: &ImportBatch) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, campus_id, file_name, processed, inserted, skipped,
                failed, error_count, errors_json, elapsed_ms, imported_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                batch.batch_id,
                batch.campus_id,
                batch.file_name,
                batch.processed,
                batch.inserted,
                batch.skipped,
                batch.failed,
                batch.error_count,
                batch.errors_json,
                batch.elapsed_ms,
                batch.imported_at,
            ],
        )?;
        Ok(())
    }

    async fn get_recent_batches(&self, limit: usize) -> RepositoryResult<Vec<ImportBatch>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, campus_id, file_name, processed, inserted, skipped,
                   failed, error_count, errors_json, elapsed_ms, imported_at
            FROM import_batch
            ORDER BY imported_at DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(ImportBatch {
                batch_id: row.get(0)?,
                campus_id: row.get(1)?,
                file_name: row.get(2)?,
                processed: row.get(3)?,
                inserted: row.get(4)?,
                skipped: row.get(5)?,
                failed: row.get(6)?,
                error_count: row.get(7)?,
                errors_json: row.get(8)?,
                elapsed_ms: row.get(9)?,
                imported_at: row.get(10)?,
            })
        })?;

        let mut batches = Vec::new();
        for batch in rows {
            batches.push(batch?);
        }
        Ok(batches)
    }
}
