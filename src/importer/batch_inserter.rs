// ==========================================
// 资产盘点系统 - 批量插入器
// ==========================================
// 职责: 按 insert_batch_size 分批无序插入，区分逐条失败与整批失败
// - PartialFailure: 仅列出的记录失败，未列出的视为已插入
// - TotalFailure: 当前分批全部失败，其余分批不受影响
// ==========================================

use crate::domain::{describe_tag, AssetRecord, ErrorEntry, ImportErrorType};
use crate::repository::{AssetImportRepository, BulkInsertError};
use std::collections::BTreeMap;
use tracing::{debug, error, warn};

/// 插入结果
#[derive(Debug, Default)]
pub struct InsertOutcome {
    pub inserted: usize,
    pub failed: usize,
    pub errors: Vec<ErrorEntry>,
}

pub struct BatchInserter {
    batch_size: usize,
}

impl BatchInserter {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub async fn insert_all<R: AssetImportRepository + ?Sized>(
        &self,
        repo: &R,
        records: &[AssetRecord],
    ) -> InsertOutcome {
        let mut outcome = InsertOutcome::default();

        for (chunk_no, chunk) in records.chunks(self.batch_size).enumerate() {
            match repo.bulk_insert_assets(chunk).await {
                Ok(count) => {
                    debug!(chunk = chunk_no, count, "分批插入完成");
                    debug_assert_eq!(count, chunk.len());
                    outcome.inserted += chunk.len();
                }
                Err(BulkInsertError::PartialFailure { write_errors }) => {
                    // 同一记录可能被多次提及，按下标去重
                    let mut failed: BTreeMap<usize, String> = BTreeMap::new();
                    for we in write_errors {
                        if we.index >= chunk.len() {
                            warn!(chunk = chunk_no, index = we.index, "写入错误下标越界，已忽略");
                            continue;
                        }
                        failed.entry(we.index).or_insert(we.message);
                    }

                    warn!(chunk = chunk_no, failed = failed.len(), "分批插入部分失败");
                    outcome.inserted += chunk.len() - failed.len();
                    outcome.failed += failed.len();
                    for (index, message) in failed {
                        let record = &chunk[index];
                        outcome.errors.push(ErrorEntry::at_line(
                            ImportErrorType::WriteError,
                            format!("{}: {}", describe_tag(record.tag.as_deref()), message),
                            record.line,
                        ));
                    }
                }
                Err(BulkInsertError::TotalFailure { cause }) => {
                    error!(
                        chunk = chunk_no,
                        size = chunk.len(),
                        cause = %cause,
                        "分批插入整体失败"
                    );
                    outcome.failed += chunk.len();
                    outcome.errors.extend(chunk.iter().map(|record| {
                        ErrorEntry::at_line(
                            ImportErrorType::InsertFailed,
                            format!(
                                "{}: 批量插入失败: {}",
                                describe_tag(record.tag.as_deref()),
                                cause
                            ),
                            record.line,
                        )
                    }));
                }
            }
        }

        outcome
    }
}
