// ==========================================
// 资产盘点系统 - 导入结果领域模型
// ==========================================
// ImportSummary 为导入管道对外唯一输出
// 不变量: processed == inserted + skipped + failed
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ==========================================
// ImportErrorType - 错误条目类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportErrorType {
    Validation,           // 单条记录校验失败（如金额非数字）
    RoomLookupFailed,     // 房间批量查询失败
    RoomCreationFailed,   // 房间创建失败（相关记录计入跳过）
    DuplicateCheckFailed, // 标签批量查重失败
    WriteError,           // 批量插入中的逐条写入错误
    InsertFailed,         // 批量插入整体失败
}

impl fmt::Display for ImportErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImportErrorType::Validation => "VALIDATION",
            ImportErrorType::RoomLookupFailed => "ROOM_LOOKUP_FAILED",
            ImportErrorType::RoomCreationFailed => "ROOM_CREATION_FAILED",
            ImportErrorType::DuplicateCheckFailed => "DUPLICATE_CHECK_FAILED",
            ImportErrorType::WriteError => "WRITE_ERROR",
            ImportErrorType::InsertFailed => "INSERT_FAILED",
        };
        f.write_str(s)
    }
}

// ==========================================
// ErrorEntry - 错误条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    #[serde(rename = "type")]
    pub error_type: ImportErrorType,
    pub message: String,
    #[serde(rename = "linha", default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ErrorEntry {
    pub fn new(
        error_type: ImportErrorType,
        message: impl Into<String>,
        line: Option<usize>,
    ) -> Self {
        Self {
            error_type,
            message: message.into(),
            line,
        }
    }

    pub fn at_line(error_type: ImportErrorType, message: impl Into<String>, line: usize) -> Self {
        Self::new(error_type, message, Some(line))
    }
}

/// 错误消息中的标签描述
pub fn describe_tag(tag: Option<&str>) -> String {
    match tag {
        Some(t) if !t.trim().is_empty() => format!("标签 {}", t),
        _ => "无标签".to_string(),
    }
}

// ==========================================
// ImportSummary - 导入汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total_records_processed: usize,
    pub total_records_inserted: usize,
    pub total_records_skipped: usize,
    pub errors: Vec<ErrorEntry>,
}

impl ImportSummary {
    /// 失败记录数（未插入且未计入跳过）
    pub fn failed_records(&self) -> usize {
        self.total_records_processed
            .saturating_sub(self.total_records_inserted)
            .saturating_sub(self.total_records_skipped)
    }

    pub fn is_empty(&self) -> bool {
        self.total_records_processed == 0
    }
}

// ==========================================
// ImportOutcome - 单次导入返回值
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub batch_id: String,
    pub summary: ImportSummary,
    pub rooms_created: usize,
    pub elapsed_time: Duration,
}

// ==========================================
// ImportBatch - 导入批次台账
// ==========================================
// 对齐: import_batch 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,
    pub campus_id: String,
    pub file_name: Option<String>,
    pub processed: i64,
    pub inserted: i64,
    pub skipped: i64,
    pub failed: i64,
    pub error_count: i64,
    pub errors_json: Option<String>, // ErrorEntry 列表（JSON）
    pub elapsed_ms: i64,
    pub imported_at: DateTime<Utc>,
}
