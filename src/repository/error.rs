// ==========================================
// 资产盘点系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    // ===== 数据质量错误 =====
    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::FieldValueError {
            field: "json".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// ==========================================
// 批量插入结果
// ==========================================

/// 批量插入中单条记录的写入错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteError {
    pub index: usize,        // 在本次提交切片中的下标
    pub tag: Option<String>, // 被拒记录的标签
    pub message: String,
}

/// 无序批量插入的失败形态
///
/// - PartialFailure: 仅列出的记录失败，其余记录已提交
/// - TotalFailure: 整个调用失败，本次提交的记录均未落库
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BulkInsertError {
    #[error("批量插入部分失败: {} 条记录被拒绝", write_errors.len())]
    PartialFailure { write_errors: Vec<WriteError> },

    #[error("批量插入整体失败: {cause}")]
    TotalFailure { cause: String },
}

impl BulkInsertError {
    pub fn total(cause: impl std::fmt::Display) -> Self {
        BulkInsertError::TotalFailure {
            cause: cause.to_string(),
        }
    }
}
