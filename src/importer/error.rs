// ==========================================
// 资产盘点系统 - 导入模块错误类型
// ==========================================
// ImportError: 使整次导入失败的错误（前置条件/配置）
// RecordError: 单条记录校验失败，只进入错误列表
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::InvalidCampusId;
use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 前置条件错误 =====
    #[error("缺少校区标识，导入未执行")]
    MissingCampusId,

    #[error(transparent)]
    InvalidCampusId(#[from] InvalidCampusId),

    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 数据库错误 =====
    #[error("数据库错误: {0}")]
    Repository(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::Repository(RepositoryError::from(err))
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

/// 单条记录校验错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("字段 {field} 缺失")]
    MissingValue { field: &'static str },

    #[error("字段 {field} 无法解析为整数: '{value}'")]
    InvalidValue { field: &'static str, value: String },

    #[error("字段 {field} 不能为负数: {value}")]
    NegativeValue { field: &'static str, value: String },
}
