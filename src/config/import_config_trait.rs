// ==========================================
// 资产盘点系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;

/// 默认字段分隔符
pub const DEFAULT_FIELD_SEPARATOR: char = '|';

/// 默认数据行标记（记录类型字段）
pub const DEFAULT_DATA_ROW_MARKER: &str = "2";

/// 默认闲置标记（位置字段中出现即视为已收回）
pub const DEFAULT_IDLE_MARKER: &str = "RECOLHIDO";

/// 默认单次批量插入记录数
pub const DEFAULT_INSERT_BATCH_SIZE: usize = 1000;

/// 默认对外展示的错误条目上限
pub const DEFAULT_MAX_DISPLAY_ERRORS: usize = 100;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取字段分隔符
    ///
    /// # 默认值
    /// - '|'
    ///
    /// # 约束
    /// - 必须为单个 ASCII 字符，且不能是换行符
    async fn get_field_separator(&self) -> ImportResult<char>;

    /// 获取数据行标记（第一个字段等于此值的行才是数据行）
    ///
    /// # 默认值
    /// - "2"
    async fn get_data_row_marker(&self) -> ImportResult<String>;

    /// 获取闲置标记短语（区分大小写）
    ///
    /// # 默认值
    /// - "RECOLHIDO"
    async fn get_idle_marker(&self) -> ImportResult<String>;

    /// 获取单次批量插入的记录数
    ///
    /// # 默认值
    /// - 1000（必须 >= 1）
    async fn get_insert_batch_size(&self) -> ImportResult<usize>;

    /// 获取对外展示的错误条目上限（仅调用方截断使用）
    ///
    /// # 默认值
    /// - 100
    async fn get_max_display_errors(&self) -> ImportResult<usize>;
}

// ==========================================
// ImportSettings - 单次导入的配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub field_separator: u8,
    pub data_row_marker: String,
    pub idle_marker: String,
    pub insert_batch_size: usize,
    pub max_display_errors: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            field_separator: DEFAULT_FIELD_SEPARATOR as u8,
            data_row_marker: DEFAULT_DATA_ROW_MARKER.to_string(),
            idle_marker: DEFAULT_IDLE_MARKER.to_string(),
            insert_batch_size: DEFAULT_INSERT_BATCH_SIZE,
            max_display_errors: DEFAULT_MAX_DISPLAY_ERRORS,
        }
    }
}

impl ImportSettings {
    /// 从配置读取器加载（导入开始时读取一次）
    pub async fn load<C: ImportConfigReader + ?Sized>(reader: &C) -> ImportResult<Self> {
        let separator = reader.get_field_separator().await?;
        let field_separator = separator_byte(separator)?;

        let insert_batch_size = reader.get_insert_batch_size().await?;
        if insert_batch_size == 0 {
            return Err(ImportError::ConfigValueError {
                key: "import.insert_batch_size".to_string(),
                value: "0".to_string(),
                message: "批量插入记录数必须 >= 1".to_string(),
            });
        }

        Ok(Self {
            field_separator,
            data_row_marker: reader.get_data_row_marker().await?,
            idle_marker: reader.get_idle_marker().await?,
            insert_batch_size,
            max_display_errors: reader.get_max_display_errors().await?,
        })
    }
}

/// 校验分隔符并转换为字节
pub fn separator_byte(separator: char) -> ImportResult<u8> {
    if !separator.is_ascii() || separator == '\n' || separator == '\r' {
        return Err(ImportError::ConfigValueError {
            key: "import.field_separator".to_string(),
            value: separator.to_string(),
            message: "分隔符必须为单个 ASCII 字符且不能是换行符".to_string(),
        });
    }
    Ok(separator as u8)
}
