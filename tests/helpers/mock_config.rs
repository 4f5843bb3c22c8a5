// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use asset_inventory::config::{ImportConfigReader, ImportSettings};
use asset_inventory::importer::ImportResult;
use async_trait::async_trait;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub separator: char,
    pub data_row_marker: String,
    pub idle_marker: String,
    pub insert_batch_size: usize,
    pub max_display_errors: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        let defaults = ImportSettings::default();
        Self {
            separator: defaults.field_separator as char,
            data_row_marker: defaults.data_row_marker,
            idle_marker: defaults.idle_marker,
            insert_batch_size: defaults.insert_batch_size,
            max_display_errors: defaults.max_display_errors,
        }
    }
}

impl MockConfig {
    /// 指定分批大小
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            insert_batch_size: batch_size,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_field_separator(&self) -> ImportResult<char> {
        Ok(self.separator)
    }

    async fn get_data_row_marker(&self) -> ImportResult<String> {
        Ok(self.data_row_marker.clone())
    }

    async fn get_idle_marker(&self) -> ImportResult<String> {
        Ok(self.idle_marker.clone())
    }

    async fn get_insert_batch_size(&self) -> ImportResult<usize> {
        Ok(self.insert_batch_size)
    }

    async fn get_max_display_errors(&self) -> ImportResult<usize> {
        Ok(self.max_display_errors)
    }
}
