// ==========================================
// 资产盘点系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use crate::api::{ApiError, ApiResult, ImportApi};
use crate::db::{init_schema, open_sqlite_connection, read_schema_version};
use std::path::PathBuf;
use std::sync::Arc;

/// 显式指定数据库路径的环境变量
pub const DB_PATH_ENV: &str = "ASSET_INVENTORY_DB_PATH";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 资产导入API
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 创建新的AppState实例（幂等建表）
    pub fn new(db_path: String) -> ApiResult<Self> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(format!("无法打开数据库: {}", e)))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        let version =
            read_schema_version(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        tracing::debug!(schema_version = ?version, "数据库 schema 就绪");

        Ok(Self {
            import_api: Arc::new(ImportApi::new(db_path.clone())),
            db_path,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 ASSET_INVENTORY_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./asset_inventory.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("asset-inventory");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("asset_inventory.db");
        }
    }

    path.to_string_lossy().to_string()
}
