// ==========================================
// 资产盘点系统 - 配置管理器
// ==========================================
// 职责: 导入配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::{
    separator_byte, ImportConfigReader, DEFAULT_DATA_ROW_MARKER, DEFAULT_FIELD_SEPARATOR,
    DEFAULT_IDLE_MARKER, DEFAULT_INSERT_BATCH_SIZE, DEFAULT_MAX_DISPLAY_ERRORS,
};
use crate::db::open_sqlite_connection;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.lock()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式，按键排序）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 读取配置值，读取失败映射为 ConfigReadError
    fn read(&self, key: &str) -> ImportResult<Option<String>> {
        self.get_global_config_value(key)
            .map_err(|e| ImportError::ConfigReadError {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    /// 读取并解析数值配置；缺失取默认值，格式错误为致命错误
    fn read_parsed<T: FromStr>(&self, key: &str, default: T) -> ImportResult<T>
    where
        T::Err: std::fmt::Display,
    {
        match self.read(key)? {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ImportError::ConfigValueError {
                    key: key.to_string(),
                    value: raw.clone(),
                    message: e.to_string(),
                }),
        }
    }

    /// 读取非空字符串配置
    fn read_non_empty(&self, key: &str, default: &str) -> ImportResult<String> {
        match self.read(key)? {
            None => Ok(default.to_string()),
            Some(raw) if raw.trim().is_empty() => Err(ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw,
                message: "配置值不能为空".to_string(),
            }),
            Some(raw) => Ok(raw.trim().to_string()),
        }
    }
}

// ==========================================
// ImportConfigReader 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_field_separator(&self) -> ImportResult<char> {
        let Some(raw) = self.read(config_keys::FIELD_SEPARATOR)? else {
            return Ok(DEFAULT_FIELD_SEPARATOR);
        };

        // 分隔符不做 trim：制表符等空白字符也是合法分隔符
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                separator_byte(c)?;
                Ok(c)
            }
            _ => Err(ImportError::ConfigValueError {
                key: config_keys::FIELD_SEPARATOR.to_string(),
                value: raw,
                message: "分隔符必须为单个字符".to_string(),
            }),
        }
    }

    async fn get_data_row_marker(&self) -> ImportResult<String> {
        self.read_non_empty(config_keys::DATA_ROW_MARKER, DEFAULT_DATA_ROW_MARKER)
    }

    async fn get_idle_marker(&self) -> ImportResult<String> {
        self.read_non_empty(config_keys::IDLE_MARKER, DEFAULT_IDLE_MARKER)
    }

    async fn get_insert_batch_size(&self) -> ImportResult<usize> {
        let size = self.read_parsed(config_keys::INSERT_BATCH_SIZE, DEFAULT_INSERT_BATCH_SIZE)?;
        if size == 0 {
            return Err(ImportError::ConfigValueError {
                key: config_keys::INSERT_BATCH_SIZE.to_string(),
                value: "0".to_string(),
                message: "批量插入记录数必须 >= 1".to_string(),
            });
        }
        Ok(size)
    }

    async fn get_max_display_errors(&self) -> ImportResult<usize> {
        self.read_parsed(config_keys::MAX_DISPLAY_ERRORS, DEFAULT_MAX_DISPLAY_ERRORS)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 文件格式
    pub const FIELD_SEPARATOR: &str = "import.field_separator";
    pub const DATA_ROW_MARKER: &str = "import.data_row_marker";

    // 字段规范化
    pub const IDLE_MARKER: &str = "import.idle_marker";

    // 写入
    pub const INSERT_BATCH_SIZE: &str = "import.insert_batch_size";

    // 结果展示
    pub const MAX_DISPLAY_ERRORS: &str = "import.max_display_errors";
}
