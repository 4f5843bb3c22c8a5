// ==========================================
// 资产盘点系统 - 核心库
// ==========================================
// 核心: 资产批量导入管道
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 旧系统导出文件
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AssetRecord, CampusId, ErrorEntry, ImportBatch, ImportErrorType, ImportOutcome, ImportSummary,
    NormalizedAsset, RoomKey, RoomRef,
};

// 导入器
pub use importer::{AssetImporter, AssetImporterImpl, ImportError, ImportRequest};

// API
pub use api::{ImportApi, ImportApiResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "资产盘点系统";
