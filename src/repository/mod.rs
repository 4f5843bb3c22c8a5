// ==========================================
// 资产盘点系统 - 数据仓储层
// ==========================================
// 职责: 数据访问,不含业务逻辑
// 红线: Repository 不含引擎逻辑
// ==========================================

pub mod asset_import_repo;
pub mod asset_import_repo_impl;
pub mod error;

// 重导出核心仓储
pub use asset_import_repo::AssetImportRepository;
pub use asset_import_repo_impl::AssetImportRepositoryImpl;
pub use error::{BulkInsertError, RepositoryError, RepositoryResult, WriteError};
