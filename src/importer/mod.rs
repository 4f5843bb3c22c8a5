// ==========================================
// 资产盘点系统 - 导入层
// ==========================================
// 职责: 旧系统导出文件 → 资产记录
// 流程: 分词 → 映射 → 规范化 → 房间解析 → 查重 → 分批插入
// ==========================================

// 模块声明
pub mod asset_importer_impl;
pub mod asset_importer_trait;
pub mod batch_inserter;
pub mod conflict_handler;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod import_stage;
pub mod room_resolver;

// 重导出核心类型
pub use asset_importer_impl::AssetImporterImpl;
pub use batch_inserter::{BatchInserter, InsertOutcome};
pub use conflict_handler::{ConflictHandler, DedupOutcome};
pub use data_cleaner::{is_blank, DataCleaner};
pub use error::{ImportError, ImportResult, RecordError};
pub use field_mapper::FieldLayout;
pub use file_parser::{decode_content, DelimitedParser};
pub use import_stage::{ImportStage, StageTracker};
pub use room_resolver::{RoomResolution, RoomResolver};

// 重导出 Trait 接口
pub use asset_importer_trait::{
    AssetImporter, FieldMapper, FieldNormalizer, FileParser, ImportRequest,
};
