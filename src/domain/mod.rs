// ==========================================
// 资产盘点系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、值类型、导入结果
// 红线: 不含数据访问逻辑
// ==========================================

pub mod asset;
pub mod import;
pub mod room;
pub mod types;

// 重导出核心类型
pub use asset::{AssetRecord, NormalizedAsset, RawAssetRecord, RawRecord};
pub use import::{
    describe_tag, ErrorEntry, ImportBatch, ImportErrorType, ImportOutcome, ImportSummary,
};
pub use room::RoomRef;
pub use types::{CampusId, InvalidCampusId, RoomKey};
