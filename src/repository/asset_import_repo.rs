// ==========================================
// 资产盘点系统 - 资产导入 Repository Trait
// ==========================================
// 职责: 定义导入相关数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::{AssetRecord, CampusId, ImportBatch, RoomKey, RoomRef};
use crate::repository::error::{BulkInsertError, RepositoryResult};
use async_trait::async_trait;

// ==========================================
// AssetImportRepository Trait
// ==========================================
// 用途: 资产导入相关数据访问
// 实现者: AssetImportRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait AssetImportRepository: Send + Sync {
    // ===== 房间 =====

    /// 按 (名称, 楼栋) 组合批量查询房间
    ///
    /// # 参数
    /// - keys: 去重后的组合列表
    /// - campus_id: 校区
    ///
    /// # 返回
    /// - Ok(Vec<RoomRef>): 已存在的房间（不存在的组合不返回）
    async fn find_rooms_by_combinations(
        &self,
        keys: &[RoomKey],
        campus_id: &CampusId,
    ) -> RepositoryResult<Vec<RoomRef>>;

    /// 创建房间
    async fn create_room(&self, key: &RoomKey, campus_id: &CampusId) -> RepositoryResult<RoomRef>;

    // ===== 资产 =====

    /// 批量查询已存在的标签
    ///
    /// # 返回
    /// - Ok(Vec<String>): 传入标签中已存在的子集
    async fn find_existing_tags(&self, tags: &[String]) -> RepositoryResult<Vec<String>>;

    /// 无序批量插入资产
    ///
    /// # 返回
    /// - Ok(usize): 全部插入成功的记录数
    /// - Err(PartialFailure): 仅列出的记录失败，其余已提交
    /// - Err(TotalFailure): 本次调用无记录落库
    async fn bulk_insert_assets(&self, records: &[AssetRecord]) -> Result<usize, BulkInsertError>;

    /// 统计资产数（可按校区过滤）
    async fn count_assets(&self, campus_id: Option<&CampusId>) -> RepositoryResult<usize>;

    /// 统计校区下房间数
    async fn count_rooms(&self, campus_id: &CampusId) -> RepositoryResult<usize>;

    // ===== 批次台账 =====

    /// 插入导入批次记录
    async fn insert_batch(&self, batch: &ImportBatch) -> RepositoryResult<()>;

    /// 查询最近的导入批次
    async fn get_recent_batches(&self, limit: usize) -> RepositoryResult<Vec<ImportBatch>>;
}
