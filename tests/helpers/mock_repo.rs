// ==========================================
// Mock 仓储实现 - 用于导入流程测试
// ==========================================
// 内存存储 + 调用计数 + 可注入的失败
// Clone 共享同一状态，测试侧保留一份用于断言
// ==========================================

use asset_inventory::domain::{AssetRecord, CampusId, ImportBatch, RoomKey, RoomRef};
use asset_inventory::repository::{
    AssetImportRepository, BulkInsertError, RepositoryError, RepositoryResult, WriteError,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MockState {
    // 存储
    pub rooms: Vec<RoomRef>,
    pub assets: Vec<AssetRecord>,
    pub batches: Vec<ImportBatch>,

    // 调用计数
    pub find_rooms_calls: usize,
    pub create_room_calls: usize,
    pub find_tags_calls: usize,
    pub bulk_insert_calls: usize,
    pub bulk_insert_sizes: Vec<usize>,

    // 注入失败
    pub fail_room_lookup: bool,
    pub fail_room_creation: HashSet<RoomKey>,
    pub fail_tag_lookup: bool,
    pub reject_tags: HashSet<String>,
    pub total_failure_on_call: Option<usize>, // 第 N 次（从 1 开始）批量插入整体失败
    pub fail_batch_ledger: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockAssetRepo {
    state: Arc<Mutex<MockState>>,
}

impl MockAssetRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// 预置已存在的资产标签
    pub fn seed_tag(&self, tag: &str, campus_id: &CampusId) {
        let mut state = self.state();
        state.assets.push(AssetRecord {
            asset_id: format!("seed-{}", tag),
            tag: Some(tag.to_string()),
            name: "SEED".to_string(),
            room_id: "seed-room".to_string(),
            campus_id: campus_id.clone(),
            value: rust_decimal::Decimal::ZERO,
            responsible_name: "SEED".to_string(),
            responsible_id: String::new(),
            idle: false,
            import_batch_id: "seed".to_string(),
            line: 0,
            created_at: Utc::now(),
        });
    }

    /// 预置已存在的房间
    pub fn seed_room(&self, key: &RoomKey, campus_id: &CampusId) -> String {
        let room_id = format!("room-{}-{}", key.name, key.block);
        self.state().rooms.push(RoomRef {
            room_id: room_id.clone(),
            campus_id: campus_id.clone(),
            name: key.name.clone(),
            block: key.block.clone(),
            created_at: Utc::now(),
        });
        room_id
    }

    pub fn asset_count(&self) -> usize {
        self.state().assets.len()
    }
}

#[async_trait]
impl AssetImportRepository for MockAssetRepo {
    async fn find_rooms_by_combinations(
        &self,
        keys: &[RoomKey],
        campus_id: &CampusId,
    ) -> RepositoryResult<Vec<RoomRef>> {
        let mut state = self.state();
        state.find_rooms_calls += 1;
        if state.fail_room_lookup {
            return Err(RepositoryError::DatabaseQueryError("room lookup unavailable".into()));
        }

        Ok(state
            .rooms
            .iter()
            .filter(|r| &r.campus_id == campus_id && keys.contains(&r.key()))
            .cloned()
            .collect())
    }

    async fn create_room(&self, key: &RoomKey, campus_id: &CampusId) -> RepositoryResult<RoomRef> {
        let mut state = self.state();
        state.create_room_calls += 1;
        if state.fail_room_creation.contains(key) {
            return Err(RepositoryError::DatabaseQueryError(format!(
                "cannot create room {}",
                key
            )));
        }

        let room = RoomRef {
            room_id: format!("room-{}", state.rooms.len() + 1),
            campus_id: campus_id.clone(),
            name: key.name.clone(),
            block: key.block.clone(),
            created_at: Utc::now(),
        };
        state.rooms.push(room.clone());
        Ok(room)
    }

    async fn find_existing_tags(&self, tags: &[String]) -> RepositoryResult<Vec<String>> {
        let mut state = self.state();
        state.find_tags_calls += 1;
        if state.fail_tag_lookup {
            return Err(RepositoryError::DatabaseQueryError("tag lookup unavailable".into()));
        }

        let existing: HashSet<&str> = state
            .assets
            .iter()
            .filter_map(|a| a.tag.as_deref())
            .collect();
        Ok(tags
            .iter()
            .filter(|t| existing.contains(t.as_str()))
            .cloned()
            .collect())
    }

    async fn bulk_insert_assets(&self, records: &[AssetRecord]) -> Result<usize, BulkInsertError> {
        let mut state = self.state();
        state.bulk_insert_calls += 1;
        state.bulk_insert_sizes.push(records.len());

        if state.total_failure_on_call == Some(state.bulk_insert_calls) {
            return Err(BulkInsertError::total("connection reset"));
        }

        let mut write_errors = Vec::new();
        for (index, record) in records.iter().enumerate() {
            let tag = record.tag.clone();
            let rejected = tag.as_ref().is_some_and(|t| state.reject_tags.contains(t));
            let duplicate = tag
                .as_ref()
                .is_some_and(|t| state.assets.iter().any(|a| a.tag.as_ref() == Some(t)));

            if rejected || duplicate {
                write_errors.push(WriteError {
                    index,
                    tag,
                    message: "E11000 duplicate key error".to_string(),
                });
            } else {
                state.assets.push(record.clone());
            }
        }

        if write_errors.is_empty() {
            Ok(records.len())
        } else {
            Err(BulkInsertError::PartialFailure { write_errors })
        }
    }

    async fn count_assets(&self, campus_id: Option<&CampusId>) -> RepositoryResult<usize> {
        let state = self.state();
        Ok(state
            .assets
            .iter()
            .filter(|a| campus_id.map_or(true, |c| &a.campus_id == c))
            .count())
    }

    async fn count_rooms(&self, campus_id: &CampusId) -> RepositoryResult<usize> {
        Ok(self
            .state()
            .rooms
            .iter()
            .filter(|r| &r.campus_id == campus_id)
            .count())
    }

    async fn insert_batch(&self, batch: &ImportBatch) -> RepositoryResult<()> {
        let mut state = self.state();
        if state.fail_batch_ledger {
            return Err(RepositoryError::LockError("ledger unavailable".into()));
        }
        state.batches.push(batch.clone());
        Ok(())
    }

    async fn get_recent_batches(&self, limit: usize) -> RepositoryResult<Vec<ImportBatch>> {
        let state = self.state();
        Ok(state.batches.iter().rev().take(limit).cloned().collect())
    }
}
