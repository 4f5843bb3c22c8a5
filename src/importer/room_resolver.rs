// ==========================================
// 资产盘点系统 - 房间解析器
// ==========================================
// 职责: 批量查询 (名称, 楼栋) 组合 → 创建缺失房间 → 资产绑定房间
// 约束: 一次导入内每个组合最多创建一次房间
// 说明: 同校区并发导入可能重复创建同一房间，由唯一约束兜底
//       （失败方的相关记录报 ROOM_CREATION_FAILED，重新导入即可）
// ==========================================

use crate::domain::{
    describe_tag, AssetRecord, CampusId, ErrorEntry, ImportErrorType, NormalizedAsset, RoomKey,
};
use crate::repository::AssetImportRepository;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, error, warn};

/// 房间解析结果
#[derive(Debug, Default)]
pub struct RoomResolution {
    pub records: Vec<AssetRecord>, // 已绑定房间的记录（保持输入顺序）
    pub errors: Vec<ErrorEntry>,   // 每条未绑定记录一个条目
    pub rooms_created: usize,
    pub skipped: usize, // 房间创建失败而跳过的记录（计入 skipped，不计入 failed）
}

impl RoomResolution {
    /// 房间查询失败的记录数
    pub fn failed(&self) -> usize {
        self.errors.len() - self.skipped
    }
}

pub struct RoomResolver;

impl RoomResolver {
    /// 去重后的 (名称, 楼栋) 组合（有序，便于日志与测试复现）
    pub fn distinct_keys(&self, assets: &[NormalizedAsset]) -> Vec<RoomKey> {
        assets
            .iter()
            .map(NormalizedAsset::room_key)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 解析房间并绑定
    ///
    /// # 失败处理
    /// - 批量查询失败: 全部记录失败（ROOM_LOOKUP_FAILED）
    /// - 单个房间创建失败: 引用该房间的记录记为跳过并附错误条目（ROOM_CREATION_FAILED），其余继续
    pub async fn resolve<R: AssetImportRepository + ?Sized>(
        &self,
        repo: &R,
        assets: Vec<NormalizedAsset>,
        campus_id: &CampusId,
        import_batch_id: &str,
    ) -> RoomResolution {
        let mut resolution = RoomResolution::default();
        if assets.is_empty() {
            return resolution;
        }

        let keys = self.distinct_keys(&assets);
        debug!(combinations = keys.len(), "房间组合去重完成");

        let existing = match repo.find_rooms_by_combinations(&keys, campus_id).await {
            Ok(rooms) => rooms,
            Err(e) => {
                error!(error = %e, "房间批量查询失败");
                resolution.errors = assets
                    .iter()
                    .map(|a| {
                        ErrorEntry::at_line(
                            ImportErrorType::RoomLookupFailed,
                            format!("{}: 房间查询失败: {}", describe_tag(a.tracked_tag()), e),
                            a.line,
                        )
                    })
                    .collect();
                return resolution;
            }
        };

        let mut room_ids: HashMap<RoomKey, String> = existing
            .into_iter()
            .map(|room| (room.key(), room.room_id))
            .collect();
        let mut creation_failures: HashMap<RoomKey, String> = HashMap::new();

        // 创建缺失房间（每个组合一次）
        for key in keys {
            if room_ids.contains_key(&key) {
                continue;
            }
            match repo.create_room(&key, campus_id).await {
                Ok(room) => {
                    debug!(room = %key, room_id = %room.room_id, "房间已创建");
                    room_ids.insert(key, room.room_id);
                    resolution.rooms_created += 1;
                }
                Err(e) => {
                    warn!(room = %key, error = %e, "房间创建失败");
                    creation_failures.insert(key, e.to_string());
                }
            }
        }

        for asset in assets {
            let key = asset.room_key();
            match room_ids.get(&key) {
                Some(room_id) => {
                    let room_id = room_id.clone();
                    resolution.records.push(asset.into_record(room_id, import_batch_id));
                }
                None => {
                    let cause = creation_failures
                        .get(&key)
                        .map(String::as_str)
                        .unwrap_or("房间未解析");
                    resolution.skipped += 1;
                    resolution.errors.push(ErrorEntry::at_line(
                        ImportErrorType::RoomCreationFailed,
                        format!(
                            "{}: 房间 {} 创建失败: {}",
                            describe_tag(asset.tracked_tag()),
                            key,
                            cause
                        ),
                        asset.line,
                    ));
                }
            }
        }

        resolution
    }
}
