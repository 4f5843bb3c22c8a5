// ==========================================
// 资产盘点系统 - 房间领域模型
// ==========================================
// 对齐: room 表，唯一键 (campus_id, name, block)
// ==========================================

use crate::domain::types::{CampusId, RoomKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// RoomRef - 已存在或新建的房间
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRef {
    pub room_id: String,
    pub campus_id: CampusId,
    pub name: String,
    pub block: String,
    pub created_at: DateTime<Utc>,
}

impl RoomRef {
    pub fn key(&self) -> RoomKey {
        RoomKey::new(self.name.clone(), self.block.clone())
    }
}
