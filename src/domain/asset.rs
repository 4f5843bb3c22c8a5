// ==========================================
// 资产盘点系统 - 资产领域模型
// ==========================================
// 导入管道中间产物: RawRecord → RawAssetRecord → NormalizedAsset → AssetRecord
// 只有 AssetRecord（已绑定房间）会落库
// ==========================================

use crate::domain::types::{CampusId, RoomKey};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 位置字段为空时的房间名
pub const NOT_LOCATED: &str = "Not Located";

/// 位置字段无括号（或为空）时的楼栋
pub const NOT_SPECIFIED: &str = "Not Specified";

/// 责任人字段为空时的默认值
pub const RESPONSIBLE_NOT_INFORMED: &str = "Responsible not informed";

// ==========================================
// RawRecord - 分词后的一行
// ==========================================
// 生命周期: 仅在一次导入调用内
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub line: usize,         // 原始文件行号（从 1 开始）
    pub fields: Vec<String>, // 按位置排列的字段
}

impl RawRecord {
    pub fn new(line: usize, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// 按位置取字段，缺失的尾部字段视为空串
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }
}

// ==========================================
// RawAssetRecord - 字段映射结果（仍为原始字符串）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAssetRecord {
    pub record_type: String,
    pub tag: String,
    pub description: String,
    pub location: String,
    pub value: String,
    pub responsible_name: String,
    pub responsible_id: String,

    // 元信息
    pub line: usize,
}

// ==========================================
// NormalizedAsset - 规范化后的待插入资产
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAsset {
    pub name: String,
    pub tag: String, // 原样保留，可能为空
    pub room_name: String,
    pub room_block: String,
    pub value: Decimal,
    pub responsible_name: String,
    pub responsible_id: String,
    pub idle: bool,
    pub campus_id: CampusId,
    pub line: usize,
}

impl NormalizedAsset {
    pub fn room_key(&self) -> RoomKey {
        RoomKey::new(self.room_name.clone(), self.room_block.clone())
    }

    /// 参与去重的标签（空白标签不参与）
    pub fn tracked_tag(&self) -> Option<&str> {
        if self.tag.trim().is_empty() {
            None
        } else {
            Some(self.tag.as_str())
        }
    }

    /// 绑定房间后转换为落库记录
    pub fn into_record(self, room_id: String, import_batch_id: &str) -> AssetRecord {
        let tag = self.tracked_tag().map(str::to_string);
        AssetRecord {
            asset_id: uuid::Uuid::new_v4().to_string(),
            tag,
            name: self.name,
            room_id,
            campus_id: self.campus_id,
            value: self.value,
            responsible_name: self.responsible_name,
            responsible_id: self.responsible_id,
            idle: self.idle,
            import_batch_id: import_batch_id.to_string(),
            line: self.line,
            created_at: Utc::now(),
        }
    }
}

// ==========================================
// AssetRecord - 资产落库记录
// ==========================================
// 对齐: asset 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub asset_id: String,    // UUID
    pub tag: Option<String>, // 空白标签存为 NULL
    pub name: String,
    pub room_id: String,
    pub campus_id: CampusId,
    pub value: Decimal,
    pub responsible_name: String,
    pub responsible_id: String,
    pub idle: bool,
    pub import_batch_id: String,
    pub line: usize, // 仅用于错误定位，不落库
    pub created_at: DateTime<Utc>,
}
