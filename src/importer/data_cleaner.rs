// ==========================================
// 资产盘点系统 - 字段规范化实现
// ==========================================
// 职责: 名称提取 / 房间解析 / 闲置判定 / 金额换算 / 责任人默认值
// 约束: 所有默认值由同一个空白判定 is_blank 驱动
// ==========================================

use crate::config::ImportSettings;
use crate::domain::asset::{NOT_LOCATED, NOT_SPECIFIED, RESPONSIBLE_NOT_INFORMED};
use crate::domain::{CampusId, NormalizedAsset, RawAssetRecord};
use crate::importer::asset_importer_trait::FieldNormalizer;
use crate::importer::error::RecordError;
use rust_decimal::Decimal;

/// 金额字段的小数位（原始值为最小货币单位）
const VALUE_SCALE: u32 = 2;

/// 空白判定（空串或仅含空白字符）
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub struct DataCleaner;

impl DataCleaner {
    /// 资产名称: 描述中第一个句点之前的文本
    pub fn derive_name(&self, description: &str) -> String {
        match description.split_once('.') {
            Some((head, _)) => head.trim().to_string(),
            None => description.trim().to_string(),
        }
    }

    /// 房间解析: "名称 (楼栋)" → (名称, 楼栋)
    ///
    /// - 无括号: (整段, Not Specified)
    /// - 空白: (Not Located, Not Specified)
    /// - 括号前或括号内为空: 对应部分同样取默认值
    pub fn parse_room(&self, location: &str) -> (String, String) {
        if is_blank(location) {
            return (NOT_LOCATED.to_string(), NOT_SPECIFIED.to_string());
        }

        if let Some(open) = location.find('(') {
            let name = location[..open].trim();
            let rest = &location[open + 1..];
            let block = match rest.find(')') {
                Some(close) => rest[..close].trim(),
                None => rest.trim(),
            };

            let name = if is_blank(name) { NOT_LOCATED } else { name };
            let block = if is_blank(block) { NOT_SPECIFIED } else { block };
            return (name.to_string(), block.to_string());
        }

        (location.trim().to_string(), NOT_SPECIFIED.to_string())
    }

    /// 闲置判定: 原始位置字段包含闲置标记（区分大小写）
    pub fn is_idle(&self, location: &str, idle_marker: &str) -> bool {
        !idle_marker.is_empty() && location.contains(idle_marker)
    }

    /// 金额: 整数最小货币单位 / 100
    pub fn parse_value(&self, value: &str) -> Result<Decimal, RecordError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RecordError::MissingValue { field: "value" });
        }

        let cents = trimmed
            .parse::<i64>()
            .map_err(|_| RecordError::InvalidValue {
                field: "value",
                value: trimmed.to_string(),
            })?;

        if cents < 0 {
            return Err(RecordError::NegativeValue {
                field: "value",
                value: trimmed.to_string(),
            });
        }

        Ok(Decimal::new(cents, VALUE_SCALE))
    }

    /// 责任人: 空白取默认值
    pub fn responsible_name(&self, value: &str) -> String {
        if is_blank(value) {
            RESPONSIBLE_NOT_INFORMED.to_string()
        } else {
            value.trim().to_string()
        }
    }
}

impl FieldNormalizer for DataCleaner {
    fn normalize(
        &self,
        raw: &RawAssetRecord,
        campus_id: &CampusId,
        settings: &ImportSettings,
    ) -> Result<Option<NormalizedAsset>, RecordError> {
        if raw.record_type.trim() != settings.data_row_marker {
            return Ok(None);
        }

        let value = self.parse_value(&raw.value)?;
        let (room_name, room_block) = self.parse_room(&raw.location);

        Ok(Some(NormalizedAsset {
            name: self.derive_name(&raw.description),
            tag: raw.tag.clone(),
            room_name,
            room_block,
            value,
            responsible_name: self.responsible_name(&raw.responsible_name),
            responsible_id: raw.responsible_id.trim().to_string(),
            idle: self.is_idle(&raw.location, &settings.idle_marker),
            campus_id: campus_id.clone(),
            line: raw.line,
        }))
    }
}
