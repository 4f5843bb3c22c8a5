// ==========================================
// 资产盘点系统 - 字段映射器实现
// ==========================================
// 职责: 位置字段 → 命名字段（唯一的偏移量表）
// ==========================================

use crate::domain::{RawAssetRecord, RawRecord};
use crate::importer::asset_importer_trait::FieldMapper;

// ==========================================
// FieldLayout - 字段偏移量表
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub record_type: usize,
    pub tag: usize,
    pub description: usize,
    pub location: usize,
    pub value: usize,
    pub responsible_name: usize,
    pub responsible_id: usize,
}

impl FieldLayout {
    /// 旧系统导出格式
    pub const LEGACY: FieldLayout = FieldLayout {
        record_type: 0,
        tag: 1,
        description: 2,
        location: 3,
        value: 4,
        responsible_name: 5,
        responsible_id: 6,
    };
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self::LEGACY
    }
}

impl FieldMapper for FieldLayout {
    fn map_record(&self, record: &RawRecord) -> RawAssetRecord {
        let get = |idx: usize| record.field(idx).to_string();

        RawAssetRecord {
            record_type: get(self.record_type),
            tag: get(self.tag),
            description: get(self.description),
            location: get(self.location),
            value: get(self.value),
            responsible_name: get(self.responsible_name),
            responsible_id: get(self.responsible_id),
            line: record.line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: &str) -> RawRecord {
        RawRecord::new(7, line.split('|').map(str::to_string).collect())
    }

    #[test]
    fn test_map_full_record() {
        let raw = FieldLayout::LEGACY.map_record(&record(
            "2|012345|MESA. MADEIRA|SALA 1 (BLOCO A)|15000|MARIA|998",
        ));
        assert_eq!(raw.record_type, "2");
        assert_eq!(raw.tag, "012345");
        assert_eq!(raw.description, "MESA. MADEIRA");
        assert_eq!(raw.location, "SALA 1 (BLOCO A)");
        assert_eq!(raw.value, "15000");
        assert_eq!(raw.responsible_name, "MARIA");
        assert_eq!(raw.responsible_id, "998");
        assert_eq!(raw.line, 7);
    }

    #[test]
    fn test_map_short_record() {
        let raw = FieldLayout::default().map_record(&record("2|012345|MESA"));
        assert_eq!(raw.description, "MESA");
        assert_eq!(raw.location, "");
        assert_eq!(raw.responsible_id, "");
    }
}
