// ==========================================
// 资产盘点系统 - 重复标签检测
// ==========================================
// 职责: 一次批量查询已存在标签，标记需跳过的记录
// 约束: 空白标签从不视为重复
// ==========================================

use crate::domain::AssetRecord;
use crate::repository::{AssetImportRepository, RepositoryResult};
use std::collections::{BTreeSet, HashSet};

/// 查重结果
#[derive(Debug, Default)]
pub struct DedupOutcome {
    pub fresh: Vec<AssetRecord>, // 待插入记录
    pub skipped: usize,          // 因标签已存在而跳过
}

pub struct ConflictHandler;

impl ConflictHandler {
    /// 去重后的非空白标签
    pub fn distinct_tags(&self, records: &[AssetRecord]) -> Vec<String> {
        records
            .iter()
            .filter_map(|r| r.tag.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 按已存在标签拆分记录
    pub fn split_existing(&self, records: Vec<AssetRecord>, existing: &[String]) -> DedupOutcome {
        let existing: HashSet<&str> = existing.iter().map(String::as_str).collect();
        let mut outcome = DedupOutcome::default();

        for record in records {
            let is_duplicate = record
                .tag
                .as_deref()
                .is_some_and(|tag| existing.contains(tag));
            if is_duplicate {
                outcome.skipped += 1;
            } else {
                outcome.fresh.push(record);
            }
        }

        outcome
    }

    /// 查询已存在的标签（单次存储调用；无标签时不查询）
    pub async fn find_existing<R: AssetImportRepository + ?Sized>(
        &self,
        repo: &R,
        records: &[AssetRecord],
    ) -> RepositoryResult<Vec<String>> {
        let tags = self.distinct_tags(records);
        if tags.is_empty() {
            return Ok(Vec::new());
        }
        repo.find_existing_tags(&tags).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CampusId;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn record(tag: Option<&str>) -> AssetRecord {
        AssetRecord {
            asset_id: uuid::Uuid::new_v4().to_string(),
            tag: tag.map(str::to_string),
            name: "ESTANTE".to_string(),
            room_id: "r1".to_string(),
            campus_id: CampusId::parse("65a1b2c3d4e5f60718293a4b").unwrap(),
            value: Decimal::new(500, 2),
            responsible_name: "ANA".to_string(),
            responsible_id: String::new(),
            idle: false,
            import_batch_id: "b1".to_string(),
            line: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_distinct_tags_skip_blank() {
        let records = vec![
            record(Some("A")),
            record(None),
            record(Some("A")),
            record(Some("B")),
        ];
        assert_eq!(ConflictHandler.distinct_tags(&records), vec!["A", "B"]);
    }

    #[test]
    fn test_split_existing() {
        let records = vec![
            record(Some("A")),
            record(None),
            record(Some("B")),
            record(None),
        ];
        let outcome = ConflictHandler.split_existing(records, &["A".to_string()]);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.fresh.len(), 3);
        assert!(outcome.fresh.iter().all(|r| r.tag.as_deref() != Some("A")));
    }
}
