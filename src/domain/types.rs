// ==========================================
// 资产盘点系统 - 领域类型定义
// ==========================================
// 职责: 校区标识、房间键等跨模块共享的值类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ==========================================
// CampusId - 校区标识
// ==========================================
// 外部实体引用: 24 位十六进制字符串（统一存为小写）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CampusId(String);

/// 校区标识格式错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("校区标识格式无效: '{0}'（应为 24 位十六进制字符）")]
pub struct InvalidCampusId(pub String);

impl CampusId {
    /// 标识长度
    pub const LEN: usize = 24;

    /// 解析并校验校区标识
    pub fn parse(raw: &str) -> Result<Self, InvalidCampusId> {
        let trimmed = raw.trim();
        if trimmed.len() != Self::LEN || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidCampusId(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CampusId {
    type Error = InvalidCampusId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CampusId::parse(&value)
    }
}

impl From<CampusId> for String {
    fn from(id: CampusId) -> Self {
        id.0
    }
}

// ==========================================
// RoomKey - 房间组合键（名称 + 楼栋）
// ==========================================
// 校区维度由调用方提供，不包含在键内
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomKey {
    pub name: String,
    pub block: String,
}

impl RoomKey {
    pub fn new(name: impl Into<String>, block: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            block: block.into(),
        }
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.block)
    }
}
