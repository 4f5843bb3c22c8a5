// ==========================================
// 资产盘点系统 - 导入阶段状态机
// ==========================================
// Idle → Tokenizing → Normalizing → ResolvingRooms → Deduplicating
//      → Inserting → Summarizing → Done
// 只允许前进，不允许回退
// ==========================================

use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportStage {
    Idle,
    Tokenizing,
    Normalizing,
    ResolvingRooms,
    Deduplicating,
    Inserting,
    Summarizing,
    Done,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImportStage::Idle => "IDLE",
            ImportStage::Tokenizing => "TOKENIZING",
            ImportStage::Normalizing => "NORMALIZING",
            ImportStage::ResolvingRooms => "RESOLVING_ROOMS",
            ImportStage::Deduplicating => "DEDUPLICATING",
            ImportStage::Inserting => "INSERTING",
            ImportStage::Summarizing => "SUMMARIZING",
            ImportStage::Done => "DONE",
        };
        f.write_str(s)
    }
}

/// 单次导入的阶段跟踪
#[derive(Debug)]
pub struct StageTracker {
    current: ImportStage,
}

impl Default for StageTracker {
    fn default() -> Self {
        Self {
            current: ImportStage::Idle,
        }
    }
}

impl StageTracker {
    pub fn current(&self) -> ImportStage {
        self.current
    }

    /// 前进到指定阶段；允许跳过中间阶段（如空输入直接汇总）
    ///
    /// 回退或停留返回 false，当前阶段不变
    pub fn advance(&mut self, next: ImportStage) -> bool {
        if next <= self.current {
            debug_assert!(false, "导入阶段不可回退: {} → {}", self.current, next);
            return false;
        }
        debug!(from = %self.current, to = %next, "导入阶段切换");
        self.current = next;
        true
    }
}
