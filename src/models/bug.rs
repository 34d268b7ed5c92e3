// ============================================================================
// CapsFix - 漏洞报告数据模型
// ============================================================================
//
// 文件: src/models/bug.rs
// 职责: 漏洞追踪系统 (Mojira) 相关的数据结构定义
// 边界:
//   - ✅ 解决状态 / 工单状态枚举
//   - ✅ 漏洞报告元数据结构
//   - ❌ 不应包含 HTTP 请求逻辑
//   - ❌ 不应包含修复规则校验逻辑
//
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::version::VersionId;

/// 工单解决结果，数值与 Mojira 的 resolution ID 一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    Fixed = 1,
    WontFix = 2,
    Duplicate = 3,
    Incomplete = 4,
    CannotReproduce = 5,
    WorksAsIntended = 6,
    Invalid = 7,
    AwaitingResponse = 10001,
    Done = 10003,
    WontDo = 10004,
    Declined = 10005,
}

impl Resolution {
    /// 从 Mojira 的 resolution ID 解析
    pub fn from_id(id: u32) -> Option<Self> {
        let resolution = match id {
            1 => Resolution::Fixed,
            2 => Resolution::WontFix,
            3 => Resolution::Duplicate,
            4 => Resolution::Incomplete,
            5 => Resolution::CannotReproduce,
            6 => Resolution::WorksAsIntended,
            7 => Resolution::Invalid,
            10001 => Resolution::AwaitingResponse,
            10003 => Resolution::Done,
            10004 => Resolution::WontDo,
            10005 => Resolution::Declined,
            _ => return None,
        };
        Some(resolution)
    }

    /// 该结果说明修复规则本不应存在
    pub fn is_inappropriate(self) -> bool {
        matches!(
            self,
            Resolution::Invalid
                | Resolution::Duplicate
                | Resolution::Incomplete
                | Resolution::WorksAsIntended
        )
    }

    /// 上游已修复
    pub fn is_fixed(self) -> bool {
        matches!(self, Resolution::Fixed | Resolution::Done)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resolution::Fixed => "Fixed",
            Resolution::WontFix => "Won't Fix",
            Resolution::Duplicate => "Duplicate",
            Resolution::Incomplete => "Incomplete",
            Resolution::CannotReproduce => "Cannot Reproduce",
            Resolution::WorksAsIntended => "Works As Intended",
            Resolution::Invalid => "Invalid",
            Resolution::AwaitingResponse => "Awaiting Response",
            Resolution::Done => "Done",
            Resolution::WontDo => "Won't Do",
            Resolution::Declined => "Declined",
        };
        write!(f, "{}", name)
    }
}

/// 工单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Reopened,
    Resolved,
    Closed,
    Postponed,
}

impl Status {
    /// 按 Mojira 的状态名称解析，未知名称视为 Open
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "in progress" => Status::InProgress,
            "reopened" => Status::Reopened,
            "resolved" => Status::Resolved,
            "closed" => Status::Closed,
            "postponed" => Status::Postponed,
            _ => Status::Open,
        }
    }
}

/// 漏洞报告元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugReport {
    /// 规范化后的工单键（重定向后可能与查询键不同）
    pub key: String,
    pub resolution: Option<Resolution>,
    pub status: Status,
    /// 修复版本，已转换为版本 ID
    pub fix_versions: Vec<VersionId>,
    /// 受影响版本，已转换为版本 ID
    pub affects_versions: Vec<VersionId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_ids_match_mojira() {
        assert_eq!(Resolution::from_id(6), Some(Resolution::WorksAsIntended));
        assert_eq!(Resolution::from_id(10003), Some(Resolution::Done));
        assert_eq!(Resolution::from_id(42), None);
        assert_eq!(Resolution::Declined as u32, 10005);
    }

    #[test]
    fn resolution_classification() {
        assert!(Resolution::Duplicate.is_inappropriate());
        assert!(!Resolution::WontFix.is_inappropriate());
        assert!(Resolution::Done.is_fixed());
        assert!(!Resolution::Invalid.is_fixed());
    }
}
