// ============================================================================
// CapsFix - 修复规则列表
// ============================================================================
//
// 文件: src/fixes.rs
// 职责: 定义随资源包发布的修复规则
// 边界:
//   - ✅ 静态规则数据
//   - ❌ 不应包含规则执行逻辑
//
// ============================================================================

use std::sync::Arc;

use crate::core::error::FixError;
use crate::core::fix::Fix;
use crate::core::groups::{auto_capitalise_group, AutoCapitaliseOptions, GroupOptions};
use crate::core::transformers::ReplaceTransformer;

/// 构造完整的规则列表，每次构建调用一次
pub fn default_fixes() -> Result<Vec<Fix>, FixError> {
    let mut fixes = vec![
        // 在可触发振动的方块与生物列表中补上牛津逗号
        Fix::new(
            "advancements.adventure.avoid_vibration.description",
            Arc::new(ReplaceTransformer::new(" or", ", or")),
        )
        .bug("MC-226454")
        .build()?,
    ];

    fixes.extend(auto_capitalise_group(
        "MC-236606",
        ["hideLightningFlashes.tooltip"],
        &AutoCapitaliseOptions {
            group: GroupOptions::new().prefix("options"),
            ..AutoCapitaliseOptions::default()
        },
    )?);

    Ok(fixes)
}
