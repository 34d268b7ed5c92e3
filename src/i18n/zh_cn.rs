// ============================================================================
// CapsFix - 中文翻译表
// ============================================================================
//
// 文件: src/i18n/zh_cn.rs
// 职责: 中文翻译内容定义
// 边界:
//   - ✅ 中文翻译字符串定义
//   - ❌ 不应包含翻译逻辑
//   - ❌ 不应包含其他语言翻译
//
// ============================================================================

/// 中文翻译表
pub const TRANSLATIONS: &[(&str, &str)] = &[
    // 构建命令
    ("build.start", "开始构建资源包..."),
    ("build.loaded_fixes", "已加载 {} 条修复规则"),
    (
        "build.development_variant",
        "正在构建开发版本（发布时请通过 --pack-version 指定版本号）",
    ),
    ("build.skip_validation", "跳过漏洞报告校验"),
    ("build.targets", "目标: {} 个版本, {} 种语言"),
    ("build.generating", "生成翻译文本"),
    ("build.generated_versions", "已为 {} 个版本生成语言文件:"),
    ("build.packs_header", "资源包"),
    ("build.completed", "已写出 {} 个资源包到 {}，耗时 {}s"),
    // 校验
    ("validate.start", "开始校验关联的漏洞报告..."),
    ("validate.spinner", "正在检查 {} 个漏洞报告"),
    ("validate.summary", "校验汇总"),
    ("validate.checked", "已检查 {} 条关联漏洞报告的修复规则"),
    ("validate.redirect", "{}: {} {} {}（漏洞报告已迁移）"),
    ("validate.failure", "{} {} ({}): {}"),
    ("validate.passed", "所有关联的漏洞报告均有效"),
    ("validate.failed", "{} 条修复规则校验失败"),
    // 统计
    ("stats.start", "正在生成统计信息..."),
    ("stats.header", "{} 的统计信息:"),
    ("stats.bug_reports", "  已修复漏洞: {}"),
    ("stats.translation_keys", "  翻译键: {}"),
    ("stats.scope_all", "所有配置的版本"),
    ("stats.scope_latest", "最新的 {}"),
    // 初始化命令
    ("init.start", "初始化 CapsFix 配置..."),
    ("init.config_exists", "配置文件已存在: {}"),
    ("init.use_force_hint", "使用 --force 覆盖已存在的配置文件"),
    ("init.config_created", "配置文件已创建: {}"),
    (
        "init.next_steps",
        "编辑 [build] 部分选择目标版本与语言，然后运行 `capsfix build`",
    ),
    ("init.create_failed", "创建配置文件失败: {}"),
    // 错误
    ("error.load_fixes", "加载修复规则失败"),
    ("error.services", "初始化网络客户端失败"),
    ("error.generate", "生成翻译文本失败"),
    ("error.catalog", "加载版本清单失败"),
];
