// ============================================================================
// CapsFix - English Translation Table
// ============================================================================
//
// 文件: src/i18n/en_us.rs
// 职责: English translation content definition
// 边界:
//   - ✅ English translation strings definition
//   - ❌ Should not contain translation logic
//   - ❌ Should not contain other language translations
//
// ============================================================================

/// English translation table
pub const TRANSLATIONS: &[(&str, &str)] = &[
    // Build command
    ("build.start", "Building resource packs..."),
    ("build.loaded_fixes", "Loaded {} fixes"),
    (
        "build.development_variant",
        "Building development variants of the pack (set --pack-version for published releases)",
    ),
    ("build.skip_validation", "Skipping bug report validation"),
    ("build.targets", "Targeting {} version(s) in {} language(s)"),
    ("build.generating", "Generating translation strings"),
    ("build.generated_versions", "Generated translation files for {} version(s):"),
    ("build.packs_header", "Resource packs"),
    ("build.completed", "Wrote {} resource pack(s) to {} in {}s"),
    // Validation
    ("validate.start", "Validating linked bug reports..."),
    ("validate.spinner", "Checking {} bug report(s)"),
    ("validate.summary", "Validation summary"),
    ("validate.checked", "Checked {} fix(es) with linked bug reports"),
    ("validate.redirect", "{}: {} {} {} (bug report was moved)"),
    ("validate.failure", "{} {} ({}): {}"),
    ("validate.passed", "All linked bug reports are valid"),
    ("validate.failed", "Validation failed for {} fix(es)"),
    // Stats
    ("stats.start", "Generating stats..."),
    ("stats.header", "Statistics for {}:"),
    ("stats.bug_reports", "  Fixed bugs: {}"),
    ("stats.translation_keys", "  Translation keys: {}"),
    ("stats.scope_all", "all configured versions"),
    ("stats.scope_latest", "the latest {}"),
    // Init command
    ("init.start", "Initializing CapsFix configuration..."),
    ("init.config_exists", "Config file already exists: {}"),
    ("init.use_force_hint", "Use --force to overwrite the existing config file"),
    ("init.config_created", "Config file created: {}"),
    (
        "init.next_steps",
        "Edit the [build] section to choose target versions and languages, then run `capsfix build`",
    ),
    ("init.create_failed", "Failed to create config file: {}"),
    // Errors
    ("error.load_fixes", "Failed to load the fix list"),
    ("error.services", "Failed to set up network clients"),
    ("error.generate", "Failed to generate translation strings"),
    ("error.catalog", "Failed to load the version manifest"),
];
