// ============================================================================
// CapsFix - 文本工具
// ============================================================================
//
// 文件: src/core/text.rs
// 职责: 标题大小写规则与翻译键通配符匹配
// 边界:
//   - ✅ 标题大小写启发式规则
//   - ✅ 翻译键通配符 (`*` / `**`) 匹配
//   - ❌ 不应包含转换器上下文相关逻辑
//
// ============================================================================

use std::fmt;

/// 强制首字母大写的单词
const ALWAYS_CAPITALISED: &[&str] = &["me"];
/// 强制小写的单词
const NEVER_CAPITALISED: &[&str] = &["from", "into"];
/// 短于该长度的单词保持小写
const MIN_CAPITALISED_LENGTH: usize = 3;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// 将文本转换为标题大小写
///
/// 这不是严格意义上的英文标题格式：
/// - `me` 总是首字母大写
/// - `from` 与 `into` 总是小写
/// - 少于 3 个字符的单词小写
/// - 其余单词首字母大写，其他字母保持不变
pub fn title_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut word = String::new();

    for c in text.chars() {
        if is_word_char(c) {
            word.push(c);
            continue;
        }
        if !word.is_empty() {
            output.push_str(&title_case_word(&word));
            word.clear();
        }
        output.push(c);
    }
    if !word.is_empty() {
        output.push_str(&title_case_word(&word));
    }

    output
}

fn title_case_word(word: &str) -> String {
    let lower = word.to_lowercase();

    if ALWAYS_CAPITALISED.contains(&lower.as_str()) {
        capitalise_first(word)
    } else if NEVER_CAPITALISED.contains(&lower.as_str())
        || word.chars().count() < MIN_CAPITALISED_LENGTH
    {
        lower
    } else {
        capitalise_first(word)
    }
}

fn capitalise_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 判断字符串首尾是否为单词字符，用于决定是否添加 `\b`
pub fn starts_with_word_char(text: &str) -> bool {
    text.chars().next().is_some_and(is_word_char)
}

pub fn ends_with_word_char(text: &str) -> bool {
    text.chars().last().is_some_and(is_word_char)
}

/// 翻译键通配符
///
/// 以 `.` 分段：`*` 匹配恰好一个非空段，`**` 匹配剩余的一个或多个段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    source: String,
    segments: Vec<String>,
}

impl KeyPattern {
    pub fn new(pattern: &str) -> Self {
        Self {
            source: pattern.to_string(),
            segments: pattern.split('.').map(str::to_string).collect(),
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        let key_segments: Vec<&str> = key.split('.').collect();

        for (i, segment) in self.segments.iter().enumerate() {
            if segment == "**" {
                return i < key_segments.len();
            }
            let Some(key_segment) = key_segments.get(i) else {
                return false;
            };
            let matched = match segment.as_str() {
                "*" => !key_segment.is_empty(),
                literal => literal == *key_segment,
            };
            if !matched {
                return false;
            }
        }

        key_segments.len() == self.segments.len()
    }
}

impl From<&str> for KeyPattern {
    fn from(pattern: &str) -> Self {
        KeyPattern::new(pattern)
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
