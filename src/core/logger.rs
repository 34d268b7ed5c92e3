// ============================================================================
// CapsFix - 转换器日志
// ============================================================================
//
// 文件: src/core/logger.rs
// 职责: 单个翻译键处理过程中的日志收集
// 边界:
//   - ✅ Info / Warn / Error 消息收集
//   - ✅ 消息时间戳
//   - ❌ 不应直接输出到终端（由生成器统一转发到 tracing）
//   - ❌ 不应跨翻译键复用
//
// ============================================================================

use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

/// 消息级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Warn,
    Error,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Info => write!(f, "info"),
            MessageType::Warn => write!(f, "warn"),
            MessageType::Error => write!(f, "error"),
        }
    }
}

/// 单条日志
#[derive(Debug, Clone)]
pub struct LogMessage {
    pub kind: MessageType,
    pub message: String,
    pub timestamp: SystemTime,
}

/// 每次 (修复, 版本, 语言) 转换调用一个实例，生成器检查后丢弃
#[derive(Debug, Default)]
pub struct TransformerLogger {
    messages: Mutex<Vec<LogMessage>>,
}

impl TransformerLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(MessageType::Info, message.into());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.push(MessageType::Warn, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(MessageType::Error, message.into());
    }

    fn push(&self, kind: MessageType, message: String) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogMessage {
                kind,
                message,
                timestamp: SystemTime::now(),
            });
    }

    /// 按记录顺序返回所有消息
    pub fn messages(&self) -> Vec<LogMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, kind: MessageType) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|message| message.kind == kind)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_messages_in_order() {
        let logger = TransformerLogger::new();
        assert!(logger.is_empty());

        logger.info("looking up");
        logger.warn("start not found");
        logger.error("gave up");

        let kinds: Vec<MessageType> = logger.messages().iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![MessageType::Info, MessageType::Warn, MessageType::Error]);
        assert_eq!(logger.count(MessageType::Warn), 1);

        let messages = logger.messages();
        assert!(messages[0].timestamp <= messages[2].timestamp);
    }
}
