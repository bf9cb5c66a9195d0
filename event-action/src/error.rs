//! 事件系统统一错误定义
//!
//! 只包含两类：调用参数非法（编程错误，立即中止当前调用），
//! 以及触发过程中某个动作执行失败（原样向调用方传播）。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EventError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("action failed: event={event}, reason={source}")]
    ActionFailed {
        event: String,
        #[source]
        source: anyhow::Error,
    },
}

impl EventError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        EventError::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn action_failed(event: impl Into<String>, source: anyhow::Error) -> Self {
        EventError::ActionFailed {
            event: event.into(),
            source,
        }
    }

    /// 是否为参数校验错误
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, EventError::InvalidArgument { .. })
    }
}

/// 统一 Result 类型别名
pub type EventResult<T> = Result<T, EventError>;
