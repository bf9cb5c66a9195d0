//! 事件配置
//!
//! 可由 builder 构造，也可从配置文件（serde）反序列化，缺省字段取默认值。
//!
use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// 事件配置
#[derive(Builder, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// `add_action` 未显式指定间隔时使用的间隔
    #[builder(default)]
    pub default_interval: Interval,
}
