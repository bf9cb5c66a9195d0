//! 触发间隔（Interval）
//!
//! 动作两次执行之间必须经过的最短时长。零表示不节流，每次触发都执行。
//! 由 `Duration` 构造总是合法；由秒数（`f64`）构造时需要校验。
//!

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EventError, EventResult};

/// 非负的节流间隔
///
/// # 示例
///
/// ```
/// use event_action::Interval;
/// use std::time::Duration;
///
/// let every = Interval::try_from_secs_f64(1.5).unwrap();
/// assert_eq!(every.as_duration(), Duration::from_millis(1500));
/// assert!(Interval::ZERO.is_zero());
/// assert!(Interval::try_from_secs_f64(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Interval(Duration);

impl Interval {
    /// 不节流
    pub const ZERO: Interval = Interval(Duration::ZERO);

    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    /// 从秒数创建，拒绝负数、NaN 与无穷大
    pub fn try_from_secs_f64(secs: f64) -> EventResult<Self> {
        if secs.is_nan() {
            return Err(EventError::invalid_argument(
                "interval must be a number, got NaN",
            ));
        }
        if secs < 0.0 {
            return Err(EventError::invalid_argument(format!(
                "interval must be non-negative, got {secs}"
            )));
        }

        Duration::try_from_secs_f64(secs).map(Self).map_err(|e| {
            EventError::invalid_argument(format!("interval out of range: {secs} ({e})"))
        })
    }

    pub const fn as_duration(&self) -> Duration {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0.as_secs_f64())
    }
}

impl From<Duration> for Interval {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}

impl From<Interval> for Duration {
    fn from(interval: Interval) -> Self {
        interval.0
    }
}

impl TryFrom<f64> for Interval {
    type Error = EventError;

    fn try_from(secs: f64) -> Result<Self, Self::Error> {
        Self::try_from_secs_f64(secs)
    }
}

impl From<Interval> for f64 {
    fn from(interval: Interval) -> Self {
        interval.0.as_secs_f64()
    }
}
