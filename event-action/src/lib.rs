//! 进程内事件分发基础库（event-action）
//!
//! 具名事件（`Event`）上订阅若干动作（`Callback`），触发时按订阅顺序同步执行：
//! - 动作按回调身份去重，重复订阅静默忽略；
//! - 动作可带节流间隔（`Interval`），距上次执行不足间隔时本次触发跳过该动作；
//! - 触发参数原样传给每个动作，返回值被丢弃，动作失败则中止本次触发并向上传播；
//! - 两个事件名称相同且订阅了相同的回调集合（与顺序无关）即相等。
//!
//! 没有后台定时器、没有异步投递；节流在触发时按当前时钟（`Clock`）读数判断。
//! 需要跨线程共享或在动作内部修改自身事件时，使用 `SharedEvent`。
//!
pub mod callable;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod interval;
pub mod shared;

mod action;

pub use callable::{ActionOutcome, Callable, Callback};
pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock};
pub use config::EventConfig;
pub use error::{EventError, EventResult};
pub use event::Event;
pub use interval::Interval;
pub use shared::{SharedEvent, WeakSharedEvent};
