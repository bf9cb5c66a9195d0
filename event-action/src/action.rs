//! 动作（Action）：事件内部的订阅记录，不对外暴露
//!
//! 每次订阅都会生成独立的 Action，即使同一个回调订阅到多个事件。
//!
use chrono::{DateTime, Utc};

use crate::callable::Callback;
use crate::interval::Interval;

pub(crate) struct Action<A> {
    callback: Callback<A>,
    interval: Interval,
    last_invoked: DateTime<Utc>,
}

impl<A> Action<A> {
    pub(crate) fn new(callback: Callback<A>, interval: Interval, now: DateTime<Utc>) -> Self {
        Self {
            callback,
            interval,
            last_invoked: now,
        }
    }

    pub(crate) fn callback(&self) -> &Callback<A> {
        &self.callback
    }

    pub(crate) fn interval(&self) -> Interval {
        self.interval
    }

    pub(crate) fn last_invoked(&self) -> DateTime<Utc> {
        self.last_invoked
    }

    pub(crate) fn wraps(&self, callback: &Callback<A>) -> bool {
        self.callback.ptr_eq(callback)
    }

    /// 在 `now` 时刻是否应当执行
    ///
    /// 时钟读数早于上次执行时间（墙钟回拨）时视为未到期。
    pub(crate) fn is_due(&self, now: DateTime<Utc>) -> bool {
        if self.interval.is_zero() {
            return true;
        }

        match (now - self.last_invoked).to_std() {
            Ok(elapsed) => elapsed >= self.interval.as_duration(),
            Err(_) => false,
        }
    }

    /// 记录一次实际执行，时间戳只进不退
    pub(crate) fn mark_invoked(&mut self, at: DateTime<Utc>) {
        if at > self.last_invoked {
            self.last_invoked = at;
        }
    }

    /// 撤销一次尚未真正执行的预占：仅当时间戳仍是预占时写入的值才恢复
    pub(crate) fn release(&mut self, claimed_at: DateTime<Utc>, previous: DateTime<Utc>) {
        if self.last_invoked == claimed_at {
            self.last_invoked = previous;
        }
    }

    pub(crate) fn invoke(&self, args: &A) -> anyhow::Result<()> {
        self.callback.invoke(args)
    }
}

impl<A> Clone for Action<A> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
            interval: self.interval,
            last_invoked: self.last_invoked,
        }
    }
}

// 只比较回调身份，间隔与时间戳不参与
impl<A> PartialEq for Action<A> {
    fn eq(&self, other: &Self) -> bool {
        self.callback.ptr_eq(&other.callback)
    }
}

impl<A> Eq for Action<A> {}
