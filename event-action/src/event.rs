//! 事件（Event）
//!
//! 具名的动作集合。动作按订阅顺序保存，`trigger` 按同一顺序同步执行到期的动作，
//! 并把同一份参数原样传给每个动作；动作的返回值被丢弃，失败则中止本次触发并向上传播。
//!
//! ```
//! use event_action::{Callback, Event};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let hits = Arc::new(AtomicUsize::new(0));
//! let incr = {
//!     let hits = hits.clone();
//!     Callback::new(move |_: &()| {
//!         hits.fetch_add(1, Ordering::SeqCst);
//!     })
//! };
//!
//! let mut tick = Event::new("tick");
//! tick.add_action(&incr);
//! tick.trigger(&()).unwrap();
//! tick.trigger(&()).unwrap();
//! assert_eq!(hits.load(Ordering::SeqCst), 2);
//! ```
//!
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::action::Action;
use crate::callable::Callback;
use crate::clock::{Clock, MonotonicClock};
use crate::config::EventConfig;
use crate::error::{EventError, EventResult};
use crate::interval::Interval;

pub struct Event<A> {
    name: String,
    actions: Vec<Action<A>>,
    clock: Arc<dyn Clock>,
    config: EventConfig,
}

impl<A> Event<A> {
    /// 创建空事件，使用单调时钟与默认配置
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_clock_and_config(name, Arc::new(MonotonicClock::new()), EventConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: EventConfig) -> Self {
        Self::with_clock_and_config(name, Arc::new(MonotonicClock::new()), config)
    }

    pub fn with_clock(name: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self::with_clock_and_config(name, clock, EventConfig::default())
    }

    pub fn with_clock_and_config(
        name: impl Into<String>,
        clock: Arc<dyn Clock>,
        config: EventConfig,
    ) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
            clock,
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    /// 已订阅的动作数量
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// 以配置中的默认间隔订阅；已订阅的回调再次订阅时静默忽略
    pub fn add_action(&mut self, callback: &Callback<A>) {
        let interval = self.config.default_interval;
        self.add_action_with_interval(callback, interval);
    }

    /// 以指定间隔订阅；已订阅的回调再次订阅时静默忽略（不会更新间隔）
    pub fn add_action_with_interval(&mut self, callback: &Callback<A>, interval: Interval) {
        if self.has_action(callback) {
            tracing::trace!(event = %self.name, "action already subscribed");
            return;
        }

        let now = self.clock.now();
        self.actions.push(Action::new(callback.clone(), interval, now));
        tracing::debug!(
            event = %self.name,
            %interval,
            actions = self.actions.len(),
            "action subscribed"
        );
    }

    /// 以秒数指定间隔订阅；负数、NaN 或无穷大返回 `InvalidArgument`，事件保持不变
    pub fn add_action_every_secs(&mut self, callback: &Callback<A>, secs: f64) -> EventResult<()> {
        let interval = Interval::try_from_secs_f64(secs)?;
        self.add_action_with_interval(callback, interval);
        Ok(())
    }

    /// 取消订阅；未订阅时什么也不做
    pub fn remove_action(&mut self, callback: &Callback<A>) {
        if let Some(pos) = self.position(callback) {
            self.actions.remove(pos);
            tracing::debug!(
                event = %self.name,
                actions = self.actions.len(),
                "action unsubscribed"
            );
        }
    }

    pub fn remove_all_actions(&mut self) {
        let removed = self.actions.len();
        self.actions.clear();
        tracing::debug!(event = %self.name, removed, "all actions unsubscribed");
    }

    pub fn has_action(&self, callback: &Callback<A>) -> bool {
        self.position(callback).is_some()
    }

    /// 按订阅顺序执行所有到期的动作
    ///
    /// 零间隔的动作每次都执行；带间隔的动作距上次执行不足间隔时跳过，
    /// 执行成功后以执行结束时的时钟读数作为新的上次执行时间。
    /// 任一动作失败时立即返回 `ActionFailed`，其后的动作不再执行。
    pub fn trigger(&mut self, args: &A) -> EventResult<()> {
        for action in &mut self.actions {
            let now = self.clock.now();
            if !action.is_due(now) {
                tracing::trace!(
                    event = %self.name,
                    interval = %action.interval(),
                    last_invoked = %action.last_invoked(),
                    "action throttled"
                );
                continue;
            }

            if let Err(source) = action.invoke(args) {
                tracing::debug!(event = %self.name, error = %source, "action failed, trigger aborted");
                return Err(EventError::action_failed(self.name.clone(), source));
            }
            action.mark_invoked(self.clock.now());
        }

        Ok(())
    }

    fn position(&self, callback: &Callback<A>) -> Option<usize> {
        self.actions.iter().position(|a| a.wraps(callback))
    }

    /// 预占所有到期动作：在锁内先写入预占时间，防止并发触发重复执行
    pub(crate) fn claim_due(&mut self) -> Vec<Claim<A>> {
        let now = self.clock.now();
        let mut claims = Vec::new();
        for action in &mut self.actions {
            if action.is_due(now) {
                let previous = action.last_invoked();
                action.mark_invoked(now);
                claims.push(Claim {
                    callback: action.callback().clone(),
                    claimed_at: action.last_invoked(),
                    previous,
                });
            } else {
                tracing::trace!(
                    event = %self.name,
                    interval = %action.interval(),
                    "action throttled"
                );
            }
        }
        claims
    }

    /// 预占的动作执行成功后，以执行结束时的时钟读数记录
    pub(crate) fn confirm_claim(&mut self, claim: &Claim<A>) {
        let now = self.clock.now();
        if let Some(pos) = self.position(&claim.callback) {
            self.actions[pos].mark_invoked(now);
        }
    }

    /// 撤销未真正执行（或执行失败）的预占
    pub(crate) fn release_claims(&mut self, claims: &[Claim<A>]) {
        for claim in claims {
            if let Some(pos) = self.position(&claim.callback) {
                self.actions[pos].release(claim.claimed_at, claim.previous);
            }
        }
    }
}

/// 一次触发中预占的到期动作
pub(crate) struct Claim<A> {
    pub(crate) callback: Callback<A>,
    claimed_at: DateTime<Utc>,
    previous: DateTime<Utc>,
}

impl<A> Clone for Event<A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            actions: self.actions.clone(),
            clock: Arc::clone(&self.clock),
            config: self.config,
        }
    }
}

/// 名称相同、动作数量相同，且每个动作都能在对方中找到相同回调（与顺序无关）
impl<A> PartialEq for Event<A> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.actions.len() == other.actions.len()
            && self
                .actions
                .iter()
                .all(|mine| other.actions.iter().any(|theirs| mine == theirs))
    }
}

impl<A> Eq for Event<A> {}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("actions", &self.actions.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::Mutex;
    use std::time::Duration;

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> Callback<()> {
        let log = log.clone();
        Callback::new(move |_: &()| log.lock().unwrap().push(tag))
    }

    fn manual_event(name: &str) -> (Event<()>, ManualClock) {
        let clock = ManualClock::starting_now();
        (Event::with_clock(name, Arc::new(clock.clone())), clock)
    }

    #[test]
    fn test_new_event_is_empty() {
        let e: Event<()> = Event::new("tick");
        assert_eq!(e.name(), "tick");
        assert!(e.is_empty());
        assert_eq!(e.len(), 0);
    }

    #[test]
    fn test_add_is_idempotent() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let f = recorder(&log, "f");
        let mut e = Event::new("tick");

        e.add_action(&f);
        e.add_action(&f);
        e.add_action(&f.clone());
        assert_eq!(e.len(), 1);
        assert!(e.has_action(&f));
    }

    #[test]
    fn test_remove_preserves_order_and_is_idempotent() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (a, b, c) = (recorder(&log, "a"), recorder(&log, "b"), recorder(&log, "c"));
        let mut e = Event::new("tick");
        e.add_action(&a);
        e.add_action(&b);
        e.add_action(&c);

        e.remove_action(&b);
        e.remove_action(&b);
        assert_eq!(e.len(), 2);
        assert!(!e.has_action(&b));

        e.trigger(&()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["a", "c"]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut e = Event::new("tick");
        e.add_action(&recorder(&log, "a"));
        e.remove_action(&recorder(&log, "a"));
        assert_eq!(e.len(), 1);
    }

    #[test]
    fn test_remove_all() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut e = Event::new("tick");
        e.add_action(&recorder(&log, "a"));
        e.add_action(&recorder(&log, "b"));
        e.remove_all_actions();
        e.remove_all_actions();
        assert!(e.is_empty());

        e.trigger(&()).unwrap();
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_interval_leaves_event_unchanged() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let f = recorder(&log, "f");
        let mut e = Event::new("tick");

        let err = e.add_action_every_secs(&f, -5.0).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(e.is_empty());

        e.add_action_every_secs(&f, 5.0).unwrap();
        assert_eq!(e.len(), 1);
    }

    // 间隔为 5 秒：T+1、T+3 不执行，T+6 执行
    #[test]
    fn test_interval_gating() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (mut e, clock) = manual_event("tick");
        e.add_action_with_interval(&recorder(&log, "slow"), Interval::from_secs(5));

        for step in [1, 2, 3] {
            clock.advance(Duration::from_secs(step));
            e.trigger(&()).unwrap();
        }
        assert_eq!(*log.lock().unwrap(), vec!["slow"]);

        // 上次执行后重新计时
        clock.advance(Duration::from_secs(4));
        e.trigger(&()).unwrap();
        assert_eq!(log.lock().unwrap().len(), 1);

        clock.advance(Duration::from_secs(1));
        e.trigger(&()).unwrap();
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_default_interval_from_config() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let clock = ManualClock::starting_now();
        let cfg = EventConfig::builder()
            .default_interval(Interval::from_secs(10))
            .build();
        let mut e = Event::with_clock_and_config("tick", Arc::new(clock.clone()), cfg);
        e.add_action(&recorder(&log, "t"));

        e.trigger(&()).unwrap();
        assert!(log.lock().unwrap().is_empty());

        clock.advance(Duration::from_secs(10));
        e.trigger(&()).unwrap();
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_failure_aborts_remaining_actions() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut e = Event::new("tick");
        e.add_action(&recorder(&log, "before"));
        e.add_action(&Callback::new(|_: &()| -> anyhow::Result<()> {
            anyhow::bail!("broken")
        }));
        e.add_action(&recorder(&log, "after"));

        let err = e.trigger(&()).unwrap_err();
        assert!(matches!(err, EventError::ActionFailed { ref event, .. } if event == "tick"));
        assert_eq!(*log.lock().unwrap(), vec!["before"]);
    }

    #[test]
    fn test_equality_is_order_independent() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = (recorder(&log, "a"), recorder(&log, "b"));

        let mut x = Event::new("tick");
        x.add_action(&a);
        x.add_action(&b);
        let mut y = Event::new("tick");
        y.add_action_with_interval(&b, Interval::from_secs(3));
        y.add_action(&a);

        assert_eq!(x, y);
        assert_eq!(y, x);

        let mut z = Event::new("tock");
        z.add_action(&a);
        z.add_action(&b);
        assert_ne!(x, z);

        y.remove_action(&b);
        assert_ne!(x, y);
    }

    #[test]
    fn test_clone_is_equal_but_independent() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = recorder(&log, "a");
        let mut e = Event::new("tick");
        e.add_action(&a);

        let mut copy = e.clone();
        assert_eq!(copy, e);

        copy.remove_action(&a);
        assert!(e.has_action(&a));
        assert_ne!(copy, e);
    }

    #[test]
    fn test_debug_shows_name_and_count() {
        let mut e: Event<()> = Event::new("tick");
        e.add_action(&Callback::new(|_: &()| {}));
        let s = format!("{e:?}");
        assert!(s.contains("\"tick\""));
        assert!(s.contains("actions: 1"));
    }
}
