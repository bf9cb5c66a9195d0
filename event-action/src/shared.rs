//! 线程间共享的事件（SharedEvent）
//!
//! `Event` 本身要求 `&mut self` 才能修改或触发；需要在多个线程或在动作内部
//! 回调同一事件时，使用 `SharedEvent`：
//! - 所有操作在互斥锁内修改动作列表；
//! - `trigger` 先在锁内预占本次到期的动作快照，释放锁后再逐个执行，
//!   因此动作内部可以安全地增删同一事件的动作，改动从下一次触发开始生效；
//! - 动作执行成功后再次记录执行时间；失败时中止本次触发，
//!   失败动作及其后尚未执行的动作恢复为预占前的时间戳。
//!
//! 动作若持有自身所在事件的 `SharedEvent`，会形成 `Arc` 循环引用，
//! 在该动作被移除前事件不会释放；此类动作应持有 `downgrade` 得到的 `WeakSharedEvent`。
//!
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::callable::Callback;
use crate::error::{EventError, EventResult};
use crate::event::Event;
use crate::interval::Interval;

pub struct SharedEvent<A> {
    inner: Arc<Mutex<Event<A>>>,
}

impl<A> SharedEvent<A> {
    pub fn new(event: Event<A>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(event)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Event<A>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn name(&self) -> String {
        self.lock().name().to_string()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn add_action(&self, callback: &Callback<A>) {
        self.lock().add_action(callback);
    }

    pub fn add_action_with_interval(&self, callback: &Callback<A>, interval: Interval) {
        self.lock().add_action_with_interval(callback, interval);
    }

    pub fn add_action_every_secs(&self, callback: &Callback<A>, secs: f64) -> EventResult<()> {
        self.lock().add_action_every_secs(callback, secs)
    }

    pub fn remove_action(&self, callback: &Callback<A>) {
        self.lock().remove_action(callback);
    }

    pub fn remove_all_actions(&self) {
        self.lock().remove_all_actions();
    }

    pub fn has_action(&self, callback: &Callback<A>) -> bool {
        self.lock().has_action(callback)
    }

    /// 执行本次到期的动作快照
    ///
    /// 到期动作在执行前即被预占，并发触发不会让同一节流动作重复执行。
    pub fn trigger(&self, args: &A) -> EventResult<()> {
        let (name, claims) = {
            let mut event = self.lock();
            (event.name().to_string(), event.claim_due())
        };

        for (i, claim) in claims.iter().enumerate() {
            if let Err(source) = claim.callback.invoke(args) {
                self.lock().release_claims(&claims[i..]);
                tracing::debug!(event = %name, error = %source, "action failed, trigger aborted");
                return Err(EventError::action_failed(name, source));
            }
            self.lock().confirm_claim(claim);
        }

        Ok(())
    }

    /// 不持有所有权的句柄，供需要引用自身事件的动作使用
    pub fn downgrade(&self) -> WeakSharedEvent<A> {
        WeakSharedEvent {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// 复制当前事件状态
    pub fn snapshot(&self) -> Event<A> {
        self.lock().clone()
    }
}

impl<A> Clone for SharedEvent<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// `SharedEvent` 的弱引用
pub struct WeakSharedEvent<A> {
    inner: Weak<Mutex<Event<A>>>,
}

impl<A> WeakSharedEvent<A> {
    /// 事件已释放时返回 `None`
    pub fn upgrade(&self) -> Option<SharedEvent<A>> {
        self.inner.upgrade().map(|inner| SharedEvent { inner })
    }
}

impl<A> Clone for WeakSharedEvent<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<A> From<Event<A>> for SharedEvent<A> {
    fn from(event: Event<A>) -> Self {
        Self::new(event)
    }
}

impl<A> fmt::Debug for SharedEvent<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedEvent").field(&*self.lock()).finish()
    }
}
