//! 可调用对象（Callable）与回调句柄（Callback）
//!
//! `Callable<A>` 是动作目标的能力接口：普通闭包/函数与实现了该 trait 的对象都满足。
//! 非可调用值无法构造 `Callback`，因此“是否可调用”的校验发生在编译期。
//!
//! `Callback<A>` 是可克隆的共享句柄，以内部 `Arc` 的指针作为身份：
//! 同一个句柄（及其克隆）可以订阅到多个事件，行为相同但分别创建的两个闭包是不同的身份。
//!
use std::fmt;
use std::sync::Arc;

/// 动作目标：以参数 `A` 被调用，返回值只用于区分成功与失败
pub trait Callable<A>: Send + Sync {
    fn call(&self, args: &A) -> anyhow::Result<()>;
}

/// 闭包允许的返回类型：`()` 或 `Result<(), E>`
pub trait ActionOutcome: sealed::Sealed {
    fn into_result(self) -> anyhow::Result<()>;
}

impl ActionOutcome for () {
    fn into_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<E> ActionOutcome for Result<(), E>
where
    E: Into<anyhow::Error>,
{
    fn into_result(self) -> anyhow::Result<()> {
        self.map_err(Into::into)
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for () {}
    impl<E> Sealed for Result<(), E> {}
}

impl<A, F, R> Callable<A> for F
where
    F: Fn(&A) -> R + Send + Sync,
    R: ActionOutcome,
{
    fn call(&self, args: &A) -> anyhow::Result<()> {
        self(args).into_result()
    }
}

/// 订阅句柄：包装一个 `Callable`，按指针身份比较
pub struct Callback<A> {
    inner: Arc<dyn Callable<A>>,
}

impl<A> Callback<A> {
    pub fn new<C>(callable: C) -> Self
    where
        C: Callable<A> + 'static,
    {
        Self {
            inner: Arc::new(callable),
        }
    }

    /// 复用已有的共享可调用对象；同一个 `Arc` 得到相同身份
    pub fn from_arc(inner: Arc<dyn Callable<A>>) -> Self {
        Self { inner }
    }

    /// 两个句柄是否指向同一个可调用对象
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    pub(crate) fn invoke(&self, args: &A) -> anyhow::Result<()> {
        self.inner.call(args)
    }

    // 只比较数据指针，忽略 vtable
    fn id(&self) -> *const () {
        Arc::as_ptr(&self.inner) as *const ()
    }
}

impl<A> Clone for Callback<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> PartialEq for Callback<A> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<A> Eq for Callback<A> {}

impl<A> fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback").field(&self.id()).finish()
    }
}
