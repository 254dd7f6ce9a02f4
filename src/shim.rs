//! Switches the published counters, the slot cells and the shared `Arc` between `std` and `loom`.
//!
//! 在 `std` 与 `loom` 之间切换发布计数器、槽单元和共享 `Arc`。
//!
//! Everything that crosses between the producer and the consumer goes through these
//! re-exports, so the `loom` feature can model-check the whole publication protocol.
//!
//! 生产者与消费者之间的所有跨端交互都经过这些重导出，
//! 因此启用 `loom` 特性即可对整个发布协议进行模型检查。

#[cfg(not(feature = "loom"))]
pub(crate) mod atomic {
    pub use std::sync::atomic::{AtomicUsize, Ordering};
}

#[cfg(feature = "loom")]
pub(crate) mod atomic {
    pub use loom::sync::atomic::{AtomicUsize, Ordering};
}

#[cfg(not(feature = "loom"))]
pub(crate) mod sync {
    pub use std::sync::Arc;
}

#[cfg(feature = "loom")]
pub(crate) mod sync {
    pub use loom::sync::Arc;
}

#[cfg(not(feature = "loom"))]
pub(crate) mod cell {
    /// `std` cell exposing the closure accessors of `loom::cell::UnsafeCell`
    ///
    /// 提供与 `loom::cell::UnsafeCell` 相同闭包访问方式的 `std` 单元
    #[derive(Debug)]
    pub(crate) struct UnsafeCell<T>(std::cell::UnsafeCell<T>);

    impl<T> UnsafeCell<T> {
        #[inline]
        pub(crate) fn new(value: T) -> Self {
            Self(std::cell::UnsafeCell::new(value))
        }

        #[inline]
        pub(crate) fn with<R>(&self, f: impl FnOnce(*const T) -> R) -> R {
            f(self.0.get())
        }

        #[inline]
        pub(crate) fn with_mut<R>(&self, f: impl FnOnce(*mut T) -> R) -> R {
            f(self.0.get())
        }
    }
}

#[cfg(feature = "loom")]
pub(crate) mod cell {
    pub(crate) use loom::cell::UnsafeCell;
}
