//! Pointer synchronizer - cross-context publication of a position counter
//!
//! 指针同步器 - 跨执行上下文发布位置计数器
//!
//! The owning side calls [`PublishedCounter::publish`] after every change to its counter.
//! The observing side keeps a [`Resync`] shift register and feeds it one fresh load per step
//! of its own. What the observer acts on is the register output, which:
//! - is always a value that was really published (a single atomic word is never torn)
//! - lags the owner by at most `stages` observer steps
//!
//! 持有方在每次修改计数器后调用 [`PublishedCounter::publish`]。
//! 观察方持有一个 [`Resync`] 移位寄存器，并在自己的每一步中向其送入一次新加载的值。
//! 观察方所依据的是寄存器的输出，它：
//! - 总是某个真实发布过的值（单个原子字不会被撕裂）
//! - 最多落后持有方 `stages` 个观察方步骤

use crate::position::Position;
use crate::shim::atomic::{AtomicUsize, Ordering};
use crossbeam_utils::CachePadded;

/// A counter published by exactly one side
///
/// 仅由一端发布的计数器
pub(crate) struct PublishedCounter {
    value: CachePadded<AtomicUsize>,
}

impl PublishedCounter {
    pub(crate) fn new() -> Self {
        Self {
            value: CachePadded::new(AtomicUsize::new(0)),
        }
    }

    /// Publish a new value
    ///
    /// 发布新值
    ///
    /// Release ordering: every slot write the owner made before this call is visible to an
    /// observer that loads this value.
    ///
    /// Release 顺序：持有方在此调用之前的所有槽写入，对加载到该值的观察方均可见。
    #[inline]
    pub(crate) fn publish(&self, pos: Position) {
        self.value.store(pos.get(), Ordering::Release);
    }

    /// Load the most recently published value
    ///
    /// 加载最近发布的值
    #[inline]
    pub(crate) fn load(&self) -> Position {
        Position::from_raw(self.value.load(Ordering::Acquire))
    }
}

/// Observer-side shift register
///
/// 观察方的移位寄存器
#[derive(Debug)]
pub(crate) struct Resync {
    stages: Box<[Position]>,
}

impl Resync {
    /// Create a register with `stages` stages, all holding the initial counter value
    ///
    /// 创建具有 `stages` 级的寄存器，每一级都保存初始计数器值
    pub(crate) fn new(stages: usize) -> Self {
        debug_assert!(stages >= 1);
        Self {
            stages: vec![Position::ZERO; stages].into_boxed_slice(),
        }
    }

    /// Shift `fresh` in and return the new output
    ///
    /// 移入 `fresh` 并返回新的输出
    #[inline]
    pub(crate) fn step(&mut self, fresh: Position) -> Position {
        let last = self.stages.len() - 1;
        self.stages.copy_within(0..last, 1);
        self.stages[0] = fresh;
        self.stages[last]
    }

    /// Current output, without stepping
    ///
    /// 当前输出（不推进）
    #[inline]
    pub(crate) fn output(&self) -> Position {
        self.stages[self.stages.len() - 1]
    }

    /// Observe `counter` for one step
    ///
    /// 对 `counter` 进行一步观察
    #[inline]
    pub(crate) fn observe(&mut self, counter: &PublishedCounter) -> Position {
        self.step(counter.load())
    }
}
