/// Storage array - fixed-size slots with optional terminator tags
///
/// 存储数组 - 固定大小的槽，可选终止符标记
///
/// The array does no synchronization of its own. The producer only touches slots in
/// `[read, write)`'s complement and the consumer only touches committed slots in `[read, write)`,
/// so the two sides never access the same slot at the same time.
///
/// 存储数组自身不做任何同步。生产者只访问 `[read, write)` 之外的槽，
/// 消费者只访问 `[read, write)` 之内已提交的槽，因此两端永远不会同时访问同一个槽。
use crate::shim::cell::UnsafeCell;
use std::mem::MaybeUninit;

/// One transfer unit: a payload and its terminator flag
///
/// 一个传输单元：载荷及其终止符标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot<T> {
    /// Payload
    ///
    /// 载荷
    pub value: T,

    /// `true` if this slot ends a record
    ///
    /// 若此槽结束一个记录则为 `true`
    pub last: bool,
}

impl<T> Slot<T> {
    /// A slot with an explicit terminator flag
    ///
    /// 带显式终止符标志的槽
    #[inline]
    pub fn new(value: T, last: bool) -> Self {
        Self { value, last }
    }

    /// A slot that does not end a record
    ///
    /// 不结束记录的槽
    #[inline]
    pub fn data(value: T) -> Self {
        Self { value, last: false }
    }

    /// A slot that ends a record
    ///
    /// 结束记录的槽
    #[inline]
    pub fn terminator(value: T) -> Self {
        Self { value, last: true }
    }

    /// Take the payload, discarding the flag
    ///
    /// 取出载荷并丢弃标志
    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }
}

pub(crate) struct Storage<T> {
    values: Box<[UnsafeCell<MaybeUninit<T>>]>,

    /// Present only when terminator tags are enabled
    ///
    /// 仅在启用终止符标记时存在
    tags: Option<Box<[UnsafeCell<bool>]>>,
}

impl<T> Storage<T> {
    pub(crate) fn with_capacity(capacity: usize, tagged: bool) -> Self {
        let values = (0..capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();
        let tags = tagged.then(|| (0..capacity).map(|_| UnsafeCell::new(false)).collect());
        Self { values, tags }
    }

    #[cfg(all(test, not(feature = "loom")))]
    pub(crate) fn is_tagged(&self) -> bool {
        self.tags.is_some()
    }

    /// Store `slot` at `index`
    ///
    /// 在 `index` 处存入 `slot`
    ///
    /// # Safety
    /// - `index` < capacity
    /// - the slot at `index` is free (not initialized) and owned by the caller's side
    ///
    /// # 安全性
    /// - `index` < 容量
    /// - `index` 处的槽是空闲的（未初始化），并归调用方所在端所有
    #[inline]
    pub(crate) unsafe fn write(&self, index: usize, slot: Slot<T>) {
        unsafe {
            self.values
                .get_unchecked(index)
                .with_mut(|ptr| (*ptr).write(slot.value));
            if let Some(tags) = &self.tags {
                tags.get_unchecked(index).with_mut(|ptr| *ptr = slot.last);
            }
        }
    }

    /// Move the slot at `index` out, leaving it uninitialized
    ///
    /// 将 `index` 处的槽移出，使其变为未初始化
    ///
    /// # Safety
    /// - `index` < capacity
    /// - the slot at `index` is initialized and owned by the caller's side
    ///
    /// # 安全性
    /// - `index` < 容量
    /// - `index` 处的槽已初始化，并归调用方所在端所有
    #[inline]
    pub(crate) unsafe fn read(&self, index: usize) -> Slot<T> {
        unsafe {
            let value = self
                .values
                .get_unchecked(index)
                .with_mut(|ptr| (*ptr).assume_init_read());
            Slot::new(value, self.last_at(index))
        }
    }

    /// Borrow the value at `index`
    ///
    /// 借用 `index` 处的值
    ///
    /// # Safety
    /// Same as [`Storage::read`]; the slot must stay initialized while the borrow lives.
    ///
    /// 与 [`Storage::read`] 相同；借用存活期间该槽必须保持初始化。
    #[inline]
    pub(crate) unsafe fn value_at(&self, index: usize) -> &T {
        unsafe {
            let ptr = self.values.get_unchecked(index).with(|ptr| ptr);
            (*ptr).assume_init_ref()
        }
    }

    /// Terminator flag at `index`, `false` when tags are disabled
    ///
    /// `index` 处的终止符标志，未启用标记时为 `false`
    ///
    /// # Safety
    /// `index` < capacity and the slot is owned by the caller's side.
    ///
    /// `index` < 容量，且该槽归调用方所在端所有。
    #[inline]
    pub(crate) unsafe fn last_at(&self, index: usize) -> bool {
        match &self.tags {
            Some(tags) => unsafe { tags.get_unchecked(index).with(|ptr| *ptr) },
            None => false,
        }
    }

    /// Drop the value at `index` in place
    ///
    /// 原地 drop `index` 处的值
    ///
    /// # Safety
    /// Same as [`Storage::read`].
    ///
    /// 与 [`Storage::read`] 相同。
    #[inline]
    pub(crate) unsafe fn drop_at(&self, index: usize) {
        unsafe {
            self.values
                .get_unchecked(index)
                .with_mut(|ptr| (*ptr).assume_init_drop());
        }
    }
}

impl<T: Clone> Storage<T> {
    /// Clone the slot at `index`, leaving the original in place
    ///
    /// 克隆 `index` 处的槽，原值保留在原处
    ///
    /// # Safety
    /// Same as [`Storage::read`].
    ///
    /// 与 [`Storage::read`] 相同。
    #[inline]
    pub(crate) unsafe fn clone_at(&self, index: usize) -> Slot<T> {
        unsafe { Slot::new(self.value_at(index).clone(), self.last_at(index)) }
    }
}

// Each slot is accessed by one side at a time, see the module docs
// 每个槽同一时刻只被一端访问，参见模块文档
unsafe impl<T: Send> Send for Storage<T> {}
unsafe impl<T: Send> Sync for Storage<T> {}
