//! Output stage - one slot between the storage array and the consumer
//!
//! 输出级 - 位于存储数组与消费者之间的单个槽
//!
//! A staged slot has already left the array (the read position moved past it) but has not
//! been handed to the caller. The producer therefore always counts the stage as occupied,
//! and under-reports free space by one while the stage is empty.
//!
//! 已暂存的槽已经离开数组（读位置已越过它），但尚未交给调用方。
//! 因此生产者始终将输出级视为已占用，在输出级为空时少报一个空闲槽。

use crate::storage::Slot;

pub(crate) struct OutputStage<T> {
    enabled: bool,
    slot: Option<Slot<T>>,
}

impl<T> OutputStage<T> {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            slot: None,
        }
    }

    #[inline]
    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        self.slot.is_some()
    }

    /// Slots the stage adds to the producer's view of the level
    ///
    /// 输出级在生产者视角水位中额外计入的槽数
    #[inline]
    pub(crate) fn reserved(enabled: bool) -> usize {
        usize::from(enabled)
    }

    #[inline]
    pub(crate) fn take(&mut self) -> Option<Slot<T>> {
        self.slot.take()
    }

    #[inline]
    pub(crate) fn load(&mut self, slot: Slot<T>) {
        debug_assert!(self.enabled && self.slot.is_none());
        self.slot = Some(slot);
    }

    #[inline]
    pub(crate) fn front(&self) -> Option<&Slot<T>> {
        self.slot.as_ref()
    }
}
