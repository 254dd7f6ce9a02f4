//! Shared FIFO state - what both handles point at
//!
//! 共享 FIFO 状态 - 两个句柄共同指向的数据
//!
//! This module holds the parts that are not owned by either side:
//! - the storage array
//! - the three published counters (write position, committed terminators, read position)
//! - the validated configuration and its position space
//!
//! 此模块保存不归任何一端独占的部分：
//! - 存储数组
//! - 三个发布计数器（写位置、已提交终止符数、读位置）
//! - 已校验的配置及其位置空间

use crate::config::Config;
use crate::position::{Position, PositionSpace};
use crate::resync::PublishedCounter;
use crate::storage::Storage;

/// Core FIFO storage structure
///
/// 核心 FIFO 存储结构
pub(crate) struct FifoCore<T> {
    storage: Storage<T>,

    space: PositionSpace,

    config: Config,

    /// Write position, published by the producer after every push and rollback
    ///
    /// 写位置，生产者在每次 push 和回滚后发布
    write: PublishedCounter,

    /// Committed terminator count, published by the producer (packet mode only)
    ///
    /// 已提交终止符计数，由生产者发布（仅包模式）
    packets: PublishedCounter,

    /// First position still owned by the array, published by the consumer
    ///
    /// 仍归数组所有的第一个位置，由消费者发布
    read: PublishedCounter,
}

impl<T> FifoCore<T> {
    /// Create the core for an already validated configuration
    ///
    /// 为已校验的配置创建核心
    pub(crate) fn new(config: Config) -> Self {
        debug_assert!(config.validate().is_ok());
        Self {
            storage: Storage::with_capacity(config.capacity, config.terminator_tag),
            space: PositionSpace::new(config.capacity),
            config,
            write: PublishedCounter::new(),
            packets: PublishedCounter::new(),
            read: PublishedCounter::new(),
        }
    }

    #[inline]
    pub(crate) fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    #[inline]
    pub(crate) fn space(&self) -> &PositionSpace {
        &self.space
    }

    #[inline]
    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub(crate) fn write(&self) -> &PublishedCounter {
        &self.write
    }

    #[inline]
    pub(crate) fn packets(&self) -> &PublishedCounter {
        &self.packets
    }

    #[inline]
    pub(crate) fn read(&self) -> &PublishedCounter {
        &self.read
    }
}

impl<T> Drop for FifoCore<T> {
    fn drop(&mut self) {
        // Both handles are gone; everything in [read, write) is still owned by the array,
        // including records that were never committed
        // 两个句柄都已释放；[read, write) 内的所有槽仍归数组所有，包括从未提交的记录
        let read: Position = self.read.load();
        let write: Position = self.write.load();
        for pos in self.space.range(read, write) {
            unsafe {
                self.storage.drop_at(self.space.index(pos));
            }
        }
    }
}
