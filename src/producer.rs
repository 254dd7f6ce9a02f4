//! Write-side controller
//!
//! 写端控制器
//!
//! The producer owns the write position, the committed terminator count and the rollback
//! checkpoint. It sees the consumer only through a synchronized, possibly stale copy of the
//! read position, so `ready` can under-promise space for a few steps but never over-promise.
//!
//! 生产者独占写位置、已提交终止符计数和回滚检查点。
//! 它只能通过读位置的同步副本（可能过时）看到消费者，
//! 因此 `ready` 可能在几个步骤内少报空间，但绝不会多报。

use crate::config::Config;
use crate::core::FifoCore;
use crate::error::PushError;
use crate::position::{Position, PositionSpace};
use crate::resync::Resync;
use crate::shim::sync::Arc;
use crate::stage::OutputStage;
use crate::storage::Slot;
use tracing::{trace, warn};

/// Producer half of the FIFO
///
/// FIFO 的生产者端
pub struct Producer<T> {
    shared: Arc<FifoCore<T>>,

    space: PositionSpace,

    write: Position,

    /// Write position right after the last committed terminator
    ///
    /// 最近一次提交的终止符之后的写位置
    checkpoint: Position,

    /// Committed terminators (packet mode)
    ///
    /// 已提交的终止符数量（包模式）
    packets: Position,

    read_sync: Resync,

    /// Slots the output stage keeps reserved
    ///
    /// 输出级预留的槽数
    reserved: usize,
}

impl<T> Producer<T> {
    pub(crate) fn new(shared: Arc<FifoCore<T>>) -> Self {
        let config = *shared.config();
        Self {
            space: *shared.space(),
            write: Position::ZERO,
            checkpoint: Position::ZERO,
            packets: Position::ZERO,
            read_sync: Resync::new(config.sync_stages),
            reserved: OutputStage::<T>::reserved(config.output_stage),
            shared,
        }
    }

    /// Number of slots in the storage array
    ///
    /// 存储数组的槽数
    #[inline]
    pub fn capacity(&self) -> usize {
        self.space.capacity()
    }

    /// Configuration the FIFO was built with
    ///
    /// 构建 FIFO 时使用的配置
    #[inline]
    pub fn config(&self) -> &Config {
        self.shared.config()
    }

    /// Advance one step without writing: refresh the synchronized read position
    ///
    /// 前进一步但不写入：刷新同步后的读位置
    #[inline]
    pub fn tick(&mut self) {
        self.read_sync.observe(self.shared.read());
    }

    /// Occupancy as seen by the producer
    ///
    /// 生产者视角的占用量
    ///
    /// Counts uncommitted slots of the current record and, with the output stage enabled,
    /// one extra slot for the stage.
    ///
    /// 包含当前记录中未提交的槽；启用输出级时，额外为输出级计入一个槽。
    #[inline]
    pub fn level(&self) -> usize {
        self.space.distance(self.read_sync.output(), self.write) + self.reserved
    }

    /// Free slots as seen by the producer, never more than really free
    ///
    /// 生产者视角的空闲槽数，绝不多于实际空闲数
    #[inline]
    pub fn free_space(&self) -> usize {
        self.capacity() - self.level()
    }

    /// `true` if the next push will be accepted
    ///
    /// 若下一次 push 会被接受则为 `true`
    ///
    /// Based on the last synchronized read position; a push refreshes it first, so a push
    /// may still succeed while this reports `false`.
    ///
    /// 基于最近一次同步的读位置；push 会先刷新它，因此即使此处返回 `false`，push 仍可能成功。
    #[inline]
    pub fn ready(&self) -> bool {
        self.level() < self.capacity()
    }

    /// Shorthand for `!ready()`
    ///
    /// `!ready()` 的简写
    #[inline]
    pub fn is_full(&self) -> bool {
        !self.ready()
    }

    /// Level has reached the configured almost-full threshold
    ///
    /// 水位已达到配置的将满阈值
    #[inline]
    pub fn almost_full(&self) -> bool {
        let threshold = self.shared.config().almost_full_threshold();
        if threshold == self.capacity() {
            !self.ready()
        } else {
            self.level() >= threshold
        }
    }

    /// Push a slot that does not end a record
    ///
    /// 推送一个不结束记录的槽
    ///
    /// # Errors
    /// Returns `PushError::Full` with the value if there is no room
    ///
    /// # 错误
    /// 若没有空间则返回携带该值的 `PushError::Full`
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), PushError<T>> {
        self.push_slot(Slot::data(value))
    }

    /// Push a slot that ends a record, committing it in packet mode
    ///
    /// 推送一个结束记录的槽，在包模式下提交该记录
    #[inline]
    pub fn push_last(&mut self, value: T) -> Result<(), PushError<T>> {
        self.push_slot(Slot::terminator(value))
    }

    /// Push a slot with an explicit terminator flag
    ///
    /// 推送带显式终止符标志的槽
    ///
    /// The flag is only stored when the terminator tag is enabled.
    ///
    /// 仅在启用终止符标记时才会存储该标志。
    pub fn push_slot(&mut self, slot: Slot<T>) -> Result<(), PushError<T>> {
        self.tick();
        if !self.ready() {
            return Err(PushError::Full(slot.value));
        }

        let last = slot.last;
        self.store(slot);
        self.shared.write().publish(self.write);

        if last && self.shared.config().packet_mode {
            self.packets = self.space.advance(self.packets, 1);
            self.checkpoint = self.write;
            // Write position first, so the consumer never counts a record whose slots it
            // cannot see yet
            // 先发布写位置，确保消费者不会计入其槽尚不可见的记录
            self.shared.packets().publish(self.packets);
        }

        Ok(())
    }

    /// Discard every slot written since the last committed terminator
    ///
    /// 丢弃自上一个已提交终止符以来写入的所有槽
    ///
    /// Returns the number of slots discarded. The consumer needs no notification: it only
    /// ever sees committed records.
    ///
    /// 返回被丢弃的槽数。无需通知消费者：它只会看到已提交的记录。
    pub fn drop_packet(&mut self) -> usize {
        if !self.shared.config().drop_packet {
            warn!("drop_packet called on a fifo built without drop support, ignored");
            debug_assert!(false, "drop_packet requires Config::drop_packet");
            return 0;
        }
        self.rollback()
    }

    /// Push a terminator and drop the record in the same step
    ///
    /// 在同一步中推送终止符并丢弃该记录
    ///
    /// The drop wins: the whole record, this terminator included, is discarded and nothing
    /// is committed. If there was no room the value is handed back, but the record is
    /// dropped all the same.
    ///
    /// 丢弃优先：整个记录（包括此终止符）都被丢弃，不会提交任何内容。
    /// 若没有空间，值会被返回，但记录同样会被丢弃。
    pub fn push_last_and_drop(&mut self, value: T) -> Result<(), PushError<T>> {
        if !self.shared.config().drop_packet {
            warn!("push_last_and_drop called on a fifo built without drop support, pushing only");
            debug_assert!(false, "push_last_and_drop requires Config::drop_packet");
            return self.push_last(value);
        }

        self.tick();
        let result = if self.ready() {
            self.store(Slot::terminator(value));
            Ok(())
        } else {
            Err(PushError::Full(value))
        };
        self.rollback();
        result
    }

    /// Write `slot` at the write position and advance it, without publishing
    ///
    /// 在写位置写入 `slot` 并前进，但不发布
    #[inline]
    fn store(&mut self, slot: Slot<T>) {
        let index = self.space.index(self.write);
        unsafe {
            self.shared.storage().write(index, slot);
        }
        self.write = self.space.advance(self.write, 1);
    }

    fn rollback(&mut self) -> usize {
        let discarded = self.space.distance(self.checkpoint, self.write);
        for pos in self.space.range(self.checkpoint, self.write) {
            unsafe {
                self.shared.storage().drop_at(self.space.index(pos));
            }
        }
        self.write = self.checkpoint;
        self.shared.write().publish(self.write);
        trace!(discarded, "dropped uncommitted packet");
        discarded
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use crate::config::Config;
    use crate::error::PushError;
    use crate::with_config;

    #[test]
    fn test_level_counts_uncommitted() {
        let (mut producer, _consumer) = with_config::<u32>(Config::packet(8)).unwrap();

        producer.push(1).unwrap();
        producer.push(2).unwrap();
        assert_eq!(producer.level(), 2);
        assert_eq!(producer.free_space(), 6);
    }

    #[test]
    fn test_full_returns_value() {
        let (mut producer, _consumer) = with_config::<u32>(Config::new(2)).unwrap();

        producer.push(1).unwrap();
        producer.push(2).unwrap();
        assert!(!producer.ready());
        assert_eq!(producer.push(3), Err(PushError::Full(3)));
    }

    #[test]
    fn test_rollback_restores_level() {
        let config = Config::packet(8).drop_packet(true);
        let (mut producer, _consumer) = with_config::<u32>(config).unwrap();

        producer.push_last(1).unwrap();
        producer.push(2).unwrap();
        producer.push(3).unwrap();
        assert_eq!(producer.level(), 3);

        assert_eq!(producer.drop_packet(), 2);
        assert_eq!(producer.level(), 1);

        // Nothing left to drop
        assert_eq!(producer.drop_packet(), 0);
    }

    #[test]
    fn test_output_stage_reserves_one_slot() {
        let (mut producer, _consumer) = with_config::<u32>(Config::new(4).output_stage(true)).unwrap();

        assert_eq!(producer.level(), 1);
        assert_eq!(producer.free_space(), 3);

        for i in 0..3 {
            producer.push(i).unwrap();
        }
        assert!(!producer.ready());
    }

    #[test]
    fn test_almost_full_threshold() {
        let (mut producer, _consumer) = with_config::<u32>(Config::new(8).almost_full_level(3)).unwrap();

        producer.push(0).unwrap();
        producer.push(1).unwrap();
        assert!(!producer.almost_full());
        producer.push(2).unwrap();
        assert!(producer.almost_full());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "drop_packet requires"))]
    fn test_drop_without_support_is_ignored() {
        let (mut producer, _consumer) = with_config::<u32>(Config::packet(8)).unwrap();

        producer.push(1).unwrap();
        assert_eq!(producer.drop_packet(), 0);
        assert_eq!(producer.level(), 1);
    }
}
