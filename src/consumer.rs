//! Read-side controller
//!
//! 读端控制器
//!
//! The consumer owns the read position, the consumed terminator count and the record
//! checkpoint. What it may read is decided from synchronized copies of the producer's
//! counters:
//! - plain mode: anything below the synchronized write position
//! - packet mode: only records whose terminator count has been synchronized, so a partially
//!   written record is never visible
//!
//! 消费者独占读位置、已消费终止符计数和记录检查点。可读范围由生产者计数器的同步副本决定：
//! - 普通模式：同步写位置之前的所有槽
//! - 包模式：仅限终止符计数已同步的记录，因此部分写入的记录永远不可见

use crate::config::Config;
use crate::core::FifoCore;
use crate::error::PopError;
use crate::position::{Position, PositionSpace};
use crate::resync::Resync;
use crate::shim::sync::Arc;
use crate::stage::OutputStage;
use crate::storage::Slot;
use tracing::warn;

/// Consumer half of the FIFO
///
/// FIFO 的消费者端
pub struct Consumer<T> {
    shared: Arc<FifoCore<T>>,

    space: PositionSpace,

    /// Next slot to read from the array
    ///
    /// 下一个要从数组读取的槽
    read: Position,

    /// Read position at the start of the current record
    ///
    /// 当前记录开始处的读位置
    checkpoint: Position,

    /// Consumed terminators (packet mode)
    ///
    /// 已消费的终止符数量（包模式）
    packets: Position,

    write_sync: Resync,

    packets_sync: Resync,

    packet_mode: bool,

    /// Peek reads in progress, the producer sees `checkpoint` instead of `read`
    ///
    /// 正处于窥视读取中，生产者看到的是 `checkpoint` 而不是 `read`
    peeking: bool,

    stage: OutputStage<T>,
}

/// Draining iterator for the FIFO
///
/// FIFO 的消费迭代器
///
/// Pops until nothing is visible to the consumer.
///
/// 持续弹出直到消费者没有可见数据。
pub struct Drain<'a, T> {
    consumer: &'a mut Consumer<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = Slot<T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        // One extra step lets the output stage catch up
        // 额外的一步让输出级跟上
        self.consumer.tick();
        self.consumer.pop().ok()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.consumer.level().unwrap_or(0), None)
    }
}

impl<T> Consumer<T> {
    pub(crate) fn new(shared: Arc<FifoCore<T>>) -> Self {
        let config = *shared.config();
        Self {
            space: *shared.space(),
            read: Position::ZERO,
            checkpoint: Position::ZERO,
            packets: Position::ZERO,
            write_sync: Resync::new(config.sync_stages),
            packets_sync: Resync::new(config.sync_stages),
            packet_mode: config.packet_mode,
            peeking: false,
            stage: OutputStage::new(config.output_stage),
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

    /// Advance one step without popping
    ///
    /// 前进一步但不弹出
    ///
    /// Refreshes the synchronized producer counters and fills the output stage if it is
    /// empty.
    ///
    /// 刷新同步后的生产者计数器，并在输出级为空时将其填充。
    pub fn tick(&mut self) {
        self.observe();
        self.refill_stage();
    }

    /// `true` if the next pop will return a slot
    ///
    /// 若下一次 pop 会返回槽则为 `true`
    ///
    /// Based on the last synchronized producer counters.
    ///
    /// 基于最近一次同步的生产者计数器。
    #[inline]
    pub fn valid(&self) -> bool {
        if self.stage.is_enabled() {
            self.stage.is_occupied()
        } else {
            self.array_visible()
        }
    }

    /// Shorthand for `!valid()`
    ///
    /// `!valid()` 的简写
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.valid()
    }

    /// Number of slots readable by the consumer, `None` in packet mode
    ///
    /// 消费者可读的槽数，包模式下为 `None`
    ///
    /// Packet mode has no glitch-free read level: the synchronized write position includes
    /// slots of records that are not committed yet.
    ///
    /// 包模式下没有无毛刺的读水位：同步写位置包含了尚未提交的记录的槽。
    #[inline]
    pub fn level(&self) -> Option<usize> {
        if self.packet_mode {
            return None;
        }
        let array = self.space.distance(self.read, self.write_sync.output());
        Some(array + usize::from(self.stage.is_occupied()))
    }

    /// Level is at or below the configured almost-empty threshold
    ///
    /// 水位不高于配置的将空阈值
    #[inline]
    pub fn almost_empty(&self) -> bool {
        let threshold = self.shared.config().almost_empty_level;
        match self.level() {
            Some(level) if threshold != 0 => level <= threshold,
            _ => !self.valid(),
        }
    }

    /// Pop the next slot
    ///
    /// 弹出下一个槽
    ///
    /// With the output stage enabled, a slot becomes poppable one step after it became
    /// visible: this step hands out the staged slot and refills the stage.
    ///
    /// 启用输出级时，槽在变为可见后的下一步才能被弹出：本步交出已暂存的槽并重新填充输出级。
    ///
    /// # Errors
    /// Returns `PopError::Empty` if nothing is visible
    ///
    /// # 错误
    /// 若没有可见数据则返回 `PopError::Empty`
    pub fn pop(&mut self) -> Result<Slot<T>, PopError> {
        self.set_peeking(false);
        self.observe();

        if self.stage.is_enabled() {
            let slot = self.stage.take();
            self.refill_stage();
            return slot.ok_or(PopError::Empty);
        }

        if !self.array_visible() {
            return Err(PopError::Empty);
        }
        Ok(self.take())
    }

    /// Borrow the next visible value without consuming it
    ///
    /// 借用下一个可见值但不消费它
    pub fn front(&self) -> Option<&T> {
        if self.stage.is_enabled() {
            return self.stage.front().map(|slot| &slot.value);
        }
        if !self.array_visible() {
            return None;
        }
        unsafe { Some(self.shared.storage().value_at(self.space.index(self.read))) }
    }

    /// Pop one whole record (packet mode)
    ///
    /// 弹出一个完整记录（包模式）
    ///
    /// # Errors
    /// Returns `PopError::Empty` if no complete record is visible
    ///
    /// # 错误
    /// 若没有可见的完整记录则返回 `PopError::Empty`
    pub fn pop_packet(&mut self) -> Result<Vec<T>, PopError> {
        if !self.packet_mode {
            warn!("pop_packet called on a fifo built without packet mode, ignored");
            debug_assert!(false, "pop_packet requires Config::packet_mode");
            return Err(PopError::Empty);
        }

        self.tick();
        if !self.valid() {
            return Err(PopError::Empty);
        }

        // A visible record is fully committed, so every pop below succeeds
        // 可见记录已完整提交，因此下面的每次 pop 都会成功
        let mut packet = Vec::new();
        loop {
            let slot = self.pop()?;
            packet.push(slot.value);
            if slot.last {
                return Ok(packet);
            }
        }
    }

    /// Create a draining iterator
    ///
    /// 创建一个消费迭代器
    ///
    /// # Examples
    ///
    /// ```
    /// let (mut producer, mut consumer) = packetring::new::<i32>(8).unwrap();
    /// producer.push(1).unwrap();
    /// producer.push(2).unwrap();
    /// producer.push(3).unwrap();
    ///
    /// let items: Vec<i32> = consumer.drain().map(|slot| slot.value).collect();
    /// assert_eq!(items, vec![1, 2, 3]);
    /// assert!(consumer.is_empty());
    /// ```
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { consumer: self }
    }

    #[inline]
    fn observe(&mut self) {
        // Terminator count before write position: a record counted here never has slots
        // beyond the write position loaded next
        // 先读终止符计数再读写位置：此处计入的记录，其槽不会超出随后加载的写位置
        if self.packet_mode {
            self.packets_sync.observe(self.shared.packets());
        }
        self.write_sync.observe(self.shared.write());
    }

    /// Something is readable from the array itself
    ///
    /// 数组本身有可读数据
    #[inline]
    fn array_visible(&self) -> bool {
        if self.packet_mode {
            self.packets != self.packets_sync.output()
        } else {
            self.read != self.write_sync.output()
        }
    }

    fn refill_stage(&mut self) {
        if self.stage.is_enabled() && !self.stage.is_occupied() && self.array_visible() {
            let slot = self.take();
            self.stage.load(slot);
        }
    }

    /// Move the slot at the read position out of the array
    ///
    /// 将读位置处的槽移出数组
    fn take(&mut self) -> Slot<T> {
        let index = self.space.index(self.read);
        let slot = unsafe { self.shared.storage().read(index) };
        self.read = self.space.advance(self.read, 1);

        if slot.last && self.packet_mode {
            self.packets = self.space.advance(self.packets, 1);
            self.checkpoint = self.read;
        }
        self.publish();
        slot
    }

    /// Publish the first position the array still owns
    ///
    /// 发布数组仍然拥有的第一个位置
    #[inline]
    fn publish(&self) {
        let owned = if self.peeking { self.checkpoint } else { self.read };
        self.shared.read().publish(owned);
    }

    /// Switch between peek and normal reads; only allowed between records
    ///
    /// 在窥视读取与普通读取之间切换；仅允许在记录之间进行
    fn set_peeking(&mut self, peeking: bool) {
        if self.peeking == peeking {
            return;
        }

        if self.read != self.checkpoint {
            warn!(peeking, "peek mode toggled in the middle of a record");
            debug_assert!(false, "peek mode may only change between records");

            if peeking {
                // Nothing before `read` is in the array any more
                // `read` 之前的槽已不在数组中
                self.checkpoint = self.read;
            } else {
                // The peeked part of the record counts as consumed
                // 记录中已窥视的部分视为已消费
                for pos in self.space.range(self.checkpoint, self.read) {
                    unsafe {
                        self.shared.storage().drop_at(self.space.index(pos));
                    }
                }
                self.checkpoint = self.read;
            }
        }

        self.peeking = peeking;
        self.publish();
    }
}

impl<T: Clone> Consumer<T> {
    /// Pop the next slot in peek mode
    ///
    /// 以窥视模式弹出下一个槽
    ///
    /// Non-terminator slots advance as usual; popping the terminator rewinds to the start
    /// of the record, so the same record can be read again. The record is only released
    /// by reading it with [`Consumer::pop`]. Without peek support this is a plain pop.
    ///
    /// 非终止符槽照常前进；弹出终止符时回退到记录开头，因此同一记录可以再次读取。
    /// 只有通过 [`Consumer::pop`] 读取后记录才会被释放。未启用窥视时等同于普通 pop。
    ///
    /// # Errors
    /// Returns `PopError::Empty` if nothing is visible
    ///
    /// # 错误
    /// 若没有可见数据则返回 `PopError::Empty`
    pub fn peek_pop(&mut self) -> Result<Slot<T>, PopError> {
        if !self.shared.config().peek_mode {
            return self.pop();
        }

        self.set_peeking(true);
        self.observe();
        if !self.array_visible() {
            return Err(PopError::Empty);
        }

        let index = self.space.index(self.read);
        let slot = unsafe { self.shared.storage().clone_at(index) };
        self.read = if slot.last {
            self.checkpoint
        } else {
            self.space.advance(self.read, 1)
        };
        Ok(slot)
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use crate::config::Config;
    use crate::error::PopError;
    use crate::storage::Slot;
    use crate::{new, with_config};

    #[test]
    fn test_basic_pop() {
        let (mut producer, mut consumer) = new::<i32>(4).unwrap();

        producer.push(1).unwrap();
        assert_eq!(consumer.pop(), Ok(Slot::data(1)));
        assert_eq!(consumer.pop(), Err(PopError::Empty));
    }

    #[test]
    fn test_front_does_not_consume() {
        let (mut producer, mut consumer) = new::<i32>(4).unwrap();

        producer.push(42).unwrap();
        consumer.tick();
        assert_eq!(consumer.front(), Some(&42));
        assert_eq!(consumer.level(), Some(1));
        assert_eq!(consumer.pop().unwrap().value, 42);
        assert_eq!(consumer.front(), None);
    }

    #[test]
    fn test_level_is_none_in_packet_mode() {
        let (mut producer, mut consumer) = with_config::<i32>(Config::packet(4)).unwrap();

        producer.push_last(1).unwrap();
        consumer.tick();
        assert!(consumer.valid());
        assert_eq!(consumer.level(), None);
    }

    #[test]
    fn test_almost_empty_threshold() {
        let (mut producer, mut consumer) =
            with_config::<i32>(Config::new(8).almost_empty_level(2)).unwrap();

        for i in 0..3 {
            producer.push(i).unwrap();
        }
        consumer.tick();
        assert!(!consumer.almost_empty());

        consumer.pop().unwrap();
        assert!(consumer.almost_empty());
    }

    #[test]
    fn test_peek_without_support_is_plain_pop() {
        let (mut producer, mut consumer) = with_config::<i32>(Config::packet(4)).unwrap();

        producer.push_last(5).unwrap();
        assert_eq!(consumer.peek_pop(), Ok(Slot::terminator(5)));
        assert_eq!(consumer.peek_pop(), Err(PopError::Empty));
    }
}
