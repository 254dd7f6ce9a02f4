//! FIFO configuration
//!
//! FIFO 配置
//!
//! A [`Config`] describes the shape of one FIFO. Setters chain, and [`Config::validate`] runs
//! when the FIFO is built, so a bad combination fails before any handle exists.
//!
//! [`Config`] 描述一个 FIFO 的形态。设置方法可链式调用，
//! [`Config::validate`] 在构建 FIFO 时执行，因此错误组合会在任何句柄存在之前失败。
//!
//! ```
//! use packetring::Config;
//!
//! let config = Config::new(16)
//!     .terminator_tag(true)
//!     .packet_mode(true)
//!     .drop_packet(true);
//! assert!(config.validate().is_ok());
//!
//! // Peek mode without packet mode is rejected
//! assert!(Config::new(16).peek_mode(true).validate().is_err());
//! ```

use crate::error::ConfigError;
use crate::position::MAX_CAPACITY;

/// Construction parameters of a FIFO
///
/// FIFO 的构造参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Number of slots in the storage array, a power of two
    ///
    /// 存储数组的槽数，必须是 2 的幂次
    pub capacity: usize,

    /// Store a terminator flag with every slot
    ///
    /// 为每个槽存储终止符标志
    pub terminator_tag: bool,

    /// Withhold records from the consumer until their terminator is committed
    ///
    /// 在记录的终止符提交之前对消费者隐藏该记录
    pub packet_mode: bool,

    /// Allow the producer to roll back an uncommitted record
    ///
    /// 允许生产者回滚未提交的记录
    pub drop_packet: bool,

    /// Allow the consumer to re-read records
    ///
    /// 允许消费者重复读取记录
    pub peek_mode: bool,

    /// Put a one-slot buffer in front of the consumer
    ///
    /// 在消费者之前放置一个单槽缓冲
    pub output_stage: bool,

    /// Producer level at which `almost_full` asserts, `None` for `capacity`
    ///
    /// `almost_full` 置位时的生产者水位，`None` 表示等于 `capacity`
    pub almost_full_level: Option<usize>,

    /// Consumer level at or below which `almost_empty` asserts
    ///
    /// `almost_empty` 置位时的消费者水位上限
    pub almost_empty_level: usize,

    /// Depth of each pointer synchronizer, in observer steps
    ///
    /// 每个指针同步器的深度，以观察方步数计
    pub sync_stages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 16,
            terminator_tag: false,
            packet_mode: false,
            drop_packet: false,
            peek_mode: false,
            output_stage: false,
            almost_full_level: None,
            almost_empty_level: 0,
            sync_stages: 1,
        }
    }
}

impl Config {
    /// Plain FIFO of `capacity` slots
    ///
    /// 容量为 `capacity` 个槽的普通 FIFO
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Packet FIFO: terminator tags and packet mode enabled
    ///
    /// 包模式 FIFO：启用终止符标记和包模式
    pub fn packet(capacity: usize) -> Self {
        Self::new(capacity).terminator_tag(true).packet_mode(true)
    }

    /// Store a terminator flag with every slot
    ///
    /// 为每个槽存储终止符标志
    pub fn terminator_tag(mut self, enable: bool) -> Self {
        self.terminator_tag = enable;
        self
    }

    /// Hide records until their terminator is committed; needs the terminator tag
    ///
    /// 在终止符提交之前隐藏记录；需要启用终止符标记
    pub fn packet_mode(mut self, enable: bool) -> Self {
        self.packet_mode = enable;
        self
    }

    /// Allow `Producer::drop_packet`; needs packet mode
    ///
    /// 允许 `Producer::drop_packet`；需要包模式
    pub fn drop_packet(mut self, enable: bool) -> Self {
        self.drop_packet = enable;
        self
    }

    /// Allow `Consumer::peek_pop` to re-read records; needs packet mode
    ///
    /// 允许 `Consumer::peek_pop` 重复读取记录；需要包模式
    pub fn peek_mode(mut self, enable: bool) -> Self {
        self.peek_mode = enable;
        self
    }

    /// Put a one-slot buffer in front of the consumer
    ///
    /// 在消费者之前放置一个单槽缓冲
    pub fn output_stage(mut self, enable: bool) -> Self {
        self.output_stage = enable;
        self
    }

    /// Producer level at which `almost_full` asserts, in `1..=capacity`
    ///
    /// `almost_full` 置位时的生产者水位，范围为 `1..=capacity`
    pub fn almost_full_level(mut self, level: usize) -> Self {
        self.almost_full_level = Some(level);
        self
    }

    /// Consumer level at or below which `almost_empty` asserts, `0` aliases `!valid()`
    ///
    /// `almost_empty` 置位时的消费者水位上限，`0` 等同于 `!valid()`
    pub fn almost_empty_level(mut self, level: usize) -> Self {
        self.almost_empty_level = level;
        self
    }

    /// Depth of each pointer synchronizer, at least 1
    ///
    /// 每个指针同步器的深度，至少为 1
    pub fn sync_stages(mut self, stages: usize) -> Self {
        self.sync_stages = stages;
        self
    }

    /// Effective almost-full threshold
    ///
    /// 实际生效的将满阈值
    #[inline]
    pub fn almost_full_threshold(&self) -> usize {
        self.almost_full_level.unwrap_or(self.capacity)
    }

    /// Check every constraint between the parameters
    ///
    /// 检查参数之间的所有约束
    ///
    /// # Errors
    /// The first violated constraint, see [`ConfigError`]
    ///
    /// # 错误
    /// 第一个被违反的约束，参见 [`ConfigError`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let capacity = self.capacity;
        if !capacity.is_power_of_two() {
            return Err(ConfigError::CapacityNotPowerOfTwo(capacity));
        }
        if capacity > MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                capacity,
                max: MAX_CAPACITY,
            });
        }

        if self.packet_mode && !self.terminator_tag {
            return Err(ConfigError::PacketModeWithoutTerminatorTag);
        }
        if self.drop_packet && !self.packet_mode {
            return Err(ConfigError::DropWithoutPacketMode);
        }
        if self.peek_mode && !self.packet_mode {
            return Err(ConfigError::PeekWithoutPacketMode);
        }
        if self.peek_mode && self.output_stage {
            return Err(ConfigError::PeekWithOutputStage);
        }
        // The stage alone would fill a single-slot array
        if self.output_stage && capacity < 2 {
            return Err(ConfigError::OutputStageWithSingleSlot);
        }

        let full = self.almost_full_threshold();
        if full == 0 || full > capacity {
            return Err(ConfigError::AlmostFullLevelOutOfRange {
                level: full,
                capacity,
            });
        }
        if self.almost_empty_level >= capacity {
            return Err(ConfigError::AlmostEmptyLevelOutOfRange {
                level: self.almost_empty_level,
                capacity,
            });
        }
        if self.packet_mode && self.almost_empty_level != 0 {
            return Err(ConfigError::AlmostEmptyLevelInPacketMode(
                self.almost_empty_level,
            ));
        }

        if self.sync_stages == 0 {
            return Err(ConfigError::ZeroSyncStages);
        }

        Ok(())
    }
}
