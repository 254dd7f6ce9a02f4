//! Error types
//!
//! 错误类型
//!
//! Transfers never fail inside the FIFO; a refused push or pop is reported back to the caller
//! so it can retry. Configuration mistakes are caught once, at construction.
//!
//! 传输在 FIFO 内部不会失败；被拒绝的 push 或 pop 会返回给调用方以便重试。
//! 配置错误在构造时一次性检出。

use thiserror::Error;

/// Error for push operations
///
/// push 操作的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PushError<T> {
    /// No free slot as far as the producer can currently see; the value is handed back
    ///
    /// 在生产者当前可见范围内没有空闲槽；值被原样返回
    #[error("fifo is full")]
    Full(T),
}

impl<T> PushError<T> {
    /// Recover the rejected value
    ///
    /// 取回被拒绝的值
    #[inline]
    pub fn into_inner(self) -> T {
        match self {
            PushError::Full(value) => value,
        }
    }
}

/// Error for pop operations
///
/// pop 操作的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PopError {
    /// Nothing visible to the consumer yet
    ///
    /// 消费者尚无可见数据
    #[error("fifo is empty")]
    Empty,
}

/// Invalid FIFO configuration
///
/// 无效的 FIFO 配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("capacity {0} is not a power of two")]
    CapacityNotPowerOfTwo(usize),

    #[error("capacity {capacity} exceeds the maximum of {max}")]
    CapacityTooLarge { capacity: usize, max: usize },

    #[error("packet mode requires the terminator tag")]
    PacketModeWithoutTerminatorTag,

    #[error("dropping packets requires packet mode")]
    DropWithoutPacketMode,

    #[error("peek mode requires packet mode")]
    PeekWithoutPacketMode,

    #[error("peek mode cannot be combined with the output stage")]
    PeekWithOutputStage,

    #[error("the output stage needs a capacity of at least 2")]
    OutputStageWithSingleSlot,

    #[error("almost full level {level} is outside 1..={capacity}")]
    AlmostFullLevelOutOfRange { level: usize, capacity: usize },

    #[error("almost empty level {level} is outside 0..{capacity}")]
    AlmostEmptyLevelOutOfRange { level: usize, capacity: usize },

    #[error("packet mode has no read level, almost empty level must be 0 (got {0})")]
    AlmostEmptyLevelInPacketMode(usize),

    #[error("the pointer synchronizer needs at least one stage")]
    ZeroSyncStages,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_error_returns_value() {
        let err = PushError::Full(String::from("payload"));
        assert_eq!(err.to_string(), "fifo is full");
        assert_eq!(err.into_inner(), "payload");
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::CapacityNotPowerOfTwo(6).to_string(),
            "capacity 6 is not a power of two"
        );
        assert_eq!(
            ConfigError::AlmostFullLevelOutOfRange { level: 9, capacity: 8 }.to_string(),
            "almost full level 9 is outside 1..=8"
        );
    }
}
