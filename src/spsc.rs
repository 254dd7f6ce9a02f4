/// Construction of a FIFO and its two handles
///
/// FIFO 及其两个句柄的构造
///
/// Both handles share one [`FifoCore`] through an `Arc`. Each handle keeps its own counters
/// privately and only exchanges them through the published counters in the core.
///
/// 两个句柄通过 `Arc` 共享同一个 [`FifoCore`]。每个句柄私有地保存自己的计数器，
/// 只通过核心中的发布计数器进行交换。
use crate::config::Config;
use crate::consumer::Consumer;
use crate::core::FifoCore;
use crate::error::ConfigError;
use crate::producer::Producer;
use crate::shim::sync::Arc;
use tracing::debug;

/// Create a plain FIFO with `capacity` slots
///
/// 创建容量为 `capacity` 个槽的普通 FIFO
///
/// # Errors
/// `ConfigError::CapacityNotPowerOfTwo` if `capacity` is not a power of two
///
/// # 错误
/// 若 `capacity` 不是 2 的幂次则返回 `ConfigError::CapacityNotPowerOfTwo`
///
/// # Examples
///
/// ```
/// let (mut producer, mut consumer) = packetring::new::<u32>(8).unwrap();
/// producer.push(7).unwrap();
/// assert_eq!(consumer.pop().unwrap().value, 7);
///
/// assert!(packetring::new::<u32>(6).is_err());
/// ```
pub fn new<T>(capacity: usize) -> Result<(Producer<T>, Consumer<T>), ConfigError> {
    with_config(Config::new(capacity))
}

/// Create a FIFO from a full configuration
///
/// 根据完整配置创建 FIFO
///
/// # Errors
/// The first constraint `config` violates, see [`Config::validate`]
///
/// # 错误
/// `config` 违反的第一个约束，参见 [`Config::validate`]
pub fn with_config<T>(config: Config) -> Result<(Producer<T>, Consumer<T>), ConfigError> {
    config.validate()?;
    debug!(
        capacity = config.capacity,
        packet_mode = config.packet_mode,
        drop_packet = config.drop_packet,
        peek_mode = config.peek_mode,
        output_stage = config.output_stage,
        sync_stages = config.sync_stages,
        "building fifo"
    );

    let shared = Arc::new(FifoCore::new(config));
    let producer = Producer::new(shared.clone());
    let consumer = Consumer::new(shared);

    Ok((producer, consumer))
}
