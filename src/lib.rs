//! # Lock-Free Packet FIFO
//!
//! 无锁包 FIFO
//!
//! `packetring` is a bounded Single Producer Single Consumer (SPSC) FIFO for two threads that
//! run at unrelated rates. Besides plain slot transfer it can hand over variable-length
//! records ("packets") atomically, roll back a half-written record, and let the consumer
//! re-read a record before releasing it.
//!
//! `packetring` 是一个有界的单生产者单消费者（SPSC）FIFO，用于以互不相关的速率运行的两个线程。
//! 除了普通的槽传输外，它还能原子地移交变长记录（"包"）、回滚写了一半的记录，
//! 并允许消费者在释放记录之前重复读取它。
//!
//! ## Features
//!
//! 特性
//!
//! - **Lock-Free** - The only synchronization is one atomic word per published counter
//! - **Packet Mode** - A record becomes visible only once its terminator is committed
//! - **Drop** - The producer can discard the record it is writing
//! - **Peek Mode** - The consumer can read a record again before releasing it
//! - **Output Stage** - Optional one-slot buffer in front of the consumer
//! - **Bounded Staleness** - Each side sees the other through a synchronizer of configurable depth
//!
//! - **无锁设计** - 唯一的同步手段是每个发布计数器一个原子字
//! - **包模式** - 记录仅在其终止符提交后才可见
//! - **丢弃** - 生产者可以丢弃正在写入的记录
//! - **窥视模式** - 消费者可以在释放记录前再次读取它
//! - **输出级** - 可选的、位于消费者之前的单槽缓冲
//! - **有界过时** - 每一端通过深度可配置的同步器观察另一端
//!
//! ## Quick Start
//!
//! 快速开始
//!
//! ```rust
//! // Create a FIFO with capacity 8 (must be a power of two)
//! // 创建一个容量为 8 的 FIFO（必须是 2 的幂次）
//! let (mut producer, mut consumer) = packetring::new::<i32>(8).unwrap();
//!
//! producer.push(42).unwrap();
//! producer.push(100).unwrap();
//!
//! assert_eq!(consumer.pop().unwrap().value, 42);
//! assert_eq!(consumer.pop().unwrap().value, 100);
//! ```
//!
//! ## Packet Mode
//!
//! 包模式
//!
//! ```rust
//! use packetring::Config;
//!
//! let config = Config::packet(8).drop_packet(true);
//! let (mut producer, mut consumer) = packetring::with_config::<u8>(config).unwrap();
//!
//! // Half a record is invisible
//! // 半个记录不可见
//! producer.push(1).unwrap();
//! producer.push(2).unwrap();
//! consumer.tick();
//! assert!(!consumer.valid());
//!
//! // Changed our mind: drop it and write another one
//! // 改变主意：丢弃它并写入另一个记录
//! assert_eq!(producer.drop_packet(), 2);
//! producer.push(3).unwrap();
//! producer.push_last(4).unwrap();
//!
//! assert_eq!(consumer.pop_packet().unwrap(), vec![3, 4]);
//! ```
//!
//! ## Multi-threaded Usage
//!
//! 多线程使用
//!
//! ```rust
//! use std::thread;
//!
//! let (mut producer, mut consumer) = packetring::new::<u64>(32).unwrap();
//!
//! let producer_handle = thread::spawn(move || {
//!     for i in 0..100 {
//!         while producer.push(i).is_err() {
//!             thread::yield_now();
//!         }
//!     }
//! });
//!
//! let consumer_handle = thread::spawn(move || {
//!     let mut received = Vec::new();
//!     while received.len() < 100 {
//!         match consumer.pop() {
//!             Ok(slot) => received.push(slot.value),
//!             Err(_) => thread::yield_now(),
//!         }
//!     }
//!     received
//! });
//!
//! producer_handle.join().unwrap();
//! let received = consumer_handle.join().unwrap();
//! assert_eq!(received, (0..100).collect::<Vec<_>>());
//! ```
//!
//! ## Notes
//!
//! 注意事项
//!
//! - `push`/`pop` never block; spin or yield on `ready`/`valid` to wait
//! - `ready`/`valid` reflect the last synchronized view and may lag by `sync_stages` steps
//! - With the output stage enabled the producer sees one slot less of free space
//! - Slots still in the FIFO are dropped when both handles are gone
//!
//! - `push`/`pop` 永不阻塞；需要等待时可在 `ready`/`valid` 上自旋或让出
//! - `ready`/`valid` 反映最近一次同步的视图，可能滞后 `sync_stages` 步
//! - 启用输出级时，生产者看到的空闲空间少一个槽
//! - 两个句柄都释放后，FIFO 中剩余的槽会被 drop

pub mod config;
pub mod consumer;
pub mod error;
pub mod producer;
pub mod spsc;
pub mod storage;

mod core;
mod position;
mod resync;
mod shim;
mod stage;

pub use config::Config;
pub use consumer::{Consumer, Drain};
pub use error::{ConfigError, PopError, PushError};
pub use position::MAX_CAPACITY;
pub use producer::Producer;
pub use spsc::{new, with_config};
pub use storage::Slot;

#[cfg(all(test, not(feature = "loom")))]
mod tests;
