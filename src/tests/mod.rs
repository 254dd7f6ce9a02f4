//! Scenario tests shared across the FIFO configurations
//!
//! 覆盖各种 FIFO 配置的场景测试

mod rollback;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts how many of its clones have been dropped
///
/// 统计其克隆被 drop 的次数
#[derive(Debug, Clone)]
pub(crate) struct DropCounter {
    counter: Arc<AtomicUsize>,
}

impl DropCounter {
    pub(crate) fn new(counter: &Arc<AtomicUsize>) -> Self {
        Self {
            counter: counter.clone(),
        }
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }
}

/// Route `tracing` output to the test harness, once
///
/// 将 `tracing` 输出接入测试框架（仅一次）
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Small deterministic generator for interleavings
///
/// 用于生成交错顺序的小型确定性生成器
pub(crate) struct Lcg(u64);

impl Lcg {
    pub(crate) fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub(crate) fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    pub(crate) fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}
