//! Position counters with explicit modulo-2N arithmetic
//!
//! 显式模 2N 运算的位置计数器
//!
//! Every counter in the FIFO (write position, read position, committed and consumed
//! terminator counts) lives in `[0, 2 * capacity)`. The low bits address the storage array;
//! the one extra bit tells "full" (distance == capacity) apart from "empty" (distance == 0).
//!
//! FIFO 中的所有计数器（写位置、读位置、已提交和已消费的终止符计数）都位于
//! `[0, 2 * capacity)` 区间。低位用于寻址存储数组；多出的一位用于区分
//! "满"（距离 == 容量）和"空"（距离 == 0）。

/// Largest supported capacity, so that `2 * capacity` still fits in a `usize`
///
/// 支持的最大容量，保证 `2 * capacity` 仍能放入 `usize`
pub const MAX_CAPACITY: usize = 1 << (usize::BITS - 2);

/// A counter value in `[0, 2 * capacity)`
///
/// 位于 `[0, 2 * capacity)` 的计数器值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct Position(usize);

impl Position {
    /// The zero position every counter starts from
    ///
    /// 所有计数器的起始位置
    pub(crate) const ZERO: Position = Position(0);

    /// Raw counter value
    ///
    /// 原始计数器值
    #[inline]
    pub(crate) fn get(self) -> usize {
        self.0
    }

    #[inline]
    pub(crate) fn from_raw(raw: usize) -> Self {
        Position(raw)
    }
}

/// Arithmetic on positions for one fixed capacity
///
/// 固定容量下的位置运算
///
/// # Invariants
/// - `capacity` is a power of two no larger than [`MAX_CAPACITY`]
/// - every `Position` produced here is `< 2 * capacity`
///
/// # 不变量
/// - `capacity` 是不超过 [`MAX_CAPACITY`] 的 2 的幂次
/// - 此处产生的每个 `Position` 都 `< 2 * capacity`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PositionSpace {
    capacity: usize,

    /// `capacity - 1`, selects the storage index
    ///
    /// `capacity - 1`，用于选取存储索引
    addr_mask: usize,

    /// `2 * capacity - 1`, wraps the counter
    ///
    /// `2 * capacity - 1`，用于计数器回绕
    wrap_mask: usize,
}

impl PositionSpace {
    /// Create the position space for `capacity`
    ///
    /// 为 `capacity` 创建位置空间
    ///
    /// `capacity` must already have been validated (power of two, at most [`MAX_CAPACITY`]).
    ///
    /// `capacity` 必须已经过校验（2 的幂次，且不超过 [`MAX_CAPACITY`]）。
    #[inline]
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        debug_assert!(capacity <= MAX_CAPACITY);
        Self {
            capacity,
            addr_mask: capacity - 1,
            wrap_mask: (capacity << 1) - 1,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Storage index addressed by `pos`
    ///
    /// `pos` 对应的存储索引
    #[inline]
    pub(crate) fn index(&self, pos: Position) -> usize {
        pos.0 & self.addr_mask
    }

    /// `pos + n`, wrapped
    ///
    /// 回绕后的 `pos + n`
    #[inline]
    pub(crate) fn advance(&self, pos: Position, n: usize) -> Position {
        Position(pos.0.wrapping_add(n) & self.wrap_mask)
    }

    /// Number of steps from `from` forward to `to`
    ///
    /// 从 `from` 向前到 `to` 的步数
    ///
    /// Meaningful only when the true distance is at most `capacity`, which the controllers
    /// guarantee for every pair they compare.
    ///
    /// 仅当真实距离不超过 `capacity` 时有意义，控制器保证所比较的每一对位置都满足这一点。
    #[inline]
    pub(crate) fn distance(&self, from: Position, to: Position) -> usize {
        to.0.wrapping_sub(from.0) & self.wrap_mask
    }

    /// Iterate the positions in `[from, to)`
    ///
    /// 遍历 `[from, to)` 中的位置
    pub(crate) fn range(&self, from: Position, to: Position) -> impl Iterator<Item = Position> + '_ {
        let count = self.distance(from, to);
        (0..count).map(move |n| self.advance(from, n))
    }
}
