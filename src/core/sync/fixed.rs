/*!
 * Fixed-Size Sharded Lock
 *
 * Compile-time shard count, no state register and no `read_lock_all`. Each
 * shard's raw lock is cache-line aligned, so the whole lock is a flat inline
 * array that can live in a `static`.
 */

use super::shard::CacheAligned;
use super::traits::ShardedLock;
use crate::core::limits::DEFAULT_SHARD_COUNT;
use parking_lot::lock_api::RawRwLock as _;
use parking_lot::RawRwLock;
use std::fmt;

/// Sharded lock with the default 128 shards
pub type ShardedRwLock128 = FixedShardedRwLock<DEFAULT_SHARD_COUNT>;

/// Sharded read/write lock with `N` cache-line padded shards
///
/// # Example
///
/// ```
/// use sharded_rwlock::{ShardedLock, ShardedRwLock128};
///
/// static BUCKETS: ShardedRwLock128 = ShardedRwLock128::new();
///
/// let guard = BUCKETS.write(130);
/// assert_eq!(guard.shard(), 2);
/// ```
pub struct FixedShardedRwLock<const N: usize> {
    shards: [CacheAligned<RawRwLock>; N],
}

impl<const N: usize> FixedShardedRwLock<N> {
    const NON_EMPTY: () = assert!(N > 0, "FixedShardedRwLock needs at least one shard");

    #[must_use]
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;
        Self {
            shards: [const { CacheAligned::new(RawRwLock::INIT) }; N],
        }
    }

    /// Whether a shard is held for writing (diagnostic, racy by nature)
    #[inline]
    pub fn is_write_locked(&self, shard: usize) -> bool {
        self.shards[shard % N].is_locked_exclusive()
    }
}

impl<const N: usize> ShardedLock for FixedShardedRwLock<N> {
    #[inline(always)]
    fn shard_count(&self) -> usize {
        N
    }

    #[inline]
    fn lock(&self, shard: usize) {
        self.shards[shard % N].lock_exclusive();
    }

    #[inline]
    unsafe fn unlock(&self, shard: usize) {
        self.shards[shard % N].unlock_exclusive();
    }

    #[inline]
    fn read_lock(&self, shard: usize) {
        self.shards[shard % N].lock_shared();
    }

    #[inline]
    unsafe fn read_unlock(&self, shard: usize) {
        self.shards[shard % N].unlock_shared();
    }
}

impl<const N: usize> Default for FixedShardedRwLock<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for FixedShardedRwLock<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedShardedRwLock")
            .field("shard_count", &N)
            .finish()
    }
}
