/*!
 * Shard Guards
 *
 * RAII wrappers over the raw lock/unlock pairs. Holding a guard is proof the
 * matching unlock is owed exactly once, which makes the safe API free of the
 * raw functions' preconditions.
 */

use super::sharded::ShardedRwLock;
use super::traits::ShardedLock;

/// Exclusive access to one shard
#[must_use = "the shard is unlocked as soon as the guard is dropped"]
pub struct ShardWriteGuard<'a, L: ShardedLock> {
    lock: &'a L,
    shard: usize,
}

impl<'a, L: ShardedLock> ShardWriteGuard<'a, L> {
    /// Caller must have just write-locked `shard`
    #[inline]
    pub(crate) fn new(lock: &'a L, shard: usize) -> Self {
        Self { lock, shard }
    }

    /// Index of the locked shard (already reduced)
    #[inline]
    pub fn shard(&self) -> usize {
        self.lock.shard_index(self.shard)
    }
}

impl<L: ShardedLock> Drop for ShardWriteGuard<'_, L> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: the guard was created right after `lock(shard)`
        unsafe { self.lock.unlock(self.shard) }
    }
}

/// Shared access to one shard
#[must_use = "the shard is unlocked as soon as the guard is dropped"]
pub struct ShardReadGuard<'a, L: ShardedLock> {
    lock: &'a L,
    shard: usize,
}

impl<'a, L: ShardedLock> ShardReadGuard<'a, L> {
    /// Caller must have just read-locked `shard`
    #[inline]
    pub(crate) fn new(lock: &'a L, shard: usize) -> Self {
        Self { lock, shard }
    }

    /// Index of the locked shard (already reduced)
    #[inline]
    pub fn shard(&self) -> usize {
        self.lock.shard_index(self.shard)
    }
}

impl<L: ShardedLock> Drop for ShardReadGuard<'_, L> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: the guard was created right after `read_lock(shard)`
        unsafe { self.lock.read_unlock(self.shard) }
    }
}

/// Shared access to every shard of a [`ShardedRwLock`]
///
/// Dropping the guard read-unlocks every shard in index order.
#[must_use = "every shard is unlocked as soon as the guard is dropped"]
pub struct AllShardsReadGuard<'a> {
    lock: &'a ShardedRwLock,
}

impl<'a> AllShardsReadGuard<'a> {
    /// Caller must have just completed `read_lock_all`
    #[inline]
    pub(crate) fn new(lock: &'a ShardedRwLock) -> Self {
        Self { lock }
    }

    #[inline]
    pub fn shard_count(&self) -> usize {
        self.lock.shard_count()
    }
}

impl Drop for AllShardsReadGuard<'_> {
    fn drop(&mut self) {
        for shard in 0..self.lock.shard_count() {
            // SAFETY: `read_lock_all` left one read lock on every shard
            unsafe { self.lock.read_unlock(shard) }
        }
    }
}
