/*!
 * Sharded Lock Traits
 *
 * Per-shard operations shared by the general and the fixed-size lock, so
 * collaborator code (sharded maps, bucket tables) can be written once.
 */

use super::guard::{ShardReadGuard, ShardWriteGuard};

/// A set of independently lockable shards addressed by index
///
/// Every `shard` argument is reduced modulo [`shard_count`](Self::shard_count),
/// so unrelated resources may alias the same shard.
///
/// # Preconditions
///
/// - No recursive locking: a thread holding a shard must not lock it again
/// - A shared lock must not be re-taken while a writer may be queued on the
///   same shard
/// - At most one write-locked shard per thread while `read_lock_all` may run:
///   a writer holding shard A that parks on shard B keeps A locked, and the
///   drain waiting on A never gets to wake it
pub trait ShardedLock: Sync {
    /// Number of shards, fixed at construction
    fn shard_count(&self) -> usize;

    /// Shard an index maps to
    #[inline]
    fn shard_index(&self, shard: usize) -> usize {
        shard % self.shard_count()
    }

    /// Lock a shard for writing, blocking until it is available
    fn lock(&self, shard: usize);

    /// Release a write lock taken with [`lock`](Self::lock)
    ///
    /// # Safety
    ///
    /// The shard must currently be write-locked by a matching `lock` call that
    /// has not been released yet.
    unsafe fn unlock(&self, shard: usize);

    /// Lock a shard for reading, blocking while a writer holds it
    fn read_lock(&self, shard: usize);

    /// Release one read lock on a shard
    ///
    /// # Safety
    ///
    /// The shard must currently be read-locked by a matching `read_lock`
    /// (or `read_lock_all`) call that has not been released yet.
    unsafe fn read_unlock(&self, shard: usize);

    /// Lock a shard for writing, releasing it when the guard drops
    #[inline]
    fn write(&self, shard: usize) -> ShardWriteGuard<'_, Self>
    where
        Self: Sized,
    {
        self.lock(shard);
        ShardWriteGuard::new(self, shard)
    }

    /// Lock a shard for reading, releasing it when the guard drops
    #[inline]
    fn read(&self, shard: usize) -> ShardReadGuard<'_, Self>
    where
        Self: Sized,
    {
        self.read_lock(shard);
        ShardReadGuard::new(self, shard)
    }
}
