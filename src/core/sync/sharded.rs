/*!
 * Sharded Read/Write Lock
 *
 * Per-shard read/write locks plus a whole-resource read lock that drains
 * every in-flight writer without deadlocking against them.
 *
 * # Protocol
 *
 * Writers lock their shard, then count themselves in the global state
 * register. While a `read_lock_all` is announced in the register, a writer
 * that already holds its shard parks on that shard's condition (releasing the
 * shard lock) instead of racing ahead.
 *
 * `read_lock_all`:
 * 1. Announce: count one more global reader in the register
 * 2. Drain: read-lock every shard in index order; this blocks until writers
 *    inside their critical section finish, and is what guarantees no write
 *    is in progress afterwards
 * 3. Retract: count one global reader fewer
 * 4. Wake writers parked on every shard
 *
 * The register is bookkeeping and a backoff signal. Mutual exclusion always
 * comes from the shard locks themselves.
 */

use super::config::ShardConfig;
use super::guard::AllShardsReadGuard;
use super::shard::{CacheAligned, Shard};
use super::state::{StateRegister, StateSnapshot};
use super::traits::ShardedLock;
use crate::core::errors::ShardResult;
use std::fmt;
use tracing::{debug, trace};

/// Sharded read/write lock with a drain-and-acquire global read lock
///
/// # Example
///
/// ```
/// use sharded_rwlock::{ShardedLock, ShardedRwLock};
///
/// let lock = ShardedRwLock::new(16);
///
/// {
///     let _bucket = lock.write(3); // exclusive on shard 3 only
///     let _other = lock.read(4);   // unaffected
/// }
///
/// let all = lock.read_all(); // shared on all 16 shards
/// assert_eq!(all.shard_count(), 16);
/// ```
pub struct ShardedRwLock {
    state: CacheAligned<StateRegister>,
    shards: Box<[CacheAligned<Shard>]>,
    spin_limit: u32,
}

impl ShardedRwLock {
    /// Create a lock with `shard_count` shards
    ///
    /// # Panics
    ///
    /// Panics if `shard_count` is zero.
    pub fn new(shard_count: usize) -> Self {
        match Self::try_new(shard_count) {
            Ok(lock) => lock,
            Err(err) => panic!("invalid shard count: {err}"),
        }
    }

    /// Create a lock with `shard_count` shards, rejecting unusable counts
    pub fn try_new(shard_count: usize) -> ShardResult<Self> {
        Self::with_config(ShardConfig::with_shard_count(shard_count))
    }

    /// Create a lock from a full configuration
    pub fn with_config(config: ShardConfig) -> ShardResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ShardConfig) -> Self {
        debug!(
            shard_count = config.shard_count,
            spin_limit = config.spin_limit,
            "Creating sharded rwlock"
        );

        let shards = (0..config.shard_count)
            .map(|_| CacheAligned::new(Shard::new()))
            .collect();

        Self {
            state: CacheAligned::new(StateRegister::new()),
            shards,
            spin_limit: config.spin_limit,
        }
    }

    #[inline(always)]
    fn shard(&self, shard: usize) -> &Shard {
        &self.shards[shard % self.shards.len()]
    }

    /// Read-lock every shard, after draining writers in progress
    ///
    /// On return the caller holds one read lock on every shard and no write
    /// critical section is running on any of them. Each shard must later be
    /// released with [`read_unlock`](ShardedLock::read_unlock), for every
    /// index in `0..shard_count()`; prefer [`read_all`](Self::read_all).
    ///
    /// Concurrent calls are allowed and share the read locks.
    pub fn read_lock_all(&self) {
        trace!(shards = self.shards.len(), "read_lock_all: announcing");
        self.state.add_reader(self.spin_limit);

        for shard in self.shards.iter() {
            shard.lock_shared();
        }

        self.state.remove_reader(self.spin_limit);

        let woken: usize = self.shards.iter().map(|shard| shard.wake_all()).sum();
        trace!(
            shards = self.shards.len(),
            woken,
            "read_lock_all: every shard drained"
        );
    }

    /// Read-lock every shard, releasing all of them when the guard drops
    #[inline]
    pub fn read_all(&self) -> AllShardsReadGuard<'_> {
        self.read_lock_all();
        AllShardsReadGuard::new(self)
    }

    /// Current reader/writer counts in the state register
    #[inline]
    pub fn state(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    /// Writers currently parked behind a `read_lock_all`, across all shards
    pub fn parked_writers(&self) -> usize {
        self.shards.iter().map(|shard| shard.parked()).sum()
    }

    /// Whether a shard is held for writing (diagnostic, racy by nature)
    #[inline]
    pub fn is_write_locked(&self, shard: usize) -> bool {
        self.shard(shard).is_locked_exclusive()
    }
}

impl ShardedLock for ShardedRwLock {
    #[inline]
    fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn lock(&self, shard: usize) {
        let index = self.shard_index(shard);
        let shard = self.shard(index);
        shard.lock_exclusive();

        loop {
            let observed = self.state.load();

            if StateRegister::has_readers(observed) {
                trace!(shard = index, "writer parked behind read_lock_all");
                shard.wait_while(|| StateRegister::has_readers(self.state.load()));
            }

            // Deliberately against the pre-wait snapshot: any change since
            // then fails the CAS and restarts the cycle.
            if self.state.try_add_writer(observed) {
                return;
            }
        }
    }

    unsafe fn unlock(&self, shard: usize) {
        self.shard(shard).unlock_exclusive();
        self.state.remove_writer(self.spin_limit);
    }

    #[inline]
    fn read_lock(&self, shard: usize) {
        self.shard(shard).lock_shared();
    }

    #[inline]
    unsafe fn read_unlock(&self, shard: usize) {
        self.shard(shard).unlock_shared();
    }
}

impl Default for ShardedRwLock {
    fn default() -> Self {
        Self::build(ShardConfig::default())
    }
}

impl fmt::Debug for ShardedRwLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedRwLock")
            .field("shard_count", &self.shards.len())
            .field("state", &self.state())
            .field("spin_limit", &self.spin_limit)
            .finish()
    }
}
