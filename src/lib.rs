/*!
 * Sharded RwLock
 *
 * Finer-grained alternative to one global read/write lock for many
 * independent, index-addressed resources (buckets of a partitioned table,
 * stripes of a cache). Callers map their own keys to a shard index; any
 * index is reduced modulo the shard count.
 *
 * The occasional "read everything" pass is served by
 * [`ShardedRwLock::read_lock_all`], which takes priority over new writers
 * and waits out writers already inside a critical section.
 */

pub mod core;

// Re-exports
pub use crate::core::errors::{ShardError, ShardResult};
pub use crate::core::shard_manager::{ShardManager, WorkloadProfile};
pub use crate::core::sync::{
    AllShardsReadGuard, CacheAligned, FixedShardedRwLock, ShardConfig, ShardReadGuard,
    ShardWriteGuard, ShardedLock, ShardedRwLock, ShardedRwLock128, StateSnapshot,
};
