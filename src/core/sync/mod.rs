/*!
 * Sharded Synchronization Primitives
 *
 * Read/write locking split across independently lockable shards:
 * - `ShardedRwLock`: runtime shard count, with a whole-resource read lock
 *   that drains in-flight writers
 * - `FixedShardedRwLock<N>`: compile-time shard count, per-shard only
 *
 * # Architecture
 *
 * Each shard is a raw parking_lot read/write lock paired with a parking-based
 * condition. A single packed atomic register counts announced global readers
 * and in-flight writers across all shards; writers consult it to back off
 * while a global read is draining.
 *
 * # Performance
 *
 * - Uncontended write lock: one raw lock plus one CAS on the register
 * - Read lock: the raw shared lock only, register untouched
 * - Cache-line aligned shards to prevent false sharing
 */

mod backoff;
mod config;
mod fixed;
mod guard;
mod shard;
mod sharded;
mod state;
mod traits;

pub use config::{ShardConfig, SHARDS_ENV, SPIN_LIMIT_ENV};
pub use fixed::{FixedShardedRwLock, ShardedRwLock128};
pub use guard::{AllShardsReadGuard, ShardReadGuard, ShardWriteGuard};
pub use shard::CacheAligned;
pub use sharded::ShardedRwLock;
pub use state::StateSnapshot;
pub use traits::ShardedLock;
