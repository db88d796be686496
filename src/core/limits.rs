/*!
 * Lock Limits and Constants
 *
 * Centralized location for the bit layout of the state register, shard count
 * bounds and cache geometry.
 *
 * ## Design Philosophy
 * - Register layout constants live here so packing code and debug checks agree
 * - Performance-critical constants are marked with [PERF]
 */

// =============================================================================
// STATE REGISTER LAYOUT
// =============================================================================

/// Bit offset of the global reader counter inside the state register
/// Readers occupy the high half, writers the low half
pub const READER_SHIFT: u32 = 32;

/// Mask selecting the writer counter (low 32 bits)
pub const WRITER_MASK: u64 = (1 << READER_SHIFT) - 1;

/// Maximum in-flight `read_lock_all` calls the register can count
pub const MAX_GLOBAL_READERS: u64 = u32::MAX as u64;

/// Maximum in-flight writers (summed over all shards) the register can count
pub const MAX_WRITERS: u64 = u32::MAX as u64;

// =============================================================================
// SHARD COUNTS
// =============================================================================

/// Default shard count for fixed-size locks (128)
/// Matches the common "one lock per table bucket group" sizing
pub const DEFAULT_SHARD_COUNT: usize = 128;

/// Minimum shard count produced by CPU-topology sizing
pub const MIN_AUTO_SHARDS: usize = 8;

/// Maximum shard count produced by CPU-topology sizing
/// [PERF] Diminishing returns past this, and `read_lock_all` walks every shard
pub const MAX_AUTO_SHARDS: usize = 512;

// =============================================================================
// BACKOFF
// =============================================================================

/// Register CAS retries that spin before yielding to the scheduler
/// [PERF] Register contention is brief; a few spins usually win the race
pub const DEFAULT_SPIN_LIMIT: u32 = 6;

/// Spin retries for the low-latency preset
pub const LOW_LATENCY_SPIN_LIMIT: u32 = 64;

// =============================================================================
// CACHE GEOMETRY
// =============================================================================

/// Alignment used to keep neighbouring shards on separate cache lines
///
/// x86-64 and aarch64 prefetch cache lines in pairs, so 128 bytes are needed
/// there to avoid false sharing; 64 bytes elsewhere.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "powerpc64"))]
pub const CACHE_LINE_SIZE: usize = 128;

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "powerpc64")))]
pub const CACHE_LINE_SIZE: usize = 64;
