/*!
 * Intelligent Shard Configuration
 *
 * CPU-topology-aware shard count calculation for sharded locks. Callers that
 * know their key space pick a count themselves; everyone else gets a count
 * that scales from small devices (1-4 cores) to large servers (128+ cores).
 *
 * # Design Rationale
 *
 * - **Power-of-2 shards**: Callers can reduce keys with a mask
 * - **CPU-proportional scaling**: More cores means more concurrent writers
 * - **Bounded**: `read_lock_all` cost grows linearly with the shard count
 */

use crate::core::limits::{CACHE_LINE_SIZE, MAX_AUTO_SHARDS, MIN_AUTO_SHARDS};

/// Hardware-aware shard configuration (pure functions)
pub struct ShardManager;

impl ShardManager {
    /// Get CPU count
    #[inline]
    pub fn cpu_count() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or_else(|_| {
                tracing::warn!("Failed to detect CPU count, defaulting to 8");
                8
            })
    }

    /// Get cache line size used for shard padding
    #[inline(always)]
    pub const fn cache_line_size() -> usize {
        CACHE_LINE_SIZE
    }

    /// Calculate shard count for a given workload profile
    #[inline]
    pub fn shards(profile: WorkloadProfile) -> usize {
        Self::shards_with_multiplier(profile.multiplier())
    }

    /// Calculate shards with custom multiplier (advanced use)
    #[inline]
    pub fn shards_with_multiplier(multiplier: usize) -> usize {
        let calculated = (Self::cpu_count() * multiplier.max(1)).next_power_of_two();
        calculated.clamp(MIN_AUTO_SHARDS, MAX_AUTO_SHARDS)
    }
}

/// Workload characterization for shard count calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkloadProfile {
    /// Many writers hammering unrelated keys (partitioned tables, caches)
    /// Shard count: 4x CPU cores
    #[default]
    HighContention,

    /// Mixed read/write traffic
    /// Shard count: 2x CPU cores
    MediumContention,

    /// Mostly reads, or frequent `read_lock_all` snapshots
    /// Shard count: 1x CPU cores
    LowContention,
}

impl WorkloadProfile {
    #[inline]
    const fn multiplier(self) -> usize {
        match self {
            WorkloadProfile::HighContention => 4,
            WorkloadProfile::MediumContention => 2,
            WorkloadProfile::LowContention => 1,
        }
    }
}
