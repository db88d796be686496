/*!
 * Sharded Lock Configuration
 *
 * Construction-time configuration: shard count and register backoff.
 */

use crate::core::errors::{ShardError, ShardResult};
use crate::core::limits::{DEFAULT_SPIN_LIMIT, LOW_LATENCY_SPIN_LIMIT};
use crate::core::shard_manager::{ShardManager, WorkloadProfile};

/// Environment variable overriding the shard count
pub const SHARDS_ENV: &str = "SHARDED_LOCK_SHARDS";

/// Environment variable overriding the register spin limit
pub const SPIN_LIMIT_ENV: &str = "SHARDED_LOCK_SPIN_LIMIT";

/// Sharded lock configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardConfig {
    /// Number of independently lockable shards
    pub shard_count: usize,
    /// Register CAS retries that spin before yielding
    pub spin_limit: u32,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self::for_profile(WorkloadProfile::default())
    }
}

impl ShardConfig {
    /// Configuration sized from CPU topology
    pub fn for_profile(profile: WorkloadProfile) -> Self {
        Self {
            shard_count: ShardManager::shards(profile),
            spin_limit: DEFAULT_SPIN_LIMIT,
        }
    }

    /// Configuration with an explicit shard count
    pub const fn with_shard_count(shard_count: usize) -> Self {
        Self {
            shard_count,
            spin_limit: DEFAULT_SPIN_LIMIT,
        }
    }

    /// Configuration that spins longer on the register before yielding
    pub const fn low_latency(shard_count: usize) -> Self {
        Self {
            shard_count,
            spin_limit: LOW_LATENCY_SPIN_LIMIT,
        }
    }

    /// Start from defaults and apply environment overrides
    ///
    /// Environment variables:
    /// - SHARDED_LOCK_SHARDS: shard count (default: CPU-sized)
    /// - SHARDED_LOCK_SPIN_LIMIT: register spin retries (default: 6)
    pub fn from_env() -> ShardResult<Self> {
        let mut config = Self::default();

        if let Some(shards) = read_env(SHARDS_ENV)? {
            config.shard_count = shards;
        }
        if let Some(spins) = read_env(SPIN_LIMIT_ENV)? {
            config.spin_limit = spins;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the shard count is usable
    pub fn validate(&self) -> ShardResult<()> {
        if self.shard_count == 0 {
            return Err(ShardError::ZeroShards);
        }
        Ok(())
    }
}

fn read_env<T: std::str::FromStr>(var: &str) -> ShardResult<Option<T>> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ShardError::InvalidEnv {
                var: var.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}
