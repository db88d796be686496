/*!
 * Error Types
 * Construction and configuration errors with thiserror, miette, and serde support
 *
 * Lock operations themselves never fail: they complete or block. Misuse of the
 * raw API is a precondition violation documented on the `unsafe` functions.
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for fallible construction and configuration
pub type ShardResult<T> = Result<T, ShardError>;

/// Sharded lock construction errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ShardError {
    #[error("Shard count must be at least 1")]
    #[diagnostic(
        code(shard::zero_shards),
        help("Pass a positive shard count, or use ShardConfig::default() for a CPU-sized count.")
    )]
    ZeroShards,

    #[error("Invalid value {value:?} for {var}")]
    #[diagnostic(
        code(shard::invalid_env),
        help("Environment overrides must be unsigned integers.")
    )]
    InvalidEnv { var: String, value: String },
}
