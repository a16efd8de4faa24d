//! Error types for the one fallible surface in this crate: parsing a
//! `TargetTable` override from JSON. `generate`/`evaluate` themselves are
//! total and never return `Result`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid target table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("target range for {metric} has lo ({lo}) > hi ({hi})")]
    InvertedRange { metric: &'static str, lo: f32, hi: f32 },

    #[error("target range for {metric} is outside [0, 1]: [{lo}, {hi}]")]
    OutOfBounds { metric: &'static str, lo: f32, hi: f32 },
}
