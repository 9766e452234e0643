//! Crate error type
//!
//! The simulation itself never fails a tick: anomalies are logged and
//! recovered in place. These errors only surface at the edges (config,
//! persistence, explicit symbol parsing).

/// Errors raised at the crate boundary
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    /// Collectible symbol outside the alphabet
    #[error("Invalid collectible symbol: {0}")]
    InvalidSymbol(u8),

    /// Combo effect name not in the table
    #[error("Unknown combo effect: {0}")]
    UnknownEffect(String),

    /// NaN/Infinity produced by a runaway calculation
    #[error("Non-finite value on {entity} #{id}")]
    NonFinite { entity: &'static str, id: u32 },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON encode/decode failure
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Save envelope written by an incompatible build
    #[error("Unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}
