//! Signed driver-client configuration.
//!
//! The validity window and nonce minimum are policy constants: they are
//! defined once here and referenced everywhere.

use serde::{Deserialize, Serialize};

/// HMAC request-signing configuration for the driver client surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureConfig {
    /// Service-wide base secret from which per-account keys are derived.
    #[serde(default = "default_base_secret")]
    pub base_secret: String,
    /// Signature validity window in seconds, tolerated in both
    /// directions of clock skew.
    #[serde(default = "default_validity_window")]
    pub validity_window_seconds: i64,
    /// Minimum accepted nonce length.
    #[serde(default = "default_nonce_min_length")]
    pub nonce_min_length: usize,
    /// Interval between nonce sweeps in minutes.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_minutes: u64,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            base_secret: default_base_secret(),
            validity_window_seconds: default_validity_window(),
            nonce_min_length: default_nonce_min_length(),
            sweep_interval_minutes: default_sweep_interval(),
        }
    }
}

fn default_base_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_validity_window() -> i64 {
    300
}

fn default_nonce_min_length() -> usize {
    8
}

fn default_sweep_interval() -> u64 {
    10
}
