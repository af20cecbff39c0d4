//! Verifier configuration.

use serde::{Deserialize, Serialize};

/// Policy knobs for [`ActionVerifier`](crate::ActionVerifier).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Accept DER signatures and normalize them to raw form (default: true).
    pub accept_der: bool,

    /// Reject signatures whose `s` is in the upper half of the group order
    /// (default: false).
    pub enforce_low_s: bool,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            accept_der: true,
            enforce_low_s: false,
        }
    }
}

impl WalletConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether DER signatures are accepted
    pub fn with_accept_der(mut self, accept_der: bool) -> Self {
        self.accept_der = accept_der;
        self
    }

    /// Set whether low-S signatures are required
    pub fn with_enforce_low_s(mut self, enforce_low_s: bool) -> Self {
        self.enforce_low_s = enforce_low_s;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_fills_missing_fields_with_defaults() {
        let config: WalletConfig = serde_json::from_str(r#"{ "enforce_low_s": true }"#).unwrap();
        assert_eq!(
            config,
            WalletConfig::default().with_enforce_low_s(true)
        );
        assert!(config.accept_der);
    }
}
