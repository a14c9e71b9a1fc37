//! Ethsign Config
//!
//! See `commands.rs` for how the configuration file is located and how
//! command-line flags override it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of derivation paths probed on each hardware wallet.
pub const DEFAULT_HARDWARE_ACCOUNTS: usize = 4;

/// Ethsign Configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct EthsignConfig {
    /// Local keystore settings
    pub keystore: KeystoreSection,

    /// USB hardware wallet settings
    pub hardware: HardwareSection,
}

/// Local encrypted keystore.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct KeystoreSection {
    /// Directory holding the JSON key files
    pub path: PathBuf,
}

impl Default for KeystoreSection {
    fn default() -> Self {
        Self { path: default_keystore_dir() }
    }
}

/// Hardware wallet backends.
///
/// The `ledger` and `trezor` switches only take effect when the matching
/// cargo feature is compiled in.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct HardwareSection {
    /// Look for accounts on a connected Ledger
    pub ledger: bool,

    /// Look for accounts on a connected Trezor
    pub trezor: bool,

    /// How many derivation paths to probe per device
    pub accounts: usize,

    /// Parent directory of the Trezor session cache (defaults to `$HOME`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trezor_cache_dir: Option<PathBuf>,
}

impl Default for HardwareSection {
    fn default() -> Self {
        Self {
            ledger: true,
            trezor: true,
            accounts: DEFAULT_HARDWARE_ACCOUNTS,
            trezor_cache_dir: None,
        }
    }
}

/// `$HOME/.ethereum/keystore`, where geth keeps its key files.
pub fn default_keystore_dir() -> PathBuf {
    home::home_dir().unwrap_or_default().join(".ethereum").join("keystore")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_geth_keystore() {
        let config = EthsignConfig::default();
        assert!(config.keystore.path.ends_with(".ethereum/keystore"));
        assert_eq!(config.hardware.accounts, DEFAULT_HARDWARE_ACCOUNTS);
        assert!(config.hardware.ledger && config.hardware.trezor);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: EthsignConfig = serde_json::from_str(
            r#"{ "keystore": { "path": "/tmp/keys" }, "hardware": { "trezor": false } }"#,
        )
        .unwrap();
        assert_eq!(config.keystore.path, PathBuf::from("/tmp/keys"));
        assert!(config.hardware.ledger);
        assert!(!config.hardware.trezor);
        assert_eq!(config.hardware.accounts, DEFAULT_HARDWARE_ACCOUNTS);
    }

    #[test]
    fn rejects_unknown_fields() {
        let res = serde_json::from_str::<EthsignConfig>(r#"{ "hello": { "recipient": "world" } }"#);
        assert!(res.is_err());
    }
}
