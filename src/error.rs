//! Error types

use ethers_core::types::Address;
use ethers_signers::WalletError;
use std::{io, path::PathBuf};
use thiserror::Error;

#[cfg(feature = "ledger")]
use ethers_signers::LedgerError;
#[cfg(feature = "trezor")]
use ethers_signers::TrezorError;

#[derive(Error, Debug)]
/// Error raised while validating input, locating an account or signing
pub enum EthsignError {
    /// A flag the subcommand cannot do without was not given
    #[error("missing required parameter --{0}")]
    MissingParameter(&'static str),
    /// A flag value could not be parsed
    #[error("invalid value for --{flag}: {value:?}")]
    InvalidParameter { flag: &'static str, value: String },
    /// Neither or both of `--to` and `--create` were given
    #[error("need exactly one of --to or --create")]
    ToOrCreate,
    /// Contract creation without init code
    #[error("need --data when doing --create")]
    CreateWithoutData,
    /// No backend holds the requested address
    #[error("account not found: {0:#x}")]
    AccountNotFound(Address),
    /// The keystore directory exists but could not be listed
    #[error("failed to read keystore directory {}: {source}", path.display())]
    KeystoreDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Error reading `--passphrase-file`
    #[error("failed to read passphrase file {}: {source}", path.display())]
    PassphraseFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Error reading the passphrase from the terminal
    #[error("failed to read passphrase: {0}")]
    PassphrasePrompt(#[source] io::Error),
    /// The key file could not be decrypted, most likely a wrong passphrase
    #[error("failed to decrypt keystore {}: {source}", path.display())]
    Decrypt {
        path: PathBuf,
        #[source]
        source: WalletError,
    },
    /// The key file decrypted to a different account than it advertises
    #[error("keystore {} holds the key for {found:#x}, not {expected:#x}", path.display())]
    KeyMismatch { path: PathBuf, expected: Address, found: Address },
    /// The backend refused or failed to produce a signature
    #[error("failed to sign {what}: {source}")]
    Signing {
        what: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The account lives on a device this build cannot talk to
    #[error("{0} support is not compiled in, rebuild with `--features {0}`")]
    Unsupported(&'static str),
    /// A Ledger is connected but does not answer derivation requests
    #[cfg(feature = "ledger")]
    #[error("Ledger needs to be in Ethereum app with browser support off: {0}")]
    LedgerApp(#[source] LedgerError),
    /// Underlying Ledger error
    #[cfg(feature = "ledger")]
    #[error(transparent)]
    LedgerError(#[from] LedgerError),
    /// Underlying Trezor error
    #[cfg(feature = "trezor")]
    #[error(transparent)]
    TrezorError(#[from] TrezorError),
}
