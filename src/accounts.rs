//! Account discovery across the local keystore and USB hardware wallets.
//!
//! Backends are consulted in a fixed order: keystore, Ledger, Trezor. A
//! hardware backend only takes part when its cargo feature is compiled in
//! and it is enabled in the `[hardware]` configuration section.

pub mod hd;
pub mod keystore;
#[cfg(feature = "ledger")]
mod ledger;
#[cfg(feature = "trezor")]
mod trezor;

#[cfg(feature = "ledger")]
pub(crate) use self::ledger::connect as connect_ledger;
#[cfg(feature = "trezor")]
pub(crate) use self::trezor::connect as connect_trezor;

use crate::{
    config::{EthsignConfig, HardwareSection},
    error::EthsignError,
};
use ethers_core::{types::Address, utils::to_checksum};
use std::{fmt, path::PathBuf};

/// Where the key of an account is held.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Encrypted key file
    Keystore(PathBuf),
    /// Ledger account at [`hd::ledger_path`] of the index
    Ledger(usize),
    /// Trezor account at [`hd::trezor_path`] of the index
    Trezor(usize),
}

/// A signing account and the backend holding its key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub address: Address,
    pub backend: Backend,
}

impl Account {
    /// Keystore keys are encrypted; hardware wallets ask for confirmation on
    /// the device instead.
    pub fn needs_passphrase(&self) -> bool {
        matches!(self.backend, Backend::Keystore(_))
    }

    /// Short description of the backend, e.g. `ledger-m/44'/60'/0'/1`.
    pub fn label(&self) -> String {
        match &self.backend {
            Backend::Keystore(_) => "keystore".to_owned(),
            Backend::Ledger(index) => format!("ledger-{}", hd::ledger_path(*index)),
            Backend::Trezor(index) => format!("trezor-{}", hd::trezor_path(*index)),
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", to_checksum(&self.address, None), self.label())
    }
}

/// Looks up accounts in the configured backends.
#[derive(Clone, Debug)]
pub struct AccountLocator {
    keystore: PathBuf,
    #[cfg_attr(not(any(feature = "ledger", feature = "trezor")), allow(dead_code))]
    hardware: HardwareSection,
}

impl AccountLocator {
    pub fn new(config: &EthsignConfig) -> Self {
        Self { keystore: config.keystore.path.clone(), hardware: config.hardware.clone() }
    }

    /// Every account of every backend, in backend order.
    pub async fn accounts(&self) -> Result<Vec<Account>, EthsignError> {
        let mut accounts = self.keystore_accounts()?;
        accounts.extend(self.ledger_accounts().await?);
        accounts.extend(self.trezor_accounts().await?);
        Ok(accounts)
    }

    /// The first account matching `address`. Later backends are not touched
    /// once a match is found.
    pub async fn find(&self, address: Address) -> Result<Account, EthsignError> {
        if let Some(account) = matching(self.keystore_accounts()?, address) {
            return Ok(account)
        }
        if let Some(account) = matching(self.ledger_accounts().await?, address) {
            return Ok(account)
        }
        if let Some(account) = matching(self.trezor_accounts().await?, address) {
            return Ok(account)
        }
        Err(EthsignError::AccountNotFound(address))
    }

    pub fn keystore_accounts(&self) -> Result<Vec<Account>, EthsignError> {
        Ok(keystore::scan(&self.keystore)?
            .into_iter()
            .map(|key| Account { address: key.address, backend: Backend::Keystore(key.path) })
            .collect())
    }

    async fn ledger_accounts(&self) -> Result<Vec<Account>, EthsignError> {
        #[cfg(feature = "ledger")]
        {
            if self.hardware.ledger {
                let addresses = ledger::addresses(self.hardware.accounts).await?;
                return Ok(hardware_accounts(addresses, Backend::Ledger))
            }
        }
        Ok(Vec::new())
    }

    async fn trezor_accounts(&self) -> Result<Vec<Account>, EthsignError> {
        #[cfg(feature = "trezor")]
        {
            if self.hardware.trezor {
                let addresses = trezor::addresses(
                    self.hardware.accounts,
                    self.hardware.trezor_cache_dir.clone(),
                )
                .await?;
                return Ok(hardware_accounts(addresses, Backend::Trezor))
            }
        }
        Ok(Vec::new())
    }
}

fn matching(accounts: Vec<Account>, address: Address) -> Option<Account> {
    accounts.into_iter().find(|account| account.address == address)
}

#[cfg(any(feature = "ledger", feature = "trezor"))]
fn hardware_accounts(addresses: Vec<Address>, backend: fn(usize) -> Backend) -> Vec<Account> {
    addresses
        .into_iter()
        .enumerate()
        .map(|(index, address)| Account { address, backend: backend(index) })
        .collect()
}
