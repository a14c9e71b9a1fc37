//! Trezor backend, probing the BIP-44 `m/44'/60'/0'/0/<n>` paths.

use super::hd;
use crate::{error::EthsignError, prelude::*};
use ethers_core::types::Address;
use ethers_signers::{Trezor, TrezorHDPath};
use std::path::PathBuf;
use tracing::debug;

fn derivation(index: usize) -> TrezorHDPath {
    TrezorHDPath::Other(hd::trezor_path(index))
}

/// Addresses of the first `count` accounts on the connected Trezor. No
/// device yields no accounts and a warning.
pub(super) async fn addresses(
    count: usize,
    cache_dir: Option<PathBuf>,
) -> Result<Vec<Address>, EthsignError> {
    let trezor = match Trezor::new(derivation(0), 1, cache_dir).await {
        Ok(trezor) => trezor,
        Err(err) => {
            status_warn!("failed to look for USB Trezors: {}", err);
            return Ok(Vec::new())
        }
    };

    let mut addresses = Vec::with_capacity(count);
    for index in 0..count {
        let address = trezor.get_address_with_path(&derivation(index)).await?;
        debug!(path = %hd::trezor_path(index), ?address, "derived Trezor account");
        addresses.push(address);
    }

    Ok(addresses)
}

/// Opens the Trezor bound to account `index`, ready to sign.
pub(crate) async fn connect(
    index: usize,
    chain_id: u64,
    cache_dir: Option<PathBuf>,
) -> Result<Trezor, EthsignError> {
    Ok(Trezor::new(derivation(index), chain_id, cache_dir).await?)
}
