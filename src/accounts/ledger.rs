//! Ledger backend, probing the legacy `m/44'/60'/0'/<n>` paths.

use super::hd;
use crate::{error::EthsignError, prelude::*};
use coins_ledger::transports::{Ledger as Transport, LedgerAsync};
use ethers_core::types::Address;
use ethers_signers::{HDPath, Ledger};
use tracing::debug;

fn derivation(index: usize) -> HDPath {
    HDPath::Other(hd::ledger_path(index))
}

/// Addresses of the first `count` accounts on the connected Ledger.
///
/// No device (or a locked one) yields no accounts and a warning. A device
/// that opens but refuses derivation requests is an error, since it is
/// usually sitting in the wrong app.
pub(super) async fn addresses(count: usize) -> Result<Vec<Address>, EthsignError> {
    // `Ledger::new` already derives a path, so the transport is probed on
    // its own first to tell a missing device from one in the wrong app.
    match Transport::init().await {
        Ok(transport) => drop(transport),
        Err(err) => {
            status_warn!("failed to look for USB Ledgers: {}", err);
            return Ok(Vec::new())
        }
    }
    let ledger = Ledger::new(derivation(0), 1).await.map_err(EthsignError::LedgerApp)?;

    let mut addresses = Vec::with_capacity(count);
    for index in 0..count {
        let address = ledger
            .get_address_with_path(&derivation(index))
            .await
            .map_err(EthsignError::LedgerApp)?;
        debug!(path = %hd::ledger_path(index), ?address, "derived Ledger account");
        addresses.push(address);
    }
    ledger.close();

    Ok(addresses)
}

/// Opens the Ledger bound to account `index`, ready to sign.
pub(crate) async fn connect(index: usize, chain_id: u64) -> Result<Ledger, EthsignError> {
    Ok(Ledger::new(derivation(index), chain_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_matches_legacy_path() {
        assert_eq!(derivation(2).to_string(), HDPath::Legacy(2).to_string());
    }

    #[test]
    fn refused_derivation_names_the_ethereum_app() {
        let err = EthsignError::LedgerApp(ethers_signers::LedgerError::UnexpectedNullResponse);
        assert!(err
            .to_string()
            .starts_with("Ledger needs to be in Ethereum app with browser support off"));
    }

    #[tokio::test]
    #[ignore]
    async fn derives_four_accounts() {
        let addresses = addresses(4).await.unwrap();
        assert_eq!(addresses.len(), 4);
    }
}
