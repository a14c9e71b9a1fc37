//! Unlocks a located account and signs with whichever backend holds it.

use crate::{
    accounts::{Account, Backend},
    config::HardwareSection,
    error::EthsignError,
    passphrase::PassphraseSource,
};
use ethers_core::types::{transaction::eip2718::TypedTransaction, Address, Signature};
use ethers_signers::{LocalWallet, Signer};
use tracing::debug;

#[cfg(feature = "ledger")]
use ethers_signers::Ledger;
#[cfg(feature = "trezor")]
use ethers_signers::Trezor;

/// A signer for one account, ready to use.
#[derive(Debug)]
pub enum AccountSigner {
    /// Decrypted keystore key
    Local(LocalWallet),
    /// Ledger bound to the account's derivation path
    #[cfg(feature = "ledger")]
    Ledger(Ledger),
    /// Trezor bound to the account's derivation path
    #[cfg(feature = "trezor")]
    Trezor(Trezor),
}

impl AccountSigner {
    /// Unlocks `account`: keystore keys are decrypted with a passphrase taken
    /// from `passphrase`, hardware wallets are reconnected on the account's
    /// path and will ask for confirmation on the device.
    pub async fn unlock(
        account: &Account,
        passphrase: &PassphraseSource,
        #[cfg_attr(not(feature = "trezor"), allow(unused_variables))] hardware: &HardwareSection,
        chain_id: u64,
    ) -> Result<Self, EthsignError> {
        if !account.needs_passphrase() {
            eprintln!("Waiting for hardware wallet confirmation...");
        }

        match &account.backend {
            Backend::Keystore(path) => {
                let passphrase = passphrase.read()?;
                let wallet = LocalWallet::decrypt_keystore(path, passphrase)
                    .map_err(|source| EthsignError::Decrypt { path: path.clone(), source })?;
                if wallet.address() != account.address {
                    return Err(EthsignError::KeyMismatch {
                        path: path.clone(),
                        expected: account.address,
                        found: wallet.address(),
                    })
                }
                debug!(path = %path.display(), "decrypted key file");
                Ok(Self::Local(wallet.with_chain_id(chain_id)))
            }
            #[cfg(feature = "ledger")]
            Backend::Ledger(index) => {
                Ok(Self::Ledger(crate::accounts::connect_ledger(*index, chain_id).await?))
            }
            #[cfg(not(feature = "ledger"))]
            Backend::Ledger(_) => Err(EthsignError::Unsupported("ledger")),
            #[cfg(feature = "trezor")]
            Backend::Trezor(index) => Ok(Self::Trezor(
                crate::accounts::connect_trezor(*index, chain_id, hardware.trezor_cache_dir.clone())
                    .await?,
            )),
            #[cfg(not(feature = "trezor"))]
            Backend::Trezor(_) => Err(EthsignError::Unsupported("trezor")),
        }
    }

    /// The address signatures will recover to.
    pub fn address(&self) -> Address {
        match self {
            Self::Local(wallet) => wallet.address(),
            #[cfg(feature = "ledger")]
            Self::Ledger(ledger) => ledger.address(),
            #[cfg(feature = "trezor")]
            Self::Trezor(trezor) => trezor.address(),
        }
    }

    /// Signs `tx` with EIP-155 replay protection for its chain id.
    pub async fn sign_transaction(&self, tx: &TypedTransaction) -> Result<Signature, EthsignError> {
        match self {
            Self::Local(wallet) => {
                wallet.sign_transaction(tx).await.map_err(|e| signing("transaction", e))
            }
            #[cfg(feature = "ledger")]
            Self::Ledger(ledger) => {
                ledger.sign_transaction(tx).await.map_err(|e| signing("transaction", e))
            }
            #[cfg(feature = "trezor")]
            Self::Trezor(trezor) => {
                trezor.sign_transaction(tx).await.map_err(|e| signing("transaction", e))
            }
        }
    }

    /// Signs the EIP-191 personal message hash of `message`.
    pub async fn sign_message(&self, message: &[u8]) -> Result<Signature, EthsignError> {
        match self {
            Self::Local(wallet) => {
                wallet.sign_message(message).await.map_err(|e| signing("message", e))
            }
            #[cfg(feature = "ledger")]
            Self::Ledger(ledger) => {
                ledger.sign_message(message).await.map_err(|e| signing("message", e))
            }
            #[cfg(feature = "trezor")]
            Self::Trezor(trezor) => {
                trezor.sign_message(message).await.map_err(|e| signing("message", e))
            }
        }
    }
}

fn signing<E>(what: &'static str, source: E) -> EthsignError
where
    E: std::error::Error + Send + Sync + 'static,
{
    EthsignError::Signing { what, source: Box::new(source) }
}

/// `0x`-prefixed hex of the signed transaction's RLP encoding.
pub fn encode_transaction(tx: &TypedTransaction, signature: &Signature) -> String {
    format!("0x{}", hex::encode(tx.rlp_signed(signature)))
}

/// `0x`-prefixed hex of `r ‖ s ‖ v`, with `v` shifted into the 27/28 range
/// when a backend hands back a bare recovery id.
pub fn encode_message_signature(mut signature: Signature) -> String {
    if signature.v < 27 {
        signature.v += 27;
    }
    format!("0x{signature}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::keystore::write_test_key_file;
    use ethers_core::types::{Transaction, TransactionRequest, U256, U64};
    use std::fs;
    use tempfile::tempdir;

    const PASSWORD: &str = "passw0rd";

    async fn unlock_test_account(
        dir: &std::path::Path,
        chain_id: u64,
    ) -> (LocalWallet, AccountSigner) {
        let (wallet, path) = write_test_key_file(dir, PASSWORD);
        let pass_file = dir.join("pass");
        fs::write(&pass_file, format!("{PASSWORD}\n")).unwrap();

        let account = Account { address: wallet.address(), backend: Backend::Keystore(path) };
        let signer = AccountSigner::unlock(
            &account,
            &PassphraseSource::File(pass_file),
            &HardwareSection::default(),
            chain_id,
        )
        .await
        .unwrap();
        (wallet, signer)
    }

    #[tokio::test]
    async fn signs_message_with_keystore_key() {
        let dir = tempdir().unwrap();
        let (wallet, signer) = unlock_test_account(dir.path(), 1).await;
        assert_eq!(signer.address(), wallet.address());

        let signature = signer.sign_message(b"hello world").await.unwrap();
        signature.verify(&b"hello world"[..], wallet.address()).unwrap();
        assert!(signature.v == 27 || signature.v == 28);

        let encoded = encode_message_signature(signature);
        assert_eq!(encoded.len(), 2 + 65 * 2);
        assert!(encoded.ends_with("1b") || encoded.ends_with("1c"));
    }

    #[tokio::test]
    async fn signs_legacy_transaction_with_eip155() {
        let dir = tempdir().unwrap();
        let (wallet, signer) = unlock_test_account(dir.path(), 5).await;

        let tx: TypedTransaction = TransactionRequest::new()
            .to("f0109fc8df283027b6285cc889f5aa624eac1f55".parse::<Address>().unwrap())
            .value(1_000_000_000u64)
            .gas(2_000_000u64)
            .gas_price(21_000_000_000u64)
            .nonce(7u64)
            .chain_id(5u64)
            .into();
        let signature = signer.sign_transaction(&tx).await.unwrap();
        let encoded = encode_transaction(&tx, &signature);

        let raw = hex::decode(encoded.strip_prefix("0x").unwrap()).unwrap();
        let decoded: Transaction = ethers_core::utils::rlp::decode(&raw).unwrap();
        assert_eq!(decoded.nonce, U256::from(7));
        assert_eq!(decoded.value, U256::from(1_000_000_000u64));
        assert!(decoded.v == U64::from(45) || decoded.v == U64::from(46));
        assert_eq!(decoded.recover_from().unwrap(), wallet.address());
    }

    #[tokio::test]
    async fn wrong_passphrase_fails_to_decrypt() {
        let dir = tempdir().unwrap();
        let (wallet, path) = write_test_key_file(dir.path(), PASSWORD);
        let pass_file = dir.path().join("pass");
        fs::write(&pass_file, "not the password").unwrap();

        let account = Account { address: wallet.address(), backend: Backend::Keystore(path) };
        let err = AccountSigner::unlock(
            &account,
            &PassphraseSource::File(pass_file),
            &HardwareSection::default(),
            1,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EthsignError::Decrypt { .. }));
    }

    #[tokio::test]
    async fn key_file_for_another_address_is_rejected() {
        let dir = tempdir().unwrap();
        let (_, path) = write_test_key_file(dir.path(), PASSWORD);
        let pass_file = dir.path().join("pass");
        fs::write(&pass_file, PASSWORD).unwrap();

        let expected: Address = "f0109fc8df283027b6285cc889f5aa624eac1f55".parse().unwrap();
        let account = Account { address: expected, backend: Backend::Keystore(path) };
        let err = AccountSigner::unlock(
            &account,
            &PassphraseSource::File(pass_file),
            &HardwareSection::default(),
            1,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EthsignError::KeyMismatch { expected: e, .. } if e == expected));
    }

    #[test]
    fn recovery_id_is_shifted_to_27() {
        let signature = Signature { r: U256::one(), s: U256::from(2), v: 1 };
        let encoded = encode_message_signature(signature);
        assert!(encoded.starts_with("0x0000"));
        assert!(encoded.ends_with("1c"));

        let signature = Signature { r: U256::one(), s: U256::from(2), v: 27 };
        assert!(encode_message_signature(signature).ends_with("1b"));
    }

    #[cfg(not(feature = "trezor"))]
    #[tokio::test]
    async fn trezor_accounts_need_the_feature() {
        let account = Account { address: Address::zero(), backend: Backend::Trezor(1) };
        let err = AccountSigner::unlock(
            &account,
            &PassphraseSource::Prompt,
            &HardwareSection::default(),
            1,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EthsignError::Unsupported("trezor")));
        assert_eq!(
            err.to_string(),
            "trezor support is not compiled in, rebuild with `--features trezor`"
        );
    }

    #[cfg(not(feature = "ledger"))]
    #[tokio::test]
    async fn ledger_accounts_need_the_feature() {
        let account = Account { address: Address::zero(), backend: Backend::Ledger(0) };
        let err = AccountSigner::unlock(
            &account,
            &PassphraseSource::Prompt,
            &HardwareSection::default(),
            1,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EthsignError::Unsupported("ledger")));
    }
}
