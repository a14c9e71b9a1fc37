//! `message` subcommand

use super::{run_to_completion, KeyStoreArgs};
use crate::{
    accounts::AccountLocator,
    config::EthsignConfig,
    error::EthsignError,
    parse::{parse_address, parse_bytes, required},
    passphrase::PassphraseSource,
    prelude::*,
    signer::{encode_message_signature, AccountSigner},
};
use abscissa_core::{config::Override, Command, FrameworkError, Runnable};
use clap::Parser;
use ethers_core::types::{Address, Bytes};
use std::path::PathBuf;
use tracing::debug;

/// Chain id handed to hardware wallets; personal messages are not bound to a
/// chain.
const MESSAGE_CHAIN_ID: u64 = 1;

/// `message` subcommand
#[derive(Command, Debug, Default, Parser)]
pub struct MessageCmd {
    #[command(flatten)]
    pub keystore: KeyStoreArgs,

    /// Address of signing account
    #[arg(long)]
    pub from: Option<String>,

    /// Path to file containing account passphrase
    #[arg(long, value_name = "FILE")]
    pub passphrase_file: Option<PathBuf>,

    /// Data (in hex) to sign
    #[arg(long)]
    pub data: Option<String>,
}

impl MessageCmd {
    /// Validates the flags, returning the signing address and the raw message.
    pub fn message(&self) -> Result<(Address, Bytes), EthsignError> {
        let from = required("from", &self.from)?;
        let data = required("data", &self.data)?;
        Ok((parse_address("from", from)?, parse_bytes("data", data)?))
    }

    /// Locates the `--from` account and returns the encoded signature over
    /// the personal message hash of `--data`.
    pub async fn sign(&self, config: &EthsignConfig) -> Result<String, EthsignError> {
        let (from, data) = self.message()?;
        let account = AccountLocator::new(config).find(from).await?;
        debug!(account = %account, len = data.len(), "signing message");

        let passphrase = PassphraseSource::new(self.passphrase_file.as_deref());
        let signer =
            AccountSigner::unlock(&account, &passphrase, &config.hardware, MESSAGE_CHAIN_ID)
                .await?;
        let signature = signer.sign_message(&data).await?;
        Ok(encode_message_signature(signature))
    }
}

impl Runnable for MessageCmd {
    /// Print the signature.
    fn run(&self) {
        let config = APP.config();
        run_to_completion(async {
            println!("{}", self.sign(&config).await?);
            Ok::<_, EthsignError>(())
        });
    }
}

impl Override<EthsignConfig> for MessageCmd {
    fn override_config(&self, config: EthsignConfig) -> Result<EthsignConfig, FrameworkError> {
        Ok(self.keystore.apply(config))
    }
}
