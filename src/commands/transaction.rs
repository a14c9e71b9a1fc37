//! `transaction` subcommand

use super::{run_to_completion, KeyStoreArgs};
use crate::{
    accounts::AccountLocator,
    config::EthsignConfig,
    error::EthsignError,
    parse::{parse_address, parse_bytes, parse_u256, parse_u64, required},
    passphrase::PassphraseSource,
    prelude::*,
    signer::{encode_transaction, AccountSigner},
};
use abscissa_core::{config::Override, Command, FrameworkError, Runnable};
use clap::Parser;
use ethers_core::types::{transaction::eip2718::TypedTransaction, Address, TransactionRequest};
use std::path::PathBuf;
use tracing::debug;

/// `transaction` subcommand
///
/// Every value is taken as a string and checked by [`TransactionCmd::request`],
/// so that a missing flag is reported before anything else is looked at.
#[derive(Command, Debug, Default, Parser)]
pub struct TransactionCmd {
    #[command(flatten)]
    pub keystore: KeyStoreArgs,

    /// Make a contract creation transaction
    #[arg(long)]
    pub create: bool,

    /// Address of signing account
    #[arg(long)]
    pub from: Option<String>,

    /// Path to file containing account passphrase
    #[arg(long, value_name = "FILE")]
    pub passphrase_file: Option<PathBuf>,

    /// Chain ID
    #[arg(long)]
    pub chain_id: Option<String>,

    /// Account of recipient
    #[arg(long)]
    pub to: Option<String>,

    /// Account nonce
    #[arg(long)]
    pub nonce: Option<String>,

    /// Gas price
    #[arg(long)]
    pub gas_price: Option<String>,

    /// Gas limit
    #[arg(long)]
    pub gas_limit: Option<String>,

    /// Transaction value
    #[arg(long)]
    pub value: Option<String>,

    /// Hex data
    #[arg(long)]
    pub data: Option<String>,
}

/// A validated transaction, not yet signed.
#[derive(Clone, Debug)]
pub struct UnsignedTransaction {
    pub from: Address,
    pub chain_id: u64,
    pub tx: TypedTransaction,
}

impl TransactionCmd {
    /// Validates the flags and builds the legacy transaction they describe.
    pub fn request(&self) -> Result<UnsignedTransaction, EthsignError> {
        let nonce = required("nonce", &self.nonce)?;
        let value = required("value", &self.value)?;
        let gas_price = required("gas-price", &self.gas_price)?;
        let gas_limit = required("gas-limit", &self.gas_limit)?;
        let chain_id = required("chain-id", &self.chain_id)?;
        let from = required("from", &self.from)?;

        let to = self.to.as_deref().filter(|to| !to.is_empty());
        if to.is_some() == self.create {
            return Err(EthsignError::ToOrCreate)
        }
        let data = self.data.as_deref().filter(|data| !data.is_empty());
        if self.create && data.is_none() {
            return Err(EthsignError::CreateWithoutData)
        }

        let from = parse_address("from", from)?;
        let chain_id = parse_u64("chain-id", chain_id)?;
        let mut request = TransactionRequest::new()
            .from(from)
            .nonce(parse_u64("nonce", nonce)?)
            .value(parse_u256("value", value)?)
            .gas_price(parse_u256("gas-price", gas_price)?)
            .gas(parse_u256("gas-limit", gas_limit)?)
            .data(parse_bytes("data", data.unwrap_or("0x"))?)
            .chain_id(chain_id);
        if let Some(to) = to {
            request = request.to(parse_address("to", to)?);
        }

        Ok(UnsignedTransaction { from, chain_id, tx: request.into() })
    }

    /// Locates the `--from` account, signs, and returns the encoded
    /// transaction.
    pub async fn sign(&self, config: &EthsignConfig) -> Result<String, EthsignError> {
        let unsigned = self.request()?;
        let account = AccountLocator::new(config).find(unsigned.from).await?;
        debug!(account = %account, "signing transaction");

        let passphrase = PassphraseSource::new(self.passphrase_file.as_deref());
        let signer =
            AccountSigner::unlock(&account, &passphrase, &config.hardware, unsigned.chain_id)
                .await?;
        let signature = signer.sign_transaction(&unsigned.tx).await?;
        Ok(encode_transaction(&unsigned.tx, &signature))
    }
}

impl Runnable for TransactionCmd {
    /// Print the signed transaction.
    fn run(&self) {
        let config = APP.config();
        run_to_completion(async {
            println!("{}", self.sign(&config).await?);
            Ok::<_, EthsignError>(())
        });
    }
}

impl Override<EthsignConfig> for TransactionCmd {
    fn override_config(&self, config: EthsignConfig) -> Result<EthsignConfig, FrameworkError> {
        Ok(self.keystore.apply(config))
    }
}
