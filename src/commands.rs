//! Ethsign Subcommands
//!
//! - `list-accounts` (`ls`): print the accounts of every backend
//! - `transaction` (`tx`): print a signed, RLP-encoded legacy transaction
//! - `message` (`msg`): print an EIP-191 personal message signature
//!
//! See the `impl Configurable` below for how the configuration file is
//! located and how command-line flags are applied on top of it.

mod list_accounts;
mod message;
mod transaction;

pub use self::{
    list_accounts::ListAccountsCmd,
    message::MessageCmd,
    transaction::{TransactionCmd, UnsignedTransaction},
};

use crate::{config::EthsignConfig, error::EthsignError, prelude::*};
use abscissa_core::{config::Override, Command, Configurable, FrameworkError, Runnable};
use clap::Parser;
use std::{future::Future, path::PathBuf, process};

/// Ethsign Configuration Filename
pub const CONFIG_FILE: &str = "ethsign.toml";

/// Ethsign Subcommands
#[derive(Command, Debug, Parser, Runnable)]
pub enum EthsignCmd {
    /// List accounts in keystore and USB wallets
    #[command(visible_alias = "ls")]
    ListAccounts(ListAccountsCmd),

    /// Make a signed transaction
    #[command(visible_alias = "tx")]
    Transaction(TransactionCmd),

    /// Sign arbitrary data
    #[command(visible_alias = "msg")]
    Message(MessageCmd),
}

/// Entry point for the application. It needs to be a struct to allow using subcommands!
#[derive(Command, Debug, Parser)]
#[command(author, about, version)]
pub struct EntryPoint {
    #[command(subcommand)]
    cmd: EthsignCmd,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Use the specified config file
    #[arg(short, long)]
    pub config: Option<String>,
}

impl Runnable for EntryPoint {
    fn run(&self) {
        self.cmd.run()
    }
}

/// This trait allows you to define how application configuration is loaded.
impl Configurable<EthsignConfig> for EntryPoint {
    /// Location of the configuration file
    fn config_path(&self) -> Option<PathBuf> {
        // A missing default config file is fine, the built-in defaults apply
        let filename =
            self.config.as_ref().map(PathBuf::from).unwrap_or_else(|| CONFIG_FILE.into());

        if filename.exists() {
            Some(filename)
        } else {
            None
        }
    }

    /// Apply changes to the config after it's been loaded, e.g. overriding
    /// values in a config file using command-line options.
    fn process_config(&self, config: EthsignConfig) -> Result<EthsignConfig, FrameworkError> {
        match &self.cmd {
            EthsignCmd::ListAccounts(cmd) => cmd.override_config(config),
            EthsignCmd::Transaction(cmd) => cmd.override_config(config),
            EthsignCmd::Message(cmd) => cmd.override_config(config),
        }
    }
}

/// `--key-store`, shared by every subcommand.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct KeyStoreArgs {
    /// Path to key store [default: ~/.ethereum/keystore]
    #[arg(long = "key-store", value_name = "DIR")]
    pub key_store: Option<PathBuf>,
}

impl KeyStoreArgs {
    /// Points `keystore.path` at `--key-store` when it was given.
    pub fn apply(&self, mut config: EthsignConfig) -> EthsignConfig {
        if let Some(path) = &self.key_store {
            config.keystore.path = path.clone();
        }
        config
    }
}

/// Drives `future` on the application's Tokio runtime. Any error is printed
/// and ends the process with status 1.
fn run_to_completion<F>(future: F)
where
    F: Future<Output = Result<(), EthsignError>>,
{
    let result = abscissa_tokio::run(&APP, future).unwrap_or_else(|e| {
        status_err!("executor exited with error: {}", e);
        process::exit(1);
    });

    if let Err(err) = result {
        status_err!("{}", err);
        process::exit(1);
    }
}
