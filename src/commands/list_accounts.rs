//! `list-accounts` subcommand

use super::{run_to_completion, KeyStoreArgs};
use crate::{accounts::AccountLocator, config::EthsignConfig, error::EthsignError, prelude::*};
use abscissa_core::{config::Override, Command, FrameworkError, Runnable};
use clap::Parser;

/// `list-accounts` subcommand
#[derive(Command, Debug, Default, Parser)]
pub struct ListAccountsCmd {
    #[command(flatten)]
    pub keystore: KeyStoreArgs,
}

impl Runnable for ListAccountsCmd {
    /// Print one `<address> <backend>` line per account.
    fn run(&self) {
        let config = APP.config();
        run_to_completion(async {
            for account in AccountLocator::new(&config).accounts().await? {
                println!("{account}");
            }
            Ok::<_, EthsignError>(())
        });
    }
}

impl Override<EthsignConfig> for ListAccountsCmd {
    fn override_config(&self, config: EthsignConfig) -> Result<EthsignConfig, FrameworkError> {
        Ok(self.keystore.apply(config))
    }
}
