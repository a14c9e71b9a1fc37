//! BIP-44 derivation paths probed on hardware wallets.

/// Legacy Ledger path for account `index`, as used by MyEtherWallet and geth.
pub fn ledger_path(index: usize) -> String {
    format!("m/44'/60'/0'/{index}")
}

/// Standard BIP-44 Ethereum path for account `index`, Trezor's default.
pub fn trezor_path(index: usize) -> String {
    format!("m/44'/60'/0'/0/{index}")
}
