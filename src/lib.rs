//! ethsign
//!
//! Signs Ethereum transactions and personal messages with an account held in
//! an encrypted JSON keystore or on a USB hardware wallet, and prints the
//! result to stdout.
//!
//! The application is built on the [Abscissa] framework; key handling,
//! hardware transports and transaction encoding come from `ethers-signers`
//! and `ethers-core`.
//!
//! [Abscissa]: https://github.com/iqlusioninc/abscissa

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, trivial_casts, unused_lifetimes, unused_qualifications)]

pub mod accounts;
pub mod application;
pub mod commands;
pub mod config;
pub mod error;
pub mod parse;
pub mod passphrase;
pub mod prelude;
pub mod signer;

pub use error::EthsignError;
