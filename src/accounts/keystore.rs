//! Account discovery in a geth-style keystore directory.
//!
//! Key files are only parsed far enough to learn the address they hold;
//! decryption happens later, once an account was picked and a passphrase
//! obtained.

use crate::error::EthsignError;
use ethers_core::types::Address;
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;

/// A key file found in the keystore.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyFile {
    /// Address advertised by the file
    pub address: Address,
    /// Location of the encrypted key
    pub path: PathBuf,
}

#[derive(Deserialize)]
struct KeyFileHeader {
    address: Option<String>,
}

/// Lists the key files in `dir`, ordered by file name.
///
/// A missing directory holds no accounts. Subdirectories, hidden files,
/// editor backups and files that are not keystore JSON are skipped.
pub fn scan(dir: &Path) -> Result<Vec<KeyFile>, EthsignError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "keystore directory does not exist");
            return Ok(Vec::new())
        }
        Err(source) => return Err(EthsignError::KeystoreDir { path: dir.to_owned(), source }),
    };

    let mut paths = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|source| EthsignError::KeystoreDir { path: dir.to_owned(), source })?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || name.ends_with('~') {
            continue
        }
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            paths.push(entry.path());
        }
    }
    paths.sort();

    Ok(paths.into_iter().filter_map(|path| read_key_file(&path)).collect())
}

fn read_key_file(path: &Path) -> Option<KeyFile> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(err) => {
            debug!(path = %path.display(), %err, "skipping unreadable key file");
            return None
        }
    };
    let header: KeyFileHeader = match serde_json::from_slice(&contents) {
        Ok(header) => header,
        Err(err) => {
            debug!(path = %path.display(), %err, "skipping non-keystore file");
            return None
        }
    };
    let Some(address) = header.address else {
        debug!(path = %path.display(), "skipping key file without address");
        return None
    };
    let hex = address.strip_prefix("0x").unwrap_or(&address);
    match hex.parse::<Address>() {
        Ok(address) if hex.len() == 40 => Some(KeyFile { address, path: path.to_owned() }),
        _ => {
            debug!(path = %path.display(), %address, "skipping key file with malformed address");
            None
        }
    }
}

/// Writes a geth-compatible key file for `wallet`'s freshly generated key
/// and returns the wallet with the file location.
#[cfg(test)]
pub(crate) fn write_test_key_file(
    dir: &Path,
    password: &str,
) -> (ethers_signers::LocalWallet, PathBuf) {
    use ethers_signers::{LocalWallet, Signer};

    let mut rng = ethers_core::rand::thread_rng();
    let (wallet, uuid) = LocalWallet::new_keystore(dir, &mut rng, password, None).unwrap();
    let path = dir.join(&uuid);

    // eth-keystore leaves the address out unless built for geth compatibility
    let mut json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    json["address"] = hex::encode(wallet.address()).into();
    fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

    (wallet, path)
}
