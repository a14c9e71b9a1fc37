//! Keystore passphrase acquisition

use crate::error::EthsignError;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

const PROMPT: &str = "Ethereum account passphrase (not echoed): ";

/// Where the passphrase of a keystore account comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassphraseSource {
    /// Read from a file, one trailing newline stripped
    File(PathBuf),
    /// Ask on the controlling terminal with echo disabled
    Prompt,
}

impl PassphraseSource {
    /// Picks the file source when `--passphrase-file` was given.
    pub fn new(file: Option<&Path>) -> Self {
        match file {
            Some(path) if !path.as_os_str().is_empty() => Self::File(path.to_owned()),
            _ => Self::Prompt,
        }
    }

    /// Obtains the passphrase.
    pub fn read(&self) -> Result<String, EthsignError> {
        match self {
            Self::File(path) => read_passphrase_file(path),
            Self::Prompt => prompt_passphrase(),
        }
    }
}

/// Reads a passphrase file. Only the final `\n` is removed, so passphrases
/// with surrounding whitespace survive.
pub fn read_passphrase_file(path: &Path) -> Result<String, EthsignError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| EthsignError::PassphraseFile { path: path.to_owned(), source })?;
    Ok(contents.strip_suffix('\n').map(str::to_owned).unwrap_or(contents))
}

fn prompt_passphrase() -> Result<String, EthsignError> {
    let mut stderr = io::stderr();
    write!(stderr, "{PROMPT}").and_then(|_| stderr.flush()).map_err(EthsignError::PassphrasePrompt)?;
    let passphrase = rpassword::read_password().map_err(EthsignError::PassphrasePrompt)?;
    eprintln!();
    Ok(passphrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn strips_a_single_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pass");

        fs::write(&path, "hunter2\n").unwrap();
        assert_eq!(read_passphrase_file(&path).unwrap(), "hunter2");

        fs::write(&path, " hunter2 \n\n").unwrap();
        assert_eq!(read_passphrase_file(&path).unwrap(), " hunter2 \n");

        fs::write(&path, "hunter2").unwrap();
        assert_eq!(read_passphrase_file(&path).unwrap(), "hunter2");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = read_passphrase_file(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, EthsignError::PassphraseFile { .. }));
        assert!(err.to_string().starts_with("failed to read passphrase file"));
    }

    #[test]
    fn source_selection() {
        assert_eq!(PassphraseSource::new(None), PassphraseSource::Prompt);
        assert_eq!(PassphraseSource::new(Some(Path::new(""))), PassphraseSource::Prompt);
        assert_eq!(
            PassphraseSource::new(Some(Path::new("/run/pass"))),
            PassphraseSource::File(PathBuf::from("/run/pass"))
        );
    }
}
