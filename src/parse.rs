//! Parsers for command-line values.
//!
//! Integers are decimal or `0x`-prefixed hexadecimal. Addresses and byte
//! strings are hex with an optional `0x` prefix.

use crate::error::EthsignError;
use ethers_core::types::{Address, Bytes, U256};

/// Returns the value of a required flag, treating an empty string as absent.
pub fn required<'a>(flag: &'static str, value: &'a Option<String>) -> Result<&'a str, EthsignError> {
    match value.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(EthsignError::MissingParameter(flag)),
    }
}

/// Parses an unsigned 256-bit integer.
pub fn parse_u256(flag: &'static str, value: &str) -> Result<U256, EthsignError> {
    let parsed = match digits(value) {
        Some((hex, 16)) => U256::from_str_radix(hex, 16).ok(),
        Some((dec, _)) => U256::from_dec_str(dec).ok(),
        None => None,
    };
    parsed.ok_or_else(|| invalid(flag, value))
}

/// Parses an unsigned 64-bit integer.
pub fn parse_u64(flag: &'static str, value: &str) -> Result<u64, EthsignError> {
    digits(value)
        .and_then(|(digits, radix)| u64::from_str_radix(digits, radix).ok())
        .ok_or_else(|| invalid(flag, value))
}

/// Splits off the `0x` prefix and returns the digits with their radix.
/// Empty digit strings and anything that is not a plain digit run, such as
/// a sign, are rejected.
fn digits(value: &str) -> Option<(&str, u32)> {
    let (digits, radix) = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };
    let valid = !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    valid.then_some((digits, radix))
}

/// Parses a 20-byte address.
pub fn parse_address(flag: &'static str, value: &str) -> Result<Address, EthsignError> {
    let hex = strip_0x(value);
    if hex.len() != 40 {
        return Err(invalid(flag, value))
    }
    hex.parse::<Address>().map_err(|_| invalid(flag, value))
}

/// Decodes a hex byte string.
pub fn parse_bytes(flag: &'static str, value: &str) -> Result<Bytes, EthsignError> {
    hex::decode(strip_0x(value)).map(Into::into).map_err(|_| invalid(flag, value))
}

fn strip_0x(value: &str) -> &str {
    value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")).unwrap_or(value)
}

fn invalid(flag: &'static str, value: &str) -> EthsignError {
    EthsignError::InvalidParameter { flag, value: value.to_owned() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_flags_count_as_missing() {
        assert!(matches!(required("nonce", &None), Err(EthsignError::MissingParameter("nonce"))));
        assert!(matches!(
            required("nonce", &Some(String::new())),
            Err(EthsignError::MissingParameter("nonce"))
        ));
        assert_eq!(required("nonce", &Some("7".into())).unwrap(), "7");
    }

    #[test]
    fn integers_accept_decimal_and_hex() {
        assert_eq!(parse_u256("value", "1000000000").unwrap(), U256::from(1_000_000_000u64));
        assert_eq!(parse_u256("value", "0x3b9aca00").unwrap(), U256::from(1_000_000_000u64));
        assert_eq!(parse_u64("nonce", "0x10").unwrap(), 16);
        assert_eq!(parse_u64("nonce", "16").unwrap(), 16);
        assert_eq!(parse_u256("value", &U256::MAX.to_string()).unwrap(), U256::MAX);
    }

    #[test]
    fn integers_reject_garbage() {
        for input in ["", "0x", "-1", "+5", "0x+5", "0x-1", " 1", "1e18", "12ab", "0xzz"] {
            assert!(parse_u256("value", input).is_err(), "{input}");
            assert!(parse_u64("nonce", input).is_err(), "{input}");
        }
        assert!(parse_u64("nonce", "18446744073709551616").is_err());
    }

    #[test]
    fn addresses_with_or_without_prefix() {
        let a = parse_address("to", "0xF0109fC8DF283027b6285cc889F5aA624EaC1F55").unwrap();
        let b = parse_address("to", "f0109fc8df283027b6285cc889f5aa624eac1f55").unwrap();
        assert_eq!(a, b);
        assert!(parse_address("to", "0xf0109f").is_err());
        assert!(parse_address("to", "").is_err());
    }

    #[test]
    fn bytes_decode() {
        assert_eq!(parse_bytes("data", "0xdeadbeef").unwrap().to_vec(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(parse_bytes("data", "deadbeef").unwrap().to_vec(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(parse_bytes("data", "0x").unwrap().is_empty());
        assert!(parse_bytes("data", "0xabc").is_err());
    }
}
