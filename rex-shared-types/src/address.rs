//! Participant addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The null address. Used as the counterparty of mints and burns and never
/// loaded as an account.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

const ADDRESS_BYTES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Address is missing the 0x prefix: {0}")]
    MissingPrefix(String),
    #[error("Address is not valid hex: {0}")]
    InvalidHex(String),
    #[error("Address must be {expected} bytes, got {actual}: {address}")]
    InvalidLength {
        address: String,
        expected: usize,
        actual: usize,
    },
}

/// A 20-byte account address in lower-case `0x`-prefixed hex form.
///
/// Ledger records are keyed by this string, so every address is normalized on
/// construction and two spellings of the same address compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(value: &str) -> Result<Self, AddressError> {
        let body = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix(value.to_string()))?;
        let bytes = hex::decode(body).map_err(|_| AddressError::InvalidHex(value.to_string()))?;
        if bytes.len() != ADDRESS_BYTES {
            return Err(AddressError::InvalidLength {
                address: value.to_string(),
                expected: ADDRESS_BYTES,
                actual: bytes.len(),
            });
        }
        Ok(Address(format!("0x{}", hex::encode(bytes))))
    }

    pub fn zero() -> Self {
        Address(ZERO_ADDRESS.to_string())
    }

    /// Returns `true` for the mint/burn placeholder address.
    pub fn is_zero(&self) -> bool {
        self.0 == ZERO_ADDRESS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let upper = Address::parse("0xABCDEF0123456789ABCDEF0123456789ABCDEF01").unwrap();
        let lower = Address::parse("0xabcdef0123456789abcdef0123456789abcdef01").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn test_zero_address() {
        let zero = Address::parse(ZERO_ADDRESS).unwrap();
        assert!(zero.is_zero());
        assert_eq!(zero, Address::zero());
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(matches!(
            Address::parse("abcdef0123456789abcdef0123456789abcdef01"),
            Err(AddressError::MissingPrefix(_))
        ));
        assert!(matches!(Address::parse("0xzz"), Err(AddressError::InvalidHex(_))));
        assert!(matches!(
            Address::parse("0xabcd"),
            Err(AddressError::InvalidLength { actual: 2, .. })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Address =
            serde_json::from_str("\"0x00000000000000000000000000000000000000AA\"").unwrap();
        assert_eq!(ok.as_str(), "0x00000000000000000000000000000000000000aa");
        assert!(serde_json::from_str::<Address>("\"not-an-address\"").is_err());
    }
}
