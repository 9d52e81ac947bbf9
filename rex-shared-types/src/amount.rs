//! Raw token amounts and their scaled decimal form.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimals of both REX and stkREX.
pub const DECIMALS: u32 = 18;

const SCALE: u128 = 10u128.pow(DECIMALS);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Invalid integer amount: {0}")]
    Invalid(String),
    #[error("Amount does not fit in the ledger range: {0}")]
    Overflow(String),
}

/// An exact, signed token amount in base units.
///
/// Balances are expected to stay non-negative but a debit that overdraws an
/// account is recorded as-is, so the type is signed. All arithmetic is
/// checked; a result outside the `i128` range is `None`. Serialized records carry
/// the scaled decimal next to the raw integer for display; only the raw
/// integer is read back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "AmountRecord", into = "AmountRecord")]
pub struct Amount(i128);

#[derive(Serialize, Deserialize)]
struct AmountRecord {
    raw: i128,
    decimal: String,
}

impl From<AmountRecord> for Amount {
    fn from(record: AmountRecord) -> Self {
        Amount(record.raw)
    }
}

impl From<Amount> for AmountRecord {
    fn from(amount: Amount) -> Self {
        AmountRecord {
            raw: amount.0,
            decimal: amount.to_decimal(),
        }
    }
}

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_raw(raw: i128) -> Self {
        Amount(raw)
    }

    pub const fn raw(self) -> i128 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Parses an unsigned base-10 integer, the way log decoders hand out
    /// `uint256` event values. Digit strings beyond the `i128` range are
    /// `Overflow`, anything else that is not a plain digit string is `Invalid`.
    pub fn from_dec_str(value: &str) -> Result<Self, AmountError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::Invalid(value.to_string()));
        }
        trimmed
            .parse::<i128>()
            .map(Amount)
            .map_err(|_| AmountError::Overflow(value.to_string()))
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    pub fn checked_neg(self) -> Option<Amount> {
        self.0.checked_neg().map(Amount)
    }

    /// Scales the raw amount down by [`DECIMALS`], trimming trailing zeros.
    pub fn to_decimal(self) -> String {
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude / SCALE;
        let fraction = magnitude % SCALE;
        let sign = if self.0 < 0 { "-" } else { "" };
        if fraction == 0 {
            return format!("{}{}", sign, whole);
        }
        let digits = format!("{:0width$}", fraction, width = DECIMALS as usize);
        format!("{}{}.{}", sign, whole, digits.trim_end_matches('0'))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
