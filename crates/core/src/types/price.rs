//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., kronor, not ore).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }
}

/// ISO 4217 currency codes accepted by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    SEK,
    EUR,
    DKK,
    NOK,
}

impl CurrencyCode {
    /// The three-letter ISO 4217 code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SEK => "SEK",
            Self::EUR => "EUR",
            Self::DKK => "DKK",
            Self::NOK => "NOK",
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an unsupported currency code.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyCodeError(String);

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEK" => Ok(Self::SEK),
            "EUR" => Ok(Self::EUR),
            "DKK" => Ok(Self::DKK),
            "NOK" => Ok(Self::NOK),
            _ => Err(CurrencyCodeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_currency_code_roundtrip() {
        for code in [
            CurrencyCode::SEK,
            CurrencyCode::EUR,
            CurrencyCode::DKK,
            CurrencyCode::NOK,
        ] {
            let parsed: CurrencyCode = code.as_str().parse().expect("parse");
            assert_eq!(parsed, code);
        }
    }

    #[test]
    fn test_currency_code_rejects_unknown() {
        assert!("XBT".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_price_new() {
        let price = Price::new(Decimal::new(15000, 2), CurrencyCode::SEK);
        assert_eq!(price.amount, Decimal::new(15000, 2));
        assert_eq!(price.currency_code, CurrencyCode::SEK);
    }
}
