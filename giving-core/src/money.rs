//! Exact amount parsing and locale-aware currency formatting.

use std::str::FromStr;

use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ConfigError;

/// Parse an exported amount, ignoring every character that is not an ASCII
/// digit or `.`. Returns `None` when nothing numeric remains.
///
/// `"$1,234.56"` and `"1234.56"` parse to the same value.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Currency rendering for statement totals.
#[derive(Debug, Clone)]
pub struct CurrencyFormat {
    locale: Locale,
    symbol: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            locale: Locale::en,
            symbol: "$".to_string(),
        }
    }
}

impl CurrencyFormat {
    pub fn new(locale: Locale, symbol: impl Into<String>) -> Self {
        Self {
            locale,
            symbol: symbol.into(),
        }
    }

    /// Build from a locale name such as `en` or `de`.
    pub fn from_name(locale: &str, symbol: impl Into<String>) -> Result<Self, ConfigError> {
        let locale =
            Locale::from_name(locale).map_err(|_| ConfigError::UnknownLocale(locale.to_string()))?;
        Ok(Self::new(locale, symbol))
    }

    /// Round half away from zero to cents, group the whole part, prefix the symbol.
    pub fn format(&self, amount: &Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let cents = (rounded.abs() * Decimal::ONE_HUNDRED)
            .trunc()
            .to_u128()
            .unwrap_or(0);
        format!(
            "{sign}{}{}{}{:02}",
            self.symbol,
            (cents / 100).to_formatted_string(&self.locale),
            self.locale.decimal(),
            cents % 100
        )
    }
}
