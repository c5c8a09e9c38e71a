//! Decimal price type with currency-aware display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Amounts are stored in the currency's standard unit (euros, not cents) as
/// a `Decimal`, matching the `NUMERIC(10,2)` columns in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
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

    /// A zero price in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    /// Multiply the unit price by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
            currency_code: self.currency_code,
        }
    }

    /// Apply a percentage discount (e.g. 15 means 15% off), rounded to cents.
    ///
    /// Percentages outside 0..=100 are clamped.
    #[must_use]
    pub fn with_percent_off(&self, percent: Decimal) -> Self {
        let percent = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        let factor = (Decimal::ONE_HUNDRED - percent) / Decimal::ONE_HUNDRED;
        Self {
            amount: (self.amount * factor).round_dp(2),
            currency_code: self.currency_code,
        }
    }

    /// Format for display, e.g. "€1 250,00" style is left to templates;
    /// this renders the plain "€1250.00" form.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl core::ops::Add for Price {
    type Output = Self;

    /// Add two prices.
    ///
    /// Mixed-currency addition keeps the left-hand currency; callers are
    /// expected to only sum lines from a single cart, which share a currency.
    fn add(self, rhs: Self) -> Self {
        Self {
            amount: self.amount + rhs.amount,
            currency_code: self.currency_code,
        }
    }
}

/// ISO 4217 currency codes the storefront sells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EUR,
    USD,
    GBP,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::EUR => "€",
            Self::USD => "$",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code as a string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EUR => "EUR",
            Self::USD => "USD",
            Self::GBP => "GBP",
        }
    }

    /// Parse an ISO 4217 code (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "EUR" => Some(Self::EUR),
            "USD" => Some(Self::USD),
            "GBP" => Some(Self::GBP),
            _ => None,
        }
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal")
    }

    #[test]
    fn test_display_euro() {
        let price = Price::new(dec("1250.00"), CurrencyCode::EUR);
        assert_eq!(price.display(), "€1250.00");
    }

    #[test]
    fn test_times_quantity() {
        let price = Price::new(dec("19.90"), CurrencyCode::EUR);
        assert_eq!(price.times(3).amount, dec("59.70"));
    }

    #[test]
    fn test_percent_off_rounds_to_cents() {
        let price = Price::new(dec("99.99"), CurrencyCode::EUR);
        let discounted = price.with_percent_off(dec("15"));
        assert_eq!(discounted.amount, dec("84.99"));
    }

    #[test]
    fn test_percent_off_clamps() {
        let price = Price::new(dec("50.00"), CurrencyCode::EUR);
        assert_eq!(price.with_percent_off(dec("150")).amount, Decimal::ZERO);
        assert_eq!(price.with_percent_off(dec("-10")).amount, dec("50.00"));
    }

    #[test]
    fn test_add_sums_amounts() {
        let a = Price::new(dec("10.00"), CurrencyCode::EUR);
        let b = Price::new(dec("2.50"), CurrencyCode::EUR);
        assert_eq!((a + b).amount, dec("12.50"));
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!(CurrencyCode::parse("eur"), Some(CurrencyCode::EUR));
        assert_eq!(CurrencyCode::parse("GBP"), Some(CurrencyCode::GBP));
        assert_eq!(CurrencyCode::parse("JPY"), None);
    }
}
