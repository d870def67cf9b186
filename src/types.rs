// 1.0: all the primitives live here. nothing in the engine works without these types.
// IDs, currencies, cash amounts, prices, timestamps. each is a newtype so the
// compiler catches type mixups.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransferId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TradeId(pub u64);

// 1.1: the closed currency set. balances exist only in these units; everything
// else (position tags, crypto transfer legs) is display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Usd,
    Gbp,
    Chf,
    Usdc,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Eur,
        Currency::Usd,
        Currency::Gbp,
        Currency::Chf,
        Currency::Usdc,
    ];

    // new accounts get zero rows for these; USDC appears only via credit
    pub const SEEDED: [Currency; 4] = [Currency::Eur, Currency::Usd, Currency::Gbp, Currency::Chf];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Chf => "CHF",
            Currency::Usdc => "USDC",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// 1.2: tradable symbol tag ("MSFT", "BTC"). open set, unlike Currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetType {
    Stock,
    Crypto,
}

impl AssetType {
    // the known crypto tickers; anything else trades as a stock
    const CRYPTO_SYMBOLS: [&'static str; 16] = [
        "BTC", "ETH", "USDC", "LTC", "XRP", "ADA", "BNB", "SOL", "DOGE", "XMR", "LINK", "SHIB",
        "AVAX", "XLM", "NEAR", "DOT",
    ];

    pub fn classify(symbol: &Symbol) -> Self {
        if Self::CRYPTO_SYMBOLS.contains(&symbol.as_str()) {
            AssetType::Crypto
        } else {
            AssetType::Stock
        }
    }
}

// 1.3: cash amount in one currency. balances, principals, proceeds all use this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cash(Decimal);

impl Cash {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn add(&self, other: Cash) -> Self {
        Self(self.0 + other.0)
    }

    pub fn sub(&self, other: Cash) -> Self {
        Self(self.0 - other.0)
    }

    pub fn mul(&self, factor: Decimal) -> Self {
        Self(self.0 * factor)
    }
}

impl fmt::Display for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for Cash {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cash {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl Sum for Cash {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, c| acc.add(c))
    }
}

impl<'a> Sum<&'a Cash> for Cash {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, c| acc.add(*c))
    }
}

// 1.4: unit price in quote currency. must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn new_unchecked(value: Decimal) -> Self {
        debug_assert!(value > Decimal::ZERO);
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.5: millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

// 1.6: input-shape failures. checked before any write; a rejected request
// leaves every row untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,

    #[error("Price must be greater than zero")]
    NonPositivePrice,

    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Source and destination currency must differ")]
    SameCurrency,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn cash_arithmetic() {
        let a = Cash::new(dec!(100.50));
        let b = Cash::new(dec!(0.50));

        assert_eq!(a.add(b).value(), dec!(101.00));
        assert_eq!(a.sub(b).value(), dec!(100.00));
        assert_eq!(b.mul(dec!(3)).value(), dec!(1.50));
        assert!(!a.is_negative());
        assert!(Cash::new(dec!(-1)).is_negative());
    }

    #[test]
    fn price_must_be_positive() {
        assert!(Price::new(dec!(0)).is_none());
        assert!(Price::new(dec!(-5)).is_none());
        assert_eq!(Price::new(dec!(42.5)).unwrap().value(), dec!(42.5));
    }

    #[test]
    fn asset_classification() {
        assert_eq!(AssetType::classify(&Symbol::new("BTC")), AssetType::Crypto);
        assert_eq!(AssetType::classify(&Symbol::new("DOT")), AssetType::Crypto);
        assert_eq!(AssetType::classify(&Symbol::new("MSFT")), AssetType::Stock);
        assert_eq!(AssetType::classify(&Symbol::new("AAPL")), AssetType::Stock);
    }

    #[test]
    fn currency_codes() {
        assert_eq!(Currency::Usdc.code(), "USDC");
        assert_eq!(Currency::ALL.len(), 5);
        assert!(!Currency::SEEDED.contains(&Currency::Usdc));
    }
}
