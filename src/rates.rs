// 7.0: currency conversion rates. a fixed bidirectional table, not a market
// feed. a pair missing from the table converts at 1:1 — that fallback papers
// over an incomplete table and should be treated as a data bug upstream.

use crate::types::{Cash, Currency};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTable {
    rates: HashMap<(Currency, Currency), Decimal>,
}

impl RateTable {
    pub fn empty() -> Self {
        Self {
            rates: HashMap::new(),
        }
    }

    /// The standard table covering every pair in the closed currency set.
    pub fn standard() -> Self {
        use Currency::*;

        let mut table = Self::empty();
        table.insert(Eur, Usd, dec!(1.09));
        table.insert(Eur, Gbp, dec!(0.86));
        table.insert(Eur, Chf, dec!(0.95));
        table.insert(Eur, Usdc, dec!(1.09));

        table.insert(Usd, Eur, dec!(0.92));
        table.insert(Usd, Gbp, dec!(0.79));
        table.insert(Usd, Chf, dec!(0.87));
        table.insert(Usd, Usdc, dec!(1.00));

        table.insert(Gbp, Eur, dec!(1.17));
        table.insert(Gbp, Usd, dec!(1.27));
        table.insert(Gbp, Chf, dec!(1.10));
        table.insert(Gbp, Usdc, dec!(1.27));

        table.insert(Chf, Eur, dec!(1.05));
        table.insert(Chf, Usd, dec!(1.15));
        table.insert(Chf, Gbp, dec!(0.91));
        table.insert(Chf, Usdc, dec!(1.15));

        table.insert(Usdc, Eur, dec!(0.92));
        table.insert(Usdc, Usd, dec!(1.00));
        table.insert(Usdc, Gbp, dec!(0.79));
        table.insert(Usdc, Chf, dec!(0.87));

        table
    }

    pub fn insert(&mut self, from: Currency, to: Currency, rate: Decimal) {
        self.rates.insert((from, to), rate);
    }

    /// Rate for a pair; 1 when the pair is not populated.
    pub fn rate(&self, from: Currency, to: Currency) -> Decimal {
        self.rates.get(&(from, to)).copied().unwrap_or(Decimal::ONE)
    }

    pub fn convert(&self, amount: Cash, from: Currency, to: Currency) -> Cash {
        amount.mul(self.rate(from, to))
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::standard()
    }
}
