// 9.0 price_feed.rs: MOCKED. market quotes come from an external collaborator
// and are possibly stale or absent. a quote only informs what a caller submits
// as a price; it never participates in ledger arithmetic.

use crate::types::{Price, Symbol, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: Symbol,
    pub price: Price,
    pub as_of: Timestamp,
}

/// Quote lookup for a symbol. Implementations may return nothing at all;
/// callers decide what to do with a missing or stale quote.
pub trait PriceSource {
    fn quote(&self, symbol: &Symbol) -> Option<PriceQuote>;
}

// fixed in-memory source for simulation and tests
#[derive(Debug, Default)]
pub struct StaticPriceSource {
    quotes: HashMap<Symbol, PriceQuote>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, symbol: Symbol, price: Price, as_of: Timestamp) {
        self.quotes.insert(
            symbol.clone(),
            PriceQuote {
                symbol,
                price,
                as_of,
            },
        );
    }
}

impl PriceSource for StaticPriceSource {
    fn quote(&self, symbol: &Symbol) -> Option<PriceQuote> {
        self.quotes.get(symbol).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn static_source_returns_set_quotes() {
        let mut source = StaticPriceSource::new();
        source.set(
            Symbol::new("BTC"),
            Price::new_unchecked(dec!(60000)),
            Timestamp::from_millis(1000),
        );

        let quote = source.quote(&Symbol::new("BTC")).unwrap();
        assert_eq!(quote.price.value(), dec!(60000));

        assert!(source.quote(&Symbol::new("ETH")).is_none());
    }
}
