// 3.0: portfolio positions. quantity plus weighted-average acquisition cost.
// 3.1 has the accumulate/reduce lot accounting at the bottom.

use crate::types::{AssetType, Currency, Price, Symbol, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: Symbol,
    pub asset_type: AssetType,
    pub quantity: Decimal,
    // >= 0; zero only via administrative override, buys always pay a real price
    pub average_buy_price: Decimal,
    // display tag only; sell proceeds settle in the caller-supplied currency
    pub currency: Currency,
    pub opened_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Position {
    pub fn new(
        symbol: Symbol,
        asset_type: AssetType,
        quantity: Decimal,
        price: Price,
        currency: Currency,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            symbol,
            asset_type,
            quantity,
            average_buy_price: price.value(),
            currency,
            opened_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn cost_basis(&self) -> Decimal {
        self.quantity * self.average_buy_price
    }
}

// 3.1: adds a lot to an existing position. standard weighted-average cost,
// no FIFO/LIFO distinction.
pub fn accumulate(
    position: &Position,
    quantity: Decimal,
    price: Price,
    timestamp: Timestamp,
) -> Position {
    debug_assert!(quantity > Decimal::ZERO, "accumulated lot must be positive");

    let new_quantity = position.quantity + quantity;
    let weighted_sum = position.quantity * position.average_buy_price + quantity * price.value();

    Position {
        symbol: position.symbol.clone(),
        asset_type: position.asset_type,
        quantity: new_quantity,
        average_buy_price: weighted_sum / new_quantity,
        currency: position.currency,
        opened_at: position.opened_at,
        updated_at: timestamp,
    }
}

// 3.2: removes a lot. average price never moves on the way down; a position
// reduced to exactly zero is deleted, so a re-buy starts a fresh cost basis.
pub fn reduce(position: &Position, quantity: Decimal, timestamp: Timestamp) -> Option<Position> {
    debug_assert!(
        quantity > Decimal::ZERO && quantity <= position.quantity,
        "reduce amount must be positive and covered"
    );

    let remaining = position.quantity - quantity;
    if remaining.is_zero() {
        return None;
    }

    Some(Position {
        symbol: position.symbol.clone(),
        asset_type: position.asset_type,
        quantity: remaining,
        average_buy_price: position.average_buy_price,
        currency: position.currency,
        opened_at: position.opened_at,
        updated_at: timestamp,
    })
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PortfolioError {
    #[error("Insufficient assets in {symbol}: requested {requested}, available {available}")]
    InsufficientAssets {
        symbol: Symbol,
        requested: Decimal,
        available: Decimal,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_position() -> Position {
        Position::new(
            Symbol::new("MSFT"),
            AssetType::Stock,
            dec!(10),
            Price::new_unchecked(dec!(300)),
            Currency::Usd,
            Timestamp::from_millis(0),
        )
    }

    #[test]
    fn accumulate_weighted_average() {
        let pos = test_position(); // 10 @ 300

        let new_pos = accumulate(
            &pos,
            dec!(5),
            Price::new_unchecked(dec!(360)),
            Timestamp::from_millis(1000),
        );

        assert_eq!(new_pos.quantity, dec!(15));
        // (10*300 + 5*360) / 15 = 320
        assert_eq!(new_pos.average_buy_price, dec!(320));
        assert_eq!(new_pos.currency, Currency::Usd);
    }

    #[test]
    fn accumulate_equal_lots() {
        let pos = test_position();

        let new_pos = accumulate(
            &pos,
            dec!(10),
            Price::new_unchecked(dec!(400)),
            Timestamp::from_millis(1000),
        );

        assert_eq!(new_pos.average_buy_price, dec!(350));
    }

    #[test]
    fn reduce_partial_keeps_average() {
        let pos = test_position();

        let new_pos = reduce(&pos, dec!(4), Timestamp::from_millis(1000)).unwrap();

        assert_eq!(new_pos.quantity, dec!(6));
        assert_eq!(new_pos.average_buy_price, dec!(300));
    }

    #[test]
    fn reduce_to_zero_deletes() {
        let pos = test_position();
        assert!(reduce(&pos, dec!(10), Timestamp::from_millis(1000)).is_none());
    }

    #[test]
    fn cost_basis() {
        let pos = test_position();
        assert_eq!(pos.cost_basis(), dec!(3000));
    }
}
