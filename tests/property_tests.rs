//! Property-based tests for stress testing core ledger math.
//!
//! These tests verify invariants hold under random inputs.

use ledger_core::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// Strategies for generating test data
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|x| Decimal::new(x, 2)) // $0.01 to $10,000
}

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000i64).prop_map(|x| Decimal::new(x, 2)) // 0.01 to 100
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|x| Decimal::new(x, 2)) // 0.01 to 10,000
}

fn funded_engine(eur: Decimal, usd: Decimal) -> (Engine, UserId) {
    let mut engine = Engine::new(EngineConfig::default());
    let user = engine.create_account();
    engine.set_balance(user, Currency::Eur, Cash::new(eur)).unwrap();
    engine.set_balance(user, Currency::Usd, Cash::new(usd)).unwrap();
    (engine, user)
}

proptest! {
    /// Two buys always land on the exact weighted-average cost.
    #[test]
    fn weighted_average_is_exact(
        qty1 in quantity_strategy(),
        qty2 in quantity_strategy(),
        p1 in price_strategy(),
        p2 in price_strategy(),
    ) {
        let (mut engine, user) = funded_engine(dec!(0), dec!(100_000_000));
        let symbol = Symbol::new("MSFT");

        engine.buy(user, symbol.clone(), AssetType::Stock, qty1, Price::new_unchecked(p1), Currency::Usd).unwrap();
        engine.buy(user, symbol.clone(), AssetType::Stock, qty2, Price::new_unchecked(p2), Currency::Usd).unwrap();

        let position = engine.position(user, &symbol).unwrap();
        let expected = (qty1 * p1 + qty2 * p2) / (qty1 + qty2);

        prop_assert_eq!(position.quantity, qty1 + qty2);
        prop_assert_eq!(position.average_buy_price, expected);
    }

    /// A settled buy moves exactly qty * price out of the balance and exactly
    /// qty into the position.
    #[test]
    fn buy_conserves_value(
        qty in quantity_strategy(),
        price in price_strategy(),
    ) {
        let (mut engine, user) = funded_engine(dec!(0), dec!(100_000_000));
        let symbol = Symbol::new("AAPL");
        let before = engine.balance(user, Currency::Usd);

        let receipt = engine
            .buy(user, symbol.clone(), AssetType::Stock, qty, Price::new_unchecked(price), Currency::Usd)
            .unwrap();

        let after = engine.balance(user, Currency::Usd);
        prop_assert_eq!(before.value() - after.value(), qty * price);
        prop_assert_eq!(receipt.total_amount.value(), qty * price);
        prop_assert_eq!(engine.position(user, &symbol).unwrap().quantity, qty);
    }

    /// A partial sell credits exactly qty * price and leaves the remainder;
    /// the average price never moves on the way down.
    #[test]
    fn sell_conserves_value(
        qty in (10i64..10_000i64).prop_map(|x| Decimal::new(x, 2)),
        sell_fraction in 1u32..100u32,
        buy_price in price_strategy(),
        sell_price in price_strategy(),
    ) {
        let (mut engine, user) = funded_engine(dec!(0), dec!(100_000_000));
        let symbol = Symbol::new("NVDA");

        engine.buy(user, symbol.clone(), AssetType::Stock, qty, Price::new_unchecked(buy_price), Currency::Usd).unwrap();

        let sell_qty = (qty * Decimal::from(sell_fraction) / dec!(100)).max(dec!(0.01));
        let before = engine.balance(user, Currency::Usd);

        let receipt = engine
            .sell(user, symbol.clone(), sell_qty, Price::new_unchecked(sell_price), Currency::Usd)
            .unwrap();

        let after = engine.balance(user, Currency::Usd);
        prop_assert_eq!(after.value() - before.value(), sell_qty * sell_price);
        prop_assert_eq!(receipt.remaining_quantity, qty - sell_qty);

        if let Some(position) = engine.position(user, &symbol) {
            prop_assert_eq!(position.average_buy_price, buy_price);
            prop_assert_eq!(position.quantity, qty - sell_qty);
        } else {
            prop_assert_eq!(qty, sell_qty);
        }
    }

    /// Conversion applies the fixed table rate exactly and moves nothing else.
    #[test]
    fn conversion_applies_table_rate(
        amount in amount_strategy(),
    ) {
        let (mut engine, user) = funded_engine(dec!(10_000_000), dec!(0));
        let eur_before = engine.balance(user, Currency::Eur);

        let result = engine.convert(user, Currency::Eur, Currency::Usd, amount).unwrap();

        prop_assert_eq!(result.rate, dec!(1.09));
        prop_assert_eq!(result.to_amount.value(), amount * dec!(1.09));
        prop_assert_eq!(eur_before.value() - engine.balance(user, Currency::Eur).value(), amount);
        prop_assert_eq!(engine.balance(user, Currency::Usd).value(), amount * dec!(1.09));
    }

    /// A failed buy writes nothing: no balance change, no position, no row.
    #[test]
    fn failed_buy_writes_nothing(
        qty in quantity_strategy(),
        price in price_strategy(),
    ) {
        let shortfall = (qty * price - dec!(0.01)).max(Decimal::ZERO);
        let (mut engine, user) = funded_engine(dec!(0), shortfall);
        let symbol = Symbol::new("TSLA");

        let result = engine.buy(user, symbol.clone(), AssetType::Stock, qty, Price::new_unchecked(price), Currency::Usd);

        let insufficient = matches!(
            result,
            Err(LedgerError::Balance(BalanceError::InsufficientFunds { .. }))
        );
        prop_assert!(insufficient);
        prop_assert_eq!(engine.balance(user, Currency::Usd).value(), shortfall);
        prop_assert!(engine.position(user, &symbol).is_none());
        prop_assert!(engine.transactions_for(user, 10).is_empty());
    }

    /// Open then self-close always nets to zero, whatever the principal.
    #[test]
    fn trade_self_close_is_neutral(
        principal in amount_strategy(),
    ) {
        let (mut engine, user) = funded_engine(principal, dec!(0));

        let trade = engine.open_trade(user, principal, Currency::Eur).unwrap();
        prop_assert_eq!(engine.balance(user, Currency::Eur).value(), dec!(0));

        engine.advance_time(86_400_000); // elapsed time never matters
        let closed = engine.close_trade(user, trade.id).unwrap();

        prop_assert_eq!(engine.balance(user, Currency::Eur).value(), principal);
        prop_assert_eq!(closed.profit.unwrap().value(), dec!(0));
        prop_assert_eq!(closed.profit_percent.unwrap(), dec!(0));
    }

    /// Admin close credits principal + profit and stores the exact percent.
    #[test]
    fn trade_admin_close_arithmetic(
        principal in (100i64..1_000_000i64).prop_map(|x| Decimal::new(x, 2)),
        profit_cents in -10_000i64..100_000i64,
    ) {
        let profit = Decimal::new(profit_cents, 2);
        prop_assume!(profit >= -principal);

        let (mut engine, user) = funded_engine(principal, dec!(0));
        let trade = engine.open_trade(user, principal, Currency::Eur).unwrap();

        let closed = engine.close_trade_admin(trade.id, profit, None, None).unwrap();

        prop_assert_eq!(engine.balance(user, Currency::Eur).value(), principal + profit);
        prop_assert_eq!(closed.profit.unwrap().value(), profit);
        prop_assert_eq!(closed.profit_percent.unwrap(), profit / principal * dec!(100));
    }

    /// Random operation storms never drive a balance or quantity negative,
    /// and never leave more than one active trade.
    #[test]
    fn non_negativity_under_random_ops(
        ops in proptest::collection::vec((0u8..6u8, 1i64..5_000i64), 1..60),
    ) {
        let (mut engine, user) = funded_engine(dec!(10_000), dec!(10_000));
        let symbol = Symbol::new("BTC");

        for (op, raw) in ops {
            let amount = Decimal::new(raw, 2);
            match op {
                0 => {
                    let _ = engine.buy(user, symbol.clone(), AssetType::Crypto, amount, Price::new_unchecked(dec!(10)), Currency::Usd);
                }
                1 => {
                    let _ = engine.sell(user, symbol.clone(), amount, Price::new_unchecked(dec!(10)), Currency::Usd);
                }
                2 => {
                    let _ = engine.convert(user, Currency::Eur, Currency::Usd, amount);
                }
                3 => {
                    let _ = engine.open_trade(user, amount, Currency::Eur);
                }
                4 => {
                    if let Some(trade_id) = engine.active_trade_of(user).map(|t| t.id) {
                        let _ = engine.close_trade(user, trade_id);
                    }
                }
                _ => {
                    let request = TransferRequest::fiat(amount, Currency::Eur, "r", "iban");
                    let _ = engine.create_transfer(user, &request);
                }
            }
        }

        for (_, balance) in engine.balances_of(user) {
            prop_assert!(!balance.is_negative(), "negative balance: {}", balance);
        }
        for position in engine.portfolio_of(user) {
            prop_assert!(position.quantity >= Decimal::ZERO);
        }
        let active = engine.trades_for(user, usize::MAX).iter().filter(|t| t.is_active()).count();
        prop_assert!(active <= 1, "multiple active trades: {active}");
    }
}
