//! Ledger Core Simulation.
//!
//! Walks the full settlement surface: portfolio lot accounting, currency
//! conversion, the transfer workflow, trade escrow, and the administrative
//! override paths.

use ledger_core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ledger_core=info")),
        )
        .init();

    println!("Ledger Core Engine Simulation");
    println!("Multi-Currency Balances, Escrowed Trades, Full Lifecycle\n");

    scenario_1_portfolio_lifecycle();
    scenario_2_currency_conversion();
    scenario_3_transfer_workflow();
    scenario_4_trade_escrow();
    scenario_5_admin_overrides();
    scenario_6_stress_test();

    println!("\nAll simulations completed successfully.");
}

fn funded_engine() -> (Engine, UserId) {
    let mut engine = Engine::new(EngineConfig::default());
    engine.set_time(Timestamp::now());

    let user = engine.create_account();
    engine.set_balance(user, Currency::Eur, Cash::new(dec!(10000))).unwrap();
    engine.set_balance(user, Currency::Usd, Cash::new(dec!(5000))).unwrap();

    (engine, user)
}

/// Buy, accumulate, and sell a position down to zero.
fn scenario_1_portfolio_lifecycle() {
    println!("Scenario 1: Portfolio Lifecycle\n");

    let (mut engine, user) = funded_engine();
    println!("  Funded with 10,000 EUR and 5,000 USD");

    let msft = Symbol::new("MSFT");

    println!("  Buying 10 MSFT @ $300...");
    let receipt = engine
        .buy(user, msft.clone(), AssetType::Stock, dec!(10), Price::new_unchecked(dec!(300)), Currency::Usd)
        .unwrap();
    println!("  Balance: ${}, position: {} @ ${}", receipt.new_balance, receipt.new_quantity, receipt.average_buy_price);

    println!("  Buying 5 more @ $360...");
    let receipt = engine
        .buy(user, msft.clone(), AssetType::Stock, dec!(5), Price::new_unchecked(dec!(360)), Currency::Usd)
        .unwrap();
    println!("  Position: {} @ ${} (weighted average)", receipt.new_quantity, receipt.average_buy_price);

    println!("  Selling 15 @ $340...");
    let receipt = engine
        .sell(user, msft.clone(), dec!(15), Price::new_unchecked(dec!(340)), Currency::Usd)
        .unwrap();
    println!("  Proceeds: ${}, remaining quantity: {}", receipt.total_amount, receipt.remaining_quantity);
    println!("  Position deleted: {}", engine.position(user, &msft).is_none());

    let history = engine.transactions_for(user, 10);
    println!("  Transaction log rows: {}\n", history.len());
}

/// Fixed-table conversion between currency balances.
fn scenario_2_currency_conversion() {
    println!("Scenario 2: Currency Conversion\n");

    let (mut engine, user) = funded_engine();

    let result = engine.convert(user, Currency::Eur, Currency::Usd, dec!(1000)).unwrap();
    println!("  1,000 EUR -> {} USD @ {}", result.to_amount, result.rate);

    let result = engine.convert(user, Currency::Usd, Currency::Usdc, dec!(500)).unwrap();
    println!("  500 USD -> {} USDC @ {}", result.to_amount, result.rate);

    let err = engine.convert(user, Currency::Gbp, Currency::Chf, dec!(1)).unwrap_err();
    println!("  Converting from an empty GBP balance: {err}");

    for (currency, amount) in engine.balances_of(user) {
        println!("    {currency}: {amount}");
    }
    println!();
}

/// Fiat transfers debit eagerly; rejection is the only refund path.
fn scenario_3_transfer_workflow() {
    println!("Scenario 3: Transfer Workflow\n");

    let (mut engine, user) = funded_engine();

    let request = TransferRequest::fiat(dec!(2500), Currency::Eur, "Erika Musterfrau", "DE02120300000000202051")
        .with_purpose("invoice 4711");
    let receipt = engine.create_transfer(user, &request).unwrap();
    println!("  Created fiat transfer {:?}, balance now {} EUR", receipt.transfer_id, receipt.new_balance.unwrap());

    let settled = engine.settle_transfer(receipt.transfer_id, SettleOutcome::Completed).unwrap();
    println!("  Completed: {:?}, no further balance change", settled.status);

    let request = TransferRequest::fiat(dec!(1000), Currency::Eur, "Max Mustermann", "DE89370400440532013000");
    let receipt = engine.create_transfer(user, &request).unwrap();
    println!("  Created second transfer, balance {} EUR", receipt.new_balance.unwrap());

    engine.settle_transfer(receipt.transfer_id, SettleOutcome::Rejected).unwrap();
    println!("  Rejected and refunded, balance {} EUR", engine.balance(user, Currency::Eur));

    let err = engine.settle_transfer(receipt.transfer_id, SettleOutcome::Rejected).unwrap_err();
    println!("  Settling again: {err}");

    let request = TransferRequest::crypto(dec!(0.5), "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh", "BTC");
    let receipt = engine.create_transfer(user, &request).unwrap();
    println!("  Crypto transfer {:?} debits nothing (balance untouched)\n", receipt.transfer_id);
}

/// Trade principal escrow and both close paths.
fn scenario_4_trade_escrow() {
    println!("Scenario 4: Trade Escrow\n");

    let (mut engine, user) = funded_engine();

    let trade = engine.open_trade(user, dec!(1000), Currency::Eur).unwrap();
    println!("  Opened trade {:?}, balance {} EUR (principal escrowed)", trade.id, engine.balance(user, Currency::Eur));

    let err = engine.open_trade(user, dec!(100), Currency::Eur).unwrap_err();
    println!("  Second open while active: {err}");

    let closed = engine.close_trade(user, trade.id).unwrap();
    println!("  Self-closed: profit {} (always zero), balance {} EUR", closed.profit.unwrap(), engine.balance(user, Currency::Eur));

    let trade = engine.open_trade(user, dec!(2000), Currency::Eur).unwrap();
    let closed = engine
        .close_trade_admin(trade.id, dec!(500), Some("BTC/EUR".into()), Some("settled at market".into()))
        .unwrap();
    println!(
        "  Admin-closed with profit {}: {}% return, balance {} EUR\n",
        closed.profit.unwrap(),
        closed.profit_percent.unwrap(),
        engine.balance(user, Currency::Eur)
    );
}

/// Direct overrides skip sufficiency checks but never go negative.
fn scenario_5_admin_overrides() {
    println!("Scenario 5: Administrative Overrides\n");

    let (mut engine, user) = funded_engine();

    engine.set_balance(user, Currency::Gbp, Cash::new(dec!(750))).unwrap();
    println!("  Balance override: {} GBP", engine.balance(user, Currency::Gbp));

    let err = engine.set_balance(user, Currency::Gbp, Cash::new(dec!(-1))).unwrap_err();
    println!("  Negative override rejected: {err}");

    let position = engine.set_position(user, Symbol::new("ETH"), dec!(4), dec!(2500)).unwrap().unwrap();
    println!("  Position override: {} {} @ {} ({:?})", position.quantity, position.symbol, position.average_buy_price, position.asset_type);

    engine.set_position(user, Symbol::new("ETH"), Decimal::ZERO, Decimal::ZERO).unwrap();
    println!("  Zero quantity removes the position: {}", engine.position(user, &Symbol::new("ETH")).is_none());

    let request = TransferRequest::fiat(dec!(900), Currency::Chf, "external desk", "CH9300762011623852957");
    let backdated = Timestamp::from_millis(engine.time().as_millis() - 86_400_000);
    let transfer = engine
        .record_transfer(user, &request, TransferStatus::Completed, Some(backdated))
        .unwrap();
    println!("  Recorded external settlement {:?} dated {} (no balance touched)\n", transfer.id, transfer.created_at.as_millis());
}

/// Many users hammering every operation.
fn scenario_6_stress_test() {
    println!("Scenario 6: Stress Test\n");

    let mut engine = Engine::new(EngineConfig::default());
    engine.set_time(Timestamp::now());

    let num_users = 20;
    let mut users = Vec::new();

    for i in 0..num_users {
        let user = engine.create_account();
        let capital = dec!(5000) + Decimal::from(i) * dec!(2500);
        engine.set_balance(user, Currency::Eur, Cash::new(capital)).unwrap();
        engine.set_balance(user, Currency::Usd, Cash::new(capital)).unwrap();
        users.push(user);
    }

    println!("  Created {} users with 5,000 to 52,500 per currency", num_users);

    let symbols = ["BTC", "ETH", "MSFT", "AAPL", "SOL"];
    let mut buys = 0;
    let mut failures = 0;

    for (i, &user) in users.iter().enumerate() {
        let symbol = Symbol::new(symbols[i % symbols.len()]);
        let price = Price::new_unchecked(dec!(100) + Decimal::from(i as u64 * 10));
        let quantity = dec!(1) + Decimal::from(i as u64 % 4);

        match engine.buy(user, symbol.clone(), AssetType::classify(&symbol), quantity, price, Currency::Usd) {
            Ok(_) => buys += 1,
            Err(_) => failures += 1,
        }

        if i % 3 == 0 {
            let _ = engine.convert(user, Currency::Eur, Currency::Usd, dec!(250));
        }
        if i % 4 == 0 {
            let _ = engine.open_trade(user, dec!(500), Currency::Eur);
        }
    }

    println!("  Buys settled: {}, rejected: {}", buys, failures);

    let active_trades = users.iter().filter(|&&u| engine.active_trade_of(u).is_some()).count();
    println!("  Active trades: {}", active_trades);

    let total_eur: Cash = users.iter().map(|&u| engine.balance(u, Currency::Eur)).sum();
    println!("  Total EUR across balances: {}", total_eur);
    println!("  Events generated: {}", engine.events().len());
}
