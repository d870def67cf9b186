//! Buy and sell settlement.
//!
//! Both paths validate every precondition before the first write: a failed
//! operation leaves balance, position, and transaction log untouched.

use super::core::Engine;
use super::results::{BuyReceipt, LedgerError, SellReceipt};
use crate::events::{AssetBoughtEvent, AssetSoldEvent, EventPayload};
use crate::portfolio::{accumulate, reduce, Position, PortfolioError};
use crate::transaction::{Transaction, TransactionKind};
use crate::types::{
    AssetType, Cash, Currency, Price, Symbol, TransactionId, UserId, ValidationError,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

impl Engine {
    /// Buys `quantity` of `symbol` at `price`, debiting `quantity * price`
    /// from the balance in `currency`. An existing position accumulates at
    /// weighted-average cost; a new one starts at `price`.
    pub fn buy(
        &mut self,
        user_id: UserId,
        symbol: Symbol,
        asset_type: AssetType,
        quantity: Decimal,
        price: Price,
        currency: Currency,
    ) -> Result<BuyReceipt, LedgerError> {
        debug!(user = user_id.0, %symbol, %quantity, %price, %currency, "buy");

        if quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity.into());
        }

        let total_amount = Cash::new(quantity * price.value());
        let timestamp = self.current_time;
        let transaction_id = TransactionId(self.next_transaction_id());

        let account = self.require_account_mut(user_id)?;

        // the only fallible write; everything after it cannot fail
        let new_balance = account.debit(currency, total_amount)?;

        let position = match account.get_position(&symbol) {
            Some(existing) => accumulate(existing, quantity, price, timestamp),
            None => Position::new(
                symbol.clone(),
                asset_type,
                quantity,
                price,
                currency,
                timestamp,
            ),
        };
        let new_quantity = position.quantity;
        let average_buy_price = position.average_buy_price;
        account.set_position(position);

        self.transactions.push(Transaction {
            id: transaction_id,
            user_id,
            kind: TransactionKind::Buy,
            symbol: symbol.clone(),
            asset_type,
            quantity,
            price,
            total_amount,
            currency,
            created_at: timestamp,
        });

        self.emit_event(EventPayload::AssetBought(AssetBoughtEvent {
            user_id,
            transaction_id,
            symbol,
            asset_type,
            quantity,
            price,
            total_amount,
            currency,
            new_balance,
        }));

        info!(
            user = user_id.0,
            transaction = transaction_id.0,
            %total_amount,
            "buy settled"
        );

        Ok(BuyReceipt {
            transaction_id,
            total_amount,
            new_balance,
            new_quantity,
            average_buy_price,
        })
    }

    /// Sells `quantity` of `symbol` at `price`, crediting the proceeds into
    /// the caller-supplied `currency`. Selling a position down to exactly zero
    /// deletes it; the average buy price never changes on a sell.
    pub fn sell(
        &mut self,
        user_id: UserId,
        symbol: Symbol,
        quantity: Decimal,
        price: Price,
        currency: Currency,
    ) -> Result<SellReceipt, LedgerError> {
        debug!(user = user_id.0, %symbol, %quantity, %price, %currency, "sell");

        if quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity.into());
        }

        let total_amount = Cash::new(quantity * price.value());
        let timestamp = self.current_time;
        let transaction_id = TransactionId(self.next_transaction_id());

        let account = self.require_account_mut(user_id)?;

        let position = match account.get_position(&symbol) {
            Some(p) if p.quantity >= quantity => p.clone(),
            other => {
                let available = other.map(|p| p.quantity).unwrap_or(Decimal::ZERO);
                return Err(PortfolioError::InsufficientAssets {
                    symbol,
                    requested: quantity,
                    available,
                }
                .into());
            }
        };

        // all preconditions passed; apply the row changes as one unit
        let remaining_quantity = match reduce(&position, quantity, timestamp) {
            Some(updated) => {
                let remaining = updated.quantity;
                account.set_position(updated);
                remaining
            }
            None => {
                account.remove_position(&symbol);
                Decimal::ZERO
            }
        };

        let new_balance = account.credit(currency, total_amount);

        self.transactions.push(Transaction {
            id: transaction_id,
            user_id,
            kind: TransactionKind::Sell,
            symbol: symbol.clone(),
            // history rows carry the position's own asset type
            asset_type: position.asset_type,
            quantity,
            price,
            total_amount,
            currency,
            created_at: timestamp,
        });

        self.emit_event(EventPayload::AssetSold(AssetSoldEvent {
            user_id,
            transaction_id,
            symbol,
            quantity,
            price,
            total_amount,
            currency,
            remaining_quantity,
        }));

        info!(
            user = user_id.0,
            transaction = transaction_id.0,
            %total_amount,
            "sell settled"
        );

        Ok(SellReceipt {
            transaction_id,
            total_amount,
            new_balance,
            remaining_quantity,
        })
    }
}
