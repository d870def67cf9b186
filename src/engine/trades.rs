//! Trade escrow and settlement.
//!
//! Opening a trade debits the principal and holds it on the trade row itself;
//! there is no separate escrow ledger, so balance totals understate a user's
//! economic position while a trade is ACTIVE. A trade closes exactly once:
//! by its owner for the bare principal, or by an administrator with an
//! arbitrary profit or loss.

use super::core::Engine;
use super::results::LedgerError;
use crate::events::{EventPayload, TradeClosedEvent, TradeOpenedEvent};
use crate::trade::{settle, Trade, TradeStatus};
use crate::types::{Cash, Currency, TradeId, UserId, ValidationError};
use rust_decimal::Decimal;
use tracing::{debug, info};

impl Engine {
    /// Opens a trade, escrowing `amount` from the balance in `currency`.
    /// A user can hold at most one ACTIVE trade; the existence check runs
    /// inside the same exclusive mutation that creates the row, so two
    /// concurrent opens cannot both pass it.
    pub fn open_trade(
        &mut self,
        user_id: UserId,
        amount: Decimal,
        currency: Currency,
    ) -> Result<Trade, LedgerError> {
        debug!(user = user_id.0, %amount, %currency, "open trade");

        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount.into());
        }

        if let Some(active) = self.active_trade_of(user_id) {
            return Err(LedgerError::ConflictingActiveTrade {
                user_id,
                trade_id: active.id,
            });
        }

        let principal = Cash::new(amount);
        let timestamp = self.current_time;

        let account = self.require_account_mut(user_id)?;
        let new_balance = account.debit(currency, principal)?;

        let trade_id = TradeId(self.next_trade_id());
        let trade = Trade::open(trade_id, user_id, principal, currency, timestamp);
        self.trades.insert(trade_id, trade.clone());

        self.emit_event(EventPayload::TradeOpened(TradeOpenedEvent {
            trade_id,
            user_id,
            amount: principal,
            currency,
            new_balance,
        }));

        info!(user = user_id.0, trade = trade_id.0, %principal, "trade opened");

        Ok(trade)
    }

    /// Self-service close by the owning user. Returns exactly the escrowed
    /// principal with profit forced to zero, however long the trade was open;
    /// profit is only ever realized through administrative closure.
    pub fn close_trade(&mut self, user_id: UserId, trade_id: TradeId) -> Result<Trade, LedgerError> {
        debug!(user = user_id.0, trade = trade_id.0, "close trade");

        let trade = self
            .trades
            .get(&trade_id)
            .ok_or(LedgerError::TradeNotFound(trade_id))?;

        if trade.user_id != user_id {
            return Err(LedgerError::NotOwner { trade_id, user_id });
        }
        if trade.status.is_closed() {
            return Err(LedgerError::AlreadyClosed(trade_id));
        }

        let principal = trade.amount;
        let currency = trade.currency;
        let timestamp = self.current_time;

        let account = self.require_account_mut(user_id)?;
        account.credit(currency, principal);

        let trade = self
            .trades
            .get_mut(&trade_id)
            .expect("trade existence checked above");
        trade.status = TradeStatus::ClosedByUser;
        trade.profit = Some(Cash::zero());
        trade.profit_percent = Some(Decimal::ZERO);
        trade.closed_at = Some(timestamp);
        let closed = trade.clone();

        self.emit_event(EventPayload::TradeClosed(TradeClosedEvent {
            trade_id,
            user_id,
            status: TradeStatus::ClosedByUser,
            returned: principal,
            profit: Cash::zero(),
        }));

        info!(user = user_id.0, trade = trade_id.0, %principal, "trade closed by user");

        Ok(closed)
    }

    /// Administrative close with an arbitrary profit (negative for a loss).
    /// Credits `principal + profit` back to the balance. The engine does not
    /// reject a profit below `-principal`; callers clamp before calling.
    pub fn close_trade_admin(
        &mut self,
        trade_id: TradeId,
        profit: Decimal,
        trading_pair: Option<String>,
        admin_comment: Option<String>,
    ) -> Result<Trade, LedgerError> {
        debug!(trade = trade_id.0, %profit, "admin close trade");

        let trade = self
            .trades
            .get(&trade_id)
            .ok_or(LedgerError::TradeNotFound(trade_id))?;

        if trade.status.is_closed() {
            return Err(LedgerError::AlreadyClosed(trade_id));
        }

        let user_id = trade.user_id;
        let currency = trade.currency;
        let settlement = settle(trade.amount, Cash::new(profit));
        let timestamp = self.current_time;

        let account = self.require_account_mut(user_id)?;
        account.credit(currency, settlement.total_return);

        let trade = self
            .trades
            .get_mut(&trade_id)
            .expect("trade existence checked above");
        trade.status = TradeStatus::ClosedByAdmin;
        trade.profit = Some(settlement.profit);
        trade.profit_percent = Some(settlement.profit_percent);
        trade.trading_pair = trading_pair;
        trade.admin_comment = admin_comment;
        trade.closed_at = Some(timestamp);
        let closed = trade.clone();

        self.emit_event(EventPayload::TradeClosed(TradeClosedEvent {
            trade_id,
            user_id,
            status: TradeStatus::ClosedByAdmin,
            returned: settlement.total_return,
            profit: settlement.profit,
        }));

        info!(
            trade = trade_id.0,
            returned = %settlement.total_return,
            "trade closed by admin"
        );

        Ok(closed)
    }
}
