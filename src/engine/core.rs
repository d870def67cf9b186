// 10.1 engine/core.rs: main engine. holds all accounts, transfers, trades,
// the transaction log, and the audit trail.

use super::config::EngineConfig;
use super::results::LedgerError;
use crate::account::Account;
use crate::events::{
    AccountCreatedEvent, BalanceAdjustedEvent, Event, EventId, EventPayload,
    PositionAdjustedEvent, PositionRemovedEvent,
};
use crate::portfolio::Position;
use crate::rates::RateTable;
use crate::trade::Trade;
use crate::transaction::Transaction;
use crate::transfer::Transfer;
use crate::types::{
    AssetType, Cash, Currency, Symbol, Timestamp, TradeId, TransferId, UserId, ValidationError,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::info;

/** 10.2: main engine struct. all state lives here */
#[derive(Debug)]
pub struct Engine {
    pub(super) config: EngineConfig,
    pub(super) accounts: HashMap<UserId, Account>,
    pub(super) transfers: HashMap<TransferId, Transfer>,
    pub(super) trades: HashMap<TradeId, Trade>,
    pub(super) transactions: Vec<Transaction>,
    pub(super) rates: RateTable,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
    pub(super) next_transaction_id: u64,
    pub(super) next_transfer_id: u64,
    pub(super) next_trade_id: u64,
    pub(super) current_time: Timestamp,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            accounts: HashMap::new(),
            transfers: HashMap::new(),
            trades: HashMap::new(),
            transactions: Vec::new(),
            rates: RateTable::standard(),
            events: Vec::new(),
            next_event_id: 1,
            next_transaction_id: 1,
            next_transfer_id: 1,
            next_trade_id: 1,
            current_time: Timestamp::from_millis(0),
        }
    }

    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.current_time = Timestamp::from_millis(self.current_time.as_millis() + millis);
    }

    pub fn create_account(&mut self) -> UserId {
        let id = UserId(self.accounts.len() as u64 + 1);
        let account = Account::new(id, self.current_time);
        self.accounts.insert(id, account);

        self.emit_event(EventPayload::AccountCreated(AccountCreatedEvent {
            user_id: id,
        }));

        id
    }

    pub fn get_account(&self, user_id: UserId) -> Option<&Account> {
        self.accounts.get(&user_id)
    }

    pub fn accounts_iter(&self) -> impl Iterator<Item = (&UserId, &Account)> {
        self.accounts.iter()
    }

    pub(super) fn require_account_mut(
        &mut self,
        user_id: UserId,
    ) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(&user_id)
            .ok_or(LedgerError::AccountNotFound(user_id))
    }

    // --- queries -----------------------------------------------------------

    /// Balance for a user and currency. Unknown users and absent rows read as
    /// zero.
    pub fn balance(&self, user_id: UserId, currency: Currency) -> Cash {
        self.accounts
            .get(&user_id)
            .map(|a| a.balance(currency))
            .unwrap_or(Cash::zero())
    }

    pub fn balances_of(&self, user_id: UserId) -> Vec<(Currency, Cash)> {
        let Some(account) = self.accounts.get(&user_id) else {
            return Vec::new();
        };
        let mut rows: Vec<(Currency, Cash)> =
            account.balances.iter().map(|(c, a)| (*c, *a)).collect();
        rows.sort_by_key(|(c, _)| c.code());
        rows
    }

    pub fn position(&self, user_id: UserId, symbol: &Symbol) -> Option<&Position> {
        self.accounts.get(&user_id)?.get_position(symbol)
    }

    pub fn portfolio_of(&self, user_id: UserId) -> Vec<&Position> {
        let Some(account) = self.accounts.get(&user_id) else {
            return Vec::new();
        };
        let mut positions: Vec<&Position> = account.positions.values().collect();
        positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        positions
    }

    /// A user's transaction history, newest first.
    pub fn transactions_for(&self, user_id: UserId, limit: usize) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .take(limit)
            .collect()
    }

    pub fn transfer(&self, transfer_id: TransferId) -> Option<&Transfer> {
        self.transfers.get(&transfer_id)
    }

    pub fn transfers_for(&self, user_id: UserId, limit: usize) -> Vec<&Transfer> {
        let mut rows: Vec<&Transfer> = self
            .transfers
            .values()
            .filter(|t| t.user_id == user_id)
            .collect();
        // ids are monotonic, so newest first = highest id first
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows.truncate(limit);
        rows
    }

    pub fn trade(&self, trade_id: TradeId) -> Option<&Trade> {
        self.trades.get(&trade_id)
    }

    pub fn trades_for(&self, user_id: UserId, limit: usize) -> Vec<&Trade> {
        let mut rows: Vec<&Trade> = self
            .trades
            .values()
            .filter(|t| t.user_id == user_id)
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows.truncate(limit);
        rows
    }

    pub fn active_trade_of(&self, user_id: UserId) -> Option<&Trade> {
        self.trades
            .values()
            .find(|t| t.user_id == user_id && t.is_active())
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    // --- administrative overrides ------------------------------------------
    //
    // ground-truth corrections: allowed to skip the sufficiency preconditions,
    // never allowed to write a negative amount.

    pub fn set_balance(
        &mut self,
        user_id: UserId,
        currency: Currency,
        amount: Cash,
    ) -> Result<Cash, LedgerError> {
        if amount.is_negative() {
            return Err(ValidationError::NegativeAmount.into());
        }

        let account = self.require_account_mut(user_id)?;
        account.set_balance(currency, amount);

        info!(user = user_id.0, %currency, %amount, "balance override");
        self.emit_event(EventPayload::BalanceAdjusted(BalanceAdjustedEvent {
            user_id,
            currency,
            amount,
        }));

        Ok(amount)
    }

    /// Upserts a position to exact values; quantity zero removes it (removing
    /// an absent position is a no-op). A fresh row gets its asset type from
    /// symbol classification and a USD display tag.
    pub fn set_position(
        &mut self,
        user_id: UserId,
        symbol: Symbol,
        quantity: Decimal,
        average_buy_price: Decimal,
    ) -> Result<Option<Position>, LedgerError> {
        if quantity < Decimal::ZERO || average_buy_price < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount.into());
        }

        let now = self.current_time;
        let account = self.require_account_mut(user_id)?;

        if quantity.is_zero() {
            account.remove_position(&symbol);
            info!(user = user_id.0, %symbol, "position removed by override");
            self.emit_event(EventPayload::PositionRemoved(PositionRemovedEvent {
                user_id,
                symbol,
            }));
            return Ok(None);
        }

        let position = match account.get_position(&symbol) {
            Some(existing) => Position {
                symbol: symbol.clone(),
                asset_type: existing.asset_type,
                quantity,
                average_buy_price,
                currency: existing.currency,
                opened_at: existing.opened_at,
                updated_at: now,
            },
            None => Position {
                symbol: symbol.clone(),
                asset_type: AssetType::classify(&symbol),
                quantity,
                average_buy_price,
                currency: Currency::Usd,
                opened_at: now,
                updated_at: now,
            },
        };
        account.set_position(position.clone());

        info!(user = user_id.0, %symbol, %quantity, "position override");
        self.emit_event(EventPayload::PositionAdjusted(PositionAdjustedEvent {
            user_id,
            symbol,
            quantity,
            average_buy_price,
        }));

        Ok(Some(position))
    }

    // --- internals ---------------------------------------------------------

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.current_time, payload);
        self.next_event_id += 1;

        self.events.push(event);

        if self.events.len() > self.config.max_events {
            let drain_count = self.events.len() - self.config.max_events;
            self.events.drain(0..drain_count);
        }
    }

    pub(super) fn next_transaction_id(&mut self) -> u64 {
        let id = self.next_transaction_id;
        self.next_transaction_id += 1;
        id
    }

    pub(super) fn next_transfer_id(&mut self) -> u64 {
        let id = self.next_transfer_id;
        self.next_transfer_id += 1;
        id
    }

    pub(super) fn next_trade_id(&mut self) -> u64 {
        let id = self.next_trade_id;
        self.next_trade_id += 1;
        id
    }
}
