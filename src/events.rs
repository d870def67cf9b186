// 8.0: every state change produces an event. used for audit trails, state
// reconstruction, and notifying external systems. the EventPayload enum lists
// all event types.

use crate::trade::TradeStatus;
use crate::transfer::TransferStatus;
use crate::types::{
    AssetType, Cash, Currency, Price, Symbol, Timestamp, TradeId, TransactionId, TransferId,
    UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    // Account events
    AccountCreated(AccountCreatedEvent),

    // Portfolio events
    AssetBought(AssetBoughtEvent),
    AssetSold(AssetSoldEvent),

    // Conversion events
    CurrencyConverted(CurrencyConvertedEvent),

    // Transfer events
    TransferCreated(TransferCreatedEvent),
    TransferSettled(TransferSettledEvent),
    TransferRecorded(TransferRecordedEvent),

    // Trade events
    TradeOpened(TradeOpenedEvent),
    TradeClosed(TradeClosedEvent),

    // Administrative overrides
    BalanceAdjusted(BalanceAdjustedEvent),
    PositionAdjusted(PositionAdjustedEvent),
    PositionRemoved(PositionRemovedEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreatedEvent {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetBoughtEvent {
    pub user_id: UserId,
    pub transaction_id: TransactionId,
    pub symbol: Symbol,
    pub asset_type: AssetType,
    pub quantity: Decimal,
    pub price: Price,
    pub total_amount: Cash,
    pub currency: Currency,
    pub new_balance: Cash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSoldEvent {
    pub user_id: UserId,
    pub transaction_id: TransactionId,
    pub symbol: Symbol,
    pub quantity: Decimal,
    pub price: Price,
    pub total_amount: Cash,
    pub currency: Currency,
    // zero means the position row was deleted
    pub remaining_quantity: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConvertedEvent {
    pub user_id: UserId,
    pub from: Currency,
    pub to: Currency,
    pub from_amount: Cash,
    pub to_amount: Cash,
    pub rate: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCreatedEvent {
    pub transfer_id: TransferId,
    pub user_id: UserId,
    pub amount: Cash,
    // the debited ledger currency; None for crypto transfers
    pub debited: Option<Currency>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferSettledEvent {
    pub transfer_id: TransferId,
    pub user_id: UserId,
    pub status: TransferStatus,
    pub refunded: Option<Cash>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecordedEvent {
    pub transfer_id: TransferId,
    pub user_id: UserId,
    pub status: TransferStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeOpenedEvent {
    pub trade_id: TradeId,
    pub user_id: UserId,
    pub amount: Cash,
    pub currency: Currency,
    pub new_balance: Cash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeClosedEvent {
    pub trade_id: TradeId,
    pub user_id: UserId,
    pub status: TradeStatus,
    pub returned: Cash,
    pub profit: Cash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceAdjustedEvent {
    pub user_id: UserId,
    pub currency: Currency,
    pub amount: Cash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionAdjustedEvent {
    pub user_id: UserId,
    pub symbol: Symbol,
    pub quantity: Decimal,
    pub average_buy_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRemovedEvent {
    pub user_id: UserId,
    pub symbol: Symbol,
}
