// 10.0.2: receipts and errors for engine operations.

use crate::account::BalanceError;
use crate::portfolio::PortfolioError;
use crate::types::{Cash, TradeId, TransactionId, TransferId, UserId, ValidationError};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct BuyReceipt {
    pub transaction_id: TransactionId,
    pub total_amount: Cash,
    pub new_balance: Cash,
    pub new_quantity: Decimal,
    pub average_buy_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct SellReceipt {
    pub transaction_id: TransactionId,
    pub total_amount: Cash,
    pub new_balance: Cash,
    // zero means the position row was deleted
    pub remaining_quantity: Decimal,
}

#[derive(Debug, Clone)]
pub struct Conversion {
    pub from_amount: Cash,
    pub to_amount: Cash,
    pub rate: Decimal,
}

#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub transfer_id: TransferId,
    // balance after the creation debit; None for crypto transfers
    pub new_balance: Option<Cash>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LedgerError {
    #[error("Account {0:?} not found")]
    AccountNotFound(UserId),

    #[error("Transfer {0:?} not found")]
    TransferNotFound(TransferId),

    #[error("Trade {0:?} not found")]
    TradeNotFound(TradeId),

    #[error("Transfer {0:?} is already settled")]
    AlreadySettled(TransferId),

    #[error("Trade {0:?} is already closed")]
    AlreadyClosed(TradeId),

    #[error("Trade {trade_id:?} does not belong to user {user_id:?}")]
    NotOwner { trade_id: TradeId, user_id: UserId },

    #[error("User {user_id:?} already has active trade {trade_id:?}")]
    ConflictingActiveTrade { user_id: UserId, trade_id: TradeId },

    #[error("Balance error: {0}")]
    Balance(#[from] BalanceError),

    #[error("Portfolio error: {0}")]
    Portfolio(#[from] PortfolioError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}
