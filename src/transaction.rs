// 4.0: the transaction log. one immutable row per settled buy or sell, never
// mutated or deleted. conversions deliberately leave no row here, which is how
// history screens tell them apart from trades.

use crate::types::{AssetType, Cash, Currency, Price, Symbol, Timestamp, TransactionId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub kind: TransactionKind,
    pub symbol: Symbol,
    pub asset_type: AssetType,
    pub quantity: Decimal,
    pub price: Price,
    pub total_amount: Cash,
    pub currency: Currency,
    pub created_at: Timestamp,
}
