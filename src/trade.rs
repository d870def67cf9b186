// 6.0: single-slot speculative trades. opening escrows the principal by
// debiting the balance; the trade row itself is the escrow record (balance
// totals alone understate a user's economic position while a trade is open).
// at most one ACTIVE trade per user.

use crate::types::{Cash, Currency, Timestamp, TradeId, UserId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    Active,
    ClosedByUser,
    ClosedByAdmin,
}

impl TradeStatus {
    pub fn is_closed(&self) -> bool {
        !matches!(self, TradeStatus::Active)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub user_id: UserId,
    // escrowed principal, held by this row while ACTIVE
    pub amount: Cash,
    pub currency: Currency,
    pub status: TradeStatus,
    pub profit: Option<Cash>,
    pub profit_percent: Option<Decimal>,
    pub trading_pair: Option<String>,
    pub admin_comment: Option<String>,
    pub created_at: Timestamp,
    pub closed_at: Option<Timestamp>,
}

impl Trade {
    pub fn open(
        id: TradeId,
        user_id: UserId,
        amount: Cash,
        currency: Currency,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            amount,
            currency,
            status: TradeStatus::Active,
            profit: None,
            profit_percent: None,
            trading_pair: None,
            admin_comment: None,
            created_at: timestamp,
            closed_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == TradeStatus::Active
    }
}

// 6.1: settlement arithmetic for an admin close. the self-close path forces
// profit to zero, so both paths reduce to this.
#[derive(Debug, Clone, Copy)]
pub struct TradeSettlement {
    // principal + profit; credited back to the balance
    pub total_return: Cash,
    pub profit: Cash,
    pub profit_percent: Decimal,
}

// profit may be negative (a loss). the engine does not reject a total return
// below zero; callers clamp profit against -principal.
pub fn settle(principal: Cash, profit: Cash) -> TradeSettlement {
    let profit_percent = profit.value() / principal.value() * dec!(100);
    TradeSettlement {
        total_return: principal.add(profit),
        profit,
        profit_percent,
    }
}
