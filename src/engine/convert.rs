//! Currency conversion between two balances of the same account.

use super::core::Engine;
use super::results::{Conversion, LedgerError};
use crate::events::{CurrencyConvertedEvent, EventPayload};
use crate::types::{Cash, Currency, UserId, ValidationError};
use rust_decimal::Decimal;
use tracing::{debug, info};

impl Engine {
    /// Debits `amount` from the `from` balance and credits `amount * rate`
    /// into the `to` balance at the fixed table rate, as one unit. Creates
    /// the destination row if absent. Conversions leave no transaction-log
    /// row, which is how history tells them apart from buys and sells.
    pub fn convert(
        &mut self,
        user_id: UserId,
        from: Currency,
        to: Currency,
        amount: Decimal,
    ) -> Result<Conversion, LedgerError> {
        debug!(user = user_id.0, %from, %to, %amount, "convert");

        if from == to {
            return Err(ValidationError::SameCurrency.into());
        }
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount.into());
        }

        let from_amount = Cash::new(amount);
        let rate = self.rates.rate(from, to);
        let to_amount = from_amount.mul(rate);

        let account = self.require_account_mut(user_id)?;
        account.debit(from, from_amount)?;
        account.credit(to, to_amount);

        self.emit_event(EventPayload::CurrencyConverted(CurrencyConvertedEvent {
            user_id,
            from,
            to,
            from_amount,
            to_amount,
            rate,
        }));

        info!(user = user_id.0, %from, %to, %from_amount, %to_amount, "conversion settled");

        Ok(Conversion {
            from_amount,
            to_amount,
            rate,
        })
    }
}
