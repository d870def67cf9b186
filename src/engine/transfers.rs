//! Transfer creation and settlement.
//!
//! A fiat transfer debits the ledger the moment it is created and sits
//! PENDING until an administrator settles it; rejection is the only path that
//! puts the money back. Crypto transfers never touch the internal ledger —
//! they represent funds leaving through an external wallet the ledger does
//! not custody.

use super::core::Engine;
use super::results::{LedgerError, TransferReceipt};
use crate::events::{
    EventPayload, TransferCreatedEvent, TransferRecordedEvent, TransferSettledEvent,
};
use crate::transfer::{SettleOutcome, Transfer, TransferRequest, TransferStatus};
use crate::types::{Cash, Timestamp, TransferId, UserId};
use tracing::{debug, info};

impl Engine {
    /// Creates a transfer in PENDING. For fiat, the amount is debited from
    /// the balance atomically with the creation; a shortfall writes nothing.
    pub fn create_transfer(
        &mut self,
        user_id: UserId,
        request: &TransferRequest,
    ) -> Result<TransferReceipt, LedgerError> {
        debug!(user = user_id.0, amount = %request.amount, "create transfer");

        let details = request.validate()?;
        let amount = Cash::new(request.amount);
        let timestamp = self.current_time;

        let account = self.require_account_mut(user_id)?;

        let new_balance = match details.fiat_currency() {
            Some(currency) => Some(account.debit(currency, amount)?),
            None => None,
        };

        let transfer_id = TransferId(self.next_transfer_id());
        let transfer = Transfer {
            id: transfer_id,
            user_id,
            amount,
            details,
            status: TransferStatus::Pending,
            created_at: timestamp,
        };
        let debited = transfer.details.fiat_currency();
        self.transfers.insert(transfer_id, transfer);

        self.emit_event(EventPayload::TransferCreated(TransferCreatedEvent {
            transfer_id,
            user_id,
            amount,
            debited,
        }));

        info!(user = user_id.0, transfer = transfer_id.0, %amount, "transfer created");

        Ok(TransferReceipt {
            transfer_id,
            new_balance,
        })
    }

    /// Settles a PENDING transfer to COMPLETED or REJECTED. Transitions are
    /// one-way: a terminal transfer fails with `AlreadySettled`. Rejecting a
    /// fiat transfer credits the original amount back exactly once;
    /// completion moves no money (it already left at creation), and crypto
    /// rejections refund nothing.
    pub fn settle_transfer(
        &mut self,
        transfer_id: TransferId,
        outcome: SettleOutcome,
    ) -> Result<Transfer, LedgerError> {
        debug!(transfer = transfer_id.0, ?outcome, "settle transfer");

        let transfer = self
            .transfers
            .get(&transfer_id)
            .ok_or(LedgerError::TransferNotFound(transfer_id))?;

        if transfer.status.is_terminal() {
            return Err(LedgerError::AlreadySettled(transfer_id));
        }

        let user_id = transfer.user_id;
        let amount = transfer.amount;
        let refund_currency = match outcome {
            SettleOutcome::Rejected => transfer.details.fiat_currency(),
            SettleOutcome::Completed => None,
        };

        let refunded = match refund_currency {
            Some(currency) => {
                let account = self.require_account_mut(user_id)?;
                account.credit(currency, amount);
                Some(amount)
            }
            None => None,
        };

        let status = outcome.status();
        let transfer = self
            .transfers
            .get_mut(&transfer_id)
            .expect("transfer existence checked above");
        transfer.status = status;
        let settled = transfer.clone();

        self.emit_event(EventPayload::TransferSettled(TransferSettledEvent {
            transfer_id,
            user_id,
            status,
            refunded,
        }));

        info!(transfer = transfer_id.0, ?status, "transfer settled");

        Ok(settled)
    }

    /// Administrative direct creation: records a transfer in the given status
    /// with an optional backdated timestamp, bypassing the PENDING debit
    /// entirely. Used to record settlements that happened outside the ledger;
    /// no balance is touched.
    pub fn record_transfer(
        &mut self,
        user_id: UserId,
        request: &TransferRequest,
        status: TransferStatus,
        created_at: Option<Timestamp>,
    ) -> Result<Transfer, LedgerError> {
        debug!(user = user_id.0, ?status, "record transfer");

        let details = request.validate()?;
        let amount = Cash::new(request.amount);

        if self.get_account(user_id).is_none() {
            return Err(LedgerError::AccountNotFound(user_id));
        }

        let transfer_id = TransferId(self.next_transfer_id());
        let transfer = Transfer {
            id: transfer_id,
            user_id,
            amount,
            details,
            status,
            created_at: created_at.unwrap_or(self.current_time),
        };
        self.transfers.insert(transfer_id, transfer.clone());

        self.emit_event(EventPayload::TransferRecorded(TransferRecordedEvent {
            transfer_id,
            user_id,
            status,
        }));

        info!(user = user_id.0, transfer = transfer_id.0, ?status, "transfer recorded");

        Ok(transfer)
    }
}
