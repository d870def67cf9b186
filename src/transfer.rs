// 5.0: outbound transfer workflow. a transfer is created PENDING (fiat debits
// the ledger at creation; crypto leaves via an external wallet path and debits
// nothing) and settles exactly once to COMPLETED or REJECTED.

use crate::types::{Cash, Currency, Timestamp, TransferId, UserId, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferStatus {
    Pending,
    Completed,
    Rejected,
}

impl TransferStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransferStatus::Pending)
    }
}

// the two legal settlement targets; PENDING is not one of them, so the type
// rules out re-pending a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SettleOutcome {
    Completed,
    Rejected,
}

impl SettleOutcome {
    pub fn status(&self) -> TransferStatus {
        match self {
            SettleOutcome::Completed => TransferStatus::Completed,
            SettleOutcome::Rejected => TransferStatus::Rejected,
        }
    }
}

// 5.1: type-specific payload. fiat targets a bank account, crypto an external
// wallet address whose currency is free text (BTC, ETH, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum TransferDetails {
    Fiat {
        currency: Currency,
        recipient: String,
        iban: String,
        purpose: Option<String>,
    },
    Crypto {
        address: String,
        crypto_currency: String,
    },
}

impl TransferDetails {
    pub fn is_fiat(&self) -> bool {
        matches!(self, TransferDetails::Fiat { .. })
    }

    /// The ledger currency a fiat transfer settles in. Crypto transfers have
    /// no ledger leg.
    pub fn fiat_currency(&self) -> Option<Currency> {
        match self {
            TransferDetails::Fiat { currency, .. } => Some(*currency),
            TransferDetails::Crypto { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,
    pub user_id: UserId,
    pub amount: Cash,
    pub details: TransferDetails,
    pub status: TransferStatus,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferKind {
    Fiat,
    Crypto,
}

// 5.2: what the caller submits. loosely typed like the inbound payload it
// models; validate() is the pure gate between request and ledger mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferRequest {
    pub kind: Option<TransferKind>,
    pub amount: Decimal,
    pub currency: Option<Currency>,
    pub recipient: Option<String>,
    pub iban: Option<String>,
    pub purpose: Option<String>,
    pub crypto_address: Option<String>,
    pub crypto_currency: Option<String>,
}

impl TransferRequest {
    pub fn fiat(
        amount: Decimal,
        currency: Currency,
        recipient: impl Into<String>,
        iban: impl Into<String>,
    ) -> Self {
        Self {
            kind: Some(TransferKind::Fiat),
            amount,
            currency: Some(currency),
            recipient: Some(recipient.into()),
            iban: Some(iban.into()),
            ..Self::default()
        }
    }

    pub fn crypto(
        amount: Decimal,
        address: impl Into<String>,
        crypto_currency: impl Into<String>,
    ) -> Self {
        Self {
            kind: Some(TransferKind::Crypto),
            amount,
            crypto_address: Some(address.into()),
            crypto_currency: Some(crypto_currency.into()),
            ..Self::default()
        }
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Checks the type-specific required fields and returns the typed payload.
    /// Runs before any row is touched.
    pub fn validate(&self) -> Result<TransferDetails, ValidationError> {
        let kind = self.kind.ok_or(ValidationError::MissingField("type"))?;

        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }

        match kind {
            TransferKind::Fiat => {
                let currency = self.currency.ok_or(ValidationError::MissingField("currency"))?;
                let recipient = self
                    .recipient
                    .clone()
                    .ok_or(ValidationError::MissingField("recipient"))?;
                let iban = self.iban.clone().ok_or(ValidationError::MissingField("iban"))?;

                Ok(TransferDetails::Fiat {
                    currency,
                    recipient,
                    iban,
                    purpose: self.purpose.clone(),
                })
            }
            TransferKind::Crypto => {
                let address = self
                    .crypto_address
                    .clone()
                    .ok_or(ValidationError::MissingField("cryptoAddress"))?;
                let crypto_currency = self
                    .crypto_currency
                    .clone()
                    .ok_or(ValidationError::MissingField("cryptoCurrency"))?;

                Ok(TransferDetails::Crypto {
                    address,
                    crypto_currency,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn fiat_request_validates() {
        let request = TransferRequest::fiat(dec!(500), Currency::Eur, "Erika M.", "DE02120300000000202051")
            .with_purpose("rent");

        let details = request.validate().unwrap();
        assert!(details.is_fiat());
        assert_eq!(details.fiat_currency(), Some(Currency::Eur));
    }

    #[test]
    fn crypto_request_validates() {
        let request = TransferRequest::crypto(dec!(0.25), "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh", "BTC");

        let details = request.validate().unwrap();
        assert!(!details.is_fiat());
        assert_eq!(details.fiat_currency(), None);
    }

    #[test]
    fn fiat_missing_iban_rejected() {
        let mut request = TransferRequest::fiat(dec!(500), Currency::Eur, "Erika M.", "x");
        request.iban = None;

        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingField("iban"))
        );
    }

    #[test]
    fn crypto_missing_address_rejected() {
        let mut request = TransferRequest::crypto(dec!(1), "addr", "ETH");
        request.crypto_address = None;

        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingField("cryptoAddress"))
        );
    }

    #[test]
    fn non_positive_amount_rejected() {
        let request = TransferRequest::fiat(dec!(0), Currency::Eur, "Erika M.", "DE02");
        assert_eq!(request.validate(), Err(ValidationError::NonPositiveAmount));

        let request = TransferRequest::crypto(dec!(-3), "addr", "BTC");
        assert_eq!(request.validate(), Err(ValidationError::NonPositiveAmount));
    }

    #[test]
    fn status_terminality() {
        assert!(!TransferStatus::Pending.is_terminal());
        assert!(TransferStatus::Completed.is_terminal());
        assert!(TransferStatus::Rejected.is_terminal());
    }
}
