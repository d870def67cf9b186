//! Account and balance management.
//!
//! An account holds one cash balance per currency plus the user's portfolio
//! positions. Every money movement in the engine passes through the debit and
//! credit paths here.

use crate::portfolio::Position;
use crate::types::{Cash, Currency, Symbol, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: UserId,
    pub balances: HashMap<Currency, Cash>,
    pub positions: HashMap<Symbol, Position>,
    pub created_at: Timestamp,
}

impl Account {
    /// Creates an account with zero-seeded rows for the standard fiat set.
    pub fn new(id: UserId, timestamp: Timestamp) -> Self {
        let mut balances = HashMap::new();
        for currency in Currency::SEEDED {
            balances.insert(currency, Cash::zero());
        }
        Self {
            id,
            balances,
            positions: HashMap::new(),
            created_at: timestamp,
        }
    }

    /// Balance in the given currency. An absent row reads as zero.
    pub fn balance(&self, currency: Currency) -> Cash {
        self.balances.get(&currency).copied().unwrap_or(Cash::zero())
    }

    /// Adds to a balance, creating the row if absent. Never fails.
    pub fn credit(&mut self, currency: Currency, amount: Cash) -> Cash {
        let entry = self.balances.entry(currency).or_insert(Cash::zero());
        *entry = entry.add(amount);
        *entry
    }

    /// Removes from a balance. Fails without writing when the available amount
    /// is short; an absent row counts as zero available.
    pub fn debit(&mut self, currency: Currency, amount: Cash) -> Result<Cash, BalanceError> {
        let available = self.balance(currency);
        if amount.value() > available.value() {
            return Err(BalanceError::InsufficientFunds {
                currency,
                requested: amount,
                available,
            });
        }
        let new_balance = available.sub(amount);
        self.balances.insert(currency, new_balance);
        Ok(new_balance)
    }

    // direct overwrite; the non-negativity check sits at the engine boundary
    pub fn set_balance(&mut self, currency: Currency, amount: Cash) {
        self.balances.insert(currency, amount);
    }

    pub fn get_position(&self, symbol: &Symbol) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn set_position(&mut self, position: Position) {
        self.positions.insert(position.symbol.clone(), position);
    }

    pub fn remove_position(&mut self, symbol: &Symbol) -> Option<Position> {
        self.positions.remove(symbol)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BalanceError {
    #[error("Insufficient funds in {currency}: requested {requested}, available {available}")]
    InsufficientFunds {
        currency: Currency,
        requested: Cash,
        available: Cash,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_account() -> Account {
        let mut account = Account::new(UserId(1), Timestamp::from_millis(0));
        account.credit(Currency::Eur, Cash::new(dec!(10000)));
        account
    }

    #[test]
    fn seeded_rows_start_at_zero() {
        let account = Account::new(UserId(7), Timestamp::from_millis(0));

        for currency in Currency::SEEDED {
            assert_eq!(account.balance(currency).value(), dec!(0));
        }
        // USDC has no seeded row; absent reads as zero
        assert_eq!(account.balance(Currency::Usdc).value(), dec!(0));
    }

    #[test]
    fn credit_and_debit() {
        let mut account = test_account();
        assert_eq!(account.balance(Currency::Eur).value(), dec!(10000));

        account.credit(Currency::Eur, Cash::new(dec!(5000)));
        assert_eq!(account.balance(Currency::Eur).value(), dec!(15000));

        let remaining = account.debit(Currency::Eur, Cash::new(dec!(3000))).unwrap();
        assert_eq!(remaining.value(), dec!(12000));
    }

    #[test]
    fn debit_insufficient_funds() {
        let mut account = test_account();
        let result = account.debit(Currency::Eur, Cash::new(dec!(20000)));
        assert!(matches!(
            result,
            Err(BalanceError::InsufficientFunds { .. })
        ));
        // nothing written on failure
        assert_eq!(account.balance(Currency::Eur).value(), dec!(10000));
    }

    #[test]
    fn debit_absent_row_counts_as_zero() {
        let mut account = test_account();
        let result = account.debit(Currency::Usdc, Cash::new(dec!(1)));

        match result {
            Err(BalanceError::InsufficientFunds { available, .. }) => {
                assert_eq!(available.value(), dec!(0));
            }
            other => panic!("expected InsufficientFunds, got {other:?}"),
        }
    }

    #[test]
    fn credit_creates_missing_row() {
        let mut account = test_account();
        assert!(!account.balances.contains_key(&Currency::Usdc));

        account.credit(Currency::Usdc, Cash::new(dec!(250)));
        assert_eq!(account.balance(Currency::Usdc).value(), dec!(250));
    }

    #[test]
    fn set_balance_overwrites() {
        let mut account = test_account();
        account.set_balance(Currency::Eur, Cash::new(dec!(42)));
        assert_eq!(account.balance(Currency::Eur).value(), dec!(42));
    }
}
