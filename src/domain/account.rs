//! Account
//!
//! A pre-provisioned client with a fixed overdraft limit. The limit check
//! lives here so every store applies exactly the same rule inside its own
//! serialization point.

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Account identifier (matches `clientes.id`)
pub type AccountId = i32;

/// Balance/limit pair of an account at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// How far below zero the balance may go. Immutable after provisioning.
    pub limit: i64,
    pub balance: i64,
}

impl Account {
    pub fn new(id: AccountId, limit: i64, balance: i64) -> Self {
        Self { id, limit, balance }
    }

    /// Compute the balance after applying `delta`.
    ///
    /// Fails with `LimitExceeded` if the result would drop below `-limit`.
    /// Credits are never rejected by the limit rule.
    pub fn apply(&self, delta: i64) -> Result<i64, DomainError> {
        let new_balance = self
            .balance
            .checked_add(delta)
            .ok_or(DomainError::BalanceOverflow)?;

        if new_balance < -self.limit {
            return Err(DomainError::limit_exceeded(self.balance, delta, self.limit));
        }

        Ok(new_balance)
    }

    /// Whether the stored state satisfies `balance >= -limit`
    pub fn is_within_limit(&self) -> bool {
        self.balance >= -self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_down_to_limit() {
        let account = Account::new(1, 1000, 0);

        let balance = account.apply(-1000).unwrap();
        assert_eq!(balance, -1000);

        let account = Account { balance, ..account };
        assert!(account.is_within_limit());
        assert!(matches!(
            account.apply(-1),
            Err(DomainError::LimitExceeded { balance: -1000, delta: -1, limit: 1000 })
        ));
    }

    #[test]
    fn test_credit_always_admissible() {
        let account = Account::new(2, 0, 0);
        assert_eq!(account.apply(50).unwrap(), 50);
    }

    #[test]
    fn test_zero_limit_rejects_any_overdraft() {
        let account = Account::new(3, 0, 10);
        assert_eq!(account.apply(-10).unwrap(), 0);
        assert!(account.apply(-11).is_err());
    }

    #[test]
    fn test_overflow() {
        let account = Account::new(4, 0, i64::MAX);
        assert_eq!(account.apply(1), Err(DomainError::BalanceOverflow));
    }
}
