//! The module contains the `Ledger` struct and its implementation.
//!
//! A ledger is the full history of point movements for one entity. Entries
//! are signed integers appended in order:
//! - positive values are points granted with [`Ledger::add`]
//! - negative values are points consumed with [`Ledger::spend`]
//!
//! The balance is always the sum of the entries. Nothing is ever edited or
//! removed, so the sequence doubles as the audit trail.

use crate::{PointsError, ResultBook};

/// Result of [`Ledger::spend`].
///
/// Running out of points is a routine outcome, so it is reported here rather
/// than as a [`PointsError`].
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpendOutcome {
    /// The amount was deducted and a negative entry appended.
    Spent,
    /// The ledger was left untouched.
    InsufficientBalance { balance: i64, requested: u32 },
}

impl SpendOutcome {
    pub fn is_spent(&self) -> bool {
        matches!(self, Self::Spent)
    }
}

/// A points ledger.
///
/// `committed` splits `transactions` in two regions: `[0, committed)` is
/// already durable, `[committed, len)` only lives in memory until the
/// [`Store`](crate::Store) writes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ledger {
    identifier: String,
    transactions: Vec<i64>,
    committed: usize,
    balance: i64,
}

impl Ledger {
    /// Create an empty ledger for a new entity.
    pub fn new(identifier: impl Into<String>) -> ResultBook<Self> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(PointsError::InvalidIdentifier);
        }

        Ok(Self {
            identifier,
            transactions: Vec::new(),
            committed: 0,
            balance: 0,
        })
    }

    /// Rebuild a ledger from an already persisted history.
    ///
    /// Every entry is considered committed. The history is trusted as is: a
    /// sequence whose running sum dips below zero is accepted.
    pub fn from_transactions(
        identifier: impl Into<String>,
        transactions: Vec<i64>,
    ) -> ResultBook<Self> {
        let mut ledger = Self::new(identifier)?;
        ledger.balance = transactions.iter().sum();
        ledger.committed = transactions.len();
        ledger.transactions = transactions;
        Ok(ledger)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Grant points. There is no upper limit.
    pub fn add(&mut self, amount: u32) {
        self.push(i64::from(amount));
    }

    /// Consume points if the balance covers `amount`.
    ///
    /// Taking `&mut self` makes the check and the append a single step: no
    /// other mutation of this ledger can run in between.
    pub fn spend(&mut self, amount: u32) -> SpendOutcome {
        let amount_points = i64::from(amount);
        if self.balance < amount_points {
            return SpendOutcome::InsufficientBalance {
                balance: self.balance,
                requested: amount,
            };
        }

        self.push(-amount_points);
        SpendOutcome::Spent
    }

    pub fn transactions(&self) -> &[i64] {
        &self.transactions
    }

    /// Entries appended since the last successful store.
    pub fn uncommitted_transactions(&self) -> &[i64] {
        &self.transactions[self.committed..]
    }

    /// Number of entries already durable; also the position the next
    /// stored entry gets.
    pub fn committed_len(&self) -> usize {
        self.committed
    }

    /// Advance the commit cursor to the end of the history.
    pub(crate) fn mark_committed(&mut self) {
        self.committed = self.transactions.len();
    }

    fn push(&mut self, amount: i64) {
        self.transactions.push(amount);
        self.balance += amount;
    }
}
