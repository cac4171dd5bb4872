//! Wallet entity - A stored-value balance and the history that produced it.
//!
//! The balance is never set directly. Every change goes through
//! [`WalletAccount::append`], which adds the transaction amount and records the
//! transaction in one step, so the balance always equals the ordered sum of
//! the recorded amounts.

use super::transaction::Transaction;
use serde::Serialize;

/// Wallet account model
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WalletAccount {
    owner_id: String,
    balance: f64,
    transactions: Vec<Transaction>,
}

impl WalletAccount {
    /// Creates an empty wallet for `owner_id`.
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            balance: 0.0,
            transactions: Vec::new(),
        }
    }

    /// Owner of the wallet
    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Current balance
    #[must_use]
    pub const fn balance(&self) -> f64 {
        self.balance
    }

    /// All transactions, oldest first
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The most recent `limit` transactions, newest first.
    pub fn recent_transactions(&self, limit: usize) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().rev().take(limit)
    }

    /// Sum of all recorded amounts, added in recording order.
    #[must_use]
    pub fn transactions_total(&self) -> f64 {
        self.transactions
            .iter()
            .fold(0.0, |total, transaction| total + transaction.amount)
    }

    /// Records a transaction and applies its amount to the balance.
    ///
    /// Callers in the ledger validate the transaction first; this only keeps the
    /// two fields in step.
    pub(crate) fn append(&mut self, transaction: Transaction) {
        self.balance += transaction.amount;
        self.transactions.push(transaction);
    }
}
