//! Payment port.
//!
//! The payment service is the book of record for a wallet. Clients keep a
//! local [`WalletLedger`] mirror and record the transactions the service
//! returns, so both sides agree on the balance.
//!
//! Every money-moving call carries a client-generated request id. A service
//! answers a repeated request id with the transaction it already committed,
//! so a call retried after a lost response never moves the money twice.

use crate::{
    core::WalletLedger,
    entities::Transaction,
    errors::{Error, Result},
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Moves money into and out of a rider's wallet.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Credits `amount` and returns the completed transaction.
    ///
    /// Repeating `request_id` returns the original transaction unchanged.
    async fn top_up(&self, request_id: &str, amount: f64) -> Result<Transaction>;

    /// Debits `fare` for a ride and returns the completed transaction.
    ///
    /// Repeating `request_id` returns the original transaction unchanged.
    async fn charge_ride(
        &self,
        request_id: &str,
        fare: f64,
        description: &str,
    ) -> Result<Transaction>;

    /// The full history, oldest first.
    async fn transactions(&self) -> Result<Vec<Transaction>>;
}

#[derive(Debug)]
struct Books {
    ledger: WalletLedger,
    processed: HashMap<String, Transaction>,
}

impl Books {
    fn replay(&self, request_id: &str) -> Option<Transaction> {
        let transaction = self.processed.get(request_id).cloned()?;
        debug!(request_id, transaction_id = %transaction.id, "Replaying processed request");
        Some(transaction)
    }

    fn remember(&mut self, request_id: &str, transaction: Transaction) -> Transaction {
        self.processed
            .insert(request_id.to_string(), transaction.clone());
        transaction
    }
}

/// Payment service that keeps its ledger in process.
#[derive(Debug)]
pub struct LocalPaymentService {
    books: Mutex<Books>,
}

impl LocalPaymentService {
    /// Serves the wallet held in `ledger`.
    #[must_use]
    pub fn new(ledger: WalletLedger) -> Self {
        Self {
            books: Mutex::new(Books {
                ledger,
                processed: HashMap::new(),
            }),
        }
    }
}

fn last_transaction(ledger: &WalletLedger) -> Result<Transaction> {
    ledger
        .account()
        .transactions()
        .last()
        .cloned()
        .ok_or_else(|| Error::Transport {
            message: "ledger recorded no transaction".to_string(),
        })
}

#[async_trait]
impl PaymentService for LocalPaymentService {
    async fn top_up(&self, request_id: &str, amount: f64) -> Result<Transaction> {
        let mut books = self.books.lock().await;
        if let Some(transaction) = books.replay(request_id) {
            return Ok(transaction);
        }
        books.ledger.apply_top_up(amount)?;
        info!(request_id, amount, "Payment provider accepted top-up");
        let transaction = last_transaction(&books.ledger)?;
        Ok(books.remember(request_id, transaction))
    }

    async fn charge_ride(
        &self,
        request_id: &str,
        fare: f64,
        description: &str,
    ) -> Result<Transaction> {
        let mut books = self.books.lock().await;
        if let Some(transaction) = books.replay(request_id) {
            return Ok(transaction);
        }
        let transaction = books.ledger.charge_ride(fare, description)?.clone();
        Ok(books.remember(request_id, transaction))
    }

    async fn transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.books.lock().await.ledger.account().transactions().to_vec())
    }
}
