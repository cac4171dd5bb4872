//! Wallet session - The wallet screen backed by a payment service.

use crate::{
    core::{PaymentMethodSelection, TopUpForm, WalletLedger},
    entities::{PaymentMethod, Transaction, WalletAccount},
    errors::Result,
    services::{PaymentService, RetryPolicy, with_retry},
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Mirrors the rider's wallet and submits top-ups to the payment service.
pub struct WalletSession {
    ledger: WalletLedger,
    form: TopUpForm,
    methods: PaymentMethodSelection,
    service: Arc<dyn PaymentService>,
    retry: RetryPolicy,
}

impl WalletSession {
    /// Loads the wallet history from `service`.
    ///
    /// # Arguments
    /// * `owner_id` - Rider the wallet belongs to
    /// * `currency` - Display currency (e.g., "RM")
    /// * `form` - Top-up form with its quick amounts
    /// * `methods` - Payment methods offered
    /// * `service` - Book of record for the wallet
    /// * `retry` - Policy for service calls
    pub async fn connect(
        owner_id: &str,
        currency: &str,
        form: TopUpForm,
        methods: PaymentMethodSelection,
        service: Arc<dyn PaymentService>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let history = with_retry(&retry, "transactions", || service.transactions()).await?;
        let ledger = WalletLedger::from_transactions(owner_id, currency, history)?;
        Ok(Self {
            ledger,
            form,
            methods,
            service,
            retry,
        })
    }

    /// The mirrored account
    #[must_use]
    pub const fn account(&self) -> &WalletAccount {
        self.ledger.account()
    }

    /// Current balance
    #[must_use]
    pub const fn balance(&self) -> f64 {
        self.ledger.balance()
    }

    /// The local ledger, for display helpers
    #[must_use]
    pub const fn ledger(&self) -> &WalletLedger {
        &self.ledger
    }

    /// The top-up form
    #[must_use]
    pub const fn form(&self) -> &TopUpForm {
        &self.form
    }

    /// Records typed input in the top-up form.
    pub fn set_amount_input(&mut self, input: impl Into<String>) {
        self.form.set_amount_input(input);
    }

    /// Pre-fills the top-up form with `value`.
    pub fn quick_amount(&mut self, value: f64) {
        self.form.quick_amount(value);
    }

    /// Selects the payment method with `id`.
    ///
    /// # Errors
    /// `PaymentMethodNotFound` if no such method is offered.
    pub fn select_method(&mut self, id: &str) -> Result<&PaymentMethod> {
        self.methods.select(id)
    }

    /// Offered payment methods and the current selection
    #[must_use]
    pub const fn methods(&self) -> &PaymentMethodSelection {
        &self.methods
    }

    /// Submits the amount in the form.
    ///
    /// The amount is validated locally before the service is called. The form is
    /// cleared only when the service accepts the top-up. Retries reuse one
    /// request id, so the wallet is credited at most once.
    pub async fn top_up(&mut self) -> Result<&WalletAccount> {
        let amount = self.form.parse()?;
        let request_id = Uuid::new_v4().to_string();
        let service = Arc::clone(&self.service);
        let transaction = with_retry(&self.retry, "top_up", || {
            service.top_up(&request_id, amount)
        })
        .await?;
        self.mirror(transaction).await?;
        self.form.clear();
        info!(
            amount,
            %request_id,
            method = self.methods.selected().map(|method| method.id.as_str()),
            balance = self.ledger.balance(),
            "Top-up completed"
        );
        Ok(self.ledger.account())
    }

    /// Pays for a ride through the service and records the charge.
    ///
    /// The service decides whether the wallet covers the fare. Retries reuse one
    /// request id, so the fare is charged at most once.
    pub async fn pay_for_ride(&mut self, fare: f64, description: &str) -> Result<Transaction> {
        let request_id = Uuid::new_v4().to_string();
        let service = Arc::clone(&self.service);
        let transaction = with_retry(&self.retry, "charge_ride", || {
            service.charge_ride(&request_id, fare, description)
        })
        .await?;
        self.mirror(transaction.clone()).await?;
        Ok(transaction)
    }

    /// Replaces the local mirror with the service's current history.
    pub async fn refresh(&mut self) -> Result<()> {
        let service = Arc::clone(&self.service);
        let history = with_retry(&self.retry, "transactions", || service.transactions()).await?;
        self.ledger = WalletLedger::from_transactions(
            self.ledger.account().owner_id(),
            self.ledger.currency(),
            history,
        )?;
        Ok(())
    }

    /// Records a transaction the service has already committed.
    ///
    /// A mirror that disagrees with the service is rebuilt from its history.
    async fn mirror(&mut self, transaction: Transaction) -> Result<()> {
        let transaction_id = transaction.id.clone();
        let recorded = self.ledger.record(transaction).map(|_| ());
        if let Err(error) = recorded {
            warn!(
                %transaction_id,
                %error,
                "Wallet mirror out of step with the payment service, resyncing"
            );
            self.refresh().await?;
        }
        Ok(())
    }
}
