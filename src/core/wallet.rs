//! Wallet ledger - Top-ups, ride charges and the top-up form.
//!
//! Every mutation builds and validates its transaction before touching the
//! account, then records it in a single step. A rejected operation leaves the
//! balance and the history exactly as they were.

use crate::{
    entities::{PaymentMethod, Transaction, TransactionKind, TransactionStatus, WalletAccount},
    errors::{Error, Result},
};
use tracing::{debug, info};

/// Currency shown when none is configured
pub const DEFAULT_CURRENCY: &str = "RM";
/// Quick top-up buttons shown when none are configured
pub const DEFAULT_QUICK_AMOUNTS: [f64; 4] = [10.0, 20.0, 50.0, 100.0];

/// Owns a wallet account and applies every change to it.
#[derive(Debug, Clone)]
pub struct WalletLedger {
    account: WalletAccount,
    currency: String,
}

impl WalletLedger {
    /// An empty wallet for `owner_id`.
    pub fn new(owner_id: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            account: WalletAccount::new(owner_id),
            currency: currency.into(),
        }
    }

    /// A wallet whose history starts with an opening top-up of `amount`.
    ///
    /// A zero opening balance records nothing.
    pub fn with_opening_balance(
        owner_id: impl Into<String>,
        currency: impl Into<String>,
        amount: f64,
    ) -> Result<Self> {
        let mut ledger = Self::new(owner_id, currency);
        if amount != 0.0 {
            ledger.record(Transaction::top_up(amount, "Opening balance")?)?;
        }
        Ok(ledger)
    }

    /// Rebuilds a wallet from a history fetched from the payment service.
    pub fn from_transactions(
        owner_id: impl Into<String>,
        currency: impl Into<String>,
        transactions: Vec<Transaction>,
    ) -> Result<Self> {
        let mut ledger = Self::new(owner_id, currency);
        for transaction in transactions {
            ledger.record(transaction)?;
        }
        Ok(ledger)
    }

    /// The account as it stands
    #[must_use]
    pub const fn account(&self) -> &WalletAccount {
        &self.account
    }

    /// Current balance
    #[must_use]
    pub const fn balance(&self) -> f64 {
        self.account.balance()
    }

    /// Currency code used for display
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Balance as shown on the wallet card, e.g. "RM 45.50".
    #[must_use]
    pub fn balance_label(&self) -> String {
        format!("{} {:.2}", self.currency, self.balance())
    }

    /// Adds `amount` to the wallet.
    ///
    /// # Errors
    /// `InvalidAmount` if `amount` is zero, negative or not finite. The account is unchanged.
    pub fn apply_top_up(&mut self, amount: f64) -> Result<&WalletAccount> {
        let transaction = Transaction::top_up(amount, "Wallet Top-up")?;
        self.account.append(transaction);
        info!(
            owner = self.account.owner_id(),
            amount,
            balance = self.account.balance(),
            "Wallet topped up"
        );
        Ok(&self.account)
    }

    /// Pays `fare` for a ride.
    ///
    /// # Errors
    /// * `InvalidAmount` if `fare` is zero, negative or not finite
    /// * `InsufficientFunds` if the balance does not cover the fare
    pub fn charge_ride(&mut self, fare: f64, description: &str) -> Result<&Transaction> {
        let transaction = Transaction::ride_charge(fare, description)?;
        self.ensure_covers(&transaction)?;
        self.account.append(transaction);
        info!(
            owner = self.account.owner_id(),
            fare,
            balance = self.account.balance(),
            "Ride charged"
        );
        let index = self.account.transactions().len() - 1;
        Ok(&self.account.transactions()[index])
    }

    /// Records a transaction produced elsewhere (e.g. by the payment service).
    ///
    /// Only completed transactions whose sign matches their kind are accepted.
    pub fn record(&mut self, transaction: Transaction) -> Result<&WalletAccount> {
        if transaction.status != TransactionStatus::Completed {
            return Err(Error::InvalidTransition {
                action: "record transaction",
                state: format!("{:?}", transaction.status).to_lowercase(),
            });
        }
        if !transaction.amount.is_finite() || !transaction.sign_matches_kind() {
            return Err(Error::InvalidAmount {
                amount: transaction.amount,
            });
        }
        self.ensure_covers(&transaction)?;
        debug!(id = %transaction.id, amount = transaction.amount, "Recording transaction");
        self.account.append(transaction);
        Ok(&self.account)
    }

    fn ensure_covers(&self, transaction: &Transaction) -> Result<()> {
        let balance = self.account.balance();
        if transaction.kind == TransactionKind::RideCharge && balance + transaction.amount < 0.0 {
            return Err(Error::InsufficientFunds {
                current: balance,
                required: -transaction.amount,
            });
        }
        Ok(())
    }
}

/// Parses a typed top-up amount.
pub fn parse_amount(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let amount: f64 = trimmed.parse().map_err(|_| Error::InvalidField {
        field: "amount",
        value: trimmed.to_string(),
    })?;
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount { amount })
    }
}

/// The "Top Up Wallet" input with its quick-amount buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct TopUpForm {
    amount_input: String,
    quick_amounts: Vec<f64>,
}

impl Default for TopUpForm {
    fn default() -> Self {
        Self::new(DEFAULT_QUICK_AMOUNTS.to_vec())
    }
}

impl TopUpForm {
    /// An empty form offering `quick_amounts`.
    #[must_use]
    pub const fn new(quick_amounts: Vec<f64>) -> Self {
        Self {
            amount_input: String::new(),
            quick_amounts,
        }
    }

    /// Amount as currently typed
    #[must_use]
    pub fn amount_input(&self) -> &str {
        &self.amount_input
    }

    /// Quick-amount buttons
    #[must_use]
    pub fn quick_amounts(&self) -> &[f64] {
        &self.quick_amounts
    }

    /// Records typed input.
    pub fn set_amount_input(&mut self, input: impl Into<String>) {
        self.amount_input = input.into();
    }

    /// Pre-fills the input with `value`. Nothing is charged or credited.
    pub fn quick_amount(&mut self, value: f64) {
        self.amount_input = value.to_string();
    }

    /// Empties the input.
    pub fn clear(&mut self) {
        self.amount_input.clear();
    }

    /// Parses the input without submitting it.
    pub fn parse(&self) -> Result<f64> {
        parse_amount(&self.amount_input)
    }

    /// Applies the typed amount to `ledger`. The input is cleared only on success.
    pub fn submit(&mut self, ledger: &mut WalletLedger) -> Result<f64> {
        let amount = self.parse()?;
        ledger.apply_top_up(amount)?;
        self.clear();
        Ok(amount)
    }
}

/// The payment methods offered, with exactly one selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodSelection {
    methods: Vec<PaymentMethod>,
    selected: Option<String>,
}

impl PaymentMethodSelection {
    /// Selects the primary method, or the first one if none is marked primary.
    #[must_use]
    pub fn new(methods: Vec<PaymentMethod>) -> Self {
        let selected = methods
            .iter()
            .find(|method| method.primary)
            .or_else(|| methods.first())
            .map(|method| method.id.clone());
        Self { methods, selected }
    }

    /// All offered methods
    #[must_use]
    pub fn methods(&self) -> &[PaymentMethod] {
        &self.methods
    }

    /// The selected method, if any are offered
    #[must_use]
    pub fn selected(&self) -> Option<&PaymentMethod> {
        let id = self.selected.as_deref()?;
        self.methods.iter().find(|method| method.id == id)
    }

    /// Selects the method with `id`.
    ///
    /// # Errors
    /// `PaymentMethodNotFound` if no such method is offered; the selection is unchanged.
    pub fn select(&mut self, id: &str) -> Result<&PaymentMethod> {
        let method = self
            .methods
            .iter()
            .find(|method| method.id == id)
            .ok_or_else(|| Error::PaymentMethodNotFound { id: id.to_string() })?;
        self.selected = Some(method.id.clone());
        Ok(method)
    }
}
