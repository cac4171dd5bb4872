//! Payment method entity - A funding source offered on the wallet screen.

use serde::{Deserialize, Serialize};

/// Kind of funding source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethodKind {
    /// Stored-value e-wallet (e.g., Touch 'n Go)
    EWallet,
    /// Credit or debit card
    Card,
    /// Online banking transfer
    OnlineBanking,
}

/// Payment method model
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Unique identifier (e.g., "touchngo")
    pub id: String,
    /// Display name
    pub name: String,
    /// Kind of funding source
    pub kind: PaymentMethodKind,
    /// Secondary line such as a masked card number
    #[serde(default)]
    pub detail: String,
    /// Whether this is the default method
    #[serde(default)]
    pub primary: bool,
}
