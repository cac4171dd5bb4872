//! Core business logic - Framework-agnostic ride, chat, wallet and verification operations.
//!
//! Everything here is synchronous and owns its state outright. The `session`
//! module wraps these types for concurrent use and drives the asynchronous
//! effects around them.

pub mod catalog;
pub mod composer;
pub mod conversation;
pub mod verification;
pub mod wallet;

pub use catalog::{RideCatalog, RideFilter};
pub use composer::{PricingPolicy, RideComposer, RideDraft};
pub use conversation::ConversationStore;
pub use verification::VerificationFlow;
pub use wallet::{PaymentMethodSelection, TopUpForm, WalletLedger};
