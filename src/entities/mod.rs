//! Entity module - Contains the domain model shared by every layer.
//! These are plain data structures; validation lives on the types themselves
//! and mutation lives in the `core` module.

pub mod driver;
pub mod message;
pub mod payment_method;
pub mod ride;
pub mod rider;
pub mod transaction;
pub mod verification;
pub mod wallet;

pub use driver::Driver;
pub use message::{IncomingMessage, Message, MessageKind, SenderRole};
pub use payment_method::{PaymentMethod, PaymentMethodKind};
pub use ride::{MAX_SEATS, MIN_SEATS, Ride, Route};
pub use rider::Rider;
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
pub use verification::{VerificationAttempt, VerificationOutcome, VerificationState};
pub use wallet::WalletAccount;
