//! Unified error type for the ride-sharing core.
//!
//! Validation errors are local and recoverable: the caller surfaces them as an
//! inline notice and lets the user correct the input. `Transport` is the only
//! variant that represents a transient failure of an external service.

use thiserror::Error;

/// All errors produced by the domain, service and session layers.
#[derive(Debug, Error)]
pub enum Error {
    /// A required draft field was empty
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the first absent field
        field: &'static str,
    },

    /// A field was present but could not be interpreted
    #[error("Invalid value for {field}: '{value}'")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// Raw input as typed
        value: String,
    },

    /// An amount was zero, negative, or not a finite number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A charge would take the wallet balance below zero
    #[error("Insufficient funds: balance {current:.2}, required {required:.2}")]
    InsufficientFunds {
        /// Balance before the charge
        current: f64,
        /// Amount the charge needed
        required: f64,
    },

    /// Seat count outside the 1..=8 range
    #[error("Invalid seat count: {seats}")]
    InvalidSeats {
        /// The rejected seat count
        seats: u8,
    },

    /// Rating outside the 0.0..=5.0 range
    #[error("Invalid rating: {rating}")]
    InvalidRating {
        /// The rejected rating
        rating: f64,
    },

    /// A chat message body was blank
    #[error("Message body cannot be empty")]
    EmptyMessage,

    /// A capture was attempted while a verification is still outstanding
    #[error("A verification is already in progress")]
    AlreadyVerifying,

    /// The identity check rejected the captured photo
    #[error("Identity verification failed")]
    VerificationFailed,

    /// Continue was requested before any verification completed
    #[error("Identity verification not completed (state: {state})")]
    VerificationIncomplete {
        /// Current verification state
        state: String,
    },

    /// A state machine event that the current state does not accept
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        /// The attempted event
        action: &'static str,
        /// Current state
        state: String,
    },

    /// No ride with the given id exists in the catalog
    #[error("Ride not found: {id}")]
    RideNotFound {
        /// The requested ride id
        id: String,
    },

    /// No payment method with the given id is configured
    #[error("Payment method not found: {id}")]
    PaymentMethodNotFound {
        /// The requested payment method id
        id: String,
    },

    /// An external service could not be reached or answered with a transient failure
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the failure
        message: String,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the failure
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Returns true for errors the user fixes by changing their input.
    ///
    /// These are never retried.
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::InvalidField { .. }
                | Self::InvalidAmount { .. }
                | Self::InsufficientFunds { .. }
                | Self::InvalidSeats { .. }
                | Self::EmptyMessage
        )
    }

    /// Returns true for transient failures that may succeed on a later attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
