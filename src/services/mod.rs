//! Service ports - The seams where remote collaborators plug in.
//!
//! Each port is an `async_trait` so sessions can hold it as
//! `Arc<dyn Port>`. The bundled implementations are in-process simulations
//! with the same timing as the hosted services they stand in for.

pub mod messaging;
pub mod payment;
pub mod retry;
pub mod rides;
pub mod verification;

pub use messaging::{MessagingTransport, SimulatedTransport};
pub use payment::{LocalPaymentService, PaymentService};
pub use retry::{RetryPolicy, with_retry};
pub use rides::{InMemoryRideService, RideService};
pub use verification::{SimulatedVerificationService, VerificationService};
