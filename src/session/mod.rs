//! Sessions - Screen-scoped owners of core state and its background effects.
//!
//! A session holds the core model behind a lock, calls service ports with
//! retry, and owns every task it spawns through a [`ScopedTask`]. Dropping a
//! session aborts those tasks, so a reply or verification result can never
//! land after the screen that asked for it is gone.

pub mod chat;
pub mod rides;
pub mod task;
pub mod verification;
pub mod wallet;

pub use chat::ChatSession;
pub use rides::RideSession;
pub use task::ScopedTask;
pub use verification::VerificationSession;
pub use wallet::WalletSession;
