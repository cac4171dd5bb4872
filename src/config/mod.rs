/// Application settings loaded from config.toml
pub mod app;

/// Seed data for drivers, rides, the rider profile, wallet and chat
pub mod seed;

pub use app::{AppConfig, SimulationConfig, load_config, load_default_config};
pub use seed::{RideSeed, SeedConfig};
