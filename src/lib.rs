pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod visualization;

#[cfg(feature = "web")]
pub mod web;

pub use client::{HttpSimulationClient, SimulationSource};
pub use config::AppConfig;
pub use error::SimError;
pub use models::{DataPoint, InstanceId, SimulationInstance, SimulationParams};
pub use store::{run_simulation, InstanceStore, RunOutcome};
