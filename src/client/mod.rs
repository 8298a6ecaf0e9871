mod http;

use async_trait::async_trait;

use crate::error::SimError;
use crate::models::{DataPoint, SimulationParams};

pub use http::{HttpSimulationClient, DEFAULT_ENDPOINT};

/// Source of raw simulation output for a set of parameters.
///
/// The production implementation is [`HttpSimulationClient`]; tests plug in
/// canned or hand-released responses.
#[async_trait(?Send)]
pub trait SimulationSource: Send + Sync {
    /// Return the modeled population at each time step.
    async fn fetch(&self, params: &SimulationParams) -> Result<Vec<f64>, SimError>;
}

/// Map raw endpoint values to chart points: `time = index * step`,
/// `users = round(value)`, with halves rounded up towards positive infinity.
pub fn format_series(values: &[f64], step: f64) -> Vec<DataPoint> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| DataPoint {
            time: index as f64 * step,
            users: (value + 0.5).floor() as i64,
        })
        .collect()
}
