use std::sync::Mutex;

use crate::client::{format_series, SimulationSource};
use crate::error::SimError;
use crate::models::InstanceId;

use super::InstanceStore;

/// Result of one run request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The instance's data was replaced with this many points.
    Updated { points: usize },
    /// No instance with that id exists; nothing was requested.
    UnknownInstance,
    /// The request failed; the store was left untouched.
    Failed,
}

/// Request fresh output for one instance and store it.
///
/// The lock is only held to snapshot parameters and to write the result, so
/// overlapping runs on the same instance all reach the endpoint and the
/// last response to arrive wins. Failures are logged and leave the store
/// unchanged.
pub async fn run_simulation(
    store: &Mutex<InstanceStore>,
    source: &dyn SimulationSource,
    id: InstanceId,
) -> RunOutcome {
    let params = {
        let store = store.lock().expect("store mutex poisoned");
        match store.get(id) {
            Some(inst) => inst.params,
            None => {
                tracing::warn!(instance = %id, "run requested for unknown simulation instance");
                return RunOutcome::UnknownInstance;
            }
        }
    };

    let values = match source.fetch(&params).await {
        Ok(values) => values,
        Err(e) => {
            tracing::error!(instance = %id, error = %e, "error fetching simulation data");
            return RunOutcome::Failed;
        }
    };

    if values.len() != params.duration as usize {
        let e = SimError::MalformedResponse(format!(
            "expected {} values, got {}",
            params.duration,
            values.len()
        ));
        tracing::error!(instance = %id, error = %e, "error fetching simulation data");
        return RunOutcome::Failed;
    }

    let data = format_series(&values, params.step);
    let points = data.len();
    let mut store = store.lock().expect("store mutex poisoned");
    if store.apply_result(id, data) {
        tracing::info!(instance = %id, points, "simulation data updated");
        RunOutcome::Updated { points }
    } else {
        // Removed while the request was in flight.
        tracing::warn!(instance = %id, "simulation instance removed before its run completed");
        RunOutcome::UnknownInstance
    }
}
