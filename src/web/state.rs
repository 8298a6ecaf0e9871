use std::sync::{Arc, Mutex};

use crate::client::SimulationSource;
use crate::models::{SimulationInstance, SimulationParams};
use crate::store::InstanceStore;

/// Shared server state: the instance store and the simulation endpoint.
///
/// All state is in memory and lost on restart.
pub struct AppState {
    pub store: Mutex<InstanceStore>,
    pub source: Arc<dyn SimulationSource>,
}

impl AppState {
    pub fn new(defaults: SimulationParams, source: Arc<dyn SimulationSource>) -> Self {
        Self {
            store: Mutex::new(InstanceStore::new(defaults)),
            source,
        }
    }

    /// Run a closure against the locked store.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut InstanceStore) -> R) -> R {
        let mut store = self.store.lock().expect("store mutex poisoned");
        f(&mut store)
    }

    /// Copy of every instance, in display order.
    pub fn snapshot(&self) -> Vec<SimulationInstance> {
        self.with_store(|store| store.instances().to_vec())
    }
}
