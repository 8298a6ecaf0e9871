mod runner;

use crate::error::SimError;
use crate::models::{
    DataPoint, InstanceId, SimulationInstance, SimulationParams, DEFAULT_INITIAL_POPULATION,
};

pub use runner::{run_simulation, RunOutcome};

/// Maximum number of instances a store holds; further adds are rejected.
pub const MAX_INSTANCES: usize = 100;

/// Ordered collection of simulation instances.
///
/// Always holds at least one instance: removing the sole remaining one is
/// rejected.
#[derive(Debug, Clone)]
pub struct InstanceStore {
    instances: Vec<SimulationInstance>,
    defaults: SimulationParams,
}

impl InstanceStore {
    /// Create a store holding one instance with the given default parameters.
    pub fn new(defaults: SimulationParams) -> Self {
        Self {
            instances: vec![SimulationInstance::new(defaults)],
            defaults,
        }
    }

    pub fn instances(&self) -> &[SimulationInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Always false: the store keeps at least one instance.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn defaults(&self) -> &SimulationParams {
        &self.defaults
    }

    pub fn get(&self, id: InstanceId) -> Option<&SimulationInstance> {
        self.instances.iter().find(|inst| inst.id == id)
    }

    pub fn last(&self) -> Option<&SimulationInstance> {
        self.instances.last()
    }

    /// Replace the parameters of one instance. Returns `false` if the id is unknown.
    ///
    /// Existing data is left as it is; it reflects the parameters of the
    /// last successful run, not the current ones.
    pub fn update_params(&mut self, id: InstanceId, params: SimulationParams) -> bool {
        match self.instances.iter_mut().find(|inst| inst.id == id) {
            Some(inst) => {
                inst.params = params;
                true
            }
            None => false,
        }
    }

    /// Replace the data of one instance wholesale. Returns `false` if the id is unknown.
    pub fn apply_result(&mut self, id: InstanceId, data: Vec<DataPoint>) -> bool {
        match self.instances.iter_mut().find(|inst| inst.id == id) {
            Some(inst) => {
                inst.data = data;
                true
            }
            None => false,
        }
    }

    /// Append an instance seeded from the last one.
    ///
    /// Parameters are copied from the previous instance, except the initial
    /// population, which starts from the previous run's final user count.
    /// Without data (or with a final count of zero) the initial population
    /// is [`DEFAULT_INITIAL_POPULATION`], whatever the configured defaults.
    pub fn add_instance(&mut self) -> Result<InstanceId, SimError> {
        if self.instances.len() >= MAX_INSTANCES {
            return Err(SimError::InstanceLimit(MAX_INSTANCES));
        }
        let base = self.last().map(|inst| inst.params).unwrap_or(self.defaults);
        let seed = self
            .last()
            .and_then(SimulationInstance::last_users)
            .filter(|users| *users != 0)
            .map(|users| users as f64)
            .unwrap_or(DEFAULT_INITIAL_POPULATION);

        let instance = SimulationInstance::new(SimulationParams {
            initial_population: seed,
            ..base
        });
        let id = instance.id;
        tracing::debug!(instance = %id, initial_population = seed, "added simulation instance");
        self.instances.push(instance);
        Ok(id)
    }

    /// Remove an instance unless it is the only one left.
    pub fn remove_instance(&mut self, id: InstanceId) -> Result<SimulationInstance, SimError> {
        let pos = self
            .instances
            .iter()
            .position(|inst| inst.id == id)
            .ok_or_else(|| SimError::NotFound(format!("Simulation instance {id} not found")))?;
        if self.instances.len() <= 1 {
            return Err(SimError::LastInstance);
        }
        tracing::debug!(instance = %id, "removed simulation instance");
        Ok(self.instances.remove(pos))
    }

    /// Remove the most recently added instance unless it is the only one left.
    pub fn remove_last(&mut self) -> Result<SimulationInstance, SimError> {
        let id = self.last().map(|inst| inst.id).ok_or(SimError::LastInstance)?;
        self.remove_instance(id)
    }
}

impl Default for InstanceStore {
    fn default() -> Self {
        Self::new(SimulationParams::default())
    }
}
