mod instance;
mod params;

pub use instance::{DataPoint, InstanceId, SimulationInstance};
pub use params::{coerce_number, EditableField, SimulationParams, DEFAULT_INITIAL_POPULATION};
