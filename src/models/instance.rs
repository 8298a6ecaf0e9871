use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::params::SimulationParams;

/// Opaque identifier of a simulation instance, unique for the store's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for InstanceId {
    type Err = crate::error::SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(InstanceId)
            .map_err(|_| crate::error::SimError::InvalidId(s.to_string()))
    }
}

/// One point of a simulated adoption curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Elapsed time (index × step)
    pub time: f64,
    /// Rounded number of users at that time
    pub users: i64,
}

/// An independently configured simulation run with its own result data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInstance {
    pub id: InstanceId,
    pub params: SimulationParams,
    /// Empty until the first successful run.
    pub data: Vec<DataPoint>,
}

impl SimulationInstance {
    /// Create an instance with the given parameters and no data.
    pub fn new(params: SimulationParams) -> Self {
        Self {
            id: InstanceId::new(),
            params,
            data: Vec::new(),
        }
    }

    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }

    /// Users at the final data point, if the instance has been run.
    pub fn last_users(&self) -> Option<i64> {
        self.data.last().map(|p| p.users)
    }

    /// Highest user count in the data.
    pub fn peak_users(&self) -> Option<i64> {
        self.data.iter().map(|p| p.users).max()
    }
}
