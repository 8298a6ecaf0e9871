use thiserror::Error;

/// Errors that can occur while managing or running adoption simulations.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot remove the last simulation instance.")]
    LastInstance,

    #[error("Cannot add more than {0} simulation instances.")]
    InstanceLimit(usize),

    #[error("Invalid instance id: {0}")]
    InvalidId(String),
}

impl From<toml::de::Error> for SimError {
    fn from(e: toml::de::Error) -> Self {
        SimError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for SimError {
    fn from(e: toml::ser::Error) -> Self {
        SimError::Config(e.to_string())
    }
}
