use std::time::Duration;

use async_trait::async_trait;

use crate::error::SimError;
use crate::models::SimulationParams;

use super::SimulationSource;

/// Hosted logistic-model backend.
pub const DEFAULT_ENDPOINT: &str = "https://logistic-model-backend.onrender.com/simulate";

/// Largest response body accepted from the endpoint (bytes).
const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

/// Fetches simulation output with one HTTP GET per request.
///
/// Parameters travel as query arguments `M`, `k`, `B`, `duration`, `step`;
/// the response must be a JSON array of numbers. Requests are neither
/// retried nor deduplicated.
#[derive(Debug, Clone)]
pub struct HttpSimulationClient {
    endpoint: String,
    timeout: Option<Duration>,
}

impl HttpSimulationClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: None,
        }
    }

    /// Override the transport's default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for HttpSimulationClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait(?Send)]
impl SimulationSource for HttpSimulationClient {
    async fn fetch(&self, params: &SimulationParams) -> Result<Vec<f64>, SimError> {
        let mut builder = awc::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.finish();

        let request = client
            .get(self.endpoint.as_str())
            .query(params)
            .map_err(|e| SimError::Http(format!("Cannot encode parameters: {e}")))?;

        tracing::debug!(endpoint = %self.endpoint, ?params, "requesting simulation");

        let mut response = request
            .send()
            .await
            .map_err(|e| SimError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SimError::Http(format!(
                "Simulation endpoint returned {status}"
            )));
        }

        response
            .json::<Vec<f64>>()
            .limit(MAX_RESPONSE_BYTES)
            .await
            .map_err(|e| SimError::MalformedResponse(e.to_string()))
    }
}
