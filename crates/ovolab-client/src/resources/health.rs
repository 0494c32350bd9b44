//! Backend health probe.

use reqwest::Method;

use ovolab_core::types::HealthStatus;

use crate::api::ApiClient;
use crate::error::Result;

/// Health endpoint, served outside the versioned API.
#[derive(Debug, Clone)]
pub struct HealthApi {
    client: ApiClient,
}

impl HealthApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Queries the health endpoint.
    pub async fn check(&self) -> Result<HealthStatus> {
        let url = self.client.health_url().clone();
        let status: HealthStatus = self
            .client
            .send_json(self.client.request_url(Method::GET, url))
            .await?;
        if !status.is_healthy() {
            tracing::warn!(status = %status.status, database = ?status.database, "backend degraded");
        }
        Ok(status)
    }
}
