use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::Instance;
use super::error::{MetricError, ProviderError};
use super::{instances, metrics, regions};

/// Credentials and scope for the HTTP provider, injected at construction.
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_base_url: String,
    pub api_token: String,
    pub default_region: String,
}

/// The three provider operations a scan depends on. The HTTP
/// implementation talks to the real API; tests substitute their own.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn list_regions(&self) -> Result<Vec<String>, ProviderError>;

    async fn list_instances(&self, region: &str) -> Result<Vec<Instance>, ProviderError>;

    async fn metric_sum(
        &self,
        region: &str,
        instance_id: &str,
        metric: &str,
        start: DateTime<Utc>,
    ) -> Result<f64, MetricError>;
}

pub struct HttpProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl HttpProvider {
    pub fn new(client: reqwest::Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn list_regions(&self) -> Result<Vec<String>, ProviderError> {
        regions::list_regions(
            &self.client,
            &self.config.api_base_url,
            &self.config.api_token,
            &self.config.default_region,
        )
        .await
    }

    async fn list_instances(&self, region: &str) -> Result<Vec<Instance>, ProviderError> {
        instances::list_instances(
            &self.client,
            &self.config.api_base_url,
            &self.config.api_token,
            region,
        )
        .await
    }

    async fn metric_sum(
        &self,
        region: &str,
        instance_id: &str,
        metric: &str,
        start: DateTime<Utc>,
    ) -> Result<f64, MetricError> {
        metrics::metric_sum(
            &self.client,
            &self.config.api_base_url,
            &self.config.api_token,
            region,
            instance_id,
            metric,
            start,
        )
        .await
    }
}
