//! Application state for the RAOB tool service.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::{info, warn};

use storage::{ArtifactPublisher, ObjectStorage, ObjectStorageConfig};

use crate::config::UpstreamConfig;
use crate::tools::ToolService;
use crate::upstream::MesonetClient;

/// Shared application state.
pub struct AppState {
    /// The sounding tools.
    pub tools: ToolService,

    /// Prometheus recorder handle, rendered at `/metrics`.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(tools: ToolService, metrics: Option<PrometheusHandle>) -> Self {
        Self { tools, metrics }
    }

    /// Wire the tools to the Mesonet services and, when configured, object storage.
    ///
    /// A storage configuration that fails to build leaves publishing disabled
    /// rather than failing startup.
    pub fn from_config(
        upstream: UpstreamConfig,
        storage: Option<ObjectStorageConfig>,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self> {
        let client = Arc::new(
            MesonetClient::new(upstream).context("Failed to create upstream HTTP client")?,
        );

        let publisher: Option<Arc<dyn ArtifactPublisher>> = match storage {
            Some(config) => match ObjectStorage::new(&config) {
                Ok(storage) => Some(Arc::new(storage)),
                Err(e) => {
                    warn!(error = %e, "Object storage initialization failed, plotting disabled");
                    None
                }
            },
            None => {
                info!("Object storage not configured, plotting disabled");
                None
            }
        };

        let tools = ToolService::new(client.clone(), client, publisher);
        Ok(Self::new(tools, metrics))
    }
}
