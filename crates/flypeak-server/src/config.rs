use serde::{Deserialize, Serialize};

use flypeak_detect::{BlobScorerConfig, DetectorConfig};

/// Runtime configuration for the flypeak server.
///
/// Loaded from a JSON file when `--config` is given; every field has a
/// default so partial files are fine, and `serve --host/--port`
/// override the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port to bind.
    pub port: u16,
    /// Detection pipeline settings.
    pub detector: DetectorConfig,
    /// Built-in blob scorer settings.
    pub scorer: BlobScorerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8003,
            detector: DetectorConfig::default(),
            scorer: BlobScorerConfig::default(),
        }
    }
}
