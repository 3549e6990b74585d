//! HTTP client configuration.
//!
//! # Example Configuration
//!
//! ```yaml
//! http:
//!   user_agent: Mozilla/5.0 ...
//!   pool_max_idle_per_host: 256
//!   force_http2: false
//!   timeout_secs: 60
//! ```

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};

use octopus_core::{TransportError, TransportResult};

/// User agent presented to media CDNs.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/87.0.4280.88 Safari/537.36 Edg/87.0.664.66";

/// Configuration of the process-wide attachment client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// User agent sent with every request.
    pub user_agent: String,

    /// Idle connections kept per host for reuse.
    pub pool_max_idle_per_host: usize,

    /// Speak HTTP/2 without negotiation (prior knowledge).
    ///
    /// HTTP/2 is still negotiated over TLS when this is off.
    pub force_http2: bool,

    /// Whole-request timeout in seconds; unset means no timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            pool_max_idle_per_host: 256,
            force_http2: false,
            timeout_secs: None,
        }
    }
}

impl HttpClientConfig {
    /// Builds a pooled client from this configuration.
    pub fn build_client(&self) -> TransportResult<Client> {
        let mut builder = ClientBuilder::new()
            .user_agent(self.user_agent.clone())
            .pool_max_idle_per_host(self.pool_max_idle_per_host);

        if self.force_http2 {
            builder = builder.http2_prior_knowledge();
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))
    }
}
