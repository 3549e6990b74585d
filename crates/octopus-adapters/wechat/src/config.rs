//! Configuration types for the WeChat limb.
//!
//! Loaded from the `limbs.wechat` section of the global configuration file.
//!
//! # Example Configuration
//!
//! ```yaml
//! limbs:
//!   wechat:
//!     # First roster sync after login
//!     sync_delay_secs: 10
//!     # Then every half hour
//!     sync_interval_secs: 1800
//!     http:
//!       pool_max_idle_per_host: 256
//!       timeout_secs: 60
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use octopus_core::{LimbError, LimbResult};
use octopus_transport::HttpClientConfig;

/// WeChat limb configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WechatConfig {
    /// Delay between `start` and the first roster snapshot.
    pub sync_delay_secs: u64,

    /// Interval between roster snapshots.
    pub sync_interval_secs: u64,

    /// Attachment download client.
    pub http: HttpClientConfig,
}

impl Default for WechatConfig {
    fn default() -> Self {
        Self {
            sync_delay_secs: 10,
            sync_interval_secs: 1800,
            http: HttpClientConfig::default(),
        }
    }
}

impl WechatConfig {
    pub fn sync_delay(&self) -> Duration {
        Duration::from_secs(self.sync_delay_secs)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    /// Rejects values the limb cannot run with.
    pub fn validate(&self) -> LimbResult<()> {
        if self.sync_interval_secs == 0 {
            return Err(LimbError::InvalidConfig(
                "sync_interval_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}
