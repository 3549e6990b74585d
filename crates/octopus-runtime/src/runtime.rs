//! Runtime orchestration.
//!
//! The runtime owns the loaded configuration and drives one limb through
//! its lifecycle:
//!
//! ```text
//! login ──▶ start ──▶ wait (Ctrl+C, SIGTERM or shutdown()) ──▶ stop
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use octopus_runtime::OctopusRuntime;
//! use octopus_adapter_wechat::{WechatConfig, WechatLimb};
//!
//! let runtime = OctopusRuntime::builder()
//!     .config_file("octopus.toml")
//!     .build()?;
//!
//! let config: WechatConfig = runtime.limb_config("wechat")?;
//! let limb = WechatLimb::new(config, session, sink)?;
//! runtime.run(Arc::new(limb)).await?;
//! ```

use std::future::Future;
use std::path::Path;

use serde::de::DeserializeOwned;
use tokio::signal;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use octopus_core::{Ack, BoxedLimb, CanonicalEvent};

use crate::config::{ConfigLoader, ConfigResult, OctopusConfig};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// Drives a limb from login to shutdown.
pub struct OctopusRuntime {
    config: OctopusConfig,
    limb: RwLock<Option<BoxedLimb>>,
    shutdown: CancellationToken,
}

impl OctopusRuntime {
    /// Creates a runtime from the configuration found in the current
    /// directory, falling back to defaults.
    pub fn new() -> Self {
        let config = ConfigLoader::new()
            .with_current_dir()
            .load()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config ({e}), using defaults");
                OctopusConfig::default()
            });
        Self::from_config(&config)
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime and initializes logging from `config`.
    pub fn from_config(config: &OctopusConfig) -> Self {
        logging::init_from_config(&config.logging);

        info!(
            log_level = %config.logging.level,
            log_format = ?config.logging.format,
            limbs = config.limbs.len(),
            "Runtime initialized from configuration"
        );

        Self {
            config: config.clone(),
            limb: RwLock::new(None),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &OctopusConfig {
        &self.config
    }

    /// Deserializes the `limbs.<name>` section, or returns the default when
    /// the section is absent.
    pub fn limb_config<C>(&self, name: &str) -> RuntimeResult<C>
    where
        C: DeserializeOwned + Default,
    {
        let Some(section) = self.config.limb(name) else {
            warn!(limb = name, "No configuration found for limb, using default");
            return Ok(C::default());
        };

        section
            .deserialize()
            .map_err(|e| RuntimeError::LimbConfig {
                name: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Requests a graceful stop of [`run`](Self::run). A runtime cannot be
    /// restarted after shutdown.
    pub fn shutdown(&self) {
        info!("Shutdown requested");
        self.shutdown.cancel();
    }

    pub async fn is_running(&self) -> bool {
        self.limb.read().await.is_some()
    }

    /// Delivers an outbound event through the running limb.
    pub async fn send(&self, event: &CanonicalEvent) -> RuntimeResult<Ack> {
        let limb = self
            .limb
            .read()
            .await
            .clone()
            .ok_or(RuntimeError::NotRunning)?;

        debug!(kind = %event.kind, chat = %event.chat.id, "Sending event");
        Ok(limb.dispatch(event).await?)
    }

    /// Runs `limb` until Ctrl+C, SIGTERM or [`shutdown`](Self::shutdown).
    pub async fn run(&self, limb: BoxedLimb) -> RuntimeResult<()> {
        self.run_until(limb, wait_for_signal()).await
    }

    /// Runs `limb` until `signal` resolves or [`shutdown`](Self::shutdown) is
    /// called.
    pub async fn run_until<F>(&self, limb: BoxedLimb, signal: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        {
            let mut slot = self.limb.write().await;
            if slot.is_some() {
                return Err(RuntimeError::AlreadyRunning);
            }
            *slot = Some(limb.clone());
        }

        if let Err(e) = start_limb(&limb).await {
            error!(limb = limb.name(), error = %e, "Failed to start limb");
            self.limb.write().await.take();
            return Err(e.into());
        }
        info!(limb = limb.name(), "Octopus runtime is now running");

        tokio::select! {
            () = signal => {}
            () = self.shutdown.cancelled() => {}
        }

        self.limb.write().await.take();
        limb.stop().await;
        info!(limb = limb.name(), "Runtime stopped");
        Ok(())
    }
}

impl Default for OctopusRuntime {
    fn default() -> Self {
        Self::new()
    }
}

async fn start_limb(limb: &BoxedLimb) -> octopus_core::LimbResult<()> {
    limb.login().await?;
    if let Some(vendor) = limb.vendor() {
        info!(limb = limb.name(), vendor = %vendor.kind, uid = %vendor.uid, "Limb logged in");
    }
    limb.start().await
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => info!("Received Ctrl+C, shutting down"),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
                return;
            }
            Err(e) => warn!(error = %e, "Failed to register SIGTERM handler"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C, waiting for shutdown()");
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for an [`OctopusRuntime`] with custom configuration sources.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
        }
    }

    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    pub fn merge(mut self, config: OctopusConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    pub fn build(self) -> ConfigResult<OctopusRuntime> {
        let config = self.config_loader.load()?;
        Ok(OctopusRuntime::from_config(&config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
