//! Application context - dependency injection container

use std::fs;
use std::sync::Arc;

use anyhow::Context as _;
use mailsync_core::{MailEngineFactory, Orchestrator, OrchestratorOptions, OrchestratorPorts};
use mailsync_core::reachability::ReachabilityNotifier;
use mailsync_domain::{AppConfig, Connection};
use mailsync_infra::{HostPlatform, HostReachability, ProbeReachability, StaticSyncSettings};

/// Where connectivity changes come from
pub enum Connectivity {
    /// The native layer pushes changes through [`AppContext::push_connection`].
    Host(Arc<HostReachability>),
    /// A TCP probe polls the configured address.
    Probe(Arc<ProbeReachability>),
}

impl Connectivity {
    fn from_config(config: &AppConfig) -> Self {
        match ProbeReachability::from_config(&config.reachability) {
            Some(probe) => Self::Probe(Arc::new(probe)),
            None => Self::Host(Arc::new(HostReachability::new())),
        }
    }

    fn notifier(&self) -> Arc<dyn ReachabilityNotifier> {
        match self {
            Self::Host(host) => host.clone(),
            Self::Probe(probe) => probe.clone(),
        }
    }
}

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: AppConfig,
    pub platform: Arc<HostPlatform>,
    pub settings: Arc<StaticSyncSettings>,
    pub connectivity: Connectivity,
    pub orchestrator: Orchestrator,
}

impl AppContext {
    /// Load `.env` and configuration, then wire the context.
    ///
    /// # Errors
    /// Fails if the configuration is invalid or the data directory cannot be
    /// created.
    pub fn new(factory: Arc<dyn MailEngineFactory>) -> anyhow::Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::info!(path = %path.display(), "Loaded .env"),
            Err(e) => tracing::debug!(error = %e, "No .env file loaded"),
        }

        let config = mailsync_infra::config::load().context("failed to load configuration")?;
        Self::new_with_config(config, factory)
    }

    /// Wire the context from an explicit configuration.
    ///
    /// # Errors
    /// Fails if the data directory cannot be created.
    pub fn new_with_config(
        config: AppConfig,
        factory: Arc<dyn MailEngineFactory>,
    ) -> anyhow::Result<Self> {
        fs::create_dir_all(&config.storage.data_dir).with_context(|| {
            format!("failed to create data directory {}", config.storage.data_dir.display())
        })?;

        let platform = Arc::new(HostPlatform::new(config.background.budget()));
        let settings = Arc::new(StaticSyncSettings::new(config.sync));
        let connectivity = Connectivity::from_config(&config);

        let orchestrator = Orchestrator::new(
            OrchestratorOptions::from(&config),
            OrchestratorPorts {
                factory,
                platform: platform.clone(),
                settings: settings.clone(),
                notifier: connectivity.notifier(),
            },
        );

        tracing::info!(
            data_dir = %config.storage.data_dir.display(),
            watch_sentbox = config.sync.watch_sentbox,
            watch_mvbox = config.sync.watch_mvbox,
            "Application context ready"
        );

        Ok(Self { config, platform, settings, connectivity, orchestrator })
    }

    /// Forward a connectivity change from the native layer.
    ///
    /// Returns `false` when the change was not delivered, either because it
    /// repeats the last value or because a probe owns connectivity.
    pub fn push_connection(&self, connection: Connection) -> bool {
        match &self.connectivity {
            Connectivity::Host(host) => host.push(connection),
            Connectivity::Probe(_) => {
                tracing::debug!(%connection, "ignoring pushed connectivity while probing");
                false
            }
        }
    }
}
