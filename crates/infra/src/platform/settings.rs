//! Folder watch flags backed by configuration

use mailsync_core::SyncSettings;
use mailsync_domain::SyncConfig;
use parking_lot::RwLock;

/// [`SyncSettings`] seeded from [`SyncConfig`], updatable at runtime
#[derive(Debug, Default)]
pub struct StaticSyncSettings {
    config: RwLock<SyncConfig>,
}

impl StaticSyncSettings {
    pub fn new(config: SyncConfig) -> Self {
        Self { config: RwLock::new(config) }
    }

    /// Replace the flags. Takes effect at the next start cycle.
    pub fn update(&self, config: SyncConfig) {
        *self.config.write() = config;
    }

    pub fn snapshot(&self) -> SyncConfig {
        *self.config.read()
    }
}

impl SyncSettings for StaticSyncSettings {
    fn watch_sentbox(&self) -> bool {
        self.config.read().watch_sentbox
    }

    fn watch_mvbox(&self) -> bool {
        self.config.read().watch_mvbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_is_visible_through_port() {
        let settings = StaticSyncSettings::new(SyncConfig::default());
        assert!(!settings.watch_sentbox());

        settings.update(SyncConfig { watch_sentbox: true, watch_mvbox: false });

        assert!(settings.watch_sentbox());
        assert!(!settings.watch_mvbox());
        assert!(settings.snapshot().watch_sentbox);
    }
}
