//! Shared fixtures for the app integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mailsync_core::testing::{MockEngine, MockEngineFactory};
use mailsync_core::Completion;
use mailsync_domain::AppConfig;
use mailsync_lib::{AppContext, AppDelegate};
use tempfile::TempDir;

/// Delegate wired to a mock engine inside a temporary data directory.
pub struct TestApp {
    pub delegate: AppDelegate,
    pub engine: Arc<MockEngine>,
    pub factory: Arc<MockEngineFactory>,
    /// Keep temporary directory alive for the lifetime of the app.
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn context(&self) -> &Arc<AppContext> {
        self.delegate.context()
    }
}

/// Build a [`TestApp`], letting the caller adjust the configuration.
pub fn setup_test_app(configure: impl FnOnce(&mut AppConfig)) -> TestApp {
    let temp_dir = TempDir::new().expect("failed to create temporary data directory");

    let mut config = AppConfig::default();
    config.storage.data_dir = temp_dir.path().join("data");
    configure(&mut config);

    let engine = Arc::new(MockEngine::new());
    let factory = Arc::new(MockEngineFactory::new(engine.clone()));
    let context = AppContext::new_with_config(config, factory.clone())
        .expect("failed to build application context");

    TestApp { delegate: AppDelegate::new(Arc::new(context)), engine, factory, temp_dir }
}

/// Completion that counts how often it ran.
pub fn counting_completion() -> (Completion, Arc<AtomicUsize>) {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let completion: Completion = Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (completion, fired)
}
