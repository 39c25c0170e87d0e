//! Integration tests for configuration loader
//!
//! Loads configuration files end to end and wires the result into the
//! adapters that consume it.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use mailsync_core::{AppStatusProvider, SyncSettings};
use mailsync_domain::OsAppState;
use mailsync_infra::{config, HostPlatform, ProbeReachability, StaticSyncSettings};
use tempfile::{NamedTempFile, TempDir};

fn write_config(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create config file");
    file.write_all(contents.as_bytes()).expect("Failed to write config file");
    path
}

#[test]
fn test_load_config_from_toml_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        "mailsync.toml",
        r#"
engine_label = "integration"

[storage]
data_dir = "/var/lib/mailsync"

[sync]
watch_sentbox = true

[background]
budget_secs = 30
safety_threshold_secs = 5
"#,
    );

    let config = config::load_from_file(Some(path)).expect("Failed to load TOML config");

    assert_eq!(config.engine_label, "integration");
    assert_eq!(config.storage.database_path(), PathBuf::from("/var/lib/mailsync/messenger.db"));
    assert!(config.sync.watch_sentbox);
    assert!(!config.sync.watch_mvbox);
    assert_eq!(config.background.budget(), Duration::from_secs(30));
    assert_eq!(config.background.safety_threshold(), Duration::from_secs(5));
    assert_eq!(config.background.poll_interval(), Duration::from_secs(3));
    assert!(config.reachability.probe_addr.is_none());
}

#[test]
fn test_loaded_config_drives_adapters() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        "mailsync.json",
        r#"{
            "sync": { "watch_mvbox": true },
            "background": { "budget_secs": 45 },
            "reachability": { "probe_addr": "127.0.0.1:993", "probe_interval_secs": 2 }
        }"#,
    );

    let config = config::load_from_file(Some(path)).expect("Failed to load JSON config");

    let platform = HostPlatform::new(config.background.budget());
    platform.set_application_state(OsAppState::Background);
    assert!(platform.background_time_remaining() <= Duration::from_secs(45));

    let settings = StaticSyncSettings::new(config.sync);
    assert!(settings.watch_mvbox());
    assert!(!settings.watch_sentbox());

    let probe = ProbeReachability::from_config(&config.reachability).expect("probe configured");
    assert_eq!(probe.addr(), "127.0.0.1:993");
    assert!(!probe.is_running());
}

#[test]
fn test_load_config_rejects_malformed_json() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(b"{ \"sync\": ").expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let err = config::load_from_file(Some(path.clone())).expect_err("malformed JSON must fail");
    assert!(err.to_string().contains("Configuration error"), "unexpected error: {err}");

    std::fs::remove_file(path).ok();
}
