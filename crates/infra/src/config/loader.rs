//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `MAILSYNC_DATA_DIR` is not set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Without any file, uses [`AppConfig::default`]
//!
//! ## Environment Variables
//! - `MAILSYNC_DATA_DIR`: Directory holding the engine database (required)
//! - `MAILSYNC_WATCH_SENTBOX`: Run a Sentbox sync loop (true/false)
//! - `MAILSYNC_WATCH_MVBOX`: Run an MVBox sync loop (true/false)
//! - `MAILSYNC_BG_POLL_INTERVAL`: Budget check interval in seconds
//! - `MAILSYNC_BG_SAFETY_THRESHOLD`: Stop once fewer seconds remain
//! - `MAILSYNC_BG_BUDGET`: Background budget granted by the host, in seconds
//! - `MAILSYNC_PROBE_ADDR`: `host:port` for the TCP reachability probe
//! - `MAILSYNC_ENGINE_LABEL`: Label passed to the mail engine
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./mailsync.toml`, `./mailsync.json`, `./config.toml`, `./config.json`
//! 2. The same names in the parent directory
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use mailsync_domain::{AppConfig, MailSyncError, Result};

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: [&str; 4] = ["mailsync.toml", "mailsync.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `MailSyncError::Config` if an environment value or the probed
/// file is invalid.
pub fn load() -> Result<AppConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            return Ok(config);
        }
        Err(e) => tracing::debug!(error = %e, "Failed to load from environment, trying file"),
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("No config file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load configuration from environment variables
///
/// Only `MAILSYNC_DATA_DIR` is required; every other value falls back to
/// its default.
///
/// # Errors
/// Returns `MailSyncError::Config` if `MAILSYNC_DATA_DIR` is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<AppConfig> {
    let mut config = AppConfig::default();

    config.storage.data_dir = PathBuf::from(env_var("MAILSYNC_DATA_DIR")?);
    config.sync.watch_sentbox = env_bool("MAILSYNC_WATCH_SENTBOX", config.sync.watch_sentbox);
    config.sync.watch_mvbox = env_bool("MAILSYNC_WATCH_MVBOX", config.sync.watch_mvbox);

    if let Some(secs) = env_parse::<u64>("MAILSYNC_BG_POLL_INTERVAL")? {
        config.background.poll_interval_secs = secs;
    }
    if let Some(secs) = env_parse::<u64>("MAILSYNC_BG_SAFETY_THRESHOLD")? {
        config.background.safety_threshold_secs = secs;
    }
    if let Some(secs) = env_parse::<u64>("MAILSYNC_BG_BUDGET")? {
        config.background.budget_secs = secs;
    }

    if let Ok(addr) = std::env::var("MAILSYNC_PROBE_ADDR") {
        config.reachability.probe_addr = Some(addr);
    }
    if let Ok(label) = std::env::var("MAILSYNC_ENGINE_LABEL") {
        config.engine_label = label;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `MailSyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MailSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MailSyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => Ok(toml::from_str(contents).map_err(InfraError::from)?),
        "json" => Ok(serde_json::from_str(contents).map_err(InfraError::from)?),
        _ => Err(MailSyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| MailSyncError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional numeric environment variable
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| MailSyncError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;
    use std::time::Duration;

    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ALL_VARS: [&str; 8] = [
        "MAILSYNC_DATA_DIR",
        "MAILSYNC_WATCH_SENTBOX",
        "MAILSYNC_WATCH_MVBOX",
        "MAILSYNC_BG_POLL_INTERVAL",
        "MAILSYNC_BG_SAFETY_THRESHOLD",
        "MAILSYNC_BG_BUDGET",
        "MAILSYNC_PROBE_ADDR",
        "MAILSYNC_ENGINE_LABEL",
    ];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("MAILSYNC_TEST_BOOL_YES", "Yes");
        std::env::set_var("MAILSYNC_TEST_BOOL_OFF", "off");

        assert!(env_bool("MAILSYNC_TEST_BOOL_YES", false));
        assert!(!env_bool("MAILSYNC_TEST_BOOL_OFF", true));

        std::env::remove_var("MAILSYNC_TEST_BOOL_MISSING");
        assert!(env_bool("MAILSYNC_TEST_BOOL_MISSING", true));

        std::env::remove_var("MAILSYNC_TEST_BOOL_YES");
        std::env::remove_var("MAILSYNC_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("MAILSYNC_DATA_DIR", "/var/mobile/mailsync");
        std::env::set_var("MAILSYNC_WATCH_SENTBOX", "true");
        std::env::set_var("MAILSYNC_WATCH_MVBOX", "0");
        std::env::set_var("MAILSYNC_BG_POLL_INTERVAL", "5");
        std::env::set_var("MAILSYNC_BG_SAFETY_THRESHOLD", "15");
        std::env::set_var("MAILSYNC_BG_BUDGET", "30");
        std::env::set_var("MAILSYNC_PROBE_ADDR", "127.0.0.1:993");
        std::env::set_var("MAILSYNC_ENGINE_LABEL", "desktop");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.storage.database_path(), PathBuf::from("/var/mobile/mailsync/messenger.db"));
        assert!(config.sync.watch_sentbox);
        assert!(!config.sync.watch_mvbox);
        assert_eq!(config.background.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.background.safety_threshold(), Duration::from_secs(15));
        assert_eq!(config.background.budget(), Duration::from_secs(30));
        assert_eq!(config.reachability.probe_addr.as_deref(), Some("127.0.0.1:993"));
        assert_eq!(config.engine_label, "desktop");
    }

    #[test]
    fn test_load_from_env_missing_data_dir() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, MailSyncError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("MAILSYNC_DATA_DIR", "/tmp");
        std::env::set_var("MAILSYNC_BG_POLL_INTERVAL", "soon");

        let result = load_from_env();
        clear_env();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("MAILSYNC_BG_POLL_INTERVAL"));
    }

    #[test]
    fn test_load_from_file_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
engine_label = "ios"

[storage]
data_dir = "/data"

[sync]
watch_mvbox = true

[background]
safety_threshold_secs = 20
"#
        )
        .unwrap();

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.storage.database_path(), PathBuf::from("/data/messenger.db"));
        assert!(config.sync.watch_mvbox);
        assert!(!config.sync.watch_sentbox);
        assert_eq!(config.background.safety_threshold_secs, 20);
        assert_eq!(config.background.poll_interval_secs, 3);
    }

    #[test]
    fn test_load_from_file_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"sync": {{"watch_sentbox": true}}, "reachability": {{"probe_addr": "10.0.0.1:443"}}}}"#)
            .unwrap();

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();

        assert!(config.sync.watch_sentbox);
        assert_eq!(config.reachability.probe_addr.as_deref(), Some("10.0.0.1:443"));
        assert_eq!(config.reachability.probe_interval_secs, 5);
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[sync\nwatch_mvbox = ").unwrap();

        let err = load_from_file(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, MailSyncError::Config(ref msg) if msg.starts_with("Invalid TOML")));
    }

    #[test]
    fn test_load_from_file_unsupported_extension() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("yaml");
        std::fs::write(&path, "sync: {}").unwrap();

        let result = load_from_file(Some(path.clone()));
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(MailSyncError::Config(ref msg)) if msg.contains("yaml")));
    }

    #[test]
    fn test_load_from_file_missing_path() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/mailsync.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
