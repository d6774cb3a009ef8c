//! Configuration file persistence for mdtofile
//!
//! This module handles loading and saving the configuration file in the
//! platform-specific config directory with robust error handling and
//! graceful fallback to defaults. It also resolves the data directory the
//! session snapshot and preview document live in.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config and data directories
pub const APP_NAME: &str = "mdtofile";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Suffix of the staging file used during atomic writes
const BACKUP_SUFFIX: &str = ".bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// Returns the appropriate directory based on the operating system:
/// - **Windows**: `%APPDATA%\mdtofile\`
/// - **macOS**: `~/Library/Application Support/mdtofile/`
/// - **Linux**: `~/.config/mdtofile/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined
/// (e.g., if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Get the platform-specific data directory, where the session snapshot and
/// the preview document are kept.
///
/// - **Linux**: `~/.local/share/mdtofile/`
/// - **macOS**: `~/Library/Application Support/mdtofile/`
/// - **Windows**: `%APPDATA%\mdtofile\`
pub fn get_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Ensure the parent directory of `path` exists, creating it if necessary.
fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            debug!("Creating directory: {}", dir.display());
            fs::create_dir_all(dir)
        }
        _ => Ok(()),
    }
}

/// Write `contents` to `path` without ever exposing a half-written file.
///
/// The data goes to `<path><suffix>` first, which is then renamed over the
/// target. A failed write leaves the previous file untouched.
pub(crate) fn write_replacing(path: &Path, suffix: &str, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;

    let mut staging = path.as_os_str().to_owned();
    staging.push(suffix);
    let staging = PathBuf::from(staging);

    if let Err(e) = fs::write(&staging, contents) {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }

    fs::rename(&staging, path).map_err(|e| {
        let _ = fs::remove_file(&staging);
        e
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from `path`.
///
/// # Behavior
///
/// 1. If the config file exists and is valid JSON, load and sanitize it
/// 2. If the config file doesn't exist, return default settings
/// 3. If the config file is corrupted/invalid, log a warning and return defaults
pub fn load_config(path: &Path) -> Settings {
    load_config_internal(path)
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Internal implementation of config loading.
fn load_config_internal(config_path: &Path) -> Result<Settings> {
    // Check if config file exists
    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(Settings::default());
    }

    debug!("Loading config from: {}", config_path.display());

    // Read the file contents
    let contents = fs::read_to_string(config_path).map_err(|e| Error::ConfigLoad {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    // Handle empty file
    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    // Parse and sanitize
    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            config_path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse config file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!(
        "Configuration loaded successfully from {}",
        config_path.display()
    );
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save configuration to `config_path`.
///
/// This function performs an atomic write by:
/// 1. Writing to a temporary backup file
/// 2. Replacing the original file with the backup
///
/// # Errors
///
/// - `Error::ConfigSave`: Failed to serialize or write the config file
pub fn save_config(settings: &Settings, config_path: &Path) -> Result<()> {
    debug!("Saving config to: {}", config_path.display());

    // Serialize to pretty JSON
    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    write_replacing(config_path, BACKUP_SUFFIX, json.as_bytes()).map_err(|e| {
        Error::ConfigSave {
            path: config_path.to_path_buf(),
            source: Box::new(e),
        }
    })?;

    info!(
        "Configuration saved successfully to {}",
        config_path.display()
    );
    Ok(())
}

/// Save configuration, ignoring errors.
///
/// This is useful for "best effort" saves where failure shouldn't
/// interrupt the application flow (e.g., remembering the export directory).
///
/// # Returns
///
/// Returns `true` if the save was successful, `false` otherwise.
pub fn save_config_silent(settings: &Settings, config_path: &Path) -> bool {
    match save_config(settings, config_path) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Helper to create a test environment with a temporary config directory.
    struct TestEnv {
        _temp_dir: TempDir,
        config_file: PathBuf,
    }

    impl TestEnv {
        fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let config_file = temp_dir.path().join(APP_NAME).join(CONFIG_FILE_NAME);
            Self {
                _temp_dir: temp_dir,
                config_file,
            }
        }

        fn write_config(&self, content: &str) {
            ensure_parent_dir(&self.config_file).expect("Failed to create config dir");
            fs::write(&self.config_file, content).expect("Failed to write config");
        }

        fn read_config(&self) -> String {
            fs::read_to_string(&self.config_file).expect("Failed to read config")
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Platform directory tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_get_config_file_path() {
        if let Ok(path) = get_config_file_path() {
            assert!(path.to_string_lossy().contains(APP_NAME));
            assert!(path.ends_with(CONFIG_FILE_NAME));
        }
    }

    #[test]
    fn test_get_data_dir_uses_app_name() {
        if let Ok(path) = get_data_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Load tests with temp directory
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let env = TestEnv::new();
        assert_eq!(load_config(&env.config_file), Settings::default());
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let env = TestEnv::new();
        env.write_config("   \n");
        assert_eq!(load_config(&env.config_file), Settings::default());
    }

    #[test]
    fn test_load_valid_config() {
        let env = TestEnv::new();
        env.write_config(r#"{"debounce_ms": 750, "open_after_export": true}"#);

        let settings = load_config(&env.config_file);
        assert_eq!(settings.debounce_ms, 750);
        assert!(settings.open_after_export);
    }

    #[test]
    fn test_load_corrupted_config_falls_back() {
        let env = TestEnv::new();
        env.write_config("{ invalid json }");

        assert!(matches!(
            load_config_internal(&env.config_file),
            Err(Error::ConfigParse { .. })
        ));
        assert_eq!(load_config(&env.config_file), Settings::default());
    }

    #[test]
    fn test_load_config_sanitizes_values() {
        let env = TestEnv::new();
        env.write_config(r#"{"debounce_ms": 1, "preview_refresh_secs": 600}"#);

        let settings = load_config(&env.config_file);
        assert_eq!(settings.debounce_ms, Settings::MIN_DEBOUNCE_MS);
        assert_eq!(
            settings.preview_refresh_secs,
            Settings::MAX_PREVIEW_REFRESH_SECS
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Save tests with temp directory
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_save_and_load_roundtrip() {
        let env = TestEnv::new();
        let original = Settings {
            export_directory: Some(PathBuf::from("/exports")),
            open_after_export: true,
            debounce_ms: 1000,
            large_document_threshold: 20_000,
            preview_file: Some(PathBuf::from("/tmp/p.html")),
            preview_refresh_secs: 5,
        };

        save_config(&original, &env.config_file).unwrap();
        assert_eq!(load_config(&env.config_file), original);
    }

    #[test]
    fn test_save_creates_directory_and_leaves_no_backup() {
        let env = TestEnv::new();
        assert!(save_config_silent(&Settings::default(), &env.config_file));

        assert!(env.read_config().contains("debounce_ms"));
        let mut backup = env.config_file.as_os_str().to_owned();
        backup.push(BACKUP_SUFFIX);
        assert!(!PathBuf::from(backup).exists());
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let env = TestEnv::new();
        // A regular file where a directory is expected
        env.write_config("{}");
        let bad_path = env.config_file.join("nested.json");

        assert!(matches!(
            save_config(&Settings::default(), &bad_path),
            Err(Error::ConfigSave { .. })
        ));
        assert!(!save_config_silent(&Settings::default(), &bad_path));
    }

    #[test]
    fn test_write_replacing_overwrites() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("out.txt");
        write_replacing(&target, ".part", b"first").unwrap();
        write_replacing(&target, ".part", b"second").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
        assert!(!temp.path().join("out.txt.part").exists());
    }
}
