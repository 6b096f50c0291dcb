use crate::cli::Cli;
use crate::error::{ProcwatchError, Result};
use crate::report::DEFAULT_REPORT_NAME;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "procwatch";

const CONFIG_FILENAME: &str = "config.toml";

/// Default sampling period in milliseconds.
pub const DEFAULT_COLLECT_INTERVAL_MS: u64 = 1000;

// ============================================================================
// Config File
// ============================================================================

/// Optional defaults read from `~/.config/procwatch/config.toml`.
///
/// Every key is optional; anything given on the command line wins.
///
/// # Example
///
/// ```toml
/// report_path = "/var/tmp/procwatch"
/// report_name = "report.csv"
/// collect_interval = 500
/// headless = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub report_path: Option<PathBuf>,
    pub report_name: Option<String>,
    pub collect_interval: Option<u64>,
    pub headless: Option<bool>,
}

/// Get the procwatch config directory path (~/.config/procwatch/).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ProcwatchError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Get the path to the default config file.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILENAME))
}

/// Load the config file.
///
/// With an explicit path the file must exist. Without one, the default
/// location is tried and a missing file (or unknown home directory) yields
/// an empty config. The file is never created.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit config file does not exist or cannot be read
/// - The config file contains invalid TOML or unknown keys
pub fn load_config_file(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Ok(path) if path.exists() => path,
            _ => return Ok(FileConfig::default()),
        },
    };

    let content = fs::read_to_string(&path).map_err(|e| {
        ProcwatchError::Config(format!("Failed to read config file at {:?}: {}", path, e))
    })?;
    parse_config(&content, &path)
}

fn parse_config(content: &str, path: &Path) -> Result<FileConfig> {
    toml::from_str(content).map_err(|e| {
        ProcwatchError::Config(format!("Failed to parse config file at {:?}: {}", path, e))
    })
}

// ============================================================================
// Run Configuration
// ============================================================================

/// Settings for one monitoring run. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub process_name_substring: String,
    /// `None` means the executable's own directory.
    pub report_directory: Option<PathBuf>,
    pub report_filename: String,
    pub sample_interval_ms: u64,
    pub headless: bool,
}

impl RunConfig {
    /// Merges command-line arguments over file defaults over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting interval is 0 or the filename is empty.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self> {
        let config = Self {
            process_name_substring: cli.process.clone(),
            report_directory: cli.report_path.clone().or(file.report_path),
            report_filename: cli
                .report_name
                .clone()
                .or(file.report_name)
                .unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string()),
            sample_interval_ms: cli
                .collect_interval
                .or(file.collect_interval)
                .unwrap_or(DEFAULT_COLLECT_INTERVAL_MS),
            headless: cli.headless.or(file.headless).unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.sample_interval_ms == 0 {
            return Err(ProcwatchError::Config(
                "collect_interval must be at least 1 millisecond".to_string(),
            ));
        }
        if self.report_filename.trim().is_empty() {
            return Err(ProcwatchError::Config(
                "report_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}
