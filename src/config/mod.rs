//! Configuration management for mongocsv
//!
//! This module handles loading, parsing, and managing configuration from:
//! - Configuration files (TOML format)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values
//!
//! The original tool kept every parameter as a module-level constant edited
//! in source; here they are explicit, validated configuration passed into
//! the export function.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Connection configuration
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,

    /// Post-export file copy configuration
    #[serde(default)]
    pub copy: CopyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// MongoDB connection URI
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Database to read from
    #[serde(default)]
    pub database: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Export-related configuration
///
/// Covers the paginated read, the per-document transformation, and the CSV
/// output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Collection to read from
    #[serde(default)]
    pub collection: String,

    /// Fields to extract, in output column order
    #[serde(default)]
    pub fields: Vec<String>,

    /// Output CSV file path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Documents fetched per page
    ///
    /// Sized to keep each request comfortably inside server time limits;
    /// lower it for collections with large documents.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Maximum number of rows to write (None exports everything)
    #[serde(default)]
    pub max_docs: Option<u64>,

    /// Write a header row with the column names
    #[serde(default = "default_write_headers")]
    pub write_headers: bool,

    /// Value substituted for fields absent from a document
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Name of the synthetic identifier column appended to every row
    #[serde(default = "default_id_column")]
    pub id_column: String,

    /// Field whose value decides whether a row is skipped
    #[serde(default)]
    pub skip_field: Option<String>,

    /// Sentinel value: rows whose skip field equals this are excluded
    #[serde(default = "default_skip_value")]
    pub skip_value: String,

    /// Substring marking a field name as a date column
    ///
    /// Matching fields holding datetime values are converted to the local
    /// time zone on output. Set to None to disable the conversion.
    #[serde(default = "default_date_marker")]
    pub date_marker: Option<String>,

    /// Append a timestamp to the output filename so repeated runs
    /// do not overwrite each other
    #[serde(default)]
    pub timestamp_filename: bool,
}

/// Post-export file copy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopyConfig {
    /// Destination directory for the finished CSV file
    ///
    /// Created if absent. None disables the copy step.
    #[serde(default)]
    pub destination: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_output() -> PathBuf {
    PathBuf::from("extract.csv")
}

fn default_page_size() -> u32 {
    1000
}

fn default_write_headers() -> bool {
    true
}

fn default_placeholder() -> String {
    "Null".to_string()
}

fn default_id_column() -> String {
    "MONGO_ID".to_string()
}

fn default_skip_value() -> String {
    "VALUE_TO_SKIP".to_string()
}

fn default_date_marker() -> Option<String> {
    Some("DATE".to_string())
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: String::new(),
            timeout: default_timeout(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            collection: String::new(),
            fields: Vec::new(),
            output: default_output(),
            page_size: default_page_size(),
            max_docs: None,
            write_headers: default_write_headers(),
            placeholder: default_placeholder(),
            id_column: default_id_column(),
            skip_field: None,
            skip_value: default_skip_value(),
            date_marker: default_date_marker(),
            timestamp_filename: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration with proper precedence
    ///
    /// An explicitly given path must exist; the default path is used only
    /// when present, falling back to defaults otherwise.
    ///
    /// # Arguments
    /// * `explicit` - Config file path given on the command line, if any
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded or default configuration
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mongocsv")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// Malformed parameters abort here, before any database or file I/O.
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.connection.uri.trim().is_empty() {
            return Err(ConfigError::MissingField("connection.uri".into()).into());
        }
        if self.connection.database.trim().is_empty() {
            return Err(ConfigError::MissingField("connection.database".into()).into());
        }
        if self.export.collection.trim().is_empty() {
            return Err(ConfigError::MissingField("export.collection".into()).into());
        }
        if self.export.fields.is_empty() {
            return Err(ConfigError::MissingField("export.fields".into()).into());
        }
        if let Some(blank) = self.export.fields.iter().find(|f| f.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "export.fields".into(),
                value: blank.clone(),
            }
            .into());
        }
        if self.export.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "export.page_size".into(),
                value: "0".into(),
            }
            .into());
        }
        if self.export.output.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("export.output".into()).into());
        }
        if let Some(parent) = self.export.output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(ConfigError::InvalidValue {
                    field: "export.output".into(),
                    value: self.export.output.display().to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Get connection timeout as Duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection.timeout)
    }
}

impl ExportConfig {
    /// Resolve the output path for this run
    ///
    /// With `timestamp_filename` enabled, `extract.csv` becomes
    /// `extract_2021-02-13_09-30-00.csv` so repeated runs keep their files.
    pub fn resolved_output(&self) -> PathBuf {
        if !self.timestamp_filename {
            return self.output.clone();
        }

        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let stem = self
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "extract".to_string());
        let name = match self.output.extension() {
            Some(ext) => format!("{}_{}.{}", stem, timestamp, ext.to_string_lossy()),
            None => format!("{}_{}", stem, timestamp),
        };
        self.output.with_file_name(name)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
