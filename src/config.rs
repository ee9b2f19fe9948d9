//! Configuration management and validation.
//!
//! Parse settings can live in a TOML file so that recurring jobs do not need
//! long command lines. The file maps one-to-one onto [`ParseOptions`], with
//! converters named rather than passed as functions:
//!
//! ```toml
//! select = ["name", "price"]
//! types = ["str", "float"]
//! delimiter = ";"
//! ignore_errors = true
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::app::services::table_parser::{Converter, ParseOptions};
use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DELIMITER, DEFAULT_HAS_HEADERS};
use crate::{Error, Result};

/// Parse settings as written in a configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseConfig {
    /// Columns to keep, in output order
    pub select: Vec<String>,

    /// Converter names per output position; "" or "raw" leaves a value untouched
    pub types: Vec<String>,

    pub has_headers: bool,

    pub delimiter: char,

    pub ignore_errors: bool,

    /// Column names for files without a header row
    pub headers: Option<Vec<String>>,

    /// Maximum records to return; zero or negative means no limit
    pub max_entries: i64,

    pub stop_on_blank_lines: bool,

    pub logging: LoggingConfig,
}

/// Logging settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level used when neither RUST_LOG nor -v/-q are given
    pub level: Option<String>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            select: Vec::new(),
            types: Vec::new(),
            has_headers: DEFAULT_HAS_HEADERS,
            delimiter: DEFAULT_DELIMITER,
            ignore_errors: false,
            headers: None,
            max_entries: 0,
            stop_on_blank_lines: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl ParseConfig {
    /// Load settings from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::config_file(path, format!("cannot read file: {}", e)))?;

        let config: Self =
            toml::from_str(&content).map_err(|e| Error::config_file(path, e.to_string()))?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Location of the per-user configuration file, if a config dir exists
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Resolve the file layer of the configuration
    ///
    /// An explicit path must exist. Without one, the per-user file is used
    /// when present, and built-in defaults otherwise. Command-line overrides
    /// are applied on top by the caller.
    pub fn load_layered(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match Self::default_config_path() {
            Some(path) if path.is_file() => Self::load_from_file(path),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Check that these settings describe a valid parse
    pub fn validate(&self) -> Result<()> {
        self.clone().into_options().map(|_| ())
    }

    /// Convert into parse options, resolving converter names
    pub fn into_options(self) -> Result<ParseOptions> {
        let types = self
            .types
            .iter()
            .map(|name| Converter::from_name(name))
            .collect::<Result<Vec<_>>>()?;

        let max_entries = usize::try_from(self.max_entries.max(0)).unwrap_or(usize::MAX);

        let mut options = ParseOptions::new()
            .with_select(self.select)
            .with_optional_types(types)
            .with_has_headers(self.has_headers)
            .with_delimiter(self.delimiter)
            .with_ignore_errors(self.ignore_errors)
            .with_max_entries(max_entries)
            .with_stop_on_blank_lines(self.stop_on_blank_lines);
        options.headers = self.headers;

        options.validate()?;
        Ok(options)
    }
}
