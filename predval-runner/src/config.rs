//! Runner configuration, loaded from TOML.
//!
//! The CLI takes only positional file arguments, so the config file path is
//! taken from the `PREDVAL_CONFIG` environment variable. Every key is
//! optional; a missing file path means defaults.
//!
//! ```toml
//! [input]
//! price_conversion = "truncate"   # or "round"
//! skip_blank_lines = false
//!
//! [output]
//! summary_path = "run-summary.json"
//! ```

use predval_core::{ParseOptions, PriceConversion};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PREDVAL_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub price_conversion: PriceConversion,
    pub skip_blank_lines: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Where to write the JSON run summary. No summary when unset.
    pub summary_path: Option<PathBuf>,
}

impl RunnerConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Load from the file named by [`CONFIG_ENV`], if set and non-empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::load(path.as_deref())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            conversion: self.input.price_conversion,
            skip_blank_lines: self.input.skip_blank_lines,
        }
    }
}
