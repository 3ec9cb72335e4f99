use super::OutputFormat;
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings read from the inspector's TOML config file.
#[derive(Debug, Default)]
pub struct CliConfig {
    path: Option<PathBuf>,
    data: RawConfig,
    format: Option<OutputFormat>,
}

impl CliConfig {
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = explicit.or_else(default_config_path);
        let data = match path.as_ref() {
            Some(config_path) if config_path.exists() => read_file(config_path)?,
            _ => RawConfig::default(),
        };
        let format = match data.format.as_deref() {
            Some(value) => Some(OutputFormat::from_str(value, true).map_err(|_| {
                ConfigError::InvalidFormat {
                    value: value.to_string(),
                }
            })?),
            None => None,
        };
        Ok(Self { path, data, format })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn default_graph(&self) -> Option<&Path> {
        self.data.default_graph.as_deref()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.data.log_level.as_deref()
    }

    pub fn format(&self) -> Option<OutputFormat> {
        self.format
    }

    pub fn strict(&self) -> Option<bool> {
        self.data.load.strict
    }

    pub fn infer_path_edges(&self) -> Option<bool> {
        self.data.load.infer_path_edges
    }
}

fn read_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    default_graph: Option<PathBuf>,
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    load: LoadSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoadSection {
    strict: Option<bool>,
    infer_path_edges: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read CLI config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse CLI config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("config format value '{value}' is invalid (expected text or json)")]
    InvalidFormat { value: String },
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("odgi-ffi").join("config.toml"))
}
