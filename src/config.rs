use std::path::Path;

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_PATH: &str = "prdash.toml";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub reviews_dir: Option<String>,
    pub manual_review_minutes: Option<f64>,
    pub automated_review_minutes: Option<f64>,
}

/// Constants behind the hours-saved estimate: minutes for a manual review
/// pass vs the automated one. Kept in config so tests and deployments can
/// override them without touching aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimationConfig {
    pub manual_review_minutes: f64,
    pub automated_review_minutes: f64,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            manual_review_minutes: 30.0,
            automated_review_minutes: 3.0,
        }
    }
}

impl EstimationConfig {
    /// Hours saved per review. Defaults yield 27 minutes = 0.45 hours.
    pub fn hours_saved_per_review(&self) -> f64 {
        (self.manual_review_minutes - self.automated_review_minutes) / 60.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub reviews_dir: String,
    pub estimation: EstimationConfig,
}

impl Config {
    /// Load config from file and CLI. An explicit `--config` path must
    /// exist; the default path is used only when present.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file_config = match cli.config.as_deref() {
            Some(path) => {
                let path = Path::new(path);
                if !path.exists() {
                    return Err(Error::ConfigNotFound(path.to_path_buf()));
                }
                parse_config(&std::fs::read_to_string(path)?)?
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    parse_config(&std::fs::read_to_string(path)?)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        Ok(merge(file_config, cli))
    }
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    let config: ConfigFile = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ConfigFile) -> Result<()> {
    if let Some(ref dir) = config.reviews_dir
        && dir.is_empty()
    {
        return Err(Error::ConfigValidation(
            "reviews_dir must not be empty".to_string(),
        ));
    }
    let manual = config.manual_review_minutes.unwrap_or(30.0);
    let automated = config.automated_review_minutes.unwrap_or(3.0);
    if manual <= 0.0 || automated <= 0.0 {
        return Err(Error::ConfigValidation(
            "review minutes must be > 0".to_string(),
        ));
    }
    if manual <= automated {
        return Err(Error::ConfigValidation(format!(
            "manual_review_minutes ({manual}) must exceed automated_review_minutes ({automated})"
        )));
    }
    Ok(())
}

pub fn merge(file: ConfigFile, cli: &Cli) -> Config {
    Config {
        reviews_dir: cli
            .reviews_dir
            .clone()
            .or(file.reviews_dir)
            .unwrap_or_else(|| "data/reviews".to_string()),
        estimation: EstimationConfig {
            manual_review_minutes: file.manual_review_minutes.unwrap_or(30.0),
            automated_review_minutes: file.automated_review_minutes.unwrap_or(3.0),
        },
    }
}
