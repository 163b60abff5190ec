//! Pipeline configuration.
//!
//! [`PipelineConfig`] is read once at process start and passed explicitly into
//! the pipeline entry point. Settings come from `config/erscribe.toml`
//! (optional) and `ERSCRIBE__*` environment variables, e.g.
//! `ERSCRIBE__DIAGRAM__MAX_ENTITIES=12`.

use crate::error::ConfigError;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "config/erscribe.toml";
const ENV_PREFIX: &str = "ERSCRIBE";

/// Which extraction path the pipeline should try first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionBackend {
    /// The built-in rule-based extractor
    #[default]
    RuleBased,
    /// A caller-supplied external concept source, falling back to rule-based
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub backend: ExtractionBackend,
    /// Minimum token length the coarse fallback accepts as an entity name
    pub min_token_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            backend: ExtractionBackend::RuleBased,
            min_token_len: default_min_token_len(),
        }
    }
}

fn default_min_token_len() -> usize {
    4
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Block count above which the validator warns about renderer instability
    pub max_entities: usize,
    /// Relationship count above which the validator warns
    pub max_relationships: usize,
    /// Append validation findings to the markup as `%%` comment lines
    pub annotate: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            max_entities: 20,
            max_relationships: 30,
            annotate: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub default_name: String,
    pub default_description: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            default_name: "Generated Schema".to_string(),
            default_description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub extraction: ExtractionConfig,
    pub diagram: DiagramConfig,
    pub schema: SchemaConfig,
}

impl PipelineConfig {
    /// Load the configuration from `config/erscribe.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_PATH).required(false))
            .add_source(env_source());

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // The file existed but could not be parsed; retry with env only
                if Path::new(DEFAULT_CONFIG_PATH).exists() {
                    log::warn!(
                        "Failed to load {}, falling back to environment: {}",
                        DEFAULT_CONFIG_PATH,
                        err
                    );
                }
                Config::builder().add_source(env_source()).build()?
            }
        };

        Self::from_settings(settings)
    }

    /// Load the configuration from a specific file, with env vars layered on top.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let settings = Config::builder()
            .add_source(File::from(path))
            .add_source(env_source())
            .build()?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        let cfg: PipelineConfig = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.extraction.min_token_len == 0 {
            return Err(ConfigError::InvalidValue {
                key: "extraction.min_token_len".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.diagram.max_entities == 0 || self.diagram.max_relationships == 0 {
            return Err(ConfigError::InvalidValue {
                key: "diagram".to_string(),
                message: "warning thresholds must be positive".to_string(),
            });
        }
        Ok(())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
