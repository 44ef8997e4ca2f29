use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Resolver configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Whether field references must match input column names exactly
    pub case_sensitive: bool,

    /// Maximum number of expressions a resolved projection may contain
    #[validate(range(
        min = 1,
        max = 65535,
        message = "Max projection width must be between 1 and 65535"
    ))]
    pub max_projection_width: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            max_projection_width: 4096,
        }
    }
}

impl ResolverConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            case_sensitive: parse_env_var("PROJECTION_RESOLVER_CASE_SENSITIVE", "true")?,
            max_projection_width: parse_env_var("PROJECTION_RESOLVER_MAX_WIDTH", "4096")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_cli(&cli)?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load the YAML file when one is given, the environment otherwise, then
    /// apply command line overrides on top
    pub fn load<P: AsRef<std::path::Path>>(
        yaml_file: Option<P>,
        cli: &CliConfig,
    ) -> Result<Self, ConfigError> {
        let mut config = match yaml_file {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::from_env()?,
        };
        config.apply_cli(cli)?;
        Ok(config)
    }

    /// Apply command line overrides on top of this configuration, then validate
    pub fn apply_cli(&mut self, cli: &CliConfig) -> Result<(), ConfigError> {
        if cli.case_insensitive {
            self.case_sensitive = false;
        }
        if let Some(width) = cli.max_projection_width {
            self.max_projection_width = width;
        }

        self.validate()?;
        Ok(())
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub case_insensitive: bool,
    pub max_projection_width: Option<usize>,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = match env::var(key) {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => default.to_string(),
        Err(e) => return Err(e.into()),
    };
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
