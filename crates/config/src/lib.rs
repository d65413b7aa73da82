//! Configuration loading and env substitution.
//!
//! Config files: `courier.toml` or `courier.yaml`, searched in the
//! current directory. Supports `${ENV_VAR}` substitution in the raw
//! file content before parsing; unresolved placeholders are left as-is.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config},
    schema::{
        ConsoleConfig, CourierConfig, PlatformsConfig, SessionsConfig, SkillsConfig, SystemTools,
        ToolsConfig, WebTools,
    },
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported config format: {path}")]
    UnsupportedFormat { path: String },
}

pub type Result<T> = std::result::Result<T, Error>;
