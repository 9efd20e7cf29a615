//! Configuration loading, env overrides, and validation.
//!
//! Config files: `herald.toml`, `herald.yaml`, or `herald.json`
//! Searched in `./` then `~/.config/herald/`.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-default}` substitution in the raw
//! file before parsing.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{apply_env_overrides, config_dir, discover_and_load, find_config_file, load_config},
    schema::{
        BroadcastConfig, DatabaseConfig, EmptyChannelPostPolicy, HeraldConfig, PublishPolicy,
        ServerConfig, TelegramConfig,
    },
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
