//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;

use super::defaults::*;
use super::{global_config_path, Config};

type Builder = LibConfigBuilder<config::builder::DefaultState>;

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: Builder,
    key: &str,
    value: T,
) -> Result<Builder> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `DOCGUARD_` and use double underscores
    /// for nested values. For example:
    /// - `DOCGUARD_GATE__CHECKER=javac`
    /// - `DOCGUARD_MATCHER__DISTANCE_THRESHOLD=3`
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // The config crate doesn't apply serde defaults to values overridden from
        // the environment, so every key gets an explicit default
        let builder = set_config_default(
            builder,
            "matcher.distance_threshold",
            default_distance_threshold() as i64,
        )?;
        let builder = set_config_default(
            builder,
            "matcher.word_removal_cost",
            default_word_removal_cost() as i64,
        )?;
        let builder =
            set_config_default(builder, "preprocess.remove_commas", default_remove_commas())?;
        let builder = set_config_default(builder, "parser.engine", default_parser_engine())?;
        let builder =
            set_config_default(builder, "parser.cache_enabled", default_cache_enabled())?;
        let builder = set_config_default(builder, "gate.checker", default_checker())?;
        let mut builder = set_config_default(
            builder,
            "runtime.max_concurrent_methods",
            default_max_concurrent_methods() as i64,
        )?;

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("DOCGUARD")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.docguard/config.toml or custom --config path)
    /// 3. Environment variables (DOCGUARD_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
