//! Configuration module for docguard
//!
//! Configuration is loaded from a TOML file and/or environment variables.
//! Every section is optional; missing sections take their defaults.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.docguard/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".docguard").join("config.toml"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Subject and predicate matching
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Tag text preprocessing
    #[serde(default)]
    pub preprocess: PreprocessConfig,

    /// Sentence parsing engine
    #[serde(default)]
    pub parser: ParserConfig,

    /// Compilability gate
    #[serde(default)]
    pub gate: GateConfig,

    /// Batch runtime
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Matching thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Largest edit distance at which a subject still matches an identifier
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: usize,

    /// Cost of dropping one whole word from the subject while matching
    #[serde(default = "default_word_removal_cost")]
    pub word_removal_cost: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            distance_threshold: default_distance_threshold(),
            word_removal_cost: default_word_removal_cost(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Drop commas from `@param` and `@throws` text before parsing
    #[serde(default = "default_remove_commas")]
    pub remove_commas: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            remove_commas: default_remove_commas(),
        }
    }
}

/// Sentence parser selection
///
/// # Engines
/// - `rule_based` (default): built-in shallow dependency parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    #[serde(default = "default_parser_engine")]
    pub engine: String,

    /// Memoize parses per (comment, method)
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            engine: default_parser_engine(),
            cache_enabled: default_cache_enabled(),
        }
    }
}

/// Compilability gate
///
/// # Checkers
/// - `scope` (default): built-in expression type checker against declared types
/// - `javac`: compiles a generated snippet with an external `javac`
/// - `none`: every condition passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_checker")]
    pub checker: String,

    /// Explicit `javac` executable; looked up on `PATH` when absent
    #[serde(default)]
    pub javac_path: Option<PathBuf>,

    /// Classpath entries passed to `javac`
    #[serde(default)]
    pub classpath: Vec<PathBuf>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            checker: default_checker(),
            javac_path: None,
            classpath: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Methods translated concurrently by the batch front end
    #[serde(default = "default_max_concurrent_methods")]
    pub max_concurrent_methods: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_concurrent_methods: default_max_concurrent_methods(),
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !VALID_PARSER_ENGINES.contains(&self.parser.engine.as_str()) {
            return Err(Error::config(format!(
                "Invalid parser engine '{}'. Must be one of: {:?}",
                self.parser.engine, VALID_PARSER_ENGINES
            )));
        }

        if !VALID_CHECKERS.contains(&self.gate.checker.as_str()) {
            return Err(Error::config(format!(
                "Invalid gate checker '{}'. Must be one of: {:?}",
                self.gate.checker, VALID_CHECKERS
            )));
        }

        if self.matcher.distance_threshold > 16 {
            return Err(Error::config(format!(
                "matcher.distance_threshold too large (max 16, got {})",
                self.matcher.distance_threshold
            )));
        }

        if self.runtime.max_concurrent_methods == 0 {
            return Err(Error::config(
                "runtime.max_concurrent_methods must be greater than 0".to_string(),
            ));
        }
        if self.runtime.max_concurrent_methods > 256 {
            return Err(Error::config(format!(
                "runtime.max_concurrent_methods too large (max 256, got {})",
                self.runtime.max_concurrent_methods
            )));
        }

        if let Some(javac) = &self.gate.javac_path {
            if javac.as_os_str().is_empty() {
                return Err(Error::config("gate.javac_path must not be empty".to_string()));
            }
        }

        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let toml_string = self.to_toml_string()?;

        std::fs::write(path, toml_string)
            .map_err(|e| Error::config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}
