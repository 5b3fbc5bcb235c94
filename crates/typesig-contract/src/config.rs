// crates/typesig-contract/src/config.rs
// ============================================================================
// Module: Typecheck Configuration
// Description: TOML configuration for the process-wide typecheck policy.
// Purpose: Load the policy from a file with strict size and encoding limits.
// Dependencies: crate::policy, serde, toml, thiserror
// ============================================================================

//! ## Overview
//! The policy can be configured from a `[typecheck]` table in a TOML file:
//!
//! ```toml
//! [typecheck]
//! enabled = true
//! raise = true
//! exception = "value"
//! log_level = "warn"
//! ```
//!
//! The path comes from the caller, then the `TYPESIG_CONFIG` environment
//! variable, then `typesig.toml` in the working directory.
//! Security posture: config inputs are untrusted; oversized or non-UTF-8 files
//! fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::policy::ErrorKind;
use crate::policy::LogSeverity;
use crate::policy::TypecheckPolicy;
use crate::policy::configure;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "typesig.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "TYPESIG_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a custom exception kind name.
const MAX_CUSTOM_KIND_LENGTH: usize = 128;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Top-level configuration document.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    /// Typecheck table.
    #[serde(default)]
    typecheck: TypecheckConfig,
}

/// Typecheck settings as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypecheckConfig {
    /// Whether wrappers check anything.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether declaring a contract installs a wrapper; follows `enabled` when unset.
    #[serde(default)]
    pub install_wrappers: Option<bool>,
    /// Whether violations are raised; when false they are only logged.
    #[serde(default = "default_true")]
    pub raise: bool,
    /// Kind violations are raised as.
    #[serde(default)]
    pub exception: ErrorKind,
    /// Severity violations are logged at.
    #[serde(default)]
    pub log_level: Option<LogSeverity>,
}

/// Serde default for boolean switches that start on.
const fn default_true() -> bool {
    true
}

impl Default for TypecheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            install_wrappers: None,
            raise: true,
            exception: ErrorKind::default(),
            log_level: None,
        }
    }
}

impl TypecheckConfig {
    /// Loads configuration from disk
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses configuration from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let config = file.typecheck;
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration values
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for an unusable custom exception kind.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let ErrorKind::Custom(name) = &self.exception {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::Invalid(
                    "typecheck.exception custom kind must be non-empty".to_string(),
                ));
            }
            if trimmed.len() > MAX_CUSTOM_KIND_LENGTH {
                return Err(ConfigError::Invalid(
                    "typecheck.exception custom kind exceeds max length".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Returns the policy these settings describe
    #[must_use]
    pub fn policy(&self) -> TypecheckPolicy {
        TypecheckPolicy {
            checks_enabled: self.enabled,
            install_wrappers: self.install_wrappers.unwrap_or(self.enabled),
            exception: self.raise.then(|| self.exception.clone()),
            log_level: self.log_level,
        }
    }

    /// Installs the policy these settings describe
    pub fn apply(&self) {
        configure(self.policy());
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}
