// crates/typesig-contract/src/policy.rs
// ============================================================================
// Module: Typecheck Policy
// Description: Process-wide switch deciding how contract violations are handled.
// Purpose: Hold the current policy snapshot and report violations through it.
// Dependencies: crate::{error, function}, serde, tracing
// ============================================================================

//! ## Overview
//! The policy is an immutable [`TypecheckPolicy`] snapshot behind a
//! process-wide lock. Writers replace the whole snapshot; readers clone the
//! `Arc` and keep using the snapshot that was current when their check began.
//! The lock is held only to clone or swap the `Arc`.
//!
//! Reporting a violation logs first (when a severity is set) and then returns
//! the error (when an exception kind is set), so the message is observable even
//! when the caller aborts on the error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::PoisonError;
use std::sync::RwLock;

use serde::Deserialize;
use serde::Serialize;
use tracing::Level;

use crate::error::ContractViolation;
use crate::error::ViolationCategory;
use crate::function::SiteInfo;

// ============================================================================
// SECTION: Error Kinds and Severities
// ============================================================================

/// Exception kind a violation is raised as
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Generic type error
    #[default]
    Type,
    /// Value error
    Value,
    /// Assertion failure
    Assertion,
    /// Host-defined kind identified by name
    Custom(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => f.write_str("type error"),
            Self::Value => f.write_str("value error"),
            Self::Assertion => f.write_str("assertion error"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Severity at which violations are logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSeverity {
    /// Trace level
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warn level
    Warn,
    /// Error level
    Error,
}

impl From<LogSeverity> for Level {
    fn from(severity: LogSeverity) -> Self {
        match severity {
            LogSeverity::Trace => Self::TRACE,
            LogSeverity::Debug => Self::DEBUG,
            LogSeverity::Info => Self::INFO,
            LogSeverity::Warn => Self::WARN,
            LogSeverity::Error => Self::ERROR,
        }
    }
}

// ============================================================================
// SECTION: Policy Snapshot
// ============================================================================

/// Immutable typecheck policy snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypecheckPolicy {
    /// Whether installed wrappers check anything.
    pub checks_enabled: bool,
    /// Whether declaring a contract installs a wrapper at all.
    pub install_wrappers: bool,
    /// Kind raised on violation; `None` only logs.
    pub exception: Option<ErrorKind>,
    /// Severity violations are logged at; `None` disables logging.
    pub log_level: Option<LogSeverity>,
}

impl Default for TypecheckPolicy {
    fn default() -> Self {
        Self {
            checks_enabled: true,
            install_wrappers: true,
            exception: Some(ErrorKind::Type),
            log_level: None,
        }
    }
}

impl TypecheckPolicy {
    /// Policy that checks nothing and installs no wrappers
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            checks_enabled: false,
            install_wrappers: false,
            exception: None,
            log_level: None,
        }
    }

    /// Reports a violation under this policy
    ///
    /// Does nothing when checks are disabled. Otherwise logs at the configured
    /// severity, then returns the violation when an exception kind is set.
    ///
    /// # Errors
    /// Returns [`ContractViolation`] when checks are enabled and an exception
    /// kind is configured.
    pub fn report(
        &self,
        category: ViolationCategory,
        function: &str,
        message: String,
        site: &SiteInfo,
    ) -> Result<(), ContractViolation> {
        if !self.checks_enabled {
            return Ok(());
        }
        if let Some(severity) = self.log_level {
            log_violation(severity, category, function, &message, site);
        }
        match &self.exception {
            Some(kind) => Err(ContractViolation {
                kind: kind.clone(),
                category,
                function: function.to_string(),
                message,
                site: site.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Emits the violation event at the given severity.
fn log_violation(
    severity: LogSeverity,
    category: ViolationCategory,
    function: &str,
    message: &str,
    site: &SiteInfo,
) {
    let category = category.as_str();
    let file = site.file.as_str();
    let line = site.line;
    match severity {
        LogSeverity::Trace => {
            tracing::trace!(category, function, file, line, "{site}: {message}");
        }
        LogSeverity::Debug => {
            tracing::debug!(category, function, file, line, "{site}: {message}");
        }
        LogSeverity::Info => {
            tracing::info!(category, function, file, line, "{site}: {message}");
        }
        LogSeverity::Warn => {
            tracing::warn!(category, function, file, line, "{site}: {message}");
        }
        LogSeverity::Error => {
            tracing::error!(category, function, file, line, "{site}: {message}");
        }
    }
}

// ============================================================================
// SECTION: Process-Wide Policy
// ============================================================================

/// Current policy snapshot.
static POLICY: OnceLock<RwLock<Arc<TypecheckPolicy>>> = OnceLock::new();

/// Returns the policy cell, initializing it with the default policy.
fn cell() -> &'static RwLock<Arc<TypecheckPolicy>> {
    POLICY.get_or_init(|| RwLock::new(Arc::new(TypecheckPolicy::default())))
}

/// Returns the current policy snapshot
#[must_use]
pub fn current_policy() -> Arc<TypecheckPolicy> {
    let guard = cell().read().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(&*guard)
}

/// Replaces the current policy
pub fn configure(policy: TypecheckPolicy) {
    let next = Arc::new(policy);
    let mut guard = cell().write().unwrap_or_else(PoisonError::into_inner);
    *guard = next;
}

/// Replaces the current policy; wrapper installation follows `enabled`
pub fn configure_typecheck(
    enabled: bool,
    exception: Option<ErrorKind>,
    log_level: Option<LogSeverity>,
) {
    configure(TypecheckPolicy {
        checks_enabled: enabled,
        install_wrappers: enabled,
        exception,
        log_level,
    });
}

/// Restores the default policy
pub fn reset_policy() {
    configure(TypecheckPolicy::default());
}

/// Reports a violation under the current policy
///
/// # Errors
/// Returns [`ContractViolation`] when the current policy raises.
pub fn report_violation(
    category: ViolationCategory,
    function: &str,
    message: String,
    site: &SiteInfo,
) -> Result<(), ContractViolation> {
    current_policy().report(category, function, message, site)
}
