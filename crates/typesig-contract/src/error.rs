// crates/typesig-contract/src/error.rs
// ============================================================================
// Module: Contract Errors
// Description: Declaration-time and call-time error types.
// Purpose: Separate unconditional declaration failures from policy-driven violations.
// Dependencies: crate::{contract, function, policy}, typesig, thiserror
// ============================================================================

//! ## Overview
//! Declaration errors are raised while a contract is attached and never
//! depend on the typecheck policy. Contract violations are raised per call,
//! and only when the current policy names an exception kind. A function's own
//! errors travel beside violations in [`InvocationError`] untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;
use typesig::SignatureError;

use crate::contract::ContractLayer;
use crate::function::FunctionError;
use crate::function::SiteInfo;
use crate::policy::ErrorKind;

// ============================================================================
// SECTION: Declaration Errors
// ============================================================================

/// Errors raised while declaring a contract
///
/// # Invariants
/// - Returned regardless of whether checks or wrappers are enabled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// A descriptor in the contract is malformed
    #[error("invalid type signature: {0}")]
    Signature(#[from] SignatureError),

    /// Declared names differ from the function's named parameters
    #[error(
        "annotation doesn't match function signature of {function} (missing: [{}], extra: [{}])",
        .missing.join(", "),
        .extra.join(", ")
    )]
    ParameterMismatch {
        /// Function being decorated
        function: String,
        /// Parameters with no declared descriptor
        missing: Vec<String>,
        /// Declared names the function does not have
        extra: Vec<String>,
    },

    /// A return contract was applied on top of a parameter contract
    #[error("return contract must be applied before the parameter contract on {function}")]
    Order {
        /// Function being decorated
        function: String,
    },

    /// The same contract layer was applied twice
    #[error("{layer} contract already applied to {function}")]
    DuplicateContract {
        /// Function being decorated
        function: String,
        /// Layer applied twice
        layer: ContractLayer,
    },
}

// ============================================================================
// SECTION: Contract Violations
// ============================================================================

/// Kind of check that failed during a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationCategory {
    /// A bound argument did not match its descriptor
    Argument,
    /// A keyword argument named no parameter
    UnknownKeyword,
    /// A returned value did not match the return descriptor
    Return,
    /// A non-void function returned null
    MissingReturn,
    /// A void function returned a value
    UnexpectedReturn,
}

impl ViolationCategory {
    /// Returns the stable label used in log fields
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Argument => "argument",
            Self::UnknownKeyword => "unknown_keyword",
            Self::Return => "return",
            Self::MissingReturn => "missing_return",
            Self::UnexpectedReturn => "unexpected_return",
        }
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed contract check raised under the configured exception kind
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ContractViolation {
    /// Exception kind from the policy in force
    pub kind: ErrorKind,
    /// Which check failed
    pub category: ViolationCategory,
    /// Function whose contract was violated
    pub function: String,
    /// Diagnostic message
    pub message: String,
    /// Call site or definition site the violation is attributed to
    pub site: SiteInfo,
}

// ============================================================================
// SECTION: Invocation Errors
// ============================================================================

/// Error returned by calling a [`crate::Callable`]
#[derive(Debug, Error)]
pub enum InvocationError {
    /// A contract check failed and the policy raises
    #[error(transparent)]
    Violation(#[from] ContractViolation),

    /// The function itself failed
    #[error("{0}")]
    Function(FunctionError),
}

impl InvocationError {
    /// Returns the violation, if this error is one
    #[must_use]
    pub const fn violation(&self) -> Option<&ContractViolation> {
        match self {
            Self::Violation(violation) => Some(violation),
            Self::Function(_) => None,
        }
    }
}
