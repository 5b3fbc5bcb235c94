// crates/typesig/src/error.rs
// ============================================================================
// Module: Signature Error Definitions
// Description: Structured diagnostics for malformed type signatures.
// Purpose: Report every way a signature can fail its validity check.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A malformed signature is a programming error, not a data-validation
//! failure. These errors surface at contract-definition time and are never
//! gated by the runtime typecheck policy.

use thiserror::Error;

// ============================================================================
// SECTION: Signature Errors
// ============================================================================

/// Errors raised while validating a signature or descriptor
///
/// # Invariants
/// - None. Variants capture the first malformed node found top-down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// A list signature carried zero or several element types
    #[error("list signature must carry exactly one element type, found {found}")]
    ListArity {
        /// Number of element types supplied
        found: usize,
    },

    /// A set signature carried zero or several element types
    #[error("set signature must carry exactly one element type, found {found}")]
    SetArity {
        /// Number of element types supplied
        found: usize,
    },

    /// A map signature carried zero or several key/value pairs
    #[error("map signature must carry exactly one key/value pair, found {found}")]
    MapArity {
        /// Number of key/value pairs supplied
        found: usize,
    },

    /// A tuple signature carried no element types
    #[error("tuple signature must carry at least one element type")]
    EmptyTuple,

    /// A union carried fewer than two members
    #[error("union signature needs at least two members, found {found}")]
    UnionArity {
        /// Number of members supplied
        found: usize,
    },

    /// A leaf named a type the registry does not know
    #[error("unknown type name '{0}'")]
    UnknownType(String),

    /// The signature nests deeper than the configured limit
    #[error("signature nesting too deep: {actual_depth} levels (max {max_depth})")]
    TooDeep {
        /// Maximum supported nesting depth
        max_depth: usize,
        /// Depth encountered during validation
        actual_depth: usize,
    },
}

// ============================================================================
// SECTION: Result Alias
// ============================================================================

/// Convenient Result type for signature operations
pub type SignatureResult<T = ()> = Result<T, SignatureError>;
