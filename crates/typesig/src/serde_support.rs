// crates/typesig/src/serde_support.rs
// ============================================================================
// Module: Signature Serde Support
// Description: RON/JSON encoding of descriptors with mandatory validation.
// Purpose: Load authored signatures from text and write descriptors back out.
// Dependencies: crate::{descriptor, signature, types}, ron, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Descriptors travel as [`Signature`] documents. Decoding always runs the
//! validity check, so a malformed document never yields a descriptor.
//! Security posture: decoded documents are untrusted; validate and fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::descriptor::TypeDescriptor;
use crate::error::SignatureError;
use crate::signature::DEFAULT_MAX_DEPTH;
use crate::signature::Signature;
use crate::types::TypeRegistry;

// ============================================================================
// SECTION: Serde Errors
// ============================================================================

/// Errors raised while encoding or decoding signatures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeError {
    /// The document could not be parsed
    #[error("signature parse error: {0}")]
    Parse(String),

    /// The descriptor could not be written
    #[error("signature encode error: {0}")]
    Encode(String),

    /// The document parsed but the signature is malformed
    #[error("invalid signature: {0}")]
    Invalid(#[from] SignatureError),
}

// ============================================================================
// SECTION: Serde Configuration
// ============================================================================

/// Configuration for signature serialization/deserialization
///
/// # Invariants
/// - No invariants are enforced; callers should choose safe bounds.
#[derive(Debug, Clone)]
pub struct SerdeConfig {
    /// Maximum allowed nesting depth for decoded signatures
    pub max_depth: usize,

    /// Whether encoded output is pretty-printed
    pub pretty: bool,
}

impl Default for SerdeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: true,
        }
    }
}

// ============================================================================
// SECTION: Signature Serializer
// ============================================================================

/// Encoder/decoder for descriptors bound to a type registry
///
/// # Invariants
/// - Every decoded descriptor has passed the validity check.
#[derive(Debug, Clone)]
pub struct SignatureSerializer {
    /// Encoding limits and formatting.
    config: SerdeConfig,
    /// Registry resolving type names on decode.
    registry: TypeRegistry,
}

impl SignatureSerializer {
    /// Creates a serializer with the given configuration and registry
    #[must_use]
    pub const fn new(config: SerdeConfig, registry: TypeRegistry) -> Self {
        Self {
            config,
            registry,
        }
    }

    /// Creates a serializer for builtin types with default limits
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(SerdeConfig::default(), TypeRegistry::new())
    }

    /// Returns the registry used on decode
    #[must_use]
    pub const fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Validates a decoded signature.
    fn compile(&self, signature: &Signature) -> Result<TypeDescriptor, SerdeError> {
        Ok(signature.compile_with_limit(&self.registry, self.config.max_depth)?)
    }

    /// Decodes a descriptor from RON
    ///
    /// # Errors
    /// Returns [`SerdeError`] if parsing fails or the signature is malformed.
    pub fn from_ron(&self, text: &str) -> Result<TypeDescriptor, SerdeError> {
        let signature: Signature =
            ron::from_str(text).map_err(|err| SerdeError::Parse(err.to_string()))?;
        self.compile(&signature)
    }

    /// Encodes a descriptor as RON
    ///
    /// # Errors
    /// Returns [`SerdeError`] if the descriptor is malformed or encoding fails.
    pub fn to_ron(&self, descriptor: &TypeDescriptor) -> Result<String, SerdeError> {
        descriptor.validate()?;
        let signature = Signature::from(descriptor);
        let encoded = if self.config.pretty {
            ron::ser::to_string_pretty(&signature, ron::ser::PrettyConfig::default())
        } else {
            ron::to_string(&signature)
        };
        encoded.map_err(|err| SerdeError::Encode(err.to_string()))
    }

    /// Decodes a descriptor from JSON
    ///
    /// # Errors
    /// Returns [`SerdeError`] if parsing fails or the signature is malformed.
    pub fn from_json(&self, text: &str) -> Result<TypeDescriptor, SerdeError> {
        let signature: Signature =
            serde_json::from_str(text).map_err(|err| SerdeError::Parse(err.to_string()))?;
        self.compile(&signature)
    }

    /// Encodes a descriptor as JSON
    ///
    /// # Errors
    /// Returns [`SerdeError`] if the descriptor is malformed or encoding fails.
    pub fn to_json(&self, descriptor: &TypeDescriptor) -> Result<String, SerdeError> {
        descriptor.validate()?;
        let signature = Signature::from(descriptor);
        let encoded = if self.config.pretty {
            serde_json::to_string_pretty(&signature)
        } else {
            serde_json::to_string(&signature)
        };
        encoded.map_err(|err| SerdeError::Encode(err.to_string()))
    }
}
