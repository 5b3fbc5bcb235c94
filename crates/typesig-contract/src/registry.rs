// crates/typesig-contract/src/registry.rs
// ============================================================================
// Module: Function Registry
// Description: Resolves serialized function references to live callables.
// Purpose: Let contracted functions travel by reference and keep their contracts.
// Dependencies: crate::{error, function}, typesig, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Functions are serialized by reference (`module::name`), never by value. A
//! wrapper keeps the reference of the function it wraps, so registering the
//! wrapped callable makes a deserialized reference resolve to the checked
//! version.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::PoisonError;
use std::sync::RwLock;

use thiserror::Error;
use typesig::FunctionRef;
use typesig::Value;

use crate::error::InvocationError;
use crate::function::CallArgs;
use crate::function::Callable;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while resolving function references
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No callable is registered under the reference
    #[error("no function registered as {0}")]
    NotFound(FunctionRef),

    /// The value is not a function reference
    #[error("value {0} is not a function reference")]
    NotAFunction(String),

    /// The serialized reference could not be decoded
    #[error("function reference decode error: {0}")]
    Decode(String),

    /// The resolved function failed
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Table of callables keyed by their function reference
#[derive(Default)]
pub struct FunctionRegistry {
    /// Registered callables.
    functions: RwLock<BTreeMap<FunctionRef, Arc<dyn Callable>>>,
}

impl FunctionRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry
    pub fn global() -> &'static Self {
        /// Process-wide registry instance.
        static GLOBAL: OnceLock<FunctionRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Registers a callable under its reference, replacing any previous entry
    pub fn register(&self, callable: Arc<dyn Callable>) -> FunctionRef {
        let reference = callable.signature().reference();
        let mut functions = self.functions.write().unwrap_or_else(PoisonError::into_inner);
        functions.insert(reference.clone(), callable);
        reference
    }

    /// Resolves a reference to its callable
    ///
    /// # Errors
    /// Returns [`RegistryError::NotFound`] when nothing is registered under it.
    pub fn resolve(&self, reference: &FunctionRef) -> Result<Arc<dyn Callable>, RegistryError> {
        let functions = self.functions.read().unwrap_or_else(PoisonError::into_inner);
        functions
            .get(reference)
            .map(Arc::clone)
            .ok_or_else(|| RegistryError::NotFound(reference.clone()))
    }

    /// Resolves a function reference value
    ///
    /// # Errors
    /// Returns [`RegistryError`] when the value is not a registered reference.
    pub fn resolve_value(&self, value: &Value) -> Result<Arc<dyn Callable>, RegistryError> {
        match value {
            Value::Function(reference) => self.resolve(reference),
            other => Err(RegistryError::NotAFunction(other.to_string())),
        }
    }

    /// Resolves a JSON-encoded reference
    ///
    /// # Errors
    /// Returns [`RegistryError`] when decoding fails or nothing is registered.
    pub fn resolve_json(&self, text: &str) -> Result<Arc<dyn Callable>, RegistryError> {
        let reference: FunctionRef =
            serde_json::from_str(text).map_err(|err| RegistryError::Decode(err.to_string()))?;
        self.resolve(&reference)
    }

    /// Resolves a reference and calls it
    ///
    /// # Errors
    /// Returns [`RegistryError`] when resolution or the call fails.
    pub fn call(&self, reference: &FunctionRef, args: CallArgs) -> Result<Value, RegistryError> {
        Ok(self.resolve(reference)?.call(args)?)
    }

    /// Returns true when a callable is registered under the reference
    #[must_use]
    pub fn contains(&self, reference: &FunctionRef) -> bool {
        self.functions.read().unwrap_or_else(PoisonError::into_inner).contains_key(reference)
    }

    /// Returns the registered references in order
    #[must_use]
    pub fn references(&self) -> Vec<FunctionRef> {
        self.functions.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry").field("functions", &self.references()).finish()
    }
}
