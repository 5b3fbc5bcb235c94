// crates/typesig-contract/src/function.rs
// ============================================================================
// Module: Function Model
// Description: Introspectable function signatures, call arguments, and callables.
// Purpose: Give contracts the parameter list and sites a host runtime would expose.
// Dependencies: crate::{binder, contract, error}, typesig
// ============================================================================

//! ## Overview
//! Contracts need three things from the functions they guard: the ordered
//! named parameters (variadic collectors excluded), where the function was
//! defined, and a way to call it. [`FunctionSignature`] carries the first two
//! and [`Callable`] the third. [`NativeFunction`] adapts a Rust closure into a
//! callable with strict argument binding.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use typesig::FunctionRef;
use typesig::TypeDescriptor;
use typesig::Value;

use crate::binder::BoundArguments;
use crate::contract::ContractLayer;
use crate::error::InvocationError;

/// Error type produced by function bodies
pub type FunctionError = Box<dyn Error + Send + Sync>;

// ============================================================================
// SECTION: Source Sites
// ============================================================================

/// Source location a diagnostic is attributed to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteInfo {
    /// Source file path.
    pub file: String,
    /// One-based line number.
    pub line: u32,
    /// Enclosing function, when known.
    pub function: Option<String>,
}

impl SiteInfo {
    /// Creates a site from explicit parts
    pub fn new(file: impl Into<String>, line: u32, function: Option<String>) -> Self {
        Self {
            file: file.into(),
            line,
            function,
        }
    }

    /// Captures the caller's location
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), None)
    }

    /// Sets the enclosing function name
    #[must_use]
    pub fn in_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }
}

impl fmt::Display for SiteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if let Some(function) = &self.function {
            write!(f, " in {function}")?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Signatures
// ============================================================================

/// Named parameter of a function
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type annotation, if any.
    pub annotation: Option<TypeDescriptor>,
    /// Default value used when the argument is omitted.
    pub default: Option<Value>,
}

impl Parameter {
    /// Creates an unannotated parameter without a default
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            default: None,
        }
    }

    /// Sets the type annotation
    #[must_use]
    pub fn annotated(mut self, annotation: TypeDescriptor) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Sets the default value
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Introspectable signature of a function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    /// Function name.
    pub name: String,
    /// Module path the function is defined in.
    pub module: String,
    /// Named parameters in declared order.
    pub params: Vec<Parameter>,
    /// Collector for surplus positional arguments, if any.
    pub variadic_positional: Option<String>,
    /// Collector for unmatched keyword arguments, if any.
    pub variadic_keyword: Option<String>,
    /// Declared return annotation, if any.
    pub returns: Option<TypeDescriptor>,
    /// Definition site.
    pub site: SiteInfo,
}

impl FunctionSignature {
    /// Starts a signature; the definition site is the caller's location
    #[must_use]
    #[track_caller]
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            site: SiteInfo::caller().in_function(name.clone()),
            name,
            module: module.into(),
            params: Vec::new(),
            variadic_positional: None,
            variadic_keyword: None,
            returns: None,
        }
    }

    /// Appends an unannotated parameter
    #[must_use]
    pub fn param(self, name: impl Into<String>) -> Self {
        self.with_param(Parameter::new(name))
    }

    /// Appends an annotated parameter
    #[must_use]
    pub fn typed_param(self, name: impl Into<String>, annotation: TypeDescriptor) -> Self {
        self.with_param(Parameter::new(name).annotated(annotation))
    }

    /// Appends a fully described parameter
    #[must_use]
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Accepts surplus positional arguments under `name`
    #[must_use]
    pub fn variadic(mut self, name: impl Into<String>) -> Self {
        self.variadic_positional = Some(name.into());
        self
    }

    /// Accepts unmatched keyword arguments under `name`
    #[must_use]
    pub fn variadic_keywords(mut self, name: impl Into<String>) -> Self {
        self.variadic_keyword = Some(name.into());
        self
    }

    /// Sets the return annotation
    #[must_use]
    pub fn returning(mut self, annotation: TypeDescriptor) -> Self {
        self.returns = Some(annotation);
        self
    }

    /// Overrides the definition site
    #[must_use]
    pub fn defined_at(mut self, site: SiteInfo) -> Self {
        self.site = site;
        self
    }

    /// Returns the stable reference to the function
    #[must_use]
    pub fn reference(&self) -> FunctionRef {
        FunctionRef::new(self.module.clone(), self.name.clone())
    }

    /// Returns the named parameters in declared order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|param| param.name.as_str())
    }

    /// Looks up a named parameter
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|param| param.name == name)
    }
}

// ============================================================================
// SECTION: Call Arguments
// ============================================================================

/// Arguments of one call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    /// Positional arguments in order.
    pub positional: Vec<Value>,
    /// Keyword arguments in order.
    pub keyword: Vec<(String, Value)>,
    /// Where the call was made, when captured.
    pub call_site: Option<SiteInfo>,
}

impl CallArgs {
    /// Starts an argument list, capturing the caller's location as call site
    #[must_use]
    #[track_caller]
    pub fn new() -> Self {
        Self {
            positional: Vec::new(),
            keyword: Vec::new(),
            call_site: Some(SiteInfo::caller()),
        }
    }

    /// Starts an argument list with the given positional values
    #[must_use]
    #[track_caller]
    pub fn positional<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::new().args(values)
    }

    /// Appends a positional argument
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Appends several positional arguments
    #[must_use]
    pub fn args<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.positional.extend(values.into_iter().map(Into::into));
        self
    }

    /// Appends a keyword argument
    #[must_use]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.push((name.into(), value.into()));
        self
    }

    /// Replaces the call site
    #[must_use]
    pub fn at(mut self, site: SiteInfo) -> Self {
        self.call_site = Some(site);
        self
    }
}

// ============================================================================
// SECTION: Callables
// ============================================================================

/// A function that can be introspected and called with dynamic values
pub trait Callable: Send + Sync {
    /// Returns the function's signature
    fn signature(&self) -> &FunctionSignature;

    /// Calls the function
    ///
    /// # Errors
    /// Returns [`InvocationError`] when a contract check raises or the function fails.
    fn call(&self, args: CallArgs) -> Result<Value, InvocationError>;

    /// Contract layers wrapping the function, outermost first
    fn contract_layers(&self) -> &[ContractLayer] {
        &[]
    }
}

/// Boxed body of a [`NativeFunction`]
pub type FunctionBody = dyn Fn(&BoundArguments) -> Result<Value, FunctionError> + Send + Sync;

/// Rust closure exposed as a [`Callable`]
///
/// Arguments are bound strictly before the body runs: defaults are filled,
/// and missing, surplus, duplicate, or unexpected arguments fail the call with
/// a [`crate::BindError`] the way the host runtime would.
pub struct NativeFunction {
    /// Declared signature.
    signature: FunctionSignature,
    /// Function body.
    body: Box<FunctionBody>,
}

impl NativeFunction {
    /// Creates a native function
    pub fn new<F>(signature: FunctionSignature, body: F) -> Self
    where
        F: Fn(&BoundArguments) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        Self {
            signature,
            body: Box::new(body),
        }
    }

    /// Wraps the function in a shared callable handle
    #[must_use]
    pub fn into_callable(self) -> Arc<dyn Callable> {
        Arc::new(self)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction").field("signature", &self.signature).finish_non_exhaustive()
    }
}

impl Callable for NativeFunction {
    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn call(&self, args: CallArgs) -> Result<Value, InvocationError> {
        let bound = BoundArguments::resolve(&self.signature, args)
            .map_err(|err| InvocationError::Function(Box::new(err)))?;
        (self.body)(&bound).map_err(InvocationError::Function)
    }
}
