// crates/typesig-contract/src/lib.rs
// ============================================================================
// Module: Typesig Contract Root
// Description: Public API surface for call-boundary contract enforcement.
// Purpose: Wire together the policy, function model, contracts, and decorators.
// Dependencies: crate::{binder, config, contract, decorator, error, function, policy,
//              registry, wrapper}, typesig
// ============================================================================

//! ## Overview
//! `typesig-contract` enforces [`typesig`] descriptors where values cross a
//! function boundary. Decorators validate a contract once at declaration and
//! wrap the function; every call through the wrapper checks arguments or the
//! return value and reports failures through the process-wide typecheck
//! policy, which may log, raise, both, or neither.
//!
//! ```
//! use typesig::Value;
//! use typesig::sig;
//! use typesig_contract::CallArgs;
//! use typesig_contract::Callable;
//! use typesig_contract::Decorator;
//! use typesig_contract::FunctionSignature;
//! use typesig_contract::NativeFunction;
//! use typesig_contract::params;
//! use typesig_contract::returns;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let add = NativeFunction::new(
//!     FunctionSignature::new("math", "add").param("a").param("b"),
//!     |args| {
//!         let a = args.value("a")?.as_int().unwrap_or_default();
//!         let b = args.value("b")?.as_int().unwrap_or_default();
//!         Ok(Value::from(a + b))
//!     },
//! )
//! .into_callable();
//! let add = returns(sig!(int))?.decorate(add)?;
//! let add = params([("a", sig!(int)), ("b", sig!(int))])?.decorate(add)?;
//!
//! assert_eq!(add.call(CallArgs::positional([1, 1]))?, Value::from(2));
//! assert!(add.call(CallArgs::new().arg("x").arg(1)).is_err());
//! # Ok(())
//! # }
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod binder;
pub mod config;
pub mod contract;
pub mod decorator;
pub mod error;
pub mod function;
pub mod policy;
pub mod registry;
pub mod wrapper;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use binder::ArgumentSource;
pub use binder::BindError;
pub use binder::BoundArgument;
pub use binder::BoundArguments;
pub use binder::Binding;
pub use binder::bind;
pub use config::ConfigError;
pub use config::TypecheckConfig;
pub use contract::ContractLayer;
pub use contract::ParameterContract;
pub use contract::ReturnContract;
pub use decorator::Decorator;
pub use decorator::ParamsDecorator;
pub use decorator::ReturnsDecorator;
pub use decorator::TypedDecorator;
pub use decorator::params;
pub use decorator::returns;
pub use decorator::typed;
pub use decorator::void;
pub use error::ContractViolation;
pub use error::DeclarationError;
pub use error::InvocationError;
pub use error::ViolationCategory;
pub use function::CallArgs;
pub use function::Callable;
pub use function::FunctionError;
pub use function::FunctionSignature;
pub use function::NativeFunction;
pub use function::Parameter;
pub use function::SiteInfo;
pub use policy::ErrorKind;
pub use policy::LogSeverity;
pub use policy::TypecheckPolicy;
pub use policy::configure;
pub use policy::configure_typecheck;
pub use policy::current_policy;
pub use policy::report_violation;
pub use policy::reset_policy;
pub use registry::FunctionRegistry;
pub use registry::RegistryError;
pub use typesig::convenience::nullable;
pub use typesig::convenience::union;
pub use wrapper::Contract;
pub use wrapper::ContractedFunction;
pub use wrapper::UncheckedFunction;
