// crates/typesig-contract/src/decorator.rs
// ============================================================================
// Module: Contract Decorators
// Description: Declaration-time constructors that attach contracts to callables.
// Purpose: Validate contracts once and install wrappers according to the policy.
// Dependencies: crate::{contract, error, function, policy, wrapper}, typesig, tracing
// ============================================================================

//! ## Overview
//! Decorators are the declaration surface: [`params`], [`returns`], [`void`]
//! and [`typed`]. Every declaration check runs whatever the policy says;
//! only the final step, installing the wrapper, consults `install_wrappers`.
//! When it is off the target comes back behind a pass-through that is never
//! checked, even if the policy is enabled later, but still records the
//! declared layer for the order and duplicate checks.
//!
//! A return contract must sit innermost: a parameter contract may wrap a
//! return-contracted function, but not the other way round.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;
use typesig::Signature;
use typesig::TypeDescriptor;
use typesig::TypeRegistry;

use crate::contract::ContractLayer;
use crate::contract::ParameterContract;
use crate::contract::ReturnContract;
use crate::error::DeclarationError;
use crate::function::Callable;
use crate::policy::current_policy;
use crate::wrapper::Contract;
use crate::wrapper::ContractedFunction;
use crate::wrapper::UncheckedFunction;

// ============================================================================
// SECTION: Decorator Trait
// ============================================================================

/// Attaches a contract to a callable
pub trait Decorator {
    /// Returns the decorated callable
    ///
    /// # Errors
    /// Returns [`DeclarationError`] when the contract cannot be attached.
    fn decorate(&self, target: Arc<dyn Callable>) -> Result<Arc<dyn Callable>, DeclarationError>;
}

/// Fails when `target` already carries `layer`.
fn ensure_layer_free(target: &dyn Callable, layer: ContractLayer) -> Result<(), DeclarationError> {
    if target.contract_layers().contains(&layer) {
        return Err(DeclarationError::DuplicateContract {
            function: target.signature().name.clone(),
            layer,
        });
    }
    Ok(())
}

/// Installs the wrapper when the current policy allows it.
fn install(target: Arc<dyn Callable>, contract: Contract) -> Arc<dyn Callable> {
    let reference = target.signature().reference();
    let layer = contract.layer();
    if !current_policy().install_wrappers {
        debug!(function = %reference, %layer, "wrappers disabled; contract not installed");
        return Arc::new(UncheckedFunction::new(target, layer));
    }
    debug!(function = %reference, %layer, "contract installed");
    Arc::new(ContractedFunction::new(target, contract))
}

// ============================================================================
// SECTION: Parameter Decorator
// ============================================================================

/// Decorator attaching a parameter contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamsDecorator {
    /// Descriptor per parameter name.
    entries: BTreeMap<String, TypeDescriptor>,
}

/// Declares descriptors for a function's parameters
///
/// Descriptors are validated immediately; parameter names are checked against
/// the function when the decorator is applied.
///
/// # Errors
/// Returns [`DeclarationError::Signature`] for a malformed descriptor.
pub fn params<I, K>(entries: I) -> Result<ParamsDecorator, DeclarationError>
where
    I: IntoIterator<Item = (K, TypeDescriptor)>,
    K: Into<String>,
{
    let entries: BTreeMap<String, TypeDescriptor> =
        entries.into_iter().map(|(name, descriptor)| (name.into(), descriptor)).collect();
    for descriptor in entries.values() {
        descriptor.validate()?;
    }
    Ok(ParamsDecorator {
        entries,
    })
}

impl ParamsDecorator {
    /// Declares parameter descriptors from authored signatures
    ///
    /// # Errors
    /// Returns [`DeclarationError::Signature`] when a signature is malformed or
    /// names a type the registry does not know.
    pub fn from_signatures<I, K>(
        entries: I,
        registry: &TypeRegistry,
    ) -> Result<Self, DeclarationError>
    where
        I: IntoIterator<Item = (K, Signature)>,
        K: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, signature)| Ok((name.into(), signature.compile(registry)?)))
            .collect::<Result<BTreeMap<String, TypeDescriptor>, DeclarationError>>()?;
        Ok(Self {
            entries,
        })
    }
}

impl Decorator for ParamsDecorator {
    fn decorate(&self, target: Arc<dyn Callable>) -> Result<Arc<dyn Callable>, DeclarationError> {
        let contract = ParameterContract::new(self.entries.clone(), target.signature())?;
        ensure_layer_free(target.as_ref(), ContractLayer::Parameters)?;
        Ok(install(target, Contract::Parameters(contract)))
    }
}

// ============================================================================
// SECTION: Return Decorator
// ============================================================================

/// Decorator attaching a return contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnsDecorator {
    /// Return descriptor.
    descriptor: TypeDescriptor,
}

/// Declares the descriptor of a function's return value
///
/// # Errors
/// Returns [`DeclarationError::Signature`] for a malformed descriptor.
pub fn returns(descriptor: TypeDescriptor) -> Result<ReturnsDecorator, DeclarationError> {
    descriptor.validate()?;
    Ok(ReturnsDecorator {
        descriptor,
    })
}

/// Declares that a function returns nothing
#[must_use]
pub const fn void() -> ReturnsDecorator {
    ReturnsDecorator {
        descriptor: TypeDescriptor::null(),
    }
}

impl ReturnsDecorator {
    /// Declares the return descriptor from an authored signature
    ///
    /// # Errors
    /// Returns [`DeclarationError::Signature`] when the signature is malformed.
    pub fn from_signature(
        signature: &Signature,
        registry: &TypeRegistry,
    ) -> Result<Self, DeclarationError> {
        Ok(Self {
            descriptor: signature.compile(registry)?,
        })
    }
}

impl Decorator for ReturnsDecorator {
    fn decorate(&self, target: Arc<dyn Callable>) -> Result<Arc<dyn Callable>, DeclarationError> {
        let contract = ReturnContract::new(self.descriptor.clone(), target.signature())?;
        ensure_layer_free(target.as_ref(), ContractLayer::Return)?;
        if target.contract_layers().contains(&ContractLayer::Parameters) {
            return Err(DeclarationError::Order {
                function: target.signature().name.clone(),
            });
        }
        Ok(install(target, Contract::Return(contract)))
    }
}

// ============================================================================
// SECTION: Annotation Decorator
// ============================================================================

/// Decorator deriving contracts from a function's own annotations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypedDecorator;

/// Derives contracts from parameter and return annotations
///
/// Unannotated parameters accept anything. A return annotation, when present,
/// becomes a return contract applied beneath the parameter contract.
#[must_use]
pub const fn typed() -> TypedDecorator {
    TypedDecorator
}

impl Decorator for TypedDecorator {
    fn decorate(&self, target: Arc<dyn Callable>) -> Result<Arc<dyn Callable>, DeclarationError> {
        let signature = target.signature();
        let entries: Vec<(String, TypeDescriptor)> = signature
            .params
            .iter()
            .map(|param| {
                (param.name.clone(), param.annotation.clone().unwrap_or_else(TypeDescriptor::any))
            })
            .collect();
        let return_decorator = signature.returns.clone().map(returns).transpose()?;
        let params_decorator = params(entries)?;

        let target = match return_decorator {
            Some(decorator) => decorator.decorate(target)?,
            None => target,
        };
        params_decorator.decorate(target)
    }
}
