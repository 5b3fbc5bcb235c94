// crates/typesig-contract/src/wrapper.rs
// ============================================================================
// Module: Contract Wrapper
// Description: Callable that enforces one contract layer around another callable.
// Purpose: Check arguments or return values on every call under the current policy.
// Dependencies: crate::{binder, contract, error, function, policy}, typesig
// ============================================================================

//! ## Overview
//! A [`ContractedFunction`] is observationally the function it wraps: same
//! signature, same reference, same result and same errors. It adds one check
//! per call, taken against the policy snapshot current when the call starts.
//! When checks are disabled the call goes straight through.

use std::fmt;
use std::sync::Arc;

use typesig::Value;

use crate::binder::bind;
use crate::contract::ContractLayer;
use crate::contract::ParameterContract;
use crate::contract::ReturnContract;
use crate::error::InvocationError;
use crate::function::CallArgs;
use crate::function::Callable;
use crate::function::FunctionSignature;
use crate::policy::current_policy;

// ============================================================================
// SECTION: Contracts
// ============================================================================

/// Contract enforced by one wrapper layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contract {
    /// Checks arguments before the call
    Parameters(ParameterContract),
    /// Checks the returned value after the call
    Return(ReturnContract),
}

impl Contract {
    /// Returns the layer this contract occupies
    #[must_use]
    pub const fn layer(&self) -> ContractLayer {
        match self {
            Self::Parameters(_) => ContractLayer::Parameters,
            Self::Return(_) => ContractLayer::Return,
        }
    }
}

// ============================================================================
// SECTION: Wrapper
// ============================================================================

/// Callable enforcing a contract around an inner callable
pub struct ContractedFunction {
    /// Wrapped callable.
    inner: Arc<dyn Callable>,
    /// Contract checked by this layer.
    contract: Contract,
    /// This layer followed by the inner layers.
    layers: Vec<ContractLayer>,
}

impl ContractedFunction {
    /// Wraps `inner` with `contract`
    #[must_use]
    pub fn new(inner: Arc<dyn Callable>, contract: Contract) -> Self {
        let mut layers = Vec::with_capacity(inner.contract_layers().len() + 1);
        layers.push(contract.layer());
        layers.extend_from_slice(inner.contract_layers());
        Self {
            inner,
            contract,
            layers,
        }
    }

    /// Returns the contract this layer enforces
    #[must_use]
    pub const fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Returns the wrapped callable
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn Callable> {
        &self.inner
    }
}

impl fmt::Debug for ContractedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractedFunction")
            .field("function", &self.inner.signature().reference())
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

impl Callable for ContractedFunction {
    fn signature(&self) -> &FunctionSignature {
        self.inner.signature()
    }

    fn call(&self, args: CallArgs) -> Result<Value, InvocationError> {
        let policy = current_policy();
        if !policy.checks_enabled {
            return self.inner.call(args);
        }

        match &self.contract {
            Contract::Parameters(contract) => {
                let binding = bind(self.inner.signature(), &args);
                contract.check(&binding, args.call_site.as_ref(), &policy)?;
                self.inner.call(args)
            }
            Contract::Return(contract) => {
                let value = self.inner.call(args)?;
                contract.check(&value, &policy)?;
                Ok(value)
            }
        }
    }

    fn contract_layers(&self) -> &[ContractLayer] {
        &self.layers
    }
}

// ============================================================================
// SECTION: Uninstalled Contracts
// ============================================================================

/// Callable standing in for a contract that was declared but not installed
///
/// Calls go straight to the inner callable under every policy. Only the
/// declared layers are kept, so later declarations still see them when
/// checking order and duplicates.
pub struct UncheckedFunction {
    /// Wrapped callable.
    inner: Arc<dyn Callable>,
    /// Declared layer followed by the inner layers.
    layers: Vec<ContractLayer>,
}

impl UncheckedFunction {
    /// Records `layer` on `inner` without enforcing anything
    #[must_use]
    pub fn new(inner: Arc<dyn Callable>, layer: ContractLayer) -> Self {
        let mut layers = Vec::with_capacity(inner.contract_layers().len() + 1);
        layers.push(layer);
        layers.extend_from_slice(inner.contract_layers());
        Self {
            inner,
            layers,
        }
    }

    /// Returns the wrapped callable
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn Callable> {
        &self.inner
    }
}

impl fmt::Debug for UncheckedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UncheckedFunction")
            .field("function", &self.inner.signature().reference())
            .field("layers", &self.layers)
            .finish_non_exhaustive()
    }
}

impl Callable for UncheckedFunction {
    fn signature(&self) -> &FunctionSignature {
        self.inner.signature()
    }

    fn call(&self, args: CallArgs) -> Result<Value, InvocationError> {
        self.inner.call(args)
    }

    fn contract_layers(&self) -> &[ContractLayer] {
        &self.layers
    }
}
