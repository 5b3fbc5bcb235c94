// crates/typesig-contract/src/contract.rs
// ============================================================================
// Module: Contracts
// Description: Parameter and return contracts and their per-call checks.
// Purpose: Turn bound arguments and return values into policy reports.
// Dependencies: crate::{binder, error, function, policy}, typesig
// ============================================================================

//! ## Overview
//! A [`ParameterContract`] maps each named parameter of one function to a
//! descriptor; it can only be built when the declared names are exactly the
//! function's named parameters. A [`ReturnContract`] holds one descriptor,
//! where `null` means void. Both are immutable once built and report every
//! failed check through the [`TypecheckPolicy`] snapshot they are handed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use typesig::TypeDescriptor;
use typesig::Value;

use crate::binder::ArgumentSource;
use crate::binder::Binding;
use crate::error::ContractViolation;
use crate::error::DeclarationError;
use crate::error::ViolationCategory;
use crate::function::FunctionSignature;
use crate::function::SiteInfo;
use crate::policy::TypecheckPolicy;

// ============================================================================
// SECTION: Contract Layers
// ============================================================================

/// Layer of contract wrapping a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractLayer {
    /// Checks arguments before the call
    Parameters,
    /// Checks the returned value after the call
    Return,
}

impl fmt::Display for ContractLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameters => f.write_str("parameter"),
            Self::Return => f.write_str("return"),
        }
    }
}

// ============================================================================
// SECTION: Parameter Contract
// ============================================================================

/// Descriptor per named parameter of one function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterContract {
    /// Function the contract was declared on.
    function: String,
    /// Descriptor per parameter name.
    entries: BTreeMap<String, TypeDescriptor>,
    /// Definition site of the function.
    site: SiteInfo,
}

impl ParameterContract {
    /// Builds the contract for `signature`
    ///
    /// # Errors
    /// Returns [`DeclarationError::Signature`] for a malformed descriptor and
    /// [`DeclarationError::ParameterMismatch`] when the declared names differ
    /// from the function's named parameters.
    pub fn new(
        entries: BTreeMap<String, TypeDescriptor>,
        signature: &FunctionSignature,
    ) -> Result<Self, DeclarationError> {
        for descriptor in entries.values() {
            descriptor.validate()?;
        }

        let missing: Vec<String> = signature
            .param_names()
            .filter(|name| !entries.contains_key(*name))
            .map(str::to_string)
            .collect();
        let extra: Vec<String> = entries
            .keys()
            .filter(|name| signature.parameter(name).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() || !extra.is_empty() {
            return Err(DeclarationError::ParameterMismatch {
                function: signature.name.clone(),
                missing,
                extra,
            });
        }

        Ok(Self {
            function: signature.name.clone(),
            entries,
            site: signature.site.clone(),
        })
    }

    /// Returns the descriptor declared for a parameter
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<&TypeDescriptor> {
        self.entries.get(name)
    }

    /// Checks every bound argument, reporting failures through `policy`
    ///
    /// Arguments landing in variadic collectors are not checked. Keywords that
    /// name no parameter on a function without a keyword collector are
    /// reported as unknown.
    ///
    /// # Errors
    /// Returns [`ContractViolation`] on the first failure the policy raises.
    pub fn check(
        &self,
        binding: &Binding<'_>,
        call_site: Option<&SiteInfo>,
        policy: &TypecheckPolicy,
    ) -> Result<(), ContractViolation> {
        let site = call_site.unwrap_or(&self.site);

        for argument in &binding.named {
            let Some(descriptor) = self.entries.get(argument.name) else {
                continue;
            };
            if descriptor.matches(argument.value) {
                continue;
            }
            let prefix = match argument.source {
                ArgumentSource::Positional => "argument",
                ArgumentSource::Keyword => "keyword argument",
            };
            let message = format!(
                "{prefix} {} = {} doesn't match signature {descriptor}",
                argument.name, argument.value
            );
            policy.report(ViolationCategory::Argument, &self.function, message, site)?;
        }

        for (name, _) in &binding.unknown_keywords {
            let message =
                format!("unknown keyword argument {name} (positional specified as keyword?)");
            policy.report(ViolationCategory::UnknownKeyword, &self.function, message, site)?;
        }

        Ok(())
    }
}

// ============================================================================
// SECTION: Return Contract
// ============================================================================

/// Descriptor for the value a function returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnContract {
    /// Function the contract was declared on.
    function: String,
    /// Return descriptor; `null` means void.
    descriptor: TypeDescriptor,
    /// Definition site of the function.
    site: SiteInfo,
}

impl ReturnContract {
    /// Builds the contract for `signature`
    ///
    /// # Errors
    /// Returns [`DeclarationError::Signature`] for a malformed descriptor.
    pub fn new(
        descriptor: TypeDescriptor,
        signature: &FunctionSignature,
    ) -> Result<Self, DeclarationError> {
        descriptor.validate()?;
        Ok(Self {
            function: signature.name.clone(),
            descriptor,
            site: signature.site.clone(),
        })
    }

    /// Returns the return descriptor
    #[must_use]
    pub const fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Checks a returned value, reporting failures through `policy`
    ///
    /// # Errors
    /// Returns [`ContractViolation`] when the value fails and the policy raises.
    pub fn check(&self, value: &Value, policy: &TypecheckPolicy) -> Result<(), ContractViolation> {
        if self.descriptor.matches(value) {
            return Ok(());
        }
        let (category, message) = if value.is_null() {
            let message = "non-void function didn't return a value".to_string();
            (ViolationCategory::MissingReturn, message)
        } else if self.descriptor.is_void() {
            (ViolationCategory::UnexpectedReturn, "void function returned a value".to_string())
        } else {
            (
                ViolationCategory::Return,
                format!(
                    "function returned value {value} not matching signature {}",
                    self.descriptor
                ),
            )
        };
        policy.report(category, &self.function, message, &self.site)
    }
}
