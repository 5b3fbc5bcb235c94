// crates/typesig-contract/src/binder.rs
// ============================================================================
// Module: Argument Binder
// Description: Maps call arguments onto a function's named parameters.
// Purpose: Provide lenient binding for contract checks and strict binding for calls.
// Dependencies: crate::function, typesig, thiserror
// ============================================================================

//! ## Overview
//! [`bind`] is what a contract wrapper sees: positional arguments pair with
//! named parameters in declared order, keywords bind by name, and whatever is
//! left over is sorted into collector buckets without judging it.
//! [`BoundArguments::resolve`] is what a function body sees: every named
//! parameter has exactly one value once defaults are applied, or the call fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use typesig::Value;

use crate::function::CallArgs;
use crate::function::FunctionSignature;

// ============================================================================
// SECTION: Lenient Binding
// ============================================================================

/// How an argument reached its parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentSource {
    /// Passed by position
    Positional,
    /// Passed by keyword
    Keyword,
}

/// Argument bound to a named parameter
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgument<'a> {
    /// Parameter name.
    pub name: &'a str,
    /// Argument value.
    pub value: &'a Value,
    /// How the argument was passed.
    pub source: ArgumentSource,
}

/// Result of lenient binding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binding<'a> {
    /// Arguments that reached a named parameter, positional ones first.
    pub named: Vec<BoundArgument<'a>>,
    /// Surplus positional arguments.
    pub extra_positional: Vec<&'a Value>,
    /// Keywords taken by the keyword collector.
    pub extra_keyword: Vec<(&'a str, &'a Value)>,
    /// Keywords naming no parameter on a function without a keyword collector.
    pub unknown_keywords: Vec<(&'a str, &'a Value)>,
}

/// Binds arguments to parameters without rejecting anything
#[must_use]
pub fn bind<'a>(signature: &'a FunctionSignature, args: &'a CallArgs) -> Binding<'a> {
    let mut binding = Binding::default();

    let mut positional = args.positional.iter();
    for (param, value) in signature.params.iter().zip(positional.by_ref()) {
        binding.named.push(BoundArgument {
            name: &param.name,
            value,
            source: ArgumentSource::Positional,
        });
    }
    binding.extra_positional.extend(positional);

    for (name, value) in &args.keyword {
        if let Some(param) = signature.parameter(name) {
            binding.named.push(BoundArgument {
                name: &param.name,
                value,
                source: ArgumentSource::Keyword,
            });
        } else if signature.variadic_keyword.is_some() {
            binding.extra_keyword.push((name, value));
        } else {
            binding.unknown_keywords.push((name, value));
        }
    }

    binding
}

// ============================================================================
// SECTION: Strict Binding
// ============================================================================

/// Errors raised while binding a call strictly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A required parameter received no value
    #[error("{function}() missing required argument '{parameter}'")]
    Missing {
        /// Function being called
        function: String,
        /// Parameter without a value
        parameter: String,
    },

    /// More positional arguments than parameters and no collector
    #[error("{function}() takes {expected} positional arguments but {found} were given")]
    Surplus {
        /// Function being called
        function: String,
        /// Named parameter count
        expected: usize,
        /// Positional arguments supplied
        found: usize,
    },

    /// A parameter received a value by position and by keyword
    #[error("{function}() got multiple values for argument '{parameter}'")]
    Duplicate {
        /// Function being called
        function: String,
        /// Parameter bound twice
        parameter: String,
    },

    /// A keyword named no parameter and there is no collector
    #[error("{function}() got an unexpected keyword argument '{keyword}'")]
    UnexpectedKeyword {
        /// Function being called
        function: String,
        /// Offending keyword
        keyword: String,
    },
}

/// Arguments bound strictly to a function's parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    /// Function name, kept for diagnostics.
    function: String,
    /// One value per named parameter, in declared order.
    values: Vec<(String, Value)>,
    /// Surplus positional arguments.
    variadic: Vec<Value>,
    /// Keywords taken by the keyword collector.
    keywords: Vec<(String, Value)>,
}

impl BoundArguments {
    /// Binds `args` to `signature`, filling defaults
    ///
    /// # Errors
    /// Returns [`BindError`] when a required argument is missing, a parameter
    /// is bound twice, or surplus arguments have no collector.
    pub fn resolve(signature: &FunctionSignature, args: CallArgs) -> Result<Self, BindError> {
        let function = signature.name.clone();
        let expected = signature.params.len();
        let found = args.positional.len();
        if found > expected && signature.variadic_positional.is_none() {
            return Err(BindError::Surplus {
                function,
                expected,
                found,
            });
        }

        let mut slots: Vec<Option<Value>> = vec![None; expected];
        let mut positional = args.positional.into_iter();
        for (slot, value) in slots.iter_mut().zip(positional.by_ref()) {
            *slot = Some(value);
        }
        let variadic: Vec<Value> = positional.collect();

        let mut keywords = Vec::new();
        for (name, value) in args.keyword {
            match signature.params.iter().position(|param| param.name == name) {
                Some(idx) => match slots.get_mut(idx) {
                    Some(slot) if slot.is_none() => *slot = Some(value),
                    _ => {
                        return Err(BindError::Duplicate {
                            function,
                            parameter: name,
                        });
                    }
                },
                None if signature.variadic_keyword.is_some() => keywords.push((name, value)),
                None => {
                    return Err(BindError::UnexpectedKeyword {
                        function,
                        keyword: name,
                    });
                }
            }
        }

        let mut values = Vec::with_capacity(expected);
        for (param, slot) in signature.params.iter().zip(slots) {
            let Some(value) = slot.or_else(|| param.default.clone()) else {
                return Err(BindError::Missing {
                    function,
                    parameter: param.name.clone(),
                });
            };
            values.push((param.name.clone(), value));
        }

        Ok(Self {
            function,
            values,
            variadic,
            keywords,
        })
    }

    /// Looks up a named parameter's value
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(param, _)| param == name).map(|(_, value)| value)
    }

    /// Looks up a named parameter's value, failing when absent
    ///
    /// # Errors
    /// Returns [`BindError::Missing`] when the function has no such parameter.
    pub fn value(&self, name: &str) -> Result<&Value, BindError> {
        self.get(name).ok_or_else(|| BindError::Missing {
            function: self.function.clone(),
            parameter: name.to_string(),
        })
    }

    /// Named parameter values in declared order
    #[must_use]
    pub fn values(&self) -> &[(String, Value)] {
        &self.values
    }

    /// Surplus positional arguments
    #[must_use]
    pub fn variadic(&self) -> &[Value] {
        &self.variadic
    }

    /// Keywords taken by the keyword collector
    #[must_use]
    pub fn keywords(&self) -> &[(String, Value)] {
        &self.keywords
    }
}
