// crates/typesig/src/signature.rs
// ============================================================================
// Module: Authored Signatures
// Description: Untyped signature form and its top-down validity check.
// Purpose: Turn hand-written or deserialized signatures into descriptors.
// Dependencies: crate::{descriptor, error, types}, serde
// ============================================================================

//! ## Overview
//! A [`Signature`] is the literal form contracts are written in: a type name,
//! a list or set holding one element signature, a map holding one key/value
//! pair, a tuple, a union, or a nullable wrapper. Unlike [`TypeDescriptor`]
//! it can be malformed, so [`Signature::compile`] checks it top-down and fails
//! the whole signature on the first bad node.
//! Security posture: deserialized signatures are untrusted; the depth limit
//! bounds recursion before any descriptor is built.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use crate::descriptor::TypeDescriptor;
use crate::error::SignatureError;
use crate::error::SignatureResult;
use crate::types::TypeRegistry;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum nesting depth accepted by [`Signature::compile`].
pub const DEFAULT_MAX_DEPTH: usize = 32;

// ============================================================================
// SECTION: Signature Definition
// ============================================================================

/// Authored signature prior to validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signature {
    /// Named primitive type, resolved through a [`TypeRegistry`]
    Type(String),
    /// List signature; valid with exactly one element signature
    List(Vec<Self>),
    /// Tuple signature; valid with one or more element signatures
    Tuple(Vec<Self>),
    /// Map signature; valid with exactly one key/value pair
    Map(Vec<(Self, Self)>),
    /// Set signature; valid with exactly one element signature
    Set(Vec<Self>),
    /// Any iterable value
    Iterable,
    /// Union; valid with two or more members
    Union(Vec<Self>),
    /// Null or the inner signature
    Nullable(Box<Self>),
}

impl Signature {
    /// Named type signature
    pub fn ty(name: impl Into<String>) -> Self {
        Self::Type(name.into())
    }

    /// Validates the signature and builds its descriptor
    ///
    /// # Errors
    /// Returns [`SignatureError`] for the first malformed node, an unknown type
    /// name, or nesting beyond [`DEFAULT_MAX_DEPTH`].
    pub fn compile(&self, registry: &TypeRegistry) -> SignatureResult<TypeDescriptor> {
        self.compile_with_limit(registry, DEFAULT_MAX_DEPTH)
    }

    /// Validates the signature against an explicit depth limit
    ///
    /// # Errors
    /// Returns [`SignatureError`] for the first malformed node.
    pub fn compile_with_limit(
        &self,
        registry: &TypeRegistry,
        max_depth: usize,
    ) -> SignatureResult<TypeDescriptor> {
        self.compile_at(registry, 1, max_depth)
    }

    /// Recursive validation step.
    fn compile_at(
        &self,
        registry: &TypeRegistry,
        depth: usize,
        max_depth: usize,
    ) -> SignatureResult<TypeDescriptor> {
        if depth > max_depth {
            return Err(SignatureError::TooDeep {
                max_depth,
                actual_depth: depth,
            });
        }
        let child = |sig: &Self| sig.compile_at(registry, depth + 1, max_depth);

        match self {
            Self::Type(name) => registry
                .resolve(name)
                .cloned()
                .map(TypeDescriptor::Primitive)
                .ok_or_else(|| SignatureError::UnknownType(name.clone())),
            Self::List(items) => match items.as_slice() {
                [inner] => Ok(TypeDescriptor::list_of(child(inner)?)),
                _ => Err(SignatureError::ListArity {
                    found: items.len(),
                }),
            },
            Self::Set(items) => match items.as_slice() {
                [inner] => Ok(TypeDescriptor::set_of(child(inner)?)),
                _ => Err(SignatureError::SetArity {
                    found: items.len(),
                }),
            },
            Self::Map(pairs) => match pairs.as_slice() {
                [(key, value)] => Ok(TypeDescriptor::map_of(child(key)?, child(value)?)),
                _ => Err(SignatureError::MapArity {
                    found: pairs.len(),
                }),
            },
            Self::Tuple(items) => {
                if items.is_empty() {
                    return Err(SignatureError::EmptyTuple);
                }
                let slots = items
                    .iter()
                    .map(|item| child(item).map(Box::new))
                    .collect::<SignatureResult<SmallVec<[Box<TypeDescriptor>; 4]>>>()?;
                Ok(TypeDescriptor::TupleOf(slots))
            }
            Self::Iterable => Ok(TypeDescriptor::AnyIterable),
            Self::Union(members) => {
                if members.len() < 2 {
                    return Err(SignatureError::UnionArity {
                        found: members.len(),
                    });
                }
                let members = members
                    .iter()
                    .map(|member| child(member).map(Box::new))
                    .collect::<SignatureResult<SmallVec<[Box<TypeDescriptor>; 4]>>>()?;
                Ok(TypeDescriptor::Union(members))
            }
            Self::Nullable(inner) => Ok(TypeDescriptor::nullable(child(inner)?)),
        }
    }
}

// ============================================================================
// SECTION: Conversions
// ============================================================================

impl From<&TypeDescriptor> for Signature {
    fn from(descriptor: &TypeDescriptor) -> Self {
        match descriptor {
            TypeDescriptor::Primitive(ty) => Self::Type(TypeRegistry::name_of(ty)),
            TypeDescriptor::ListOf(inner) => Self::List(vec![Self::from(inner.as_ref())]),
            TypeDescriptor::SetOf(inner) => Self::Set(vec![Self::from(inner.as_ref())]),
            TypeDescriptor::MapOf(key, value) => {
                Self::Map(vec![(Self::from(key.as_ref()), Self::from(value.as_ref()))])
            }
            TypeDescriptor::TupleOf(items) => {
                Self::Tuple(items.iter().map(|item| Self::from(item.as_ref())).collect())
            }
            TypeDescriptor::AnyIterable => Self::Iterable,
            TypeDescriptor::Union(members) => {
                Self::Union(members.iter().map(|member| Self::from(member.as_ref())).collect())
            }
        }
    }
}
