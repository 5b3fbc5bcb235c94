// crates/typesig/src/descriptor.rs
// ============================================================================
// Module: Type Descriptors
// Description: Closed recursive algebra of acceptable value shapes.
// Purpose: Define `TypeDescriptor`, its combinators, and its arity invariants.
// Dependencies: crate::{error, matcher, types, value}, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! A [`TypeDescriptor`] describes the shape a runtime value must have: a
//! primitive type, a homogeneous container, a fixed-arity tuple, any iterable,
//! or a union of alternatives. Nullability is sugar for a union with `null`.
//! Descriptors are immutable and compared structurally.

// ============================================================================
// SECTION: Imports
// ============================================================================

use smallvec::SmallVec;

use crate::error::SignatureError;
use crate::error::SignatureResult;
use crate::matcher;
use crate::types::ClassRef;
use crate::types::PrimitiveType;
use crate::value::Value;

// ============================================================================
// SECTION: Descriptor Definition
// ============================================================================

/// Recursive structural type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// Value's runtime type is the given type or a subtype of it
    Primitive(PrimitiveType),

    /// List whose every element matches the inner descriptor
    ///
    /// The empty list always matches.
    ListOf(Box<Self>),

    /// Tuple of exactly this arity, matched positionally
    TupleOf(SmallVec<[Box<Self>; 4]>),

    /// Map whose every key matches the first and every value the second descriptor
    ///
    /// The empty map always matches.
    MapOf(Box<Self>, Box<Self>),

    /// Set whose every element matches the inner descriptor
    ///
    /// The empty set always matches.
    SetOf(Box<Self>),

    /// Any value exposing the iteration capability
    AnyIterable,

    /// Matches when any member matches
    Union(SmallVec<[Box<Self>; 4]>),
}

// ============================================================================
// SECTION: Constructor Helpers
// ============================================================================

impl TypeDescriptor {
    /// Descriptor matching a primitive type and its subtypes
    #[must_use]
    pub const fn primitive(ty: PrimitiveType) -> Self {
        Self::Primitive(ty)
    }

    /// Descriptor matching every value
    #[must_use]
    pub const fn any() -> Self {
        Self::Primitive(PrimitiveType::Any)
    }

    /// Descriptor matching only the null value
    #[must_use]
    pub const fn null() -> Self {
        Self::Primitive(PrimitiveType::Null)
    }

    /// Descriptor matching instances of a class or its subclasses
    #[must_use]
    pub fn class(class: &ClassRef) -> Self {
        Self::Primitive(PrimitiveType::Class(ClassRef::clone(class)))
    }

    /// Descriptor matching any iterable value
    #[must_use]
    pub const fn iterable() -> Self {
        Self::AnyIterable
    }

    /// Homogeneous list descriptor
    #[must_use]
    pub fn list_of(inner: Self) -> Self {
        Self::ListOf(Box::new(inner))
    }

    /// Homogeneous set descriptor
    #[must_use]
    pub fn set_of(inner: Self) -> Self {
        Self::SetOf(Box::new(inner))
    }

    /// Map descriptor with one key and one value descriptor
    #[must_use]
    pub fn map_of(key: Self, value: Self) -> Self {
        Self::MapOf(Box::new(key), Box::new(value))
    }

    /// Fixed-arity tuple descriptor
    ///
    /// # Errors
    /// Returns [`SignatureError::EmptyTuple`] when no element is given.
    pub fn tuple_of<I>(items: I) -> SignatureResult<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let items: SmallVec<[Box<Self>; 4]> = items.into_iter().map(Box::new).collect();
        if items.is_empty() {
            return Err(SignatureError::EmptyTuple);
        }
        Ok(Self::TupleOf(items))
    }

    /// Union of two or more alternatives
    ///
    /// # Errors
    /// Returns [`SignatureError::UnionArity`] when fewer than two members are given.
    pub fn union<I>(members: I) -> SignatureResult<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let members: SmallVec<[Box<Self>; 4]> = members.into_iter().map(Box::new).collect();
        if members.len() < 2 {
            return Err(SignatureError::UnionArity {
                found: members.len(),
            });
        }
        Ok(Self::Union(members))
    }

    /// Union of exactly two alternatives
    #[must_use]
    pub fn either(first: Self, second: Self) -> Self {
        let mut members = SmallVec::new();
        members.push(Box::new(first));
        members.push(Box::new(second));
        Self::Union(members)
    }

    /// Matches null or anything `inner` matches
    #[must_use]
    pub fn nullable(inner: Self) -> Self {
        Self::either(inner, Self::null())
    }

    /// Tuple constructor for callers that already guarantee a non-empty arity
    #[doc(hidden)]
    #[must_use]
    pub fn __tuple(items: Vec<Self>) -> Self {
        Self::TupleOf(items.into_iter().map(Box::new).collect())
    }

    /// Union constructor for callers that already guarantee two or more members
    #[doc(hidden)]
    #[must_use]
    pub fn __union(members: Vec<Self>) -> Self {
        Self::Union(members.into_iter().map(Box::new).collect())
    }
}

// ============================================================================
// SECTION: Invariant Checks
// ============================================================================

impl TypeDescriptor {
    /// Checks the arity invariants a directly built descriptor may violate
    ///
    /// Tuples need at least one element and unions at least two members; the
    /// check walks the whole tree and fails on the first malformed node.
    ///
    /// # Errors
    /// Returns [`SignatureError`] describing the first malformed node.
    pub fn validate(&self) -> SignatureResult {
        match self {
            Self::Primitive(_) | Self::AnyIterable => Ok(()),
            Self::ListOf(inner) | Self::SetOf(inner) => inner.validate(),
            Self::MapOf(key, value) => {
                key.validate()?;
                value.validate()
            }
            Self::TupleOf(items) => {
                if items.is_empty() {
                    return Err(SignatureError::EmptyTuple);
                }
                items.iter().try_for_each(|item| item.validate())
            }
            Self::Union(members) => {
                if members.len() < 2 {
                    return Err(SignatureError::UnionArity {
                        found: members.len(),
                    });
                }
                members.iter().try_for_each(|member| member.validate())
            }
        }
    }

    /// Returns the nesting depth of the descriptor (a leaf has depth 1)
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Primitive(_) | Self::AnyIterable => 1,
            Self::ListOf(inner) | Self::SetOf(inner) => 1 + inner.depth(),
            Self::MapOf(key, value) => 1 + key.depth().max(value.depth()),
            Self::TupleOf(items) | Self::Union(items) => {
                1 + items.iter().map(|item| item.depth()).max().unwrap_or(0)
            }
        }
    }

    /// Returns true for the void descriptor (`null` only)
    #[must_use]
    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Primitive(PrimitiveType::Null))
    }

    /// Returns true when the null value conforms to the descriptor
    #[must_use]
    pub fn accepts_null(&self) -> bool {
        self.matches(&Value::Null)
    }

    /// Returns true when the value conforms to the descriptor
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        matcher::matches(value, self)
    }
}

impl From<PrimitiveType> for TypeDescriptor {
    fn from(ty: PrimitiveType) -> Self {
        Self::Primitive(ty)
    }
}

impl From<ClassRef> for TypeDescriptor {
    fn from(class: ClassRef) -> Self {
        Self::Primitive(PrimitiveType::Class(class))
    }
}
