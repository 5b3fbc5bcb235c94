// crates/typesig/src/lib.rs
// ============================================================================
// Module: Typesig Root
// Description: Public API surface for the descriptor algebra.
// Purpose: Wire together core modules, re-exports, and the `sig!` macro.
// Dependencies: crate::{builder, descriptor, error, matcher, render, serde_support, signature,
//              types, value}
// ============================================================================

//! ## Overview
//! `typesig` defines structural type descriptors, the dynamic values they are
//! matched against, the validity check for authored signatures, and the
//! renderer used in diagnostics. It holds no global state; enforcement at call
//! boundaries lives in `typesig-contract`.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod builder;
pub mod descriptor;
pub mod error;
pub mod matcher;
pub mod render;
pub mod serde_support;
pub mod signature;
pub mod types;
pub mod value;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::TupleBuilder;
pub use builder::UnionBuilder;
pub use descriptor::TypeDescriptor;
pub use error::SignatureError;
pub use error::SignatureResult;
pub use matcher::matches;
pub use render::render;
pub use serde_support::SerdeConfig;
pub use serde_support::SerdeError;
pub use serde_support::SignatureSerializer;
pub use signature::Signature;
pub use types::ClassDef;
pub use types::ClassRef;
pub use types::PrimitiveType;
pub use types::TypeRegistry;
pub use value::FunctionRef;
pub use value::Instance;
pub use value::IteratorHandle;
pub use value::SupportsIteration;
pub use value::TestDouble;
pub use value::Value;

// ============================================================================
// SECTION: Convenience Combinators
// ============================================================================

/// Convenience functions for creating descriptors without method paths
pub mod convenience {
    use super::ClassRef;
    use super::PrimitiveType;
    use super::SignatureResult;
    use super::TypeDescriptor;

    /// Union of two or more descriptors
    ///
    /// # Errors
    /// Returns an error when fewer than two members are supplied.
    pub fn union<I>(members: I) -> SignatureResult<TypeDescriptor>
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        TypeDescriptor::union(members)
    }

    /// Null or anything `inner` matches
    #[must_use]
    pub fn nullable(inner: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::nullable(inner)
    }

    /// Homogeneous list
    #[must_use]
    pub fn list_of(inner: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::list_of(inner)
    }

    /// Fixed-arity tuple
    ///
    /// # Errors
    /// Returns an error when no element is supplied.
    pub fn tuple_of<I>(items: I) -> SignatureResult<TypeDescriptor>
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        TypeDescriptor::tuple_of(items)
    }

    /// Map with one key and one value descriptor
    #[must_use]
    pub fn map_of(key: TypeDescriptor, value: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::map_of(key, value)
    }

    /// Homogeneous set
    #[must_use]
    pub fn set_of(inner: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::set_of(inner)
    }

    /// Any iterable value
    #[must_use]
    pub const fn iterable() -> TypeDescriptor {
        TypeDescriptor::iterable()
    }

    /// A primitive type
    #[must_use]
    pub const fn primitive(ty: PrimitiveType) -> TypeDescriptor {
        TypeDescriptor::primitive(ty)
    }

    /// Instances of a class or its subclasses
    #[must_use]
    pub fn class(class: &ClassRef) -> TypeDescriptor {
        TypeDescriptor::class(class)
    }
}

// ============================================================================
// SECTION: Signature Macro
// ============================================================================

/// Macro for writing descriptors in literal notation
///
/// Builtin names (`any`, `null`, `bool`, `int`, `float`, `str`, `bytes`,
/// `list`, `tuple`, `map`, `set`, `iterator`, `type`, `callable`) become
/// primitives, `iter` is any iterable, `[d]` a list, `{k: v}` a map, `{d}` a
/// set, `(a, b)` a tuple and `a | b` a union (parenthesize unions nested in
/// containers). Any other identifier is taken as a variable holding a
/// [`TypeDescriptor`], which is how class descriptors are spliced in:
///
/// ```
/// use typesig::sig;
///
/// let point = typesig::TypeDescriptor::any();
/// let desc = sig!({str: ([int], (int | null), point)});
/// assert_eq!(desc.to_string(), "{str:([int], Union(int, null), any)}");
/// ```
#[macro_export]
macro_rules! sig {
    (any) => {
        $crate::descriptor::TypeDescriptor::any()
    };
    (null) => {
        $crate::descriptor::TypeDescriptor::null()
    };
    (bool) => {
        $crate::descriptor::TypeDescriptor::primitive($crate::types::PrimitiveType::Bool)
    };
    (int) => {
        $crate::descriptor::TypeDescriptor::primitive($crate::types::PrimitiveType::Int)
    };
    (float) => {
        $crate::descriptor::TypeDescriptor::primitive($crate::types::PrimitiveType::Float)
    };
    (str) => {
        $crate::descriptor::TypeDescriptor::primitive($crate::types::PrimitiveType::Str)
    };
    (bytes) => {
        $crate::descriptor::TypeDescriptor::primitive($crate::types::PrimitiveType::Bytes)
    };
    (list) => {
        $crate::descriptor::TypeDescriptor::primitive($crate::types::PrimitiveType::List)
    };
    (tuple) => {
        $crate::descriptor::TypeDescriptor::primitive($crate::types::PrimitiveType::Tuple)
    };
    (map) => {
        $crate::descriptor::TypeDescriptor::primitive($crate::types::PrimitiveType::Map)
    };
    (set) => {
        $crate::descriptor::TypeDescriptor::primitive($crate::types::PrimitiveType::Set)
    };
    (iterator) => {
        $crate::descriptor::TypeDescriptor::primitive($crate::types::PrimitiveType::Iterator)
    };
    (type) => {
        $crate::descriptor::TypeDescriptor::primitive($crate::types::PrimitiveType::Type)
    };
    (callable) => {
        $crate::descriptor::TypeDescriptor::primitive($crate::types::PrimitiveType::Callable)
    };
    (iter) => {
        $crate::descriptor::TypeDescriptor::iterable()
    };

    // Containers
    ([$inner:tt]) => {
        $crate::descriptor::TypeDescriptor::list_of($crate::sig!($inner))
    };
    ({$key:tt : $value:tt}) => {
        $crate::descriptor::TypeDescriptor::map_of($crate::sig!($key), $crate::sig!($value))
    };
    ({$inner:tt}) => {
        $crate::descriptor::TypeDescriptor::set_of($crate::sig!($inner))
    };

    // Parenthesized union, then tuple
    (($first:tt $(| $rest:tt)+)) => {
        $crate::sig!($first $(| $rest)+)
    };
    (($($item:tt),+ $(,)?)) => {
        $crate::descriptor::TypeDescriptor::__tuple(vec![$($crate::sig!($item)),+])
    };

    // Bare union
    ($first:tt $(| $rest:tt)+) => {
        $crate::descriptor::TypeDescriptor::__union(vec![
            $crate::sig!($first) $(, $crate::sig!($rest))+
        ])
    };

    // Descriptor held in a variable
    ($var:ident) => {
        $crate::descriptor::TypeDescriptor::clone(&$var)
    };
}
