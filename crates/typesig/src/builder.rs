// crates/typesig/src/builder.rs
// ============================================================================
// Module: Descriptor Builders
// Description: Fluent builders for variadic descriptor nodes.
// Purpose: Compose tuples and unions incrementally while keeping arity checks.
// Dependencies: crate::{descriptor, error}
// ============================================================================

//! ## Overview
//! Tuples and unions are the only descriptor nodes with variable arity. These
//! builders collect members with chained calls and enforce the same arity
//! invariants as [`TypeDescriptor::tuple_of`] and [`TypeDescriptor::union`]
//! when built.

use crate::descriptor::TypeDescriptor;
use crate::error::SignatureResult;

// ============================================================================
// SECTION: Tuple Builder
// ============================================================================

/// Builder for fixed-arity tuple descriptors
#[derive(Debug, Default)]
pub struct TupleBuilder {
    /// Element descriptors in positional order.
    items: Vec<TypeDescriptor>,
}

impl TupleBuilder {
    /// Creates an empty tuple builder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
        }
    }

    /// Appends the next positional element
    #[must_use]
    pub fn with(mut self, item: TypeDescriptor) -> Self {
        self.items.push(item);
        self
    }

    /// Appends several positional elements
    #[must_use]
    pub fn with_all<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        self.items.extend(items);
        self
    }

    /// Builds the tuple descriptor
    ///
    /// # Errors
    /// Returns [`crate::SignatureError::EmptyTuple`] when nothing was added.
    pub fn build(self) -> SignatureResult<TypeDescriptor> {
        TypeDescriptor::tuple_of(self.items)
    }
}

// ============================================================================
// SECTION: Union Builder
// ============================================================================

/// Builder for union descriptors
#[derive(Debug, Default)]
pub struct UnionBuilder {
    /// Alternatives collected so far.
    members: Vec<TypeDescriptor>,
}

impl UnionBuilder {
    /// Creates an empty union builder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Adds an alternative; structurally equal duplicates are skipped
    #[must_use]
    pub fn or(mut self, member: TypeDescriptor) -> Self {
        if !self.members.contains(&member) {
            self.members.push(member);
        }
        self
    }

    /// Adds the null alternative
    #[must_use]
    pub fn or_null(self) -> Self {
        self.or(TypeDescriptor::null())
    }

    /// Builds the union descriptor
    ///
    /// # Errors
    /// Returns [`crate::SignatureError::UnionArity`] with fewer than two distinct members.
    pub fn build(self) -> SignatureResult<TypeDescriptor> {
        TypeDescriptor::union(self.members)
    }
}
