// crates/typesig/src/matcher.rs
// ============================================================================
// Module: Structural Matcher
// Description: Decides whether a runtime value conforms to a descriptor.
// Purpose: Implement the per-variant semantics with short-circuit evaluation.
// Dependencies: crate::{descriptor, value}
// ============================================================================

//! ## Overview
//! [`matches`] is pure and total: it never panics, never allocates beyond the
//! recursion itself, and never advances iterators. Recursion depth follows the
//! descriptor, not the data; each container is walked once.

use crate::descriptor::TypeDescriptor;
use crate::value::SupportsIteration;
use crate::value::Value;

// ============================================================================
// SECTION: Matching
// ============================================================================

/// Returns true when `value` conforms to `descriptor`
///
/// Test doubles conform to every descriptor. Container descriptors only match
/// their own container kind, so a tuple never satisfies a list descriptor.
#[must_use]
pub fn matches(value: &Value, descriptor: &TypeDescriptor) -> bool {
    if matches!(value, Value::Double(_)) {
        return true;
    }

    match descriptor {
        TypeDescriptor::Primitive(ty) => value.runtime_type().is_subtype_of(ty),

        TypeDescriptor::ListOf(inner) => match value {
            Value::List(items) => items.iter().all(|item| matches(item, inner)),
            _ => false,
        },

        TypeDescriptor::TupleOf(slots) => match value {
            Value::Tuple(items) if items.len() == slots.len() => {
                items.iter().zip(slots).all(|(item, slot)| matches(item, slot))
            }
            _ => false,
        },

        TypeDescriptor::MapOf(key_desc, value_desc) => match value {
            Value::Map(entries) => entries
                .iter()
                .all(|(key, item)| matches(key, key_desc) && matches(item, value_desc)),
            _ => false,
        },

        TypeDescriptor::SetOf(inner) => match value {
            Value::Set(items) => items.iter().all(|item| matches(item, inner)),
            _ => false,
        },

        TypeDescriptor::AnyIterable => value.supports_iteration(),

        TypeDescriptor::Union(members) => members.iter().any(|member| matches(value, member)),
    }
}
