// crates/typesig/src/render.rs
// ============================================================================
// Module: Descriptor Renderer
// Description: Human-readable text for descriptors in diagnostics.
// Purpose: Render descriptors in the literal notation contracts are written in.
// Dependencies: crate::descriptor, std::fmt
// ============================================================================

//! ## Overview
//! Rendering mirrors the literal notation: `[int]`, `(int, bool)`,
//! `{str:int}`, `{int}`, `iterable`, and `Union(int, null)`.

use std::fmt;

use crate::descriptor::TypeDescriptor;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a descriptor for diagnostics
#[must_use]
pub fn render(descriptor: &TypeDescriptor) -> String {
    descriptor.to_string()
}

/// Writes members separated by `", "`.
fn write_members(f: &mut fmt::Formatter<'_>, members: &[Box<TypeDescriptor>]) -> fmt::Result {
    for (idx, member) in members.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{member}")?;
    }
    Ok(())
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(ty) => f.write_str(ty.name()),
            Self::ListOf(inner) => write!(f, "[{inner}]"),
            Self::TupleOf(items) => {
                f.write_str("(")?;
                write_members(f, items)?;
                f.write_str(")")
            }
            Self::MapOf(key, value) => write!(f, "{{{key}:{value}}}"),
            Self::SetOf(inner) => write!(f, "{{{inner}}}"),
            Self::AnyIterable => f.write_str("iterable"),
            Self::Union(members) => {
                f.write_str("Union(")?;
                write_members(f, members)?;
                f.write_str(")")
            }
        }
    }
}
