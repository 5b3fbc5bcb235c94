// crates/typesig/src/types.rs
// ============================================================================
// Module: Primitive Types
// Description: Concrete runtime types, class definitions, and name resolution.
// Purpose: Provide the leaves of the descriptor algebra and their subtyping.
// Dependencies: std::collections::BTreeMap, std::sync::Arc
// ============================================================================

//! ## Overview
//! A [`PrimitiveType`] is the leaf of every descriptor. Builtin kinds cover the
//! dynamic value model; [`ClassDef`] adds user-defined nominal types with
//! single or multiple inheritance. [`TypeRegistry`] resolves the type names used
//! by authored signatures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

// ============================================================================
// SECTION: Class Definitions
// ============================================================================

/// Shared handle to a class definition
pub type ClassRef = Arc<ClassDef>;

/// User-defined nominal type
///
/// Classes are identified by module path and name alone, so two independently
/// built definitions of the same class compare equal even when their bases or
/// iteration capability differ.
///
/// # Invariants
/// - `bases` never contains a cycle; classes are immutable once built.
#[derive(Debug, Clone)]
pub struct ClassDef {
    /// Module path the class is declared in.
    module: String,
    /// Class name.
    name: String,
    /// Direct base classes.
    bases: Vec<ClassRef>,
    /// Whether instances expose the iteration capability.
    iterable: bool,
}

impl ClassDef {
    /// Starts a class definition in the given module
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            bases: Vec::new(),
            iterable: false,
        }
    }

    /// Adds a direct base class
    #[must_use]
    pub fn with_base(mut self, base: &ClassRef) -> Self {
        self.bases.push(Arc::clone(base));
        self
    }

    /// Marks instances of this class as iterable
    #[must_use]
    pub const fn with_iteration(mut self) -> Self {
        self.iterable = true;
        self
    }

    /// Finishes the definition
    #[must_use]
    pub fn build(self) -> ClassRef {
        Arc::new(self)
    }

    /// Returns the class name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the module path
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Returns the `module::Name` form used by registries
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }

    /// Returns the direct base classes
    #[must_use]
    pub fn bases(&self) -> &[ClassRef] {
        &self.bases
    }

    /// Returns true when `self` is `other` or inherits from it
    #[must_use]
    pub fn is_subclass_of(&self, other: &Self) -> bool {
        self == other || self.bases.iter().any(|base| base.is_subclass_of(other))
    }

    /// Returns true when instances support iteration, directly or through a base
    #[must_use]
    pub fn is_iterable(&self) -> bool {
        self.iterable || self.bases.iter().any(|base| base.is_iterable())
    }
}

impl PartialEq for ClassDef {
    fn eq(&self, other: &Self) -> bool {
        self.module == other.module && self.name == other.name
    }
}

impl Eq for ClassDef {}

impl Hash for ClassDef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.module.hash(state);
        self.name.hash(state);
    }
}

// ============================================================================
// SECTION: Primitive Types
// ============================================================================

/// Concrete runtime type used as a descriptor leaf
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Root of the hierarchy; every value is an instance
    Any,
    /// Type of the null value
    Null,
    /// Booleans (a subtype of `Int`)
    Bool,
    /// Signed integers
    Int,
    /// Floating point numbers
    Float,
    /// Text strings
    Str,
    /// Byte strings
    Bytes,
    /// Lists of any element type
    List,
    /// Tuples of any arity
    Tuple,
    /// Maps of any key and value type
    Map,
    /// Sets of any element type
    Set,
    /// Lazy single-pass iterators
    Iterator,
    /// Class objects themselves
    Type,
    /// Function references
    Callable,
    /// User-defined class
    Class(ClassRef),
}

impl PrimitiveType {
    /// Builtin types paired with their registry names
    pub const BUILTINS: [(&'static str, Self); 14] = [
        ("any", Self::Any),
        ("null", Self::Null),
        ("bool", Self::Bool),
        ("int", Self::Int),
        ("float", Self::Float),
        ("str", Self::Str),
        ("bytes", Self::Bytes),
        ("list", Self::List),
        ("tuple", Self::Tuple),
        ("map", Self::Map),
        ("set", Self::Set),
        ("iterator", Self::Iterator),
        ("type", Self::Type),
        ("callable", Self::Callable),
    ];

    /// Returns the display name of the type
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Any => "any",
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bytes => "bytes",
            Self::List => "list",
            Self::Tuple => "tuple",
            Self::Map => "map",
            Self::Set => "set",
            Self::Iterator => "iterator",
            Self::Type => "type",
            Self::Callable => "callable",
            Self::Class(class) => class.name(),
        }
    }

    /// Returns true when every instance of `self` is also an instance of `other`
    #[must_use]
    pub fn is_subtype_of(&self, other: &Self) -> bool {
        match (self, other) {
            (_, Self::Any) | (Self::Bool, Self::Int) => true,
            (Self::Class(own), Self::Class(base)) => own.is_subclass_of(base),
            _ => self == other,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ClassRef> for PrimitiveType {
    fn from(class: ClassRef) -> Self {
        Self::Class(class)
    }
}

// ============================================================================
// SECTION: Type Registry
// ============================================================================

/// Name-to-type table used to resolve authored signatures
///
/// # Invariants
/// - Builtin names are never shadowed by class registrations.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    /// Registered names.
    types: BTreeMap<String, PrimitiveType>,
}

impl TypeRegistry {
    /// Creates a registry holding the builtin types only
    #[must_use]
    pub fn new() -> Self {
        let types = PrimitiveType::BUILTINS
            .iter()
            .map(|(name, ty)| ((*name).to_string(), ty.clone()))
            .collect();
        Self {
            types,
        }
    }

    /// Registers a class under its qualified name and, when free, its bare name
    pub fn register_class(&mut self, class: &ClassRef) {
        let ty = PrimitiveType::Class(Arc::clone(class));
        let bare = class.name().to_string();
        let is_builtin = PrimitiveType::BUILTINS.iter().any(|(name, _)| *name == bare);
        if !is_builtin {
            self.types.insert(bare, ty.clone());
        }
        self.types.insert(class.qualified_name(), ty);
    }

    /// Builder-style variant of [`Self::register_class`]
    #[must_use]
    pub fn with_class(mut self, class: &ClassRef) -> Self {
        self.register_class(class);
        self
    }

    /// Resolves a type name
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&PrimitiveType> {
        self.types.get(name)
    }

    /// Returns the name authored signatures use for the type
    #[must_use]
    pub fn name_of(ty: &PrimitiveType) -> String {
        match ty {
            PrimitiveType::Class(class) => class.qualified_name(),
            other => other.name().to_string(),
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
