// crates/typesig/src/value.rs
// ============================================================================
// Module: Runtime Values
// Description: Dynamic value model checked against type descriptors.
// Purpose: Represent arguments and return values crossing a contract boundary.
// Dependencies: crate::types, serde, serde_json
// ============================================================================

//! ## Overview
//! [`Value`] is the dynamic value every contract boundary sees. Containers keep
//! insertion order; maps keep unique keys and sets unique elements. Iterators
//! are shared single-pass handles that matching never advances.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use serde::Deserialize;
use serde::Serialize;

use crate::types::ClassRef;
use crate::types::PrimitiveType;

// ============================================================================
// SECTION: Iteration Capability
// ============================================================================

/// Capability of exposing a single-pass iteration protocol
///
/// The `iterable` descriptor tests this capability rather than a concrete
/// type, so eager containers, lazy iterators, and iterable class instances
/// are accepted uniformly.
pub trait SupportsIteration {
    /// Returns true when the value can be iterated
    fn supports_iteration(&self) -> bool;
}

// ============================================================================
// SECTION: Iterator Handles
// ============================================================================

/// Boxed iterator stored behind a handle.
type BoxedIter = Box<dyn Iterator<Item = Value> + Send>;

/// Shared single-pass iterator
///
/// Clones share the same underlying iterator; equality is identity.
#[derive(Clone)]
pub struct IteratorHandle {
    /// Shared iterator state.
    inner: Arc<Mutex<BoxedIter>>,
}

impl IteratorHandle {
    /// Wraps any sendable iterator of values
    pub fn new<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(iter.into_iter()))),
        }
    }

    /// Advances the iterator
    #[must_use]
    pub fn next_value(&self) -> Option<Value> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).next()
    }

    /// Drains the remaining items
    #[must_use]
    pub fn drain(&self) -> Vec<Value> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).by_ref().collect()
    }
}

impl fmt::Debug for IteratorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IteratorHandle")
    }
}

impl PartialEq for IteratorHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

// ============================================================================
// SECTION: References and Instances
// ============================================================================

/// Reference to a function by module path and name
///
/// This is the stable identity a contract wrapper preserves, so references
/// taken before wrapping keep resolving afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionRef {
    /// Module path of the function.
    pub module: String,
    /// Function name.
    pub name: String,
}

impl FunctionRef {
    /// Creates a function reference
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)
    }
}

/// Instance of a user-defined class
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// Class of the instance.
    class: ClassRef,
    /// Attribute values in insertion order.
    attributes: Vec<(String, Value)>,
}

impl Instance {
    /// Creates an instance with no attributes
    #[must_use]
    pub fn new(class: &ClassRef) -> Self {
        Self {
            class: Arc::clone(class),
            attributes: Vec::new(),
        }
    }

    /// Sets an attribute, replacing any previous value
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    /// Returns the class of the instance
    #[must_use]
    pub const fn class(&self) -> &ClassRef {
        &self.class
    }

    /// Looks up an attribute
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.iter().find(|(existing, _)| existing == name).map(|(_, value)| value)
    }
}

/// Stand-in value used by tests in place of a real argument
///
/// A double conforms to every descriptor so contracts stay out of the way when
/// collaborators are substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDouble {
    /// Label shown in diagnostics.
    pub label: String,
}

// ============================================================================
// SECTION: Value Definition
// ============================================================================

/// Dynamic runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null value
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text string
    Str(String),
    /// Byte string
    Bytes(Vec<u8>),
    /// Ordered sequence
    List(Vec<Self>),
    /// Fixed-arity ordered sequence
    Tuple(Vec<Self>),
    /// Key/value mapping, insertion ordered
    ///
    /// Building this variant directly keeps entries as given; use
    /// [`Value::map`] to keep keys unique.
    Map(Vec<(Self, Self)>),
    /// Collection of elements, insertion ordered
    ///
    /// Building this variant directly keeps elements as given; use
    /// [`Value::set`] to keep elements unique.
    Set(Vec<Self>),
    /// Lazy single-pass iterator
    Iterator(IteratorHandle),
    /// Class instance
    Object(Instance),
    /// Class object
    Class(ClassRef),
    /// Function reference
    Function(FunctionRef),
    /// Test double
    Double(TestDouble),
}

// ============================================================================
// SECTION: Constructors
// ============================================================================

impl Value {
    /// Builds a list
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds a tuple
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Builds a map; a repeated key replaces the earlier value
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Self>,
        V: Into<Self>,
    {
        let mut out: Vec<(Self, Self)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            match out.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }
        Self::Map(out)
    }

    /// Builds a set; duplicates are dropped
    pub fn set<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        let mut out: Vec<Self> = Vec::new();
        for item in items {
            let item = item.into();
            if !out.contains(&item) {
                out.push(item);
            }
        }
        Self::Set(out)
    }

    /// Builds a byte string
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    /// Wraps an iterator
    pub fn iterator<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Self>,
        I::IntoIter: Send + 'static,
    {
        Self::Iterator(IteratorHandle::new(iter))
    }

    /// Builds a bare instance of a class
    #[must_use]
    pub fn object(class: &ClassRef) -> Self {
        Self::Object(Instance::new(class))
    }

    /// Builds a test double
    pub fn double(label: impl Into<String>) -> Self {
        Self::Double(TestDouble {
            label: label.into(),
        })
    }

    /// Builds a function reference value
    pub fn function(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Function(FunctionRef::new(module, name))
    }
}

// ============================================================================
// SECTION: Accessors
// ============================================================================

impl Value {
    /// Returns true for the null value
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the integer payload
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the boolean payload
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float payload
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the elements of a list or tuple
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the concrete runtime type of the value
    ///
    /// Test doubles report `Any`; they conform to every descriptor anyway.
    #[must_use]
    pub fn runtime_type(&self) -> PrimitiveType {
        match self {
            Self::Null => PrimitiveType::Null,
            Self::Bool(_) => PrimitiveType::Bool,
            Self::Int(_) => PrimitiveType::Int,
            Self::Float(_) => PrimitiveType::Float,
            Self::Str(_) => PrimitiveType::Str,
            Self::Bytes(_) => PrimitiveType::Bytes,
            Self::List(_) => PrimitiveType::List,
            Self::Tuple(_) => PrimitiveType::Tuple,
            Self::Map(_) => PrimitiveType::Map,
            Self::Set(_) => PrimitiveType::Set,
            Self::Iterator(_) => PrimitiveType::Iterator,
            Self::Object(instance) => PrimitiveType::Class(Arc::clone(instance.class())),
            Self::Class(_) => PrimitiveType::Type,
            Self::Function(_) => PrimitiveType::Callable,
            Self::Double(_) => PrimitiveType::Any,
        }
    }
}

impl SupportsIteration for Value {
    fn supports_iteration(&self) -> bool {
        match self {
            Self::Str(_)
            | Self::Bytes(_)
            | Self::List(_)
            | Self::Tuple(_)
            | Self::Map(_)
            | Self::Set(_)
            | Self::Iterator(_)
            | Self::Double(_) => true,
            Self::Object(instance) => instance.class().is_iterable(),
            Self::Null
            | Self::Bool(_)
            | Self::Int(_)
            | Self::Float(_)
            | Self::Class(_)
            | Self::Function(_) => false,
        }
    }
}

// ============================================================================
// SECTION: Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Self::Object(instance)
    }
}

impl From<FunctionRef> for Value {
    fn from(reference: FunctionRef) -> Self {
        Self::Function(reference)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(flag) => Self::Bool(flag),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map_or_else(|| number.as_f64().map_or(Self::Null, Self::Float), Self::Int),
            serde_json::Value::String(text) => Self::Str(text),
            serde_json::Value::Array(items) => Self::list(items),
            serde_json::Value::Object(entries) => Self::map(entries),
        }
    }
}

// ============================================================================
// SECTION: Display
// ============================================================================

/// Writes items separated by `", "`.
fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{value:.1}")
            }
            Self::Float(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "\"{}\"", value.escape_debug()),
            Self::Bytes(value) => write!(f, "b\"{}\"", value.escape_ascii()),
            Self::List(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Self::Tuple(items) => {
                f.write_str("(")?;
                write_joined(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Set(items) if items.is_empty() => f.write_str("set()"),
            Self::Set(items) => {
                f.write_str("{")?;
                write_joined(f, items)?;
                f.write_str("}")
            }
            Self::Iterator(_) => f.write_str("<iterator>"),
            Self::Object(instance) => write!(f, "<{} instance>", instance.class().name()),
            Self::Class(class) => write!(f, "<class {}>", class.qualified_name()),
            Self::Function(reference) => write!(f, "<function {reference}>"),
            Self::Double(double) => write!(f, "<double {}>", double.label),
        }
    }
}
