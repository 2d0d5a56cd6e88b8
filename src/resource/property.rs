//! The declarative property model.
//!
//! [`PropertyValue`] is the closed set of shapes a resource property can take
//! once captured out of a live object. [`PropertyMap`] keys are kept in a
//! `BTreeMap` so iteration and serialization are canonically ordered:
//! repeated captures of logically identical state produce byte-identical
//! output, which the diffing layer depends on.
//!
//! Two variants carry partial information. `Computed` means "unknowable until
//! some future resolution"; `Output` means "will resolve to exactly this one
//! resource's own result". Both wrap a zero-value placeholder that conveys
//! the intended shape and nothing else, and both serialize as a discriminant
//! plus an element-kind marker, never as a resolved leaf value.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// A property name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyKey(String);

impl PropertyKey {
    /// Returns the key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PropertyKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered mapping from property names to values.
///
/// `BTreeMap` gives lexicographic key order regardless of insertion order.
pub type PropertyMap = BTreeMap<PropertyKey, PropertyValue>;

/// The shape of a property value, used as the inner marker on unresolved
/// `Computed`/`Output` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// The null shape.
    Null,
    /// A boolean.
    Bool,
    /// A double-precision number.
    Number,
    /// A string.
    String,
    /// An ordered sequence.
    Array,
    /// A nested property map.
    Object,
}

impl ElementKind {
    /// Returns the zero value of this shape.
    ///
    /// Used as the placeholder inside unresolved values; it carries no
    /// meaningful data.
    #[must_use]
    pub fn zero_value(self) -> PropertyValue {
        match self {
            Self::Null => PropertyValue::Null,
            Self::Bool => PropertyValue::Bool(false),
            Self::Number => PropertyValue::Number(0.0),
            Self::String => PropertyValue::String(String::new()),
            Self::Array => PropertyValue::Array(Vec::new()),
            Self::Object => PropertyValue::Object(PropertyMap::new()),
        }
    }
}

/// A single captured property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// The null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A double-precision number.
    Number(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<PropertyValue>),
    /// A nested property map.
    Object(PropertyMap),
    /// A value not yet knowable, pending some future resolution. The wrapped
    /// placeholder conveys the intended shape only.
    Computed(Box<PropertyValue>),
    /// A value known to derive from exactly one resource's own eventual
    /// result. The wrapped placeholder conveys the intended shape only.
    Output(Box<PropertyValue>),
}

impl PropertyValue {
    /// Wraps a placeholder as a computed value.
    #[must_use]
    pub fn make_computed(placeholder: Self) -> Self {
        Self::Computed(Box::new(placeholder))
    }

    /// Wraps a placeholder as an output value.
    #[must_use]
    pub fn make_output(placeholder: Self) -> Self {
        Self::Output(Box::new(placeholder))
    }

    /// Returns true if this is the null value.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if this is a boolean.
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Returns true if this is a number.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Returns true if this is a string.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns true if this is an array.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns true if this is an object.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns true if this is an unresolved computed value.
    #[must_use]
    pub const fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    /// Returns true if this is an unresolved output value.
    #[must_use]
    pub const fn is_output(&self) -> bool {
        matches!(self, Self::Output(_))
    }

    /// Returns true if this value carries no unresolved placeholder.
    ///
    /// Fully-resolved snapshots meant for storage must contain only
    /// resolved values.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match self {
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => true,
            Self::Array(elems) => elems.iter().all(Self::is_resolved),
            Self::Object(map) => map.values().all(Self::is_resolved),
            Self::Computed(_) | Self::Output(_) => false,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the numeric value, if this is a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string value, if this is a string.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(elems) => Some(elems),
            _ => None,
        }
    }

    /// Returns the nested map, if this is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&PropertyMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the shape of this value.
    ///
    /// For unresolved values this is the shape of the wrapped placeholder.
    #[must_use]
    pub fn element_kind(&self) -> ElementKind {
        match self {
            Self::Null => ElementKind::Null,
            Self::Bool(_) => ElementKind::Bool,
            Self::Number(_) => ElementKind::Number,
            Self::String(_) => ElementKind::String,
            Self::Array(_) => ElementKind::Array,
            Self::Object(_) => ElementKind::Object,
            Self::Computed(inner) | Self::Output(inner) => inner.element_kind(),
        }
    }
}

/// Wire encoding, shared by serialize (borrowed) and deserialize (owned):
/// a `kind` discriminant with the payload under `value`. Unresolved variants
/// carry only an element-kind marker.
#[derive(Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
enum WireRef<'a> {
    Null,
    Bool(bool),
    Number(f64),
    String(&'a str),
    Array(&'a [PropertyValue]),
    Object(&'a PropertyMap),
    Computed {
        element: ElementKind,
    },
    Output {
        element: ElementKind,
    },
}

#[derive(Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
enum Wire {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<PropertyValue>),
    Object(PropertyMap),
    Computed {
        element: ElementKind,
    },
    Output {
        element: ElementKind,
    },
}

impl Serialize for PropertyValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Self::Null => WireRef::Null,
            Self::Bool(b) => WireRef::Bool(*b),
            Self::Number(n) => WireRef::Number(*n),
            Self::String(s) => WireRef::String(s),
            Self::Array(elems) => WireRef::Array(elems),
            Self::Object(map) => WireRef::Object(map),
            Self::Computed(inner) => WireRef::Computed {
                element: inner.element_kind(),
            },
            Self::Output(inner) => WireRef::Output {
                element: inner.element_kind(),
            },
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = Wire::deserialize(deserializer)?;
        Ok(match wire {
            Wire::Null => Self::Null,
            Wire::Bool(b) => Self::Bool(b),
            Wire::Number(n) => Self::Number(n),
            Wire::String(s) => Self::String(s),
            Wire::Array(elems) => Self::Array(elems),
            Wire::Object(map) => Self::Object(map),
            Wire::Computed { element } => Self::make_computed(element.zero_value()),
            Wire::Output { element } => Self::make_output(element.zero_value()),
        })
    }
}
