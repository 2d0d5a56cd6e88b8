//! The live, evaluator-resident object model.
//!
//! A [`RuntimeObject`] is the mutable object an evaluator writes resource
//! properties into while the program runs. Handles are shared
//! (`Arc<RwLock<..>>`) because resource properties may reference other
//! resources' live objects, possibly cyclically; the capture engine flattens
//! those references so the persisted representation stays acyclic.
//!
//! Writers follow a single-writer-at-a-time discipline per resource; the
//! orchestration layer guarantees a live object is not mutated while it is
//! being captured or hydrated.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::property::{ElementKind, PropertyKey};
use super::urn::TypeToken;

/// The property under which a resource's provider-assigned ID lives.
pub const ID_PROPERTY: &str = "id";

/// A shared handle to a live object.
pub type ObjectRef = Arc<RwLock<RuntimeObject>>;

/// A live resource object: a type token plus mutable named properties.
#[derive(Debug)]
pub struct RuntimeObject {
    /// The resource type token.
    token: TypeToken,
    /// Live property values, keyed by name.
    properties: BTreeMap<PropertyKey, RuntimeValue>,
}

impl RuntimeObject {
    /// Creates an empty live object of the given resource type.
    #[must_use]
    pub const fn new(token: TypeToken) -> Self {
        Self {
            token,
            properties: BTreeMap::new(),
        }
    }

    /// Wraps this object in a shared handle.
    #[must_use]
    pub fn into_ref(self) -> ObjectRef {
        Arc::new(RwLock::new(self))
    }

    /// Returns the resource type token.
    #[must_use]
    pub const fn token(&self) -> &TypeToken {
        &self.token
    }

    /// Returns the named property, if present.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&RuntimeValue> {
        self.properties.get(key)
    }

    /// Sets a property, replacing any previous value.
    pub fn set_property(&mut self, key: impl Into<PropertyKey>, value: RuntimeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Returns all properties in canonical key order.
    #[must_use]
    pub const fn properties(&self) -> &BTreeMap<PropertyKey, RuntimeValue> {
        &self.properties
    }

    /// Returns mutable access to the properties.
    pub const fn properties_mut(&mut self) -> &mut BTreeMap<PropertyKey, RuntimeValue> {
        &mut self.properties
    }
}

/// A single live value as the evaluator sees it.
///
/// This is a superset of the declarative property model: it additionally
/// carries resource references, pending computations, and functions, all of
/// which the capture engine must translate or skip.
#[derive(Clone)]
pub enum RuntimeValue {
    /// The null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A double-precision number.
    Number(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<RuntimeValue>),
    /// An object literal, map, or class instance.
    Object(BTreeMap<PropertyKey, RuntimeValue>),
    /// A reference to another resource's live object.
    Resource(ObjectRef),
    /// A computation whose value is not yet known.
    Computed(ComputedValue),
    /// A function value; never serializable.
    Function(String),
}

impl RuntimeValue {
    /// Returns true if this is the null value.
    ///
    /// Hydration uses this to decide whether a destination slot may be
    /// overwritten.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if this is a string.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns true if this is a pending computation.
    #[must_use]
    pub const fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }
}

impl fmt::Debug for RuntimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Resource references may form cycles; never recurse through them.
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Number(n) => write!(f, "Number({n})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Array(elems) => f.debug_tuple("Array").field(elems).finish(),
            Self::Object(map) => f.debug_tuple("Object").field(map).finish(),
            Self::Resource(obj) => write!(f, "Resource({})", obj.read().token()),
            Self::Computed(c) => c.fmt(f),
            Self::Function(name) => write!(f, "Function({name})"),
        }
    }
}

/// A pending computation: the declared shape of its eventual value, the live
/// objects it depends on, and whether a free expression is involved.
#[derive(Clone)]
pub struct ComputedValue {
    /// The shape the value will have once resolved.
    pub element: ElementKind,
    /// Live objects this computation depends on.
    pub sources: Vec<ObjectRef>,
    /// True if the computation involves a free expression rather than a
    /// plain dependency on its sources.
    pub expr: bool,
}

impl ComputedValue {
    /// A computation that depends on exactly one source and no expression.
    #[must_use]
    pub fn from_source(element: ElementKind, source: &ObjectRef) -> Self {
        Self {
            element,
            sources: vec![Arc::clone(source)],
            expr: false,
        }
    }

    /// A computation over arbitrary sources with a free expression.
    #[must_use]
    pub const fn expression(element: ElementKind, sources: Vec<ObjectRef>) -> Self {
        Self {
            element,
            sources,
            expr: true,
        }
    }
}

impl fmt::Debug for ComputedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computed")
            .field("element", &self.element)
            .field("sources", &self.sources.len())
            .field("expr", &self.expr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_round_trip() {
        let mut obj = RuntimeObject::new(TypeToken::from("test:mod:Thing"));
        obj.set_property("size", RuntimeValue::Number(4.0));

        assert!(matches!(
            obj.property("size"),
            Some(RuntimeValue::Number(n)) if (*n - 4.0).abs() < f64::EPSILON
        ));
        assert!(obj.property("missing").is_none());
    }

    #[test]
    fn test_debug_does_not_recurse_through_references() {
        let a = RuntimeObject::new(TypeToken::from("test:mod:A")).into_ref();
        let b = RuntimeObject::new(TypeToken::from("test:mod:B")).into_ref();

        // a <-> b reference cycle
        a.write()
            .set_property("peer", RuntimeValue::Resource(Arc::clone(&b)));
        b.write()
            .set_property("peer", RuntimeValue::Resource(Arc::clone(&a)));

        let rendered = format!("{:?}", a.read().property("peer"));
        assert!(rendered.contains("test:mod:B"));
    }
}
