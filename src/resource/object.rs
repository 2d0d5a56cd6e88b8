//! Live resource objects and the property conversion engine.
//!
//! [`ResourceObject`] pairs a live object handle with the resource's URN and
//! owns the one-time assignment of both the URN and the provider ID. It also
//! hosts the two halves of the conversion engine:
//!
//! - **capture** ([`ResourceObject::copy_properties`]): walk the live object
//!   and produce a disconnected [`PropertyMap`] deep copy, flattening
//!   resource references into plain IDs (or computed placeholders while
//!   planning) so the persisted representation is always acyclic.
//! - **hydration** ([`ResourceObject::set_properties`]): write a property map
//!   back onto the live object, building nested runtime values as needed.
//!
//! Capture never mutates the live object; hydration writes a destination
//! property only if it is currently unset. Hydration of an already-set
//! property silently drops the incoming value; no deep merge is attempted.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

use crate::error::{InvariantViolation, Result};

use super::property::{PropertyKey, PropertyMap, PropertyValue};
use super::runtime::{ObjectRef, RuntimeObject, RuntimeValue, ID_PROPERTY};
use super::state::State;
use super::urn::{ResourceId, TypeToken, Urn};

/// A live resource object, connected to state that may change as the
/// evaluated program runs.
#[derive(Debug)]
pub struct ResourceObject {
    /// The resource's URN, assigned at most once.
    urn: Option<Urn>,
    /// The resource's live object. The provider-assigned ID lives inside it
    /// under [`ID_PROPERTY`].
    obj: ObjectRef,
}

impl ResourceObject {
    /// Wraps a live object handle.
    #[must_use]
    pub const fn new(obj: ObjectRef) -> Self {
        Self { urn: None, obj }
    }

    /// Creates a resource with a fresh, empty live object of the given type.
    #[must_use]
    pub fn with_token(token: TypeToken) -> Self {
        Self::new(RuntimeObject::new(token).into_ref())
    }

    /// Returns the live object handle.
    #[must_use]
    pub const fn obj(&self) -> &ObjectRef {
        &self.obj
    }

    /// Returns the resource type token.
    #[must_use]
    pub fn type_token(&self) -> TypeToken {
        self.obj.read().token().clone()
    }

    /// Returns the URN, if one has been assigned.
    #[must_use]
    pub const fn urn(&self) -> Option<&Urn> {
        self.urn.as_ref()
    }

    /// Returns true if a URN has been assigned.
    #[must_use]
    pub const fn has_urn(&self) -> bool {
        self.urn.is_some()
    }

    /// Assigns the resource's URN. This must only happen once.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::UrnAlreadySet`] if a URN is already
    /// assigned.
    pub fn set_urn(&mut self, urn: Urn) -> Result<()> {
        if let Some(existing) = &self.urn {
            return Err(InvariantViolation::UrnAlreadySet {
                urn: existing.to_string(),
            }
            .into());
        }
        self.urn = Some(urn);
        Ok(())
    }

    /// Returns true if the live object carries a concrete ID.
    #[must_use]
    pub fn has_id(&self) -> bool {
        matches!(
            self.obj.read().property(ID_PROPERTY),
            Some(RuntimeValue::String(_))
        )
    }

    /// Fetches the resource's ID.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::IdNotSet`] if no concrete ID has been
    /// assigned yet; callers must check [`Self::has_id`] first.
    pub fn id(&self) -> Result<ResourceId> {
        match self.obj.read().property(ID_PROPERTY) {
            Some(RuntimeValue::String(id)) => Ok(ResourceId::from(id.clone())),
            _ => Err(InvariantViolation::IdNotSet {
                urn: self.urn.as_ref().map(ToString::to_string).unwrap_or_default(),
            }
            .into()),
        }
    }

    /// Assigns the provider ID. This must only happen once: overwriting an
    /// unset or still-computed ID is allowed, overwriting a concrete one is
    /// not.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::IdAlreadySet`] if a concrete ID is
    /// already assigned.
    pub fn set_id(&self, id: &ResourceId) -> Result<()> {
        let mut obj = self.obj.write();
        match obj.property(ID_PROPERTY) {
            None | Some(RuntimeValue::Null | RuntimeValue::Computed(_)) => {
                obj.set_property(ID_PROPERTY, RuntimeValue::String(id.to_string()));
                Ok(())
            }
            Some(RuntimeValue::String(previous)) => Err(InvariantViolation::IdAlreadySet {
                previous: previous.clone(),
            }
            .into()),
            Some(other) => Err(InvariantViolation::IdAlreadySet {
                previous: format!("{other:?}"),
            }
            .into()),
        }
    }

    /// Captures a property map out of the live object.
    ///
    /// The result is a snapshot completely disconnected from the object;
    /// subsequent object updates are not observed through it.
    #[must_use]
    pub fn copy_properties(&self) -> PropertyMap {
        // Clone the property table out of the lock before recursing:
        // captured values may need to read other live objects, including
        // this one.
        let props = self.obj.read().properties().clone();
        capture_properties(Some(&self.obj), &props)
    }

    /// Hydrates a property map onto the live object.
    ///
    /// A destination property is written only if it is currently unset;
    /// otherwise the incoming value is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::HydrateUnresolved`] if the map contains
    /// a computed or output value; hydration only occurs on resolved data.
    pub fn set_properties(&self, props: &PropertyMap) -> Result<()> {
        let mut obj = self.obj.write();
        hydrate_properties(obj.properties_mut(), props)
    }

    /// Applies a deployment step result: assigns the ID, hydrates the
    /// outputs, and archives the resource's state as an immutable snapshot.
    ///
    /// The returned state's `inputs` are captured before any mutation and
    /// its `outputs` are the supplied map verbatim, even where hydration
    /// dropped fields on the live object.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::MissingUrn`] if no URN has been
    /// assigned, and propagates ID-assignment and hydration invariants.
    pub fn update(&self, id: ResourceId, outputs: PropertyMap) -> Result<State> {
        let urn = self.urn.clone().ok_or(InvariantViolation::MissingUrn)?;

        // Snapshot the properties as planned, before anything mutates.
        let inputs = self.copy_properties();

        self.set_id(&id)?;
        self.set_properties(&outputs)?;

        Ok(State::new(self.type_token(), urn, id, inputs, outputs))
    }
}

/// Captures every serializable property of a live object, in canonical key
/// order. `resobj` is the resource object being captured, used to classify
/// pending computations; recursion into nested structures loses it, so only
/// computations sitting directly on the resource can be outputs.
fn capture_properties(
    resobj: Option<&ObjectRef>,
    props: &BTreeMap<PropertyKey, RuntimeValue>,
) -> PropertyMap {
    let mut result = PropertyMap::new();
    for (key, value) in props {
        if let Some(captured) = capture_value(resobj, value) {
            result.insert(key.clone(), captured);
        }
    }
    result
}

/// Captures a single live value, or `None` if it is not serializable.
fn capture_value(resobj: Option<&ObjectRef>, value: &RuntimeValue) -> Option<PropertyValue> {
    match value {
        // Resource references collapse to the target's ID. If no ID has been
        // assigned we must be planning: the target has not been realized yet.
        RuntimeValue::Resource(target) => {
            let id = match target.read().property(ID_PROPERTY) {
                Some(RuntimeValue::String(id)) => Some(id.clone()),
                _ => None,
            };
            Some(id.map_or_else(
                || PropertyValue::make_computed(PropertyValue::String(String::new())),
                PropertyValue::String,
            ))
        }

        RuntimeValue::Null => Some(PropertyValue::Null),
        RuntimeValue::Bool(b) => Some(PropertyValue::Bool(*b)),
        RuntimeValue::Number(n) => Some(PropertyValue::Number(*n)),
        RuntimeValue::String(s) => Some(PropertyValue::String(s.clone())),

        RuntimeValue::Array(elems) => Some(PropertyValue::Array(
            elems.iter().filter_map(|e| capture_value(None, e)).collect(),
        )),

        RuntimeValue::Object(map) => {
            Some(PropertyValue::Object(capture_properties(None, map)))
        }

        // A pending computation propagates as an unknown. An output is a
        // computation set directly on the resource that derives from
        // precisely that one resource and no expression; everything else is
        // computed. The placeholder is the zero value of the declared shape.
        RuntimeValue::Computed(comp) => {
            let self_derived = !comp.expr
                && comp.sources.len() == 1
                && resobj.is_some_and(|r| Arc::ptr_eq(&comp.sources[0], r));
            let placeholder = comp.element.zero_value();
            Some(if self_derived {
                PropertyValue::make_output(placeholder)
            } else {
                PropertyValue::make_computed(placeholder)
            })
        }

        // Functions are never serializable; skip them.
        RuntimeValue::Function(_) => None,
    }
}

/// Writes property values onto a live property table, skipping any
/// destination that already holds a value.
fn hydrate_properties(
    target: &mut BTreeMap<PropertyKey, RuntimeValue>,
    props: &PropertyMap,
) -> Result<()> {
    for (key, value) in props {
        let unset = target
            .get(key.as_str())
            .is_none_or(RuntimeValue::is_null);
        if unset {
            trace!("hydrating resource property: {key}");
            target.insert(key.clone(), hydrate_value(key, value)?);
        } else {
            trace!("destination already set, dropping hydrated value: {key}");
        }
    }
    Ok(())
}

/// Translates a resolved property value into a runtime value.
fn hydrate_value(key: &PropertyKey, value: &PropertyValue) -> Result<RuntimeValue> {
    Ok(match value {
        PropertyValue::Null => RuntimeValue::Null,
        PropertyValue::Bool(b) => RuntimeValue::Bool(*b),
        PropertyValue::Number(n) => RuntimeValue::Number(*n),
        PropertyValue::String(s) => RuntimeValue::String(s.clone()),
        PropertyValue::Array(elems) => RuntimeValue::Array(
            elems
                .iter()
                .map(|e| hydrate_value(key, e))
                .collect::<Result<Vec<_>>>()?,
        ),
        PropertyValue::Object(map) => {
            let mut nested = BTreeMap::new();
            hydrate_properties(&mut nested, map)?;
            RuntimeValue::Object(nested)
        }
        PropertyValue::Computed(_) | PropertyValue::Output(_) => {
            return Err(InvariantViolation::HydrateUnresolved {
                key: key.to_string(),
            }
            .into());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VellumError;
    use crate::resource::property::ElementKind;
    use crate::resource::runtime::ComputedValue;

    fn fresh(token: &str) -> ResourceObject {
        ResourceObject::with_token(TypeToken::from(token))
    }

    fn urn_for(name: &str) -> Urn {
        Urn::new("dev", "proj", &TypeToken::from("test:mod:Thing"), name)
    }

    #[test]
    fn test_capture_primitives() {
        let res = fresh("test:mod:Thing");
        {
            let mut obj = res.obj().write();
            obj.set_property("none", RuntimeValue::Null);
            obj.set_property("flag", RuntimeValue::Bool(true));
            obj.set_property("count", RuntimeValue::Number(3.0));
            obj.set_property("name", RuntimeValue::String("web".to_string()));
        }

        let props = res.copy_properties();
        assert_eq!(props.get("none"), Some(&PropertyValue::Null));
        assert_eq!(props.get("flag"), Some(&PropertyValue::Bool(true)));
        assert_eq!(props.get("count"), Some(&PropertyValue::Number(3.0)));
        assert_eq!(
            props.get("name"),
            Some(&PropertyValue::String("web".to_string()))
        );
    }

    #[test]
    fn test_capture_nested_structures() {
        let res = fresh("test:mod:Thing");
        {
            let mut obj = res.obj().write();
            obj.set_property(
                "tags",
                RuntimeValue::Array(vec![
                    RuntimeValue::String("a".to_string()),
                    RuntimeValue::String("b".to_string()),
                ]),
            );
            let mut nested = BTreeMap::new();
            nested.insert(PropertyKey::from("inner"), RuntimeValue::Number(1.0));
            obj.set_property("meta", RuntimeValue::Object(nested));
        }

        let props = res.copy_properties();
        assert_eq!(
            props.get("tags"),
            Some(&PropertyValue::Array(vec![
                PropertyValue::String("a".to_string()),
                PropertyValue::String("b".to_string()),
            ]))
        );
        assert_eq!(
            props.get("meta"),
            Some(&PropertyValue::Object(PropertyMap::from([(
                PropertyKey::from("inner"),
                PropertyValue::Number(1.0)
            )])))
        );
    }

    #[test]
    fn test_capture_is_disconnected_from_live_object() {
        let res = fresh("test:mod:Thing");
        res.obj()
            .write()
            .set_property("name", RuntimeValue::String("before".to_string()));

        let props = res.copy_properties();
        res.obj()
            .write()
            .set_property("name", RuntimeValue::String("after".to_string()));

        assert_eq!(
            props.get("name"),
            Some(&PropertyValue::String("before".to_string()))
        );
    }

    #[test]
    fn test_functions_are_skipped() {
        let res = fresh("test:mod:Thing");
        {
            let mut obj = res.obj().write();
            obj.set_property("handler", RuntimeValue::Function("onCreate".to_string()));
            obj.set_property("kept", RuntimeValue::Bool(false));
        }

        let props = res.copy_properties();
        assert!(!props.contains_key("handler"));
        assert!(props.contains_key("kept"));
    }

    #[test]
    fn test_resource_reference_flattens_to_id_once_assigned() {
        let target = fresh("test:mod:Target");
        let res = fresh("test:mod:Thing");
        res.obj().write().set_property(
            "dependency",
            RuntimeValue::Resource(Arc::clone(target.obj())),
        );

        // Target not yet realized: reference captures as Computed(String).
        let planning = res.copy_properties();
        assert_eq!(
            planning.get("dependency"),
            Some(&PropertyValue::make_computed(PropertyValue::String(
                String::new()
            )))
        );

        // Once the target has an ID, the same reference captures concretely.
        target
            .set_id(&ResourceId::from("target-9"))
            .expect("assign target id");
        let applied = res.copy_properties();
        assert_eq!(
            applied.get("dependency"),
            Some(&PropertyValue::String("target-9".to_string()))
        );
    }

    #[test]
    fn test_cyclic_references_capture_acyclically() {
        let a = fresh("test:mod:A");
        let b = fresh("test:mod:B");
        a.obj()
            .write()
            .set_property("peer", RuntimeValue::Resource(Arc::clone(b.obj())));
        b.obj()
            .write()
            .set_property("peer", RuntimeValue::Resource(Arc::clone(a.obj())));
        a.set_id(&ResourceId::from("a-1")).expect("assign id");

        let props = b.copy_properties();
        assert_eq!(
            props.get("peer"),
            Some(&PropertyValue::String("a-1".to_string()))
        );
    }

    #[test]
    fn test_self_derived_computation_captures_as_output() {
        let res = fresh("test:mod:Thing");
        res.obj().write().set_property(
            "endpoint",
            RuntimeValue::Computed(ComputedValue::from_source(ElementKind::String, res.obj())),
        );

        let props = res.copy_properties();
        assert_eq!(
            props.get("endpoint"),
            Some(&PropertyValue::make_output(PropertyValue::String(
                String::new()
            )))
        );
    }

    #[test]
    fn test_foreign_or_expression_computation_captures_as_computed() {
        let other = fresh("test:mod:Other");
        let res = fresh("test:mod:Thing");
        {
            let mut obj = res.obj().write();
            // Depends on a different resource.
            obj.set_property(
                "from_other",
                RuntimeValue::Computed(ComputedValue::from_source(
                    ElementKind::Number,
                    other.obj(),
                )),
            );
            // Depends on self, but through a free expression.
            obj.set_property(
                "derived",
                RuntimeValue::Computed(ComputedValue::expression(
                    ElementKind::Bool,
                    vec![Arc::clone(res.obj())],
                )),
            );
        }

        let props = res.copy_properties();
        assert_eq!(
            props.get("from_other"),
            Some(&PropertyValue::make_computed(PropertyValue::Number(0.0)))
        );
        assert_eq!(
            props.get("derived"),
            Some(&PropertyValue::make_computed(PropertyValue::Bool(false)))
        );
    }

    #[test]
    fn test_nested_self_computation_is_not_an_output() {
        let res = fresh("test:mod:Thing");
        {
            let mut obj = res.obj().write();
            let mut nested = BTreeMap::new();
            nested.insert(
                PropertyKey::from("pending"),
                RuntimeValue::Computed(ComputedValue::from_source(
                    ElementKind::String,
                    res.obj(),
                )),
            );
            obj.set_property("meta", RuntimeValue::Object(nested));
        }

        let props = res.copy_properties();
        let meta = props.get("meta").and_then(PropertyValue::as_object).expect("meta object");
        assert_eq!(
            meta.get("pending"),
            Some(&PropertyValue::make_computed(PropertyValue::String(
                String::new()
            )))
        );
    }

    #[test]
    fn test_hydrate_then_capture_round_trips_primitives() {
        let cases = [
            PropertyValue::Null,
            PropertyValue::Bool(true),
            PropertyValue::Number(6.5),
            PropertyValue::String("hello".to_string()),
        ];

        for value in cases {
            let res = fresh("test:mod:Thing");
            let mut props = PropertyMap::new();
            props.insert(PropertyKey::from("v"), value.clone());
            res.set_properties(&props).expect("hydrate");

            let captured = res.copy_properties();
            assert_eq!(captured.get("v"), Some(&value));
        }
    }

    #[test]
    fn test_hydrate_then_capture_round_trips_structures() {
        let res = fresh("test:mod:Thing");
        let original = PropertyMap::from([
            (
                PropertyKey::from("list"),
                PropertyValue::Array(vec![
                    PropertyValue::Number(1.0),
                    PropertyValue::Object(PropertyMap::from([(
                        PropertyKey::from("deep"),
                        PropertyValue::Bool(true),
                    )])),
                ]),
            ),
            (
                PropertyKey::from("plain"),
                PropertyValue::String("x".to_string()),
            ),
        ]);

        res.set_properties(&original).expect("hydrate");
        assert_eq!(res.copy_properties(), original);
    }

    #[test]
    fn test_hydrate_skips_already_set_destinations() {
        let res = fresh("test:mod:Thing");

        let first = PropertyMap::from([
            (
                PropertyKey::from("kept"),
                PropertyValue::String("original".to_string()),
            ),
            (PropertyKey::from("empty"), PropertyValue::Null),
        ]);
        res.set_properties(&first).expect("first hydrate");

        // Second pass: "kept" must survive, the null slot may be filled.
        let second = PropertyMap::from([
            (
                PropertyKey::from("kept"),
                PropertyValue::String("clobbered".to_string()),
            ),
            (
                PropertyKey::from("empty"),
                PropertyValue::Number(7.0),
            ),
        ]);
        res.set_properties(&second).expect("second hydrate");

        let captured = res.copy_properties();
        assert_eq!(
            captured.get("kept"),
            Some(&PropertyValue::String("original".to_string()))
        );
        assert_eq!(captured.get("empty"), Some(&PropertyValue::Number(7.0)));
    }

    #[test]
    fn test_hydrating_unresolved_value_is_an_invariant_violation() {
        let res = fresh("test:mod:Thing");
        let props = PropertyMap::from([(
            PropertyKey::from("pending"),
            PropertyValue::make_computed(PropertyValue::String(String::new())),
        )]);

        let err = res.set_properties(&props).expect_err("must reject");
        assert!(matches!(
            err,
            VellumError::Invariant(InvariantViolation::HydrateUnresolved { .. })
        ));
    }

    #[test]
    fn test_set_urn_twice_fails() {
        let mut res = fresh("test:mod:Thing");
        res.set_urn(urn_for("one")).expect("first set");

        let err = res.set_urn(urn_for("two")).expect_err("second set");
        assert!(matches!(
            err,
            VellumError::Invariant(InvariantViolation::UrnAlreadySet { .. })
        ));
    }

    #[test]
    fn test_set_id_twice_fails_over_concrete_value() {
        let res = fresh("test:mod:Thing");
        res.set_id(&ResourceId::from("first")).expect("first set");

        let err = res
            .set_id(&ResourceId::from("second"))
            .expect_err("second set");
        assert!(matches!(
            err,
            VellumError::Invariant(InvariantViolation::IdAlreadySet { ref previous })
                if previous == "first"
        ));
    }

    #[test]
    fn test_set_id_over_computed_placeholder_is_allowed_once() {
        let other = fresh("test:mod:Other");
        let res = fresh("test:mod:Thing");
        res.obj().write().set_property(
            ID_PROPERTY,
            RuntimeValue::Computed(ComputedValue::from_source(ElementKind::String, other.obj())),
        );
        assert!(!res.has_id());

        res.set_id(&ResourceId::from("real-1")).expect("resolve id");
        assert!(res.has_id());
        assert!(res.set_id(&ResourceId::from("real-2")).is_err());
    }

    #[test]
    fn test_id_read_before_set_is_an_invariant_violation() {
        let res = fresh("test:mod:Thing");
        assert!(!res.has_id());

        let err = res.id().expect_err("unset id");
        assert!(matches!(
            err,
            VellumError::Invariant(InvariantViolation::IdNotSet { .. })
        ));
    }

    #[test]
    fn test_update_requires_urn() {
        let res = fresh("test:mod:Thing");
        let err = res
            .update(ResourceId::from("x"), PropertyMap::new())
            .expect_err("no urn");
        assert!(matches!(
            err,
            VellumError::Invariant(InvariantViolation::MissingUrn)
        ));
    }

    #[test]
    fn test_update_archives_inputs_before_mutation_and_outputs_verbatim() {
        let mut res = fresh("test:mod:Thing");
        res.set_urn(urn_for("web")).expect("set urn");
        res.obj().write().set_property(
            "size",
            RuntimeValue::Number(2.0),
        );

        let outputs = PropertyMap::from([
            (
                PropertyKey::from("ip"),
                PropertyValue::String("10.0.0.1".to_string()),
            ),
            // This one is dropped by hydration (destination already set),
            // but must still appear verbatim in the archived outputs.
            (PropertyKey::from("size"), PropertyValue::Number(99.0)),
        ]);

        let state = res
            .update(ResourceId::from("i-42"), outputs.clone())
            .expect("update");

        assert_eq!(state.id(), &ResourceId::from("i-42"));
        assert_eq!(state.urn(), &urn_for("web"));
        assert_eq!(
            state.inputs().get("size"),
            Some(&PropertyValue::Number(2.0))
        );
        assert!(!state.inputs().contains_key("ip"));
        assert_eq!(state.outputs(), &outputs);

        // Live object: id assigned, ip hydrated, size untouched.
        assert!(res.has_id());
        assert_eq!(res.id().expect("id"), ResourceId::from("i-42"));
        let live = res.copy_properties();
        assert_eq!(
            live.get("ip"),
            Some(&PropertyValue::String("10.0.0.1".to_string()))
        );
        assert_eq!(live.get("size"), Some(&PropertyValue::Number(2.0)));
    }
}
