//! Immutable per-resource deployment state.

use serde::{Deserialize, Serialize};

use super::property::PropertyMap;
use super::urn::{ResourceId, TypeToken, Urn};

/// The durable record of one resource after a deployment step: its type and
/// identity, the inputs as planned, and the outputs the step reported.
///
/// Created exactly once per step and never mutated afterwards; the fields are
/// private and exposed through accessors only. `inputs` is the capture taken
/// before the step mutated anything; `outputs` is stored verbatim as supplied
/// by the step, even where hydration dropped fields on the live object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// The resource type token.
    #[serde(rename = "type")]
    ty: TypeToken,
    /// The resource's URN.
    urn: Urn,
    /// The provider-assigned ID.
    id: ResourceId,
    /// Pre-deployment property snapshot.
    inputs: PropertyMap,
    /// Post-deployment property values.
    outputs: PropertyMap,
}

impl State {
    /// Creates a new state record.
    #[must_use]
    pub const fn new(
        ty: TypeToken,
        urn: Urn,
        id: ResourceId,
        inputs: PropertyMap,
        outputs: PropertyMap,
    ) -> Self {
        Self {
            ty,
            urn,
            id,
            inputs,
            outputs,
        }
    }

    /// Returns the resource type token.
    #[must_use]
    pub const fn type_token(&self) -> &TypeToken {
        &self.ty
    }

    /// Returns the resource URN.
    #[must_use]
    pub const fn urn(&self) -> &Urn {
        &self.urn
    }

    /// Returns the provider-assigned ID.
    #[must_use]
    pub const fn id(&self) -> &ResourceId {
        &self.id
    }

    /// Returns the pre-deployment property snapshot.
    #[must_use]
    pub const fn inputs(&self) -> &PropertyMap {
        &self.inputs
    }

    /// Returns the post-deployment property values.
    #[must_use]
    pub const fn outputs(&self) -> &PropertyMap {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::property::{PropertyKey, PropertyValue};

    #[test]
    fn test_wire_field_names() {
        let mut inputs = PropertyMap::new();
        inputs.insert(PropertyKey::from("size"), PropertyValue::Number(2.0));

        let state = State::new(
            TypeToken::from("cloud:disk:Disk"),
            Urn::from("urn:vellum:dev::proj::cloud:disk:Disk::data"),
            ResourceId::from("disk-123"),
            inputs,
            PropertyMap::new(),
        );

        let json = serde_json::to_value(&state).expect("serialize state");
        assert_eq!(json["type"], "cloud:disk:Disk");
        assert_eq!(json["urn"], "urn:vellum:dev::proj::cloud:disk:Disk::data");
        assert_eq!(json["id"], "disk-123");
        assert!(json["inputs"].is_object());
        assert!(json["outputs"].is_object());
    }

    #[test]
    fn test_round_trip() {
        let state = State::new(
            TypeToken::from("cloud:vm:Instance"),
            Urn::from("urn:vellum:dev::proj::cloud:vm:Instance::web"),
            ResourceId::from("i-42"),
            PropertyMap::new(),
            PropertyMap::from([(
                PropertyKey::from("ip"),
                PropertyValue::String("10.0.0.1".to_string()),
            )]),
        );

        let json = serde_json::to_string(&state).expect("serialize state");
        let back: State = serde_json::from_str(&json).expect("deserialize state");
        assert_eq!(back, state);
    }
}
