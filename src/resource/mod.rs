//! Resource object model and property conversion engine.
//!
//! This module is the core of the orchestration engine: the declarative
//! property model, the live runtime object substrate, the capture/hydration
//! conversion engine, resource identity (URN/ID) management, and the
//! immutable per-resource state snapshot.

mod object;
mod property;
mod runtime;
mod state;
mod urn;

pub use object::ResourceObject;
pub use property::{ElementKind, PropertyKey, PropertyMap, PropertyValue};
pub use runtime::{ComputedValue, ObjectRef, RuntimeObject, RuntimeValue, ID_PROPERTY};
pub use state::State;
pub use urn::{ResourceId, TypeToken, Urn, URN_DELIMITER, URN_PREFIX};
