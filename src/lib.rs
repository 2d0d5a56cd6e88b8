// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Vellum Stack
//!
//! The core of a declarative infrastructure orchestration engine: a resource
//! object model with a bidirectional property-serialization engine, plus the
//! durable stack snapshot and configuration primitives built on top of it.
//!
//! ## Overview
//!
//! An evaluator runs a declarative program and mutates live resource
//! objects; Vellum turns those into durable, diffable deployment state:
//!
//! - **Capture**: convert a live object graph into a disconnected
//!   [`resource::PropertyMap`] snapshot, flattening resource references into
//!   plain IDs and classifying pending values as computed or output
//! - **Hydration**: write resolved property maps back onto live objects
//! - **Identity**: one-time URN and provider-ID assignment per resource
//! - **Snapshots**: immutable per-resource [`resource::State`] records,
//!   packaged into versioned, importable/exportable stack deployments
//!
//! Property maps serialize in canonical key order, so repeated captures of
//! logically identical state are byte-identical.
//!
//! ## Modules
//!
//! - [`resource`]: property model, live objects, conversion engine, identity
//! - [`stack`]: versioned deployment snapshots, import validation, storage
//! - [`config`]: per-stack key/value configuration
//! - [`cli`]: command-line interface
//!
//! ## Example
//!
//! ```
//! use vellum_stack::resource::{
//!     PropertyMap, PropertyKey, PropertyValue, ResourceId, ResourceObject, TypeToken, Urn,
//! };
//!
//! # fn main() -> vellum_stack::error::Result<()> {
//! let ty = TypeToken::from("cloud:vm:Instance");
//! let mut resource = ResourceObject::with_token(ty.clone());
//! resource.set_urn(Urn::new("dev", "webapp", &ty, "frontend"))?;
//!
//! let mut outputs = PropertyMap::new();
//! outputs.insert(
//!     PropertyKey::from("ip"),
//!     PropertyValue::String("10.0.0.1".to_string()),
//! );
//!
//! let state = resource.update(ResourceId::from("i-42"), outputs)?;
//! assert!(resource.has_id());
//! assert_eq!(state.id(), &ResourceId::from("i-42"));
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod resource;
pub mod stack;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigKey, ConfigMap, StackConfig};
pub use error::{InvariantViolation, Result, VellumError};
pub use resource::{
    ElementKind, PropertyKey, PropertyMap, PropertyValue, ResourceId, ResourceObject, RuntimeObject,
    RuntimeValue, State, TypeToken, Urn,
};
pub use stack::{Deployment, LocalSnapshotStore, SnapshotStore, UntypedDeployment};
