//! Stack deployment snapshots: versioned envelopes, import validation, and
//! snapshot storage.

mod deployment;
mod import;
mod local;
mod store;

pub use deployment::{
    deserialize_untyped, serialize_deployment, Deployment, Manifest, OperationKind,
    PendingOperation, UntypedDeployment, DEPLOYMENT_SCHEMA_VERSION_CURRENT,
    DEPLOYMENT_SCHEMA_VERSION_OLDEST,
};
pub use import::{prepare_import, strip_pending_operations, validate_stack_ownership};
pub use local::LocalSnapshotStore;
pub use store::SnapshotStore;
