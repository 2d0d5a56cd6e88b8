//! Import validation for deployment snapshots.
//!
//! An exported deployment may be hand-edited to correct inconsistencies and
//! then re-imported. Before a snapshot is accepted into a stack, two checks
//! run:
//!
//! - every resource's URN must embed the target stack's name. Importing the
//!   wrong stack's deployment can seriously hork things, so all mismatches
//!   are collected and reported together; `force` downgrades them to
//!   warnings.
//! - pending operations are always stripped, with one warning each. The
//!   state model defines no resumption semantics for in-flight operations,
//!   so keeping them silently would be worse than dropping them loudly.

use tracing::warn;

use crate::error::{DeploymentError, Result};

use super::deployment::Deployment;

/// Validates that every resource in the deployment belongs to `stack`.
///
/// Returns the mismatch messages as warnings when `force` is set.
///
/// # Errors
///
/// Without `force`, returns [`DeploymentError::ForeignResources`] carrying
/// one message per mismatched resource.
pub fn validate_stack_ownership(
    deployment: &Deployment,
    stack: &str,
    force: bool,
) -> Result<Vec<String>> {
    let mut violations = Vec::new();
    for state in &deployment.resources {
        let found = state.urn().stack();
        if found != stack {
            violations.push(format!(
                "resource '{}' is from a different stack ({found} != {stack})",
                state.urn()
            ));
        }
    }

    if violations.is_empty() {
        return Ok(Vec::new());
    }

    if force {
        for violation in &violations {
            warn!("{violation}");
        }
        return Ok(violations);
    }

    Err(DeploymentError::ForeignResources {
        stack: stack.to_string(),
        violations,
    }
    .into())
}

/// Removes every pending operation from the deployment, returning one
/// warning message per removed operation.
pub fn strip_pending_operations(deployment: &mut Deployment) -> Vec<String> {
    let stripped: Vec<_> = deployment.pending_operations.drain(..).collect();
    let mut warnings = Vec::with_capacity(stripped.len());
    for op in stripped {
        let message = format!(
            "removing pending operation '{}' on '{}' from snapshot",
            op.kind, op.urn
        );
        warn!("{message}");
        warnings.push(message);
    }
    warnings
}

/// Runs the full import preparation: ownership validation followed by
/// pending-operation stripping. Returns the cleaned deployment and every
/// warning raised along the way.
///
/// # Errors
///
/// Propagates [`DeploymentError::ForeignResources`] when foreign resources
/// are found and `force` is not set.
pub fn prepare_import(
    mut deployment: Deployment,
    stack: &str,
    force: bool,
) -> Result<(Deployment, Vec<String>)> {
    let mut warnings = validate_stack_ownership(&deployment, stack, force)?;
    warnings.extend(strip_pending_operations(&mut deployment));
    Ok((deployment, warnings))
}
