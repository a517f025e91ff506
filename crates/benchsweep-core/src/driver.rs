//! Single-resource deletion driver
//!
//! Deletes one resource and waits for the backend to confirm it is gone.
//! Nothing in here propagates: every failure mode is absorbed, logged,
//! and reported as a [`DeleteOutcome`] so that one stuck or broken
//! resource never takes the rest of the pipeline with it.

use std::time::Instant;

use tracing::{debug, warn};

use crate::error;
use crate::handle::ResourceScope;
use crate::kind::KindDescriptor;
use crate::ops::ResourceOps;
use crate::resource::RawResource;

/// What happened to one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Deleted and confirmed gone
    Deleted,
    /// Was already gone when we tried
    AlreadyGone,
    /// Given up after repeated delete or probe failures
    Abandoned,
    /// Delete accepted but the backend never confirmed disappearance
    TimedOut,
}

/// Delete one resource, retrying per the kind's budget, then poll until
/// the backend confirms disappearance or the kind's timeout elapses.
pub async fn delete_one(
    kind: &KindDescriptor,
    ops: &dyn ResourceOps,
    scope: &ResourceScope,
    raw: &RawResource,
) -> DeleteOutcome {
    let kind_name = kind.qualified_name();
    let resource_id = ops.resource_id(raw);

    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match ops.delete(kind, scope, raw).await {
            Ok(()) => break,
            Err(e) if error::is_not_found(&e) => {
                debug!(
                    kind = %kind_name,
                    resource_id = %resource_id,
                    "Resource already gone"
                );
                return DeleteOutcome::AlreadyGone;
            }
            Err(e) if attempt < kind.max_attempts => {
                debug!(
                    kind = %kind_name,
                    resource_id = %resource_id,
                    attempt,
                    error = ?e,
                    "Delete attempt failed, retrying"
                );
            }
            Err(e) => {
                warn!(
                    kind = %kind_name,
                    resource_id = %resource_id,
                    attempts = attempt,
                    error = ?e,
                    "Abandoning resource after repeated delete failures"
                );
                return DeleteOutcome::Abandoned;
            }
        }
    }

    // Delete accepted; wait for the backend to report the resource gone.
    let start = Instant::now();
    let mut probe_failures = 0u32;
    loop {
        match ops.is_deleted(kind, scope, raw).await {
            Ok(true) => {
                debug!(
                    kind = %kind_name,
                    resource_id = %resource_id,
                    elapsed_ms = start.elapsed().as_millis(),
                    "Deletion confirmed"
                );
                return DeleteOutcome::Deleted;
            }
            Ok(false) => {
                probe_failures = 0;
            }
            Err(e) => {
                probe_failures += 1;
                // A probe that fails this consistently is more likely
                // broken than unlucky; bail out instead of spinning until
                // the timeout.
                if probe_failures > kind.max_attempts {
                    warn!(
                        kind = %kind_name,
                        resource_id = %resource_id,
                        consecutive_failures = probe_failures,
                        error = ?e,
                        "Deletion probe keeps failing and may be broken, abandoning confirmation"
                    );
                    return DeleteOutcome::Abandoned;
                }
                debug!(
                    kind = %kind_name,
                    resource_id = %resource_id,
                    consecutive_failures = probe_failures,
                    error = ?e,
                    "Deletion probe failed"
                );
            }
        }

        if start.elapsed() >= kind.delete_timeout {
            warn!(
                kind = %kind_name,
                resource_id = %resource_id,
                timeout_secs = kind.delete_timeout.as_secs(),
                "Deletion timed out"
            );
            return DeleteOutcome::TimedOut;
        }
        tokio::time::sleep(kind.poll_interval).await;
    }
}
