//! Ownership filtering of discovered resources
//!
//! The only safety mechanism between discovery and deletion: a resource
//! is deleted iff its display name says the benchmark created it. The
//! filter errs toward skipping; the one deliberate exception is resources
//! whose kind has no names at all (quota records and the like), which are
//! deleted unconditionally because ownership cannot be verified either
//! way.

use chrono::Utc;
use tracing::debug;

use crate::kind::KindDescriptor;
use crate::naming::NameMatcher;
use crate::ops::ResourceOps;
use crate::resource::RawResource;

/// Decide whether a discovered resource belongs to the run being cleaned.
///
/// `min_age`, when set, additionally skips resources created more
/// recently than the grace period, so cleanup started while another run
/// is still creating resources leaves the fresh ones alone.
pub fn should_delete(
    kind: &KindDescriptor,
    ops: &dyn ResourceOps,
    matcher: &dyn NameMatcher,
    raw: &RawResource,
    task_id: Option<&str>,
    min_age: Option<chrono::Duration>,
) -> bool {
    if let (Some(min_age), Some(created_at)) = (min_age, raw.created_at) {
        let age = Utc::now() - created_at;
        if age < min_age {
            debug!(
                kind = %kind.qualified_name(),
                resource_id = %ops.resource_id(raw),
                age_secs = age.num_seconds(),
                "Resource inside grace period, skipping"
            );
            return false;
        }
    }

    match ops.resource_name(raw) {
        // No name to check: indistinguishable from externally-created
        // resources, deleted by convention.
        None => true,
        Some(name) => {
            let matched = matcher.matches(name, task_id);
            if !matched {
                debug!(
                    kind = %kind.qualified_name(),
                    resource_id = %ops.resource_id(raw),
                    name = %name,
                    "Name does not match this run, leaving untouched"
                );
            }
            matched
        }
    }
}
