//! Discovery stage: list resources per credential scope and publish them
//!
//! One discovery pass runs per kind. Admin-required kinds list once from
//! the admin scope (or once per tenant when tenant users exist); everything
//! else lists once per user, de-duplicated per tenant for tenant-scoped
//! kinds. Every candidate is pushed into the kind's bounded work queue;
//! a scope whose listing keeps failing is skipped without affecting the
//! others.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use backon::{BackoffBuilder, ConstantBuilder};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::clients::CachingProviderFactory;
use crate::handle::{ResourceHandle, ResourceScope};
use crate::job::CleanupJob;
use crate::kind::KindDescriptor;
use crate::ops::ResourceOps;

/// Total list attempts per scope before the scope is skipped.
pub(crate) const LIST_MAX_ATTEMPTS: usize = 3;

/// Delay between list retries.
const LIST_RETRY_DELAY: Duration = Duration::from_millis(500);

/// List every scope the kind applies to and enqueue all candidates.
///
/// Returns the number of published candidates. Stops early only when the
/// queue's consumers are gone, which means the pipeline is shutting down.
pub(crate) async fn publish(
    kind: &KindDescriptor,
    ops: &dyn ResourceOps,
    job: &CleanupJob,
    clients: &CachingProviderFactory,
    tx: &mpsc::Sender<ResourceHandle>,
) -> usize {
    let mut published = 0;
    for scope in scopes_for(kind, job, clients) {
        let scope = Arc::new(scope);
        match list_with_retry(kind, ops, &scope).await {
            Ok(resources) => {
                debug!(
                    kind = %kind.qualified_name(),
                    tenant_id = ?scope.tenant_id,
                    count = resources.len(),
                    "Listed candidates"
                );
                for raw in resources {
                    let handle = ResourceHandle {
                        scope: Arc::clone(&scope),
                        raw,
                    };
                    if tx.send(handle).await.is_err() {
                        return published;
                    }
                    published += 1;
                }
            }
            Err(e) => {
                warn!(
                    kind = %kind.qualified_name(),
                    tenant_id = ?scope.tenant_id,
                    error = ?e,
                    "Listing failed repeatedly, skipping scope"
                );
            }
        }
    }
    published
}

/// Build the credential scopes one kind must be cleaned from.
fn scopes_for(
    kind: &KindDescriptor,
    job: &CleanupJob,
    clients: &CachingProviderFactory,
) -> Vec<ResourceScope> {
    if kind.admin_required {
        let Some(admin) = job.admin.as_ref().map(|c| clients.provider(c)) else {
            warn!(
                kind = %kind.qualified_name(),
                "Kind requires admin credentials but the job has none, skipping"
            );
            return Vec::new();
        };
        if job.users.is_empty() || kind.admin_only {
            return vec![ResourceScope::admin_only(admin)];
        }
        user_scopes(kind, job, clients, Some(admin))
    } else {
        user_scopes(kind, job, clients, None)
    }
}

/// One scope per user, collapsed to one per tenant for tenant-scoped
/// kinds (the first user seen for a tenant does that tenant's pass).
fn user_scopes(
    kind: &KindDescriptor,
    job: &CleanupJob,
    clients: &CachingProviderFactory,
    admin: Option<Arc<dyn crate::clients::ClientProvider>>,
) -> Vec<ResourceScope> {
    let mut seen_tenants: HashSet<Option<String>> = HashSet::new();
    let mut scopes = Vec::new();
    for user in &job.users {
        if kind.tenant_scoped && !seen_tenants.insert(user.tenant_id.clone()) {
            continue;
        }
        scopes.push(ResourceScope::for_user(
            admin.clone(),
            clients.provider(user),
            user.tenant_id.clone(),
        ));
    }
    scopes
}

/// Run the kind's list call with a bounded constant-delay retry.
async fn list_with_retry(
    kind: &KindDescriptor,
    ops: &dyn ResourceOps,
    scope: &ResourceScope,
) -> Result<Vec<crate::resource::RawResource>> {
    let mut delays = ConstantBuilder::default()
        .with_delay(LIST_RETRY_DELAY)
        .with_max_times(LIST_MAX_ATTEMPTS - 1)
        .build();

    loop {
        match ops.list(kind, scope).await {
            Ok(resources) => return Ok(resources),
            Err(e) => match delays.next() {
                Some(delay) => {
                    warn!(
                        kind = %kind.qualified_name(),
                        tenant_id = ?scope.tenant_id,
                        error = ?e,
                        "Listing failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => return Err(e),
            },
        }
    }
}
