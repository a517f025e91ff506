//! Per-kind resource operations
//!
//! [`ResourceOps`] is the capability surface a kind plugs into the
//! pipeline: list, delete, and a disappearance probe, plus id/name
//! extraction. The provided defaults delegate straight to the owning
//! service's [`ServiceClient`](crate::clients::ServiceClient); kinds with
//! composite deletes or unusual identity rules override what they need.

use anyhow::Result;
use async_trait::async_trait;

use crate::error;
use crate::handle::ResourceScope;
use crate::kind::KindDescriptor;
use crate::resource::RawResource;

/// Operations the pipeline needs from one resource kind.
#[async_trait]
pub trait ResourceOps: Send + Sync {
    /// List all resources of this kind visible to the scope.
    async fn list(&self, kind: &KindDescriptor, scope: &ResourceScope) -> Result<Vec<RawResource>> {
        let client = scope.provider(kind.admin_required)?.service(&kind.service)?;
        client
            .list(&kind.resource, scope.tenant_id.as_deref())
            .await
    }

    /// Issue the delete call for one resource.
    async fn delete(
        &self,
        kind: &KindDescriptor,
        scope: &ResourceScope,
        raw: &RawResource,
    ) -> Result<()> {
        let client = scope.provider(kind.admin_required)?.service(&kind.service)?;
        client.delete(&kind.resource, self.resource_id(raw)).await
    }

    /// Probe whether the backend finished deleting the resource.
    ///
    /// The default re-fetches by id: a not-found answer or a terminal
    /// state means gone, any other state means still going, and a probe
    /// error propagates so the driver can count consecutive failures.
    async fn is_deleted(
        &self,
        kind: &KindDescriptor,
        scope: &ResourceScope,
        raw: &RawResource,
    ) -> Result<bool> {
        let client = scope.provider(kind.admin_required)?.service(&kind.service)?;
        match client.get(&kind.resource, self.resource_id(raw)).await {
            Ok(current) => Ok(current.is_in_terminal_state()),
            Err(e) if error::is_not_found(&e) => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Backend identifier used for delete and probe calls.
    fn resource_id<'a>(&self, raw: &'a RawResource) -> &'a str {
        &raw.id
    }

    /// Display name used for ownership filtering, if the kind has one.
    fn resource_name<'a>(&self, raw: &'a RawResource) -> Option<&'a str> {
        raw.name.as_deref()
    }
}

/// Ops for kinds that map one-to-one onto a service collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionOps;

#[async_trait]
impl ResourceOps for CollectionOps {}

/// Ops for collections whose delete call is synchronous.
///
/// The backend removes the resource before the delete call returns, so
/// the disappearance probe is a constant yes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynchronousOps;

#[async_trait]
impl ResourceOps for SynchronousOps {
    async fn is_deleted(
        &self,
        _kind: &KindDescriptor,
        _scope: &ResourceScope,
        _raw: &RawResource,
    ) -> Result<bool> {
        Ok(true)
    }
}
