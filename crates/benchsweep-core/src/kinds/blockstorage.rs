//! Block storage service kinds

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::handle::ResourceScope;
use crate::kind::{KindDescriptor, order};
use crate::ops::{CollectionOps, ResourceOps};
use crate::registry::Registry;
use crate::resource::RawResource;

/// Owning service name.
pub const SERVICE: &str = "blockstorage";

/// Register block storage kinds.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    // Snapshots and backups reference volumes and must go first.
    registry.register(
        KindDescriptor::new(SERVICE, "snapshots", order::BLOCK_STORAGE),
        Arc::new(CollectionOps),
    )?;
    registry.register(
        KindDescriptor::new(SERVICE, "backups", order::BLOCK_STORAGE + 10),
        Arc::new(CollectionOps),
    )?;
    registry.register(
        KindDescriptor::new(SERVICE, "volumes", order::BLOCK_STORAGE + 20),
        Arc::new(CollectionOps),
    )?;

    // Quota records exist once per tenant, are reset through the admin
    // API, and have no name to check ownership against.
    registry.register(
        KindDescriptor::new(SERVICE, "quotas", order::BLOCK_STORAGE + 30)
            .admin_required()
            .tenant_scoped(),
        Arc::new(QuotaOps),
    )?;

    Ok(())
}

/// Quota records are identified by tenant, deleted synchronously, and
/// unnamed.
struct QuotaOps;

#[async_trait]
impl ResourceOps for QuotaOps {
    async fn is_deleted(
        &self,
        _kind: &KindDescriptor,
        _scope: &ResourceScope,
        _raw: &RawResource,
    ) -> Result<bool> {
        Ok(true)
    }

    fn resource_name<'a>(&self, _raw: &'a RawResource) -> Option<&'a str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn quotas_are_admin_scoped_and_unnamed() {
        let mut registry = Registry::new();
        register(&mut registry).unwrap();
        let quotas = registry.find(&names(&["blockstorage.quotas"]), None);
        assert_eq!(quotas.len(), 1);
        assert!(quotas[0].descriptor.admin_required);
        assert!(quotas[0].descriptor.tenant_scoped);

        let raw = RawResource::named("t-1", "whatever-the-backend-says");
        assert_eq!(quotas[0].ops.resource_name(&raw), None);
    }

    #[test]
    fn snapshots_before_volumes() {
        let mut registry = Registry::new();
        register(&mut registry).unwrap();
        let ordered: Vec<String> = registry
            .find(&BTreeSet::new(), None)
            .iter()
            .map(|k| k.descriptor.resource.clone())
            .collect();
        assert_eq!(ordered, ["snapshots", "backups", "volumes", "quotas"]);
    }

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }
}
