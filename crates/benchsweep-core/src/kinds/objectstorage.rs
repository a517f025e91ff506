//! Object storage service kinds

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
pub const SERVICE: &str = "objectstorage";

/// Register object storage kinds.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(
        KindDescriptor::new(SERVICE, "objects", order::OBJECT_STORAGE),
        Arc::new(CollectionOps),
    )?;
    // Containers refuse deletion while non-empty; ContainerOps clears
    // leftovers first in case the objects pass missed any.
    registry.register(
        KindDescriptor::new(SERVICE, "containers", order::OBJECT_STORAGE + 10),
        Arc::new(ContainerOps),
    )?;
    Ok(())
}

/// Composite delete: remove any objects still inside the container, then
/// the container itself.
struct ContainerOps;

#[async_trait]
impl ResourceOps for ContainerOps {
    async fn delete(
        &self,
        kind: &KindDescriptor,
        scope: &ResourceScope,
        raw: &RawResource,
    ) -> Result<()> {
        let client = scope.provider(kind.admin_required)?.service(&kind.service)?;
        let objects = client.list("objects", scope.tenant_id.as_deref()).await?;
        for object in objects {
            let container = object.attrs.get("container").and_then(|v| v.as_str());
            if container == Some(raw.id.as_str()) {
                client.delete("objects", &object.id).await?;
            }
        }
        client.delete(&kind.resource, &raw.id).await
    }
}
