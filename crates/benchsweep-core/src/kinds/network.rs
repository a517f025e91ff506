//! Networking service kinds
//!
//! The networking band has the strictest internal ordering: floating IPs
//! and ports must go before routers, routers before subnets, subnets
//! before their networks. Security groups come last because ports
//! reference them.

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
pub const SERVICE: &str = "network";

/// Register networking kinds.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(
        KindDescriptor::new(SERVICE, "floating_ips", order::NETWORK),
        Arc::new(FloatingIpOps),
    )?;
    registry.register(
        KindDescriptor::new(SERVICE, "ports", order::NETWORK + 10),
        Arc::new(PortOps),
    )?;
    registry.register(
        KindDescriptor::new(SERVICE, "routers", order::NETWORK + 20),
        Arc::new(CollectionOps),
    )?;
    registry.register(
        KindDescriptor::new(SERVICE, "subnets", order::NETWORK + 30),
        Arc::new(CollectionOps),
    )?;
    registry.register(
        KindDescriptor::new(SERVICE, "networks", order::NETWORK + 40),
        Arc::new(CollectionOps),
    )?;
    registry.register(
        KindDescriptor::new(SERVICE, "security_groups", order::NETWORK + 50),
        Arc::new(CollectionOps),
    )?;
    Ok(())
}

/// Floating IPs carry no user-assigned name, only an address, so
/// ownership cannot be verified; they fall under the unconditional-delete
/// policy for unnamed resources.
struct FloatingIpOps;

#[async_trait]
impl ResourceOps for FloatingIpOps {
    fn resource_name<'a>(&self, _raw: &'a RawResource) -> Option<&'a str> {
        None
    }
}

/// Ports owned by a router cannot be deleted directly; they are removed
/// by detaching the interface from the router. Everything else is a
/// plain port delete.
struct PortOps;

impl PortOps {
    /// Interface id for a router-owned port, `"<router>:<port>"`, or
    /// `None` for ordinary ports.
    fn interface_id(raw: &RawResource) -> Option<String> {
        let device_owner = raw.attrs.get("device_owner").and_then(|v| v.as_str())?;
        if !device_owner.starts_with("network:router_interface") {
            return None;
        }
        let router_id = raw
            .attrs
            .get("device_id")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        Some(format!("{router_id}:{}", raw.id))
    }
}

#[async_trait]
impl ResourceOps for PortOps {
    async fn delete(
        &self,
        kind: &KindDescriptor,
        scope: &ResourceScope,
        raw: &RawResource,
    ) -> Result<()> {
        if let Some(interface_id) = Self::interface_id(raw) {
            let client = scope.provider(kind.admin_required)?.service(&kind.service)?;
            return client.delete("router_interfaces", &interface_id).await;
        }
        CollectionOps.delete(kind, scope, raw).await
    }

    async fn is_deleted(
        &self,
        kind: &KindDescriptor,
        scope: &ResourceScope,
        raw: &RawResource,
    ) -> Result<bool> {
        // Probe the same surface the delete went through: the port API
        // keeps reporting a router-owned port until the router drops it.
        if let Some(interface_id) = Self::interface_id(raw) {
            let client = scope.provider(kind.admin_required)?.service(&kind.service)?;
            return match client.get("router_interfaces", &interface_id).await {
                Ok(_) => Ok(false),
                Err(e) if crate::error::is_not_found(&e) => Ok(true),
                Err(e) => Err(e),
            };
        }
        CollectionOps.is_deleted(kind, scope, raw).await
    }
}
