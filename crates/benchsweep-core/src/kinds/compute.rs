//! Compute service kinds

use std::sync::Arc;
use std::time::Duration;

use crate::error::RegistryError;
use crate::kind::{KindDescriptor, order};
use crate::ops::{CollectionOps, SynchronousOps};
use crate::registry::Registry;

/// Owning service name.
pub const SERVICE: &str = "compute";

/// Register compute kinds.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    // Servers release their ports, volumes, and floating IPs on
    // termination, so they go before everything in later bands.
    registry.register(
        KindDescriptor::new(SERVICE, "servers", order::COMPUTE)
            .delete_timeout(Duration::from_secs(300)),
        Arc::new(CollectionOps),
    )?;

    // Keypair deletion is synchronous; no confirmation poll needed.
    registry.register(
        KindDescriptor::new(SERVICE, "keypairs", order::COMPUTE + 20),
        Arc::new(SynchronousOps),
    )?;

    Ok(())
}
