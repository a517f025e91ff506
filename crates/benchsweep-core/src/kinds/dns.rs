//! DNS service kinds
//!
//! The DNS backend serializes zone mutations server-side and rejects
//! concurrent changes to one zone, so both kinds run single-worker.

use std::sync::Arc;

use crate::error::RegistryError;
use crate::kind::{KindDescriptor, order};
use crate::ops::CollectionOps;
use crate::registry::Registry;

/// Owning service name.
pub const SERVICE: &str = "dns";

/// Register DNS kinds.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(
        KindDescriptor::new(SERVICE, "recordsets", order::DNS).workers(1),
        Arc::new(CollectionOps),
    )?;
    registry.register(
        KindDescriptor::new(SERVICE, "zones", order::DNS + 10).workers(1),
        Arc::new(CollectionOps),
    )?;
    Ok(())
}
