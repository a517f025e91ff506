//! Built-in resource kind declarations
//!
//! One module per backend service family, each registering its kinds
//! with the execution order, scope flags, and retry tuning that family
//! needs. Registration is explicit: call [`register_builtin`] once at
//! process start.

pub mod blockstorage;
pub mod compute;
pub mod dns;
pub mod network;
pub mod objectstorage;

use crate::error::RegistryError;
use crate::registry::Registry;

/// Register every built-in kind.
pub fn register_builtin(registry: &mut Registry) -> Result<(), RegistryError> {
    compute::register(registry)?;
    network::register(registry)?;
    blockstorage::register(registry)?;
    objectstorage::register(registry)?;
    dns::register(registry)?;
    Ok(())
}
