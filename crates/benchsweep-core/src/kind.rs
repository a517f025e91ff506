//! Resource kind descriptors and cleanup ordering
//!
//! Each deletable resource category is declared as a [`KindDescriptor`]:
//! which service owns it, how aggressively to delete it, and where it sits
//! in the cross-kind execution order. Kinds run in ascending order so that
//! dependent resources are removed before their parents (router interfaces
//! before routers, objects before containers).

use std::time::Duration;

use crate::error::RegistryError;

/// Execution-order bands, grouped per backend service family.
///
/// Bands leave room for insertions: a new networking kind that must run
/// between ports and routers gets 315 without renumbering anything.
pub mod order {
    /// Compute resources (servers, keypairs)
    pub const COMPUTE: u32 = 100;
    /// Networking resources (floating IPs, ports, routers, networks)
    pub const NETWORK: u32 = 300;
    /// Block storage resources (snapshots, backups, volumes, quotas)
    pub const BLOCK_STORAGE: u32 = 400;
    /// Object storage resources (objects, containers)
    pub const OBJECT_STORAGE: u32 = 500;
    /// DNS resources (recordsets, zones)
    pub const DNS: u32 = 600;
}

/// Declaration of one deletable resource category.
///
/// Declared once at process start when the kind is registered; immutable
/// afterwards. The `(service, resource)` pair must be unique per registry.
#[derive(Debug, Clone)]
pub struct KindDescriptor {
    /// Owning backend service name (e.g. "compute")
    pub service: String,
    /// Resource collection name within the service (e.g. "servers")
    pub resource: String,
    /// Cross-kind execution order, lower runs first
    pub order: u32,
    /// Listing and deletion require admin credentials
    pub admin_required: bool,
    /// Only ever clean this kind from the admin scope, even when tenant
    /// users are available
    pub admin_only: bool,
    /// One list/delete pass per tenant instead of one per user
    pub tenant_scoped: bool,
    /// Delete attempts before the resource is abandoned
    pub max_attempts: u32,
    /// How long to wait for the backend to confirm disappearance
    pub delete_timeout: Duration,
    /// Interval between disappearance probes
    pub poll_interval: Duration,
    /// Concurrent deletion workers for this kind
    pub workers: usize,
}

impl KindDescriptor {
    /// Create a descriptor with default retry/timeout/concurrency tuning.
    pub fn new(service: impl Into<String>, resource: impl Into<String>, order: u32) -> Self {
        Self {
            service: service.into(),
            resource: resource.into(),
            order,
            admin_required: false,
            admin_only: false,
            tenant_scoped: false,
            max_attempts: 3,
            delete_timeout: Duration::from_secs(600),
            poll_interval: Duration::from_secs(1),
            workers: 10,
        }
    }

    /// Require admin credentials for listing and deletion.
    pub fn admin_required(mut self) -> Self {
        self.admin_required = true;
        self
    }

    /// Always clean from the admin scope only.
    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    /// Visit each tenant once instead of each user.
    pub fn tenant_scoped(mut self) -> Self {
        self.tenant_scoped = true;
        self
    }

    /// Set the delete attempt budget.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the disappearance-confirmation timeout.
    pub fn delete_timeout(mut self, delete_timeout: Duration) -> Self {
        self.delete_timeout = delete_timeout;
        self
    }

    /// Set the disappearance probe interval.
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the worker pool size for this kind.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Fully qualified kind name, `service.resource`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.service, self.resource)
    }

    pub(crate) fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidDescriptor {
            kind: self.qualified_name(),
            reason: reason.to_string(),
        };
        if self.service.is_empty() {
            return Err(invalid("service name is empty"));
        }
        if self.resource.is_empty() {
            return Err(invalid("resource name is empty"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts must be at least 1"));
        }
        if self.workers == 0 {
            return Err(invalid("workers must be at least 1"));
        }
        if self.poll_interval.is_zero() {
            return Err(invalid("poll_interval must be non-zero"));
        }
        Ok(())
    }
}
