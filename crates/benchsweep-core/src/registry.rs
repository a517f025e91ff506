//! Kind registry: registration, lookup, and execution ordering
//!
//! Every deletable resource kind is registered explicitly at process
//! start as a descriptor plus its [`ResourceOps`] implementation. The
//! registry answers lookups by `service` or `service.resource` name and
//! always returns kinds in ascending execution order, which is what
//! guarantees dependent resources are deleted before their parents.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;

use crate::error::RegistryError;
use crate::kind::KindDescriptor;
use crate::ops::ResourceOps;

/// A registered kind: its declaration plus its operations.
#[derive(Clone)]
pub struct RegisteredKind {
    pub descriptor: Arc<KindDescriptor>,
    pub ops: Arc<dyn ResourceOps>,
}

impl std::fmt::Debug for RegisteredKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredKind")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// All known resource kinds.
#[derive(Debug, Default)]
pub struct Registry {
    kinds: Vec<RegisteredKind>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one kind.
    ///
    /// Fails on duplicate `(service, resource)` pairs and on descriptors
    /// that do not validate; both are configuration defects and the only
    /// errors in the engine that abort instead of being logged.
    pub fn register(
        &mut self,
        descriptor: KindDescriptor,
        ops: Arc<dyn ResourceOps>,
    ) -> Result<(), RegistryError> {
        descriptor.validate()?;
        if self.kinds.iter().any(|k| {
            k.descriptor.service == descriptor.service && k.descriptor.resource == descriptor.resource
        }) {
            return Err(RegistryError::DuplicateKind {
                service: descriptor.service,
                resource: descriptor.resource,
            });
        }
        self.kinds.push(RegisteredKind {
            descriptor: Arc::new(descriptor),
            ops,
        });
        Ok(())
    }

    /// Resolve kinds by name, in execution order.
    ///
    /// A name matches a kind's `service` or its `service.resource`; an
    /// empty name set selects everything. Names that resolve to nothing
    /// are logged at WARN and otherwise ignored, so a typo in one
    /// requested kind never blocks cleanup of the rest.
    pub fn find(
        &self,
        names: &BTreeSet<String>,
        admin_required: Option<bool>,
    ) -> Vec<&RegisteredKind> {
        if !names.is_empty() {
            let missing: Vec<&str> = names
                .iter()
                .filter(|name| {
                    !self.kinds.iter().any(|k| {
                        k.descriptor.service == **name || k.descriptor.qualified_name() == **name
                    })
                })
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                warn!(
                    missing = ?missing,
                    "Unknown resource kind names requested, continuing without them"
                );
            }
        }

        let mut selected: Vec<&RegisteredKind> = self
            .kinds
            .iter()
            .filter(|k| {
                let name_matches = names.is_empty()
                    || names.contains(&k.descriptor.service)
                    || names.contains(&k.descriptor.qualified_name());
                let admin_matches =
                    admin_required.map_or(true, |a| k.descriptor.admin_required == a);
                name_matches && admin_matches
            })
            .collect();
        selected.sort_by_key(|k| (k.descriptor.order, k.descriptor.qualified_name()));
        selected
    }

    /// Enumerate all addressable names, for discoverability output.
    pub fn list_names(&self, admin_required: Option<bool>) -> BTreeSet<String> {
        self.kinds
            .iter()
            .filter(|k| admin_required.map_or(true, |a| k.descriptor.admin_required == a))
            .flat_map(|k| [k.descriptor.service.clone(), k.descriptor.qualified_name()])
            .collect()
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::order;
    use crate::ops::CollectionOps;

    fn registry_with(kinds: &[(&str, &str, u32, bool)]) -> Registry {
        let mut registry = Registry::new();
        for (service, resource, ord, admin) in kinds {
            let mut descriptor = KindDescriptor::new(*service, *resource, *ord);
            if *admin {
                descriptor = descriptor.admin_required();
            }
            registry.register(descriptor, Arc::new(CollectionOps)).unwrap();
        }
        registry
    }

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = Registry::new();
        registry
            .register(
                KindDescriptor::new("compute", "servers", order::COMPUTE),
                Arc::new(CollectionOps),
            )
            .unwrap();
        let err = registry
            .register(
                KindDescriptor::new("compute", "servers", order::COMPUTE + 1),
                Arc::new(CollectionOps),
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateKind { .. }));
    }

    #[test]
    fn invalid_descriptor_fails() {
        let mut registry = Registry::new();
        let err = registry
            .register(
                KindDescriptor::new("compute", "servers", order::COMPUTE).workers(0),
                Arc::new(CollectionOps),
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDescriptor { .. }));
    }

    #[test]
    fn find_all_sorted_by_order() {
        let registry = registry_with(&[
            ("blockstorage", "volumes", order::BLOCK_STORAGE + 20, false),
            ("compute", "servers", order::COMPUTE, false),
            ("network", "ports", order::NETWORK + 10, false),
        ]);
        let found = registry.find(&BTreeSet::new(), None);
        let ordered: Vec<String> = found
            .iter()
            .map(|k| k.descriptor.qualified_name())
            .collect();
        assert_eq!(
            ordered,
            ["compute.servers", "network.ports", "blockstorage.volumes"]
        );
    }

    #[test]
    fn find_by_service_and_qualified_name() {
        let registry = registry_with(&[
            ("compute", "servers", order::COMPUTE, false),
            ("compute", "keypairs", order::COMPUTE + 20, false),
            ("network", "ports", order::NETWORK, false),
        ]);

        let by_service = registry.find(&names(&["compute"]), None);
        assert_eq!(by_service.len(), 2);

        let by_qualified = registry.find(&names(&["compute.keypairs"]), None);
        assert_eq!(by_qualified.len(), 1);
        assert_eq!(by_qualified[0].descriptor.resource, "keypairs");
    }

    #[test]
    fn unknown_names_are_nonfatal() {
        let registry = registry_with(&[("compute", "servers", order::COMPUTE, false)]);
        let found = registry.find(&names(&["compute", "nosuchservice"]), None);
        assert_eq!(found.len(), 1);

        let none = registry.find(&names(&["nosuchservice"]), None);
        assert!(none.is_empty());
    }

    #[test]
    fn admin_required_filter() {
        let registry = registry_with(&[
            ("compute", "servers", order::COMPUTE, false),
            ("blockstorage", "quotas", order::BLOCK_STORAGE + 30, true),
        ]);
        let admin = registry.find(&BTreeSet::new(), Some(true));
        assert_eq!(admin.len(), 1);
        assert_eq!(admin[0].descriptor.service, "blockstorage");

        let user = registry.find(&BTreeSet::new(), Some(false));
        assert_eq!(user.len(), 1);
        assert_eq!(user[0].descriptor.service, "compute");
    }

    #[test]
    fn list_names_enumerates_both_forms() {
        let registry = registry_with(&[
            ("compute", "servers", order::COMPUTE, false),
            ("blockstorage", "quotas", order::BLOCK_STORAGE + 30, true),
        ]);
        let all = registry.list_names(None);
        assert!(all.contains("compute"));
        assert!(all.contains("compute.servers"));
        assert!(all.contains("blockstorage.quotas"));

        let user_only = registry.list_names(Some(false));
        assert!(user_only.contains("compute.servers"));
        assert!(!user_only.contains("blockstorage.quotas"));
    }
}
