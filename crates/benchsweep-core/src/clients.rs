//! Credential-scoped backend clients
//!
//! The engine never talks to a vendor SDK directly. A [`ProviderFactory`]
//! turns a [`Credential`] into a [`ClientProvider`], which hands out one
//! [`ServiceClient`] per backend service. Providers are cached per
//! credential for the life of a cleanup job, so repeated lookups for the
//! same credential reuse the same client instances.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::resource::RawResource;

/// An API credential, either the admin's or a tenant user's.
///
/// Equality and hashing drive provider caching: two credentials that
/// compare equal share one client provider within a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Credential {
    /// Identity this credential authenticates as
    pub user: String,
    /// Tenant (project) the credential is scoped to, if any
    pub tenant_id: Option<String>,
    /// API endpoint the credential is valid against
    pub endpoint: Option<String>,
}

impl Credential {
    /// Create a credential for the given identity.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            tenant_id: None,
            endpoint: None,
        }
    }

    /// Scope the credential to a tenant.
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Pin the credential to an endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

/// Minimal call surface of one backend service's resource collections.
///
/// Adapters implement this against their vendor SDK. Kinds with bespoke
/// needs (pagination markers, composite deletes) override the relevant
/// [`ResourceOps`](crate::ops::ResourceOps) methods instead of widening
/// this trait.
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// List resources in a collection, optionally narrowed to a tenant.
    async fn list(&self, collection: &str, tenant_id: Option<&str>) -> Result<Vec<RawResource>>;

    /// Fetch a single resource by id.
    ///
    /// A missing resource is an error classified as not-found (see
    /// [`crate::error::is_not_found`]), not an `Ok` value.
    async fn get(&self, collection: &str, id: &str) -> Result<RawResource>;

    /// Delete a resource by id.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}

/// Per-credential bundle of service clients.
pub trait ClientProvider: Send + Sync {
    /// Get the client for a named backend service.
    fn service(&self, name: &str) -> Result<Arc<dyn ServiceClient>>;
}

/// Builds a [`ClientProvider`] for a credential.
///
/// Implemented by the surrounding benchmark context; the engine wraps it
/// in a [`CachingProviderFactory`] per job.
pub trait ProviderFactory: Send + Sync {
    fn provider(&self, credential: &Credential) -> Arc<dyn ClientProvider>;
}

/// Caches one provider per credential.
///
/// Construction of a provider may be expensive (auth round trips, config
/// loading); within one cleanup job every scope that shares a credential
/// shares the provider.
pub struct CachingProviderFactory {
    inner: Arc<dyn ProviderFactory>,
    cache: Mutex<HashMap<Credential, Arc<dyn ClientProvider>>>,
}

impl CachingProviderFactory {
    /// Wrap a factory with a per-credential cache.
    pub fn new(inner: Arc<dyn ProviderFactory>) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Get the cached provider for a credential, constructing it on first
    /// use.
    pub fn provider(&self, credential: &Credential) -> Arc<dyn ClientProvider> {
        let mut cache = self.cache.lock().unwrap();
        if let Some(provider) = cache.get(credential) {
            return Arc::clone(provider);
        }
        let provider = self.inner.provider(credential);
        cache.insert(credential.clone(), Arc::clone(&provider));
        provider
    }
}

impl std::fmt::Debug for CachingProviderFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self.cache.lock().unwrap().len();
        f.debug_struct("CachingProviderFactory")
            .field("cached", &cached)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullProvider;

    impl ClientProvider for NullProvider {
        fn service(&self, name: &str) -> Result<Arc<dyn ServiceClient>> {
            anyhow::bail!("no such service: {name}")
        }
    }

    struct CountingFactory {
        built: AtomicUsize,
    }

    impl ProviderFactory for CountingFactory {
        fn provider(&self, _credential: &Credential) -> Arc<dyn ClientProvider> {
            self.built.fetch_add(1, Ordering::SeqCst);
            Arc::new(NullProvider)
        }
    }

    #[test]
    fn caches_per_credential() {
        let factory = Arc::new(CountingFactory {
            built: AtomicUsize::new(0),
        });
        let caching = CachingProviderFactory::new(Arc::clone(&factory) as Arc<dyn ProviderFactory>);

        let alice = Credential::new("alice").with_tenant("t-1");
        let bob = Credential::new("bob").with_tenant("t-1");

        let p1 = caching.provider(&alice);
        let p2 = caching.provider(&alice.clone());
        assert!(Arc::ptr_eq(&p1, &p2), "same credential shares a provider");
        assert_eq!(factory.built.load(Ordering::SeqCst), 1);

        let _p3 = caching.provider(&bob);
        assert_eq!(factory.built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn credential_builder() {
        let cred = Credential::new("alice")
            .with_tenant("t-1")
            .with_endpoint("https://api.example.test");
        assert_eq!(cred.user, "alice");
        assert_eq!(cred.tenant_id.as_deref(), Some("t-1"));
        assert_eq!(cred.endpoint.as_deref(), Some("https://api.example.test"));
    }
}
