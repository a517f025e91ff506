//! In-memory fake cloud backend
//!
//! Implements the engine's client capability surface against shared
//! in-memory state, with failure injection and a call log so tests can
//! assert exactly which backend calls cleanup made (and, just as
//! important, which it did not).

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use benchsweep_core::{
    BackendError, ClientProvider, Credential, ProviderFactory, RawResource, ServiceClient,
};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    List {
        service: String,
        collection: String,
        user: String,
    },
    Get {
        service: String,
        collection: String,
        id: String,
    },
    Delete {
        service: String,
        collection: String,
        id: String,
        user: String,
    },
}

type CollectionKey = (String, String);

#[derive(Default)]
struct CloudState {
    collections: HashMap<CollectionKey, Vec<RawResource>>,
    events: Vec<Event>,
    /// Collections whose delete call always errors
    fail_deletes: HashSet<CollectionKey>,
    /// Collections whose get call always errors
    fail_gets: HashSet<CollectionKey>,
    /// Resources whose delete is accepted but that never disappear
    sticky: HashSet<(String, String, String)>,
    /// Remaining injected list failures per collection
    list_failures: HashMap<CollectionKey, u32>,
}

/// Shared fake cloud. Clones share state; keep one clone in the test for
/// assertions and hand another to the engine as its provider factory.
#[derive(Clone, Default)]
pub struct FakeCloud {
    state: Arc<Mutex<CloudState>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource to a collection.
    pub fn seed(&self, service: &str, collection: &str, resource: RawResource) {
        let mut state = self.state.lock().unwrap();
        state
            .collections
            .entry(key(service, collection))
            .or_default()
            .push(resource);
    }

    /// Resources still present in a collection.
    pub fn remaining(&self, service: &str, collection: &str) -> Vec<RawResource> {
        let state = self.state.lock().unwrap();
        state
            .collections
            .get(&key(service, collection))
            .cloned()
            .unwrap_or_default()
    }

    /// Every backend call made so far, in order.
    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    /// How many list calls hit a collection.
    pub fn list_count(&self, service: &str, collection: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| {
                matches!(e, Event::List { service: s, collection: c, .. }
                    if s == service && c == collection)
            })
            .count()
    }

    /// How many delete calls were attempted against one resource id.
    pub fn delete_attempts(&self, id: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Delete { id: i, .. } if i == id))
            .count()
    }

    /// Ids of every resource a delete call was attempted against.
    pub fn deleted_ids(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                Event::Delete { id, .. } => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Make every delete in a collection fail.
    pub fn fail_deletes(&self, service: &str, collection: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_deletes
            .insert(key(service, collection));
    }

    /// Make every get in a collection fail.
    pub fn fail_gets(&self, service: &str, collection: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_gets
            .insert(key(service, collection));
    }

    /// Accept deletes for a resource but never remove it.
    pub fn stick(&self, service: &str, collection: &str, id: &str) {
        self.state.lock().unwrap().sticky.insert((
            service.to_string(),
            collection.to_string(),
            id.to_string(),
        ));
    }

    /// Fail the next `times` list calls against a collection.
    pub fn fail_lists(&self, service: &str, collection: &str, times: u32) {
        self.state
            .lock()
            .unwrap()
            .list_failures
            .insert(key(service, collection), times);
    }
}

impl ProviderFactory for FakeCloud {
    fn provider(&self, credential: &Credential) -> Arc<dyn ClientProvider> {
        Arc::new(FakeProvider {
            state: Arc::clone(&self.state),
            credential: credential.clone(),
        })
    }
}

struct FakeProvider {
    state: Arc<Mutex<CloudState>>,
    credential: Credential,
}

impl ClientProvider for FakeProvider {
    fn service(&self, name: &str) -> Result<Arc<dyn ServiceClient>> {
        Ok(Arc::new(FakeServiceClient {
            state: Arc::clone(&self.state),
            credential: self.credential.clone(),
            service: name.to_string(),
        }))
    }
}

struct FakeServiceClient {
    state: Arc<Mutex<CloudState>>,
    credential: Credential,
    service: String,
}

#[async_trait]
impl ServiceClient for FakeServiceClient {
    async fn list(&self, collection: &str, tenant_id: Option<&str>) -> Result<Vec<RawResource>> {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::List {
            service: self.service.clone(),
            collection: collection.to_string(),
            user: self.credential.user.clone(),
        });

        let k = key(&self.service, collection);
        if let Some(remaining) = state.list_failures.get_mut(&k) {
            if *remaining > 0 {
                *remaining -= 1;
                anyhow::bail!("injected list failure");
            }
        }

        let resources = state.collections.get(&k).cloned().unwrap_or_default();
        Ok(resources
            .into_iter()
            .filter(|r| visible_to_tenant(r, tenant_id))
            .collect())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<RawResource> {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::Get {
            service: self.service.clone(),
            collection: collection.to_string(),
            id: id.to_string(),
        });

        let k = key(&self.service, collection);
        if state.fail_gets.contains(&k) {
            anyhow::bail!("injected probe failure");
        }
        state
            .collections
            .get(&k)
            .and_then(|resources| resources.iter().find(|r| r.id == id))
            .cloned()
            .ok_or_else(|| BackendError::not_found(collection, id).into())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::Delete {
            service: self.service.clone(),
            collection: collection.to_string(),
            id: id.to_string(),
            user: self.credential.user.clone(),
        });

        let k = key(&self.service, collection);
        if state.fail_deletes.contains(&k) {
            anyhow::bail!("injected delete failure");
        }
        if state
            .sticky
            .contains(&(self.service.clone(), collection.to_string(), id.to_string()))
        {
            return Ok(());
        }

        let resources = state
            .collections
            .get_mut(&k)
            .ok_or_else(|| anyhow::Error::new(BackendError::not_found(collection, id)))?;
        let pos = resources
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| anyhow::Error::new(BackendError::not_found(collection, id)))?;
        resources.remove(pos);
        Ok(())
    }
}

fn key(service: &str, collection: &str) -> CollectionKey {
    (service.to_string(), collection.to_string())
}

/// A resource is visible to a tenant-narrowed list when it carries no
/// tenant marker or the marker matches.
fn visible_to_tenant(resource: &RawResource, tenant_id: Option<&str>) -> bool {
    let Some(tenant) = tenant_id else {
        return true;
    };
    match resource.attrs.get("tenant_id").and_then(|v| v.as_str()) {
        Some(owner) => owner == tenant,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(cloud: &FakeCloud, user: &str) -> Arc<dyn ServiceClient> {
        cloud
            .provider(&Credential::new(user))
            .service("compute")
            .unwrap()
    }

    #[tokio::test]
    async fn list_and_delete_round_trip() {
        let cloud = FakeCloud::new();
        cloud.seed("compute", "servers", RawResource::named("srv-1", "a"));

        let client = client(&cloud, "alice");
        let listed = client.list("servers", None).await.unwrap();
        assert_eq!(listed.len(), 1);

        client.delete("servers", "srv-1").await.unwrap();
        assert!(cloud.remaining("compute", "servers").is_empty());

        let err = client.delete("servers", "srv-1").await.unwrap_err();
        assert!(benchsweep_core::error::is_not_found(&err));
    }

    #[tokio::test]
    async fn tenant_narrowing() {
        let cloud = FakeCloud::new();
        cloud.seed(
            "compute",
            "servers",
            RawResource::named("srv-1", "a")
                .with_attrs(serde_json::json!({"tenant_id": "t-1"})),
        );
        cloud.seed(
            "compute",
            "servers",
            RawResource::named("srv-2", "b")
                .with_attrs(serde_json::json!({"tenant_id": "t-2"})),
        );

        let client = client(&cloud, "alice");
        let t1 = client.list("servers", Some("t-1")).await.unwrap();
        assert_eq!(t1.len(), 1);
        assert_eq!(t1[0].id, "srv-1");

        let all = client.list("servers", None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn injected_list_failures_run_out() {
        let cloud = FakeCloud::new();
        cloud.seed("compute", "servers", RawResource::named("srv-1", "a"));
        cloud.fail_lists("compute", "servers", 2);

        let client = client(&cloud, "alice");
        assert!(client.list("servers", None).await.is_err());
        assert!(client.list("servers", None).await.is_err());
        assert_eq!(client.list("servers", None).await.unwrap().len(), 1);
        assert_eq!(cloud.list_count("compute", "servers"), 3);
    }

    #[tokio::test]
    async fn sticky_resources_survive_delete() {
        let cloud = FakeCloud::new();
        cloud.seed("compute", "servers", RawResource::named("srv-1", "a"));
        cloud.stick("compute", "servers", "srv-1");

        let client = client(&cloud, "alice");
        client.delete("servers", "srv-1").await.unwrap();
        assert_eq!(cloud.remaining("compute", "servers").len(), 1);
        assert_eq!(cloud.delete_attempts("srv-1"), 1);
    }
}
