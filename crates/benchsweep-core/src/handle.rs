//! Credential scopes and runtime resource handles
//!
//! A [`ResourceScope`] pairs the clients a pipeline pass runs under with
//! the tenant it is visiting. A [`ResourceHandle`] is one discovered
//! resource bound to the scope it was listed from; every operation on the
//! resource goes through exactly one side of the scope, chosen by the
//! kind's `admin_required` flag.

use std::sync::Arc;

use crate::clients::ClientProvider;
use crate::error::BackendError;
use crate::resource::RawResource;

/// The credential scope one discovery pass and its deletions run under.
#[derive(Clone)]
pub struct ResourceScope {
    /// Admin-side clients, when the job has admin credentials
    pub admin: Option<Arc<dyn ClientProvider>>,
    /// User-side clients for the tenant user being visited
    pub user: Option<Arc<dyn ClientProvider>>,
    /// Tenant the pass is narrowed to, if any
    pub tenant_id: Option<String>,
}

impl ResourceScope {
    /// Scope that only carries admin clients (admin-wide passes).
    pub fn admin_only(admin: Arc<dyn ClientProvider>) -> Self {
        Self {
            admin: Some(admin),
            user: None,
            tenant_id: None,
        }
    }

    /// Scope for one tenant user, optionally carrying admin clients for
    /// admin-required kinds.
    pub fn for_user(
        admin: Option<Arc<dyn ClientProvider>>,
        user: Arc<dyn ClientProvider>,
        tenant_id: Option<String>,
    ) -> Self {
        Self {
            admin,
            user: Some(user),
            tenant_id,
        }
    }

    /// The provider all operations for a kind must use.
    ///
    /// Admin-required kinds act through the admin clients, everything else
    /// through the user clients; a handle never mixes the two.
    pub fn provider(&self, admin_required: bool) -> Result<&Arc<dyn ClientProvider>, BackendError> {
        if admin_required {
            self.admin
                .as_ref()
                .ok_or(BackendError::MissingCredential("admin"))
        } else {
            self.user
                .as_ref()
                .ok_or(BackendError::MissingCredential("user"))
        }
    }
}

impl std::fmt::Debug for ResourceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceScope")
            .field("admin", &self.admin.is_some())
            .field("user", &self.user.is_some())
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// One discovered resource queued for filtering and deletion.
#[derive(Debug, Clone)]
pub struct ResourceHandle {
    /// Scope the resource was listed from
    pub scope: Arc<ResourceScope>,
    /// The resource itself
    pub raw: RawResource,
}
