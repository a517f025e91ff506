//! Cleanup job description
//!
//! A [`CleanupJob`] is everything one cleanup invocation needs: the
//! credentials to act with, which kinds to visit, and how to decide
//! ownership. Built by the surrounding task-execution context after a
//! benchmark run (or for an explicit admin/user cleanup).

use std::collections::BTreeSet;

use crate::clients::Credential;

/// One cleanup invocation.
#[derive(Debug, Clone, Default)]
pub struct CleanupJob {
    /// Admin credentials, required for admin-scoped kinds
    pub admin: Option<Credential>,
    /// Tenant user credentials; drives per-user and per-tenant passes
    pub users: Vec<Credential>,
    /// Kind names to clean (`service` or `service.resource`); empty means
    /// every registered kind
    pub names: BTreeSet<String>,
    /// Restrict to kinds with a matching `admin_required` flag
    pub admin_required: Option<bool>,
    /// Narrow ownership to one task's resources
    pub task_id: Option<String>,
    /// Log what would be deleted without calling delete
    pub dry_run: bool,
    /// Skip resources created more recently than this
    pub min_age: Option<chrono::Duration>,
}

impl CleanupJob {
    /// Create an empty job.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the admin credentials.
    pub fn admin(mut self, credential: Credential) -> Self {
        self.admin = Some(credential);
        self
    }

    /// Add one tenant user.
    pub fn user(mut self, credential: Credential) -> Self {
        self.users.push(credential);
        self
    }

    /// Add several tenant users.
    pub fn users(mut self, credentials: impl IntoIterator<Item = Credential>) -> Self {
        self.users.extend(credentials);
        self
    }

    /// Request one kind by `service` or `service.resource` name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.names.insert(name.into());
        self
    }

    /// Only clean kinds whose `admin_required` flag matches.
    pub fn admin_required(mut self, admin_required: bool) -> Self {
        self.admin_required = Some(admin_required);
        self
    }

    /// Only delete resources owned by this task.
    pub fn task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Log instead of deleting.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Leave resources younger than the grace period alone.
    pub fn min_age(mut self, min_age: chrono::Duration) -> Self {
        self.min_age = Some(min_age);
        self
    }
}
