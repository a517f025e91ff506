//! Raw backend resource representation
//!
//! A [`RawResource`] is the opaque handle a backend's list call returns.
//! Only the identifier is mandatory; everything else depends on what the
//! backend exposes for that collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// States a backend reports once a resource is fully deleted.
///
/// Backends disagree on spelling; all of these mean "gone" when returned
/// from a get call instead of a not-found error.
pub const TERMINAL_STATES: &[&str] = &["DELETED", "DELETE_COMPLETE", "deleted"];

/// Opaque resource handle returned by a backend list call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResource {
    /// Backend identifier, always present
    pub id: String,
    /// Display name, if the collection has one
    pub name: Option<String>,
    /// Lifecycle state as reported by the backend
    pub state: Option<String>,
    /// Creation timestamp, if the backend reports one
    pub created_at: Option<DateTime<Utc>>,
    /// Remaining backend-specific payload
    #[serde(default)]
    pub attrs: serde_json::Value,
}

impl RawResource {
    /// Create a resource with only an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            state: None,
            created_at: None,
            attrs: serde_json::Value::Null,
        }
    }

    /// Create a resource with an identifier and display name.
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(id)
        }
    }

    /// Set the lifecycle state.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Attach backend-specific payload.
    pub fn with_attrs(mut self, attrs: serde_json::Value) -> Self {
        self.attrs = attrs;
        self
    }

    /// Whether the reported state means the backend finished deleting this
    /// resource.
    pub fn is_in_terminal_state(&self) -> bool {
        self.state
            .as_deref()
            .is_some_and(|s| TERMINAL_STATES.contains(&s))
    }
}
