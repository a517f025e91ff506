//! Error classification for registry and backend operations
//!
//! Backend adapters surface errors as `anyhow::Error`; the engine only
//! needs to recognize a few categories (not-found, throttled, in-use).
//! Adapters that return a typed [`BackendError`] are classified by
//! downcast; anything else falls back to code extraction from the error
//! chain's debug representation.

use thiserror::Error;

/// Errors raised while building the kind registry.
///
/// These are the only errors that abort the process; they surface at
/// registration time, before any cleanup job runs.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A kind with the same (service, resource) pair is already registered
    #[error("resource kind {service}.{resource} is already registered")]
    DuplicateKind { service: String, resource: String },

    /// The descriptor fails basic sanity checks
    #[error("invalid descriptor for {kind}: {reason}")]
    InvalidDescriptor { kind: String, reason: String },
}

/// Backend error categories the engine reacts to.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Resource does not exist (safe to treat as already deleted)
    #[error("{collection} '{id}' not found")]
    NotFound { collection: String, id: String },

    /// Rate limit exceeded (retryable)
    #[error("rate limit exceeded")]
    Throttled,

    /// Resource still has dependent objects (retryable)
    #[error("resource has dependent objects")]
    InUse,

    /// The scope lacks the credential side this operation needs
    #[error("no {0} credentials available in this scope")]
    MissingCredential(&'static str),

    /// Generic backend failure with an optional vendor error code
    #[error("backend error: {message}")]
    Api {
        code: Option<String>,
        message: String,
    },
}

impl BackendError {
    /// Convenience constructor for not-found conditions.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        BackendError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Check if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound { .. })
    }

    /// Check if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BackendError::Throttled | BackendError::InUse)
    }
}

/// Error-code fragments that indicate a missing resource.
///
/// Used as a fallback when an adapter wraps its vendor SDK error instead
/// of returning a typed [`BackendError`].
const NOT_FOUND_CODES: &[&str] = &[
    "NotFound",
    "NoSuchEntity",
    "NoSuchContainer",
    "NoSuchKey",
    "ItemNotFound",
    "ResourceGone",
];

/// Error-code fragments that indicate throttling.
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "TooManyRequests",
    "RequestLimitExceeded",
    "RateLimited",
];

/// Find a typed [`BackendError`] anywhere in an error chain.
pub fn find_backend_error(error: &anyhow::Error) -> Option<&BackendError> {
    error.chain().find_map(|c| c.downcast_ref::<BackendError>())
}

/// Check if an error means the resource no longer exists.
pub fn is_not_found(error: &anyhow::Error) -> bool {
    if let Some(backend) = find_backend_error(error) {
        return backend.is_not_found();
    }
    let debug_str = format!("{error:?}");
    NOT_FOUND_CODES.iter().any(|c| debug_str.contains(c))
}

/// Check if an error looks transient enough that retrying may succeed.
pub fn is_retryable(error: &anyhow::Error) -> bool {
    if let Some(backend) = find_backend_error(error) {
        return backend.is_retryable();
    }
    let debug_str = format!("{error:?}");
    THROTTLING_CODES.iter().any(|c| debug_str.contains(c))
}
