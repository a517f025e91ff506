//! Resource naming convention and ownership oracle
//!
//! Every resource the benchmark generators create is named
//! `bsweep_<task>_<suffix>`, which is what lets cleanup tell its own
//! resources apart from everything else living in the same account.
//!
//! The pipeline only depends on the [`NameMatcher`] trait; deployments
//! with their own naming scheme supply their own oracle.

/// Prefix carried by every generated resource name.
pub const NAME_PREFIX: &str = "bsweep";

/// Build a resource name owned by the given task.
pub fn generate_name(task_id: &str, suffix: &str) -> String {
    format!("{NAME_PREFIX}_{task_id}_{suffix}")
}

/// Decides whether a display name marks a resource as created by the
/// benchmark run being cleaned.
pub trait NameMatcher: Send + Sync {
    /// `task_id`, when present, narrows ownership to one task; without it
    /// any benchmark-generated name matches.
    fn matches(&self, name: &str, task_id: Option<&str>) -> bool;
}

/// Matcher for names produced by [`generate_name`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratedNameMatcher;

impl NameMatcher for GeneratedNameMatcher {
    fn matches(&self, name: &str, task_id: Option<&str>) -> bool {
        let Some(rest) = name.strip_prefix(NAME_PREFIX) else {
            return false;
        };
        let Some(rest) = rest.strip_prefix('_') else {
            return false;
        };
        match task_id {
            Some(task) => rest
                .strip_prefix(task)
                .is_some_and(|tail| tail.starts_with('_')),
            None => true,
        }
    }
}
