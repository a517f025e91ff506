//! Unique id generation for tests

use chrono::Utc;

/// Generate a unique task id for test resources.
///
/// Format: `task{timestamp_ms}x{counter}`, unique even when tests start
/// simultaneously.
pub fn test_task_id() -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let ts = Utc::now().timestamp_millis();
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("task{ts}x{counter}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_unique() {
        let id1 = test_task_id();
        let id2 = test_task_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_task_id_has_no_separator_clashes() {
        // Task ids are embedded in `<prefix>_<task>_<suffix>` names, so
        // they must not contain underscores themselves.
        assert!(!test_task_id().contains('_'));
    }
}
