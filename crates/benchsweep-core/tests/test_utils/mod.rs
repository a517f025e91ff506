//! Shared helpers for engine integration tests
#![allow(dead_code)] // not every test binary uses every helper

use std::sync::Arc;
use std::time::Duration;

use benchsweep_core::{CleanupEngine, GeneratedNameMatcher, KindDescriptor, Registry};
use benchsweep_test_utils::FakeCloud;

/// Build an engine over the fake cloud with the generated-name oracle.
pub fn engine_with(cloud: &FakeCloud, registry: Registry) -> CleanupEngine {
    CleanupEngine::new(
        Arc::new(registry),
        Arc::new(cloud.clone()),
        Arc::new(GeneratedNameMatcher),
    )
}

/// A descriptor with test-friendly poll/timeout tuning.
pub fn fast_kind(service: &str, resource: &str, order: u32) -> KindDescriptor {
    KindDescriptor::new(service, resource, order)
        .poll_interval(Duration::from_millis(20))
        .delete_timeout(Duration::from_millis(500))
}
