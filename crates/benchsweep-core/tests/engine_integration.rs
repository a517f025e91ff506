//! End-to-end engine behavior against the fake cloud: ownership safety,
//! idempotence, and the job-level scoping rules.

mod test_utils;

use std::sync::Arc;

use benchsweep_core::kind::order;
use benchsweep_core::ops::CollectionOps;
use benchsweep_core::{CleanupJob, Credential, RawResource, Registry};
use benchsweep_test_utils::{FakeCloud, init_test_logging, test_task_id};
use chrono::Utc;

use test_utils::{engine_with, fast_kind};

fn named(id: &str, task: &str, suffix: &str) -> RawResource {
    RawResource::named(id, benchsweep_core::naming::generate_name(task, suffix))
}

fn servers_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register(fast_kind("compute", "servers", order::COMPUTE), Arc::new(CollectionOps))
        .unwrap();
    registry
}

#[tokio::test]
async fn cleanup_is_idempotent() {
    init_test_logging();
    let task = test_task_id();
    let cloud = FakeCloud::new();
    for i in 0..3 {
        cloud.seed(
            "compute",
            "servers",
            named(&format!("srv-{i}"), &task, &format!("s{i}")),
        );
    }

    let engine = engine_with(&cloud, servers_registry());
    let job = CleanupJob::new().user(Credential::new("alice")).task_id(&task);

    let first = engine.cleanup(&job).await;
    assert_eq!(first.total_found(), 3);
    assert_eq!(first.total_deleted(), 3);
    assert!(cloud.remaining("compute", "servers").is_empty());

    let second = engine.cleanup(&job).await;
    assert_eq!(second.total_found(), 0);
    assert_eq!(second.total_deleted(), 0);
    // No resource saw a second delete call.
    for i in 0..3 {
        assert_eq!(cloud.delete_attempts(&format!("srv-{i}")), 1);
    }
}

#[tokio::test]
async fn unrelated_resources_are_never_deleted() {
    init_test_logging();
    let task = test_task_id();
    let cloud = FakeCloud::new();
    cloud.seed("compute", "servers", named("srv-ours", &task, "a"));
    cloud.seed(
        "compute",
        "servers",
        RawResource::named("srv-prod", "prod-db-primary"),
    );
    cloud.seed(
        "compute",
        "servers",
        named("srv-other-task", "someothertask", "a"),
    );

    let engine = engine_with(&cloud, servers_registry());
    let report = engine
        .cleanup(&CleanupJob::new().user(Credential::new("alice")).task_id(&task))
        .await;

    let kind = report.kind("compute.servers").unwrap();
    assert_eq!(kind.found, 3);
    assert_eq!(kind.deleted, 1);
    assert_eq!(kind.filtered_out, 2);

    let deleted = cloud.deleted_ids();
    assert_eq!(deleted, ["srv-ours"]);
    let remaining: Vec<String> = cloud
        .remaining("compute", "servers")
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert!(remaining.contains(&"srv-prod".to_string()));
    assert!(remaining.contains(&"srv-other-task".to_string()));
}

#[tokio::test]
async fn unnamed_resources_fall_under_delete_by_convention() {
    init_test_logging();
    let cloud = FakeCloud::new();
    cloud.seed("compute", "servers", RawResource::new("srv-anon"));

    let engine = engine_with(&cloud, servers_registry());
    let report = engine
        .cleanup(&CleanupJob::new().user(Credential::new("alice")).task_id("task1"))
        .await;

    assert_eq!(report.total_deleted(), 1);
    assert!(cloud.remaining("compute", "servers").is_empty());
}

#[tokio::test]
async fn empty_job_completes_without_backend_calls() {
    init_test_logging();
    let cloud = FakeCloud::new();
    cloud.seed("compute", "servers", RawResource::new("srv-1"));

    let engine = engine_with(&cloud, servers_registry());
    let report = engine.cleanup(&CleanupJob::new()).await;

    assert_eq!(report.total_found(), 0);
    assert_eq!(report.total_deleted(), 0);
    assert!(cloud.events().is_empty(), "no listing or deletion calls");
}

#[tokio::test]
async fn unknown_kind_names_are_nonfatal() {
    init_test_logging();
    let cloud = FakeCloud::new();
    cloud.seed("compute", "servers", RawResource::new("srv-1"));

    let engine = engine_with(&cloud, servers_registry());
    let report = engine
        .cleanup(
            &CleanupJob::new()
                .user(Credential::new("alice"))
                .name("nosuchservice"),
        )
        .await;

    assert!(report.kinds.is_empty());
    assert!(cloud.events().is_empty());
}

#[tokio::test]
async fn admin_kind_without_admin_credentials_is_skipped() {
    init_test_logging();
    let mut registry = Registry::new();
    registry
        .register(
            fast_kind("blockstorage", "quotas", order::BLOCK_STORAGE).admin_required(),
            Arc::new(CollectionOps),
        )
        .unwrap();

    let cloud = FakeCloud::new();
    cloud.seed("blockstorage", "quotas", RawResource::new("t-1"));

    let engine = engine_with(&cloud, registry);
    let report = engine
        .cleanup(&CleanupJob::new().user(Credential::new("alice")))
        .await;

    assert_eq!(report.total_found(), 0);
    assert!(cloud.events().is_empty());
    assert_eq!(cloud.remaining("blockstorage", "quotas").len(), 1);
}

#[tokio::test]
async fn dry_run_deletes_nothing() {
    init_test_logging();
    let task = test_task_id();
    let cloud = FakeCloud::new();
    cloud.seed("compute", "servers", named("srv-1", &task, "a"));
    cloud.seed("compute", "servers", named("srv-2", &task, "b"));

    let engine = engine_with(&cloud, servers_registry());
    let report = engine
        .cleanup(
            &CleanupJob::new()
                .user(Credential::new("alice"))
                .task_id(&task)
                .dry_run(),
        )
        .await;

    let kind = report.kind("compute.servers").unwrap();
    assert_eq!(kind.found, 2);
    assert_eq!(kind.skipped, 2);
    assert_eq!(kind.deleted, 0);
    assert!(cloud.deleted_ids().is_empty());
    assert_eq!(cloud.remaining("compute", "servers").len(), 2);
}

#[tokio::test]
async fn grace_period_spares_fresh_resources() {
    init_test_logging();
    let task = test_task_id();
    let cloud = FakeCloud::new();
    cloud.seed(
        "compute",
        "servers",
        named("srv-old", &task, "a").with_created_at(Utc::now() - chrono::Duration::hours(2)),
    );
    cloud.seed(
        "compute",
        "servers",
        named("srv-new", &task, "b").with_created_at(Utc::now() - chrono::Duration::seconds(5)),
    );

    let engine = engine_with(&cloud, servers_registry());
    let report = engine
        .cleanup(
            &CleanupJob::new()
                .user(Credential::new("alice"))
                .task_id(&task)
                .min_age(chrono::Duration::minutes(10)),
        )
        .await;

    let kind = report.kind("compute.servers").unwrap();
    assert_eq!(kind.deleted, 1);
    assert_eq!(kind.filtered_out, 1);
    assert_eq!(cloud.deleted_ids(), ["srv-old"]);
}
