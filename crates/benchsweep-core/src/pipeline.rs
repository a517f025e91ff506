//! Seek-and-destroy pipeline orchestration
//!
//! The [`CleanupEngine`] runs one pipeline per resolved kind, strictly in
//! registry order so cross-kind dependencies hold. Within a kind, a
//! single discovery pass publishes candidates into a bounded queue and a
//! fixed-size worker pool filters and deletes them concurrently. An
//! exception while listing or deleting any single resource never aborts
//! the pipeline, let alone the job; the job always completes and reports
//! what was left behind.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, warn};

use crate::clients::{CachingProviderFactory, ProviderFactory};
use crate::discovery;
use crate::driver;
use crate::filter;
use crate::handle::ResourceHandle;
use crate::job::CleanupJob;
use crate::kind::KindDescriptor;
use crate::naming::NameMatcher;
use crate::ops::ResourceOps;
use crate::registry::{RegisteredKind, Registry};
use crate::report::{CleanupReport, KindReport};

/// Lifecycle of one kind's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    Idle,
    Publishing,
    Draining,
    Done,
}

/// Everything a deletion worker needs, cloned per worker task.
#[derive(Clone)]
struct WorkerContext {
    kind: Arc<KindDescriptor>,
    ops: Arc<dyn ResourceOps>,
    matcher: Arc<dyn NameMatcher>,
    task_id: Option<String>,
    min_age: Option<chrono::Duration>,
    dry_run: bool,
}

type SharedReceiver = Arc<Mutex<mpsc::Receiver<ResourceHandle>>>;

/// The cleanup engine: registry + client factory + ownership oracle.
pub struct CleanupEngine {
    registry: Arc<Registry>,
    factory: Arc<dyn ProviderFactory>,
    matcher: Arc<dyn NameMatcher>,
}

impl CleanupEngine {
    /// Create an engine over a registry, a client factory, and the
    /// ownership oracle.
    pub fn new(
        registry: Arc<Registry>,
        factory: Arc<dyn ProviderFactory>,
        matcher: Arc<dyn NameMatcher>,
    ) -> Self {
        Self {
            registry,
            factory,
            matcher,
        }
    }

    /// Run cleanup for one job.
    ///
    /// Kinds run sequentially in registry order; resource instances
    /// within a kind are processed concurrently. Never fails: residual
    /// resources surface in the report and in WARNING logs.
    pub async fn cleanup(&self, job: &CleanupJob) -> CleanupReport {
        // Fresh cache per job: provider reuse is scoped to one invocation.
        let clients = CachingProviderFactory::new(Arc::clone(&self.factory));
        let kinds = self.registry.find(&job.names, job.admin_required);

        info!(
            kinds = kinds.len(),
            users = job.users.len(),
            task_id = ?job.task_id,
            dry_run = job.dry_run,
            "Starting resource cleanup"
        );

        let mut report = CleanupReport::default();
        for entry in kinds {
            let kind_report = KindPipeline::new(entry)
                .run(job, &clients, &self.matcher)
                .await;
            report.kinds.push(kind_report);
        }

        if report.total_residual() > 0 {
            warn!(
                found = report.total_found(),
                deleted = report.total_deleted(),
                residual = report.total_residual(),
                "Cleanup finished with resources left behind"
            );
        } else {
            info!(
                found = report.total_found(),
                deleted = report.total_deleted(),
                "Cleanup finished"
            );
        }
        report
    }
}

impl std::fmt::Debug for CleanupEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupEngine")
            .field("kinds", &self.registry.len())
            .finish_non_exhaustive()
    }
}

/// One kind's publish/filter/delete pipeline.
struct KindPipeline {
    kind: Arc<KindDescriptor>,
    ops: Arc<dyn ResourceOps>,
    state: PipelineState,
}

impl KindPipeline {
    fn new(entry: &RegisteredKind) -> Self {
        Self {
            kind: Arc::clone(&entry.descriptor),
            ops: Arc::clone(&entry.ops),
            state: PipelineState::Idle,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug!(
            kind = %self.kind.qualified_name(),
            from = ?self.state,
            to = ?next,
            "Pipeline state change"
        );
        self.state = next;
    }

    async fn run(
        mut self,
        job: &CleanupJob,
        clients: &CachingProviderFactory,
        matcher: &Arc<dyn NameMatcher>,
    ) -> KindReport {
        let kind_name = self.kind.qualified_name();
        let mut report = KindReport::new(kind_name.clone());

        // Workers start first so they drain the queue while discovery is
        // still publishing; the bound throttles discovery, not deletion.
        let (tx, rx) = mpsc::channel::<ResourceHandle>(self.kind.workers * 2);
        let rx: SharedReceiver = Arc::new(Mutex::new(rx));

        let ctx = WorkerContext {
            kind: Arc::clone(&self.kind),
            ops: Arc::clone(&self.ops),
            matcher: Arc::clone(matcher),
            task_id: job.task_id.clone(),
            min_age: job.min_age,
            dry_run: job.dry_run,
        };

        let mut workers = Vec::with_capacity(self.kind.workers);
        for _ in 0..self.kind.workers {
            workers.push(tokio::spawn(drain_candidates(
                ctx.clone(),
                Arc::clone(&rx),
            )));
        }

        self.advance(PipelineState::Publishing);
        report.found =
            discovery::publish(&self.kind, self.ops.as_ref(), job, clients, &tx).await;
        // Closing the queue is the end-of-stream signal for the workers.
        drop(tx);

        self.advance(PipelineState::Draining);
        for worker in workers {
            match worker.await {
                Ok(stats) => report.merge(&stats),
                Err(e) => error!(kind = %kind_name, error = ?e, "Cleanup worker panicked"),
            }
        }

        self.advance(PipelineState::Done);
        info!(
            kind = %kind_name,
            found = report.found,
            deleted = report.deleted,
            already_gone = report.already_gone,
            filtered_out = report.filtered_out,
            residual = report.residual(),
            "Kind pipeline drained"
        );
        report
    }
}

/// Worker loop: pop, filter, delete, until the queue closes.
async fn drain_candidates(ctx: WorkerContext, rx: SharedReceiver) -> KindReport {
    let mut stats = KindReport::default();
    loop {
        let handle = { rx.lock().await.recv().await };
        let Some(handle) = handle else {
            break;
        };

        if !filter::should_delete(
            &ctx.kind,
            ctx.ops.as_ref(),
            ctx.matcher.as_ref(),
            &handle.raw,
            ctx.task_id.as_deref(),
            ctx.min_age,
        ) {
            stats.filtered_out += 1;
            continue;
        }

        if ctx.dry_run {
            info!(
                kind = %ctx.kind.qualified_name(),
                resource_id = %ctx.ops.resource_id(&handle.raw),
                "[DRY RUN] Would delete"
            );
            stats.skipped += 1;
            continue;
        }

        let outcome =
            driver::delete_one(&ctx.kind, ctx.ops.as_ref(), &handle.scope, &handle.raw).await;
        stats.record(outcome);
    }
    stats
}
