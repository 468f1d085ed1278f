//! Stage runner: applies one [`StageOperation`] to every item of a batch with
//! bounded concurrency, a full join barrier, and per-item failure isolation.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use vs_core::config::{BackendKind, ExecutionConfig, StageConfig};
use vs_core::events::{EventBus, EventPayload};
use vs_core::{ErrorKind, ItemId, StageKind, WorkItem};

use crate::limiter::{resolve_cap, ConcurrencyLimiter};
use crate::operation::{StageOperation, StageOutput, UnitId};

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// How execution units are created for a stage invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionBackend {
    /// One spawned tokio task per item. Items move into their task and are
    /// handed back through the join barrier.
    #[default]
    Tasks,
    /// All units polled concurrently on the calling task, borrowing items.
    /// The limiter still bounds in-flight operations.
    Cooperative,
}

impl From<BackendKind> for ExecutionBackend {
    fn from(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Tasks => Self::Tasks,
            BackendKind::Cooperative => Self::Cooperative,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A failure recorded against one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFailure {
    /// Position of the item in the batch.
    pub index: usize,
    pub item_id: ItemId,
    pub source: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of one stage invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: StageKind,
    /// Number of items dispatched (always the batch size).
    pub items: usize,
    pub succeeded: usize,
    /// Failures in batch order.
    pub failures: Vec<ItemFailure>,
    pub elapsed_ms: u64,
    /// Effective concurrency cap.
    pub concurrency: usize,
    /// Most units admitted at the same time.
    pub high_water: usize,
    pub backend: ExecutionBackend,
}

impl StageReport {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Completed dispatches, successful or not.
    pub fn completed(&self) -> usize {
        self.succeeded + self.failures.len()
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Drives one stage across a whole batch.
///
/// Every item gets exactly one dispatch. At most `cap` operations are in
/// flight at once; failures (including panics and deadline overruns) are
/// recorded per item and never stop other items. [`run`](Self::run) returns
/// only after every unit has finished.
#[derive(Clone, Default)]
pub struct StageRunner {
    cap: Option<usize>,
    backend: ExecutionBackend,
    timeout: Option<Duration>,
    events: Option<Arc<EventBus>>,
}

impl StageRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner configured from a stage's settings and the execution settings.
    pub fn from_config(stage: &StageConfig, execution: &ExecutionConfig) -> Self {
        Self::new()
            .with_cap(stage.concurrency)
            .with_backend(execution.backend.into())
            .with_timeout(stage.timeout_secs.map(Duration::from_secs))
    }

    /// Concurrency cap; `None` means one slot per item.
    pub fn with_cap(mut self, cap: Option<usize>) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_backend(mut self, backend: ExecutionBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Per-item deadline. An operation exceeding it is recorded as failed.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Run `op` once for every item in `items`.
    ///
    /// # Errors
    ///
    /// Per-item failures are never returned; they are in the report. An error
    /// is returned only for stage-level problems: a zero concurrency cap
    /// ([`vs_core::Error::Config`]) or a unit lost to runtime shutdown
    /// ([`vs_core::Error::Internal`]). Items whose units did finish are
    /// still returned to `items` in that case.
    pub async fn run(
        &self,
        items: &mut Vec<WorkItem>,
        op: Arc<dyn StageOperation>,
    ) -> vs_core::Result<StageReport> {
        let stage = op.stage();
        let cap = resolve_cap(self.cap, items.len())?;
        let limiter = ConcurrencyLimiter::new(cap)?;
        let n = items.len();

        tracing::info!(stage = %stage, items = n, concurrency = cap, "Starting stage");
        self.publish(EventPayload::StageStarted {
            stage: stage.to_string(),
            items: n,
            concurrency: cap,
        });

        let started = Instant::now();
        let unit = Arc::new(Unit {
            op,
            stage,
            limiter: limiter.clone(),
            timeout: self.timeout,
            events: self.events.clone(),
        });

        let mut outcomes = match self.backend {
            ExecutionBackend::Tasks => run_tasks(&unit, items).await?,
            ExecutionBackend::Cooperative => run_cooperative(&unit, items).await,
        };
        let elapsed = started.elapsed();

        outcomes.sort_by_key(|(index, _)| *index);
        let mut succeeded = 0;
        let mut failures = Vec::new();
        for (index, outcome) in outcomes {
            match outcome {
                Ok(_) => succeeded += 1,
                Err(e) => {
                    let item = &items[index];
                    failures.push(ItemFailure {
                        index,
                        item_id: item.id(),
                        source: item.source().to_string(),
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let report = StageReport {
            stage,
            items: n,
            succeeded,
            failures,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            concurrency: cap,
            high_water: limiter.high_water(),
            backend: self.backend,
        };

        tracing::info!(
            stage = %stage,
            succeeded = report.succeeded,
            failed = report.failure_count(),
            high_water = report.high_water,
            "Time took to {} the videos: {:.2}s",
            stage.verb(),
            elapsed.as_secs_f64()
        );
        self.publish(EventPayload::StageCompleted {
            stage: stage.to_string(),
            succeeded: report.succeeded,
            failed: report.failure_count(),
            elapsed_ms: report.elapsed_ms,
        });

        Ok(report)
    }

    fn publish(&self, payload: EventPayload) {
        if let Some(events) = &self.events {
            events.publish(payload);
        }
    }
}

impl std::fmt::Debug for StageRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageRunner")
            .field("cap", &self.cap)
            .field("backend", &self.backend)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

type Outcome = (usize, vs_core::Result<StageOutput>);

/// State shared by every unit of one invocation.
struct Unit {
    op: Arc<dyn StageOperation>,
    stage: StageKind,
    limiter: ConcurrencyLimiter,
    timeout: Option<Duration>,
    events: Option<Arc<EventBus>>,
}

impl Unit {
    /// Admit, run, and report one item.
    async fn dispatch(&self, index: usize, item: &mut WorkItem) -> vs_core::Result<StageOutput> {
        let unit_id = UnitId::new(index);
        let result = self.admit_and_run(item, unit_id).await;

        match &result {
            Ok(output) => {
                tracing::debug!(
                    stage = %self.stage,
                    unit = %unit_id,
                    source = %item.source(),
                    "{}",
                    output.summary
                );
                self.publish(EventPayload::ItemSucceeded {
                    stage: self.stage.to_string(),
                    item_id: item.id(),
                    source: item.source().to_string(),
                    summary: output.summary.clone(),
                });
            }
            Err(e) => {
                tracing::warn!(
                    stage = %self.stage,
                    unit = %unit_id,
                    source = %item.source(),
                    kind = ?e.kind(),
                    "Could not {} {}: {e}",
                    self.stage.verb(),
                    item.label()
                );
                self.publish(EventPayload::ItemFailed {
                    stage: self.stage.to_string(),
                    item_id: item.id(),
                    source: item.source().to_string(),
                    kind: e.kind(),
                    error: e.to_string(),
                });
            }
        }
        result
    }

    /// Run one item with every panic on this path caught, including one
    /// raised while a timed-out operation is being dropped.
    async fn admit_and_run(&self, item: &mut WorkItem, unit_id: UnitId) -> vs_core::Result<StageOutput> {
        AssertUnwindSafe(self.run_bounded(item, unit_id))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(vs_core::Error::operation(
                    self.stage.as_str(),
                    format!("operation panicked: {}", panic_message(panic.as_ref())),
                ))
            })
    }

    async fn run_bounded(&self, item: &mut WorkItem, unit_id: UnitId) -> vs_core::Result<StageOutput> {
        let _permit = self.limiter.acquire().await?;
        tracing::trace!(stage = %self.stage, unit = %unit_id, "Acquired slot");

        let run = self.op.run(item, unit_id);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run).await.unwrap_or_else(|_| {
                Err(vs_core::Error::operation(
                    self.stage.as_str(),
                    format!("timed out after {limit:?}"),
                ))
            }),
            None => run.await,
        }
    }

    fn publish(&self, payload: EventPayload) {
        if let Some(events) = &self.events {
            events.publish(payload);
        }
    }
}

type Joined = (usize, WorkItem, vs_core::Result<StageOutput>);

/// One spawned task per item; items are restored to their original slots.
async fn run_tasks(unit: &Arc<Unit>, items: &mut Vec<WorkItem>) -> vs_core::Result<Vec<Outcome>> {
    let n = items.len();
    let mut set = JoinSet::new();

    for (index, mut item) in std::mem::take(items).into_iter().enumerate() {
        let unit = Arc::clone(unit);
        set.spawn(async move {
            let outcome = unit.dispatch(index, &mut item).await;
            (index, item, outcome)
        });
    }

    join_units(&mut set, n, unit.stage, items).await
}

/// Drain every unit, putting returned items back into `items` in batch
/// order. A lost unit is reported only after all others have been joined,
/// so the items that did come back are never discarded.
async fn join_units(
    set: &mut JoinSet<Joined>,
    n: usize,
    stage: StageKind,
    items: &mut Vec<WorkItem>,
) -> vs_core::Result<Vec<Outcome>> {
    let mut slots: Vec<Option<WorkItem>> = std::iter::repeat_with(|| None).take(n).collect();
    let mut outcomes = Vec::with_capacity(n);
    let mut lost = None;

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, item, outcome)) => {
                slots[index] = Some(item);
                outcomes.push((index, outcome));
            }
            Err(e) => {
                tracing::error!(stage = %stage, "Unit did not complete: {e}");
                lost.get_or_insert_with(|| {
                    vs_core::Error::Internal(format!("{stage} unit did not complete: {e}"))
                });
            }
        }
    }

    items.extend(slots.into_iter().flatten());
    match lost {
        Some(err) => Err(err),
        None => Ok(outcomes),
    }
}

/// All units polled on the current task.
async fn run_cooperative(unit: &Arc<Unit>, items: &mut [WorkItem]) -> Vec<Outcome> {
    let units = items.iter_mut().enumerate().map(|(index, item)| {
        let unit = Arc::clone(unit);
        async move { (index, unit.dispatch(index, item).await) }
    });
    futures::future::join_all(units).await
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
