//! Pipeline driver: sequences stage runners over one batch of items.
//!
//! Stages run in [`StageKind::ALL`] order, each to completion over the whole
//! batch before the next begins. Per-item failures stay in the stage reports;
//! only stage-level errors (bad configuration, missing collaborators) end the
//! run early.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vs_core::config::Config;
use vs_core::events::{EventBus, EventPayload};
use vs_core::{RunId, StageKind, WorkItem};
use vs_pipeline::{create_operation, Collaborators, SharedLogWriter, StageReport, StageRunner};

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub items: Vec<WorkItem>,
    pub stages: Vec<StageReport>,
}

impl RunReport {
    pub fn total_failures(&self) -> usize {
        self.stages.iter().map(StageReport::failure_count).sum()
    }

    pub fn stage(&self, kind: StageKind) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == kind)
    }

    /// Write the report as pretty JSON.
    pub async fn write(&self, path: &Path) -> vs_core::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| vs_core::Error::Internal(format!("failed to encode run report: {e}")))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

/// Owns the configuration and collaborators for a run.
///
/// Events are published only when a bus is attached with
/// [`with_events`](Pipeline::with_events).
pub struct Pipeline {
    config: Config,
    collaborators: Collaborators,
    events: Option<Arc<EventBus>>,
}

impl Pipeline {
    pub fn new(config: Config, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
            events: None,
        }
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn events(&self) -> Option<&Arc<EventBus>> {
        self.events.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every enabled stage over one item per source.
    ///
    /// # Errors
    ///
    /// Returns an error if an enabled stage cannot be built or rejects its
    /// configuration. Operations for all enabled stages are built before any
    /// item is processed.
    pub async fn run(&self, sources: Vec<String>) -> vs_core::Result<RunReport> {
        let items = sources.into_iter().map(WorkItem::new).collect();
        self.run_items(items).await
    }

    /// Run every enabled stage over items that may already carry state from
    /// an earlier run (e.g. loaded from a previous run report).
    pub async fn run_items(&self, mut items: Vec<WorkItem>) -> vs_core::Result<RunReport> {
        let run_id = RunId::new();
        let started_at = Utc::now();
        let started = Instant::now();
        let enabled = self.config.stages.enabled();

        let collaborators = self.prepare(&enabled).await?;
        let operations = enabled
            .iter()
            .map(|&kind| create_operation(kind, &self.config, &collaborators).map(|op| (kind, op)))
            .collect::<vs_core::Result<Vec<_>>>()?;

        tracing::info!(run_id = %run_id, items = items.len(), stages = enabled.len(), "Starting run");
        self.publish(EventPayload::RunStarted {
            run_id,
            items: items.len(),
        });

        let mut stages = Vec::with_capacity(operations.len());
        for (kind, op) in operations {
            let mut runner =
                StageRunner::from_config(self.config.stages.get(kind), &self.config.execution);
            if let Some(events) = &self.events {
                runner = runner.with_events(Arc::clone(events));
            }
            let report = runner.run(&mut items, op).await?;
            stages.push(report);
        }

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.publish(EventPayload::RunCompleted { run_id, elapsed_ms });

        let report = RunReport {
            run_id,
            started_at,
            elapsed_ms,
            items,
            stages,
        };
        tracing::info!(
            run_id = %run_id,
            failures = report.total_failures(),
            "Run finished in {:.2}s",
            elapsed_ms as f64 / 1000.0
        );

        if let Some(path) = &self.config.output.report_file {
            report.write(path).await?;
            tracing::info!("Run report written to {}", path.display());
        }
        Ok(report)
    }

    fn publish(&self, payload: EventPayload) {
        if let Some(events) = &self.events {
            events.publish(payload);
        }
    }

    /// Create the output directory and open the download log if the
    /// acquisition stage will need them.
    async fn prepare(&self, enabled: &[StageKind]) -> vs_core::Result<Collaborators> {
        let collaborators = self.collaborators.clone();
        if !enabled.contains(&StageKind::Acquire) {
            return Ok(collaborators);
        }

        tokio::fs::create_dir_all(&self.config.output.data_dir).await?;
        if !self.config.acquisition.log_downloads || collaborators.acquisition_log.is_some() {
            return Ok(collaborators);
        }
        let log = SharedLogWriter::open(&self.config.output.log_file).await?;
        tracing::info!("Logging downloads to {}", log.path().display());
        Ok(collaborators.with_acquisition_log(Arc::new(log)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(kinds: &[StageKind]) -> Config {
        let mut config = Config::default();
        config.stages.restrict_to(kinds);
        config
    }

    #[tokio::test]
    async fn empty_source_list() {
        let pipeline = Pipeline::new(
            only(&[StageKind::Sentiment, StageKind::Emotions]),
            Collaborators::default(),
        );
        let report = pipeline.run(Vec::new()).await.unwrap();
        assert!(report.items.is_empty());
        assert_eq!(report.stages.len(), 2);
        assert_eq!(report.total_failures(), 0);
    }

    #[tokio::test]
    async fn missing_collaborator_aborts_before_work() {
        let bus = Arc::new(EventBus::default());
        let pipeline = Pipeline::new(only(&[StageKind::Extract]), Collaborators::default())
            .with_events(Arc::clone(&bus));
        let err = pipeline.run(vec!["a".into()]).await.unwrap_err();
        assert_eq!(err.kind(), vs_core::ErrorKind::Configuration);
        assert!(bus.recent_events(10).is_empty());
    }

    #[tokio::test]
    async fn events_only_with_attached_bus() {
        let pipeline = Pipeline::new(only(&[StageKind::Emotions]), Collaborators::default());
        assert!(pipeline.events().is_none());
        pipeline.run(vec!["a".into()]).await.unwrap();

        let bus = Arc::new(EventBus::default());
        let pipeline = pipeline.with_events(Arc::clone(&bus));
        pipeline.run(vec!["a".into()]).await.unwrap();
        // run started, stage started, item failed, stage completed, run completed
        assert_eq!(bus.recent_events(10).len(), 5);
    }

    #[tokio::test]
    async fn report_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = only(&[StageKind::Sentiment]);
        config.output.report_file = Some(dir.path().join("out").join("report.json"));

        let pipeline = Pipeline::new(config, Collaborators::default());
        let report = pipeline.run(vec!["x".into()]).await.unwrap();
        assert_eq!(report.total_failures(), 1);

        let text = std::fs::read_to_string(dir.path().join("out").join("report.json")).unwrap();
        let back: RunReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back.run_id, report.run_id);
        assert_eq!(back.stages[0].failures[0].source, "x");
    }
}
