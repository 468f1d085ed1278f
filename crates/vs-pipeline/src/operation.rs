//! The [`StageOperation`] trait defines the work one stage performs on one
//! item.
//!
//! Operations are interchangeable from the runner's point of view: each takes
//! a single [`WorkItem`], mutates it with whatever the stage produced, and
//! returns either a [`StageOutput`] or a typed [`vs_core::Error`]. The runner
//! never looks at why an operation failed beyond recording it.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vs_core::{StageKind, WorkItem};

/// Result of a successfully executed operation.
#[derive(Debug, Clone, Default)]
pub struct StageOutput {
    /// Path to the artifact produced by this operation (if any).
    pub artifact: Option<PathBuf>,
    /// Human-readable summary of what the operation did.
    pub summary: String,
}

impl StageOutput {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            artifact: None,
            summary: summary.into(),
        }
    }

    pub fn with_artifact(mut self, path: PathBuf) -> Self {
        self.artifact = Some(path);
        self
    }
}

/// Identity of the execution unit running an operation.
///
/// Units are numbered by dispatch index, so the same batch always produces
/// the same unit ids regardless of completion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(usize);

impl UnitId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit-{}", self.0)
    }
}

/// A single stage's work on one item.
#[async_trait]
pub trait StageOperation: Send + Sync {
    /// The stage this operation implements.
    fn stage(&self) -> StageKind;

    /// Perform the operation on `item`.
    ///
    /// `unit` identifies the execution unit for diagnostics; operations must
    /// not rely on it for correctness.
    async fn run(&self, item: &mut WorkItem, unit: UnitId) -> vs_core::Result<StageOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_id_display_and_serde() {
        let unit = UnitId::new(3);
        assert_eq!(unit.to_string(), "unit-3");
        assert_eq!(serde_json::to_string(&unit).unwrap(), "3");
        assert_eq!(unit.index(), 3);
    }

    #[test]
    fn stage_output_builder() {
        let out = StageOutput::new("done").with_artifact(PathBuf::from("/tmp/a.wav"));
        assert_eq!(out.summary, "done");
        assert_eq!(out.artifact, Some(PathBuf::from("/tmp/a.wav")));
    }
}
