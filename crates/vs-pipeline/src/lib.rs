//! # vs-pipeline
//!
//! Bounded-concurrency stage orchestration for the vidscribe pipeline.
//!
//! This crate provides:
//!
//! - **[`StageOperation`]** trait -- one unit of work applied to a single
//!   [`WorkItem`](vs_core::WorkItem).
//! - **[`ConcurrencyLimiter`]** -- counting admission gate with RAII permits.
//! - **[`StageRunner`]** -- runs one operation across a whole batch with at
//!   most N units in flight, records per-item failures, and reports timing.
//! - **[`SharedLogWriter`]** -- serialized append-only JSON-lines log shared
//!   by concurrent acquisition units.
//! - **Built-in operations** ([`operations`]) -- acquire, extract, transcribe,
//!   sentiment, translate, emotions.
//! - **[`create_operation`]** -- factory building the operation for a stage
//!   from configuration and [`Collaborators`].

pub mod factory;
pub mod limiter;
pub mod log_writer;
pub mod operation;
pub mod operations;
pub mod runner;

// Re-export key types at the crate root.
pub use factory::{create_operation, Collaborators};
pub use limiter::{resolve_cap, ConcurrencyLimiter, LimiterPermit};
pub use log_writer::{AcquisitionRecord, SharedLogWriter};
pub use operation::{StageOperation, StageOutput, UnitId};
pub use runner::{ExecutionBackend, ItemFailure, StageReport, StageRunner};
