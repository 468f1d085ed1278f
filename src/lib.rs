//! Vidscribe - batch media analysis with per-stage concurrency limits.
//!
//! This library crate exposes the pipeline driver for integration testing.

pub mod driver;
pub mod sources;

pub use driver::{Pipeline, RunReport};
pub use sources::{parse_sources, read_sources};
