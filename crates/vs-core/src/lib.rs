//! vs-core: shared types, IDs, errors, configuration, and event system.
//!
//! This crate is the foundational dependency for all other vs-* crates,
//! providing the [`WorkItem`] carried through every pipeline stage, the
//! [`StageKind`] ordering, a unified error type, application configuration,
//! and a broadcast event bus.

pub mod config;
pub mod error;
pub mod events;
pub mod ids;
pub mod item;
pub mod stage;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, ErrorKind, Result};
pub use ids::*;
pub use item::{EmotionFrequencies, SentimentScore, WorkItem};
pub use stage::StageKind;
