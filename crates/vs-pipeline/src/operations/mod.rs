//! Built-in stage operations.
//!
//! Each operation wraps one collaborator (fetcher, extractor, speech-to-text,
//! translator, or an in-process analyzer) behind the unified
//! [`StageOperation`](crate::operation::StageOperation) trait, checks its
//! prerequisites on the item, and writes its artifact next to the item's
//! other artifacts.

mod acquire;
mod emotions;
mod extract;
mod sentiment;
mod transcribe;
mod translate;

pub use acquire::{AcquireOperation, LoggedAcquireOperation};
pub use emotions::EmotionsOperation;
pub use extract::ExtractOperation;
pub use sentiment::SentimentOperation;
pub use transcribe::TranscribeOperation;
pub use translate::TranslateOperation;
