//! # vs-av
//!
//! Media acquisition, audio extraction, speech-to-text, and external tool
//! management for the vidscribe pipeline.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to yt-dlp,
//!   ffmpeg and whisper-cli.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Artifact layout** ([`ArtifactLayout`]) -- deterministic per-item file
//!   names derived from the item's display name.
//! - **Collaborators** -- [`SourceFetcher`], [`AudioExtractor`] and
//!   [`SpeechToText`] seams with CLI-backed implementations.

pub mod audio;
pub mod command;
pub mod fetch;
pub mod layout;
pub mod speech;
pub mod tools;

// ---- Re-exports for convenience ----

pub use audio::{AudioExtractor, FfmpegAudioExtractor};
pub use command::{ToolCommand, ToolOutput};
pub use fetch::{SourceFetcher, YtDlpFetcher};
pub use layout::{write_text, ArtifactLayout};
pub use speech::{SpeechToText, WhisperCliTranscriber};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
