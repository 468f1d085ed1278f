//! Unified error type for the vidscribe pipeline.
//!
//! All crates funnel their failures into [`Error`]. The stage runner records
//! per-item errors without inspecting them beyond [`Error::kind`], which
//! separates configuration mistakes (fatal for a stage invocation) from
//! per-item conditions (recorded, never propagated).

use serde::{Deserialize, Serialize};

/// Coarse classification of an [`Error`], carried into stage reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A stage needed an artifact that an earlier stage never produced.
    PrerequisiteMissing,
    /// A collaborator (tool, service, filesystem) reported a failure.
    External,
    /// Invalid configuration, such as a zero concurrency cap.
    Configuration,
    /// Panics, deadlines and other unexpected conditions.
    Internal,
}

/// Unified error type covering all failure modes in vidscribe.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A stage depends on an artifact an earlier stage never produced.
    #[error("[{stage}] missing prerequisite {artifact} for {source_ref}")]
    PrerequisiteMissing {
        /// The stage that needed the artifact.
        stage: String,
        /// Name of the missing artifact (e.g. "audio track").
        artifact: String,
        /// Source reference of the item.
        source_ref: String,
    },

    /// An external tool (yt-dlp, ffmpeg, whisper) returned an error.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// A remote service (translation, speech) returned an error.
    #[error("External service error [{service}]: {message}")]
    External {
        /// Name of the service.
        service: String,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A stage operation panicked or exceeded its deadline.
    #[error("Operation error [{stage}]: {message}")]
    Operation {
        /// The stage whose operation failed.
        stage: String,
        /// Human-readable error description.
        message: String,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::PrerequisiteMissing { .. } => ErrorKind::PrerequisiteMissing,
            Error::Tool { .. } | Error::External { .. } | Error::Io { .. } => ErrorKind::External,
            Error::Config(_) => ErrorKind::Configuration,
            Error::Operation { .. } | Error::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether this error is a prerequisite-missing failure.
    pub fn is_prerequisite_missing(&self) -> bool {
        self.kind() == ErrorKind::PrerequisiteMissing
    }

    /// Convenience constructor for [`Error::PrerequisiteMissing`].
    pub fn prerequisite(
        stage: impl Into<String>,
        artifact: impl Into<String>,
        source_ref: impl Into<String>,
    ) -> Self {
        Error::PrerequisiteMissing {
            stage: stage.into(),
            artifact: artifact.into(),
            source_ref: source_ref.into(),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::External`].
    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        Error::External {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Operation`].
    pub fn operation(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Operation {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prerequisite_display() {
        let err = Error::prerequisite("transcribe", "audio track", "https://example.com/v1");
        assert_eq!(
            err.to_string(),
            "[transcribe] missing prerequisite audio track for https://example.com/v1"
        );
        assert_eq!(err.kind(), ErrorKind::PrerequisiteMissing);
        assert!(err.is_prerequisite_missing());
    }

    #[test]
    fn tool_display() {
        let err = Error::tool("ffmpeg", "exit code 1");
        assert_eq!(err.to_string(), "Tool error [ffmpeg]: exit code 1");
        assert_eq!(err.kind(), ErrorKind::External);
    }

    #[test]
    fn external_display() {
        let err = Error::external("translate", "503 Service Unavailable");
        assert_eq!(
            err.to_string(),
            "External service error [translate]: 503 Service Unavailable"
        );
        assert_eq!(err.kind(), ErrorKind::External);
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.kind(), ErrorKind::External);
    }

    #[test]
    fn config_is_configuration_kind() {
        let err = Error::Config("concurrency cap must be at least 1".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: concurrency cap must be at least 1"
        );
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(!err.is_prerequisite_missing());
    }

    #[test]
    fn operation_display() {
        let err = Error::operation("extract", "panicked: boom");
        assert_eq!(err.to_string(), "Operation error [extract]: panicked: boom");
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::PrerequisiteMissing).unwrap();
        assert_eq!(json, "\"prerequisite_missing\"");
    }
}
