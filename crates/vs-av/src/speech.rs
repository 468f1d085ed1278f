//! Speech-to-text over an extracted audio track.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::tools::{ToolConfig, ToolRegistry};

/// Converts a wav file into transcript text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> vs_core::Result<String>;
}

/// [`SpeechToText`] backed by the whisper.cpp `whisper-cli` binary.
///
/// whisper-cli writes its text output next to a prefix given with `-of`, so
/// each call runs against a scratch directory that is removed afterwards.
#[derive(Debug, Clone)]
pub struct WhisperCliTranscriber {
    tool: ToolConfig,
    model: PathBuf,
    language: String,
}

impl WhisperCliTranscriber {
    pub fn new(tool: ToolConfig, model: PathBuf, language: impl Into<String>) -> Self {
        Self {
            tool,
            model,
            language: language.into(),
        }
    }

    /// Build from a registry and the configured model.
    ///
    /// A missing model is a configuration error rather than a tool error so
    /// it surfaces before any item is processed.
    pub fn from_config(
        registry: &ToolRegistry,
        model: Option<&Path>,
        language: &str,
    ) -> vs_core::Result<Self> {
        let tool = registry.require("whisper-cli")?.clone();
        let model = model.ok_or_else(|| {
            vs_core::Error::Config("tools.whisper_model must be set to transcribe".into())
        })?;
        Ok(Self::new(tool, model.to_path_buf(), language))
    }
}

#[async_trait]
impl SpeechToText for WhisperCliTranscriber {
    async fn transcribe(&self, audio: &Path) -> vs_core::Result<String> {
        let scratch = tempfile::tempdir()?;
        let prefix = scratch.path().join("transcript");

        self.tool
            .command()
            .arg("-m")
            .path_arg(&self.model)
            .args(["-l", self.language.as_str()])
            .arg("-f")
            .path_arg(audio)
            .args(["-otxt", "-nt", "-of"])
            .path_arg(&prefix)
            .execute()
            .await?;

        let text = tokio::fs::read_to_string(prefix.with_extension("txt"))
            .await
            .map_err(|e| vs_core::Error::tool("whisper-cli", format!("no transcript written: {e}")))?;

        let text = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            return Err(vs_core::Error::external(
                "whisper",
                format!("could not understand audio in {}", audio.display()),
            ));
        }
        Ok(text)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;

    fn transcriber(dir: &Path, body: &str) -> WhisperCliTranscriber {
        let script = format!(
            "#!/bin/sh\nwhile [ $# -gt 0 ]; do\n  if [ \"$1\" = \"-of\" ]; then shift; out=\"$1\"; fi\n  shift\ndone\nprintf '{body}' > \"$out.txt\"\n"
        );
        let path = dir.join("whisper-cli");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        WhisperCliTranscriber::new(
            ToolConfig {
                name: "whisper-cli".into(),
                path,
                timeout: Duration::from_secs(10),
            },
            dir.join("ggml-base.en.bin"),
            "en",
        )
    }

    #[tokio::test]
    async fn lines_are_joined() {
        let dir = tempfile::tempdir().unwrap();
        let stt = transcriber(dir.path(), " hello there\\n\\n general kenobi \\n");
        let text = stt.transcribe(&dir.path().join("a.wav")).await.unwrap();
        assert_eq!(text, "hello there general kenobi");
    }

    #[tokio::test]
    async fn silence_is_external_error() {
        let dir = tempfile::tempdir().unwrap();
        let stt = transcriber(dir.path(), "\\n");
        let err = stt.transcribe(&dir.path().join("a.wav")).await.unwrap_err();
        assert_eq!(err.kind(), vs_core::ErrorKind::External);
        assert!(err.to_string().contains("could not understand"), "got: {err}");
    }

    #[test]
    fn model_is_required() {
        let registry = ToolRegistry::default().with_tool(
            "whisper-cli",
            "/usr/local/bin/whisper-cli",
            Duration::from_secs(1),
        );
        let err = WhisperCliTranscriber::from_config(&registry, None, "en").unwrap_err();
        assert_eq!(err.kind(), vs_core::ErrorKind::Configuration);
    }
}
