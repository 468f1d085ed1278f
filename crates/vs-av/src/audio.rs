//! Audio track extraction.

use std::path::Path;

use async_trait::async_trait;

use crate::tools::{ToolConfig, ToolRegistry};

/// Extracts the audio track of a media file into a wav file.
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract(&self, video: &Path, wav: &Path) -> vs_core::Result<()>;
}

/// [`AudioExtractor`] backed by `ffmpeg`.
///
/// Output is 16 kHz mono signed 16-bit PCM, the input format whisper.cpp
/// expects.
#[derive(Debug, Clone)]
pub struct FfmpegAudioExtractor {
    tool: ToolConfig,
}

impl FfmpegAudioExtractor {
    pub fn new(tool: ToolConfig) -> Self {
        Self { tool }
    }

    pub fn from_registry(registry: &ToolRegistry) -> vs_core::Result<Self> {
        Ok(Self::new(registry.require("ffmpeg")?.clone()))
    }
}

#[async_trait]
impl AudioExtractor for FfmpegAudioExtractor {
    async fn extract(&self, video: &Path, wav: &Path) -> vs_core::Result<()> {
        if !video.exists() {
            return Err(vs_core::Error::tool(
                "ffmpeg",
                format!("input {} does not exist", video.display()),
            ));
        }

        self.tool
            .command()
            .args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .path_arg(video)
            .args(["-vn", "-acodec", "pcm_s16le", "-ar", "16000", "-ac", "1"])
            .path_arg(wav)
            .execute()
            .await?;
        Ok(())
    }
}
