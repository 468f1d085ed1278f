//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use vs_av::{AudioExtractor, SourceFetcher, SpeechToText};
use vs_core::config::Config;
use vs_pipeline::Collaborators;
use vs_text::Translator;

/// Fetcher whose titles are "Video <source>"; sources containing "broken"
/// fail. Tracks peak concurrent downloads.
#[derive(Default)]
pub struct FakeFetcher {
    active: AtomicUsize,
    pub peak: AtomicUsize,
}

#[async_trait]
impl SourceFetcher for FakeFetcher {
    async fn title(&self, source: &str) -> vs_core::Result<String> {
        if source.contains("broken") {
            return Err(vs_core::Error::external("fake-host", "video is private"));
        }
        Ok(format!("Video {source} extra words"))
    }

    async fn download(&self, _source: &str, dest: &Path) -> vs_core::Result<()> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        tokio::fs::write(dest, b"mp4").await?;
        Ok(())
    }
}

pub struct FakeExtractor;

#[async_trait]
impl AudioExtractor for FakeExtractor {
    async fn extract(&self, video: &Path, wav: &Path) -> vs_core::Result<()> {
        tokio::fs::copy(video, wav).await?;
        Ok(())
    }
}

pub const TRANSCRIPT: &str = "I love this good talk. My friend was happy!";

pub struct FakeSpeech;

#[async_trait]
impl SpeechToText for FakeSpeech {
    async fn transcribe(&self, _audio: &Path) -> vs_core::Result<String> {
        Ok(TRANSCRIPT.to_string())
    }
}

pub struct FakeTranslator;

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str, _source: &str, target: &str) -> vs_core::Result<String> {
        Ok(format!("({target}) {text}"))
    }
}

pub fn collaborators(fetcher: Arc<FakeFetcher>) -> Collaborators {
    Collaborators::default()
        .with_fetcher(fetcher)
        .with_extractor(Arc::new(FakeExtractor))
        .with_speech(Arc::new(FakeSpeech))
        .with_translator(Arc::new(FakeTranslator))
}

/// Default config with every output under `dir`.
pub fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.output.data_dir = dir.join("video_data");
    config.output.log_file = dir.join("download_log.txt");
    config
}
