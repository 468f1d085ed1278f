//! Operation factory: construct the [`StageOperation`] for a stage from
//! configuration and the available collaborators.

use std::sync::Arc;

use vs_av::{
    AudioExtractor, FfmpegAudioExtractor, SourceFetcher, SpeechToText, ToolRegistry,
    WhisperCliTranscriber, YtDlpFetcher,
};
use vs_core::config::Config;
use vs_core::StageKind;
use vs_text::{EmotionAnalyzer, HttpTranslator, SentimentAnalyzer, Translator};

use crate::log_writer::SharedLogWriter;
use crate::operation::StageOperation;
use crate::operations::{
    AcquireOperation, EmotionsOperation, ExtractOperation, LoggedAcquireOperation,
    SentimentOperation, TranscribeOperation, TranslateOperation,
};

/// External collaborators the stage operations delegate to.
///
/// Each is optional so a run restricted to later stages does not need the
/// tools of earlier ones. Asking for an operation whose collaborator is
/// missing fails at stage level, before any item is touched.
#[derive(Clone, Default)]
pub struct Collaborators {
    pub fetcher: Option<Arc<dyn SourceFetcher>>,
    pub extractor: Option<Arc<dyn AudioExtractor>>,
    pub speech: Option<Arc<dyn SpeechToText>>,
    pub translator: Option<Arc<dyn Translator>>,
    /// Shared log for the logging acquisition variant.
    pub acquisition_log: Option<Arc<SharedLogWriter>>,
}

impl Collaborators {
    /// Build the CLI- and HTTP-backed collaborators from discovered tools.
    ///
    /// Collaborators that cannot be built are left empty and the reason is
    /// logged.
    pub fn from_config(config: &Config, tools: &ToolRegistry) -> Self {
        let fetcher = YtDlpFetcher::from_registry(tools)
            .map(|f| Arc::new(f) as Arc<dyn SourceFetcher>)
            .map_err(|e| tracing::warn!("Source fetcher unavailable: {e}"))
            .ok();
        let extractor = FfmpegAudioExtractor::from_registry(tools)
            .map(|x| Arc::new(x) as Arc<dyn AudioExtractor>)
            .map_err(|e| tracing::warn!("Audio extractor unavailable: {e}"))
            .ok();
        let speech = WhisperCliTranscriber::from_config(
            tools,
            config.tools.whisper_model.as_deref(),
            &config.transcription.language,
        )
        .map(|s| Arc::new(s) as Arc<dyn SpeechToText>)
        .map_err(|e| tracing::warn!("Speech-to-text unavailable: {e}"))
        .ok();
        let translator = HttpTranslator::new(&config.translation)
            .map(|t| Arc::new(t) as Arc<dyn Translator>)
            .map_err(|e| tracing::warn!("Translator unavailable: {e}"))
            .ok();

        Self {
            fetcher,
            extractor,
            speech,
            translator,
            acquisition_log: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn SourceFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn AudioExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechToText>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_acquisition_log(mut self, log: Arc<SharedLogWriter>) -> Self {
        self.acquisition_log = Some(log);
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("fetcher", &self.fetcher.is_some())
            .field("extractor", &self.extractor.is_some())
            .field("speech", &self.speech.is_some())
            .field("translator", &self.translator.is_some())
            .field("acquisition_log", &self.acquisition_log.is_some())
            .finish()
    }
}

fn require<T: ?Sized>(
    slot: &Option<Arc<T>>,
    stage: StageKind,
    what: &str,
) -> vs_core::Result<Arc<T>> {
    slot.clone().ok_or_else(|| {
        vs_core::Error::Config(format!("the {stage} stage needs a {what}, but none is available"))
    })
}

/// Create the boxed [`StageOperation`] for `kind`.
///
/// # Errors
///
/// Returns [`vs_core::Error::Config`] if the collaborator the stage needs is
/// not available, or if download logging is enabled without a log writer.
pub fn create_operation(
    kind: StageKind,
    config: &Config,
    collaborators: &Collaborators,
) -> vs_core::Result<Arc<dyn StageOperation>> {
    let op: Arc<dyn StageOperation> = match kind {
        StageKind::Acquire => {
            let fetcher = require(&collaborators.fetcher, kind, "source fetcher")?;
            let acquire = AcquireOperation::new(fetcher, config.output.data_dir.clone());
            if config.acquisition.log_downloads {
                let log = require(&collaborators.acquisition_log, kind, "download log")?;
                Arc::new(LoggedAcquireOperation::new(acquire, log))
            } else {
                Arc::new(acquire)
            }
        }
        StageKind::Extract => Arc::new(ExtractOperation::new(require(
            &collaborators.extractor,
            kind,
            "audio extractor",
        )?)),
        StageKind::Transcribe => Arc::new(TranscribeOperation::new(require(
            &collaborators.speech,
            kind,
            "speech-to-text engine",
        )?)),
        StageKind::Sentiment => Arc::new(SentimentOperation::new(SentimentAnalyzer::new())),
        StageKind::Translate => Arc::new(TranslateOperation::new(
            require(&collaborators.translator, kind, "translator")?,
            &config.translation,
        )),
        StageKind::Emotions => Arc::new(EmotionsOperation::new(EmotionAnalyzer::new())),
    };
    Ok(op)
}
