//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries all
//! sub-configs for output locations, execution, per-stage limits, tools and
//! remote services. Every section defaults sensibly so a completely empty
//! `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::stage::StageKind;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub execution: ExecutionConfig,
    pub stages: StagesConfig,
    pub acquisition: AcquisitionConfig,
    pub tools: ToolsConfig,
    pub transcription: TranscriptionConfig,
    pub translation: TranslationConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str).map_err(|e| Error::Config(format!("config parse error: {e}")))
    }

    /// Load configuration from a file that must exist and parse.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    ///
    /// A zero concurrency cap is only a warning here; the stage runner rejects
    /// it with [`Error::Config`] when that stage is invoked.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for kind in StageKind::ALL {
            let stage = self.stages.get(kind);
            if stage.concurrency == Some(0) {
                warnings.push(format!(
                    "stages.{kind}.concurrency is 0; the {kind} stage will be rejected"
                ));
            }
            if stage.timeout_secs == Some(0) {
                warnings.push(format!(
                    "stages.{kind}.timeout_secs is 0; every {kind} operation will time out"
                ));
            }
        }

        if self.stages.enabled().is_empty() {
            warnings.push("every stage is disabled; runs will do nothing".into());
        }

        if self.execution.worker_threads == Some(0) {
            warnings.push("execution.worker_threads is 0; the runtime default will be used".into());
        }

        if self.stages.translate.enabled && self.translation.endpoint.trim().is_empty() {
            warnings.push("translation.endpoint is empty".into());
        }

        if self.translation.source_lang == self.translation.target_lang {
            warnings.push(format!(
                "translation source and target language are both '{}'",
                self.translation.source_lang
            ));
        }

        if self.stages.transcribe.enabled && self.tools.whisper_model.is_none() {
            warnings.push("tools.whisper_model is not set; the transcriber default will be used".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Where artifacts, the acquisition log and the run report go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub report_file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("video_data"),
            log_file: PathBuf::from("download_log.txt"),
            report_file: None,
        }
    }
}

/// Which execution backend dispatches stage operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One spawned tokio task per item, running on the multi-thread runtime.
    #[default]
    Tasks,
    /// All items polled concurrently on the calling task.
    Cooperative,
}

impl std::str::FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tasks" => Ok(BackendKind::Tasks),
            "cooperative" => Ok(BackendKind::Cooperative),
            other => Err(Error::Config(format!(
                "unknown backend '{other}' (valid: tasks, cooperative)"
            ))),
        }
    }
}

/// Runtime and dispatch settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub backend: BackendKind,
    pub worker_threads: Option<usize>,
}

/// Per-stage switches and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum simultaneously running operations; `None` means batch size.
    pub concurrency: Option<usize>,
    /// Deadline for one operation; `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: None,
            timeout_secs: None,
        }
    }
}

impl StageConfig {
    fn with_concurrency(concurrency: usize) -> Self {
        Self {
            concurrency: Some(concurrency),
            ..Self::default()
        }
    }
}

/// Settings for every stage, keyed by [`StageKind`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagesConfig {
    pub acquire: StageConfig,
    pub extract: StageConfig,
    pub transcribe: StageConfig,
    pub sentiment: StageConfig,
    pub translate: StageConfig,
    pub emotions: StageConfig,
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            acquire: StageConfig::with_concurrency(5),
            extract: StageConfig::with_concurrency(1),
            transcribe: StageConfig::default(),
            sentiment: StageConfig::default(),
            translate: StageConfig::default(),
            emotions: StageConfig::default(),
        }
    }
}

impl StagesConfig {
    pub fn get(&self, kind: StageKind) -> &StageConfig {
        match kind {
            StageKind::Acquire => &self.acquire,
            StageKind::Extract => &self.extract,
            StageKind::Transcribe => &self.transcribe,
            StageKind::Sentiment => &self.sentiment,
            StageKind::Translate => &self.translate,
            StageKind::Emotions => &self.emotions,
        }
    }

    pub fn get_mut(&mut self, kind: StageKind) -> &mut StageConfig {
        match kind {
            StageKind::Acquire => &mut self.acquire,
            StageKind::Extract => &mut self.extract,
            StageKind::Transcribe => &mut self.transcribe,
            StageKind::Sentiment => &mut self.sentiment,
            StageKind::Translate => &mut self.translate,
            StageKind::Emotions => &mut self.emotions,
        }
    }

    /// Enabled stages in execution order.
    pub fn enabled(&self) -> Vec<StageKind> {
        StageKind::ALL
            .into_iter()
            .filter(|k| self.get(*k).enabled)
            .collect()
    }

    /// Enable exactly the given stages, disabling the rest.
    pub fn restrict_to(&mut self, kinds: &[StageKind]) {
        for kind in StageKind::ALL {
            self.get_mut(kind).enabled = kinds.contains(&kind);
        }
    }
}

/// Acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Append one record per completed download to `output.log_file`.
    pub log_downloads: bool,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self { log_downloads: true }
    }
}

/// Paths to external CLI tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub yt_dlp_path: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
    pub whisper_path: Option<PathBuf>,
    pub whisper_model: Option<PathBuf>,
    #[serde(default = "default_tool_timeout")]
    pub timeout_secs: u64,
}

fn default_tool_timeout() -> u64 {
    600
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: None,
            ffmpeg_path: None,
            whisper_path: None,
            whisper_model: None,
            timeout_secs: default_tool_timeout(),
        }
    }
}

/// Speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub language: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            language: "en".into(),
        }
    }
}

/// Translation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub source_lang: String,
    pub target_lang: String,
    /// English name of the target language, used in the artifact file name.
    pub target_name: String,
    #[serde(default = "default_translation_timeout")]
    pub timeout_secs: u64,
}

fn default_translation_timeout() -> u64 {
    60
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000".into(),
            api_key: None,
            source_lang: "en".into(),
            target_lang: "es".into(),
            target_name: "Spanish".into(),
            timeout_secs: default_translation_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_reference_run() {
        let cfg = Config::default();
        assert_eq!(cfg.output.data_dir, PathBuf::from("video_data"));
        assert_eq!(cfg.output.log_file, PathBuf::from("download_log.txt"));
        assert_eq!(cfg.stages.acquire.concurrency, Some(5));
        assert_eq!(cfg.stages.extract.concurrency, Some(1));
        assert_eq!(cfg.stages.transcribe.concurrency, None);
        assert_eq!(cfg.execution.backend, BackendKind::Tasks);
        assert_eq!(cfg.translation.target_name, "Spanish");
        assert_eq!(cfg.stages.enabled(), StageKind::ALL.to_vec());
    }

    #[test]
    fn default_config_only_warns_about_model() {
        let warnings = Config::default().validate();
        assert_eq!(warnings.len(), 1, "unexpected warnings: {:?}", warnings);
        assert!(warnings[0].contains("whisper_model"));
    }

    #[test]
    fn zero_concurrency_warns() {
        let mut cfg = Config::default();
        cfg.stages.sentiment.concurrency = Some(0);
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("stages.sentiment.concurrency")));
    }

    #[test]
    fn same_languages_warn() {
        let mut cfg = Config::default();
        cfg.translation.target_lang = "en".into();
        assert!(cfg.validate().iter().any(|w| w.contains("both 'en'")));
    }

    #[test]
    fn parse_json_config() {
        let json = r#"{"stages": {"extract": {"concurrency": 3}}, "execution": {"backend": "cooperative"}}"#;
        let cfg = Config::from_json(json).unwrap();
        assert_eq!(cfg.stages.extract.concurrency, Some(3));
        assert!(cfg.stages.extract.enabled);
        assert_eq!(cfg.execution.backend, BackendKind::Cooperative);
        // Untouched stages keep their defaults.
        assert_eq!(cfg.stages.acquire.concurrency, Some(5));
    }

    #[test]
    fn parse_empty_json_uses_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.tools.timeout_secs, 600);
        assert_eq!(cfg.translation.timeout_secs, 60);
    }

    #[test]
    fn parse_invalid_json_is_config_error() {
        let err = Config::from_json("{not json").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn load_or_default_with_missing_file() {
        let cfg = Config::load_or_default(Some(Path::new("/nonexistent/vidscribe.json")));
        assert_eq!(cfg.stages.acquire.concurrency, Some(5));
    }

    #[test]
    fn load_missing_file_is_error() {
        assert!(Config::load(Path::new("/nonexistent/vidscribe.json")).is_err());
    }

    #[test]
    fn restrict_to_disables_others() {
        let mut stages = StagesConfig::default();
        stages.restrict_to(&[StageKind::Transcribe, StageKind::Acquire]);
        assert_eq!(stages.enabled(), vec![StageKind::Acquire, StageKind::Transcribe]);
    }

    #[test]
    fn backend_from_str() {
        assert_eq!("Tasks".parse::<BackendKind>().unwrap(), BackendKind::Tasks);
        assert!("threads".parse::<BackendKind>().is_err());
    }
}
