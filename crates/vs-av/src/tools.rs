//! External tool detection and management.
//!
//! The [`ToolRegistry`] discovers and caches the locations of the external
//! CLI tools the pipeline shells out to (yt-dlp, ffmpeg, whisper-cli) and
//! hands out [`ToolCommand`] builders preconfigured with each tool's timeout.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::ToolCommand;

/// Known tool names that the registry manages.
pub const KNOWN_TOOLS: &[&str] = &["yt-dlp", "ffmpeg", "whisper-cli"];

/// Configuration for a single discovered tool.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Tool name (e.g. "ffmpeg").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
    /// Maximum execution time before the tool is killed.
    pub timeout: Duration,
}

impl ToolConfig {
    /// Start a command for this tool with its timeout applied.
    pub fn command(&self) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.path.clone());
        cmd.timeout(self.timeout);
        cmd
    }
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of the version output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool configurations.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from config).
    ///
    /// For each known tool, if the [`vs_core::config::ToolsConfig`] supplies a
    /// custom path **and** that path exists, it is used directly. Otherwise
    /// [`which::which`] is used to locate the tool in `PATH`. Tools that are
    /// not found are omitted from the registry.
    pub fn discover(tools_config: &vs_core::config::ToolsConfig) -> Self {
        let timeout = Duration::from_secs(tools_config.timeout_secs);
        let mut registry = Self::default();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                "yt-dlp" => tools_config.yt_dlp_path.as_deref(),
                "ffmpeg" => tools_config.ffmpeg_path.as_deref(),
                "whisper-cli" => tools_config.whisper_path.as_deref(),
                _ => None,
            };

            let resolved = match custom_path {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                Some(p) => {
                    tracing::warn!(tool = name, path = %p.display(), "Configured tool path does not exist; searching PATH");
                    which::which(name).ok()
                }
                None => which::which(name).ok(),
            };

            if let Some(path) = resolved {
                registry.insert(name, path, timeout);
            }
        }

        registry
    }

    /// Register (or replace) a tool at an explicit path.
    pub fn with_tool(mut self, name: &str, path: impl Into<PathBuf>, timeout: Duration) -> Self {
        self.insert(name, path.into(), timeout);
        self
    }

    fn insert(&mut self, name: &str, path: PathBuf, timeout: Duration) {
        self.tools.insert(
            name.to_string(),
            ToolConfig {
                name: name.to_string(),
                path,
                timeout,
            },
        );
    }

    /// Return the [`ToolConfig`] for the given tool, or a
    /// [`vs_core::Error::Tool`] if the tool was not found during discovery.
    pub fn require(&self, name: &str) -> vs_core::Result<&ToolConfig> {
        self.tools.get(name).ok_or_else(|| {
            vs_core::Error::tool(name, format!("{name} not found; is it installed and in PATH?"))
        })
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| match self.tools.get(name) {
                Some(cfg) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(name, &cfg.path),
                    path: Some(cfg.path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            })
            .collect()
    }
}

/// Run the tool's version flag and return the first line of stdout.
fn detect_version(name: &str, path: &Path) -> Option<String> {
    let version_arg = match name {
        "ffmpeg" => "-version",
        "whisper-cli" => "--help",
        _ => "--version",
    };

    let output = std::process::Command::new(path)
        .arg(version_arg)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vs_core::config::ToolsConfig;

    #[test]
    fn discover_with_default_config() {
        let registry = ToolRegistry::discover(&ToolsConfig::default());
        // No tool is guaranteed to be installed; the call must not panic.
        let _ = registry.check_all();
    }

    #[test]
    fn require_missing_tool_returns_error() {
        let registry = ToolRegistry::default();
        let err = registry.require("yt-dlp").unwrap_err();
        assert!(err.to_string().contains("yt-dlp not found"));
    }

    #[test]
    fn check_all_returns_known_tools() {
        let infos = ToolRegistry::default().check_all();
        let names: Vec<&str> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["yt-dlp", "ffmpeg", "whisper-cli"]);
        assert!(infos.iter().all(|i| !i.available));
    }

    #[test]
    fn with_tool_overrides_discovery() {
        let registry = ToolRegistry::default().with_tool(
            "ffmpeg",
            "/opt/ffmpeg/bin/ffmpeg",
            Duration::from_secs(5),
        );
        let cfg = registry.require("ffmpeg").unwrap();
        assert_eq!(cfg.path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn nonexistent_custom_path_is_not_used() {
        let cfg = ToolsConfig {
            ffmpeg_path: Some(PathBuf::from("/nonexistent/ffmpeg")),
            ..ToolsConfig::default()
        };
        let registry = ToolRegistry::discover(&cfg);
        if let Ok(found) = registry.require("ffmpeg") {
            assert_ne!(found.path, PathBuf::from("/nonexistent/ffmpeg"));
        }
    }

    #[test]
    fn tool_info_serialization() {
        let info = ToolInfo {
            name: "ffmpeg".into(),
            available: true,
            version: Some("ffmpeg version 6.1".into()),
            path: Some(PathBuf::from("/usr/bin/ffmpeg")),
        };
        let json = serde_json::to_string(&info).unwrap();
        let back: ToolInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "ffmpeg");
        assert!(back.available);
    }
}
