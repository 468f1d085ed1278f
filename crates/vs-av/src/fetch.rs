//! Media acquisition from a source reference.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::tools::{ToolConfig, ToolRegistry};

/// Resolves a source reference to a title and downloads its media.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Look up the media title without downloading anything.
    async fn title(&self, source: &str) -> vs_core::Result<String>;

    /// Download the media for `source` to `dest`.
    async fn download(&self, source: &str, dest: &Path) -> vs_core::Result<()>;
}

/// [`SourceFetcher`] backed by the `yt-dlp` CLI.
///
/// Downloads the smallest available mp4 rendition since only the audio
/// track is consumed downstream.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    tool: ToolConfig,
}

impl YtDlpFetcher {
    pub fn new(tool: ToolConfig) -> Self {
        Self { tool }
    }

    /// Build from a registry, failing if yt-dlp was not discovered.
    pub fn from_registry(registry: &ToolRegistry) -> vs_core::Result<Self> {
        Ok(Self::new(registry.require("yt-dlp")?.clone()))
    }

    pub fn program(&self) -> &PathBuf {
        &self.tool.path
    }
}

#[async_trait]
impl SourceFetcher for YtDlpFetcher {
    async fn title(&self, source: &str) -> vs_core::Result<String> {
        let output = self
            .tool
            .command()
            .args(["--no-playlist", "--print", "title", "--skip-download"])
            .arg(source)
            .execute()
            .await?;

        let title = output.stdout.lines().next().unwrap_or("").trim().to_string();
        if title.is_empty() {
            return Err(vs_core::Error::tool(
                "yt-dlp",
                format!("no title reported for {source}"),
            ));
        }
        Ok(title)
    }

    async fn download(&self, source: &str, dest: &Path) -> vs_core::Result<()> {
        self.tool
            .command()
            .args(["--no-playlist", "-f", "worst[ext=mp4]/worst", "-o"])
            .path_arg(dest)
            .arg(source)
            .execute()
            .await?;

        if !dest.exists() {
            return Err(vs_core::Error::tool(
                "yt-dlp",
                format!("download finished but {} was not created", dest.display()),
            ));
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;

    fn fake_tool(dir: &Path, script: &str) -> ToolConfig {
        let path = dir.join("yt-dlp");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        ToolConfig {
            name: "yt-dlp".into(),
            path,
            timeout: Duration::from_secs(10),
        }
    }

    const FAKE_YT_DLP: &str = r#"#!/bin/sh
for a in "$@"; do
  if [ "$a" = "--skip-download" ]; then echo "Rust in Production"; exit 0; fi
done
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then shift; printf 'video' > "$1"; fi
  shift
done
"#;

    #[tokio::test]
    async fn title_is_first_stdout_line() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YtDlpFetcher::new(fake_tool(dir.path(), FAKE_YT_DLP));
        let title = fetcher.title("https://example.com/v").await.unwrap();
        assert_eq!(title, "Rust in Production");
    }

    #[tokio::test]
    async fn download_writes_destination() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YtDlpFetcher::new(fake_tool(dir.path(), FAKE_YT_DLP));
        let dest = dir.path().join("out.mp4");
        fetcher.download("https://example.com/v", &dest).await.unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "video");
    }

    #[tokio::test]
    async fn empty_title_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YtDlpFetcher::new(fake_tool(dir.path(), "#!/bin/sh\nexit 0\n"));
        let err = fetcher.title("src").await.unwrap_err();
        assert!(err.to_string().contains("no title"), "got: {err}");
    }

    #[tokio::test]
    async fn missing_output_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YtDlpFetcher::new(fake_tool(dir.path(), "#!/bin/sh\nexit 0\n"));
        let err = fetcher
            .download("src", &dir.path().join("never.mp4"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), vs_core::ErrorKind::External);
    }

    #[test]
    fn from_registry_requires_tool() {
        assert!(YtDlpFetcher::from_registry(&ToolRegistry::default()).is_err());
    }
}
