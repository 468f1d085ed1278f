//! Source list parsing.

use std::path::Path;

/// Parse a source list: one reference per line, blank lines and `#`
/// comments skipped, order preserved.
pub fn parse_sources(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read and parse a source list file.
pub async fn read_sources(path: &Path) -> vs_core::Result<Vec<String>> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        vs_core::Error::Config(format!("failed to read sources file {}: {e}", path.display()))
    })?;
    Ok(parse_sources(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blanks_and_comments() {
        let text = "\n# talks to process\nhttps://a.example/1\n   \n  https://a.example/2  \n#https://skipped\n";
        assert_eq!(
            parse_sources(text),
            vec!["https://a.example/1", "https://a.example/2"]
        );
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        assert_eq!(parse_sources("b\na\nb"), vec!["b", "a", "b"]);
    }

    #[tokio::test]
    async fn missing_file_is_config_error() {
        let err = read_sources(Path::new("/nonexistent/sources.txt")).await.unwrap_err();
        assert_eq!(err.kind(), vs_core::ErrorKind::Configuration);
    }
}
