//! Machine translation over HTTP.
//!
//! [`HttpTranslator`] speaks the LibreTranslate API: `POST /translate` with
//! `{q, source, target, format}` returning `{translatedText}`. Long inputs are
//! split at word boundaries and translated chunk by chunk.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vs_core::config::TranslationConfig;

/// Largest chunk sent in one request.
const DEFAULT_MAX_CHUNK_CHARS: usize = 5000;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from language code `source` to `target`.
    async fn translate(&self, text: &str, source: &str, target: &str) -> vs_core::Result<String>;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct HttpTranslator {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    max_chunk_chars: usize,
}

impl HttpTranslator {
    pub fn new(config: &TranslationConfig) -> vs_core::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| vs_core::Error::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
        })
    }

    pub fn with_max_chunk_chars(mut self, n: usize) -> Self {
        self.max_chunk_chars = n.max(1);
        self
    }

    async fn translate_chunk(&self, text: &str, source: &str, target: &str) -> vs_core::Result<String> {
        let url = format!("{}/translate", self.endpoint);
        let body = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| vs_core::Error::external("translator", format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(vs_core::Error::external(
                "translator",
                format!("{status}: {detail}"),
            ));
        }

        let parsed: TranslateResponse = resp
            .json()
            .await
            .map_err(|e| vs_core::Error::external("translator", format!("parse error: {e}")))?;
        Ok(parsed.translated_text)
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> vs_core::Result<String> {
        let chunks = chunk_text(text, self.max_chunk_chars);
        tracing::debug!(chunks = chunks.len(), source, target, "Translating text");

        let mut out = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            out.push(self.translate_chunk(chunk, source, target).await?);
        }
        Ok(out.join(" "))
    }
}

/// Split `text` into pieces of at most `max` characters, breaking on
/// whitespace where possible.
fn chunk_text(text: &str, max: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        if rest.chars().count() <= max {
            chunks.push(rest);
            break;
        }
        let hard_end = rest
            .char_indices()
            .nth(max)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let cut = rest[..hard_end]
            .rfind(char::is_whitespace)
            .filter(|&i| i > 0)
            .unwrap_or(hard_end);
        chunks.push(rest[..cut].trim_end());
        rest = rest[cut..].trim_start();
    }
    chunks
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(endpoint: &str) -> TranslationConfig {
        TranslationConfig {
            endpoint: endpoint.to_string(),
            ..TranslationConfig::default()
        }
    }

    #[test]
    fn chunking_respects_word_boundaries() {
        assert_eq!(chunk_text("one two three", 7), vec!["one", "two", "three"]);
        assert_eq!(chunk_text("short", 100), vec!["short"]);
        assert_eq!(chunk_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert!(chunk_text("   ", 10).is_empty());
    }

    #[tokio::test]
    async fn translates_via_api() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(body_partial_json(json!({
                "q": "hello world",
                "source": "en",
                "target": "es",
                "format": "text"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "translatedText": "hola mundo"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let translator = HttpTranslator::new(&config(&server.uri())).unwrap();
        let out = translator.translate("hello world", "en", "es").await.unwrap();
        assert_eq!(out, "hola mundo");
    }

    #[tokio::test]
    async fn long_text_is_chunked() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "translatedText": "x"
            })))
            .expect(3)
            .mount(&server)
            .await;

        let translator = HttpTranslator::new(&config(&server.uri()))
            .unwrap()
            .with_max_chunk_chars(5);
        let out = translator.translate("aaaa bbbb cccc", "en", "es").await.unwrap();
        assert_eq!(out, "x x x");
    }

    #[tokio::test]
    async fn api_error_is_external() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "target language not supported"
            })))
            .mount(&server)
            .await;

        let translator = HttpTranslator::new(&config(&server.uri())).unwrap();
        let err = translator.translate("hi", "en", "xx").await.unwrap_err();
        assert_eq!(err.kind(), vs_core::ErrorKind::External);
        assert!(err.to_string().contains("not supported"), "got: {err}");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_external() {
        let translator = HttpTranslator::new(&config("http://127.0.0.1:9")).unwrap();
        let err = translator.translate("hi", "en", "es").await.unwrap_err();
        assert_eq!(err.kind(), vs_core::ErrorKind::External);
    }
}
