//! Text-completion collaborator.
//!
//! The service only ever sends a prompt and reads back free text; turning
//! that text into typed data happens in [`extract`].

pub mod extract;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::errors::AppError;

/// Anything that can turn a prompt into a completion.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AppError>;
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: LlmConfig,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(config: LlmConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::collaborator(format!("Failed to build HTTP client: {}", e), None))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(AppError::collaborator(
                "LLM is not configured (GEMINI_API_KEY is unset)",
                None,
            ));
        };

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.config.model, prompt_chars = prompt.len(), "Requesting completion");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::collaborator(format!("LLM request failed: {}", e), None))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::collaborator(format!("Failed to read LLM response: {}", e), None))?;

        if !status.is_success() {
            return Err(AppError::collaborator(
                format!("LLM returned HTTP {}", status.as_u16()),
                Some(text),
            ));
        }

        completion_text(&text)
    }
}

/// Concatenate the text parts of the first candidate.
fn completion_text(body: &str) -> Result<String, AppError> {
    let parsed: GenerateResponse = serde_json::from_str(body).map_err(|e| {
        AppError::collaborator(
            format!("Unexpected LLM response shape: {}", e),
            Some(body.to_string()),
        )
    })?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AppError::collaborator(
            "LLM returned no completion",
            Some(body.to_string()),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_completion_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#;
        assert_eq!(completion_text(body).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_completion_text_without_candidates_is_collaborator_error() {
        let err = completion_text(r#"{"candidates":[]}"#).unwrap_err();
        assert!(matches!(err, AppError::Collaborator { raw: Some(_), .. }));
    }

    #[test]
    fn test_completion_text_rejects_unexpected_shape() {
        let err = completion_text("<html>gateway timeout</html>").unwrap_err();
        match err {
            AppError::Collaborator { raw, .. } => {
                assert_eq!(raw.as_deref(), Some("<html>gateway timeout</html>"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_endpoint_format() {
        let client = GeminiClient::new(LlmConfig {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://example.test/".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = GeminiClient::new(LlmConfig {
            api_key: None,
            model: "m".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, AppError::Collaborator { raw: None, .. }));
    }
}
