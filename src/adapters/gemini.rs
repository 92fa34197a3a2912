use crate::core::{GeminiSettings, GenerationClient};
use crate::utils::error::{ExamError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// `generateContent` client for the Google Generative Language REST API.
pub struct GeminiClient {
    client: Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!("Sending generateContent request for model {}", self.model());
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Gemini response status: {}", status);

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExamError::generation(format!(
                "Gemini returned {}: {}",
                status, detail
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_text(parsed)
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(ExamError::generation(format!(
            "Prompt was blocked: {}",
            reason
        )));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ExamError::generation("Response contained no candidates"))?;

    let texts: Vec<String> = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if texts.is_empty() {
        return Err(ExamError::generation(format!(
            "Candidate contained no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(texts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn settings(base_url: String) -> GeminiSettings {
        GeminiSettings {
            api_key: "test-key".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url,
            timeout_seconds: 5,
        }
    }

    const PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path(PATH)
                .header("x-goog-api-key", "test-key")
                .json_body(json!({
                    "contents": [{"role": "user", "parts": [{"text": "Make an exam"}]}]
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": "1. 2 + 2 = ?"}]},
                        "finishReason": "STOP"
                    }]
                }));
        });

        let client = GeminiClient::new(settings(server.base_url())).unwrap();
        let text = client.generate("Make an exam").await.unwrap();

        api_mock.assert();
        assert_eq!(text, "1. 2 + 2 = ?");
    }

    #[tokio::test]
    async fn test_generate_joins_multiple_parts() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "1. 3 x 4 = ?\n"}, {"text": "2. 6 x 7 = ?"}]}
                }]
            }));
        });

        let client = GeminiClient::new(settings(server.base_url())).unwrap();
        let text = client.generate("prompt").await.unwrap();

        assert_eq!(text, "1. 3 x 4 = ?\n2. 6 x 7 = ?");
    }

    #[tokio::test]
    async fn test_error_status_is_generation_failure() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(429)
                .json_body(json!({"error": {"status": "RESOURCE_EXHAUSTED"}}));
        });

        let client = GeminiClient::new(settings(server.base_url())).unwrap();
        let err = client.generate("prompt").await.unwrap_err();

        api_mock.assert();
        match err {
            ExamError::Generation { message } => assert!(message.contains("429")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_generation_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200)
                .json_body(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        });

        let client = GeminiClient::new(settings(server.base_url())).unwrap();
        let err = client.generate("prompt").await.unwrap_err();

        assert!(matches!(err, ExamError::Generation { .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200)
                .header("Content-Type", "application/json")
                .body("not json");
        });

        let client = GeminiClient::new(settings(server.base_url())).unwrap();
        assert!(client.generate("prompt").await.is_err());
    }

    #[test]
    fn test_candidate_without_text_is_rejected() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "MAX_TOKENS"}]
        }))
        .unwrap();

        let err = extract_text(response).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({
                    "candidates": [{"content": {"parts": [{"text": "too late"}]}}]
                }));
        });

        let client = GeminiClient::new(GeminiSettings {
            timeout_seconds: 1,
            ..settings(server.base_url())
        })
        .unwrap();

        let started = std::time::Instant::now();
        let err = client.generate("prompt").await.unwrap_err();

        assert!(matches!(err, ExamError::Api(ref e) if e.is_timeout()));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_an_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GeminiClient::new(settings(format!("http://{}", addr))).unwrap();
        let err = client.generate("prompt").await.unwrap_err();

        assert!(matches!(err, ExamError::Api(_)));
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let client = GeminiClient::new(settings("http://localhost:9999/".to_string())).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
