//! LLM client — the single point of entry for all generation calls in the engine.
//!
//! ARCHITECTURAL RULE: no other module may call the Anthropic API directly.
//! Components receive a [`GenerationClient`], which enforces the enabled flag,
//! applies the per-call timeout, and records every attempt in the usage
//! counter. A failed call is never retried here: the round loop treats a
//! failure as the end of the interview and the assessment pipeline falls back
//! to deterministic scoring.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::errors::EngineError;
use crate::usage::UsageRecorder;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all generation calls.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Generation call timed out after {0}s")]
    Timeout(u64),
}

/// One completed generation: the raw text plus the token cost of the call.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub text: String,
    pub tokens_used: u64,
}

/// The generation backend seam. Implement this to swap the real Anthropic
/// client for a scripted one in tests without touching any caller.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<GenerationOutput, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API backend. Makes exactly one attempt per call —
/// retry/backoff is deliberately absent from this engine.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl GenerationBackend for AnthropicClient {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<GenerationOutput, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse a structured error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let api_response: ApiResponse = response.json().await?;
        let tokens_used =
            u64::from(api_response.usage.input_tokens + api_response.usage.output_tokens);

        debug!(
            "generation call succeeded: input_tokens={}, output_tokens={}",
            api_response.usage.input_tokens, api_response.usage.output_tokens
        );

        let text = api_response
            .content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.clone())
            .ok_or(LlmError::EmptyContent)?;

        Ok(GenerationOutput { text, tokens_used })
    }
}

/// Wraps a [`GenerationBackend`] with the permission gate, the per-call
/// timeout, and usage recording. All engine components call through this.
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    recorder: Arc<dyn UsageRecorder>,
    timeout: Duration,
}

impl GenerationClient {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        recorder: Arc<dyn UsageRecorder>,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            recorder,
            timeout,
        }
    }

    /// Fails fast when the generation backend is disabled by configuration.
    /// Checked once at simulation INIT and again before every call.
    pub fn ensure_enabled(&self) -> Result<(), EngineError> {
        if self.recorder.enabled() {
            Ok(())
        } else {
            Err(EngineError::PermissionDenied)
        }
    }

    /// Makes one generation call. Records `(success, tokens, error)` in the
    /// usage counter whether the call succeeds, fails, or times out.
    pub async fn generate(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, EngineError> {
        self.ensure_enabled()?;

        let result = tokio::time::timeout(
            self.timeout,
            self.backend.generate(system, prompt, temperature),
        )
        .await
        .unwrap_or(Err(LlmError::Timeout(self.timeout.as_secs())));

        match result {
            Ok(output) => {
                self.recorder.record(true, output.tokens_used, None);
                Ok(output.text)
            }
            Err(e) => {
                self.recorder.record(false, 0, Some(&e.to_string()));
                Err(EngineError::Generation(e))
            }
        }
    }

    pub fn usage(&self) -> crate::usage::UsageStats {
        self.recorder.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::UsageCounter;

    struct EchoBackend;

    #[async_trait]
    impl GenerationBackend for EchoBackend {
        async fn generate(
            &self,
            _system: &str,
            prompt: &str,
            _temperature: f32,
        ) -> Result<GenerationOutput, LlmError> {
            Ok(GenerationOutput {
                text: prompt.to_string(),
                tokens_used: 42,
            })
        }
    }

    struct BrokenBackend;

    #[async_trait]
    impl GenerationBackend for BrokenBackend {
        async fn generate(
            &self,
            _system: &str,
            _prompt: &str,
            _temperature: f32,
        ) -> Result<GenerationOutput, LlmError> {
            Err(LlmError::Api {
                status: 529,
                message: "overloaded".to_string(),
            })
        }
    }

    fn client(backend: Arc<dyn GenerationBackend>, enabled: bool) -> GenerationClient {
        GenerationClient::new(
            backend,
            Arc::new(UsageCounter::new(enabled)),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_successful_call_records_tokens() {
        let c = client(Arc::new(EchoBackend), true);
        let text = c.generate("sys", "hello", 0.7).await.unwrap();
        assert_eq!(text, "hello");

        let stats = c.usage();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.successes, 1);
        assert_eq!(stats.tokens, 42);
    }

    #[tokio::test]
    async fn test_failed_call_records_error() {
        let c = client(Arc::new(BrokenBackend), true);
        let err = c.generate("sys", "hello", 0.7).await.unwrap_err();
        assert!(matches!(err, EngineError::Generation(_)));

        let stats = c.usage();
        assert_eq!(stats.failures, 1);
        assert!(stats.last_error.unwrap().contains("529"));
    }

    #[tokio::test]
    async fn test_disabled_backend_fails_before_call() {
        let c = client(Arc::new(EchoBackend), false);
        let err = c.generate("sys", "hello", 0.7).await.unwrap_err();
        assert!(matches!(err, EngineError::PermissionDenied));

        // The call was never attempted, so nothing was recorded.
        assert_eq!(c.usage().total, 0);
    }
}
