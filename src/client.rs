use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ServiceSettings;
use crate::error::{BODY_PREVIEW_CHARS, ForgeError, Result, preview_head};

/// Anything that can turn a prompt into a response envelope.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: &ResponsesRequest) -> Result<ResponseEnvelope>;
}

#[derive(Debug, Clone)]
pub struct ResponsesClient {
    http: Client,
    base_url: String,
    api_key: String,
    user_agent: String,
    timeout_secs: u64,
}

impl ResponsesClient {
    pub fn new(settings: &ServiceSettings) -> Result<Self> {
        let sanitized_base = settings.base_url.trim_end_matches('/').to_string();
        if sanitized_base.is_empty() {
            return Err(ForgeError::Configuration("base URL cannot be empty".into()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| {
                ForgeError::Configuration(format!("failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            http,
            base_url: sanitized_base,
            api_key: settings.api_key.clone(),
            user_agent: settings.user_agent.clone(),
            timeout_secs: settings.timeout_secs,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> ForgeError {
        if err.is_timeout() {
            ForgeError::Transport(format!(
                "request timed out after {}s: {err}",
                self.timeout_secs
            ))
        } else {
            ForgeError::Transport(format!("request to generation service failed: {err}"))
        }
    }
}

#[async_trait]
impl GenerationService for ResponsesClient {
    async fn generate(&self, request: &ResponsesRequest) -> Result<ResponseEnvelope> {
        let url = format!("{}/responses", self.base_url);
        info!(
            model = %request.model,
            max_output_tokens = request.max_output_tokens,
            "calling generation service"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("User-Agent", &self.user_agent)
            .json(request)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|err| self.transport_error(err))?;
        info!(status = status.as_u16(), "generation service responded");
        debug!(body = preview_head(&raw, BODY_PREVIEW_CHARS), "raw response");

        if !status.is_success() {
            let hint = match status {
                StatusCode::UNAUTHORIZED => " (check the API key)",
                StatusCode::TOO_MANY_REQUESTS => " (rate limited or out of quota)",
                _ => "",
            };
            return Err(ForgeError::Transport(format!(
                "generation service returned {status}{hint}: {}",
                preview_head(&raw, BODY_PREVIEW_CHARS)
            )));
        }

        serde_json::from_str::<ResponseEnvelope>(&raw).map_err(|err| {
            ForgeError::Contract(format!(
                "response body is not a response envelope ({err}): {}",
                preview_head(&raw, BODY_PREVIEW_CHARS)
            ))
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: String,
    pub max_output_tokens: u32,
    pub text: TextOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextOptions {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    JsonSchema {
        name: String,
        schema: Value,
        strict: bool,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub incomplete_details: Option<Value>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Vec<ContentSegment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentSegment {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl ResponseEnvelope {
    /// Envelope holding one completed message with the given text, as the service sends it.
    #[cfg(test)]
    pub fn completed_with_text(text: &str) -> Self {
        Self {
            status: Some("completed".into()),
            incomplete_details: None,
            output: vec![OutputItem {
                kind: "message".into(),
                content: vec![ContentSegment {
                    kind: "output_text".into(),
                    text: Some(text.into()),
                }],
            }],
        }
    }
}
