// ABOUTME: OpenAI-compatible chat completions provider for cloud and local endpoints
// ABOUTME: Sends JSON-mode requests with inline data-URL images to OpenAI, Ollama, vLLM or LocalAI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! Generic implementation for any endpoint speaking the `OpenAI` chat
//! completions API, including the `OpenAI` cloud itself.
//!
//! ## Configuration
//!
//! - `OPENAI_API_KEY` / `OPENAI_BASE_URL` for the cloud (see [`OpenAiCompatibleConfig::openai`])
//! - `LOCAL_LLM_BASE_URL` (default: <http://localhost:11434/v1>) and the
//!   optional `LOCAL_LLM_API_KEY` for local servers
//!
//! ## Supported Backends
//!
//! - **`OpenAI`**: <https://api.openai.com/v1>
//! - **Ollama**: <http://localhost:11434/v1>
//! - **vLLM**: <http://localhost:8000/v1>
//! - **`LocalAI`**: <http://localhost:8080/v1>

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use crate::errors::{AppError, ErrorCode};

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default base URL of the `OpenAI` cloud
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default base URL (Ollama)
pub const LOCAL_DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

/// Default model for the `OpenAI` cloud
const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default model for local inference
const LOCAL_DEFAULT_MODEL: &str = "llava:13b";

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout (local vision inference can be slow)
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Models listed for the `OpenAI` cloud
const OPENAI_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o", "gpt-5-mini", "gpt-5"];

/// Common vision-capable models available via Ollama
const LOCAL_MODELS: &[&str] = &[
    "llava:13b",
    "llava:7b",
    "llama3.2-vision:11b",
    "qwen2.5vl:7b",
];

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

/// `response_format` field
#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Message structure for OpenAI-compatible API
#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: OpenAiContent,
}

/// Plain text or multi-part (text + images) content
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OpenAiContent {
    Text(String),
    Parts(Vec<OpenAiContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OpenAiContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        let content = if msg.has_images() {
            let mut parts = vec![OpenAiContentPart::Text {
                text: msg.content.clone(),
            }];
            parts.extend(msg.images.iter().map(|image| OpenAiContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: image.data_url(),
                },
            }));
            OpenAiContent::Parts(parts)
        } else {
            OpenAiContent::Text(msg.content.clone())
        };
        Self {
            role: msg.role.as_str(),
            content,
        }
    }
}

/// OpenAI-compatible API response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
    #[serde(default)]
    parsed: Option<Value>,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens", default)]
    prompt: Option<u32>,
    #[serde(rename = "completion_tokens", default)]
    completion: Option<u32>,
    #[serde(rename = "total_tokens", default)]
    total: Option<u32>,
}

/// Error response structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <http://localhost:11434/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for display/logging
    pub provider_name: &'static str,
    /// Provider display name
    pub display_name: &'static str,
    /// Capabilities of this provider
    pub capabilities: LlmCapabilities,
    /// Send the token budget as `max_completion_tokens` (current `OpenAI` models)
    pub use_max_completion_tokens: bool,
}

impl OpenAiCompatibleConfig {
    /// Configuration for the `OpenAI` cloud
    #[must_use]
    pub fn openai(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| OPENAI_DEFAULT_BASE_URL.to_owned()),
            api_key: Some(api_key.into()),
            default_model: OPENAI_DEFAULT_MODEL.to_owned(),
            provider_name: "openai",
            display_name: "OpenAI",
            capabilities: LlmCapabilities::full_featured(),
            use_max_completion_tokens: true,
        }
    }

    /// Configuration for a local server; the display name is guessed from the port
    #[must_use]
    pub fn local(base_url: Option<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| LOCAL_DEFAULT_BASE_URL.to_owned());
        let (provider_name, display_name) = if base_url.contains(":11434") {
            ("ollama", "Ollama (Local)")
        } else if base_url.contains(":8000") {
            ("vllm", "vLLM (Local)")
        } else if base_url.contains(":8080") {
            ("localai", "LocalAI")
        } else {
            ("local", "Local LLM")
        };
        Self {
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
            default_model: LOCAL_DEFAULT_MODEL.to_owned(),
            provider_name,
            display_name,
            capabilities: LlmCapabilities::full_featured(),
            use_max_completion_tokens: false,
        }
    }

    /// Set the default model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
#[derive(Debug)]
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

fn validate_base_url(base_url: &str) -> Result<(), AppError> {
    match Url::parse(base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        Ok(_) => Err(AppError::config(format!(
            "Invalid LLM base URL '{base_url}': expected http:// or https:// with a host"
        ))),
        Err(e) => Err(AppError::config(format!("Invalid LLM base URL '{base_url}': {e}"))
            .with_source(e)),
    }
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is not an absolute
    /// `http`/`https` URL, or an internal error if the HTTP client cannot be
    /// created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        validate_base_url(&config.base_url)?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing {} provider: base_url={}, model={}",
            config.display_name, config.base_url, config.default_model
        );

        Ok(Self { client, config })
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Translate an internal request into the wire format
    fn build_request(&self, request: &ChatRequest) -> OpenAiRequest {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);
        let (max_tokens, max_completion_tokens) = if self.config.use_max_completion_tokens {
            (None, request.max_tokens)
        } else {
            (request.max_tokens, None)
        };
        let response_format = (request.json_mode && self.config.capabilities.supports_json_mode())
            .then_some(ResponseFormat {
                format_type: "json_object",
            });

        OpenAiRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens,
            max_completion_tokens,
            response_format,
        }
    }

    /// Parse error response from API
    fn parse_error_response(&self, status: reqwest::StatusCode, body: &str) -> AppError {
        let service = self.config.display_name;
        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                401 | 403 => AppError::new(
                    ErrorCode::ExternalAuthFailed,
                    format!(
                        "API authentication failed: {}",
                        error_response.error.message
                    ),
                ),
                429 => AppError::new(
                    ErrorCode::ExternalRateLimited,
                    Self::extract_rate_limit_message(&error_response.error.message),
                ),
                400 => AppError::invalid_input(format!(
                    "API validation error: {}",
                    error_response.error.message
                )),
                404 => AppError::external_service(
                    service,
                    format!(
                        "Model or endpoint not found: {}",
                        error_response.error.message
                    ),
                ),
                _ => AppError::external_service(
                    service,
                    format!("{} - {}", error_type, error_response.error.message),
                ),
            }
        } else {
            // Non-JSON bodies are common with local servers and proxies
            match status.as_u16() {
                502..=504 => AppError::external_service(
                    service,
                    format!("{service} is not responding ({status})"),
                ),
                _ => AppError::external_service(
                    service,
                    format!(
                        "API error ({}): {}",
                        status,
                        body.chars().take(200).collect::<String>()
                    ),
                ),
            }
        }
    }

    /// Extract a user-friendly rate limit message from an `OpenAI`-style error
    fn extract_rate_limit_message(message: &str) -> String {
        const MARKER: &str = "try again in ";
        if let Some(retry_pos) = message.to_lowercase().find(MARKER) {
            let after_prefix = message.get(retry_pos + MARKER.len()..).unwrap_or_default();
            if let Some(end_pos) = after_prefix.find(|c: char| !c.is_ascii_digit() && c != '.') {
                if let Ok(seconds) = after_prefix[..end_pos].parse::<f64>() {
                    let seconds_int = seconds.ceil() as u64;
                    return format!(
                        "LLM rate limit reached. Please try again in {seconds_int} seconds."
                    );
                }
            }
        }
        "LLM rate limit reached. Please wait a moment and try again.".to_owned()
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.config.provider_name
    }

    fn display_name(&self) -> &'static str {
        self.config.display_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    fn available_models(&self) -> &'static [&'static str] {
        if self.config.provider_name == "openai" {
            OPENAI_MODELS
        } else {
            LOCAL_MODELS
        }
    }

    #[instrument(skip(self, request), fields(provider = %self.config.provider_name, model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let openai_request = self.build_request(request);
        let service = self.config.display_name;

        debug!(
            messages = openai_request.messages.len(),
            images = request.has_images(),
            json_mode = openai_request.response_format.is_some(),
            "Sending chat completion request"
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {}: {}", service, e);
                if e.is_connect() {
                    AppError::service_unavailable(format!(
                        "Cannot connect to {service} at {}",
                        self.config.base_url
                    ))
                } else if e.is_timeout() {
                    AppError::external_service(service, "Request timed out")
                } else {
                    AppError::external_service(service, format!("Failed to connect: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read API response: {}", e);
            AppError::external_service(service, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            error!(status = %status, "{} API error", service);
            return Err(self.parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse API response: {}", e);
            AppError::external_service(service, format!("Failed to parse response: {e}"))
        })?;

        let model = openai_response
            .model
            .unwrap_or_else(|| openai_request.model.clone());
        let usage = openai_response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt.unwrap_or(0),
            completion_tokens: u.completion.unwrap_or(0),
            total_tokens: u.total,
        });

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service(service, "API returned no choices"))?;

        let content = choice.message.content.unwrap_or_default();
        let parsed = choice.message.parsed.filter(Value::is_object);

        debug!(
            "Received response from {}: {} chars, structured={}, finish_reason: {:?}",
            service,
            content.len(),
            parsed.is_some(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            parsed,
            model,
            usage,
            finish_reason: choice.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ImageAttachment;

    #[test]
    fn test_local_display_name_from_port() {
        assert_eq!(OpenAiCompatibleConfig::local(None, None).provider_name, "ollama");
        assert_eq!(
            OpenAiCompatibleConfig::local(Some("http://gpu:8000/v1".into()), Some(String::new()))
                .provider_name,
            "vllm"
        );
    }

    #[test]
    fn test_image_message_serializes_as_parts() {
        let message = ChatMessage::user_with_image(
            "analyze",
            ImageAttachment::new("image/webp", vec![1_u8, 2, 3]),
        );
        let json = serde_json::to_value(OpenAiMessage::from(&message)).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][1]["type"], "image_url");
        assert_eq!(
            json["content"][1]["image_url"]["url"],
            "data:image/webp;base64,AQID"
        );
    }

    #[test]
    fn test_openai_uses_completion_token_field_and_json_mode() {
        let provider =
            OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::openai("sk-test", None)).unwrap();
        let request = ChatRequest::new(vec![ChatMessage::user("hi")])
            .with_max_tokens(800)
            .with_json_mode();
        let json = serde_json::to_value(provider.build_request(&request)).unwrap();
        assert_eq!(json["max_completion_tokens"], 800);
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_malformed_base_url_is_config_error() {
        for base_url in ["localhost:11434/v1", "not a url", "ftp://models.lan/v1"] {
            let config = OpenAiCompatibleConfig::local(Some(base_url.into()), None);
            let error = OpenAiCompatibleProvider::new(config).unwrap_err();
            assert_eq!(error.code, ErrorCode::ConfigInvalid, "{base_url}");
            assert!(error.message.contains(base_url));
        }
    }

    #[test]
    fn test_local_model_list_is_vision_only() {
        assert!(OpenAiCompatibleConfig::local(None, None)
            .capabilities
            .supports_vision());
        assert!(LOCAL_MODELS.contains(&LOCAL_DEFAULT_MODEL));
        for model in LOCAL_MODELS {
            assert!(
                ["llava", "vision", "vl:"].iter().any(|tag| model.contains(tag)),
                "{model} cannot read meal photos"
            );
        }
    }

    #[test]
    fn test_rate_limit_message() {
        assert_eq!(
            OpenAiCompatibleProvider::extract_rate_limit_message(
                "Rate limit reached. Please try again in 6.5s."
            ),
            "LLM rate limit reached. Please try again in 7 seconds."
        );
    }
}
