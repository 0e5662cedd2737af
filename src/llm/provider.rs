// ABOUTME: Unified LLM provider selector built from injected configuration
// ABOUTME: Abstracts over OpenAI, Gemini and local OpenAI-compatible servers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Selector
//!
//! Provider selection comes from [`LlmConfig`]:
//! - `openai` (default): `OpenAI` chat completions (requires `OPENAI_API_KEY`)
//! - `gemini`: Google Gemini `generateContent` (requires `GEMINI_API_KEY`)
//! - `local`: Ollama, vLLM or `LocalAI` through the `OpenAI`-compatible API
//!
//! Missing credentials are not an error here; [`ChatProvider::from_config`]
//! returns `Ok(None)` and each analysis path decides how to degrade.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{
    ChatRequest, ChatResponse, GeminiProvider, LlmCapabilities, LlmProvider,
    OpenAiCompatibleConfig, OpenAiCompatibleProvider,
};
use crate::config::{LlmConfig, LlmProviderType};
use crate::errors::AppError;

/// Unified chat provider that wraps `OpenAI`, Gemini, or a local LLM
pub enum ChatProvider {
    /// `OpenAI` cloud provider
    OpenAi(OpenAiCompatibleProvider),
    /// Google Gemini provider
    Gemini(GeminiProvider),
    /// Local LLM provider via `OpenAI`-compatible API
    Local(OpenAiCompatibleProvider),
}

impl ChatProvider {
    /// Create the configured provider
    ///
    /// Returns `Ok(None)` when the selected cloud provider has no API key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a malformed base URL, or an error if
    /// the HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, AppError> {
        info!(
            "Initializing LLM provider: {} (set {} to change)",
            config.provider,
            LlmProviderType::ENV_VAR
        );

        let provider = match config.provider {
            LlmProviderType::OpenAi => match &config.openai_api_key {
                Some(key) => Some(Self::openai(key, config.openai_base_url.clone())?),
                None => None,
            },
            LlmProviderType::Gemini => match &config.gemini_api_key {
                Some(key) => Some(Self::gemini(key)?),
                None => None,
            },
            LlmProviderType::Local => Some(Self::local(
                config.local_base_url.clone(),
                config.local_api_key.clone(),
            )?),
        };

        match &provider {
            Some(p) => debug!(
                "Provider {} initialized with model: {}",
                p.display_name(),
                p.default_model()
            ),
            None => info!(
                "No credentials for {} provider; model calls are unavailable",
                config.provider
            ),
        }

        Ok(provider)
    }

    /// Create an `OpenAI` provider explicitly
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn openai(api_key: &str, base_url: Option<String>) -> Result<Self, AppError> {
        Ok(Self::OpenAi(OpenAiCompatibleProvider::new(
            OpenAiCompatibleConfig::openai(api_key, base_url),
        )?))
    }

    /// Create a Gemini provider explicitly
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn gemini(api_key: &str) -> Result<Self, AppError> {
        Ok(Self::Gemini(GeminiProvider::new(api_key)?))
    }

    /// Create a local LLM provider explicitly
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn local(base_url: Option<String>, api_key: Option<String>) -> Result<Self, AppError> {
        Ok(Self::Local(OpenAiCompatibleProvider::new(
            OpenAiCompatibleConfig::local(base_url, api_key),
        )?))
    }

    /// Get the provider type
    #[must_use]
    pub const fn provider_type(&self) -> LlmProviderType {
        match self {
            Self::OpenAi(_) => LlmProviderType::OpenAi,
            Self::Gemini(_) => LlmProviderType::Gemini,
            Self::Local(_) => LlmProviderType::Local,
        }
    }
}

impl fmt::Debug for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi(_) => f.debug_tuple("ChatProvider::OpenAi").finish(),
            Self::Gemini(_) => f.debug_tuple("ChatProvider::Gemini").finish(),
            Self::Local(_) => f.debug_tuple("ChatProvider::Local").finish(),
        }
    }
}

// Implement LlmProvider trait for ChatProvider to enable trait object usage
#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        match self {
            Self::OpenAi(p) | Self::Local(p) => p.name(),
            Self::Gemini(p) => p.name(),
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAi(p) | Self::Local(p) => p.display_name(),
            Self::Gemini(p) => p.display_name(),
        }
    }

    fn capabilities(&self) -> LlmCapabilities {
        match self {
            Self::OpenAi(p) | Self::Local(p) => p.capabilities(),
            Self::Gemini(p) => p.capabilities(),
        }
    }

    fn default_model(&self) -> &str {
        match self {
            Self::OpenAi(p) | Self::Local(p) => p.default_model(),
            Self::Gemini(p) => p.default_model(),
        }
    }

    fn available_models(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAi(p) | Self::Local(p) => p.available_models(),
            Self::Gemini(p) => p.available_models(),
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        match self {
            Self::OpenAi(p) | Self::Local(p) => p.complete(request).await,
            Self::Gemini(p) => p.complete(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_openai_key_is_unavailable() {
        let config = LlmConfig::default();
        let provider = ChatProvider::from_config(&config).unwrap();
        assert!(provider.is_none());
    }

    #[test]
    fn test_missing_gemini_key_is_unavailable() {
        let config = LlmConfig {
            provider: LlmProviderType::Gemini,
            openai_api_key: Some("sk-test".into()),
            ..LlmConfig::default()
        };
        assert!(ChatProvider::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_local_needs_no_key() {
        let config = LlmConfig {
            provider: LlmProviderType::Local,
            ..LlmConfig::default()
        };
        let provider = ChatProvider::from_config(&config).unwrap().unwrap();
        assert_eq!(provider.provider_type(), LlmProviderType::Local);
        assert!(provider.capabilities().supports_vision());
    }

    #[test]
    fn test_malformed_local_url_fails_loudly() {
        let config = LlmConfig {
            provider: LlmProviderType::Local,
            local_base_url: Some("ollama-box/v1".into()),
            ..LlmConfig::default()
        };
        let error = ChatProvider::from_config(&config).unwrap_err();
        assert_eq!(error.code, crate::errors::ErrorCode::ConfigInvalid);
        assert_eq!(error.http_status(), 500);
    }

    #[test]
    fn test_openai_with_key() {
        let config = LlmConfig {
            openai_api_key: Some("sk-test".into()),
            ..LlmConfig::default()
        };
        let provider = ChatProvider::from_config(&config).unwrap().unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.default_model(), "gpt-4o-mini");
    }
}
