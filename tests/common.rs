// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Scripted in-memory LLM provider and service builders for pipeline tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `pierre_food_lens`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use pierre_food_lens::analysis::{ExerciseAnalysisService, FoodAnalysisService};
use pierre_food_lens::config::{LlmProviderType, ModelSettings};
use pierre_food_lens::errors::AppError;
use pierre_food_lens::intelligence::IntelligenceConfig;
use pierre_food_lens::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use pierre_food_lens::pricing::PricingTable;
use serde_json::Value;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("warn")
            .with_test_writer()
            .try_init();
    });
}

/// Provider that returns a fixed reply and records every request
pub struct ScriptedProvider {
    content: String,
    parsed: Option<Value>,
    model: String,
    usage: Option<TokenUsage>,
    error: Mutex<Option<AppError>>,
    delay: Option<Duration>,
    capabilities: LlmCapabilities,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatRequest>>,
}

impl ScriptedProvider {
    /// Reply with `content` and typical usage figures
    pub fn replying(content: &str) -> Self {
        Self {
            content: content.to_owned(),
            parsed: None,
            model: "gpt-4o-mini-2024-07-18".to_owned(),
            usage: Some(TokenUsage {
                prompt_tokens: 1000,
                completion_tokens: 200,
                total_tokens: None,
            }),
            error: Mutex::new(None),
            delay: None,
            capabilities: LlmCapabilities::full_featured(),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Fail the call with the given error
    pub fn failing(error: AppError) -> Self {
        let provider = Self::replying("");
        *provider.error.lock().unwrap() = Some(error);
        provider
    }

    pub fn with_parsed(mut self, parsed: Value) -> Self {
        self.parsed = Some(parsed);
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        model.clone_into(&mut self.model);
        self
    }

    pub const fn without_usage(mut self) -> Self {
        self.usage = None;
        self
    }

    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub const fn with_capabilities(mut self, capabilities: LlmCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    fn available_models(&self) -> &'static [&'static str] {
        &[]
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.error.lock().unwrap().take() {
            return Err(error);
        }

        Ok(ChatResponse {
            content: self.content.clone(),
            parsed: self.parsed.clone(),
            model: self.model.clone(),
            usage: self.usage,
            finish_reason: Some("stop".to_owned()),
        })
    }
}

pub fn model_settings() -> ModelSettings {
    ModelSettings::defaults_for(LlmProviderType::OpenAi)
}

pub fn food_service(provider: Option<Arc<ScriptedProvider>>) -> FoodAnalysisService {
    FoodAnalysisService::with_parts(
        provider.map(|p| p as Arc<dyn LlmProvider>),
        model_settings(),
        IntelligenceConfig::default(),
        Arc::new(PricingTable::default()),
    )
}

pub fn exercise_service(provider: Option<Arc<ScriptedProvider>>) -> ExerciseAnalysisService {
    ExerciseAnalysisService::with_parts(
        provider.map(|p| p as Arc<dyn LlmProvider>),
        model_settings(),
        IntelligenceConfig::default().exercise,
        Arc::new(PricingTable::default()),
    )
}
