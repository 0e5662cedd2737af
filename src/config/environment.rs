// ABOUTME: Environment-based configuration for providers, models, pricing and locale defaults
// ABOUTME: Loaded once at process start and injected into the analysis services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt;

use food_lens_core::Locale;
use food_lens_intelligence::IntelligenceConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::LlmProviderType;
use crate::pricing::PricingTable;

/// `OpenAI` API key
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// `OpenAI`-compatible base URL override for the cloud provider
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
/// Gemini API key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Local server base URL
pub const LOCAL_LLM_BASE_URL_ENV: &str = "LOCAL_LLM_BASE_URL";
/// Local server API key (optional)
pub const LOCAL_LLM_API_KEY_ENV: &str = "LOCAL_LLM_API_KEY";
/// Model for image mode
pub const VISION_MODEL_ENV: &str = "FOOD_LENS_VISION_MODEL";
/// Model for text and fix mode
pub const TEXT_MODEL_ENV: &str = "FOOD_LENS_TEXT_MODEL";
/// Model for exercise mode
pub const EXERCISE_MODEL_ENV: &str = "FOOD_LENS_EXERCISE_MODEL";
/// Completion budget for food modes
pub const FOOD_MAX_TOKENS_ENV: &str = "FOOD_LENS_FOOD_MAX_TOKENS";
/// Completion budget for exercise mode
pub const EXERCISE_MAX_TOKENS_ENV: &str = "FOOD_LENS_EXERCISE_MAX_TOKENS";
/// Sampling temperature for food modes
pub const TEMPERATURE_ENV: &str = "FOOD_LENS_TEMPERATURE";
/// Pricing overrides
pub const PRICING_JSON_ENV: &str = "FOOD_LENS_PRICING_JSON";
/// Legacy name of the pricing overrides variable
pub const PRICING_JSON_LEGACY_ENV: &str = "OPENAI_PRICING_JSON";
/// Default output locale of the CLI
pub const DEFAULT_LOCALE_ENV: &str = "FOOD_LENS_DEFAULT_LOCALE";

/// Default completion budget for food analysis
pub const DEFAULT_FOOD_MAX_TOKENS: u32 = 900;
/// Default completion budget for exercise analysis
pub const DEFAULT_EXERCISE_MAX_TOKENS: u32 = 800;
/// Default temperature for food analysis
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Provider selection and credentials
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LlmConfig {
    /// Which backend to talk to
    pub provider: LlmProviderType,
    /// `OpenAI` key; absence means the provider is unavailable
    pub openai_api_key: Option<String>,
    /// `OpenAI` base URL override
    pub openai_base_url: Option<String>,
    /// Gemini key; absence means the provider is unavailable
    pub gemini_api_key: Option<String>,
    /// Local server URL
    pub local_base_url: Option<String>,
    /// Local server key
    pub local_api_key: Option<String>,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("local_base_url", &self.local_base_url)
            .field("local_api_key", &redact(&self.local_api_key))
            .finish()
    }
}

impl LlmConfig {
    /// Load provider selection and credentials from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            provider: LlmProviderType::from_env(),
            openai_api_key: non_empty_env(OPENAI_API_KEY_ENV),
            openai_base_url: non_empty_env(OPENAI_BASE_URL_ENV),
            gemini_api_key: non_empty_env(GEMINI_API_KEY_ENV),
            local_base_url: non_empty_env(LOCAL_LLM_BASE_URL_ENV),
            local_api_key: non_empty_env(LOCAL_LLM_API_KEY_ENV),
        }
    }

    /// Whether the selected provider has what it needs to be called
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        match self.provider {
            LlmProviderType::OpenAi => self.openai_api_key.is_some(),
            LlmProviderType::Gemini => self.gemini_api_key.is_some(),
            LlmProviderType::Local => true,
        }
    }
}

/// Model identifiers and sampling parameters per analysis mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Model for image analysis
    pub vision_model: String,
    /// Model for text and fix analysis
    pub text_model: String,
    /// Model for exercise analysis
    pub exercise_model: String,
    /// Completion budget for food modes
    pub food_max_tokens: u32,
    /// Completion budget for exercise mode
    pub exercise_max_tokens: u32,
    /// Sampling temperature for food modes
    pub temperature: f32,
}

impl ModelSettings {
    /// Defaults for a provider
    #[must_use]
    pub fn defaults_for(provider: LlmProviderType) -> Self {
        let vision_model = provider.default_vision_model().to_owned();
        Self {
            text_model: vision_model.clone(),
            vision_model,
            exercise_model: provider.default_exercise_model().to_owned(),
            food_max_tokens: DEFAULT_FOOD_MAX_TOKENS,
            exercise_max_tokens: DEFAULT_EXERCISE_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Provider defaults with environment overrides; unparsable values are ignored
    #[must_use]
    pub fn from_env(provider: LlmProviderType) -> Self {
        let mut settings = Self::defaults_for(provider);

        if let Some(model) = non_empty_env(VISION_MODEL_ENV) {
            settings.vision_model.clone_from(&model);
            settings.text_model = model;
        }
        if let Some(model) = non_empty_env(TEXT_MODEL_ENV) {
            settings.text_model = model;
        }
        if let Some(model) = non_empty_env(EXERCISE_MODEL_ENV) {
            settings.exercise_model = model;
        }
        parse_env_u32(FOOD_MAX_TOKENS_ENV, &mut settings.food_max_tokens);
        parse_env_u32(EXERCISE_MAX_TOKENS_ENV, &mut settings.exercise_max_tokens);
        parse_env_temperature(TEMPERATURE_ENV, &mut settings.temperature);

        settings
    }
}

/// Complete runtime configuration of the pipeline
#[derive(Debug, Clone)]
pub struct FoodLensConfig {
    /// Provider selection and credentials
    pub llm: LlmConfig,
    /// Models and sampling parameters
    pub models: ModelSettings,
    /// Algorithm tunables
    pub intelligence: IntelligenceConfig,
    /// Cost lookup table
    pub pricing: PricingTable,
    /// Locale used when the caller gives none
    pub default_locale: Locale,
}

impl FoodLensConfig {
    /// Load the whole configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        let llm = LlmConfig::from_env();
        let models = ModelSettings::from_env(llm.provider);
        let pricing_json =
            non_empty_env(PRICING_JSON_ENV).or_else(|| non_empty_env(PRICING_JSON_LEGACY_ENV));
        let default_locale = non_empty_env(DEFAULT_LOCALE_ENV)
            .map(|code| Locale::from_code(&code))
            .unwrap_or_default();

        debug!(
            provider = %llm.provider,
            vision_model = %models.vision_model,
            exercise_model = %models.exercise_model,
            credentials = llm.has_credentials(),
            "Loaded food lens configuration"
        );

        Self {
            llm,
            models,
            intelligence: IntelligenceConfig::default(),
            pricing: PricingTable::from_override_json(pricing_json.as_deref()),
            default_locale,
        }
    }
}

/// Read an environment variable, treating blank values as unset
fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Parse environment variable as a positive u32 and update target if valid
fn parse_env_u32(env_var: &str, target: &mut u32) {
    if let Some(parsed) = non_empty_env(env_var)
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
    {
        *target = parsed;
    }
}

/// Parse environment variable as a temperature in `[0, 2]` and update target if valid
fn parse_env_temperature(env_var: &str, target: &mut f32) {
    if let Some(parsed) = non_empty_env(env_var)
        .and_then(|v| v.parse::<f32>().ok())
        .filter(|v| (0.0..=2.0).contains(v))
    {
        *target = parsed;
    }
}
