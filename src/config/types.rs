// ABOUTME: Core configuration type definitions for model provider selection
// ABOUTME: Contains the LlmProviderType enum and its environment parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// LLM provider selection for the analysis pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// `OpenAI` cloud chat completions (default)
    #[default]
    OpenAi,
    /// Google Gemini `generateContent`
    Gemini,
    /// Local LLM provider - `OpenAI`-compatible endpoint (Ollama, vLLM, `LocalAI`)
    Local,
}

impl LlmProviderType {
    /// Environment variable name for LLM provider selection
    pub const ENV_VAR: &'static str = "FOOD_LENS_LLM_PROVIDER";

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Self::Gemini,
            "local" | "ollama" | "vllm" | "localai" => Self::Local,
            _ => Self::OpenAi, // Default fallback (including "openai")
        }
    }

    /// Load from environment variable
    #[must_use]
    pub fn from_env() -> Self {
        env::var(Self::ENV_VAR)
            .map(|s| Self::from_str_or_default(&s))
            .unwrap_or_default()
    }

    /// Default model for image analysis on this provider
    #[must_use]
    pub const fn default_vision_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Gemini => "gemini-2.5-flash",
            Self::Local => "llava:13b",
        }
    }

    /// Default model for exercise analysis on this provider
    #[must_use]
    pub const fn default_exercise_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-5-mini",
            Self::Gemini => "gemini-2.5-flash",
            Self::Local => "llava:13b",
        }
    }
}

impl Display for LlmProviderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Gemini => write!(f, "gemini"),
            Self::Local => write!(f, "local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_or_default() {
        assert_eq!(LlmProviderType::from_str_or_default("Gemini"), LlmProviderType::Gemini);
        assert_eq!(LlmProviderType::from_str_or_default("ollama"), LlmProviderType::Local);
        assert_eq!(LlmProviderType::from_str_or_default("openai"), LlmProviderType::OpenAi);
        assert_eq!(LlmProviderType::from_str_or_default("bogus"), LlmProviderType::OpenAi);
    }
}
