// ABOUTME: Model pricing table with date-suffix and prefix fuzzy matching for cost estimates
// ABOUTME: Turns reported token usage into a rounded USD cost side channel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Cost Estimator
//!
//! `cost = prompt / 1000 * input_per_1k + completion / 1000 * output_per_1k`,
//! rounded to six decimals. Lookups consult the override table first, then
//! the built-in defaults. Within one table the order is:
//!
//! 1. exact model name
//! 2. model name without a trailing `-YYYY-MM-DD`
//! 3. any entry whose own date-stripped name equals that base
//! 4. any entry that prefixes the base, or that the base prefixes
//!
//! A model with no match has no cost; that is not an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use food_lens_core::models::CostEstimate;

use crate::llm::TokenUsage;

/// Trailing release date on versioned model names
static DATE_SUFFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)-\d{4}-\d{2}-\d{2}$").ok());

/// Price of one model in USD per 1000 tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// USD per 1K prompt tokens
    #[serde(rename = "inputPer1K")]
    pub input_per_1k: f64,
    /// USD per 1K completion tokens
    #[serde(rename = "outputPer1K")]
    pub output_per_1k: f64,
}

impl ModelPricing {
    /// Create a price entry
    #[must_use]
    pub const fn new(input_per_1k: f64, output_per_1k: f64) -> Self {
        Self {
            input_per_1k,
            output_per_1k,
        }
    }

    /// Unrounded cost of a call
    #[must_use]
    pub fn cost(&self, prompt_tokens: u32, completion_tokens: u32) -> f64 {
        f64::from(prompt_tokens) / 1000.0 * self.input_per_1k
            + f64::from(completion_tokens) / 1000.0 * self.output_per_1k
    }
}

/// Built-in prices, in lookup order
const DEFAULT_PRICING: &[(&str, ModelPricing)] = &[
    ("gpt-4o-mini-2024-07-18", ModelPricing::new(0.000_15, 0.000_6)),
    ("gpt-5-mini-2025-08-07", ModelPricing::new(0.000_25, 0.002)),
    ("gpt-5-2025-08-07", ModelPricing::new(0.000_25, 0.002)),
    ("deepseek-chat", ModelPricing::new(0.000_14, 0.000_28)),
    ("deepseek-reasoner", ModelPricing::new(0.000_55, 0.002_19)),
];

/// Strip a trailing `-YYYY-MM-DD` release date
#[must_use]
pub fn normalize_model_base(model: &str) -> &str {
    DATE_SUFFIX
        .as_ref()
        .and_then(|re| re.find(model))
        .map_or(model, |m| &model[..m.start()])
}

/// Round to six decimal places
#[must_use]
pub fn round_to_6(amount: f64) -> f64 {
    (amount * 1e6).round() / 1e6
}

/// `$x.xxxxxx`
#[must_use]
pub fn format_usd(amount: f64) -> String {
    format!("${amount:.6}")
}

/// Immutable pricing lookup, injected into the analysis services
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTable {
    overrides: Vec<(String, ModelPricing)>,
    defaults: Vec<(String, ModelPricing)>,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            overrides: Vec::new(),
            defaults: DEFAULT_PRICING
                .iter()
                .map(|(name, pricing)| ((*name).to_owned(), *pricing))
                .collect(),
        }
    }
}

impl PricingTable {
    /// Table with no entries at all
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            overrides: Vec::new(),
            defaults: Vec::new(),
        }
    }

    /// Defaults plus override entries consulted before them
    #[must_use]
    pub fn with_overrides(overrides: impl IntoIterator<Item = (String, ModelPricing)>) -> Self {
        Self {
            overrides: overrides.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Defaults plus overrides from a `{"model": {"inputPer1K": .., "outputPer1K": ..}}` document
    ///
    /// A malformed document is ignored with a warning.
    #[must_use]
    pub fn from_override_json(json: Option<&str>) -> Self {
        let Some(json) = json.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };
        match serde_json::from_str::<BTreeMap<String, ModelPricing>>(json) {
            Ok(map) => Self::with_overrides(map),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed pricing override JSON");
                Self::default()
            }
        }
    }

    /// Price for a model, overrides first
    #[must_use]
    pub fn pricing_for(&self, model: &str) -> Option<ModelPricing> {
        Self::loose_match(&self.overrides, model).or_else(|| Self::loose_match(&self.defaults, model))
    }

    fn loose_match(entries: &[(String, ModelPricing)], model: &str) -> Option<ModelPricing> {
        let base = normalize_model_base(model);
        let lookup = |name: &str| {
            entries
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, pricing)| *pricing)
        };

        lookup(model)
            .or_else(|| lookup(base))
            .or_else(|| {
                entries
                    .iter()
                    .find(|(key, _)| normalize_model_base(key) == base)
                    .map(|(_, pricing)| *pricing)
            })
            .or_else(|| {
                entries
                    .iter()
                    .find(|(key, _)| {
                        key.starts_with(base) || base.starts_with(normalize_model_base(key))
                    })
                    .map(|(_, pricing)| *pricing)
            })
    }

    /// Cost of a call rounded to six decimals, if the model is priced
    #[must_use]
    pub fn cost_usd(&self, model: &str, prompt_tokens: u32, completion_tokens: u32) -> Option<f64> {
        self.pricing_for(model)
            .map(|pricing| round_to_6(pricing.cost(prompt_tokens, completion_tokens)))
    }

    /// Cost side channel for one call; `None` when the provider reported no usage
    #[must_use]
    pub fn estimate(&self, model: &str, usage: Option<&TokenUsage>) -> Option<CostEstimate> {
        let usage = usage?;
        let model = (!model.is_empty()).then(|| model.to_owned());
        let cost_usd = model
            .as_deref()
            .and_then(|m| self.cost_usd(m, usage.prompt_tokens, usage.completion_tokens));

        Some(CostEstimate {
            model,
            prompt_tokens: Some(usage.prompt_tokens),
            completion_tokens: Some(usage.completion_tokens),
            total_tokens: Some(usage.total()),
            cost_usd,
        })
    }
}
