// ABOUTME: Food and exercise analysis services wiring prompts, model calls and reconciliation
// ABOUTME: Shared cost side-channel logging for every model-backed analysis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Analysis Pipeline
//!
//! `prompt -> invoke -> cost -> sanitize -> reconcile -> score`. Each call is
//! independent and stateless; services hold only injected configuration and
//! an optional provider.

/// Exercise estimation with deterministic fallback
pub mod exercise;
/// Food image, text and fix analysis
pub mod food;
/// Layered JSON recovery and field clamping
pub mod sanitizer;

pub use exercise::ExerciseAnalysisService;
pub use food::{finalize_food, FoodAnalysisService};

use food_lens_core::models::CostEstimate;
use tracing::info;

use crate::llm::ChatResponse;
use crate::pricing::{format_usd, PricingTable};

/// Build and log the cost side channel for one model reply
pub(crate) fn cost_meta(
    pricing: &PricingTable,
    label: &'static str,
    response: &ChatResponse,
) -> Option<CostEstimate> {
    let Some(meta) = pricing.estimate(&response.model, response.usage.as_ref()) else {
        info!(analysis = label, "Token usage not available on response");
        return None;
    };

    info!(
        analysis = label,
        model = meta.model.as_deref().unwrap_or("unknown"),
        prompt_tokens = meta.prompt_tokens,
        completion_tokens = meta.completion_tokens,
        total_tokens = meta.total_tokens,
        "Token usage"
    );
    match meta.cost_usd {
        Some(cost) => info!(analysis = label, cost = %format_usd(cost), "Estimated cost (USD)"),
        None => info!(
            analysis = label,
            model = meta.model.as_deref().unwrap_or("unknown"),
            "Pricing not configured for model"
        ),
    }
    Some(meta)
}
