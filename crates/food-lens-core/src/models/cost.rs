// ABOUTME: Token usage and estimated cost metadata for a single model call
// ABOUTME: Response envelope pairing an analysis record with its cost side channel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Usage and cost of the model call behind one analysis
///
/// Derived data, never authoritative. `None` means the figure was unavailable,
/// not that it was zero, so fields serialize as `null` rather than being omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    /// Model identifier the provider reported
    pub model: Option<String>,
    /// Prompt (input) tokens
    pub prompt_tokens: Option<u32>,
    /// Completion (output) tokens
    pub completion_tokens: Option<u32>,
    /// Total tokens
    pub total_tokens: Option<u32>,
    /// Estimated cost in USD, rounded to six decimals
    pub cost_usd: Option<f64>,
}

/// Envelope returned by every inbound analysis operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse<T> {
    /// The sanitized, reconciled record
    pub data: T,
    /// Cost metadata; `None` when no model call was made or usage was not reported
    pub meta: Option<CostEstimate>,
}

impl<T> AnalysisResponse<T> {
    /// Wrap a record with optional cost metadata
    #[must_use]
    pub const fn new(data: T, meta: Option<CostEstimate>) -> Self {
        Self { data, meta }
    }
}
