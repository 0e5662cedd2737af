// ABOUTME: Per-request analysis records produced by the estimation pipeline
// ABOUTME: Food results with ingredients, exercise results, and cost metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Every record here is created fresh per request and has no identity beyond
//! the single reconciliation pass that produced it. Field names serialize in
//! camelCase, the shape consumed by persistence and the mobile clients.

/// Model-usage and cost side channel
pub mod cost;
/// Exercise estimation records
pub mod exercise;
/// Food estimation records
pub mod food;

pub use cost::{AnalysisResponse, CostEstimate};
pub use exercise::{ExerciseResult, Intensity};
pub use food::{AnalysisResult, Ingredient};
