// ABOUTME: Deterministic estimation algorithms with no I/O and no shared state
// ABOUTME: Macro reconciliation, health scoring and MET-based exercise fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Food Lens Intelligence
//!
//! Pure, synchronous functions that turn sanitized model numbers into values
//! the rest of the application can trust arithmetically. Every function takes
//! its tunables as an explicit config reference so tests can substitute them.

/// Tunable constants for every algorithm in this crate
pub mod config;
/// MET keyword table and the deterministic exercise estimator
pub mod exercise;
/// Deterministic 0-10 meal quality score
pub mod health_score;
/// Calorie/macro identity enforcement
pub mod reconciliation;

pub use config::{ExerciseConfig, HealthScoreConfig, IntelligenceConfig, ReconciliationConfig};
pub use exercise::{
    calories_for_met, enforce_plausible_calories, estimate_met, fallback_exercise,
    intensity_for_met, match_activity, ActivityKind,
};
pub use health_score::{blend_health_score, compute_health_score, HealthScoreInput};
pub use reconciliation::{reconcile, tolerance_for, MacroTotals, Reconciled, ReconciliationOutcome};

/// Round half away from zero into a non-negative integer, mapping NaN and negatives to 0
#[must_use]
pub fn round_non_negative(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round().min(f64::from(u32::MAX)) as u32
}
