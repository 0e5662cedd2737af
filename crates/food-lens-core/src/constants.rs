// ABOUTME: Range limits and defaults shared by the sanitizer, reconciler and estimators
// ABOUTME: Pure data constants for the food lens pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Limits applied to food analysis records
pub mod food {
    /// Maximum number of ingredients kept per result
    pub const MAX_INGREDIENTS: usize = 6;
    /// Upper bound of the health score scale
    pub const HEALTH_SCORE_MAX: u8 = 10;
    /// Smallest valid portion count
    pub const MIN_PORTIONS: u32 = 1;
    /// Ceiling for a calorie figure taken from a model reply
    pub const MAX_CALORIES: u32 = 50_000;
    /// Ceiling for a single macro amount taken from a model reply
    pub const MAX_MACRO_GRAMS: u32 = 5_000;
}

/// Energy content of macronutrients (kcal per gram)
pub mod energy {
    /// Protein energy density
    pub const KCAL_PER_GRAM_PROTEIN: u32 = 4;
    /// Carbohydrate energy density
    pub const KCAL_PER_GRAM_CARBS: u32 = 4;
    /// Fat energy density
    pub const KCAL_PER_GRAM_FAT: u32 = 9;
}

/// Limits applied to exercise records
pub mod exercise {
    /// Body weight assumed when the caller does not provide one
    pub const DEFAULT_BODY_WEIGHT_KG: f64 = 70.0;
    /// Highest plausible burn rate; model values above `rate * duration` are replaced
    pub const MAX_KCAL_PER_MINUTE: u32 = 20;
    /// MET used when no activity keyword matches
    pub const DEFAULT_MET: f64 = 4.5;
}

/// Service identification for structured logging
pub mod service_names {
    /// Service name reported in startup logs
    pub const FOOD_LENS: &str = "food-lens";
}
