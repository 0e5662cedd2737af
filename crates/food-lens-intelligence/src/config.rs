// ABOUTME: Tunable constants for reconciliation, health scoring and exercise estimation
// ABOUTME: Defaults reproduce the production thresholds; tests may substitute their own
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use food_lens_core::constants::exercise::{
    DEFAULT_BODY_WEIGHT_KG, DEFAULT_MET, MAX_KCAL_PER_MINUTE,
};
use serde::{Deserialize, Serialize};

/// Aggregate configuration handed to the analysis services
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceConfig {
    /// Calorie/macro identity tolerance
    pub reconciliation: ReconciliationConfig,
    /// Health score weights and bands
    pub health_score: HealthScoreConfig,
    /// MET fallback parameters
    pub exercise: ExerciseConfig,
}

/// Tolerance for `calories ~= 4*protein + 4*carbs + 9*fat`
///
/// `tolerance = max(min_tolerance_kcal, round(tolerance_ratio * macro_calories))`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    /// Absolute floor of the tolerance band in kcal
    pub min_tolerance_kcal: u32,
    /// Relative tolerance as a fraction of macro-derived calories
    pub tolerance_ratio: f64,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            min_tolerance_kcal: 50,
            tolerance_ratio: 0.2,
        }
    }
}

/// One calorie band of the density component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KcalBand {
    /// Inclusive upper bound of the band in kcal (`None` = unbounded)
    pub up_to_kcal: Option<u32>,
    /// Score awarded inside the band
    pub score: f64,
}

/// Weights for the deterministic health score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScoreConfig {
    /// Target protein share of energy
    pub target_protein_share: f64,
    /// Target fat share of energy
    pub target_fat_share: f64,
    /// Target carbohydrate share of energy
    pub target_carbs_share: f64,
    /// Points awarded for a perfect macro split
    pub macro_weight: f64,
    /// Summed share deviation at which the macro component reaches zero
    pub macro_deviation_span: f64,
    /// Calorie density bands, checked in order (first matching upper bound wins)
    pub kcal_bands: Vec<KcalBand>,
    /// Protein grams per 100 kcal below which no bonus is given
    pub protein_density_floor: f64,
    /// Bonus points per gram of protein per 100 kcal above the floor
    pub protein_bonus_per_gram: f64,
    /// Maximum protein density bonus
    pub protein_bonus_max: f64,
    /// Bonus per listed ingredient
    pub variety_bonus_per_ingredient: f64,
    /// Ingredients beyond this count earn no further bonus
    pub variety_max_ingredients: usize,
}

impl Default for HealthScoreConfig {
    fn default() -> Self {
        Self {
            target_protein_share: 0.25,
            target_fat_share: 0.30,
            target_carbs_share: 0.45,
            macro_weight: 8.0,
            macro_deviation_span: 1.5,
            kcal_bands: vec![
                KcalBand {
                    up_to_kcal: Some(119),
                    score: 0.5,
                },
                KcalBand {
                    up_to_kcal: Some(249),
                    score: 1.2,
                },
                KcalBand {
                    up_to_kcal: Some(750),
                    score: 1.6,
                },
                KcalBand {
                    up_to_kcal: Some(900),
                    score: 0.6,
                },
                KcalBand {
                    up_to_kcal: None,
                    score: 0.2,
                },
            ],
            protein_density_floor: 2.0,
            protein_bonus_per_gram: 0.25,
            protein_bonus_max: 1.5,
            variety_bonus_per_ingredient: 0.1,
            variety_max_ingredients: 5,
        }
    }
}

/// Parameters of the MET fallback estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseConfig {
    /// MET used when no keyword matches
    pub default_met: f64,
    /// Body weight used when the caller gives none
    pub default_body_weight_kg: f64,
    /// METs strictly below this are "Low" intensity
    pub low_intensity_below_met: f64,
    /// METs strictly above this are "High" intensity
    pub high_intensity_above_met: f64,
    /// Highest plausible burn rate in kcal per minute
    pub max_kcal_per_minute: u32,
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            default_met: DEFAULT_MET,
            default_body_weight_kg: DEFAULT_BODY_WEIGHT_KG,
            low_intensity_below_met: 4.0,
            high_intensity_above_met: 8.0,
            max_kcal_per_minute: MAX_KCAL_PER_MINUTE,
        }
    }
}
