// ABOUTME: Deterministic 0-10 meal quality score from macro balance and energy density
// ABOUTME: Blends with a model-provided score when one is present
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health Score Estimator
//!
//! Four additive components, clamped to `[0, 10]` and rounded:
//!
//! - macro balance (0-8): `max(0, 8 * (1 - deviation / 1.5))` where
//!   `deviation` is the summed absolute difference between the energy shares
//!   of protein/fat/carbs and the 25/30/45 target split
//! - calorie density (0.2-1.6): banded on total energy
//! - protein density bonus (0-1.5): `0.25` per gram of protein per 100 kcal
//!   above 2 g
//! - variety bonus (0-0.5): `0.1` per ingredient up to five

use food_lens_core::constants::energy::{
    KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN,
};
use food_lens_core::constants::food::HEALTH_SCORE_MAX;
use food_lens_core::models::food::macro_calories;

use crate::config::HealthScoreConfig;

/// Inputs of the health score, taken from a reconciled result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthScoreInput {
    /// Total energy in kcal
    pub calories: u32,
    /// Protein in grams
    pub protein_grams: u32,
    /// Fat in grams
    pub fat_grams: u32,
    /// Carbohydrates in grams
    pub carbs_grams: u32,
    /// Number of listed ingredients
    pub ingredient_count: usize,
}

/// Compute the deterministic score
///
/// A meal with no energy at all scores 0.
#[must_use]
pub fn compute_health_score(input: &HealthScoreInput, config: &HealthScoreConfig) -> u8 {
    let macro_kcal = macro_calories(input.protein_grams, input.carbs_grams, input.fat_grams);
    let total_energy = if macro_kcal > 0 {
        macro_kcal
    } else {
        u64::from(input.calories)
    };
    if total_energy == 0 {
        return 0;
    }
    let energy = total_energy as f64;

    let protein_share = f64::from(input.protein_grams) * f64::from(KCAL_PER_GRAM_PROTEIN) / energy;
    let fat_share = f64::from(input.fat_grams) * f64::from(KCAL_PER_GRAM_FAT) / energy;
    let carbs_share = f64::from(input.carbs_grams) * f64::from(KCAL_PER_GRAM_CARBS) / energy;

    let deviation = (protein_share - config.target_protein_share).abs()
        + (fat_share - config.target_fat_share).abs()
        + (carbs_share - config.target_carbs_share).abs();
    let macro_score =
        (config.macro_weight * (1.0 - deviation / config.macro_deviation_span)).max(0.0);

    let kcal_score = kcal_density_score(total_energy, config);

    let protein_per_100_kcal = f64::from(input.protein_grams) * 100.0 / energy;
    let protein_bonus = ((protein_per_100_kcal - config.protein_density_floor)
        * config.protein_bonus_per_gram)
        .clamp(0.0, config.protein_bonus_max);

    let variety_bonus = config.variety_bonus_per_ingredient
        * input.ingredient_count.min(config.variety_max_ingredients) as f64;

    let total = macro_score + kcal_score + protein_bonus + variety_bonus;
    total.clamp(0.0, f64::from(HEALTH_SCORE_MAX)).round() as u8
}

fn kcal_density_score(total_energy: u64, config: &HealthScoreConfig) -> f64 {
    config
        .kcal_bands
        .iter()
        .find(|band| band.up_to_kcal.is_none_or(|limit| total_energy <= u64::from(limit)))
        .map_or(0.0, |band| band.score)
}

/// Combine a model score with the computed one
///
/// A model score of zero means "not provided" and yields the computed score.
#[must_use]
pub fn blend_health_score(model_score: u8, computed: u8) -> u8 {
    if model_score == 0 {
        return computed.min(HEALTH_SCORE_MAX);
    }
    let average = (f64::from(model_score) + f64::from(computed)) / 2.0;
    (average.round() as u8).min(HEALTH_SCORE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(calories: u32, protein: u32, fat: u32, carbs: u32, n: usize) -> HealthScoreInput {
        HealthScoreInput {
            calories,
            protein_grams: protein,
            fat_grams: fat,
            carbs_grams: carbs,
            ingredient_count: n,
        }
    }

    #[test]
    fn test_balanced_meal_scores_high() {
        // 500 kcal at exactly 25/30/45
        let score = compute_health_score(
            &input(500, 31, 17, 56, 4),
            &HealthScoreConfig::default(),
        );
        assert!(score >= 9, "balanced meal scored {score}");
    }

    #[test]
    fn test_pure_fat_scores_low() {
        let score = compute_health_score(&input(900, 0, 100, 0, 1), &HealthScoreConfig::default());
        assert!(score <= 2, "pure fat scored {score}");
    }

    #[test]
    fn test_no_energy_scores_zero() {
        assert_eq!(
            compute_health_score(&input(0, 0, 0, 0, 3), &HealthScoreConfig::default()),
            0
        );
    }

    #[test]
    fn test_calorie_only_meal_uses_density_band() {
        // no macros: deviation = 0.25 + 0.30 + 0.45 = 1.0 -> macro score 8/3
        let score = compute_health_score(&input(400, 0, 0, 0, 0), &HealthScoreConfig::default());
        assert_eq!(score, 4);
    }

    #[test]
    fn test_score_always_in_range() {
        let config = HealthScoreConfig::default();
        for meal in [
            input(50, 20, 0, 0, 10),
            input(3000, 300, 0, 0, 6),
            input(u32::MAX, u32::MAX, u32::MAX, u32::MAX, usize::MAX),
        ] {
            assert!(compute_health_score(&meal, &config) <= HEALTH_SCORE_MAX);
        }
    }

    #[test]
    fn test_blend() {
        assert_eq!(blend_health_score(0, 7), 7);
        assert_eq!(blend_health_score(8, 5), 7);
        assert_eq!(blend_health_score(10, 9), 10);
        assert_eq!(blend_health_score(4, 4), 4);
    }
}
