// ABOUTME: Food analysis result and ingredient breakdown records
// ABOUTME: Encodes the non-food terminal classification and macro-derived calories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::constants::energy::{KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN};

/// Energy implied by a macro split (4 kcal/g protein and carbs, 9 kcal/g fat)
///
/// Computed in `u64` so any three `u32` gram values yield the exact energy.
#[must_use]
pub fn macro_calories(protein_grams: u32, carbs_grams: u32, fat_grams: u32) -> u64 {
    u64::from(protein_grams) * u64::from(KCAL_PER_GRAM_PROTEIN)
        + u64::from(carbs_grams) * u64::from(KCAL_PER_GRAM_CARBS)
        + u64::from(fat_grams) * u64::from(KCAL_PER_GRAM_FAT)
}

/// One ingredient of a meal with its own macro estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Ingredient name in the requested locale (never empty)
    pub name: String,
    /// Energy in kcal
    pub calories: u32,
    /// Protein in grams
    pub protein_grams: u32,
    /// Fat in grams
    pub fat_grams: u32,
    /// Carbohydrates in grams
    pub carbs_grams: u32,
}

/// Result of a food image, text or fix analysis
///
/// When `is_food` is false every numeric field is zero and `title` is empty;
/// that classification is terminal and carries no estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Whether the input depicts or describes food at all
    pub is_food: bool,
    /// Model explanation for a non-food classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Dish title in the requested locale
    pub title: String,
    /// Total energy in kcal
    pub calories: u32,
    /// Number of portions the estimate covers (at least 1 for food)
    pub portions: u32,
    /// Protein in grams
    pub protein_grams: u32,
    /// Fat in grams
    pub fat_grams: u32,
    /// Carbohydrates in grams
    pub carbs_grams: u32,
    /// Health quality score in `[0, 10]`
    pub health_score: u8,
    /// Up to six ingredient breakdowns
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl AnalysisResult {
    /// Terminal non-food classification with every numeric field zeroed
    #[must_use]
    pub fn non_food(error: Option<String>) -> Self {
        Self {
            is_food: false,
            error,
            title: String::new(),
            calories: 0,
            portions: 0,
            protein_grams: 0,
            fat_grams: 0,
            carbs_grams: 0,
            health_score: 0,
            ingredients: Vec::new(),
        }
    }

    /// Energy implied by this result's macros
    #[must_use]
    pub fn macro_calories(&self) -> u64 {
        macro_calories(self.protein_grams, self.carbs_grams, self.fat_grams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_calories_identity() {
        assert_eq!(macro_calories(30, 50, 10), 410);
        assert_eq!(macro_calories(0, 0, 0), 0);
        assert_eq!(macro_calories(u32::MAX, u32::MAX, u32::MAX), 17 * u64::from(u32::MAX));
    }

    #[test]
    fn test_non_food_is_zeroed() {
        let result = AnalysisResult::non_food(Some("a cat".into()));
        assert!(!result.is_food);
        assert!(result.title.is_empty());
        assert_eq!(result.calories, 0);
        assert_eq!(result.portions, 0);
        assert_eq!(result.macro_calories(), 0);
        assert_eq!(result.health_score, 0);
        assert!(result.ingredients.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(AnalysisResult::non_food(None)).unwrap();
        assert_eq!(json["isFood"], false);
        assert_eq!(json["proteinGrams"], 0);
        assert!(json.get("error").is_none());
    }
}
