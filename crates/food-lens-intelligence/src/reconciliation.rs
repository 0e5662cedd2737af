// ABOUTME: Enforces the calorie/macro energy identity on sanitized model estimates
// ABOUTME: Prefers trusting the calorie figure and rescaling macros, falls back to macro energy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Macro Reconciler
//!
//! Restores `calories ~= 4*protein + 4*carbs + 9*fat` within a tolerance band:
//!
//! 1. macro energy of zero leaves calories untouched
//! 2. calories of zero are replaced by macro energy
//! 3. a deviation within `max(50, round(0.2 * macro energy))` is accepted
//! 4. otherwise every macro is rescaled by `calories / macro energy`; if the
//!    rescaled macros land within the same tolerance they are kept, else the
//!    calorie figure is replaced by the original macro energy
//!
//! The function is a fixed point: reconciling a reconciled value is a no-op.

use food_lens_core::models::food::macro_calories;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ReconciliationConfig;
use crate::round_non_negative;

/// The four numbers the reconciler operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTotals {
    /// Total energy in kcal
    pub calories: u32,
    /// Protein in grams
    pub protein_grams: u32,
    /// Fat in grams
    pub fat_grams: u32,
    /// Carbohydrates in grams
    pub carbs_grams: u32,
}

impl MacroTotals {
    /// Energy implied by the macros
    #[must_use]
    pub fn macro_calories(&self) -> u64 {
        macro_calories(self.protein_grams, self.carbs_grams, self.fat_grams)
    }
}

/// Which branch of the reconciliation produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconciliationOutcome {
    /// No macro energy to compare against
    NothingToReconcile,
    /// Calories were missing and derived from macros
    CaloriesFromMacros,
    /// Already within tolerance
    WithinTolerance,
    /// Macros rescaled to match the calorie figure
    MacrosRescaled,
    /// Rescaling could not close the gap; calories replaced by macro energy
    CaloriesReplaced,
}

/// Reconciled totals plus the branch taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    /// Totals satisfying the energy identity
    pub totals: MacroTotals,
    /// Branch taken
    pub outcome: ReconciliationOutcome,
}

/// Tolerance band in kcal for a given macro energy
#[must_use]
pub fn tolerance_for(macro_kcal: u64, config: &ReconciliationConfig) -> u64 {
    let relative = (config.tolerance_ratio * macro_kcal as f64).round();
    let relative = if relative.is_finite() && relative > 0.0 {
        relative as u64
    } else {
        0
    };
    u64::from(config.min_tolerance_kcal).max(relative)
}

fn saturating_kcal(kcal: u64) -> u32 {
    u32::try_from(kcal).unwrap_or(u32::MAX)
}

/// Reconcile calories against macro energy
#[must_use]
pub fn reconcile(totals: MacroTotals, config: &ReconciliationConfig) -> Reconciled {
    let macro_kcal = totals.macro_calories();

    if macro_kcal == 0 {
        return Reconciled {
            totals,
            outcome: ReconciliationOutcome::NothingToReconcile,
        };
    }

    if totals.calories == 0 {
        return Reconciled {
            totals: MacroTotals {
                calories: saturating_kcal(macro_kcal),
                ..totals
            },
            outcome: ReconciliationOutcome::CaloriesFromMacros,
        };
    }

    let tolerance = tolerance_for(macro_kcal, config);
    let calories = u64::from(totals.calories);
    if calories.abs_diff(macro_kcal) <= tolerance {
        return Reconciled {
            totals,
            outcome: ReconciliationOutcome::WithinTolerance,
        };
    }

    let factor = f64::from(totals.calories) / macro_kcal as f64;
    let rescaled = MacroTotals {
        calories: totals.calories,
        protein_grams: round_non_negative(f64::from(totals.protein_grams) * factor),
        fat_grams: round_non_negative(f64::from(totals.fat_grams) * factor),
        carbs_grams: round_non_negative(f64::from(totals.carbs_grams) * factor),
    };
    let rescaled_kcal = rescaled.macro_calories();

    if rescaled_kcal.abs_diff(calories) <= tolerance {
        debug!(
            calories = totals.calories,
            macro_kcal, rescaled_kcal, "Rescaled macros to match calories"
        );
        return Reconciled {
            totals: rescaled,
            outcome: ReconciliationOutcome::MacrosRescaled,
        };
    }

    debug!(
        calories = totals.calories,
        macro_kcal, rescaled_kcal, "Rescaling failed, trusting macro energy"
    );
    Reconciled {
        totals: MacroTotals {
            calories: saturating_kcal(macro_kcal),
            ..totals
        },
        outcome: ReconciliationOutcome::CaloriesReplaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn totals(calories: u32, protein: u32, fat: u32, carbs: u32) -> MacroTotals {
        MacroTotals {
            calories,
            protein_grams: protein,
            fat_grams: fat,
            carbs_grams: carbs,
        }
    }

    #[test]
    fn test_tolerance_floor_and_ratio() {
        let config = ReconciliationConfig::default();
        assert_eq!(tolerance_for(100, &config), 50);
        assert_eq!(tolerance_for(1000, &config), 200);
        assert_eq!(tolerance_for(253, &config), 51);
    }

    #[test]
    fn test_zero_macros_trusts_calories() {
        let result = reconcile(totals(350, 0, 0, 0), &ReconciliationConfig::default());
        assert_eq!(result.outcome, ReconciliationOutcome::NothingToReconcile);
        assert_eq!(result.totals.calories, 350);
    }

    #[test]
    fn test_missing_calories_derived_from_macros() {
        let result = reconcile(totals(0, 30, 10, 50), &ReconciliationConfig::default());
        assert_eq!(result.outcome, ReconciliationOutcome::CaloriesFromMacros);
        assert_eq!(result.totals.calories, 410);
    }

    #[test]
    fn test_within_tolerance_untouched() {
        let input = totals(450, 30, 10, 50);
        let result = reconcile(input, &ReconciliationConfig::default());
        assert_eq!(result.outcome, ReconciliationOutcome::WithinTolerance);
        assert_eq!(result.totals, input);
    }

    #[test]
    fn test_far_off_macros_rescaled() {
        let result = reconcile(totals(1000, 10, 10, 10), &ReconciliationConfig::default());
        assert_eq!(result.outcome, ReconciliationOutcome::MacrosRescaled);
        assert_eq!(result.totals, totals(1000, 59, 59, 59));
    }

    #[test]
    fn test_zero_tolerance_falls_back_to_macro_energy() {
        let strict = ReconciliationConfig {
            min_tolerance_kcal: 0,
            tolerance_ratio: 0.0,
        };
        let result = reconcile(totals(1000, 10, 10, 10), &strict);
        assert_eq!(result.outcome, ReconciliationOutcome::CaloriesReplaced);
        assert_eq!(result.totals, totals(170, 10, 10, 10));
    }

    #[test]
    fn test_oversized_macros_rescaled_without_overflow() {
        let config = ReconciliationConfig::default();
        let result = reconcile(totals(100, 2_000_000_000, 0, 0), &config);
        assert_eq!(result.outcome, ReconciliationOutcome::MacrosRescaled);
        assert_eq!(result.totals, totals(100, 25, 0, 0));

        let again = reconcile(result.totals, &config);
        assert_eq!(again.outcome, ReconciliationOutcome::WithinTolerance);
        assert_eq!(again.totals, result.totals);
    }

    #[test]
    fn test_macro_energy_beyond_u32_saturates_calories() {
        let result = reconcile(
            totals(0, u32::MAX, u32::MAX, u32::MAX),
            &ReconciliationConfig::default(),
        );
        assert_eq!(result.outcome, ReconciliationOutcome::CaloriesFromMacros);
        assert_eq!(result.totals.calories, u32::MAX);
    }

    #[test]
    fn test_reconcile_is_fixed_point() {
        let config = ReconciliationConfig::default();
        for input in [
            totals(1000, 10, 10, 10),
            totals(0, 30, 10, 50),
            totals(5, 80, 40, 200),
            totals(120, 1, 0, 0),
            totals(100, 2_000_000_000, 0, 0),
            totals(3_000_000_000, 1, 1, 1),
        ] {
            let once = reconcile(input, &config).totals;
            let twice = reconcile(once, &config).totals;
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }
}
