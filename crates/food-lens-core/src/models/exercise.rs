// ABOUTME: Exercise analysis result and localized intensity labels
// ABOUTME: Calories burned, duration and tips for a described activity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Exercise intensity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    /// Light effort
    Low,
    /// Moderate effort
    Moderate,
    /// Vigorous effort
    High,
}

impl Intensity {
    /// Label shown to the user in the given locale
    #[must_use]
    pub const fn label(&self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Fa, Self::Low) => "کم",
            (Locale::Fa, Self::Moderate) => "متوسط",
            (Locale::Fa, Self::High) => "زیاد",
            (Locale::En, Self::Low) => "Low",
            (Locale::En, Self::Moderate) => "Moderate",
            (Locale::En, Self::High) => "High",
            (Locale::Ar, Self::Low) => "منخفض",
            (Locale::Ar, Self::Moderate) => "متوسط",
            (Locale::Ar, Self::High) => "عالٍ",
            (Locale::Tr, Self::Low) => "Düşük",
            (Locale::Tr, Self::Moderate) => "Orta",
            (Locale::Tr, Self::High) => "Yüksek",
            (Locale::De, Self::Low) => "Niedrig",
            (Locale::De, Self::Moderate) => "Mittel",
            (Locale::De, Self::High) => "Hoch",
            (Locale::Fr, Self::Low) => "Faible",
            (Locale::Fr, Self::Moderate) => "Modérée",
            (Locale::Fr, Self::High) => "Élevée",
            (Locale::Es, Self::Low) => "Baja",
            (Locale::Es, Self::Moderate) => "Moderada",
            (Locale::Es, Self::High) => "Alta",
        }
    }
}

/// Result of an exercise analysis
///
/// `calories_burned` always lies within `[0, 20 * duration]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResult {
    /// Clean activity name in the requested locale
    pub activity_name: String,
    /// Estimated energy expenditure in kcal
    pub calories_burned: u32,
    /// Duration in minutes
    pub duration: u32,
    /// Localized intensity label
    pub intensity: String,
    /// Short advice about the activity
    #[serde(default)]
    pub tips: Vec<String>,
}
