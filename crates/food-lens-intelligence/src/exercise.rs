// ABOUTME: Keyword-to-MET lookup and the MET calorie formula for described activities
// ABOUTME: Deterministic substitute used when the model is absent or its answer is implausible
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Exercise Fallback Estimator
//!
//! `calories = round(MET * weight_kg * duration_min / 60)`
//!
//! The MET comes from the first activity group whose keywords occur in the
//! lowercased description. Groups are checked in table order, so the
//! sprint/interval group wins over generic running.
//!
//! # Reference
//!
//! Ainsworth, B.E., et al. (2011). Compendium of Physical Activities.
//! *Medicine & Science in Sports & Exercise*, 43(8), 1575-1581.

use food_lens_core::models::exercise::{ExerciseResult, Intensity};
use food_lens_core::Locale;
use serde::{Deserialize, Serialize};

use crate::config::ExerciseConfig;
use crate::round_non_negative;

/// Activity groups recognised by the keyword table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    /// Sprints, HIIT and interval sessions
    Interval,
    /// Running and jogging
    Running,
    /// Walking and hiking
    Walking,
    /// Cycling
    Cycling,
    /// Swimming
    Swimming,
    /// Yoga and pilates
    Yoga,
    /// Weight and resistance training
    Strength,
    /// Football (soccer)
    Football,
    /// Basketball
    Basketball,
    /// Tennis
    Tennis,
}

impl ActivityKind {
    /// Match order of the keyword table
    pub const TABLE_ORDER: [Self; 10] = [
        Self::Interval,
        Self::Running,
        Self::Walking,
        Self::Cycling,
        Self::Swimming,
        Self::Yoga,
        Self::Strength,
        Self::Football,
        Self::Basketball,
        Self::Tennis,
    ];

    /// Metabolic equivalent of the activity
    #[must_use]
    pub const fn met(&self) -> f64 {
        match self {
            Self::Interval => 12.0,
            Self::Running => 9.0,
            Self::Walking => 3.5,
            Self::Cycling | Self::Tennis => 7.0,
            Self::Swimming => 7.5,
            Self::Yoga => 3.0,
            Self::Strength => 5.0,
            Self::Football => 8.0,
            Self::Basketball => 6.5,
        }
    }

    /// Lowercase substrings identifying the activity, across supported languages
    #[must_use]
    pub const fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Interval => &[
                "sprint",
                "hiit",
                "interval",
                "tabata",
                "دویدن سریع",
                "اینتروال",
                "عدو سريع",
                "تمارين متقطعة",
                "aralıklı",
                "fractionné",
                "intervalos",
            ],
            Self::Running => &[
                "run",
                "jog",
                "دویدن",
                "ركض",
                "جري",
                "koşu",
                "lauf",
                "course à pied",
                "courir",
                "correr",
                "trotar",
            ],
            Self::Walking => &[
                "walk",
                "hike",
                "hiking",
                "پیاده",
                "کوهنوردی",
                "مشي",
                "yürüyüş",
                "spazier",
                "wander",
                "marche",
                "randonnée",
                "caminar",
                "caminata",
                "senderismo",
            ],
            Self::Cycling => &[
                "cycle",
                "cycling",
                "bike",
                "biking",
                "دوچرخه",
                "دراجة",
                "bisiklet",
                "radfahr",
                "fahrrad",
                "vélo",
                "cyclisme",
                "bicicleta",
                "ciclismo",
            ],
            Self::Swimming => &[
                "swim",
                "شنا",
                "سباحة",
                "yüzme",
                "schwimm",
                "natation",
                "piscine",
                "nadar",
                "natación",
            ],
            Self::Yoga => &["yoga", "pilates", "یوگا", "پیلاتس", "يوغا", "بيلاتس"],
            Self::Strength => &[
                "strength",
                "weight",
                "resistance",
                "gym",
                "وزنه",
                "بدنسازی",
                "أثقال",
                "ağırlık",
                "kraft",
                "hantel",
                "musculation",
                "pesas",
                "fuerza",
            ],
            Self::Football => &[
                "football",
                "soccer",
                "فوتبال",
                "كرة القدم",
                "futbol",
                "fútbol",
                "fußball",
                "fussball",
            ],
            Self::Basketball => &[
                "basketball",
                "بسکتبال",
                "كرة السلة",
                "basketbol",
                "basket",
                "baloncesto",
            ],
            Self::Tennis => &["tennis", "تنیس", "تنس", "tenis"],
        }
    }

    /// Canonical activity name in the given locale
    #[must_use]
    pub const fn localized_name(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Fa => match self {
                Self::Interval => "تمرین اینتروال",
                Self::Running => "دویدن",
                Self::Walking => "پیاده روی",
                Self::Cycling => "دوچرخه سواری",
                Self::Swimming => "شنا کردن",
                Self::Yoga => "یوگا",
                Self::Strength => "تمرین قدرتی",
                Self::Football => "فوتبال",
                Self::Basketball => "بسکتبال",
                Self::Tennis => "تنیس",
            },
            Locale::En => match self {
                Self::Interval => "Interval training",
                Self::Running => "Running",
                Self::Walking => "Walking",
                Self::Cycling => "Cycling",
                Self::Swimming => "Swimming",
                Self::Yoga => "Yoga",
                Self::Strength => "Strength training",
                Self::Football => "Football",
                Self::Basketball => "Basketball",
                Self::Tennis => "Tennis",
            },
            Locale::Ar => match self {
                Self::Interval => "تمارين متقطعة",
                Self::Running => "الجري",
                Self::Walking => "المشي",
                Self::Cycling => "ركوب الدراجة",
                Self::Swimming => "السباحة",
                Self::Yoga => "اليوغا",
                Self::Strength => "تمارين القوة",
                Self::Football => "كرة القدم",
                Self::Basketball => "كرة السلة",
                Self::Tennis => "التنس",
            },
            Locale::Tr => match self {
                Self::Interval => "Aralıklı antrenman",
                Self::Running => "Koşu",
                Self::Walking => "Yürüyüş",
                Self::Cycling => "Bisiklet",
                Self::Swimming => "Yüzme",
                Self::Yoga => "Yoga",
                Self::Strength => "Kuvvet antrenmanı",
                Self::Football => "Futbol",
                Self::Basketball => "Basketbol",
                Self::Tennis => "Tenis",
            },
            Locale::De => match self {
                Self::Interval => "Intervalltraining",
                Self::Running => "Laufen",
                Self::Walking => "Gehen",
                Self::Cycling => "Radfahren",
                Self::Swimming => "Schwimmen",
                Self::Yoga => "Yoga",
                Self::Strength => "Krafttraining",
                Self::Football => "Fußball",
                Self::Basketball => "Basketball",
                Self::Tennis => "Tennis",
            },
            Locale::Fr => match self {
                Self::Interval => "Entraînement fractionné",
                Self::Running => "Course à pied",
                Self::Walking => "Marche",
                Self::Cycling => "Vélo",
                Self::Swimming => "Natation",
                Self::Yoga => "Yoga",
                Self::Strength => "Musculation",
                Self::Football => "Football",
                Self::Basketball => "Basket-ball",
                Self::Tennis => "Tennis",
            },
            Locale::Es => match self {
                Self::Interval => "Entrenamiento por intervalos",
                Self::Running => "Correr",
                Self::Walking => "Caminar",
                Self::Cycling => "Ciclismo",
                Self::Swimming => "Natación",
                Self::Yoga => "Yoga",
                Self::Strength => "Entrenamiento de fuerza",
                Self::Football => "Fútbol",
                Self::Basketball => "Baloncesto",
                Self::Tennis => "Tenis",
            },
        }
    }
}

/// First activity group whose keywords occur in the description
#[must_use]
pub fn match_activity(description: &str) -> Option<ActivityKind> {
    let text = description.to_lowercase();
    ActivityKind::TABLE_ORDER
        .into_iter()
        .find(|kind| kind.keywords().iter().any(|keyword| text.contains(keyword)))
}

/// MET of the described activity, or the configured default
#[must_use]
pub fn estimate_met(description: &str, config: &ExerciseConfig) -> f64 {
    match_activity(description).map_or(config.default_met, |kind| kind.met())
}

/// Intensity bucket for a MET value
#[must_use]
pub fn intensity_for_met(met: f64, config: &ExerciseConfig) -> Intensity {
    if met < config.low_intensity_below_met {
        Intensity::Low
    } else if met > config.high_intensity_above_met {
        Intensity::High
    } else {
        Intensity::Moderate
    }
}

/// `round(MET * weight * duration / 60)`; a missing or non-positive weight uses the default
#[must_use]
pub fn calories_for_met(
    met: f64,
    body_weight_kg: Option<f64>,
    duration_minutes: u32,
    config: &ExerciseConfig,
) -> u32 {
    let weight = body_weight_kg
        .filter(|kg| kg.is_finite() && *kg > 0.0)
        .unwrap_or(config.default_body_weight_kg);
    round_non_negative(met * weight * f64::from(duration_minutes) / 60.0)
}

/// Highest plausible burn for a duration
#[must_use]
pub const fn max_plausible_calories(duration_minutes: u32, config: &ExerciseConfig) -> u32 {
    config.max_kcal_per_minute.saturating_mul(duration_minutes)
}

/// Keep a model calorie figure inside `[1, max_kcal_per_minute * duration]`,
/// otherwise substitute the MET estimate (clamped to the same ceiling)
///
/// Returns the calories and whether the model figure was replaced.
#[must_use]
pub fn enforce_plausible_calories(
    model_calories: u32,
    description: &str,
    duration_minutes: u32,
    body_weight_kg: Option<f64>,
    config: &ExerciseConfig,
) -> (u32, bool) {
    let ceiling = max_plausible_calories(duration_minutes, config);
    if model_calories > 0 && model_calories <= ceiling {
        return (model_calories, false);
    }
    let met = estimate_met(description, config);
    let estimate = calories_for_met(met, body_weight_kg, duration_minutes, config);
    (estimate.min(ceiling), true)
}

/// Generic localized advice attached to fallback results
#[must_use]
pub const fn fallback_tips(locale: Locale) -> [&'static str; 3] {
    match locale {
        Locale::Fa => [
            "قبل از شروع ورزش بدن را گرم کنید",
            "در طول فعالیت آب کافی بنوشید",
            "شدت تمرین را متناسب با توان خود تنظیم کنید",
        ],
        Locale::En => [
            "Warm up before you start exercising",
            "Drink enough water during the activity",
            "Adjust the intensity to your own fitness level",
        ],
        Locale::Ar => [
            "قم بالإحماء قبل بدء التمرين",
            "اشرب كمية كافية من الماء أثناء النشاط",
            "اضبط شدة التمرين بما يتناسب مع قدرتك",
        ],
        Locale::Tr => [
            "Egzersize başlamadan önce ısının",
            "Aktivite sırasında yeterince su için",
            "Antrenman yoğunluğunu kendi kondisyonunuza göre ayarlayın",
        ],
        Locale::De => [
            "Wärmen Sie sich vor dem Training auf",
            "Trinken Sie während der Aktivität ausreichend Wasser",
            "Passen Sie die Intensität an Ihr Leistungsniveau an",
        ],
        Locale::Fr => [
            "Échauffez-vous avant de commencer l'exercice",
            "Buvez suffisamment d'eau pendant l'activité",
            "Adaptez l'intensité à votre condition physique",
        ],
        Locale::Es => [
            "Calienta antes de empezar a hacer ejercicio",
            "Bebe suficiente agua durante la actividad",
            "Ajusta la intensidad a tu nivel de forma física",
        ],
    }
}

/// Build a complete result without any model involvement
#[must_use]
pub fn fallback_exercise(
    description: &str,
    duration_minutes: u32,
    body_weight_kg: Option<f64>,
    locale: Locale,
    config: &ExerciseConfig,
) -> ExerciseResult {
    let kind = match_activity(description);
    let met = kind.map_or(config.default_met, |kind| kind.met());
    let calories = calories_for_met(met, body_weight_kg, duration_minutes, config)
        .min(max_plausible_calories(duration_minutes, config));

    ExerciseResult {
        activity_name: kind.map_or_else(
            || description.trim().to_owned(),
            |kind| kind.localized_name(locale).to_owned(),
        ),
        calories_burned: calories,
        duration: duration_minutes,
        intensity: intensity_for_met(met, config).label(locale).to_owned(),
        tips: fallback_tips(locale).iter().map(|tip| (*tip).to_owned()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_group_wins_over_running() {
        assert_eq!(match_activity("HIIT running session"), Some(ActivityKind::Interval));
        assert_eq!(match_activity("دویدن سریع"), Some(ActivityKind::Interval));
        assert_eq!(match_activity("دویدن در پارک"), Some(ActivityKind::Running));
    }

    #[test]
    fn test_multilingual_keywords() {
        assert_eq!(match_activity("Schwimmen im See"), Some(ActivityKind::Swimming));
        assert_eq!(match_activity("partido de fútbol"), Some(ActivityKind::Football));
        assert_eq!(match_activity("Yürüyüş"), Some(ActivityKind::Walking));
        assert_eq!(match_activity("sala de pesas"), Some(ActivityKind::Strength));
        assert_eq!(match_activity("gardening"), None);
    }

    #[test]
    fn test_unmatched_uses_default_met() {
        let config = ExerciseConfig::default();
        assert!((estimate_met("gardening", &config) - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_intensity_thresholds() {
        let config = ExerciseConfig::default();
        assert_eq!(intensity_for_met(3.5, &config), Intensity::Low);
        assert_eq!(intensity_for_met(4.0, &config), Intensity::Moderate);
        assert_eq!(intensity_for_met(8.0, &config), Intensity::Moderate);
        assert_eq!(intensity_for_met(9.0, &config), Intensity::High);
    }

    #[test]
    fn test_running_thirty_minutes() {
        let config = ExerciseConfig::default();
        let result = fallback_exercise("running", 30, Some(70.0), Locale::En, &config);
        assert_eq!(result.calories_burned, 315);
        assert_eq!(result.activity_name, "Running");
        assert_eq!(result.intensity, "High");
        assert_eq!(result.tips.len(), 3);
    }

    #[test]
    fn test_invalid_weight_uses_default() {
        let config = ExerciseConfig::default();
        assert_eq!(calories_for_met(9.0, Some(-3.0), 30, &config), 315);
        assert_eq!(calories_for_met(9.0, Some(f64::NAN), 30, &config), 315);
        assert_eq!(calories_for_met(9.0, None, 30, &config), 315);
    }

    #[test]
    fn test_unmatched_keeps_user_text() {
        let config = ExerciseConfig::default();
        let result = fallback_exercise("  gardening ", 60, None, Locale::Fa, &config);
        assert_eq!(result.activity_name, "gardening");
        assert_eq!(result.intensity, "متوسط");
        assert_eq!(result.calories_burned, 315);
    }

    #[test]
    fn test_plausibility_band() {
        let config = ExerciseConfig::default();
        assert_eq!(enforce_plausible_calories(250, "running", 30, None, &config), (250, false));
        assert_eq!(enforce_plausible_calories(0, "running", 30, None, &config), (315, true));
        assert_eq!(enforce_plausible_calories(601, "running", 30, None, &config), (315, true));
        // a heavy person sprinting exceeds the ceiling; the estimate is capped
        assert_eq!(
            enforce_plausible_calories(0, "sprint", 10, Some(150.0), &config),
            (200, true)
        );
    }
}
