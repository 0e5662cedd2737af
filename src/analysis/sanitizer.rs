// ABOUTME: Layered JSON recovery and field-level clamping of untrusted model replies
// ABOUTME: Turns raw reply text into typed food or exercise records with every field bounded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Response Sanitizer
//!
//! Recovery runs an ordered list of strategies and stops at the first one that
//! yields a JSON object:
//!
//! 1. an object the provider already parsed (structured output)
//! 2. the whole reply parsed as JSON
//! 3. the outermost `{...}` span of the reply parsed as JSON
//!
//! Arrays, strings and other non-object documents count as failures. When
//! every strategy fails the caller decides what happens: food analysis
//! surfaces a parse error, exercise analysis falls back to the MET estimate.
//!
//! Numeric fields accept JSON numbers, fully numeric strings and booleans.
//! Anything else (including `"350 kcal"`) takes the field default. Values are
//! rounded half away from zero and clamped.

use std::sync::LazyLock;

use food_lens_core::constants::food::{
    HEALTH_SCORE_MAX, MAX_CALORIES, MAX_INGREDIENTS, MAX_MACRO_GRAMS, MIN_PORTIONS,
};
use food_lens_core::models::{AnalysisResult, Ingredient};
use food_lens_intelligence::round_non_negative;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Outermost brace span, across newlines
static OBJECT_SPAN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").ok());

/// Which recovery strategy produced the object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// Provider returned structured output
    Structured,
    /// Reply was a JSON object as-is
    Direct,
    /// Object was cut out of surrounding text
    Extracted,
}

type Strategy = fn(Option<&Value>, &str) -> Option<Map<String, Value>>;

/// Recovery strategies, cheapest first
const STRATEGIES: [(RecoveryStrategy, Strategy); 3] = [
    (RecoveryStrategy::Structured, |structured, _| {
        structured.and_then(Value::as_object).cloned()
    }),
    (RecoveryStrategy::Direct, |_, content| parse_object(content)),
    (RecoveryStrategy::Extracted, |_, content| extract_object(content)),
];

/// Recover a JSON object from a reply, trying each strategy in order
#[must_use]
pub fn recover_object(
    structured: Option<&Value>,
    content: &str,
) -> Option<(Map<String, Value>, RecoveryStrategy)> {
    if content.trim().is_empty() && structured.is_none() {
        warn!("Model reply is empty");
        return None;
    }

    let recovered = STRATEGIES.iter().find_map(|(strategy, attempt)| {
        attempt(structured, content).map(|object| (object, *strategy))
    });

    match &recovered {
        Some((_, RecoveryStrategy::Extracted)) => {
            warn!("Reply was not pure JSON; recovered embedded object");
        }
        Some((_, strategy)) => debug!(?strategy, "Recovered JSON object"),
        None => warn!(reply_len = content.len(), "No JSON object found in model reply"),
    }
    recovered
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn extract_object(text: &str) -> Option<Map<String, Value>> {
    let span = OBJECT_SPAN.as_ref()?.find(text)?;
    parse_object(span.as_str())
}

// ============================================================================
// Coercion
// ============================================================================

/// Coerce a loosely typed JSON value to a finite number
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    number.filter(|n| n.is_finite())
}

/// Non-negative rounded count, or `default` when the value is absent or garbage
#[must_use]
pub fn coerce_count(value: Option<&Value>, default: u32) -> u32 {
    value
        .and_then(coerce_number)
        .map_or(default, round_non_negative)
}

fn calories_field(object: &Map<String, Value>) -> u32 {
    coerce_count(field(object, CALORIES), 0).min(MAX_CALORIES)
}

fn grams_field(object: &Map<String, Value>, keys: &[&str]) -> u32 {
    coerce_count(field(object, keys), 0).min(MAX_MACRO_GRAMS)
}

/// Look up the first present key among camelCase and snake_case spellings
fn field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn text_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    field(object, keys)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

const CALORIES: &[&str] = &["calories", "kcal"];
const PROTEIN: &[&str] = &["proteinGrams", "protein_grams", "protein"];
const FAT: &[&str] = &["fatGrams", "fat_grams", "fat"];
const CARBS: &[&str] = &["carbsGrams", "carbs_grams", "carbs"];

// ============================================================================
// Food
// ============================================================================

/// A sanitized food reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanitizedFood {
    /// Terminal non-food classification, already zeroed
    NonFood(AnalysisResult),
    /// Food estimate with every field bounded, not yet reconciled
    Food(AnalysisResult),
}

impl SanitizedFood {
    /// The record regardless of classification
    #[must_use]
    pub fn into_result(self) -> AnalysisResult {
        match self {
            Self::NonFood(result) | Self::Food(result) => result,
        }
    }
}

fn is_non_food(object: &Map<String, Value>) -> bool {
    match field(object, &["isFood", "is_food"]) {
        Some(Value::Bool(flag)) => !flag,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("false"),
        _ => false,
    }
}

/// Clamp every field of a food object; `fallback_title` fills an empty title
#[must_use]
pub fn sanitize_food(object: &Map<String, Value>, fallback_title: &str) -> SanitizedFood {
    if is_non_food(object) {
        let error = text_field(object, &["error", "reason"]);
        debug!(?error, "Model classified input as non-food");
        return SanitizedFood::NonFood(AnalysisResult::non_food(error));
    }

    let health_score = coerce_count(field(object, &["healthScore", "health_score"]), 0)
        .min(u32::from(HEALTH_SCORE_MAX));

    SanitizedFood::Food(AnalysisResult {
        is_food: true,
        error: None,
        title: text_field(object, &["title", "name"])
            .unwrap_or_else(|| fallback_title.trim().to_owned()),
        calories: calories_field(object),
        portions: coerce_count(field(object, &["portions"]), MIN_PORTIONS).max(MIN_PORTIONS),
        protein_grams: grams_field(object, PROTEIN),
        fat_grams: grams_field(object, FAT),
        carbs_grams: grams_field(object, CARBS),
        health_score: u8::try_from(health_score).unwrap_or(HEALTH_SCORE_MAX),
        ingredients: sanitize_ingredients(field(object, &["ingredients"])),
    })
}

fn sanitize_ingredients(value: Option<&Value>) -> Vec<Ingredient> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            Some(Ingredient {
                name: text_field(item, &["name", "title"])?,
                calories: calories_field(item),
                protein_grams: grams_field(item, PROTEIN),
                fat_grams: grams_field(item, FAT),
                carbs_grams: grams_field(item, CARBS),
            })
        })
        .take(MAX_INGREDIENTS)
        .collect()
}

// ============================================================================
// Exercise
// ============================================================================

/// A sanitized exercise reply before the plausibility check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedExercise {
    /// Activity name, or the user's text when the model left it empty
    pub activity_name: String,
    /// Model calorie figure, rounded and non-negative
    pub calories_burned: u32,
    /// Model intensity label when non-empty
    pub intensity: Option<String>,
    /// Non-empty tips
    pub tips: Vec<String>,
}

/// Clamp every field of an exercise object
#[must_use]
pub fn sanitize_exercise(object: &Map<String, Value>, activity_text: &str) -> SanitizedExercise {
    let tips = match field(object, &["tips"]) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|tip| !tip.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    };

    SanitizedExercise {
        activity_name: text_field(object, &["activityName", "activity_name", "name"])
            .unwrap_or_else(|| activity_text.trim().to_owned()),
        calories_burned: coerce_count(
            field(object, &["caloriesBurned", "calories_burned", "calories"]),
            0,
        ),
        intensity: text_field(object, &["intensity"]),
        tips,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_number_rules() {
        assert_eq!(coerce_number(&json!(12.5)), Some(12.5));
        assert_eq!(coerce_number(&json!(" 42 ")), Some(42.0));
        assert_eq!(coerce_number(&json!("350 kcal")), None);
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!(true)), Some(1.0));
        assert_eq!(coerce_number(&json!(null)), None);
        assert_eq!(coerce_number(&json!([1])), None);
    }

    #[test]
    fn test_coerce_count_rounds_and_clamps() {
        assert_eq!(coerce_count(Some(&json!(2.5)), 0), 3);
        assert_eq!(coerce_count(Some(&json!(-7)), 0), 0);
        assert_eq!(coerce_count(Some(&json!("abc")), 9), 9);
        assert_eq!(coerce_count(None, 1), 1);
    }

    #[test]
    fn test_array_is_not_an_object() {
        assert!(recover_object(None, "[1, 2, 3]").is_none());
        assert!(recover_object(None, "   ").is_none());
    }

    #[test]
    fn test_structured_output_wins() {
        let structured = json!({"calories": 100});
        let (object, strategy) = recover_object(Some(&structured), "not json").unwrap();
        assert_eq!(strategy, RecoveryStrategy::Structured);
        assert_eq!(object["calories"], 100);
    }

    #[test]
    fn test_snake_case_aliases() {
        let object = json!({"title": "x", "protein_grams": 12}).as_object().cloned().unwrap();
        let result = sanitize_food(&object, "").into_result();
        assert!(result.is_food);
        assert_eq!(result.protein_grams, 12);
    }
}
