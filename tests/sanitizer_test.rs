// ABOUTME: Tests for model reply recovery and field clamping
// ABOUTME: Exercises the strategy order, loose numeric coercion and ingredient filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use pierre_food_lens::analysis::sanitizer::{
    coerce_number, recover_object, sanitize_exercise, sanitize_food, RecoveryStrategy,
    SanitizedFood,
};
use pierre_food_lens::constants::food::{MAX_CALORIES, MAX_MACRO_GRAMS};
use serde_json::{json, Map, Value};

fn object(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

// ============================================================================
// Recovery
// ============================================================================

#[test]
fn test_whole_reply_parsed_directly() {
    let (object, strategy) = recover_object(None, r#" {"calories": 200} "#).unwrap();
    assert_eq!(strategy, RecoveryStrategy::Direct);
    assert_eq!(object["calories"], 200);
}

#[test]
fn test_object_extracted_from_markdown_fence() {
    let reply = "```json\n{\"title\": \"Soup\", \"calories\": 150}\n```";
    let (object, strategy) = recover_object(None, reply).unwrap();
    assert_eq!(strategy, RecoveryStrategy::Extracted);
    assert_eq!(object["title"], "Soup");
}

#[test]
fn test_no_object_anywhere() {
    assert!(recover_object(None, "no json here").is_none());
    assert!(recover_object(None, "{broken").is_none());
    assert!(recover_object(Some(&json!("a string")), "").is_none());
}

#[test]
fn test_structured_non_object_falls_through_to_content() {
    let (_, strategy) = recover_object(Some(&json!([1, 2])), r#"{"calories": 1}"#).unwrap();
    assert_eq!(strategy, RecoveryStrategy::Direct);
}

// ============================================================================
// Coercion
// ============================================================================

#[test]
fn test_numeric_coercion() {
    assert_eq!(coerce_number(&json!(12.5)), Some(12.5));
    assert_eq!(coerce_number(&json!(" 42 ")), Some(42.0));
    assert_eq!(coerce_number(&json!(true)), Some(1.0));
    assert_eq!(coerce_number(&json!("")), None);
    assert_eq!(coerce_number(&json!("350 kcal")), None);
    assert_eq!(coerce_number(&json!(null)), None);
    assert_eq!(coerce_number(&json!({"value": 1})), None);
}

// ============================================================================
// Food
// ============================================================================

#[test]
fn test_food_fields_clamped() {
    let raw = object(&json!({
        "title": "  Ghormeh sabzi ",
        "calories": "612.5",
        "portions": 2.4,
        "proteinGrams": -3,
        "fatGrams": "abc",
        "carbsGrams": 70.5,
        "healthScore": 15
    }));

    let SanitizedFood::Food(result) = sanitize_food(&raw, "fallback") else {
        panic!("expected food");
    };

    assert!(result.is_food);
    assert_eq!(result.title, "Ghormeh sabzi");
    assert_eq!(result.calories, 613);
    assert_eq!(result.portions, 2);
    assert_eq!(result.protein_grams, 0);
    assert_eq!(result.fat_grams, 0);
    assert_eq!(result.carbs_grams, 71);
    assert_eq!(result.health_score, 10);
}

#[test]
fn test_absurd_quantities_clamped_to_ceilings() {
    let raw = object(&json!({
        "title": "Typo",
        "calories": 9e15,
        "proteinGrams": 2_000_000_000u64,
        "fatGrams": "1e12",
        "carbsGrams": 5001,
        "ingredients": [{"name": "rice", "calories": 1e9, "carbsGrams": 1e9}]
    }));

    let result = sanitize_food(&raw, "").into_result();

    assert_eq!(result.calories, MAX_CALORIES);
    assert_eq!(result.protein_grams, MAX_MACRO_GRAMS);
    assert_eq!(result.fat_grams, MAX_MACRO_GRAMS);
    assert_eq!(result.carbs_grams, MAX_MACRO_GRAMS);
    assert_eq!(result.ingredients[0].calories, MAX_CALORIES);
    assert_eq!(result.ingredients[0].carbs_grams, MAX_MACRO_GRAMS);
}

#[test]
fn test_ingredients_capped_at_six_and_require_names() {
    let items: Vec<Value> = (0..9)
        .map(|i| json!({"name": format!("item {i}"), "calories": i * 10}))
        .chain([json!({"calories": 5}), json!("loose string")])
        .collect();
    let raw = object(&json!({"title": "Platter", "ingredients": items}));

    let result = sanitize_food(&raw, "").into_result();

    assert_eq!(result.ingredients.len(), 6);
    assert_eq!(result.ingredients[0].name, "item 0");
    assert_eq!(result.ingredients[5].calories, 50);
}

#[test]
fn test_non_food_zeroes_everything() {
    let raw = object(&json!({
        "isFood": "false",
        "title": "Keyboard",
        "calories": 300,
        "ingredients": [{"name": "plastic"}]
    }));

    let SanitizedFood::NonFood(result) = sanitize_food(&raw, "x") else {
        panic!("expected non-food");
    };

    assert!(!result.is_food);
    assert_eq!(result.title, "");
    assert_eq!(result.calories, 0);
    assert_eq!(result.portions, 0);
    assert!(result.ingredients.is_empty());
}

#[test]
fn test_missing_is_food_means_food() {
    let raw = object(&json!({"calories": 100}));
    assert!(matches!(sanitize_food(&raw, "meal"), SanitizedFood::Food(_)));
}

// ============================================================================
// Exercise
// ============================================================================

#[test]
fn test_exercise_fields() {
    let raw = object(&json!({
        "activityName": "",
        "caloriesBurned": "250.4",
        "intensity": "  ",
        "tips": ["Hydrate", 3, "", "Stretch"]
    }));

    let result = sanitize_exercise(&raw, "  evening swim ");

    assert_eq!(result.activity_name, "evening swim");
    assert_eq!(result.calories_burned, 250);
    assert_eq!(result.intensity, None);
    assert_eq!(result.tips, vec!["Hydrate".to_owned(), "Stretch".to_owned()]);
}
