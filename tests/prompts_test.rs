// ABOUTME: Tests for prompt rendering across analysis modes and locales
// ABOUTME: Verifies placeholder substitution, hints, previous-result embedding and MET guidance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use pierre_food_lens::llm::prompts::{
    exercise_prompt, food_fix_prompt, food_image_prompt, food_text_prompt,
};
use pierre_food_lens::models::{AnalysisResult, Ingredient};
use pierre_food_lens::Locale;

const PLACEHOLDERS: &[&str] = &[
    "{language}",
    "{description}",
    "{previous}",
    "{feedback}",
    "{activity}",
    "{duration}",
    "{weight}",
    "{low}",
    "{moderate}",
    "{high}",
];

fn assert_fully_rendered(prompt: &str) {
    for placeholder in PLACEHOLDERS {
        assert!(
            !prompt.contains(placeholder),
            "{placeholder} left in prompt"
        );
    }
}

#[test]
fn test_every_locale_renders_every_mode() {
    let previous = AnalysisResult::non_food(None);
    for locale in [
        Locale::Fa,
        Locale::En,
        Locale::Ar,
        Locale::Tr,
        Locale::De,
        Locale::Fr,
        Locale::Es,
    ] {
        for prompt in [
            food_image_prompt(locale, None),
            food_text_prompt("rice", locale),
            food_fix_prompt(&previous, "more rice", locale),
            exercise_prompt("running", 30, None, locale),
        ] {
            assert_fully_rendered(&prompt);
            assert!(prompt.contains(locale.display_name()));
        }
    }
}

#[test]
fn test_image_prompt_demands_json_and_checks_bread() {
    let prompt = food_image_prompt(Locale::En, None);
    assert!(prompt.contains("isFood"));
    assert!(prompt.contains("proteinGrams"));
    assert!(prompt.contains("lavash"));
}

#[test]
fn test_image_hint_only_when_present() {
    let plain = food_image_prompt(Locale::En, None);
    let blank = food_image_prompt(Locale::En, Some("   "));
    let hinted = food_image_prompt(Locale::En, Some("with a side of yogurt"));

    assert_eq!(plain, blank);
    assert!(hinted.contains("with a side of yogurt"));
    assert!(hinted.len() > plain.len());
}

#[test]
fn test_user_text_with_braces_is_inserted_verbatim() {
    let prompt = food_text_prompt("soup {language} {unknown}", Locale::De);
    assert!(prompt.contains("soup {language} {unknown}"));
}

#[test]
fn test_fix_prompt_embeds_previous_result_and_feedback() {
    let previous = AnalysisResult {
        is_food: true,
        error: None,
        title: "Lavash wrap".to_owned(),
        calories: 420,
        portions: 1,
        protein_grams: 18,
        fat_grams: 12,
        carbs_grams: 60,
        health_score: 6,
        ingredients: vec![Ingredient {
            name: "lavash".to_owned(),
            calories: 250,
            protein_grams: 8,
            fat_grams: 2,
            carbs_grams: 50,
        }],
    };

    let prompt = food_fix_prompt(&previous, "the bread was barbari", Locale::En);

    assert!(prompt.contains("Lavash wrap"));
    assert!(prompt.contains("\"calories\": 420"));
    assert!(prompt.contains("the bread was barbari"));
}

#[test]
fn test_exercise_prompt_weight_and_intensity_labels() {
    let with_weight = exercise_prompt("swimming", 45, Some(82.5), Locale::Tr);
    assert!(with_weight.contains("82.5 kg"));
    assert!(with_weight.contains("45"));
    assert!(with_weight.contains("Orta"));

    let without_weight = exercise_prompt("swimming", 45, None, Locale::En);
    assert!(without_weight.contains("70 kg"));
}
