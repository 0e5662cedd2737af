// ABOUTME: Prompt templates for food image, food text, fix and exercise analysis
// ABOUTME: Templates are loaded at compile time and rendered per locale in a single pass
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Analysis Prompts
//!
//! Prompts are loaded at compile time from markdown files for easy maintenance.
//! Every template demands a JSON-only reply with a closed key set; the
//! `{language}` placeholder receives the display name of the output locale.
//!
//! Rendering is a single left-to-right pass, so user text that happens to
//! contain `{language}` or another placeholder is inserted verbatim.

use food_lens_core::models::{AnalysisResult, Intensity};
use food_lens_core::Locale;

/// Image-mode template
pub const FOOD_IMAGE_TEMPLATE: &str = include_str!("food_image.md");
/// Text-mode template with the portion knowledge base
pub const FOOD_TEXT_TEMPLATE: &str = include_str!("food_text.md");
/// Fix-mode template
pub const FOOD_FIX_TEMPLATE: &str = include_str!("food_fix.md");
/// Exercise template with MET guidance
pub const EXERCISE_TEMPLATE: &str = include_str!("exercise.md");

/// Prompt for a meal photo, optionally with the user's own description as a hint
#[must_use]
pub fn food_image_prompt(locale: Locale, description: Option<&str>) -> String {
    let mut prompt = render(FOOD_IMAGE_TEMPLATE, &[("language", locale.display_name())]);
    if let Some(hint) = description.map(str::trim).filter(|d| !d.is_empty()) {
        prompt.push_str("\nThe user added this note about the photo. Use it only to disambiguate what you see; the photo wins if they disagree:\n\"");
        prompt.push_str(hint);
        prompt.push_str("\"\n");
    }
    prompt
}

/// Prompt for a free-text meal description
#[must_use]
pub fn food_text_prompt(description: &str, locale: Locale) -> String {
    render(
        FOOD_TEXT_TEMPLATE,
        &[
            ("language", locale.display_name()),
            ("description", description.trim()),
        ],
    )
}

/// Prompt that replaces a previous result according to user feedback
#[must_use]
pub fn food_fix_prompt(previous: &AnalysisResult, feedback: &str, locale: Locale) -> String {
    let previous_json =
        serde_json::to_string_pretty(previous).unwrap_or_else(|_| "{}".to_owned());
    render(
        FOOD_FIX_TEMPLATE,
        &[
            ("language", locale.display_name()),
            ("previous", &previous_json),
            ("feedback", feedback.trim()),
        ],
    )
}

/// Prompt for an exercise description
#[must_use]
pub fn exercise_prompt(
    activity: &str,
    duration_minutes: u32,
    body_weight_kg: Option<f64>,
    locale: Locale,
) -> String {
    let weight = body_weight_kg.map_or_else(
        || "User weight is not provided; use an average adult weight of 70 kg.".to_owned(),
        |kg| format!("User weight: {kg} kg."),
    );
    let duration = duration_minutes.to_string();
    render(
        EXERCISE_TEMPLATE,
        &[
            ("language", locale.display_name()),
            ("low", Intensity::Low.label(locale)),
            ("moderate", Intensity::Moderate.label(locale)),
            ("high", Intensity::High.label(locale)),
            ("duration", &duration),
            ("weight", &weight),
            ("activity", activity.trim()),
        ],
    )
}

/// Replace `{key}` placeholders in one pass; unknown braces are copied through
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = values.iter().find(|(key, _)| {
            tail.strip_prefix(key)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
