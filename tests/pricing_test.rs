// ABOUTME: Tests for model pricing lookup and cost estimation
// ABOUTME: Covers date-suffix normalization, prefix matching, overrides and missing usage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use pierre_food_lens::llm::TokenUsage;
use pierre_food_lens::pricing::{ModelPricing, PricingTable};

#[test]
fn test_exact_and_dated_lookup() {
    let table = PricingTable::default();

    let exact = table.pricing_for("gpt-4o-mini-2024-07-18").unwrap();
    let undated = table.pricing_for("gpt-4o-mini").unwrap();
    let other_date = table.pricing_for("gpt-4o-mini-2025-01-31").unwrap();

    assert_eq!(exact, undated);
    assert_eq!(exact, other_date);
}

#[test]
fn test_mini_variant_not_priced_as_full_model() {
    let table = PricingTable::with_overrides([
        ("gpt-5".to_owned(), ModelPricing::new(0.01, 0.04)),
        ("gpt-5-mini".to_owned(), ModelPricing::new(0.001, 0.004)),
    ]);

    assert_eq!(
        table.pricing_for("gpt-5-mini-2025-08-07"),
        Some(ModelPricing::new(0.001, 0.004))
    );
}

#[test]
fn test_prefix_match_for_suffixed_names() {
    let table = PricingTable::default();
    assert!(table.pricing_for("deepseek-chat-v3").is_some());
}

#[test]
fn test_unknown_model_has_no_cost() {
    let table = PricingTable::default();
    assert_eq!(table.cost_usd("llava:13b", 1000, 1000), None);
    assert!(PricingTable::empty().pricing_for("gpt-4o-mini").is_none());
}

#[test]
fn test_cost_rounded_to_six_decimals() {
    let table = PricingTable::with_overrides([(
        "custom".to_owned(),
        ModelPricing::new(0.000_333_3, 0.000_777_7),
    )]);

    let cost = table.cost_usd("custom", 1234, 567).unwrap();
    let expected = ((1.234 * 0.000_333_3 + 0.567 * 0.000_777_7) * 1e6_f64).round() / 1e6;
    assert!((cost - expected).abs() < 1e-12);
}

#[test]
fn test_overrides_take_precedence() {
    let table = PricingTable::from_override_json(Some(
        r#"{"gpt-4o-mini": {"inputPer1K": 1.0, "outputPer1K": 2.0}}"#,
    ));
    assert_eq!(
        table.pricing_for("gpt-4o-mini-2024-07-18"),
        Some(ModelPricing::new(1.0, 2.0))
    );
}

#[test]
fn test_estimate_fills_totals() {
    let table = PricingTable::default();
    let usage = TokenUsage {
        prompt_tokens: 2000,
        completion_tokens: 500,
        total_tokens: None,
    };

    let estimate = table.estimate("gpt-5-mini", Some(&usage)).unwrap();

    assert_eq!(estimate.model.as_deref(), Some("gpt-5-mini"));
    assert_eq!(estimate.total_tokens, Some(2500));
    let cost = estimate.cost_usd.unwrap();
    assert!((cost - 0.0015).abs() < 1e-9, "cost was {cost}");
}

#[test]
fn test_estimate_without_usage_is_none() {
    assert!(PricingTable::default().estimate("gpt-4o-mini", None).is_none());
}
