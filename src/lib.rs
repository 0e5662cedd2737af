// ABOUTME: Main library entry point for the food lens estimation pipeline
// ABOUTME: Turns meal photos, meal text and exercise text into validated nutrition records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Food Lens
//!
//! Estimates nutrition and exercise data by delegating perception to a
//! vision or language model, then forcing the model's loosely structured
//! reply into a record whose numbers are consistent and bounded.
//!
//! ## Architecture
//!
//! - **imaging**: EXIF-aware downscale and re-encode of meal photos
//! - **llm**: Provider abstraction, prompts and cancellable invocation
//! - **pricing**: Token usage to USD cost lookup
//! - **analysis**: Sanitizer plus the food and exercise services
//! - **config**: Environment configuration injected into services
//! - **logging**: `tracing` subscriber setup
//!
//! The pure algorithms (macro reconciliation, health score, MET fallback)
//! live in `food-lens-intelligence`; the data model and errors in
//! `food-lens-core`.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pierre_food_lens::analysis::FoodAnalysisService;
//! use pierre_food_lens::config::FoodLensConfig;
//! use pierre_food_lens::errors::AppResult;
//! use pierre_food_lens::llm::{ChatProvider, LlmProvider};
//! use pierre_food_lens::Locale;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = FoodLensConfig::from_env();
//!     let provider = ChatProvider::from_config(&config.llm)?
//!         .map(|p| Arc::new(p) as Arc<dyn LlmProvider>);
//!     let service = FoodAnalysisService::new(provider, &config);
//!     let response = service.analyze_text("a plate of rice with kebab", Locale::En, None).await?;
//!     println!("{} kcal", response.data.calories);
//!     Ok(())
//! }
//! ```

/// Food and exercise analysis services
pub mod analysis;

/// Environment configuration
pub mod config;

/// Meal photo transcoding
pub mod imaging;

/// LLM providers, prompts and invocation
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Model pricing and cost estimation
pub mod pricing;

pub use food_lens_core::{constants, errors, models, Locale};
pub use food_lens_intelligence as intelligence;
