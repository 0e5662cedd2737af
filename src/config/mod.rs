// ABOUTME: Configuration management module for provider, model and pricing settings
// ABOUTME: Environment-only configuration loaded once and passed explicitly to services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for the food lens pipeline
//!
//! - **Environment**: credentials, model identifiers, token budgets, pricing overrides
//! - **Types**: provider selection enum
//!
//! Nothing in the pipeline reads the environment directly; services receive
//! a [`FoodLensConfig`] (or parts of it) at construction.

/// Environment and runtime configuration
pub mod environment;
/// Provider selection types
pub mod types;

pub use environment::{FoodLensConfig, LlmConfig, ModelSettings};
pub use types::LlmProviderType;
