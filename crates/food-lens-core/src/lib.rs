// ABOUTME: Core types and constants for the food lens estimation pipeline
// ABOUTME: Foundation crate with error handling, the analysis data model, and locales
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Food Lens Core
//!
//! Foundation crate shared by the estimation pipeline. It changes rarely and
//! carries no I/O.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: Food, ingredient, exercise and cost records produced per request
//! - **locale**: Supported output languages and their display names
//! - **constants**: Range limits and defaults shared by every pipeline stage

/// Unified error handling system with standard error codes
pub mod errors;

/// Per-request analysis records (food, exercise, cost metadata)
pub mod models;

/// Supported output languages
pub mod locale;

/// Range limits and defaults shared across crates
pub mod constants;

pub use errors::{AppError, AppResult, ErrorCode};
pub use locale::Locale;
