// ABOUTME: Exercise analysis service estimating calories burned for a described activity
// ABOUTME: Falls back to the keyword MET estimate when the model is unavailable or implausible
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use food_lens_core::models::{AnalysisResponse, ExerciseResult, Intensity};
use food_lens_core::Locale;
use food_lens_intelligence::{enforce_plausible_calories, fallback_exercise, ExerciseConfig};
use tracing::{field, info, instrument, warn, Span};
use uuid::Uuid;

use super::cost_meta;
use super::sanitizer::{recover_object, sanitize_exercise};
use crate::config::{FoodLensConfig, ModelSettings};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::exercise_prompt;
use crate::llm::{invoke, CancellationToken, ChatMessage, ChatRequest, LlmProvider};
use crate::pricing::PricingTable;

/// Largest accepted duration in minutes (24 hours)
pub const MAX_DURATION_MINUTES: f64 = 1440.0;

/// Exercise estimation service
///
/// Unlike food analysis, every model failure short of cancellation degrades
/// to the MET formula instead of surfacing an error.
pub struct ExerciseAnalysisService {
    provider: Option<Arc<dyn LlmProvider>>,
    models: ModelSettings,
    config: ExerciseConfig,
    pricing: Arc<PricingTable>,
}

impl ExerciseAnalysisService {
    /// Create a service from the loaded configuration
    #[must_use]
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, config: &FoodLensConfig) -> Self {
        Self::with_parts(
            provider,
            config.models.clone(),
            config.intelligence.exercise.clone(),
            Arc::new(config.pricing.clone()),
        )
    }

    /// Create a service from individual parts
    #[must_use]
    pub fn with_parts(
        provider: Option<Arc<dyn LlmProvider>>,
        models: ModelSettings,
        config: ExerciseConfig,
        pricing: Arc<PricingTable>,
    ) -> Self {
        Self {
            provider,
            models,
            config,
            pricing,
        }
    }

    /// Estimate calories burned for an activity
    ///
    /// `duration_minutes` is authoritative: the result always carries it and
    /// `caloriesBurned` always lies within `[0, 20 * duration]`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for blank text, a negative or non-finite duration, or
    ///   a non-positive or non-finite body weight
    /// - `RequestCancelled` when the token fires
    /// - provider transport failures, which are surfaced rather than replaced
    #[instrument(
        skip_all,
        fields(%locale, duration_minutes = duration_minutes, analysis_id = field::Empty)
    )]
    pub async fn analyze_exercise(
        &self,
        activity_text: &str,
        duration_minutes: f64,
        body_weight_kg: Option<f64>,
        locale: Locale,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<AnalysisResponse<ExerciseResult>> {
        let analysis_id = Uuid::new_v4().to_string();
        Span::current().record("analysis_id", analysis_id.as_str());

        let (duration, weight) = validate(activity_text, duration_minutes, body_weight_kg)
            .map_err(|e| e.with_analysis_id(&analysis_id))?;

        let Some(provider) = self.provider.as_deref() else {
            warn!("No model provider configured; using MET fallback");
            return Ok(AnalysisResponse::new(
                self.fallback(activity_text, duration, weight, locale),
                None,
            ));
        };

        let request = ChatRequest::new(vec![ChatMessage::user(exercise_prompt(
            activity_text,
            duration,
            weight,
            locale,
        ))])
        .with_model(self.models.exercise_model.clone())
        .with_max_tokens(self.models.exercise_max_tokens)
        .with_json_mode();

        let response = invoke(provider, &request, cancel)
            .await
            .map_err(|e| e.with_analysis_id(&analysis_id))?;
        let meta = cost_meta(&self.pricing, "exercise", &response);

        let Some((object, strategy)) = recover_object(response.parsed.as_ref(), &response.content)
        else {
            warn!(
                finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
                "Falling back to heuristic exercise analysis result"
            );
            return Ok(AnalysisResponse::new(
                self.fallback(activity_text, duration, weight, locale),
                meta,
            ));
        };

        let sanitized = sanitize_exercise(&object, activity_text);
        let (calories_burned, replaced) = enforce_plausible_calories(
            sanitized.calories_burned,
            activity_text,
            duration,
            weight,
            &self.config,
        );
        if replaced {
            warn!(
                model_calories = sanitized.calories_burned,
                calories_burned, "Model calories implausible; replaced with MET estimate"
            );
        }

        let result = ExerciseResult {
            activity_name: sanitized.activity_name,
            calories_burned,
            duration,
            intensity: sanitized
                .intensity
                .unwrap_or_else(|| Intensity::Moderate.label(locale).to_owned()),
            tips: sanitized.tips,
        };

        info!(
            ?strategy,
            calories_burned = result.calories_burned,
            "Exercise analysis complete"
        );
        Ok(AnalysisResponse::new(result, meta))
    }

    fn fallback(
        &self,
        activity_text: &str,
        duration: u32,
        weight: Option<f64>,
        locale: Locale,
    ) -> ExerciseResult {
        let result = fallback_exercise(activity_text, duration, weight, locale, &self.config);
        info!(
            activity = %result.activity_name,
            calories_burned = result.calories_burned,
            "MET fallback estimate"
        );
        result
    }
}

/// Check caller input and round the duration to whole minutes
fn validate(
    activity_text: &str,
    duration_minutes: f64,
    body_weight_kg: Option<f64>,
) -> AppResult<(u32, Option<f64>)> {
    if activity_text.trim().is_empty() {
        return Err(AppError::invalid_input("Activity description is empty"));
    }
    if !duration_minutes.is_finite() || duration_minutes < 0.0 {
        return Err(AppError::invalid_input(format!(
            "Duration must be a non-negative number of minutes, got {duration_minutes}"
        )));
    }
    if duration_minutes > MAX_DURATION_MINUTES {
        return Err(AppError::invalid_input(format!(
            "Duration must not exceed {MAX_DURATION_MINUTES} minutes"
        )));
    }
    if let Some(kg) = body_weight_kg {
        if !kg.is_finite() || kg <= 0.0 {
            return Err(AppError::invalid_input(format!(
                "Body weight must be a positive number of kilograms, got {kg}"
            )));
        }
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let duration = duration_minutes.round() as u32;
    Ok((duration, body_weight_kg))
}
