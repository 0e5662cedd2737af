// ABOUTME: Food analysis service for meal photos, meal descriptions and feedback corrections
// ABOUTME: Runs one model call, then sanitizes, reconciles macros and scores the result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use bytes::Bytes;
use food_lens_core::models::{AnalysisResponse, AnalysisResult};
use food_lens_core::Locale;
use food_lens_intelligence::{
    blend_health_score, compute_health_score, reconcile, HealthScoreInput, IntelligenceConfig,
    MacroTotals,
};
use tracing::{debug, field, info, instrument, warn, Span};
use uuid::Uuid;

use super::cost_meta;
use super::sanitizer::{recover_object, sanitize_food, SanitizedFood};
use crate::config::{FoodLensConfig, ModelSettings};
use crate::errors::{AppError, AppResult};
use crate::imaging::{transcode, TranscodedImage};
use crate::llm::prompts::{food_fix_prompt, food_image_prompt, food_text_prompt};
use crate::llm::{
    invoke, CancellationToken, ChatMessage, ChatRequest, ImageAttachment, LlmProvider,
};
use crate::pricing::PricingTable;

/// Reconcile the energy identity and attach the health score
///
/// Non-food results pass through untouched.
#[must_use]
pub fn finalize_food(result: AnalysisResult, config: &IntelligenceConfig) -> AnalysisResult {
    if !result.is_food {
        return result;
    }

    let reconciled = reconcile(
        MacroTotals {
            calories: result.calories,
            protein_grams: result.protein_grams,
            fat_grams: result.fat_grams,
            carbs_grams: result.carbs_grams,
        },
        &config.reconciliation,
    );
    let totals = reconciled.totals;

    let computed = compute_health_score(
        &HealthScoreInput {
            calories: totals.calories,
            protein_grams: totals.protein_grams,
            fat_grams: totals.fat_grams,
            carbs_grams: totals.carbs_grams,
            ingredient_count: result.ingredients.len(),
        },
        &config.health_score,
    );
    let health_score = blend_health_score(result.health_score, computed);

    debug!(
        outcome = ?reconciled.outcome,
        model_score = result.health_score,
        computed_score = computed,
        health_score,
        "Finalized food analysis"
    );

    AnalysisResult {
        calories: totals.calories,
        protein_grams: totals.protein_grams,
        fat_grams: totals.fat_grams,
        carbs_grams: totals.carbs_grams,
        health_score,
        ..result
    }
}

/// Food estimation service
///
/// There is no deterministic substitute for visual or textual food
/// composition, so a missing provider or an unparsable reply is an error.
pub struct FoodAnalysisService {
    provider: Option<Arc<dyn LlmProvider>>,
    models: ModelSettings,
    intelligence: IntelligenceConfig,
    pricing: Arc<PricingTable>,
}

impl FoodAnalysisService {
    /// Create a service from the loaded configuration
    #[must_use]
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, config: &FoodLensConfig) -> Self {
        Self::with_parts(
            provider,
            config.models.clone(),
            config.intelligence.clone(),
            Arc::new(config.pricing.clone()),
        )
    }

    /// Create a service from individual parts
    #[must_use]
    pub fn with_parts(
        provider: Option<Arc<dyn LlmProvider>>,
        models: ModelSettings,
        intelligence: IntelligenceConfig,
        pricing: Arc<PricingTable>,
    ) -> Self {
        Self {
            provider,
            models,
            intelligence,
            pricing,
        }
    }

    /// Estimate a meal from a photo, with an optional user description as a hint
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty image
    /// - `ExternalServiceUnavailable` when no provider is configured
    /// - `AiResponseParseFailed` when no JSON object can be recovered
    /// - `RequestCancelled` when the token fires
    #[instrument(
        skip_all,
        fields(mode = "image", bytes = image.len(), %locale, analysis_id = field::Empty)
    )]
    pub async fn analyze_image(
        &self,
        image: Bytes,
        description: Option<&str>,
        locale: Locale,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<AnalysisResponse<AnalysisResult>> {
        let analysis_id = start_analysis();
        if image.is_empty() {
            return Err(AppError::invalid_input("Image is empty").with_analysis_id(analysis_id));
        }
        let provider = self.provider(&analysis_id)?;

        let original = image.clone();
        let transcoded = tokio::task::spawn_blocking(move || transcode(&image))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Transcoding task failed, sending original");
                TranscodedImage::original(&original)
            });

        let prompt = food_image_prompt(locale, description);
        let request = ChatRequest::new(vec![ChatMessage::user_with_image(
            prompt,
            ImageAttachment::new(transcoded.mime_type, transcoded.data),
        )])
        .with_model(self.models.vision_model.clone());

        self.run(provider, request, description.unwrap_or_default(), &analysis_id, cancel)
            .await
    }

    /// Estimate a meal from a free-text description
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a blank description
    /// - `ExternalServiceUnavailable` when no provider is configured
    /// - `AiResponseParseFailed` when no JSON object can be recovered
    /// - `RequestCancelled` when the token fires
    #[instrument(
        skip_all,
        fields(mode = "text", %locale, analysis_id = field::Empty)
    )]
    pub async fn analyze_text(
        &self,
        description: &str,
        locale: Locale,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<AnalysisResponse<AnalysisResult>> {
        let analysis_id = start_analysis();
        if description.trim().is_empty() {
            return Err(
                AppError::invalid_input("Description is empty").with_analysis_id(analysis_id)
            );
        }
        let provider = self.provider(&analysis_id)?;

        let request = ChatRequest::new(vec![ChatMessage::user(food_text_prompt(
            description,
            locale,
        ))])
        .with_model(self.models.text_model.clone());

        self.run(provider, request, description, &analysis_id, cancel)
            .await
    }

    /// Replace a previous result according to user feedback
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for blank feedback
    /// - `ExternalServiceUnavailable` when no provider is configured
    /// - `AiResponseParseFailed` when no JSON object can be recovered
    /// - `RequestCancelled` when the token fires
    #[instrument(
        skip_all,
        fields(mode = "fix", %locale, analysis_id = field::Empty)
    )]
    pub async fn fix_analysis(
        &self,
        previous: &AnalysisResult,
        feedback: &str,
        locale: Locale,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<AnalysisResponse<AnalysisResult>> {
        let analysis_id = start_analysis();
        if feedback.trim().is_empty() {
            return Err(AppError::invalid_input("Feedback is empty").with_analysis_id(analysis_id));
        }
        let provider = self.provider(&analysis_id)?;

        let request = ChatRequest::new(vec![ChatMessage::user(food_fix_prompt(
            previous, feedback, locale,
        ))])
        .with_model(self.models.text_model.clone());

        self.run(provider, request, &previous.title, &analysis_id, cancel)
            .await
    }

    fn provider(&self, analysis_id: &str) -> AppResult<&dyn LlmProvider> {
        self.provider.as_deref().ok_or_else(|| {
            warn!("Food analysis requested without a configured model provider");
            AppError::service_unavailable("No model provider is configured for food analysis")
                .with_analysis_id(analysis_id)
        })
    }

    async fn run(
        &self,
        provider: &dyn LlmProvider,
        request: ChatRequest,
        fallback_title: &str,
        analysis_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<AnalysisResponse<AnalysisResult>> {
        let request = request
            .with_temperature(self.models.temperature)
            .with_max_tokens(self.models.food_max_tokens)
            .with_json_mode();

        let response = invoke(provider, &request, cancel)
            .await
            .map_err(|e| e.with_analysis_id(analysis_id))?;
        let meta = cost_meta(&self.pricing, "food", &response);

        let Some((object, strategy)) = recover_object(response.parsed.as_ref(), &response.content)
        else {
            warn!(
                finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
                "AI response parsing failed"
            );
            return Err(AppError::parse_failed(&response.content).with_analysis_id(analysis_id));
        };

        let result = match sanitize_food(&object, fallback_title) {
            SanitizedFood::NonFood(result) => {
                info!(?strategy, "Input classified as non-food");
                result
            }
            SanitizedFood::Food(result) => finalize_food(result, &self.intelligence),
        };

        info!(
            ?strategy,
            is_food = result.is_food,
            calories = result.calories,
            health_score = result.health_score,
            "Food analysis complete"
        );
        Ok(AnalysisResponse::new(result, meta))
    }
}

/// Allocate an analysis ID and attach it to the current span
fn start_analysis() -> String {
    let analysis_id = Uuid::new_v4().to_string();
    Span::current().record("analysis_id", analysis_id.as_str());
    analysis_id
}
