// ABOUTME: Single-shot cancellable model invocation used by every analysis path
// ABOUTME: Checks modality support, then races the provider call against the cancel signal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{error, info, instrument, warn};

use super::{CancellationToken, ChatRequest, ChatResponse, LlmProvider};
use crate::errors::{AppError, AppResult};

/// Send exactly one request to the provider
///
/// No retries happen here. A cancelled token wins over a completed reply, so
/// a reply racing a cancellation is dropped rather than parsed.
///
/// # Errors
///
/// - `InvalidInput` if the request carries an image and the provider has no vision
/// - `RequestCancelled` if the token fires before or during the call
/// - whatever the provider returns for transport and API failures
#[instrument(
    skip(provider, request, cancel),
    fields(provider = provider.name(), model = request.model.as_deref().unwrap_or(provider.default_model()))
)]
pub async fn invoke(
    provider: &dyn LlmProvider,
    request: &ChatRequest,
    cancel: Option<&CancellationToken>,
) -> AppResult<ChatResponse> {
    if request.has_images() && !provider.capabilities().supports_vision() {
        return Err(AppError::invalid_input(format!(
            "{} does not accept image input",
            provider.display_name()
        )));
    }

    let result = match cancel {
        Some(token) => {
            if token.is_cancelled() {
                info!("Analysis cancelled before model call");
                return Err(AppError::cancelled());
            }
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    info!("Analysis cancelled during model call");
                    Err(AppError::cancelled())
                }
                response = provider.complete(request) => response,
            }
        }
        None => provider.complete(request).await,
    };

    match &result {
        Ok(response) => {
            if response.usage.is_none() {
                warn!("Provider reported no token usage");
            }
        }
        Err(e) if e.is_cancelled() => {}
        Err(e) => error!(error = %e, "Model call failed"),
    }

    result
}
