// ABOUTME: Food lens CLI - analyze meal photos, meal text, corrections and exercise
// ABOUTME: Prints the {data, meta} JSON envelope on stdout; Ctrl-C cancels the model call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Analyze a meal photo
//! food-lens image lunch.jpg --description "with yogurt" --locale fa
//!
//! # Analyze a meal description
//! food-lens text "half a plate of ghormeh sabzi with rice"
//!
//! # Correct a previous result
//! food-lens fix previous.json "this was barbari, not lavash"
//!
//! # Estimate an exercise session
//! food-lens exercise "running in the park" --duration 30 --weight 72
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pierre_food_lens::{
    analysis::{ExerciseAnalysisService, FoodAnalysisService},
    config::FoodLensConfig,
    errors::{AppError, AppResult, ErrorResponse},
    llm::{CancellationToken, ChatProvider, LlmProvider},
    logging::LoggingConfig,
    models::AnalysisResult,
    Locale,
};
use serde::Serialize;
use tracing::{info, warn};

/// Exit status for a run aborted with Ctrl-C
const EXIT_CANCELLED: u8 = 130;

#[derive(Parser)]
#[command(
    name = "food-lens",
    about = "Estimate nutrition from meal photos or text, and calories burned from exercise",
    long_about = "Sends one request to the configured model provider, then sanitizes and reconciles the reply. Configure with FOOD_LENS_LLM_PROVIDER and the provider's API key."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output language (fa, en, ar, tr, de, fr, es); defaults to `FOOD_LENS_DEFAULT_LOCALE`
    #[arg(long, short = 'l', global = true)]
    locale: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a meal photo
    Image {
        /// Path to the image file
        path: PathBuf,

        /// Optional description used as a disambiguation hint
        #[arg(long, short = 'd')]
        description: Option<String>,
    },

    /// Analyze a meal description
    Text {
        /// What was eaten
        description: String,
    },

    /// Correct a previous result with feedback
    Fix {
        /// Path to the previous result JSON (the `data` object or the whole envelope)
        previous: PathBuf,

        /// What was wrong with the previous result
        feedback: String,
    },

    /// Estimate calories burned by an activity
    Exercise {
        /// Activity description
        activity: String,

        /// Duration in minutes
        #[arg(long)]
        duration: f64,

        /// Body weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    if let Err(e) = logging.init() {
        eprintln!("{e}");
    }

    let config = FoodLensConfig::from_env();
    let locale = cli
        .locale
        .as_deref()
        .map_or(config.default_locale, Locale::from_code);

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling analysis");
            ctrl_c_token.cancel();
        }
    });

    match run(cli.command, &config, locale, &cancel).await {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let cancelled = e.is_cancelled();
            let body = serde_json::to_string_pretty(&ErrorResponse::from(e))
                .unwrap_or_else(|_| "{}".to_owned());
            println!("{body}");
            if cancelled {
                ExitCode::from(EXIT_CANCELLED)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(
    command: Command,
    config: &FoodLensConfig,
    locale: Locale,
    cancel: &CancellationToken,
) -> AppResult<String> {
    let provider: Option<Arc<dyn LlmProvider>> = ChatProvider::from_config(&config.llm)?
        .map(|provider| Arc::new(provider) as Arc<dyn LlmProvider>);
    info!(%locale, provider = provider.is_some(), "Running analysis");

    match command {
        Command::Image { path, description } => {
            let image = tokio::fs::read(&path).await.map_err(|e| {
                AppError::invalid_input(format!("Cannot read {}: {e}", path.display()))
            })?;
            let service = FoodAnalysisService::new(provider, config);
            let response = service
                .analyze_image(image.into(), description.as_deref(), locale, Some(cancel))
                .await?;
            to_json(&response)
        }
        Command::Text { description } => {
            let service = FoodAnalysisService::new(provider, config);
            let response = service
                .analyze_text(&description, locale, Some(cancel))
                .await?;
            to_json(&response)
        }
        Command::Fix { previous, feedback } => {
            let previous = read_previous(&previous).await?;
            let service = FoodAnalysisService::new(provider, config);
            let response = service
                .fix_analysis(&previous, &feedback, locale, Some(cancel))
                .await?;
            to_json(&response)
        }
        Command::Exercise {
            activity,
            duration,
            weight,
        } => {
            let service = ExerciseAnalysisService::new(provider, config);
            let response = service
                .analyze_exercise(&activity, duration, weight, locale, Some(cancel))
                .await?;
            to_json(&response)
        }
    }
}

/// Load a previous result, accepting either the bare record or a `{data, meta}` envelope
async fn read_previous(path: &Path) -> AppResult<AnalysisResult> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::invalid_input(format!("Cannot read {}: {e}", path.display())))?;
    let value = match serde_json::from_str::<serde_json::Value>(&raw)? {
        serde_json::Value::Object(mut envelope) if envelope.contains_key("data") => {
            envelope.remove("data").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|e| {
        AppError::invalid_input(format!("{} is not an analysis result: {e}", path.display()))
    })
}

fn to_json(value: &impl Serialize) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
