mod cli;
mod config;
mod errors;
mod extraction;
mod form_filler;
mod llm_client;
mod matching;
mod models;
mod resume;
mod routes;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::llm_client::{CompletionProvider, GeminiClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let gemini = GeminiClient::new(
        config.gemini_api_base.clone(),
        config.gemini_model.clone(),
        config.google_api_key.clone(),
    )
    .context("Failed to build Gemini client")?;
    info!("LLM client initialized (model: {})", gemini.model());
    let completion: Arc<dyn CompletionProvider> = Arc::new(gemini);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, completion).await,
        Command::Parse { file, output } => cli::run_parse(completion.as_ref(), &file, output).await,
        Command::Tailor {
            file,
            job_description,
        } => cli::run_tailor(completion.as_ref(), &file, &job_description).await,
        Command::FillForm {
            file,
            job_description,
            url,
            headless,
        } => {
            cli::run_fill_form(
                completion.as_ref(),
                &config,
                &file,
                &job_description,
                &url,
                headless,
            )
            .await
        }
    }
}

async fn serve(config: Config, completion: Arc<dyn CompletionProvider>) -> Result<()> {
    info!("Starting application assistant API v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState {
        completion,
        max_upload_bytes: config.max_upload_bytes,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
