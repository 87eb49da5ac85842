//! HTTP boundary for the feedback analysis service.
//!
//! Axum router with three routes: a plain-text liveness root, POST /analyze
//! (full or narrow contract, chosen per deployment), and POST /summarize.
//! Cross-origin requests are allowed on all routes.

use crate::analyzer::{AnalysisReport, Analyzer};
use crate::config::{AnalyzeMode, Config};
use crate::error::Result;
use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub texts: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub sentiment: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Liveness endpoint
pub async fn root_handler() -> impl IntoResponse {
    "Feedback analysis service is running"
}

/// Full analyze contract: capability-optional field assembly
pub async fn analyze_full_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>> {
    let text = request.text.as_deref().unwrap_or("");
    let report = state.analyzer.analyze(text).await?;
    Ok(Json(report))
}

/// Narrow analyze contract: one neutral-thresholded sentiment label
pub async fn analyze_narrow_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<SentimentResponse>> {
    let text = request.text.as_deref().unwrap_or("");
    let sentiment = state.analyzer.classify_overall(text).await?;
    Ok(Json(SentimentResponse { sentiment }))
}

/// Batch summarization of multiple feedback texts
pub async fn summarize_handler(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummaryResponse>> {
    let texts = request.texts.unwrap_or_default();
    let summary = state.analyzer.summarize_batch(&texts).await?;
    Ok(Json(SummaryResponse { summary }))
}

/// Assemble the router for the given deployment mode.
///
/// The full and narrow analyze contracts are mutually exclusive on the same
/// route; exactly one is mounted.
pub fn build_router(state: AppState, mode: AnalyzeMode) -> Router {
    let analyze = match mode {
        AnalyzeMode::Full => post(analyze_full_handler),
        AnalyzeMode::Narrow => post(analyze_narrow_handler),
    };

    Router::new()
        .route("/", get(root_handler))
        .route("/analyze", analyze)
        .route("/summarize", post(summarize_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn start_http_server(config: &Config, analyzer: Analyzer) -> Result<()> {
    let state = AppState {
        analyzer: Arc::new(analyzer),
    };
    let app = build_router(state, config.runtime.analyze_mode);

    let listener = tokio::net::TcpListener::bind(config.runtime.http_bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    tracing::info!(
        "Starting HTTP server on {} (analyze mode: {:?})",
        config.runtime.http_bind,
        config.runtime.analyze_mode
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
