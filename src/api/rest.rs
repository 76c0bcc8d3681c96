// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
//   GET /health                      public, never rate limited
//   GET /v1/actives|gainers|losers   market movers, passed through untouched
//   GET /v1/indicators/<kind>        ?symbol=..&<indicator params>
//
// Everything under /v1 runs through the anonymous rate limiter. Failures are
// `ServiceError`s, rendered as `{"error": ".."}` with a matching status.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Query, Request, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info_span, warn};
use uuid::Uuid;

use crate::analysis::{
    AdxParams, Analysis, AroonParams, BollingerParams, IchimokuParams, MacdParams, ObvParams,
    SuperTrendParams,
};
use crate::api::rate_limit;
use crate::app_state::AppState;
use crate::error::ServiceError;
use crate::types::MarketMover;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS, tracing and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        info_span!(
            "request",
            id = %Uuid::new_v4(),
            method = %request.method(),
            path = %request.uri().path(),
        )
    });

    let v1 = Router::new()
        // ── Movers ──────────────────────────────────────────────────
        .route("/v1/actives", get(actives))
        .route("/v1/gainers", get(gainers))
        .route("/v1/losers", get(losers))
        // ── Indicators ──────────────────────────────────────────────
        .route("/v1/indicators/macd", get(macd))
        .route("/v1/indicators/adx", get(adx))
        .route("/v1/indicators/aroon", get(aroon))
        .route("/v1/indicators/bbands", get(bbands))
        .route("/v1/indicators/obv", get(obv))
        .route("/v1/indicators/super-trend", get(super_trend))
        .route("/v1/indicators/ichimoku", get(ichimoku))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit::enforce));

    Router::new()
        .route("/health", get(health))
        .merge(v1)
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Error mapping
// =============================================================================

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::DataUnavailable { .. } => StatusCode::NOT_FOUND,
            ServiceError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ServiceError::UpstreamScrapeFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::QuoteFetchFailure(_) => StatusCode::BAD_GATEWAY,
        };
        if status.is_server_error() {
            warn!(error = %self, status = status.as_u16(), "request failed");
        } else {
            debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Health (public)
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Movers
// =============================================================================

async fn actives(State(state): State<Arc<AppState>>) -> Result<Json<Vec<MarketMover>>, ServiceError> {
    Ok(Json(state.movers.actives().await?))
}

async fn gainers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<MarketMover>>, ServiceError> {
    Ok(Json(state.movers.gainers().await?))
}

async fn losers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<MarketMover>>, ServiceError> {
    Ok(Json(state.movers.losers().await?))
}

// =============================================================================
// Indicators
// =============================================================================

/// The `symbol` query parameter. Indicator parameters are read from the same
/// query string by a second extractor.
#[derive(Deserialize)]
struct SymbolQuery {
    symbol: String,
}

type AnalysisResponse = Result<Json<Analysis>, ServiceError>;

async fn macd(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SymbolQuery>,
    Query(params): Query<MacdParams>,
) -> AnalysisResponse {
    Ok(Json(state.engine.get_macd(&q.symbol, params).await?))
}

async fn adx(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SymbolQuery>,
    Query(params): Query<AdxParams>,
) -> AnalysisResponse {
    Ok(Json(state.engine.get_adx(&q.symbol, params).await?))
}

async fn aroon(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SymbolQuery>,
    Query(params): Query<AroonParams>,
) -> AnalysisResponse {
    Ok(Json(state.engine.get_aroon(&q.symbol, params).await?))
}

async fn bbands(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SymbolQuery>,
    Query(params): Query<BollingerParams>,
) -> AnalysisResponse {
    Ok(Json(state.engine.get_bbands(&q.symbol, params).await?))
}

async fn obv(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SymbolQuery>,
    Query(params): Query<ObvParams>,
) -> AnalysisResponse {
    Ok(Json(state.engine.get_obv(&q.symbol, params).await?))
}

async fn super_trend(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SymbolQuery>,
    Query(params): Query<SuperTrendParams>,
) -> AnalysisResponse {
    Ok(Json(state.engine.get_super_trend(&q.symbol, params).await?))
}

async fn ichimoku(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SymbolQuery>,
    Query(params): Query<IchimokuParams>,
) -> AnalysisResponse {
    Ok(Json(state.engine.get_ichimoku(&q.symbol, params).await?))
}

// =============================================================================
// Tests
// =============================================================================
