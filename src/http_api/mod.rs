use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{CareEvent, Plan, RuleMode, Season, SeasonSummary, WeekBucket};

type SeasonKey = (NaiveDate, NaiveDate, RuleMode);

/// Shared plan plus a cache of built seasons. Seasons are pure functions of
/// `(start, end, mode)` and the plan tables, so cached entries never go stale.
#[derive(Clone)]
pub struct AppState {
    plan: Arc<Plan>,
    seasons: Arc<RwLock<HashMap<SeasonKey, Arc<Season>>>>,
}

impl AppState {
    pub fn new(plan: Plan) -> Self {
        Self {
            plan: Arc::new(plan),
            seasons: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    fn season(&self, mode: RuleMode) -> Arc<Season> {
        let key = (self.plan.season.start, self.plan.season.end, mode);
        if let Some(season) = self.seasons.read().get(&key) {
            return season.clone();
        }
        let mut guard = self.seasons.write();
        guard
            .entry(key)
            .or_insert_with(|| Arc::new(self.plan.build_mode(mode)))
            .clone()
    }

    pub fn cached_seasons(&self) -> usize {
        self.seasons.read().len()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ModeQuery {
    mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NextQuery {
    mode: Option<String>,
    at: Option<String>,
}

fn resolve_mode(state: &AppState, raw: Option<&str>) -> Result<RuleMode, ApiError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => raw.parse().map_err(ApiError::invalid),
        _ => Ok(state.plan().season.mode),
    }
}

/// `YYYY-MM-DDTHH:MM[:SS]` or a bare date (midnight).
pub fn parse_reference(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/season", get(get_season))
        .route("/season/summary", get(get_summary))
        .route("/season/weeks/:index", get(get_week))
        .route("/next-fertilization", get(next_fertilization))
        .route("/phases", get(list_phases))
        .route("/plants", get(list_plants))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, plan: Plan) -> std::io::Result<()> {
    let state = AppState::new(plan);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_season(
    State(state): State<AppState>,
    Query(query): Query<ModeQuery>,
) -> Result<Json<Season>, ApiError> {
    let mode = resolve_mode(&state, query.mode.as_deref())?;
    let season = state.season(mode);
    Ok(Json(season.as_ref().clone()))
}

async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<ModeQuery>,
) -> Result<Json<SeasonSummary>, ApiError> {
    let mode = resolve_mode(&state, query.mode.as_deref())?;
    Ok(Json(state.season(mode).summary()))
}

async fn get_week(
    State(state): State<AppState>,
    Path(index): Path<u32>,
    Query(query): Query<ModeQuery>,
) -> Result<Json<WeekBucket>, ApiError> {
    let mode = resolve_mode(&state, query.mode.as_deref())?;
    let season = state.season(mode);
    // Zero-based, the same as `WeekBucket::index` in the body.
    season
        .week(index)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("week {index} is outside the season")))
}

async fn next_fertilization(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
) -> Result<Json<Option<CareEvent>>, ApiError> {
    let mode = resolve_mode(&state, query.mode.as_deref())?;
    let reference = match query.at.as_deref() {
        Some(raw) => parse_reference(raw)
            .ok_or_else(|| ApiError::invalid(format!("invalid reference instant '{raw}'")))?,
        None => chrono::Local::now().naive_local(),
    };
    let season = state.season(mode);
    Ok(Json(season.find_next_fertilization(reference).cloned()))
}

async fn list_phases(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.plan().phases.clone())
}

async fn list_plants(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.plan().varieties.clone())
}
