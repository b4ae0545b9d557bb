//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::domain::{ClockTime, TrainId};
use crate::provider::ProviderError;
use crate::schedule::ScheduleError;

use super::dto::*;
use super::state::AppState;

/// Default projection window half-width in minutes.
const DEFAULT_WINDOW_MINS: u16 = 120;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/active", get(active_count))
        .route("/api/today", get(today))
        .route("/api/trains", get(trains))
        .route("/api/weather", get(weather))
        .route("/api/refresh", post(refresh_all))
        .route("/api/trains/:id/refresh", post(refresh_one))
        .with_state(state)
}

/// Health check, including schedule-source reachability.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, schedule) = match state.schedule.check() {
        Ok(()) => ("ok", "ok".to_string()),
        Err(e) => ("degraded", e.to_string()),
    };
    Json(HealthResponse { status, schedule })
}

/// Count of trains in today's working set.
async fn active_count(State(state): State<AppState>) -> Json<ActiveResponse> {
    Json(ActiveResponse {
        count: state.board.active_count().await,
    })
}

/// Today's day tag and raw working records.
async fn today(State(state): State<AppState>) -> Json<TodayResponse> {
    let day = state.board.day().await;
    let rows = state
        .board
        .records()
        .await
        .iter()
        .map(WorkingRecordDto::from_record)
        .collect();
    Json(TodayResponse {
        day: day.to_string(),
        rows,
    })
}

/// Time-windowed, status-annotated train listing.
async fn trains(
    State(state): State<AppState>,
    Query(query): Query<TrainsQuery>,
) -> Json<TrainsResponse> {
    let window = query.window.unwrap_or(DEFAULT_WINDOW_MINS).min(1440);
    let projected = state.board.project(ClockTime::now(), window).await;
    Json(TrainsResponse {
        trains: projected.iter().map(ProjectedTrainDto::from_projected).collect(),
    })
}

/// Cached weather for the station.
async fn weather(State(state): State<AppState>) -> Result<Json<WeatherResponse>, AppError> {
    let view = state.weather.current().await?;
    Ok(Json(WeatherResponse::from_view(&view)))
}

/// On-demand refresh of all near-term trains.
///
/// Shares the scheduler's in-flight guard: if a cycle is already
/// running, this reports `refreshed: false` instead of piling on.
async fn refresh_all(State(state): State<AppState>) -> Json<RefreshResponse> {
    let outcome = state.refresher.try_cycle().await;
    Json(RefreshResponse::from_outcome(outcome))
}

/// On-demand refresh of a single train by identifier.
async fn refresh_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrainRefreshResponse>, AppError> {
    let train_id = TrainId::parse(&id).map_err(|e| AppError::BadRequest {
        message: format!("invalid train identifier {id:?}: {e}"),
    })?;

    let record = state
        .board
        .find(&train_id)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("train {train_id} is not in today's working set"),
        })?;

    let result = state
        .realtime
        .fetch_one(&train_id, &record.schedule.name)
        .await;
    let applied = state
        .board
        .apply_enrichment(std::iter::once(result.as_ref()))
        .await;

    let observation = result.observed();
    Ok(Json(TrainRefreshResponse {
        id: train_id.to_string(),
        updated: applied > 0,
        real_arrival: observation
            .and_then(|o| o.real_arrival)
            .map(|t| t.to_string()),
        delay: observation.and_then(|o| o.delay.clone()),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        tracing::error!(status = %status, message = %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
