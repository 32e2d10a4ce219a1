use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::PronoView;
use crate::services::pronos::{
    self, CreatePronoRequest, DayListing, HistoryListing, UpcomingListing,
};
use crate::services::{settle_prono, ResultReport};
use crate::AppState;

use super::ApiResponse;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteRequest {
    pub id: i64,
}

#[derive(Serialize)]
pub struct Created {
    pub created_at: DateTime<Utc>,
    pub prono: PronoView,
}

#[derive(Serialize)]
pub struct Updated {
    pub updated_at: DateTime<Utc>,
    pub prono: PronoView,
}

#[derive(Serialize)]
pub struct Deleted {
    pub deleted_at: DateTime<Utc>,
    pub prono: PronoView,
}

/// Malformed JSON bodies are a client error, not an unprocessable entity.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/pronos/today — pronos kicking off today (UTC)
pub async fn today(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DayListing>>, AppError> {
    let listing = pronos::list_for_date(state.store.as_ref(), None, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// GET /api/pronos/by-date?date=YYYY-MM-DD
pub async fn by_date(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<ApiResponse<DayListing>>, AppError> {
    let listing =
        pronos::list_for_date(state.store.as_ref(), query.date.as_deref(), Utc::now()).await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// GET /api/pronos/history?from=YYYY-MM-DD&to=YYYY-MM-DD — range plus summary
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ApiResponse<HistoryListing>>, AppError> {
    let listing = pronos::list_history(
        state.store.as_ref(),
        query.from.as_deref(),
        query.to.as_deref(),
        state.config.history_default_days,
        Utc::now(),
    )
    .await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// GET /api/pronos/upcoming — next pronos from now on
pub async fn upcoming(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UpcomingListing>>, AppError> {
    let listing =
        pronos::list_upcoming(state.store.as_ref(), state.config.upcoming_limit, Utc::now())
            .await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// GET /api/pronos/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PronoView>>, AppError> {
    let prono = pronos::get_prono(state.store.as_ref(), id, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(prono)))
}

/// POST /api/pronos — create a prono
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreatePronoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Created>>), AppError> {
    let request = json_body(body)?;
    let now = Utc::now();
    let prono = pronos::create_prono(state.store.as_ref(), request, now).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(Created {
            created_at: now,
            prono,
        })),
    ))
}

/// POST|PATCH /api/pronos/update — report a result and/or status
pub async fn update(
    State(state): State<AppState>,
    body: Result<Json<ResultReport>, JsonRejection>,
) -> Result<Json<ApiResponse<Updated>>, AppError> {
    let report = json_body(body)?;
    let now = Utc::now();
    let prono = settle_prono(state.store.as_ref(), &report, now).await?;

    Ok(Json(ApiResponse::ok(Updated {
        updated_at: now,
        prono,
    })))
}

/// POST|DELETE /api/pronos/delete
pub async fn delete(
    State(state): State<AppState>,
    body: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Deleted>>, AppError> {
    let request = json_body(body)?;
    let now = Utc::now();
    let prono = pronos::delete_prono(state.store.as_ref(), request.id, now).await?;

    Ok(Json(ApiResponse::ok(Deleted {
        deleted_at: now,
        prono,
    })))
}
