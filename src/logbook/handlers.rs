use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{EntryCreated, EntryDeleted, NewEntryRequest};
use super::model::DailyLog;
use super::services;
use crate::error::AppError;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/logs/days", get(list_days))
        .route("/logs/days/:date", get(get_day))
        .route("/logs/today", get(get_today))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/logs/entries", post(create_entry))
        .route("/logs/entries/:data_id", delete(delete_entry))
}

#[instrument(skip(state))]
async fn create_entry(
    State(state): State<AppState>,
    Json(body): Json<NewEntryRequest>,
) -> Result<(StatusCode, Json<EntryCreated>), AppError> {
    let created = services::create_entry(&state, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Option<DailyLog>>, AppError> {
    Ok(Json(services::get_day(&state, &date).await?))
}

#[instrument(skip(state))]
async fn get_today(State(state): State<AppState>) -> Result<Json<Option<DailyLog>>, AppError> {
    Ok(Json(services::get_today(&state).await?))
}

#[instrument(skip(state))]
async fn list_days(State(state): State<AppState>) -> Result<Json<Vec<DailyLog>>, AppError> {
    Ok(Json(services::get_all_days(&state).await?))
}

#[instrument(skip(state))]
async fn delete_entry(
    State(state): State<AppState>,
    Path(data_id): Path<String>,
) -> Result<Json<EntryDeleted>, AppError> {
    Ok(Json(services::delete_entry(&state, &data_id).await?))
}
