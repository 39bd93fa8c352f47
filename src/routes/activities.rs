use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::activity::{Activity, ActivityRow, CreateActivityRequest, UpdateActivityRequest},
    services::{activities::ActivityService, metrics::CHECKINS_COUNTER},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

pub async fn list_recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<ActivityRow>>, ApiError> {
    let limit = query.limit.unwrap_or(20);
    if !(1..=200).contains(&limit) {
        return Err(ApiError::Validation(
            "limit must be between 1 and 200".into(),
        ));
    }
    let activities = ActivityService::recent(&state.db, limit).await?;
    Ok(Json(activities))
}

pub async fn list_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<Json<Vec<ActivityRow>>, ApiError> {
    let activities = ActivityService::by_customer(&state.db, customer_id).await?;
    Ok(Json(activities))
}

/// Check-in. Defaults to a workout starting now.
pub async fn create_activity(
    State(state): State<AppState>,
    Json(body): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<Activity>), ApiError> {
    let now = Local::now().naive_local();
    let activity = ActivityService::create(&state.db, &body, now).await?;
    CHECKINS_COUNTER.inc();
    Ok((StatusCode::CREATED, Json(activity)))
}

pub async fn update_activity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateActivityRequest>,
) -> Result<Json<Activity>, ApiError> {
    let activity = ActivityService::update(&state.db, id, &body).await?;
    Ok(Json(activity))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    ActivityService::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Activity deleted" })))
}
