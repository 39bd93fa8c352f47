use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::exercise::{
        CreateExerciseCategoryRequest, ExerciseCategory, UpdateExerciseCategoryRequest,
    },
    services::exercises::ExerciseCategoryService,
    AppState,
};

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().chars().count() < 2 {
        return Err(ApiError::Validation(
            "name must be at least 2 characters".into(),
        ));
    }
    Ok(())
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExerciseCategory>>, ApiError> {
    let categories = ExerciseCategoryService::list(&state.db).await?;
    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ExerciseCategory>, ApiError> {
    let category = ExerciseCategoryService::get(&state.db, id).await?;
    Ok(Json(category))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CreateExerciseCategoryRequest>,
) -> Result<(StatusCode, Json<ExerciseCategory>), ApiError> {
    validate_name(&body.name)?;
    let category = ExerciseCategoryService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateExerciseCategoryRequest>,
) -> Result<Json<ExerciseCategory>, ApiError> {
    if let Some(name) = &body.name {
        validate_name(name)?;
    }
    let category = ExerciseCategoryService::update(&state.db, id, &body).await?;
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    ExerciseCategoryService::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Exercise category deleted" })))
}
