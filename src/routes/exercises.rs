use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::exercise::{
        CreateExerciseRequest, Difficulty, Exercise, ExerciseRow, UpdateExerciseRequest,
    },
    services::exercises::ExerciseService,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().chars().count() < 2 {
        return Err(ApiError::Validation(
            "name must be at least 2 characters".into(),
        ));
    }
    Ok(())
}

pub async fn list_exercises(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExerciseRow>>, ApiError> {
    let exercises = ExerciseService::list(&state.db).await?;
    Ok(Json(exercises))
}

pub async fn search_exercises(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ExerciseRow>>, ApiError> {
    let term = query.q.trim();
    if term.chars().count() < 2 {
        return Err(ApiError::Validation(
            "search term must be at least 2 characters".into(),
        ));
    }
    let exercises = ExerciseService::search(&state.db, term).await?;
    Ok(Json(exercises))
}

pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Json<Vec<ExerciseRow>>, ApiError> {
    let exercises = ExerciseService::by_category(&state.db, category_id).await?;
    Ok(Json(exercises))
}

pub async fn list_by_difficulty(
    State(state): State<AppState>,
    Path(difficulty): Path<Difficulty>,
) -> Result<Json<Vec<ExerciseRow>>, ApiError> {
    let exercises = ExerciseService::by_difficulty(&state.db, difficulty).await?;
    Ok(Json(exercises))
}

pub async fn get_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ExerciseRow>, ApiError> {
    let exercise = ExerciseService::get(&state.db, id).await?;
    Ok(Json(exercise))
}

pub async fn create_exercise(
    State(state): State<AppState>,
    Json(body): Json<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<Exercise>), ApiError> {
    validate_name(&body.name)?;
    let exercise = ExerciseService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

pub async fn update_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateExerciseRequest>,
) -> Result<Json<Exercise>, ApiError> {
    if let Some(name) = &body.name {
        validate_name(name)?;
    }
    let exercise = ExerciseService::update(&state.db, id, &body).await?;
    Ok(Json(exercise))
}

pub async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    ExerciseService::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Exercise deleted" })))
}
