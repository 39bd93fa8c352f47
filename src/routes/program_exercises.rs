use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::program::{
        CreateProgramExerciseRequest, ProgramExercise, ProgramExerciseRow, ProgramExerciseStats,
        UpdateProgramExerciseRequest, Weekday,
    },
    services::programs::ProgramExerciseService,
    AppState,
};

fn validate_sets(sets: Option<i64>) -> Result<(), ApiError> {
    if let Some(sets) = sets {
        if sets < 1 {
            return Err(ApiError::Validation("sets must be at least 1".into()));
        }
    }
    Ok(())
}

pub async fn list_for_program(
    State(state): State<AppState>,
    Path(program_id): Path<i64>,
) -> Result<Json<Vec<ProgramExerciseRow>>, ApiError> {
    let slots = ProgramExerciseService::by_program(&state.db, program_id).await?;
    Ok(Json(slots))
}

pub async fn list_for_program_day(
    State(state): State<AppState>,
    Path((program_id, weekday)): Path<(i64, Weekday)>,
) -> Result<Json<Vec<ProgramExerciseRow>>, ApiError> {
    let slots = ProgramExerciseService::by_program_day(&state.db, program_id, weekday).await?;
    Ok(Json(slots))
}

pub async fn stats_for_program(
    State(state): State<AppState>,
    Path(program_id): Path<i64>,
) -> Result<Json<ProgramExerciseStats>, ApiError> {
    let stats = ProgramExerciseService::stats(&state.db, program_id).await?;
    Ok(Json(stats))
}

pub async fn get_program_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProgramExercise>, ApiError> {
    let slot = ProgramExerciseService::get(&state.db, id).await?;
    Ok(Json(slot))
}

pub async fn create_program_exercise(
    State(state): State<AppState>,
    Json(body): Json<CreateProgramExerciseRequest>,
) -> Result<(StatusCode, Json<ProgramExercise>), ApiError> {
    validate_sets(body.sets)?;
    let slot = ProgramExerciseService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// Whole-plan assignment: several slots in one request.
pub async fn create_program_exercises_batch(
    State(state): State<AppState>,
    Json(body): Json<Vec<CreateProgramExerciseRequest>>,
) -> Result<(StatusCode, Json<Vec<ProgramExercise>>), ApiError> {
    if body.is_empty() {
        return Err(ApiError::Validation(
            "batch must contain at least one entry".into(),
        ));
    }
    for req in &body {
        validate_sets(req.sets)?;
    }
    let slots = ProgramExerciseService::create_batch(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(slots)))
}

pub async fn update_program_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProgramExerciseRequest>,
) -> Result<Json<ProgramExercise>, ApiError> {
    validate_sets(body.sets)?;
    let slot = ProgramExerciseService::update(&state.db, id, &body).await?;
    Ok(Json(slot))
}

pub async fn delete_program_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    ProgramExerciseService::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Program exercise deleted" })))
}

pub async fn delete_for_program(
    State(state): State<AppState>,
    Path(program_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let removed = ProgramExerciseService::delete_for_program(&state.db, program_id).await?;
    Ok(Json(json!({ "message": "Program exercises deleted", "removed": removed })))
}
