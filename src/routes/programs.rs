use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::program::{CreateProgramRequest, Program, UpdateProgramRequest},
    services::programs::ProgramService,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SetProgramStatusRequest {
    pub is_active: bool,
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().chars().count() < 3 {
        return Err(ApiError::Validation(
            "name must be at least 3 characters".into(),
        ));
    }
    Ok(())
}

pub async fn list_programs(State(state): State<AppState>) -> Result<Json<Vec<Program>>, ApiError> {
    let programs = ProgramService::list(&state.db).await?;
    Ok(Json(programs))
}

pub async fn list_active(State(state): State<AppState>) -> Result<Json<Vec<Program>>, ApiError> {
    let programs = ProgramService::list_active(&state.db, true).await?;
    Ok(Json(programs))
}

pub async fn list_inactive(State(state): State<AppState>) -> Result<Json<Vec<Program>>, ApiError> {
    let programs = ProgramService::list_active(&state.db, false).await?;
    Ok(Json(programs))
}

pub async fn list_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<Json<Vec<Program>>, ApiError> {
    let programs = ProgramService::by_customer(&state.db, customer_id).await?;
    Ok(Json(programs))
}

pub async fn get_program(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Program>, ApiError> {
    let program = ProgramService::get(&state.db, id).await?;
    Ok(Json(program))
}

pub async fn create_program(
    State(state): State<AppState>,
    Json(body): Json<CreateProgramRequest>,
) -> Result<(StatusCode, Json<Program>), ApiError> {
    validate_name(&body.name)?;
    if let Some(end) = body.end_date {
        if end < body.start_date {
            return Err(ApiError::Validation(
                "end_date must not be before start_date".into(),
            ));
        }
    }
    let program = ProgramService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(program)))
}

pub async fn update_program(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProgramRequest>,
) -> Result<Json<Program>, ApiError> {
    if let Some(name) = &body.name {
        validate_name(name)?;
    }
    if let (Some(start), Some(end)) = (body.start_date, body.end_date) {
        if end < start {
            return Err(ApiError::Validation(
                "end_date must not be before start_date".into(),
            ));
        }
    }
    let program = ProgramService::update(&state.db, id, &body).await?;
    Ok(Json(program))
}

pub async fn set_program_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<SetProgramStatusRequest>,
) -> Result<Json<Program>, ApiError> {
    let program = ProgramService::set_status(&state.db, id, body.is_active).await?;
    Ok(Json(program))
}

pub async fn delete_program(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    ProgramService::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Program deleted" })))
}
