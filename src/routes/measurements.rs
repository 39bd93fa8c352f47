use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::measurement::{
        CreateMeasurementRequest, Measurement, MeasurementRow, MeasurementStats,
        UpdateMeasurementRequest,
    },
    services::{body::BodyComposition, measurements::MeasurementService},
    AppState,
};

fn validate_metric(name: &str, value: Option<f64>) -> Result<(), ApiError> {
    if let Some(v) = value {
        if !(v > 0.0) {
            return Err(ApiError::Validation(format!(
                "{name} must be greater than zero"
            )));
        }
    }
    Ok(())
}

fn validate_metrics(
    height_cm: Option<f64>,
    weight_kg: Option<f64>,
    waist_cm: Option<f64>,
    hip_cm: Option<f64>,
    arm_cm: Option<f64>,
    neck_cm: Option<f64>,
) -> Result<(), ApiError> {
    validate_metric("height_cm", height_cm)?;
    validate_metric("weight_kg", weight_kg)?;
    validate_metric("waist_cm", waist_cm)?;
    validate_metric("hip_cm", hip_cm)?;
    validate_metric("arm_cm", arm_cm)?;
    validate_metric("neck_cm", neck_cm)?;
    Ok(())
}

pub async fn list_measurements(
    State(state): State<AppState>,
) -> Result<Json<Vec<MeasurementRow>>, ApiError> {
    let measurements = MeasurementService::list(&state.db).await?;
    Ok(Json(measurements))
}

pub async fn list_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<Json<Vec<Measurement>>, ApiError> {
    let measurements = MeasurementService::by_customer(&state.db, customer_id).await?;
    Ok(Json(measurements))
}

pub async fn latest_for_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<Json<Measurement>, ApiError> {
    let measurement = MeasurementService::latest(&state.db, customer_id).await?;
    Ok(Json(measurement))
}

pub async fn stats_for_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<Json<MeasurementStats>, ApiError> {
    let stats = MeasurementService::stats(&state.db, customer_id).await?;
    Ok(Json(stats))
}

pub async fn get_measurement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Measurement>, ApiError> {
    let measurement = MeasurementService::get(&state.db, id).await?;
    Ok(Json(measurement))
}

pub async fn body_composition(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BodyComposition>, ApiError> {
    let report = MeasurementService::body_composition(&state.db, id).await?;
    Ok(Json(report))
}

pub async fn create_measurement(
    State(state): State<AppState>,
    Json(body): Json<CreateMeasurementRequest>,
) -> Result<(StatusCode, Json<Measurement>), ApiError> {
    validate_metrics(
        body.height_cm,
        body.weight_kg,
        body.waist_cm,
        body.hip_cm,
        body.arm_cm,
        body.neck_cm,
    )?;
    let measurement = MeasurementService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(measurement)))
}

pub async fn update_measurement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateMeasurementRequest>,
) -> Result<Json<Measurement>, ApiError> {
    validate_metrics(
        body.height_cm,
        body.weight_kg,
        body.waist_cm,
        body.hip_cm,
        body.arm_cm,
        body.neck_cm,
    )?;
    let measurement = MeasurementService::update(&state.db, id, &body).await?;
    Ok(Json(measurement))
}

pub async fn delete_measurement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    MeasurementService::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Measurement deleted" })))
}
