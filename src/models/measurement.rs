use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Measurement {
    pub id: i64,
    pub customer_id: i64,
    pub measured_on: NaiveDate,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub arm_cm: Option<f64>,
    pub neck_cm: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub muscle_pct: Option<f64>,
    pub notes: Option<String>,
    pub recorded_at: NaiveDateTime,
}

/// List row joined with the customer's name for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MeasurementRow {
    pub id: i64,
    pub customer_id: i64,
    pub measured_on: NaiveDate,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub arm_cm: Option<f64>,
    pub neck_cm: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub muscle_pct: Option<f64>,
    pub notes: Option<String>,
    pub recorded_at: NaiveDateTime,
    pub customer_first_name: String,
    pub customer_last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MeasurementStats {
    pub measurement_count: i64,
    pub first_measured_on: Option<NaiveDate>,
    pub last_measured_on: Option<NaiveDate>,
    pub min_weight_kg: Option<f64>,
    pub max_weight_kg: Option<f64>,
    pub avg_weight_kg: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMeasurementRequest {
    pub customer_id: i64,
    pub measured_on: NaiveDate,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub arm_cm: Option<f64>,
    pub neck_cm: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub muscle_pct: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMeasurementRequest {
    pub measured_on: Option<NaiveDate>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub arm_cm: Option<f64>,
    pub neck_cm: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub muscle_pct: Option<f64>,
    pub notes: Option<String>,
}
