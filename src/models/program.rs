use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Program {
    pub id: i64,
    pub customer_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub goal: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgramExercise {
    pub id: i64,
    pub program_id: i64,
    pub exercise_id: i64,
    pub weekday: Option<Weekday>,
    pub sets: Option<i64>,
    pub reps: Option<String>,
    pub notes: Option<String>,
}

/// Program-exercise row joined with the exercise display fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgramExerciseRow {
    pub id: i64,
    pub program_id: i64,
    pub exercise_id: i64,
    pub weekday: Option<Weekday>,
    pub sets: Option<i64>,
    pub reps: Option<String>,
    pub notes: Option<String>,
    pub exercise_name: String,
    pub category_name: Option<String>,
}

/// Weekday breakdown of one program's exercise slots.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgramExerciseStats {
    pub total_exercises: i64,
    pub monday_exercises: i64,
    pub tuesday_exercises: i64,
    pub wednesday_exercises: i64,
    pub thursday_exercises: i64,
    pub friday_exercises: i64,
    pub saturday_exercises: i64,
    pub sunday_exercises: i64,
    pub average_sets: Option<f64>,
    pub total_sets: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProgramRequest {
    pub customer_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProgramRequest {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub goal: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProgramExerciseRequest {
    pub program_id: i64,
    pub exercise_id: i64,
    pub weekday: Option<Weekday>,
    pub sets: Option<i64>,
    pub reps: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProgramExerciseRequest {
    pub weekday: Option<Weekday>,
    pub sets: Option<i64>,
    pub reps: Option<String>,
    pub notes: Option<String>,
}
