use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Workout,
    Cardio,
    Yoga,
    Pilates,
    Other,
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActivityType::Workout => "workout",
            ActivityType::Cardio => "cardio",
            ActivityType::Yoga => "yoga",
            ActivityType::Pilates => "pilates",
            ActivityType::Other => "other",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ActivityType {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workout" => Ok(ActivityType::Workout),
            "cardio" => Ok(ActivityType::Cardio),
            "yoga" => Ok(ActivityType::Yoga),
            "pilates" => Ok(ActivityType::Pilates),
            "other" => Ok(ActivityType::Other),
            _ => Err(anyhow::anyhow!("Unknown activity type: {s}")),
        }
    }
}

/// A gym check-in. `ended_at` and the duration stay null until check-out.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: i64,
    pub customer_id: i64,
    pub activity_type: ActivityType,
    pub started_at: NaiveDateTime,
    pub ended_at: Option<NaiveDateTime>,
    pub duration_minutes: Option<i64>,
    pub calories_burned: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityRow {
    pub id: i64,
    pub customer_id: i64,
    pub activity_type: ActivityType,
    pub started_at: NaiveDateTime,
    pub ended_at: Option<NaiveDateTime>,
    pub duration_minutes: Option<i64>,
    pub calories_burned: Option<i64>,
    pub notes: Option<String>,
    pub customer_first_name: String,
    pub customer_last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    pub customer_id: i64,
    pub activity_type: Option<ActivityType>,
    pub started_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateActivityRequest {
    pub activity_type: Option<ActivityType>,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
    pub duration_minutes: Option<i64>,
    pub calories_burned: Option<i64>,
    pub notes: Option<String>,
}
