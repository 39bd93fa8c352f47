use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Difficulty {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(anyhow::anyhow!("Unknown difficulty: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExerciseCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub target_muscles: Option<String>,
    pub difficulty: Option<Difficulty>,
}

/// List row joined with the category name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExerciseRow {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub target_muscles: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub category_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExerciseCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExerciseCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExerciseRequest {
    pub name: String,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub target_muscles: Option<String>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExerciseRequest {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub target_muscles: Option<String>,
    pub difficulty: Option<Difficulty>,
}
