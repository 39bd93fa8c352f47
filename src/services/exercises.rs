use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::exercise::{
    CreateExerciseCategoryRequest, CreateExerciseRequest, Difficulty, Exercise,
    ExerciseCategory, ExerciseRow, UpdateExerciseCategoryRequest, UpdateExerciseRequest,
};

pub struct ExerciseCategoryService;

impl ExerciseCategoryService {
    pub async fn list(pool: &SqlitePool) -> Result<Vec<ExerciseCategory>, ApiError> {
        let categories = sqlx::query_as::<_, ExerciseCategory>(
            "SELECT * FROM exercise_categories ORDER BY name ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(categories)
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<ExerciseCategory, ApiError> {
        let category = sqlx::query_as::<_, ExerciseCategory>(
            "SELECT * FROM exercise_categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        category.ok_or(ApiError::NotFound("exercise category"))
    }

    pub async fn create(
        pool: &SqlitePool,
        req: &CreateExerciseCategoryRequest,
    ) -> Result<ExerciseCategory, ApiError> {
        let category = sqlx::query_as::<_, ExerciseCategory>(
            "INSERT INTO exercise_categories (name, description)
             VALUES (?, ?)
             RETURNING *",
        )
        .bind(&req.name)
        .bind(&req.description)
        .fetch_one(pool)
        .await?;
        Ok(category)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        req: &UpdateExerciseCategoryRequest,
    ) -> Result<ExerciseCategory, ApiError> {
        let category = sqlx::query_as::<_, ExerciseCategory>(
            "UPDATE exercise_categories
             SET name        = COALESCE(?, name),
                 description = COALESCE(?, description)
             WHERE id = ?
             RETURNING *",
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        category.ok_or(ApiError::NotFound("exercise category"))
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM exercise_categories WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("exercise category"));
        }
        Ok(())
    }
}

pub struct ExerciseService;

impl ExerciseService {
    pub async fn list(pool: &SqlitePool) -> Result<Vec<ExerciseRow>, ApiError> {
        let exercises = sqlx::query_as::<_, ExerciseRow>(
            "SELECT e.*, g.name AS category_name
             FROM exercises e
             LEFT JOIN exercise_categories g ON g.id = e.category_id
             ORDER BY e.name ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(exercises)
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<ExerciseRow, ApiError> {
        let exercise = sqlx::query_as::<_, ExerciseRow>(
            "SELECT e.*, g.name AS category_name
             FROM exercises e
             LEFT JOIN exercise_categories g ON g.id = e.category_id
             WHERE e.id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        exercise.ok_or(ApiError::NotFound("exercise"))
    }

    pub async fn by_category(
        pool: &SqlitePool,
        category_id: i64,
    ) -> Result<Vec<ExerciseRow>, ApiError> {
        let exercises = sqlx::query_as::<_, ExerciseRow>(
            "SELECT e.*, g.name AS category_name
             FROM exercises e
             LEFT JOIN exercise_categories g ON g.id = e.category_id
             WHERE e.category_id = ?
             ORDER BY e.name ASC",
        )
        .bind(category_id)
        .fetch_all(pool)
        .await?;
        Ok(exercises)
    }

    pub async fn by_difficulty(
        pool: &SqlitePool,
        difficulty: Difficulty,
    ) -> Result<Vec<ExerciseRow>, ApiError> {
        let exercises = sqlx::query_as::<_, ExerciseRow>(
            "SELECT e.*, g.name AS category_name
             FROM exercises e
             LEFT JOIN exercise_categories g ON g.id = e.category_id
             WHERE e.difficulty = ?
             ORDER BY e.name ASC",
        )
        .bind(difficulty)
        .fetch_all(pool)
        .await?;
        Ok(exercises)
    }

    pub async fn search(pool: &SqlitePool, query: &str) -> Result<Vec<ExerciseRow>, ApiError> {
        let pattern = format!("%{query}%");
        let exercises = sqlx::query_as::<_, ExerciseRow>(
            "SELECT e.*, g.name AS category_name
             FROM exercises e
             LEFT JOIN exercise_categories g ON g.id = e.category_id
             WHERE e.name LIKE ? OR e.target_muscles LIKE ?
             ORDER BY e.name ASC",
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(pool)
        .await?;
        Ok(exercises)
    }

    pub async fn create(
        pool: &SqlitePool,
        req: &CreateExerciseRequest,
    ) -> Result<Exercise, ApiError> {
        let exercise = sqlx::query_as::<_, Exercise>(
            "INSERT INTO exercises (name, category_id, description, target_muscles, difficulty)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&req.name)
        .bind(req.category_id)
        .bind(&req.description)
        .bind(&req.target_muscles)
        .bind(req.difficulty)
        .fetch_one(pool)
        .await?;
        Ok(exercise)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        req: &UpdateExerciseRequest,
    ) -> Result<Exercise, ApiError> {
        let exercise = sqlx::query_as::<_, Exercise>(
            "UPDATE exercises
             SET name           = COALESCE(?, name),
                 category_id    = COALESCE(?, category_id),
                 description    = COALESCE(?, description),
                 target_muscles = COALESCE(?, target_muscles),
                 difficulty     = COALESCE(?, difficulty)
             WHERE id = ?
             RETURNING *",
        )
        .bind(&req.name)
        .bind(req.category_id)
        .bind(&req.description)
        .bind(&req.target_muscles)
        .bind(req.difficulty)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        exercise.ok_or(ApiError::NotFound("exercise"))
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("exercise"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    async fn seed_catalog(pool: &SqlitePool) -> (i64, i64) {
        let chest = ExerciseCategoryService::create(
            pool,
            &CreateExerciseCategoryRequest {
                name: "Chest".into(),
                description: None,
            },
        )
        .await
        .unwrap();
        let legs = ExerciseCategoryService::create(
            pool,
            &CreateExerciseCategoryRequest {
                name: "Legs".into(),
                description: None,
            },
        )
        .await
        .unwrap();

        for (name, category, difficulty) in [
            ("Bench Press", chest.id, Difficulty::Intermediate),
            ("Push-up", chest.id, Difficulty::Beginner),
            ("Back Squat", legs.id, Difficulty::Intermediate),
        ] {
            ExerciseService::create(
                pool,
                &CreateExerciseRequest {
                    name: name.into(),
                    category_id: Some(category),
                    description: None,
                    target_muscles: None,
                    difficulty: Some(difficulty),
                },
            )
            .await
            .unwrap();
        }
        (chest.id, legs.id)
    }

    #[tokio::test]
    async fn category_and_difficulty_filters() {
        let pool = setup_test_db().await;
        let (chest, _legs) = seed_catalog(&pool).await;

        let chest_exercises = ExerciseService::by_category(&pool, chest).await.unwrap();
        assert_eq!(chest_exercises.len(), 2);
        assert!(chest_exercises
            .iter()
            .all(|e| e.category_name.as_deref() == Some("Chest")));

        let beginner = ExerciseService::by_difficulty(&pool, Difficulty::Beginner)
            .await
            .unwrap();
        assert_eq!(beginner.len(), 1);
        assert_eq!(beginner[0].name, "Push-up");
    }

    #[tokio::test]
    async fn search_matches_name_case_insensitively() {
        let pool = setup_test_db().await;
        seed_catalog(&pool).await;

        let found = ExerciseService::search(&pool, "squat").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Back Squat");
    }
}
