use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::program::{
    CreateProgramExerciseRequest, CreateProgramRequest, Program, ProgramExercise,
    ProgramExerciseRow, ProgramExerciseStats, UpdateProgramExerciseRequest, UpdateProgramRequest,
    Weekday,
};

pub struct ProgramService;

impl ProgramService {
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Program>, ApiError> {
        let programs = sqlx::query_as::<_, Program>(
            "SELECT * FROM programs ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(programs)
    }

    pub async fn list_active(pool: &SqlitePool, active: bool) -> Result<Vec<Program>, ApiError> {
        let programs = sqlx::query_as::<_, Program>(
            "SELECT * FROM programs WHERE is_active = ? ORDER BY created_at DESC",
        )
        .bind(active)
        .fetch_all(pool)
        .await?;
        Ok(programs)
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<Program, ApiError> {
        let program = sqlx::query_as::<_, Program>("SELECT * FROM programs WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        program.ok_or(ApiError::NotFound("program"))
    }

    pub async fn by_customer(
        pool: &SqlitePool,
        customer_id: i64,
    ) -> Result<Vec<Program>, ApiError> {
        let programs = sqlx::query_as::<_, Program>(
            "SELECT * FROM programs WHERE customer_id = ? ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
        Ok(programs)
    }

    pub async fn create(pool: &SqlitePool, req: &CreateProgramRequest) -> Result<Program, ApiError> {
        let program = sqlx::query_as::<_, Program>(
            "INSERT INTO programs (customer_id, name, start_date, end_date, goal)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(req.customer_id)
        .bind(&req.name)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(&req.goal)
        .fetch_one(pool)
        .await?;
        Ok(program)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        req: &UpdateProgramRequest,
    ) -> Result<Program, ApiError> {
        let program = sqlx::query_as::<_, Program>(
            "UPDATE programs
             SET name       = COALESCE(?, name),
                 start_date = COALESCE(?, start_date),
                 end_date   = COALESCE(?, end_date),
                 goal       = COALESCE(?, goal),
                 is_active  = COALESCE(?, is_active)
             WHERE id = ?
             RETURNING *",
        )
        .bind(&req.name)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(&req.goal)
        .bind(req.is_active)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        program.ok_or(ApiError::NotFound("program"))
    }

    pub async fn set_status(
        pool: &SqlitePool,
        id: i64,
        is_active: bool,
    ) -> Result<Program, ApiError> {
        let program = sqlx::query_as::<_, Program>(
            "UPDATE programs SET is_active = ? WHERE id = ? RETURNING *",
        )
        .bind(is_active)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        program.ok_or(ApiError::NotFound("program"))
    }

    /// Removes the program together with its exercise slots.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM program_exercises WHERE program_id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        let result = sqlx::query("DELETE FROM programs WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("program"));
        }
        Ok(())
    }
}

pub struct ProgramExerciseService;

impl ProgramExerciseService {
    pub async fn by_program(
        pool: &SqlitePool,
        program_id: i64,
    ) -> Result<Vec<ProgramExerciseRow>, ApiError> {
        let slots = sqlx::query_as::<_, ProgramExerciseRow>(
            "SELECT pe.*, e.name AS exercise_name, g.name AS category_name
             FROM program_exercises pe
             JOIN exercises e ON e.id = pe.exercise_id
             LEFT JOIN exercise_categories g ON g.id = e.category_id
             WHERE pe.program_id = ?
             ORDER BY pe.weekday ASC, pe.id ASC",
        )
        .bind(program_id)
        .fetch_all(pool)
        .await?;
        Ok(slots)
    }

    pub async fn by_program_day(
        pool: &SqlitePool,
        program_id: i64,
        weekday: Weekday,
    ) -> Result<Vec<ProgramExerciseRow>, ApiError> {
        let slots = sqlx::query_as::<_, ProgramExerciseRow>(
            "SELECT pe.*, e.name AS exercise_name, g.name AS category_name
             FROM program_exercises pe
             JOIN exercises e ON e.id = pe.exercise_id
             LEFT JOIN exercise_categories g ON g.id = e.category_id
             WHERE pe.program_id = ? AND pe.weekday = ?
             ORDER BY pe.id ASC",
        )
        .bind(program_id)
        .bind(weekday)
        .fetch_all(pool)
        .await?;
        Ok(slots)
    }

    /// Per-weekday slot counts and set totals for one program. Averages and
    /// sums come back null for a program with no slots.
    pub async fn stats(
        pool: &SqlitePool,
        program_id: i64,
    ) -> Result<ProgramExerciseStats, ApiError> {
        let stats = sqlx::query_as::<_, ProgramExerciseStats>(
            "SELECT COUNT(*) AS total_exercises,
                    COUNT(CASE WHEN weekday = 'monday' THEN 1 END) AS monday_exercises,
                    COUNT(CASE WHEN weekday = 'tuesday' THEN 1 END) AS tuesday_exercises,
                    COUNT(CASE WHEN weekday = 'wednesday' THEN 1 END) AS wednesday_exercises,
                    COUNT(CASE WHEN weekday = 'thursday' THEN 1 END) AS thursday_exercises,
                    COUNT(CASE WHEN weekday = 'friday' THEN 1 END) AS friday_exercises,
                    COUNT(CASE WHEN weekday = 'saturday' THEN 1 END) AS saturday_exercises,
                    COUNT(CASE WHEN weekday = 'sunday' THEN 1 END) AS sunday_exercises,
                    AVG(sets) AS average_sets,
                    SUM(sets) AS total_sets
             FROM program_exercises
             WHERE program_id = ?",
        )
        .bind(program_id)
        .fetch_one(pool)
        .await?;
        Ok(stats)
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<ProgramExercise, ApiError> {
        let slot = sqlx::query_as::<_, ProgramExercise>(
            "SELECT * FROM program_exercises WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        slot.ok_or(ApiError::NotFound("program exercise"))
    }

    pub async fn create(
        pool: &SqlitePool,
        req: &CreateProgramExerciseRequest,
    ) -> Result<ProgramExercise, ApiError> {
        let slot = sqlx::query_as::<_, ProgramExercise>(
            "INSERT INTO program_exercises (program_id, exercise_id, weekday, sets, reps, notes)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(req.program_id)
        .bind(req.exercise_id)
        .bind(req.weekday)
        .bind(req.sets)
        .bind(&req.reps)
        .bind(&req.notes)
        .fetch_one(pool)
        .await?;
        Ok(slot)
    }

    /// Insert a whole week of slots in one call.
    pub async fn create_batch(
        pool: &SqlitePool,
        reqs: &[CreateProgramExerciseRequest],
    ) -> Result<Vec<ProgramExercise>, ApiError> {
        let mut created = Vec::with_capacity(reqs.len());
        for req in reqs {
            created.push(Self::create(pool, req).await?);
        }
        Ok(created)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        req: &UpdateProgramExerciseRequest,
    ) -> Result<ProgramExercise, ApiError> {
        let slot = sqlx::query_as::<_, ProgramExercise>(
            "UPDATE program_exercises
             SET weekday = COALESCE(?, weekday),
                 sets    = COALESCE(?, sets),
                 reps    = COALESCE(?, reps),
                 notes   = COALESCE(?, notes)
             WHERE id = ?
             RETURNING *",
        )
        .bind(req.weekday)
        .bind(req.sets)
        .bind(&req.reps)
        .bind(&req.notes)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        slot.ok_or(ApiError::NotFound("program exercise"))
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM program_exercises WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("program exercise"));
        }
        Ok(())
    }

    pub async fn delete_for_program(pool: &SqlitePool, program_id: i64) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM program_exercises WHERE program_id = ?")
            .bind(program_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exercise::CreateExerciseRequest;
    use crate::services::exercises::ExerciseService;
    use crate::test_utils::{date, seed_customer, setup_test_db};

    #[tokio::test]
    async fn weekly_slots_group_by_day() {
        let pool = setup_test_db().await;
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;

        let program = ProgramService::create(
            &pool,
            &CreateProgramRequest {
                customer_id: customer,
                name: "Hypertrophy block".into(),
                start_date: date(2024, 6, 1),
                end_date: None,
                goal: Some("muscle gain".into()),
            },
        )
        .await
        .unwrap();

        let squat = ExerciseService::create(
            &pool,
            &CreateExerciseRequest {
                name: "Back Squat".into(),
                category_id: None,
                description: None,
                target_muscles: None,
                difficulty: None,
            },
        )
        .await
        .unwrap();

        for (weekday, sets) in [(Weekday::Monday, 5), (Weekday::Thursday, 3)] {
            ProgramExerciseService::create(
                &pool,
                &CreateProgramExerciseRequest {
                    program_id: program.id,
                    exercise_id: squat.id,
                    weekday: Some(weekday),
                    sets: Some(sets),
                    reps: Some("5".into()),
                    notes: None,
                },
            )
            .await
            .unwrap();
        }

        let monday = ProgramExerciseService::by_program_day(&pool, program.id, Weekday::Monday)
            .await
            .unwrap();
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0].sets, Some(5));
        assert_eq!(monday[0].exercise_name, "Back Squat");

        let all = ProgramExerciseService::by_program(&pool, program.id).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn slot_stats_break_down_by_weekday() {
        let pool = setup_test_db().await;
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        let program = ProgramService::create(
            &pool,
            &CreateProgramRequest {
                customer_id: customer,
                name: "Push pull".into(),
                start_date: date(2024, 6, 1),
                end_date: None,
                goal: None,
            },
        )
        .await
        .unwrap();
        let press = ExerciseService::create(
            &pool,
            &CreateExerciseRequest {
                name: "Bench Press".into(),
                category_id: None,
                description: None,
                target_muscles: None,
                difficulty: None,
            },
        )
        .await
        .unwrap();

        for (weekday, sets) in [
            (Weekday::Monday, 5),
            (Weekday::Monday, 3),
            (Weekday::Thursday, 4),
        ] {
            ProgramExerciseService::create(
                &pool,
                &CreateProgramExerciseRequest {
                    program_id: program.id,
                    exercise_id: press.id,
                    weekday: Some(weekday),
                    sets: Some(sets),
                    reps: Some("8".into()),
                    notes: None,
                },
            )
            .await
            .unwrap();
        }

        let stats = ProgramExerciseService::stats(&pool, program.id).await.unwrap();
        assert_eq!(stats.total_exercises, 3);
        assert_eq!(stats.monday_exercises, 2);
        assert_eq!(stats.thursday_exercises, 1);
        assert_eq!(stats.sunday_exercises, 0);
        assert_eq!(stats.average_sets, Some(4.0));
        assert_eq!(stats.total_sets, Some(12));

        let empty = ProgramExerciseService::stats(&pool, program.id + 1).await.unwrap();
        assert_eq!(empty.total_exercises, 0);
        assert_eq!(empty.average_sets, None);
        assert_eq!(empty.total_sets, None);
    }

    #[tokio::test]
    async fn deleting_program_removes_slots() {
        let pool = setup_test_db().await;
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        let program = ProgramService::create(
            &pool,
            &CreateProgramRequest {
                customer_id: customer,
                name: "Cut".into(),
                start_date: date(2024, 6, 1),
                end_date: None,
                goal: None,
            },
        )
        .await
        .unwrap();
        let row = ExerciseService::create(
            &pool,
            &CreateExerciseRequest {
                name: "Barbell Row".into(),
                category_id: None,
                description: None,
                target_muscles: None,
                difficulty: None,
            },
        )
        .await
        .unwrap();
        ProgramExerciseService::create(
            &pool,
            &CreateProgramExerciseRequest {
                program_id: program.id,
                exercise_id: row.id,
                weekday: Some(Weekday::Friday),
                sets: Some(4),
                reps: Some("8-10".into()),
                notes: None,
            },
        )
        .await
        .unwrap();

        ProgramService::delete(&pool, program.id).await.unwrap();

        let slots = ProgramExerciseService::by_program(&pool, program.id).await.unwrap();
        assert!(slots.is_empty());
        let err = ProgramService::get(&pool, program.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
