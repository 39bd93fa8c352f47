use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::activity::{
    Activity, ActivityRow, ActivityType, CreateActivityRequest, UpdateActivityRequest,
};

pub struct ActivityService;

impl ActivityService {
    pub async fn recent(pool: &SqlitePool, limit: i64) -> Result<Vec<ActivityRow>, ApiError> {
        let activities = sqlx::query_as::<_, ActivityRow>(
            "SELECT a.*, c.first_name AS customer_first_name,
                    c.last_name AS customer_last_name
             FROM activities a
             JOIN customers c ON c.id = a.customer_id
             ORDER BY a.started_at DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(activities)
    }

    pub async fn by_customer(
        pool: &SqlitePool,
        customer_id: i64,
    ) -> Result<Vec<ActivityRow>, ApiError> {
        let activities = sqlx::query_as::<_, ActivityRow>(
            "SELECT a.*, c.first_name AS customer_first_name,
                    c.last_name AS customer_last_name
             FROM activities a
             JOIN customers c ON c.id = a.customer_id
             WHERE a.customer_id = ?
             ORDER BY a.started_at DESC",
        )
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
        Ok(activities)
    }

    /// Check-in. Missing fields default here: workout type, started now.
    pub async fn create(
        pool: &SqlitePool,
        req: &CreateActivityRequest,
        now: NaiveDateTime,
    ) -> Result<Activity, ApiError> {
        let activity = sqlx::query_as::<_, Activity>(
            "INSERT INTO activities (customer_id, activity_type, started_at, notes)
             VALUES (?, ?, ?, ?)
             RETURNING *",
        )
        .bind(req.customer_id)
        .bind(req.activity_type.unwrap_or(ActivityType::Workout))
        .bind(req.started_at.unwrap_or(now))
        .bind(&req.notes)
        .fetch_one(pool)
        .await?;
        Ok(activity)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        req: &UpdateActivityRequest,
    ) -> Result<Activity, ApiError> {
        let activity = sqlx::query_as::<_, Activity>(
            "UPDATE activities
             SET activity_type    = COALESCE(?, activity_type),
                 started_at       = COALESCE(?, started_at),
                 ended_at         = COALESCE(?, ended_at),
                 duration_minutes = COALESCE(?, duration_minutes),
                 calories_burned  = COALESCE(?, calories_burned),
                 notes            = COALESCE(?, notes)
             WHERE id = ?
             RETURNING *",
        )
        .bind(req.activity_type)
        .bind(req.started_at)
        .bind(req.ended_at)
        .bind(req.duration_minutes)
        .bind(req.calories_burned)
        .bind(&req.notes)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        activity.ok_or(ApiError::NotFound("activity"))
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("activity"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, seed_customer, setup_test_db};

    #[tokio::test]
    async fn check_in_defaults_and_recent_ordering() {
        let pool = setup_test_db().await;
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;

        let morning = date(2024, 6, 15).and_hms_opt(8, 0, 0).unwrap();
        let evening = date(2024, 6, 15).and_hms_opt(19, 30, 0).unwrap();

        let req = CreateActivityRequest {
            customer_id: customer,
            activity_type: None,
            started_at: None,
            notes: None,
        };
        let first = ActivityService::create(&pool, &req, morning).await.unwrap();
        assert_eq!(first.activity_type, ActivityType::Workout);
        assert_eq!(first.started_at, morning);

        let req = CreateActivityRequest {
            customer_id: customer,
            activity_type: Some(ActivityType::Cardio),
            started_at: Some(evening),
            notes: None,
        };
        let second = ActivityService::create(&pool, &req, morning).await.unwrap();

        let recent = ActivityService::recent(&pool, 10).await.unwrap();
        let ids: Vec<i64> = recent.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let limited = ActivityService::recent(&pool, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, second.id);
    }

    #[tokio::test]
    async fn check_out_records_end_and_duration() {
        let pool = setup_test_db().await;
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        let started = date(2024, 6, 15).and_hms_opt(8, 0, 0).unwrap();

        let req = CreateActivityRequest {
            customer_id: customer,
            activity_type: None,
            started_at: Some(started),
            notes: None,
        };
        let activity = ActivityService::create(&pool, &req, started).await.unwrap();

        let update = UpdateActivityRequest {
            activity_type: None,
            started_at: None,
            ended_at: date(2024, 6, 15).and_hms_opt(9, 15, 0),
            duration_minutes: Some(75),
            calories_burned: Some(430),
            notes: None,
        };
        let updated = ActivityService::update(&pool, activity.id, &update).await.unwrap();
        assert_eq!(updated.duration_minutes, Some(75));
        assert_eq!(updated.started_at, started);
    }
}
