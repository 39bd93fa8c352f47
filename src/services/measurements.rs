use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::customer::Gender;
use crate::models::measurement::{
    CreateMeasurementRequest, Measurement, MeasurementRow, MeasurementStats,
    UpdateMeasurementRequest,
};
use crate::services::body::{self, BodyComposition};

pub struct MeasurementService;

impl MeasurementService {
    pub async fn list(pool: &SqlitePool) -> Result<Vec<MeasurementRow>, ApiError> {
        let measurements = sqlx::query_as::<_, MeasurementRow>(
            "SELECT ms.*,
                    c.first_name AS customer_first_name,
                    c.last_name  AS customer_last_name
             FROM measurements ms
             JOIN customers c ON ms.customer_id = c.id
             ORDER BY ms.measured_on DESC, ms.id DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(measurements)
    }

    pub async fn by_customer(
        pool: &SqlitePool,
        customer_id: i64,
    ) -> Result<Vec<Measurement>, ApiError> {
        let measurements = sqlx::query_as::<_, Measurement>(
            "SELECT * FROM measurements
             WHERE customer_id = ?
             ORDER BY measured_on DESC, id DESC",
        )
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
        Ok(measurements)
    }

    pub async fn latest(
        pool: &SqlitePool,
        customer_id: i64,
    ) -> Result<Measurement, ApiError> {
        let measurement = sqlx::query_as::<_, Measurement>(
            "SELECT * FROM measurements
             WHERE customer_id = ?
             ORDER BY measured_on DESC, id DESC
             LIMIT 1",
        )
        .bind(customer_id)
        .fetch_optional(pool)
        .await?;
        measurement.ok_or(ApiError::NotFound("measurement"))
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<Measurement, ApiError> {
        let measurement =
            sqlx::query_as::<_, Measurement>("SELECT * FROM measurements WHERE id = ?")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        measurement.ok_or(ApiError::NotFound("measurement"))
    }

    pub async fn create(
        pool: &SqlitePool,
        req: &CreateMeasurementRequest,
    ) -> Result<Measurement, ApiError> {
        let measurement = sqlx::query_as::<_, Measurement>(
            "INSERT INTO measurements
                 (customer_id, measured_on, height_cm, weight_kg, waist_cm, hip_cm,
                  arm_cm, neck_cm, body_fat_pct, muscle_pct, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(req.customer_id)
        .bind(req.measured_on)
        .bind(req.height_cm)
        .bind(req.weight_kg)
        .bind(req.waist_cm)
        .bind(req.hip_cm)
        .bind(req.arm_cm)
        .bind(req.neck_cm)
        .bind(req.body_fat_pct)
        .bind(req.muscle_pct)
        .bind(&req.notes)
        .fetch_one(pool)
        .await?;
        Ok(measurement)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        req: &UpdateMeasurementRequest,
    ) -> Result<Measurement, ApiError> {
        let measurement = sqlx::query_as::<_, Measurement>(
            "UPDATE measurements
             SET measured_on  = COALESCE(?, measured_on),
                 height_cm    = COALESCE(?, height_cm),
                 weight_kg    = COALESCE(?, weight_kg),
                 waist_cm     = COALESCE(?, waist_cm),
                 hip_cm       = COALESCE(?, hip_cm),
                 arm_cm       = COALESCE(?, arm_cm),
                 neck_cm      = COALESCE(?, neck_cm),
                 body_fat_pct = COALESCE(?, body_fat_pct),
                 muscle_pct   = COALESCE(?, muscle_pct),
                 notes        = COALESCE(?, notes)
             WHERE id = ?
             RETURNING *",
        )
        .bind(req.measured_on)
        .bind(req.height_cm)
        .bind(req.weight_kg)
        .bind(req.waist_cm)
        .bind(req.hip_cm)
        .bind(req.arm_cm)
        .bind(req.neck_cm)
        .bind(req.body_fat_pct)
        .bind(req.muscle_pct)
        .bind(&req.notes)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        measurement.ok_or(ApiError::NotFound("measurement"))
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM measurements WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("measurement"));
        }
        Ok(())
    }

    pub async fn stats(
        pool: &SqlitePool,
        customer_id: i64,
    ) -> Result<MeasurementStats, ApiError> {
        let stats = sqlx::query_as::<_, MeasurementStats>(
            "SELECT COUNT(*) AS measurement_count,
                    MIN(measured_on) AS first_measured_on,
                    MAX(measured_on) AS last_measured_on,
                    MIN(weight_kg) AS min_weight_kg,
                    MAX(weight_kg) AS max_weight_kg,
                    AVG(weight_kg) AS avg_weight_kg
             FROM measurements
             WHERE customer_id = ?",
        )
        .bind(customer_id)
        .fetch_one(pool)
        .await?;
        Ok(stats)
    }

    /// BMI and Navy body-fat report for one measurement, using the owning
    /// customer's gender. A measurement whose customer row is gone is a
    /// referential violation.
    pub async fn body_composition(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<BodyComposition, ApiError> {
        let measurement = Self::get(pool, id).await?;
        let gender: Option<Option<Gender>> =
            sqlx::query_scalar("SELECT gender FROM customers WHERE id = ?")
                .bind(measurement.customer_id)
                .fetch_optional(pool)
                .await?;
        let gender = gender.ok_or_else(|| {
            ApiError::DataIntegrity(format!(
                "measurement {id} references missing customer {}",
                measurement.customer_id
            ))
        })?;
        Ok(body::evaluate(gender, &measurement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, seed_customer, setup_test_db};

    async fn seed_measurement(
        pool: &SqlitePool,
        customer_id: i64,
        measured_on: chrono::NaiveDate,
        weight_kg: f64,
    ) -> i64 {
        let req = CreateMeasurementRequest {
            customer_id,
            measured_on,
            height_cm: Some(175.0),
            weight_kg: Some(weight_kg),
            waist_cm: None,
            hip_cm: None,
            arm_cm: None,
            neck_cm: None,
            body_fat_pct: None,
            muscle_pct: None,
            notes: None,
        };
        MeasurementService::create(pool, &req).await.unwrap().id
    }

    #[tokio::test]
    async fn latest_picks_newest_measurement() {
        let pool = setup_test_db().await;
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        seed_measurement(&pool, customer, date(2024, 5, 1), 82.0).await;
        let newest = seed_measurement(&pool, customer, date(2024, 6, 1), 80.2).await;

        let latest = MeasurementService::latest(&pool, customer).await.unwrap();
        assert_eq!(latest.id, newest);
        assert_eq!(latest.weight_kg, Some(80.2));
    }

    #[tokio::test]
    async fn stats_aggregate_weight_history() {
        let pool = setup_test_db().await;
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        seed_measurement(&pool, customer, date(2024, 4, 1), 84.0).await;
        seed_measurement(&pool, customer, date(2024, 5, 1), 82.0).await;
        seed_measurement(&pool, customer, date(2024, 6, 1), 80.0).await;

        let stats = MeasurementService::stats(&pool, customer).await.unwrap();
        assert_eq!(stats.measurement_count, 3);
        assert_eq!(stats.first_measured_on, Some(date(2024, 4, 1)));
        assert_eq!(stats.last_measured_on, Some(date(2024, 6, 1)));
        assert_eq!(stats.min_weight_kg, Some(80.0));
        assert_eq!(stats.max_weight_kg, Some(84.0));
        assert_eq!(stats.avg_weight_kg, Some(82.0));
    }

    #[tokio::test]
    async fn stats_for_customer_without_measurements() {
        let pool = setup_test_db().await;
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;

        let stats = MeasurementService::stats(&pool, customer).await.unwrap();
        assert_eq!(stats.measurement_count, 0);
        assert_eq!(stats.first_measured_on, None);
        assert_eq!(stats.avg_weight_kg, None);
    }

    #[tokio::test]
    async fn body_composition_uses_customer_gender() {
        let pool = setup_test_db().await;
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        sqlx::query("UPDATE customers SET gender = 'male' WHERE id = ?")
            .bind(customer)
            .execute(&pool)
            .await
            .unwrap();

        let req = CreateMeasurementRequest {
            customer_id: customer,
            measured_on: date(2024, 6, 1),
            height_cm: Some(180.0),
            weight_kg: Some(80.0),
            waist_cm: Some(85.0),
            hip_cm: None,
            arm_cm: None,
            neck_cm: Some(38.0),
            body_fat_pct: None,
            muscle_pct: None,
            notes: None,
        };
        let measurement = MeasurementService::create(&pool, &req).await.unwrap();

        let report = MeasurementService::body_composition(&pool, measurement.id)
            .await
            .unwrap();
        let body_fat = report.body_fat.unwrap();
        assert!(body_fat.value > 0.0 && body_fat.value <= 100.0);
        assert!(report.missing.is_empty());
    }
}
