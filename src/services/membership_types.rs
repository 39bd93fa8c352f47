use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::membership_type::{
    CreateMembershipTypeRequest, MembershipType, PopularMembershipType,
    UpdateMembershipTypeRequest,
};

pub struct MembershipTypeService;

impl MembershipTypeService {
    pub async fn list_active(pool: &SqlitePool) -> Result<Vec<MembershipType>, ApiError> {
        let types = sqlx::query_as::<_, MembershipType>(
            "SELECT * FROM membership_types WHERE is_active = 1 ORDER BY duration_months ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(types)
    }

    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<MembershipType>, ApiError> {
        let types = sqlx::query_as::<_, MembershipType>(
            "SELECT * FROM membership_types ORDER BY duration_months ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(types)
    }

    pub async fn list_inactive(pool: &SqlitePool) -> Result<Vec<MembershipType>, ApiError> {
        let types = sqlx::query_as::<_, MembershipType>(
            "SELECT * FROM membership_types WHERE is_active = 0 ORDER BY duration_months ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(types)
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<MembershipType, ApiError> {
        let plan = sqlx::query_as::<_, MembershipType>(
            "SELECT * FROM membership_types WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        plan.ok_or(ApiError::NotFound("membership type"))
    }

    /// Active plans ranked by how many memberships were ever sold on them,
    /// top five.
    pub async fn popular(pool: &SqlitePool) -> Result<Vec<PopularMembershipType>, ApiError> {
        let types = sqlx::query_as::<_, PopularMembershipType>(
            "SELECT t.id, t.name, t.duration_months, t.price,
                    COUNT(m.id) AS membership_count
             FROM membership_types t
             LEFT JOIN memberships m ON m.membership_type_id = t.id
             WHERE t.is_active = 1
             GROUP BY t.id
             ORDER BY membership_count DESC, t.name ASC
             LIMIT 5",
        )
        .fetch_all(pool)
        .await?;
        Ok(types)
    }

    pub async fn by_price_range(
        pool: &SqlitePool,
        min: f64,
        max: f64,
    ) -> Result<Vec<MembershipType>, ApiError> {
        let types = sqlx::query_as::<_, MembershipType>(
            "SELECT * FROM membership_types
             WHERE is_active = 1 AND price BETWEEN ? AND ?
             ORDER BY price ASC",
        )
        .bind(min)
        .bind(max)
        .fetch_all(pool)
        .await?;
        Ok(types)
    }

    pub async fn create(
        pool: &SqlitePool,
        req: &CreateMembershipTypeRequest,
    ) -> Result<MembershipType, ApiError> {
        let plan = sqlx::query_as::<_, MembershipType>(
            "INSERT INTO membership_types (name, duration_months, price, description)
             VALUES (?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&req.name)
        .bind(req.duration_months)
        .bind(req.price)
        .bind(&req.description)
        .fetch_one(pool)
        .await?;
        Ok(plan)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        req: &UpdateMembershipTypeRequest,
    ) -> Result<MembershipType, ApiError> {
        let plan = sqlx::query_as::<_, MembershipType>(
            "UPDATE membership_types
             SET name            = COALESCE(?, name),
                 duration_months = COALESCE(?, duration_months),
                 price           = COALESCE(?, price),
                 description     = COALESCE(?, description),
                 is_active       = COALESCE(?, is_active)
             WHERE id = ?
             RETURNING *",
        )
        .bind(&req.name)
        .bind(req.duration_months)
        .bind(req.price)
        .bind(&req.description)
        .bind(req.is_active)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        plan.ok_or(ApiError::NotFound("membership type"))
    }

    pub async fn set_status(
        pool: &SqlitePool,
        id: i64,
        is_active: bool,
    ) -> Result<MembershipType, ApiError> {
        let plan = sqlx::query_as::<_, MembershipType>(
            "UPDATE membership_types SET is_active = ? WHERE id = ? RETURNING *",
        )
        .bind(is_active)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        plan.ok_or(ApiError::NotFound("membership type"))
    }

    /// Hard delete. Fails with a validation error while memberships still
    /// reference the plan.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM membership_types WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("membership type"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seed_plan, setup_test_db};

    #[tokio::test]
    async fn list_active_excludes_disabled_plans() {
        let pool = setup_test_db().await;
        let monthly = seed_plan(&pool, "Monthly", 1, 1200.0).await;
        let yearly = seed_plan(&pool, "Yearly", 12, 10000.0).await;
        MembershipTypeService::set_status(&pool, yearly, false)
            .await
            .unwrap();

        let active = MembershipTypeService::list_active(&pool).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, monthly);

        let all = MembershipTypeService::list_all(&pool).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_plan_name_maps_to_conflict() {
        let pool = setup_test_db().await;
        seed_plan(&pool, "Monthly", 1, 1200.0).await;

        let req = CreateMembershipTypeRequest {
            name: "Monthly".into(),
            duration_months: 3,
            price: 3200.0,
            description: None,
        };
        let err = MembershipTypeService::create(&pool, &req).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
