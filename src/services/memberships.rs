use chrono::{Duration, NaiveDate};
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::membership::{
    CreateMembershipRequest, Membership, MembershipDetail, MembershipOverview,
    MembershipPaymentRow, MembershipRow, UpdateMembershipRequest,
};
use crate::services::status;

/// Derived settlement flag, one row per membership that has payments.
/// Memberships with no rows fall out of the join and COALESCE to 0,
/// the SQL mirror of `status::any_row_settled` over the empty set.
const SETTLED_JOIN: &str = "LEFT JOIN (
    SELECT membership_id,
           CASE WHEN SUM(CASE WHEN is_settled = 1 THEN 1 ELSE 0 END) > 0
                THEN 1 ELSE 0 END AS settled
    FROM payments
    GROUP BY membership_id
) p ON p.membership_id = m.id";

pub struct MembershipService;

impl MembershipService {
    pub async fn list(pool: &SqlitePool) -> Result<Vec<MembershipRow>, ApiError> {
        let memberships = sqlx::query_as::<_, MembershipRow>(
            "SELECT m.*, c.first_name AS customer_first_name,
                    c.last_name AS customer_last_name, t.name AS plan_name
             FROM memberships m
             JOIN customers c ON c.id = m.customer_id
             JOIN membership_types t ON t.id = m.membership_type_id
             ORDER BY m.created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(memberships)
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<Membership, ApiError> {
        let membership =
            sqlx::query_as::<_, Membership>("SELECT * FROM memberships WHERE id = ?")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        membership.ok_or(ApiError::NotFound("membership"))
    }

    /// Detail payload with the derived settlement flag and lifecycle
    /// classification. A membership whose customer or plan row is missing is
    /// a referential violation and fails loudly instead of returning a
    /// partial record.
    pub async fn get_detail(
        pool: &SqlitePool,
        id: i64,
        today: NaiveDate,
    ) -> Result<MembershipDetail, ApiError> {
        // Existence first, so a missing membership stays a plain 404.
        Self::get(pool, id).await?;

        let row = sqlx::query_as::<_, MembershipRow>(
            "SELECT m.*, c.first_name AS customer_first_name,
                    c.last_name AS customer_last_name, t.name AS plan_name
             FROM memberships m
             JOIN customers c ON c.id = m.customer_id
             JOIN membership_types t ON t.id = m.membership_type_id
             WHERE m.id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            ApiError::DataIntegrity(format!(
                "membership {id} references a missing customer or membership type"
            ))
        })?;

        let settled_flags: Vec<bool> =
            sqlx::query_scalar("SELECT is_settled FROM payments WHERE membership_id = ?")
                .bind(id)
                .fetch_all(pool)
                .await?;
        let payment_settled = status::any_row_settled(settled_flags);

        let end_date = row.is_active.then_some(row.end_date);
        let classification = status::classify(end_date, today);
        let unpaid = status::is_unpaid(row.is_active, payment_settled, row.end_date, today);

        Ok(MembershipDetail {
            membership: row,
            payment_settled,
            status: classification,
            unpaid,
        })
    }

    pub async fn by_customer(
        pool: &SqlitePool,
        customer_id: i64,
    ) -> Result<Vec<MembershipRow>, ApiError> {
        let memberships = sqlx::query_as::<_, MembershipRow>(
            "SELECT m.*, c.first_name AS customer_first_name,
                    c.last_name AS customer_last_name, t.name AS plan_name
             FROM memberships m
             JOIN customers c ON c.id = m.customer_id
             JOIN membership_types t ON t.id = m.membership_type_id
             WHERE m.customer_id = ?
             ORDER BY m.created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
        Ok(memberships)
    }

    pub async fn create(
        pool: &SqlitePool,
        req: &CreateMembershipRequest,
    ) -> Result<Membership, ApiError> {
        let membership = sqlx::query_as::<_, Membership>(
            "INSERT INTO memberships (customer_id, membership_type_id, start_date, end_date, fee)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(req.customer_id)
        .bind(req.membership_type_id)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.fee)
        .fetch_one(pool)
        .await?;
        Ok(membership)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        req: &UpdateMembershipRequest,
    ) -> Result<Membership, ApiError> {
        let membership = sqlx::query_as::<_, Membership>(
            "UPDATE memberships
             SET membership_type_id = COALESCE(?, membership_type_id),
                 start_date         = COALESCE(?, start_date),
                 end_date           = COALESCE(?, end_date),
                 fee                = COALESCE(?, fee),
                 is_active          = COALESCE(?, is_active)
             WHERE id = ?
             RETURNING *",
        )
        .bind(req.membership_type_id)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.fee)
        .bind(req.is_active)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        membership.ok_or(ApiError::NotFound("membership"))
    }

    /// Soft delete (cancellation).
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("UPDATE memberships SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("membership"));
        }
        Ok(())
    }

    pub async fn active(
        pool: &SqlitePool,
        today: NaiveDate,
    ) -> Result<Vec<MembershipRow>, ApiError> {
        let memberships = sqlx::query_as::<_, MembershipRow>(
            "SELECT m.*, c.first_name AS customer_first_name,
                    c.last_name AS customer_last_name, t.name AS plan_name
             FROM memberships m
             JOIN customers c ON c.id = m.customer_id
             JOIN membership_types t ON t.id = m.membership_type_id
             WHERE m.is_active = 1 AND m.end_date >= ?
             ORDER BY m.end_date ASC",
        )
        .bind(today)
        .fetch_all(pool)
        .await?;
        Ok(memberships)
    }

    /// Memberships ending within `[today, today + days]`, both ends
    /// inclusive, soonest first.
    pub async fn expiring_within(
        pool: &SqlitePool,
        days: i64,
        today: NaiveDate,
    ) -> Result<Vec<MembershipRow>, ApiError> {
        let until = today + Duration::days(days);
        let memberships = sqlx::query_as::<_, MembershipRow>(
            "SELECT m.*, c.first_name AS customer_first_name,
                    c.last_name AS customer_last_name, t.name AS plan_name
             FROM memberships m
             JOIN customers c ON c.id = m.customer_id
             JOIN membership_types t ON t.id = m.membership_type_id
             WHERE m.is_active = 1 AND m.end_date BETWEEN ? AND ?
             ORDER BY m.end_date ASC",
        )
        .bind(today)
        .bind(until)
        .fetch_all(pool)
        .await?;
        Ok(memberships)
    }

    pub async fn expired(
        pool: &SqlitePool,
        today: NaiveDate,
    ) -> Result<Vec<MembershipRow>, ApiError> {
        let memberships = sqlx::query_as::<_, MembershipRow>(
            "SELECT m.*, c.first_name AS customer_first_name,
                    c.last_name AS customer_last_name, t.name AS plan_name
             FROM memberships m
             JOIN customers c ON c.id = m.customer_id
             JOIN membership_types t ON t.id = m.membership_type_id
             WHERE m.is_active = 1 AND m.end_date < ?
             ORDER BY m.end_date DESC",
        )
        .bind(today)
        .fetch_all(pool)
        .await?;
        Ok(memberships)
    }

    /// Active memberships filtered by the derived settlement flag.
    pub async fn by_payment_status(
        pool: &SqlitePool,
        settled: bool,
    ) -> Result<Vec<MembershipPaymentRow>, ApiError> {
        let sql = format!(
            "SELECT m.*, c.first_name AS customer_first_name,
                    c.last_name AS customer_last_name, t.name AS plan_name,
                    COALESCE(p.settled, 0) AS payment_settled
             FROM memberships m
             JOIN customers c ON c.id = m.customer_id
             JOIN membership_types t ON t.id = m.membership_type_id
             {SETTLED_JOIN}
             WHERE m.is_active = 1 AND COALESCE(p.settled, 0) = ?
             ORDER BY m.end_date ASC"
        );
        let memberships = sqlx::query_as::<_, MembershipPaymentRow>(&sql)
            .bind(settled)
            .fetch_all(pool)
            .await?;
        Ok(memberships)
    }

    pub async fn overview(
        pool: &SqlitePool,
        today: NaiveDate,
    ) -> Result<MembershipOverview, ApiError> {
        let in_30_days = today + Duration::days(30);
        let overview = sqlx::query_as::<_, MembershipOverview>(
            "SELECT COUNT(*) AS total,
                    COALESCE(SUM(CASE WHEN is_active = 1 AND end_date >= ?
                                      THEN 1 ELSE 0 END), 0) AS active,
                    COALESCE(SUM(CASE WHEN end_date < ? THEN 1 ELSE 0 END), 0) AS expired,
                    COALESCE(SUM(CASE WHEN is_active = 1 AND end_date BETWEEN ? AND ?
                                      THEN 1 ELSE 0 END), 0) AS expiring_in_30_days
             FROM memberships",
        )
        .bind(today)
        .bind(today)
        .bind(today)
        .bind(in_30_days)
        .fetch_one(pool)
        .await?;
        Ok(overview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::membership::MembershipStatus;
    use crate::test_utils::{
        date, seed_customer, seed_membership, seed_payment, seed_plan, setup_test_db,
    };

    #[tokio::test]
    async fn sql_settlement_agrees_with_pure_rule() {
        let pool = setup_test_db().await;
        let today = date(2024, 6, 15);
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        let plan = seed_plan(&pool, "Monthly", 1, 1200.0).await;
        let membership = seed_membership(
            &pool, customer, plan, date(2024, 6, 1), date(2024, 7, 1), 1200.0,
        )
        .await;

        // No rows at all: derived unsettled on both paths.
        let unsettled = MembershipService::by_payment_status(&pool, false).await.unwrap();
        assert!(unsettled.iter().any(|m| m.id == membership));
        let detail = MembershipService::get_detail(&pool, membership, today).await.unwrap();
        assert!(!detail.payment_settled);
        assert!(detail.unpaid);

        // Unsettled rows alone do not settle the membership.
        seed_payment(&pool, customer, Some(membership), 600.0, false, None).await;
        let detail = MembershipService::get_detail(&pool, membership, today).await.unwrap();
        assert!(!detail.payment_settled);

        // One settled row flips the whole membership, even a zero amount.
        seed_payment(&pool, customer, Some(membership), 0.0, true, None).await;
        let settled = MembershipService::by_payment_status(&pool, true).await.unwrap();
        assert!(settled.iter().any(|m| m.id == membership));
        let detail = MembershipService::get_detail(&pool, membership, today).await.unwrap();
        assert!(detail.payment_settled);
        assert!(!detail.unpaid);
    }

    #[tokio::test]
    async fn detail_classifies_end_date_boundaries() {
        let pool = setup_test_db().await;
        let today = date(2024, 6, 15);
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        let plan = seed_plan(&pool, "Monthly", 1, 1200.0).await;

        let ending_today = seed_membership(
            &pool, customer, plan, date(2024, 5, 15), today, 1200.0,
        )
        .await;
        let ending_tomorrow = seed_membership(
            &pool, customer, plan, date(2024, 5, 16), date(2024, 6, 16), 1200.0,
        )
        .await;
        let ending_next_week = seed_membership(
            &pool, customer, plan, date(2024, 5, 23), date(2024, 6, 23), 1200.0,
        )
        .await;

        let detail = MembershipService::get_detail(&pool, ending_today, today).await.unwrap();
        assert_eq!(detail.status, MembershipStatus::Expired);

        let detail = MembershipService::get_detail(&pool, ending_tomorrow, today).await.unwrap();
        assert_eq!(detail.status, MembershipStatus::ExpiringSoon);

        let detail = MembershipService::get_detail(&pool, ending_next_week, today).await.unwrap();
        assert_eq!(detail.status, MembershipStatus::Active);
    }

    #[tokio::test]
    async fn expiring_window_is_inclusive_and_sorted() {
        let pool = setup_test_db().await;
        let today = date(2024, 6, 15);
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        let plan = seed_plan(&pool, "Monthly", 1, 1200.0).await;

        let at_window_edge = seed_membership(
            &pool, customer, plan, date(2024, 5, 22), date(2024, 6, 22), 1200.0,
        )
        .await;
        let ending_today = seed_membership(
            &pool, customer, plan, date(2024, 5, 15), today, 1200.0,
        )
        .await;
        // Outside the window.
        seed_membership(&pool, customer, plan, date(2024, 5, 23), date(2024, 6, 23), 1200.0)
            .await;

        let expiring = MembershipService::expiring_within(&pool, 7, today).await.unwrap();
        let ids: Vec<i64> = expiring.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![ending_today, at_window_edge]);
    }

    #[tokio::test]
    async fn dangling_reference_is_a_data_integrity_error() {
        let pool = setup_test_db().await;
        let today = date(2024, 6, 15);
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        let plan = seed_plan(&pool, "Monthly", 1, 1200.0).await;
        let membership = seed_membership(
            &pool, customer, plan, date(2024, 6, 1), date(2024, 7, 1), 1200.0,
        )
        .await;

        sqlx::raw_sql("PRAGMA foreign_keys = OFF")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(customer)
            .execute(&pool)
            .await
            .unwrap();

        let err = MembershipService::get_detail(&pool, membership, today).await.unwrap_err();
        assert!(matches!(err, ApiError::DataIntegrity(_)));
    }

    #[tokio::test]
    async fn overview_counts_by_window() {
        let pool = setup_test_db().await;
        let today = date(2024, 6, 15);
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        let plan = seed_plan(&pool, "Monthly", 1, 1200.0).await;

        seed_membership(&pool, customer, plan, date(2024, 4, 1), date(2024, 5, 1), 1200.0).await;
        seed_membership(&pool, customer, plan, date(2024, 6, 1), date(2024, 7, 1), 1200.0).await;
        seed_membership(&pool, customer, plan, date(2024, 6, 10), date(2024, 9, 10), 3200.0)
            .await;

        let overview = MembershipService::overview(&pool, today).await.unwrap();
        assert_eq!(overview.total, 3);
        assert_eq!(overview.active, 2);
        assert_eq!(overview.expired, 1);
        assert_eq!(overview.expiring_in_30_days, 1);
    }
}
