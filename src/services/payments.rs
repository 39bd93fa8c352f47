use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::payment::{
    CreatePaymentRequest, Payment, PaymentMethod, PaymentRow, UpdatePaymentRequest,
};

const LIST_SELECT: &str = "SELECT p.*, c.first_name AS customer_first_name,
        c.last_name AS customer_last_name, t.name AS plan_name
 FROM payments p
 JOIN customers c ON c.id = p.customer_id
 LEFT JOIN memberships m ON m.id = p.membership_id
 LEFT JOIN membership_types t ON t.id = m.membership_type_id";

pub struct PaymentService;

impl PaymentService {
    pub async fn list(pool: &SqlitePool) -> Result<Vec<PaymentRow>, ApiError> {
        let sql = format!("{LIST_SELECT} ORDER BY p.paid_at DESC");
        let payments = sqlx::query_as::<_, PaymentRow>(&sql)
            .fetch_all(pool)
            .await?;
        Ok(payments)
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<Payment, ApiError> {
        let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        payment.ok_or(ApiError::NotFound("payment"))
    }

    pub async fn by_customer(
        pool: &SqlitePool,
        customer_id: i64,
    ) -> Result<Vec<PaymentRow>, ApiError> {
        let sql = format!("{LIST_SELECT} WHERE p.customer_id = ? ORDER BY p.paid_at DESC");
        let payments = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(customer_id)
            .fetch_all(pool)
            .await?;
        Ok(payments)
    }

    pub async fn by_membership(
        pool: &SqlitePool,
        membership_id: i64,
    ) -> Result<Vec<PaymentRow>, ApiError> {
        let sql = format!("{LIST_SELECT} WHERE p.membership_id = ? ORDER BY p.paid_at DESC");
        let payments = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(membership_id)
            .fetch_all(pool)
            .await?;
        Ok(payments)
    }

    pub async fn by_method(
        pool: &SqlitePool,
        method: PaymentMethod,
    ) -> Result<Vec<PaymentRow>, ApiError> {
        let sql = format!("{LIST_SELECT} WHERE p.method = ? ORDER BY p.paid_at DESC");
        let payments = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(method)
            .fetch_all(pool)
            .await?;
        Ok(payments)
    }

    pub async fn by_settled(
        pool: &SqlitePool,
        is_settled: bool,
    ) -> Result<Vec<PaymentRow>, ApiError> {
        let sql = format!("{LIST_SELECT} WHERE p.is_settled = ? ORDER BY p.paid_at DESC");
        let payments = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(is_settled)
            .fetch_all(pool)
            .await?;
        Ok(payments)
    }

    /// Defaults applied here, before the row is written: cash method,
    /// unsettled. The payment date stays null until the client supplies one.
    pub async fn create(
        pool: &SqlitePool,
        req: &CreatePaymentRequest,
    ) -> Result<Payment, ApiError> {
        let payment = sqlx::query_as::<_, Payment>(
            "INSERT INTO payments (customer_id, membership_id, paid_at, amount, method, note, is_settled)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(req.customer_id)
        .bind(req.membership_id)
        .bind(req.paid_at)
        .bind(req.amount)
        .bind(req.method.unwrap_or(PaymentMethod::Cash))
        .bind(&req.note)
        .bind(req.is_settled.unwrap_or(false))
        .fetch_one(pool)
        .await?;
        Ok(payment)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        req: &UpdatePaymentRequest,
    ) -> Result<Payment, ApiError> {
        let payment = sqlx::query_as::<_, Payment>(
            "UPDATE payments
             SET membership_id = COALESCE(?, membership_id),
                 amount        = COALESCE(?, amount),
                 method        = COALESCE(?, method),
                 paid_at       = COALESCE(?, paid_at),
                 note          = COALESCE(?, note)
             WHERE id = ?
             RETURNING *",
        )
        .bind(req.membership_id)
        .bind(req.amount)
        .bind(req.method)
        .bind(req.paid_at)
        .bind(&req.note)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        payment.ok_or(ApiError::NotFound("payment"))
    }

    /// Flip the reconciliation flag only. The recorded amount and date are
    /// untouched; settlement of the membership as a whole is derived from
    /// these flags elsewhere.
    pub async fn set_settled(
        pool: &SqlitePool,
        id: i64,
        is_settled: bool,
    ) -> Result<Payment, ApiError> {
        let payment = sqlx::query_as::<_, Payment>(
            "UPDATE payments SET is_settled = ? WHERE id = ? RETURNING *",
        )
        .bind(is_settled)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        payment.ok_or(ApiError::NotFound("payment"))
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("payment"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, seed_customer, seed_membership, seed_plan, setup_test_db};

    #[tokio::test]
    async fn create_defaults_to_unsettled_cash_with_null_date() {
        let pool = setup_test_db().await;
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;

        let req = CreatePaymentRequest {
            customer_id: customer,
            membership_id: None,
            amount: 1200.0,
            method: None,
            paid_at: None,
            note: None,
            is_settled: None,
        };
        let payment = PaymentService::create(&pool, &req).await.unwrap();
        assert_eq!(payment.method, PaymentMethod::Cash);
        assert!(!payment.is_settled);
        assert!(payment.paid_at.is_none());
    }

    #[tokio::test]
    async fn settle_flag_round_trip() {
        let pool = setup_test_db().await;
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        let plan = seed_plan(&pool, "Monthly", 1, 1200.0).await;
        let membership = seed_membership(
            &pool, customer, plan, date(2024, 6, 1), date(2024, 7, 1), 1200.0,
        )
        .await;

        let req = CreatePaymentRequest {
            customer_id: customer,
            membership_id: Some(membership),
            amount: 1200.0,
            method: Some(PaymentMethod::Card),
            paid_at: None,
            note: None,
            is_settled: None,
        };
        let payment = PaymentService::create(&pool, &req).await.unwrap();

        let settled = PaymentService::set_settled(&pool, payment.id, true).await.unwrap();
        assert!(settled.is_settled);
        // The date stays whatever it was; settling is reconciliation only.
        assert!(settled.paid_at.is_none());

        let unsettled = PaymentService::set_settled(&pool, payment.id, false).await.unwrap();
        assert!(!unsettled.is_settled);
    }

    #[tokio::test]
    async fn method_filter_uses_enum_text() {
        let pool = setup_test_db().await;
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;

        for (amount, method) in [
            (100.0, PaymentMethod::Cash),
            (200.0, PaymentMethod::Card),
            (300.0, PaymentMethod::Card),
        ] {
            let req = CreatePaymentRequest {
                customer_id: customer,
                membership_id: None,
                amount,
                method: Some(method),
                paid_at: None,
                note: None,
                is_settled: None,
            };
            PaymentService::create(&pool, &req).await.unwrap();
        }

        let card = PaymentService::by_method(&pool, PaymentMethod::Card).await.unwrap();
        assert_eq!(card.len(), 2);
        assert!(card.iter().all(|p| p.method == PaymentMethod::Card));
    }
}
