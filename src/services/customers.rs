use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::customer::{
    CreateCustomerRequest, Customer, CustomerListRow, UpdateCustomerRequest,
};

pub struct CustomerService;

impl CustomerService {
    /// Active customers with the weight and body-fat columns of their most
    /// recent measurement, newest registrations first.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<CustomerListRow>, ApiError> {
        let customers = sqlx::query_as::<_, CustomerListRow>(
            "SELECT c.*, m.weight_kg AS latest_weight_kg, m.body_fat_pct AS latest_body_fat_pct
             FROM customers c
             LEFT JOIN (
                 SELECT customer_id, weight_kg, body_fat_pct,
                        ROW_NUMBER() OVER (
                            PARTITION BY customer_id
                            ORDER BY measured_on DESC, id DESC
                        ) AS rn
                 FROM measurements
             ) m ON m.customer_id = c.id AND m.rn = 1
             WHERE c.is_active = 1
             ORDER BY c.registered_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(customers)
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<Customer, ApiError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        customer.ok_or(ApiError::NotFound("customer"))
    }

    pub async fn search(pool: &SqlitePool, query: &str) -> Result<Vec<Customer>, ApiError> {
        let pattern = format!("%{query}%");
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers
             WHERE is_active = 1
               AND (first_name LIKE ? OR last_name LIKE ? OR phone LIKE ? OR national_id LIKE ?)
             ORDER BY first_name, last_name",
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(pool)
        .await?;
        Ok(customers)
    }

    pub async fn create(
        pool: &SqlitePool,
        req: &CreateCustomerRequest,
    ) -> Result<Customer, ApiError> {
        let customer = sqlx::query_as::<_, Customer>(
            "INSERT INTO customers
                 (first_name, last_name, phone, email, national_id, birth_date, gender,
                  address, emergency_contact, emergency_phone, photo, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(&req.national_id)
        .bind(req.birth_date)
        .bind(req.gender)
        .bind(&req.address)
        .bind(&req.emergency_contact)
        .bind(&req.emergency_phone)
        .bind(&req.photo)
        .bind(&req.notes)
        .fetch_one(pool)
        .await?;
        Ok(customer)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        req: &UpdateCustomerRequest,
    ) -> Result<Customer, ApiError> {
        let customer = sqlx::query_as::<_, Customer>(
            "UPDATE customers
             SET first_name        = COALESCE(?, first_name),
                 last_name         = COALESCE(?, last_name),
                 phone             = COALESCE(?, phone),
                 email             = COALESCE(?, email),
                 national_id       = COALESCE(?, national_id),
                 birth_date        = COALESCE(?, birth_date),
                 gender            = COALESCE(?, gender),
                 address           = COALESCE(?, address),
                 emergency_contact = COALESCE(?, emergency_contact),
                 emergency_phone   = COALESCE(?, emergency_phone),
                 photo             = COALESCE(?, photo),
                 notes             = COALESCE(?, notes),
                 is_active         = COALESCE(?, is_active)
             WHERE id = ?
             RETURNING *",
        )
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(&req.national_id)
        .bind(req.birth_date)
        .bind(req.gender)
        .bind(&req.address)
        .bind(&req.emergency_contact)
        .bind(&req.emergency_phone)
        .bind(&req.photo)
        .bind(&req.notes)
        .bind(req.is_active)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        customer.ok_or(ApiError::NotFound("customer"))
    }

    /// Soft delete. The row stays for historical payment reporting.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("UPDATE customers SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("customer"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seed_customer, setup_test_db};

    #[tokio::test]
    async fn soft_delete_keeps_row_but_hides_from_list() {
        let pool = setup_test_db().await;
        let id = seed_customer(&pool, "Derya", "Acar", "05320000001").await;

        CustomerService::delete(&pool, id).await.unwrap();

        let listed = CustomerService::list(&pool).await.unwrap();
        assert!(listed.iter().all(|c| c.id != id));

        let fetched = CustomerService::get(&pool, id).await.unwrap();
        assert!(!fetched.is_active);
    }

    #[tokio::test]
    async fn duplicate_phone_maps_to_conflict() {
        let pool = setup_test_db().await;
        seed_customer(&pool, "Derya", "Acar", "05320000001").await;

        let req = CreateCustomerRequest {
            first_name: "Ayla".into(),
            last_name: "Demir".into(),
            phone: "05320000001".into(),
            email: None,
            national_id: None,
            birth_date: None,
            gender: None,
            address: None,
            emergency_contact: None,
            emergency_phone: None,
            photo: None,
            notes: None,
        };
        let err = CustomerService::create(&pool, &req).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn search_matches_name_and_phone() {
        let pool = setup_test_db().await;
        seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        seed_customer(&pool, "Murat", "Kaya", "05419991122").await;

        let by_name = CustomerService::search(&pool, "der").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].first_name, "Derya");

        let by_phone = CustomerService::search(&pool, "9991").await.unwrap();
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0].last_name, "Kaya");
    }
}
