//! Shared fixtures for service tests: an in-memory store with the full
//! schema applied, plus seeders for the common row shapes.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::db::schema::apply_schema;

/// Fresh in-memory database with the full schema. A single connection keeps
/// every query in a test on the same memory store.
pub async fn setup_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("memory connection options")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("open in-memory database");
    apply_schema(&pool).await.expect("apply schema");
    pool
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn datetime(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(year, month, day)
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

/// Registration timestamps are pinned so date-ordered queries stay
/// deterministic under test.
pub async fn seed_customer(pool: &SqlitePool, first: &str, last: &str, phone: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO customers (first_name, last_name, phone, registered_at)
         VALUES (?, ?, ?, '2024-01-01 00:00:00')
         RETURNING id",
    )
    .bind(first)
    .bind(last)
    .bind(phone)
    .fetch_one(pool)
    .await
    .expect("seed customer")
}

pub async fn seed_plan(pool: &SqlitePool, name: &str, duration_months: i64, price: f64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO membership_types (name, duration_months, price)
         VALUES (?, ?, ?)
         RETURNING id",
    )
    .bind(name)
    .bind(duration_months)
    .bind(price)
    .fetch_one(pool)
    .await
    .expect("seed plan")
}

pub async fn seed_membership(
    pool: &SqlitePool,
    customer_id: i64,
    plan_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    fee: f64,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO memberships (customer_id, membership_type_id, start_date, end_date, fee)
         VALUES (?, ?, ?, ?, ?)
         RETURNING id",
    )
    .bind(customer_id)
    .bind(plan_id)
    .bind(start)
    .bind(end)
    .bind(fee)
    .fetch_one(pool)
    .await
    .expect("seed membership")
}

pub async fn seed_payment(
    pool: &SqlitePool,
    customer_id: i64,
    membership_id: Option<i64>,
    amount: f64,
    settled: bool,
    paid_at: Option<NaiveDateTime>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO payments (customer_id, membership_id, amount, is_settled, paid_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING id",
    )
    .bind(customer_id)
    .bind(membership_id)
    .bind(amount)
    .bind(settled)
    .bind(paid_at)
    .fetch_one(pool)
    .await
    .expect("seed payment")
}

pub async fn seed_activity(pool: &SqlitePool, customer_id: i64, started_at: NaiveDateTime) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO activities (customer_id, started_at)
         VALUES (?, ?)
         RETURNING id",
    )
    .bind(customer_id)
    .bind(started_at)
    .fetch_one(pool)
    .await
    .expect("seed activity")
}
