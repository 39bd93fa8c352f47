use chrono::Local;
use lazy_static::lazy_static;
use prometheus::{register_counter, register_gauge, Counter, Gauge};
use sqlx::SqlitePool;
use tracing::{info, warn};

lazy_static! {
    // ── Event counters (increment on each event) ────────────────────────────
    pub static ref CHECKINS_COUNTER: Counter = register_counter!(
        "gym_checkins_total",
        "Check-ins recorded since startup"
    ).unwrap();

    pub static ref PAYMENTS_COUNTER: Counter = register_counter!(
        "gym_payments_recorded_total",
        "Payment rows recorded since startup"
    ).unwrap();

    // ── Business metrics (refreshed by the sampler) ─────────────────────────
    pub static ref ACTIVE_CUSTOMERS_GAUGE: Gauge = register_gauge!(
        "gym_customers_active_total",
        "Customers currently active"
    ).unwrap();

    pub static ref ACTIVE_MEMBERS_GAUGE: Gauge = register_gauge!(
        "gym_members_active_total",
        "Customers holding a settled, in-term membership"
    ).unwrap();

    pub static ref UNPAID_MEMBERSHIPS_GAUGE: Gauge = register_gauge!(
        "gym_memberships_unpaid_total",
        "In-term memberships with no settled payment"
    ).unwrap();

    pub static ref EXPIRED_MEMBERSHIPS_GAUGE: Gauge = register_gauge!(
        "gym_memberships_expired_total",
        "Active memberships already past their end date"
    ).unwrap();

    pub static ref TOTAL_REVENUE_GAUGE: Gauge = register_gauge!(
        "gym_revenue_recorded_total",
        "Sum of every recorded payment amount"
    ).unwrap();

    pub static ref COLLECTED_REVENUE_GAUGE: Gauge = register_gauge!(
        "gym_revenue_collected_total",
        "Sum of settled payment amounts"
    ).unwrap();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(pool: SqlitePool) {
    tokio::spawn(async move {
        // Initial collection on startup
        if let Err(e) = collect(&pool).await {
            warn!("Metrics: initial collection failed: {}", e);
        }
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
            if let Err(e) = collect(&pool).await {
                warn!("Metrics: collection failed: {}", e);
            }
        }
    });
}

async fn collect(pool: &SqlitePool) -> anyhow::Result<()> {
    let today = Local::now().date_naive();

    let customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE is_active = 1")
        .fetch_one(pool)
        .await?;
    ACTIVE_CUSTOMERS_GAUGE.set(customers as f64);

    let members: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT c.id)
         FROM customers c
         JOIN memberships m ON m.customer_id = c.id
         LEFT JOIN (
             SELECT membership_id,
                    CASE WHEN SUM(CASE WHEN is_settled = 1 THEN 1 ELSE 0 END) > 0
                         THEN 1 ELSE 0 END AS settled
             FROM payments
             GROUP BY membership_id
         ) pd ON pd.membership_id = m.id
         WHERE c.is_active = 1 AND m.is_active = 1
           AND (pd.settled = 1 OR pd.settled IS NULL)
           AND m.end_date >= ?",
    )
    .bind(today)
    .fetch_one(pool)
    .await
    .unwrap_or(0);
    ACTIVE_MEMBERS_GAUGE.set(members as f64);

    let unpaid: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)
         FROM memberships m
         JOIN customers c ON c.id = m.customer_id
         LEFT JOIN (
             SELECT membership_id,
                    CASE WHEN SUM(CASE WHEN is_settled = 1 THEN 1 ELSE 0 END) > 0
                         THEN 1 ELSE 0 END AS settled
             FROM payments
             GROUP BY membership_id
         ) pd ON pd.membership_id = m.id
         WHERE c.is_active = 1 AND m.is_active = 1
           AND COALESCE(pd.settled, 0) = 0
           AND m.end_date >= ?",
    )
    .bind(today)
    .fetch_one(pool)
    .await
    .unwrap_or(0);
    UNPAID_MEMBERSHIPS_GAUGE.set(unpaid as f64);

    let expired: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM memberships WHERE is_active = 1 AND end_date < ?",
    )
    .bind(today)
    .fetch_one(pool)
    .await
    .unwrap_or(0);
    EXPIRED_MEMBERSHIPS_GAUGE.set(expired as f64);

    let total_revenue: f64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0.0) FROM payments")
            .fetch_one(pool)
            .await
            .unwrap_or(0.0);
    TOTAL_REVENUE_GAUGE.set(total_revenue);

    let collected: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount), 0.0) FROM payments WHERE is_settled = 1",
    )
    .fetch_one(pool)
    .await
    .unwrap_or(0.0);
    COLLECTED_REVENUE_GAUGE.set(collected);

    info!("Metrics: refreshed business gauges");
    Ok(())
}
