use chrono::{Datelike, NaiveDate};
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::stats::{
    AgeBracketRow, DailyEntryRow, DashboardStats, Demographics, GenderCountRow,
    MembershipDistribution, MetricChanges, MonthlyRevenueRow, RecentActivity,
    UnpaidCustomerRow,
};
use crate::services::status::{self, percent_change};

/// Derived settlement flag per membership, shared by the aggregate queries.
const SETTLED_JOIN: &str = "LEFT JOIN (
    SELECT membership_id,
           CASE WHEN SUM(CASE WHEN is_settled = 1 THEN 1 ELSE 0 END) > 0
                THEN 1 ELSE 0 END AS settled
    FROM payments
    GROUP BY membership_id
) pd ON pd.membership_id = m.id";

pub struct StatsService;

impl StatsService {
    /// The admin dashboard payload. Every metric runs as its own query over
    /// current rows, outside a transaction: a write landing between two
    /// sub-queries can show up in one metric and not another. That skew is
    /// accepted at single-gym scale; callers wanting a consistent snapshot
    /// would need to wrap this in one read transaction.
    pub async fn dashboard(
        pool: &SqlitePool,
        today: NaiveDate,
    ) -> Result<DashboardStats, ApiError> {
        let month = format!("{:02}", today.month());
        let year = today.year().to_string();
        let (prev_month, prev_year) = status::previous_month(today.month(), today.year());
        let last_month = format!("{prev_month:02}");
        let last_year = prev_year.to_string();

        let total_customers: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE is_active = 1")
                .fetch_one(pool)
                .await?;

        let active_members = Self::active_members(pool, today, None).await?;

        let total_revenue: f64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0.0) FROM payments")
                .fetch_one(pool)
                .await?;

        let collected_revenue: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0.0) FROM payments WHERE is_settled = 1",
        )
        .fetch_one(pool)
        .await?;

        let monthly_revenue = Self::revenue_for_month(pool, &month, &year).await?;

        let today_entries: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM activities WHERE DATE(started_at) = ?",
        )
        .bind(today)
        .fetch_one(pool)
        .await?;

        // Historical wire name "expiringMemberships"; the rule counts
        // memberships that have already run out.
        let already_expired_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM memberships WHERE is_active = 1 AND end_date < ?",
        )
        .bind(today)
        .fetch_one(pool)
        .await?;

        let recent_activities = Self::recent_activities(pool).await?;

        // Previous-month reference points for the deltas.
        let prev_registrations: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM customers
             WHERE is_active = 1
               AND strftime('%m', registered_at) = ? AND strftime('%Y', registered_at) = ?",
        )
        .bind(&last_month)
        .bind(&last_year)
        .fetch_one(pool)
        .await?;

        let prev_active_members =
            Self::active_members(pool, today, Some((&last_month, &last_year))).await?;

        let prev_monthly_revenue = Self::revenue_for_month(pool, &last_month, &last_year).await?;

        let prev_entries: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM activities
             WHERE strftime('%m', started_at) = ? AND strftime('%Y', started_at) = ?",
        )
        .bind(&last_month)
        .bind(&last_year)
        .fetch_one(pool)
        .await?;

        let prev_expired: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM memberships
             WHERE is_active = 1
               AND strftime('%m', end_date) = ? AND strftime('%Y', end_date) = ?
               AND end_date < ?",
        )
        .bind(&last_month)
        .bind(&last_year)
        .bind(today)
        .fetch_one(pool)
        .await?;

        let changes = MetricChanges {
            total_customers: percent_change(total_customers as f64, prev_registrations as f64),
            active_members: percent_change(active_members as f64, prev_active_members as f64),
            // The cumulative total compared with itself never moves.
            total_revenue: percent_change(total_revenue, total_revenue),
            monthly_revenue: percent_change(monthly_revenue, prev_monthly_revenue),
            today_entries: percent_change(today_entries as f64, prev_entries as f64),
            already_expired_count: percent_change(
                already_expired_count as f64,
                prev_expired as f64,
            ),
        };

        Ok(DashboardStats {
            total_customers,
            active_members,
            total_revenue,
            collected_revenue,
            monthly_revenue,
            today_entries,
            already_expired_count,
            recent_activities,
            changes,
        })
    }

    /// Distinct customers holding at least one active, in-term membership
    /// whose derived settlement is settled or has no payment rows at all.
    /// The zero-rows leniency is intentional: a membership nobody has billed
    /// yet does not disqualify the member. With `start_month`, only
    /// memberships starting in that month count.
    async fn active_members(
        pool: &SqlitePool,
        today: NaiveDate,
        start_month: Option<(&str, &str)>,
    ) -> Result<i64, ApiError> {
        let month_filter = if start_month.is_some() {
            "AND strftime('%m', m.start_date) = ? AND strftime('%Y', m.start_date) = ?"
        } else {
            ""
        };
        let sql = format!(
            "SELECT COUNT(DISTINCT c.id)
             FROM customers c
             JOIN memberships m ON m.customer_id = c.id
             {SETTLED_JOIN}
             WHERE c.is_active = 1 AND m.is_active = 1
               AND (pd.settled = 1 OR pd.settled IS NULL)
               AND m.end_date >= ?
               {month_filter}"
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(today);
        if let Some((month, year)) = start_month {
            query = query.bind(month).bind(year);
        }
        Ok(query.fetch_one(pool).await?)
    }

    async fn revenue_for_month(
        pool: &SqlitePool,
        month: &str,
        year: &str,
    ) -> Result<f64, ApiError> {
        let total: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0.0) FROM payments
             WHERE strftime('%m', paid_at) = ? AND strftime('%Y', paid_at) = ?",
        )
        .bind(month)
        .bind(year)
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// Ten most recent events across registrations, payments and check-ins.
    /// Dates are passed through as stored text; payments without a date sort
    /// to the end and typically fall outside the limit.
    async fn recent_activities(pool: &SqlitePool) -> Result<Vec<RecentActivity>, ApiError> {
        let rows = sqlx::query_as::<_, RecentActivity>(
            "SELECT 'new_member' AS kind,
                    c.first_name || ' ' || c.last_name AS customer_name,
                    CAST(c.registered_at AS TEXT) AS date,
                    'New member registration' AS description
             FROM customers c
             UNION ALL
             SELECT 'payment',
                    c.first_name || ' ' || c.last_name,
                    CAST(p.paid_at AS TEXT),
                    'Payment received'
             FROM payments p
             JOIN customers c ON c.id = p.customer_id
             UNION ALL
             SELECT 'entry',
                    c.first_name || ' ' || c.last_name,
                    CAST(a.started_at AS TEXT),
                    'Gym check-in'
             FROM activities a
             JOIN customers c ON c.id = a.customer_id
             ORDER BY date DESC
             LIMIT 10",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Customers with an active, in-term membership and no settled payment
    /// row, with display fields for the outstanding-payments view.
    pub async fn unpaid_customers(
        pool: &SqlitePool,
        today: NaiveDate,
    ) -> Result<Vec<UnpaidCustomerRow>, ApiError> {
        let sql = format!(
            "SELECT c.id AS customer_id,
                    c.first_name || ' ' || c.last_name AS customer_name,
                    c.phone, c.email, c.photo,
                    t.name AS plan_name,
                    m.start_date, m.end_date, m.fee,
                    COALESCE(pd.settled, 0) AS is_settled,
                    CAST(MAX(p.paid_at) AS TEXT) AS last_paid_at
             FROM customers c
             JOIN memberships m ON m.customer_id = c.id
             JOIN membership_types t ON t.id = m.membership_type_id
             {SETTLED_JOIN}
             LEFT JOIN payments p ON p.membership_id = m.id
             WHERE c.is_active = 1 AND m.is_active = 1
               AND COALESCE(pd.settled, 0) = 0
               AND m.end_date >= ?
             GROUP BY m.id
             ORDER BY m.start_date ASC, c.first_name ASC"
        );
        let rows = sqlx::query_as::<_, UnpaidCustomerRow>(&sql)
            .bind(today)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Active customers bucketed by the lifecycle classification of their
    /// active memberships. Runs the pure rule over live rows; a customer
    /// holding several active memberships lands in one bucket per row.
    pub async fn distribution(
        pool: &SqlitePool,
        today: NaiveDate,
    ) -> Result<MembershipDistribution, ApiError> {
        let end_dates: Vec<Option<NaiveDate>> = sqlx::query_scalar(
            "SELECT m.end_date
             FROM customers c
             LEFT JOIN memberships m ON m.customer_id = c.id AND m.is_active = 1
             WHERE c.is_active = 1",
        )
        .fetch_all(pool)
        .await?;

        let mut distribution = MembershipDistribution::default();
        for end_date in end_dates {
            match status::classify(end_date, today) {
                crate::models::membership::MembershipStatus::NoMembership => {
                    distribution.no_membership += 1
                }
                crate::models::membership::MembershipStatus::Expired => distribution.expired += 1,
                crate::models::membership::MembershipStatus::ExpiringSoon => {
                    distribution.expiring_soon += 1
                }
                crate::models::membership::MembershipStatus::Active => distribution.active += 1,
            }
        }
        Ok(distribution)
    }

    /// Settled revenue per month of the given year.
    pub async fn monthly_revenue(
        pool: &SqlitePool,
        year: i32,
    ) -> Result<Vec<MonthlyRevenueRow>, ApiError> {
        let rows = sqlx::query_as::<_, MonthlyRevenueRow>(
            "SELECT CAST(strftime('%m', paid_at) AS INTEGER) AS month,
                    COALESCE(SUM(amount), 0.0) AS total
             FROM payments
             WHERE strftime('%Y', paid_at) = ? AND is_settled = 1
             GROUP BY month
             ORDER BY month ASC",
        )
        .bind(year.to_string())
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn demographics(
        pool: &SqlitePool,
        today: NaiveDate,
    ) -> Result<Demographics, ApiError> {
        let genders = sqlx::query_as::<_, GenderCountRow>(
            "SELECT gender, COUNT(*) AS count
             FROM customers
             WHERE is_active = 1
             GROUP BY gender
             ORDER BY count DESC",
        )
        .fetch_all(pool)
        .await?;

        let age_brackets = sqlx::query_as::<_, AgeBracketRow>(
            "SELECT CASE
                      WHEN age < 18 THEN 'under_18'
                      WHEN age <= 25 THEN '18_25'
                      WHEN age <= 35 THEN '26_35'
                      WHEN age <= 45 THEN '36_45'
                      ELSE '46_plus'
                    END AS bracket,
                    COUNT(*) AS count
             FROM (
                 SELECT CAST(strftime('%Y', ?) AS INTEGER)
                        - CAST(strftime('%Y', birth_date) AS INTEGER) AS age
                 FROM customers
                 WHERE is_active = 1 AND birth_date IS NOT NULL
             )
             GROUP BY bracket
             ORDER BY bracket ASC",
        )
        .bind(today)
        .fetch_all(pool)
        .await?;

        Ok(Demographics {
            genders,
            age_brackets,
        })
    }

    /// Check-in counts per day over the trailing week.
    pub async fn weekly_entries(
        pool: &SqlitePool,
        today: NaiveDate,
    ) -> Result<Vec<DailyEntryRow>, ApiError> {
        let rows = sqlx::query_as::<_, DailyEntryRow>(
            "SELECT DATE(started_at) AS day, COUNT(*) AS count
             FROM activities
             WHERE DATE(started_at) >= DATE(?, '-7 days') AND DATE(started_at) <= ?
             GROUP BY day
             ORDER BY day ASC",
        )
        .bind(today)
        .bind(today)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        date, datetime, seed_activity, seed_customer, seed_membership, seed_payment,
        seed_plan, setup_test_db,
    };

    /// One customer, one in-term membership, one unsettled payment with no
    /// date. The recorded amount counts as revenue; the member does not
    /// count as active and shows up as unpaid.
    #[tokio::test]
    async fn unsettled_payment_counts_as_revenue_but_not_active() {
        let pool = setup_test_db().await;
        let today = date(2024, 1, 15);
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        let plan = seed_plan(&pool, "Monthly", 1, 1200.0).await;
        let membership = seed_membership(
            &pool, customer, plan, date(2024, 1, 1), date(2024, 2, 1), 1200.0,
        )
        .await;
        seed_payment(&pool, customer, Some(membership), 1200.0, false, None).await;

        let stats = StatsService::dashboard(&pool, today).await.unwrap();
        assert_eq!(stats.total_customers, 1);
        assert_eq!(stats.active_members, 0);
        assert_eq!(stats.total_revenue, 1200.0);
        assert_eq!(stats.collected_revenue, 0.0);
        // Null payment date never lands in a calendar month.
        assert_eq!(stats.monthly_revenue, 0.0);
        assert_eq!(stats.already_expired_count, 0);

        let unpaid = StatsService::unpaid_customers(&pool, today).await.unwrap();
        assert_eq!(unpaid.len(), 1);
        assert_eq!(unpaid[0].customer_id, customer);
        assert!(!unpaid[0].is_settled);
        assert_eq!(unpaid[0].plan_name, "Monthly");
        assert_eq!(unpaid[0].last_paid_at, None);
    }

    /// A settled row of any amount settles the whole membership, and the
    /// revenue total keeps counting the unsettled row.
    #[tokio::test]
    async fn one_settled_row_settles_the_membership() {
        let pool = setup_test_db().await;
        let today = date(2024, 1, 15);
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        let plan = seed_plan(&pool, "Monthly", 1, 1200.0).await;
        let membership = seed_membership(
            &pool, customer, plan, date(2024, 1, 1), date(2024, 2, 1), 1200.0,
        )
        .await;
        seed_payment(&pool, customer, Some(membership), 1200.0, false, None).await;
        seed_payment(&pool, customer, Some(membership), 0.0, true, None).await;

        let stats = StatsService::dashboard(&pool, today).await.unwrap();
        assert_eq!(stats.active_members, 1);
        assert_eq!(stats.total_revenue, 1200.0);
        assert_eq!(stats.collected_revenue, 0.0);

        let unpaid = StatsService::unpaid_customers(&pool, today).await.unwrap();
        assert!(unpaid.is_empty());
    }

    /// A membership nobody has billed yet still counts its customer as
    /// active.
    #[tokio::test]
    async fn zero_payment_rows_do_not_disqualify_active_members() {
        let pool = setup_test_db().await;
        let today = date(2024, 1, 15);
        let plan = seed_plan(&pool, "Monthly", 1, 1200.0).await;

        let billed = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        let billed_membership = seed_membership(
            &pool, billed, plan, date(2024, 1, 1), date(2024, 2, 1), 1200.0,
        )
        .await;
        seed_payment(&pool, billed, Some(billed_membership), 1200.0, false, None).await;

        let unbilled = seed_customer(&pool, "Murat", "Kaya", "05419991122").await;
        seed_membership(&pool, unbilled, plan, date(2024, 1, 5), date(2024, 2, 5), 1200.0).await;

        let stats = StatsService::dashboard(&pool, today).await.unwrap();
        // Only the unbilled membership passes: no rows at all is lenient,
        // an unsettled row is not.
        assert_eq!(stats.active_members, 1);

        let unpaid = StatsService::unpaid_customers(&pool, today).await.unwrap();
        let names: Vec<&str> = unpaid.iter().map(|u| u.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Derya Acar", "Murat Kaya"]);
    }

    #[tokio::test]
    async fn monthly_revenue_and_delta_against_previous_month() {
        let pool = setup_test_db().await;
        let today = date(2024, 1, 15);
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;

        seed_payment(
            &pool, customer, None, 1000.0, true,
            Some(datetime(2024, 1, 10, 9, 0)),
        )
        .await;
        seed_payment(
            &pool, customer, None, 500.0, false,
            Some(datetime(2024, 1, 12, 9, 0)),
        )
        .await;
        seed_payment(
            &pool, customer, None, 2000.0, true,
            Some(datetime(2023, 12, 20, 9, 0)),
        )
        .await;

        let stats = StatsService::dashboard(&pool, today).await.unwrap();
        // Monthly revenue counts every dated row in the month, settled or not.
        assert_eq!(stats.monthly_revenue, 1500.0);
        assert_eq!(stats.total_revenue, 3500.0);
        assert_eq!(stats.collected_revenue, 3000.0);
        // 1500 vs 2000 the month before.
        assert_eq!(stats.changes.monthly_revenue, "-25%");
        assert_eq!(stats.changes.total_revenue, "+0%");

        let yearly = StatsService::monthly_revenue(&pool, 2024).await.unwrap();
        assert_eq!(yearly.len(), 1);
        assert_eq!(yearly[0].month, 1);
        // Settled rows only.
        assert_eq!(yearly[0].total, 1000.0);
    }

    #[tokio::test]
    async fn change_strings_on_empty_store() {
        let pool = setup_test_db().await;
        let stats = StatsService::dashboard(&pool, date(2024, 1, 15)).await.unwrap();
        assert_eq!(stats.changes.total_customers, "0%");
        assert_eq!(stats.changes.active_members, "0%");
        assert_eq!(stats.changes.total_revenue, "0%");
        assert_eq!(stats.changes.monthly_revenue, "0%");
        assert_eq!(stats.changes.today_entries, "0%");
        assert_eq!(stats.changes.already_expired_count, "0%");
    }

    #[tokio::test]
    async fn growth_from_zero_baseline_is_pinned() {
        let pool = setup_test_db().await;
        let today = date(2024, 1, 15);
        seed_customer(&pool, "Derya", "Acar", "05320000001").await;

        let stats = StatsService::dashboard(&pool, today).await.unwrap();
        // One customer now, none registered last month.
        assert_eq!(stats.changes.total_customers, "+100%");
    }

    #[tokio::test]
    async fn recent_activities_merges_streams_newest_first() {
        let pool = setup_test_db().await;
        let today = date(2024, 1, 15);
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;
        seed_payment(
            &pool, customer, None, 1200.0, true,
            Some(datetime(2024, 1, 14, 9, 0)),
        )
        .await;
        seed_activity(&pool, customer, datetime(2024, 1, 15, 8, 0)).await;

        let stats = StatsService::dashboard(&pool, today).await.unwrap();
        let kinds: Vec<&str> = stats
            .recent_activities
            .iter()
            .map(|a| a.kind.as_str())
            .collect();
        // Check-in this morning, payment yesterday, registration whenever
        // the row was seeded.
        assert_eq!(kinds[0], "entry");
        assert_eq!(kinds[1], "payment");
        assert!(kinds.contains(&"new_member"));
        assert!(stats
            .recent_activities
            .iter()
            .all(|a| a.customer_name == "Derya Acar"));
        assert_eq!(stats.today_entries, 1);
    }

    #[tokio::test]
    async fn distribution_buckets_match_classification() {
        let pool = setup_test_db().await;
        let today = date(2024, 6, 15);
        let plan = seed_plan(&pool, "Monthly", 1, 1200.0).await;

        let none = seed_customer(&pool, "Ayla", "Demir", "05320000001").await;
        let _ = none;
        let expired = seed_customer(&pool, "Derya", "Acar", "05320000002").await;
        seed_membership(&pool, expired, plan, date(2024, 4, 1), date(2024, 5, 1), 1200.0).await;
        let soon = seed_customer(&pool, "Murat", "Kaya", "05320000003").await;
        seed_membership(&pool, soon, plan, date(2024, 5, 20), date(2024, 6, 20), 1200.0).await;
        let active = seed_customer(&pool, "Elif", "Sahin", "05320000004").await;
        seed_membership(&pool, active, plan, date(2024, 6, 1), date(2024, 9, 1), 3200.0).await;

        let distribution = StatsService::distribution(&pool, today).await.unwrap();
        assert_eq!(distribution.no_membership, 1);
        assert_eq!(distribution.expired, 1);
        assert_eq!(distribution.expiring_soon, 1);
        assert_eq!(distribution.active, 1);
    }

    #[tokio::test]
    async fn weekly_entries_cover_trailing_week_only() {
        let pool = setup_test_db().await;
        let today = date(2024, 6, 15);
        let customer = seed_customer(&pool, "Derya", "Acar", "05320000001").await;

        seed_activity(&pool, customer, datetime(2024, 6, 15, 8, 0)).await;
        seed_activity(&pool, customer, datetime(2024, 6, 15, 19, 0)).await;
        seed_activity(&pool, customer, datetime(2024, 6, 12, 9, 0)).await;
        // Outside the window.
        seed_activity(&pool, customer, datetime(2024, 6, 1, 9, 0)).await;

        let weekly = StatsService::weekly_entries(&pool, today).await.unwrap();
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].day, "2024-06-12");
        assert_eq!(weekly[0].count, 1);
        assert_eq!(weekly[1].day, "2024-06-15");
        assert_eq!(weekly[1].count, 2);
    }
}
