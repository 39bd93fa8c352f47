use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Dashboard payload. Wire names are camelCase for compatibility with the
/// admin client. `expiringMemberships` keeps its historical wire name even
/// though the metric counts already-expired memberships (see the stats
/// service for the rule).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_customers: i64,
    pub active_members: i64,
    pub total_revenue: f64,
    pub collected_revenue: f64,
    pub monthly_revenue: f64,
    pub today_entries: i64,
    #[serde(rename = "expiringMemberships")]
    pub already_expired_count: i64,
    pub recent_activities: Vec<RecentActivity>,
    pub changes: MetricChanges,
}

/// Month-over-month deltas, preformatted as signed percent strings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricChanges {
    pub total_customers: String,
    pub active_members: String,
    pub total_revenue: String,
    pub monthly_revenue: String,
    pub today_entries: String,
    #[serde(rename = "expiringMemberships")]
    pub already_expired_count: String,
}

/// One row of the recent-activity feed: registrations, payments and
/// check-ins merged into a single stream. `date` is the stored timestamp
/// text; payments without a payment date carry null.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    #[serde(rename = "type")]
    pub kind: String,
    pub customer_name: String,
    pub date: Option<String>,
    pub description: String,
}

/// A customer with an active, in-term membership and no settled payment row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UnpaidCustomerRow {
    pub customer_id: i64,
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub plan_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fee: f64,
    pub is_settled: bool,
    pub last_paid_at: Option<String>,
}

/// Counts of active customers per membership lifecycle bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MembershipDistribution {
    pub no_membership: i64,
    pub expired: i64,
    pub expiring_soon: i64,
    pub active: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonthlyRevenueRow {
    pub month: i64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GenderCountRow {
    pub gender: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AgeBracketRow {
    pub bracket: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Demographics {
    pub genders: Vec<GenderCountRow>,
    pub age_brackets: Vec<AgeBracketRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyEntryRow {
    pub day: String,
    pub count: i64,
}
