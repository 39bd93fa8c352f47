use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle buckets produced by the status derivation. The expiring-soon
/// window is seven days, end date inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    NoMembership,
    Expired,
    ExpiringSoon,
    Active,
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MembershipStatus::NoMembership => "no_membership",
            MembershipStatus::Expired => "expired",
            MembershipStatus::ExpiringSoon => "expiring_soon",
            MembershipStatus::Active => "active",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Membership {
    pub id: i64,
    pub customer_id: i64,
    pub membership_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fee: f64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// List row joined with customer and plan display fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MembershipRow {
    pub id: i64,
    pub customer_id: i64,
    pub membership_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fee: f64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub plan_name: String,
}

/// Row for the payment-status listing: display fields plus the settlement
/// flag derived across the membership's payment rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MembershipPaymentRow {
    pub id: i64,
    pub customer_id: i64,
    pub membership_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fee: f64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub plan_name: String,
    pub payment_settled: bool,
}

/// Detail payload: the membership plus its derived settlement flag and
/// lifecycle classification.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipDetail {
    #[serde(flatten)]
    pub membership: MembershipRow,
    pub payment_settled: bool,
    pub status: MembershipStatus,
    pub unpaid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MembershipOverview {
    pub total: i64,
    pub active: i64,
    pub expired: i64,
    pub expiring_in_30_days: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateMembershipRequest {
    pub customer_id: i64,
    pub membership_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fee: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMembershipRequest {
    pub membership_type_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub fee: Option<f64>,
    pub is_active: Option<bool>,
}
