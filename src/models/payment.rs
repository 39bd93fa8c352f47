use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "transfer" => Ok(PaymentMethod::Transfer),
            _ => Err(anyhow::anyhow!("Unknown payment method: {s}")),
        }
    }
}

/// A single payment row. `paid_at` is nullable: null means the row was
/// recorded but no payment date has been set yet. `is_settled` tracks the
/// reconciliation step, separate from the amount having been recorded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i64,
    pub customer_id: i64,
    pub membership_id: Option<i64>,
    pub paid_at: Option<NaiveDateTime>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub note: Option<String>,
    pub is_settled: bool,
}

/// List row joined with customer name and plan name for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentRow {
    pub id: i64,
    pub customer_id: i64,
    pub membership_id: Option<i64>,
    pub paid_at: Option<NaiveDateTime>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub note: Option<String>,
    pub is_settled: bool,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub plan_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub customer_id: i64,
    pub membership_id: Option<i64>,
    pub amount: f64,
    pub method: Option<PaymentMethod>,
    pub paid_at: Option<NaiveDateTime>,
    pub note: Option<String>,
    pub is_settled: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    pub membership_id: Option<i64>,
    pub amount: Option<f64>,
    pub method: Option<PaymentMethod>,
    pub paid_at: Option<NaiveDateTime>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SettlePaymentRequest {
    pub is_settled: bool,
}
