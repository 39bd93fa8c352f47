use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MembershipType {
    pub id: i64,
    pub name: String,
    pub duration_months: i64,
    pub price: f64,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PopularMembershipType {
    pub id: i64,
    pub name: String,
    pub duration_months: i64,
    pub price: f64,
    pub membership_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateMembershipTypeRequest {
    pub name: String,
    pub duration_months: i64,
    pub price: f64,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMembershipTypeRequest {
    pub name: Option<String>,
    pub duration_months: Option<i64>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTypeStatusRequest {
    pub is_active: bool,
}
