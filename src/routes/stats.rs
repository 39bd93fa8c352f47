use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Local;

use crate::{
    error::ApiError,
    models::stats::{
        DailyEntryRow, DashboardStats, Demographics, MembershipDistribution, MonthlyRevenueRow,
        UnpaidCustomerRow,
    },
    services::stats::StatsService,
    AppState,
};

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    let today = Local::now().date_naive();
    let stats = StatsService::dashboard(&state.db, today).await?;
    Ok(Json(stats))
}

pub async fn unpaid_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<UnpaidCustomerRow>>, ApiError> {
    let today = Local::now().date_naive();
    let unpaid = StatsService::unpaid_customers(&state.db, today).await?;
    Ok(Json(unpaid))
}

pub async fn membership_distribution(
    State(state): State<AppState>,
) -> Result<Json<MembershipDistribution>, ApiError> {
    let today = Local::now().date_naive();
    let distribution = StatsService::distribution(&state.db, today).await?;
    Ok(Json(distribution))
}

pub async fn monthly_revenue(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<MonthlyRevenueRow>>, ApiError> {
    if !(2000..=2100).contains(&year) {
        return Err(ApiError::Validation(
            "year must be between 2000 and 2100".into(),
        ));
    }
    let revenue = StatsService::monthly_revenue(&state.db, year).await?;
    Ok(Json(revenue))
}

pub async fn demographics(State(state): State<AppState>) -> Result<Json<Demographics>, ApiError> {
    let today = Local::now().date_naive();
    let demographics = StatsService::demographics(&state.db, today).await?;
    Ok(Json(demographics))
}

pub async fn weekly_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyEntryRow>>, ApiError> {
    let today = Local::now().date_naive();
    let entries = StatsService::weekly_entries(&state.db, today).await?;
    Ok(Json(entries))
}
