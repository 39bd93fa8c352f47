use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::membership::{
        CreateMembershipRequest, Membership, MembershipDetail, MembershipOverview,
        MembershipPaymentRow, MembershipRow, UpdateMembershipRequest,
    },
    services::memberships::MembershipService,
    AppState,
};

fn validate_term(start: NaiveDate, end: NaiveDate) -> Result<(), ApiError> {
    if end < start {
        return Err(ApiError::Validation(
            "end_date must not be before start_date".into(),
        ));
    }
    Ok(())
}

fn validate_fee(fee: f64) -> Result<(), ApiError> {
    if !(fee > 0.0) {
        return Err(ApiError::Validation("fee must be greater than zero".into()));
    }
    Ok(())
}

pub async fn list_memberships(
    State(state): State<AppState>,
) -> Result<Json<Vec<MembershipRow>>, ApiError> {
    let memberships = MembershipService::list(&state.db).await?;
    Ok(Json(memberships))
}

pub async fn list_active(
    State(state): State<AppState>,
) -> Result<Json<Vec<MembershipRow>>, ApiError> {
    let today = Local::now().date_naive();
    let memberships = MembershipService::active(&state.db, today).await?;
    Ok(Json(memberships))
}

pub async fn list_expiring(
    State(state): State<AppState>,
    Path(days): Path<i64>,
) -> Result<Json<Vec<MembershipRow>>, ApiError> {
    let today = Local::now().date_naive();
    let memberships = MembershipService::expiring_within(&state.db, days, today).await?;
    Ok(Json(memberships))
}

pub async fn list_expired(
    State(state): State<AppState>,
) -> Result<Json<Vec<MembershipRow>>, ApiError> {
    let today = Local::now().date_naive();
    let memberships = MembershipService::expired(&state.db, today).await?;
    Ok(Json(memberships))
}

pub async fn list_by_payment_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<MembershipPaymentRow>>, ApiError> {
    let settled = match status.as_str() {
        "1" => true,
        "0" => false,
        _ => {
            return Err(ApiError::Validation(
                "payment status must be 0 or 1".into(),
            ))
        }
    };
    let memberships = MembershipService::by_payment_status(&state.db, settled).await?;
    Ok(Json(memberships))
}

pub async fn overview(
    State(state): State<AppState>,
) -> Result<Json<MembershipOverview>, ApiError> {
    let today = Local::now().date_naive();
    let overview = MembershipService::overview(&state.db, today).await?;
    Ok(Json(overview))
}

pub async fn list_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<Json<Vec<MembershipRow>>, ApiError> {
    let memberships = MembershipService::by_customer(&state.db, customer_id).await?;
    Ok(Json(memberships))
}

pub async fn get_membership(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Membership>, ApiError> {
    let membership = MembershipService::get(&state.db, id).await?;
    Ok(Json(membership))
}

pub async fn get_membership_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MembershipDetail>, ApiError> {
    let today = Local::now().date_naive();
    let detail = MembershipService::get_detail(&state.db, id, today).await?;
    Ok(Json(detail))
}

pub async fn create_membership(
    State(state): State<AppState>,
    Json(body): Json<CreateMembershipRequest>,
) -> Result<(StatusCode, Json<Membership>), ApiError> {
    validate_term(body.start_date, body.end_date)?;
    validate_fee(body.fee)?;
    let membership = MembershipService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

pub async fn update_membership(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateMembershipRequest>,
) -> Result<Json<Membership>, ApiError> {
    if let (Some(start), Some(end)) = (body.start_date, body.end_date) {
        validate_term(start, end)?;
    }
    if let Some(fee) = body.fee {
        validate_fee(fee)?;
    }
    let membership = MembershipService::update(&state.db, id, &body).await?;
    Ok(Json(membership))
}

pub async fn delete_membership(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    MembershipService::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Membership deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_allows_same_day_but_not_reversed_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(validate_term(start, start).is_ok());
        assert!(validate_term(start, start.pred_opt().unwrap()).is_err());
    }

    #[test]
    fn fee_must_be_positive() {
        assert!(validate_fee(1200.0).is_ok());
        assert!(validate_fee(0.0).is_err());
    }
}
