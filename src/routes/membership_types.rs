use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::membership_type::{
        CreateMembershipTypeRequest, MembershipType, PopularMembershipType,
        UpdateMembershipTypeRequest, UpdateTypeStatusRequest,
    },
    services::membership_types::MembershipTypeService,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct PriceRangeQuery {
    pub min: f64,
    pub max: f64,
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().chars().count() < 3 {
        return Err(ApiError::Validation(
            "name must be at least 3 characters".into(),
        ));
    }
    Ok(())
}

fn validate_duration(duration_months: i64) -> Result<(), ApiError> {
    if !(1..=60).contains(&duration_months) {
        return Err(ApiError::Validation(
            "duration_months must be between 1 and 60".into(),
        ));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), ApiError> {
    if !(price > 0.0) {
        return Err(ApiError::Validation(
            "price must be greater than zero".into(),
        ));
    }
    Ok(())
}

/// Default listing shows only plans currently offered.
pub async fn list_active(
    State(state): State<AppState>,
) -> Result<Json<Vec<MembershipType>>, ApiError> {
    let types = MembershipTypeService::list_active(&state.db).await?;
    Ok(Json(types))
}

pub async fn list_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<MembershipType>>, ApiError> {
    let types = MembershipTypeService::list_all(&state.db).await?;
    Ok(Json(types))
}

pub async fn list_inactive(
    State(state): State<AppState>,
) -> Result<Json<Vec<MembershipType>>, ApiError> {
    let types = MembershipTypeService::list_inactive(&state.db).await?;
    Ok(Json(types))
}

pub async fn list_popular(
    State(state): State<AppState>,
) -> Result<Json<Vec<PopularMembershipType>>, ApiError> {
    let types = MembershipTypeService::popular(&state.db).await?;
    Ok(Json(types))
}

pub async fn list_by_price_range(
    State(state): State<AppState>,
    Query(range): Query<PriceRangeQuery>,
) -> Result<Json<Vec<MembershipType>>, ApiError> {
    if range.min < 0.0 || range.max < range.min {
        return Err(ApiError::Validation(
            "price range requires 0 <= min <= max".into(),
        ));
    }
    let types = MembershipTypeService::by_price_range(&state.db, range.min, range.max).await?;
    Ok(Json(types))
}

pub async fn get_membership_type(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MembershipType>, ApiError> {
    let membership_type = MembershipTypeService::get(&state.db, id).await?;
    Ok(Json(membership_type))
}

pub async fn create_membership_type(
    State(state): State<AppState>,
    Json(body): Json<CreateMembershipTypeRequest>,
) -> Result<(StatusCode, Json<MembershipType>), ApiError> {
    validate_name(&body.name)?;
    validate_duration(body.duration_months)?;
    validate_price(body.price)?;
    let membership_type = MembershipTypeService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(membership_type)))
}

pub async fn update_membership_type(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateMembershipTypeRequest>,
) -> Result<Json<MembershipType>, ApiError> {
    if let Some(name) = &body.name {
        validate_name(name)?;
    }
    if let Some(duration_months) = body.duration_months {
        validate_duration(duration_months)?;
    }
    if let Some(price) = body.price {
        validate_price(price)?;
    }
    let membership_type = MembershipTypeService::update(&state.db, id, &body).await?;
    Ok(Json(membership_type))
}

pub async fn set_membership_type_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTypeStatusRequest>,
) -> Result<Json<MembershipType>, ApiError> {
    let membership_type =
        MembershipTypeService::set_status(&state.db, id, body.is_active).await?;
    Ok(Json(membership_type))
}

pub async fn delete_membership_type(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    MembershipTypeService::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Membership type deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_name_needs_three_characters() {
        assert!(validate_name("Monthly").is_ok());
        assert!(validate_name("  x ").is_err());
    }

    #[test]
    fn duration_is_bounded_to_sixty_months() {
        assert!(validate_duration(1).is_ok());
        assert!(validate_duration(60).is_ok());
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(61).is_err());
    }

    #[test]
    fn price_must_be_positive() {
        assert!(validate_price(1200.0).is_ok());
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(-5.0).is_err());
    }
}
