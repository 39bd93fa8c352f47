use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::customer::{CreateCustomerRequest, Customer, CustomerListRow, UpdateCustomerRequest},
    services::customers::CustomerService,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}

fn validate_create(req: &CreateCustomerRequest) -> Result<(), ApiError> {
    if req.first_name.trim().chars().count() < 2 {
        return Err(ApiError::Validation(
            "first_name must be at least 2 characters".into(),
        ));
    }
    if req.last_name.trim().chars().count() < 2 {
        return Err(ApiError::Validation(
            "last_name must be at least 2 characters".into(),
        ));
    }
    if digit_count(&req.phone) < 10 {
        return Err(ApiError::Validation(
            "phone must contain at least 10 digits".into(),
        ));
    }
    Ok(())
}

fn validate_update(req: &UpdateCustomerRequest) -> Result<(), ApiError> {
    if let Some(first_name) = &req.first_name {
        if first_name.trim().chars().count() < 2 {
            return Err(ApiError::Validation(
                "first_name must be at least 2 characters".into(),
            ));
        }
    }
    if let Some(last_name) = &req.last_name {
        if last_name.trim().chars().count() < 2 {
            return Err(ApiError::Validation(
                "last_name must be at least 2 characters".into(),
            ));
        }
    }
    if let Some(phone) = &req.phone {
        if digit_count(phone) < 10 {
            return Err(ApiError::Validation(
                "phone must contain at least 10 digits".into(),
            ));
        }
    }
    Ok(())
}

pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerListRow>>, ApiError> {
    let customers = CustomerService::list(&state.db).await?;
    Ok(Json(customers))
}

pub async fn search_customers(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let term = query.q.trim();
    if term.chars().count() < 2 {
        return Err(ApiError::Validation(
            "search term must be at least 2 characters".into(),
        ));
    }
    let customers = CustomerService::search(&state.db, term).await?;
    Ok(Json(customers))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, ApiError> {
    let customer = CustomerService::get(&state.db, id).await?;
    Ok(Json(customer))
}

pub async fn create_customer(
    State(state): State<AppState>,
    Json(body): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    validate_create(&body)?;
    let customer = CustomerService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCustomerRequest>,
) -> Result<Json<Customer>, ApiError> {
    validate_update(&body)?;
    let customer = CustomerService::update(&state.db, id, &body).await?;
    Ok(Json(customer))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    CustomerService::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Customer deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(first: &str, last: &str, phone: &str) -> CreateCustomerRequest {
        serde_json::from_value(json!({
            "first_name": first,
            "last_name": last,
            "phone": phone,
        }))
        .unwrap()
    }

    #[test]
    fn create_requires_two_letter_names_and_ten_digit_phone() {
        assert!(validate_create(&create_req("Derya", "Acar", "0532 000 00 01")).is_ok());
        assert!(validate_create(&create_req("D", "Acar", "05320000001")).is_err());
        assert!(validate_create(&create_req("Derya", " A ", "05320000001")).is_err());
        assert!(validate_create(&create_req("Derya", "Acar", "532-000")).is_err());
    }

    #[test]
    fn update_checks_only_provided_fields() {
        let empty: UpdateCustomerRequest = serde_json::from_value(json!({})).unwrap();
        assert!(validate_update(&empty).is_ok());

        let short_phone: UpdateCustomerRequest =
            serde_json::from_value(json!({ "phone": "12345" })).unwrap();
        assert!(validate_update(&short_phone).is_err());
    }
}
