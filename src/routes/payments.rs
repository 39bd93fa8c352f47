use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::payment::{
        CreatePaymentRequest, Payment, PaymentMethod, PaymentRow, SettlePaymentRequest,
        UpdatePaymentRequest,
    },
    services::{metrics::PAYMENTS_COUNTER, payments::PaymentService},
    AppState,
};

fn validate_amount(amount: f64) -> Result<(), ApiError> {
    if !(amount > 0.0) {
        return Err(ApiError::Validation(
            "amount must be greater than zero".into(),
        ));
    }
    Ok(())
}

pub async fn list_payments(
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentRow>>, ApiError> {
    let payments = PaymentService::list(&state.db).await?;
    Ok(Json(payments))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Payment>, ApiError> {
    let payment = PaymentService::get(&state.db, id).await?;
    Ok(Json(payment))
}

pub async fn list_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<Json<Vec<PaymentRow>>, ApiError> {
    let payments = PaymentService::by_customer(&state.db, customer_id).await?;
    Ok(Json(payments))
}

pub async fn list_by_membership(
    State(state): State<AppState>,
    Path(membership_id): Path<i64>,
) -> Result<Json<Vec<PaymentRow>>, ApiError> {
    let payments = PaymentService::by_membership(&state.db, membership_id).await?;
    Ok(Json(payments))
}

pub async fn list_by_method(
    State(state): State<AppState>,
    Path(method): Path<PaymentMethod>,
) -> Result<Json<Vec<PaymentRow>>, ApiError> {
    let payments = PaymentService::by_method(&state.db, method).await?;
    Ok(Json(payments))
}

pub async fn list_by_settled(
    State(state): State<AppState>,
    Path(settled): Path<String>,
) -> Result<Json<Vec<PaymentRow>>, ApiError> {
    let settled = match settled.as_str() {
        "1" => true,
        "0" => false,
        _ => {
            return Err(ApiError::Validation(
                "settled flag must be 0 or 1".into(),
            ))
        }
    };
    let payments = PaymentService::by_settled(&state.db, settled).await?;
    Ok(Json(payments))
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(body): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    validate_amount(body.amount)?;
    let payment = PaymentService::create(&state.db, &body).await?;
    PAYMENTS_COUNTER.inc();
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePaymentRequest>,
) -> Result<Json<Payment>, ApiError> {
    if let Some(amount) = body.amount {
        validate_amount(amount)?;
    }
    let payment = PaymentService::update(&state.db, id, &body).await?;
    Ok(Json(payment))
}

pub async fn settle_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<SettlePaymentRequest>,
) -> Result<Json<Payment>, ApiError> {
    let payment = PaymentService::set_settled(&state.db, id, body.is_settled).await?;
    Ok(Json(payment))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    PaymentService::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Payment deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_must_be_positive() {
        assert!(validate_amount(1200.0).is_ok());
        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-1.0).is_err());
    }
}
