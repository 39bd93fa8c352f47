use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use sqlx::error::ErrorKind;

/// Error taxonomy for the whole API. Services return these directly and
/// handlers propagate with `?`; the status mapping below decides the wire
/// shape. The response body is `{error, timestamp}`; the error-context
/// layer appends `path` and `method` on the way out.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    #[error("database is busy, please retry")]
    StoreBusy,

    #[error("database error")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return ApiError::NotFound("record");
        }
        if let sqlx::Error::Database(db) = &err {
            match db.kind() {
                ErrorKind::UniqueViolation => {
                    return ApiError::Conflict(db.message().to_string());
                }
                ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    return ApiError::Validation(db.message().to_string());
                }
                _ => {}
            }
            // SQLITE_BUSY / SQLITE_LOCKED and their extended codes
            if matches!(db.code().as_deref(), Some("5" | "6" | "261" | "517")) {
                return ApiError::StoreBusy;
            }
        }
        ApiError::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::DataIntegrity(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::StoreBusy => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            ApiError::DataIntegrity(detail) => {
                tracing::error!("data integrity violation: {detail}");
            }
            ApiError::Database(err) => {
                tracing::error!("database error: {err}");
            }
            _ => {}
        }

        let body = json!({
            "error": self.to_string(),
            "timestamp": Utc::now().to_rfc3339(),
        });
        (status, Json(body)).into_response()
    }
}
