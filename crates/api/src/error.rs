//! HTTP error type and its JSON rendering: `{ "error": ..., "code": ... }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gestora_core::error::CoreError;
use serde::Serialize;

/// Error returned by every handler and extractor.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A resource addressed by something other than a numeric id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Logged in full; the client only sees a generic message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<String> for AppError {
    /// Core validation helpers return `Result<(), String>`.
    fn from(msg: String) -> Self {
        AppError::Core(CoreError::Validation(msg))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

type Described = (StatusCode, &'static str, String);

impl AppError {
    /// Status, machine-readable code and client-facing message.
    fn describe(&self) -> Described {
        match self {
            AppError::Core(core) => describe_core(core),
            AppError::Database(err) => describe_sqlx(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.describe();
        (status, Json(ErrorBody { error, code })).into_response()
    }
}

fn describe_core(err: &CoreError) -> Described {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Duplicate(msg) => (StatusCode::BAD_REQUEST, "DUPLICATE", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => internal(msg),
    }
}

/// Unique violations are client mistakes (400 `DUPLICATE`); a foreign key
/// violation means the row is still in use (409). Anything else is logged
/// and hidden behind a 500.
fn describe_sqlx(err: &sqlx::Error) -> Described {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => (
            StatusCode::BAD_REQUEST,
            "DUPLICATE",
            format!("Duplicate value: {}", unique_target(db_err.message())),
        ),
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => (
            StatusCode::CONFLICT,
            "CONFLICT",
            "The record is referenced by or references another record".to_string(),
        ),
        other => internal(&other.to_string()),
    }
}

fn internal(detail: &str) -> Described {
    tracing::error!(error = %detail, "Request failed with an internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// SQLite reports unique violations as `UNIQUE constraint failed: t.col[, t.col]`.
/// Keep the column list, dropping the tenant scope column.
fn unique_target(message: &str) -> String {
    let columns = message
        .split_once(':')
        .map(|(_, cols)| cols)
        .unwrap_or(message);
    let fields: Vec<&str> = columns
        .split(',')
        .map(|c| c.trim())
        .map(|c| c.rsplit_once('.').map(|(_, col)| col).unwrap_or(c))
        .filter(|c| *c != "tenant_id" && !c.is_empty())
        .collect();
    if fields.is_empty() {
        "a record with the same values already exists".to_string()
    } else {
        format!("{} already exists", fields.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_target_keeps_business_columns() {
        assert_eq!(
            unique_target("UNIQUE constraint failed: preparation_zones.tenant_id, preparation_zones.name"),
            "name already exists"
        );
        assert_eq!(
            unique_target("UNIQUE constraint failed: price_list_items.price_list_id, price_list_items.product_code"),
            "price_list_id, product_code already exists"
        );
    }

    #[test]
    fn duplicate_maps_to_bad_request() {
        let resp = AppError::Core(CoreError::Duplicate("code".into())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = AppError::Core(CoreError::not_found("Supplier", 9)).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_errors_are_sanitised() {
        let resp = AppError::InternalError("secret detail".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
