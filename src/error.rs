//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure that can cross the HTTP boundary is funnelled through it, so the
//! set of statuses and messages a client can observe stays small and uniform.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert application
//! errors into JSON bodies of the form `{"message": "..."}`. Server-side failures
//! are logged with their detail and reported to the caller only as "Server error".
//! `From` implementations cover `sqlx::Error`, `bcrypt::BcryptError`,
//! `TokenError` and `BlockingError`, allowing for easy conversion using `?`.

use actix_web::{error::BlockingError, error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;

use crate::auth::token::TokenError;

/// Message returned for every rejected bearer token, whatever the cause.
pub const NOT_AUTHORIZED: &str = "Not authorized";

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

const SERVER_ERROR: &str = "Server error";

/// Represents all possible errors that can occur within the application.
///
/// Each variant corresponds to one HTTP status. Variants carrying a message for
/// 4xx statuses expose that message to the client; the 5xx variants keep their
/// message for the server log only.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input (HTTP 400).
    BadRequest(String),
    /// Bad credentials or a missing/invalid/expired token (HTTP 401).
    Unauthorized(String),
    /// Authenticated, but the identity lacks the required role (HTTP 403).
    Forbidden(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// The resource already exists, e.g. a duplicate email (HTTP 409).
    Conflict(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// An error originating from database operations (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.as_str(),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                SERVER_ERROR
            }
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Unique-constraint violations become `Conflict`, `RowNotFound` becomes
/// `NotFound`, anything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("User already exists".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Every token failure maps to the same 401 so callers cannot tell
/// a forged token from an expired one.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        log::debug!("Rejected bearer token: {}", error);
        AppError::Unauthorized(NOT_AUTHORIZED.into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}

impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(format!("Blocking task failed: {}", error))
    }
}
