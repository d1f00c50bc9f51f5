use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

use crate::db::StoreError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    InternalServerError(String),
    DatabaseError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(ErrorResponse { message: msg.clone() }),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(ErrorResponse { message: msg.clone() }),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(ErrorResponse { message: msg.clone() }),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(ErrorResponse { message: msg.clone() }),
            // Storage details stay in the logs.
            AppError::DatabaseError(_) => HttpResponse::InternalServerError().json(ErrorResponse {
                message: "Internal server error".to_string(),
            }),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(collection) => {
                log::warn!("Unique key rejected a write to {}", collection);
                AppError::Conflict(format!("Duplicate entry in {}", collection))
            }
            StoreError::Serialization(err) => {
                log::error!("Malformed stored document: {:?}", err);
                AppError::InternalServerError("Malformed document".to_string())
            }
            other => {
                log::error!("Database error: {:?}", other);
                AppError::DatabaseError(other.to_string())
            }
        }
    }
}
