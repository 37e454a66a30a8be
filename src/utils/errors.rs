use std::error::Error;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::{bson, error::Error as MongoError};
use serde::Serialize;
use thiserror::Error;
use bson::ser::Error as BsonError;
use bson::de::Error as BsonDeError;

/// Where a rejected value came from.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
    Params,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error(transparent)]
    MongoError(#[from] MongoError),

    #[error("Serialization error")]
    SerializationError(#[from] BsonError),

    #[error("Deserialization error")]
    DeserializationError(#[from] BsonDeError)
}

impl ApiError {
    pub fn field(location: Location, field: &str, message: &str) -> Self {
        ApiError::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
            location,
            value: None,
        }])
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(errors) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "errors": errors
                }))
            },
            ApiError::InternalServerError(message) => {
                log::error!("Internal server error: {}", message);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": message,
                    "code": 500
                }))
            },
            ApiError::MongoError(message) => {
                log::error!("Database error: {}", message);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": format!("Database error: {}", message),
                    "code": 500,
                    "details": message.source().map(|src| src.to_string())
                }))
            },
            ApiError::SerializationError(message) => {
                log::error!("Failed to encode document: {}", message);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Invalid data format",
                    "code": 500,
                    "details": message.source().map(|src| src.to_string())
                }))
            },
            ApiError::DeserializationError(message) => {
                log::error!("Failed to decode document: {}", message);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Invalid data format",
                    "code": 500,
                    "details": message.source().map(|src| src.to_string())
                }))
            }
        }
    }
}

// ----------------------------- TESTS --------------------------------
