//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del motor de órdenes
//! de trabajo y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No active pause for this work order")]
    NoActivePause,

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                eprintln!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                eprintln!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::InvalidTransition { from, to } => {
                eprintln!("Invalid transition: {} -> {}", from, to);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Invalid Transition".to_string(),
                        message: format!("Cannot transition work order from '{}' to '{}'", from, to),
                        details: Some(json!({ "from": from, "to": to })),
                        code: Some("INVALID_TRANSITION".to_string()),
                    },
                )
            }

            AppError::InsufficientStock { requested, available } => {
                eprintln!("Insufficient stock: requested {}, available {}", requested, available);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Insufficient Stock".to_string(),
                        message: "The requested quantity exceeds the available stock".to_string(),
                        details: Some(json!({ "requested": requested, "available": available })),
                        code: Some("INSUFFICIENT_STOCK".to_string()),
                    },
                )
            }

            AppError::AuthorizationDenied(msg) => {
                eprintln!("Authorization denied: {}", msg);
                (
                    StatusCode::FORBIDDEN,
                    ErrorResponse {
                        error: "Forbidden".to_string(),
                        message: msg,
                        details: None,
                        code: Some("FORBIDDEN".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                eprintln!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::NoActivePause => {
                eprintln!("No active pause");
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "No Active Pause".to_string(),
                        message: "The work order has no active pause to resume from".to_string(),
                        details: None,
                        code: Some("NO_ACTIVE_PAUSE".to_string()),
                    },
                )
            }

            AppError::InvariantViolation(msg) => {
                eprintln!("Invariant violation: {}", msg);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse {
                        error: "Invariant Violation".to_string(),
                        message: msg,
                        details: None,
                        code: Some("INVARIANT_VIOLATION".to_string()),
                    },
                )
            }

            AppError::Conflict(msg) => {
                eprintln!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: None,
                        code: Some("CONFLICT".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                eprintln!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                eprintln!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de acceso prohibido
pub fn forbidden_error(operation: &str, role: &str) -> AppError {
    AppError::AuthorizationDenied(format!("Role '{}' cannot {}", role, operation))
}

/// Función helper para crear errores de invariante
pub fn invariant_error(message: &str) -> AppError {
    AppError::InvariantViolation(message.to_string())
}
