//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Tipo esperado de un campo del payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedKind {
    String,
    Int,
    Number,
}

impl fmt::Display for ExpectedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedKind::String => write!(f, "string"),
            ExpectedKind::Int => write!(f, "int"),
            ExpectedKind::Number => write!(f, "int or float"),
        }
    }
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} not in request")]
    MissingField(&'static str),

    #[error("'{field}' must be a {kind}")]
    InvalidType {
        field: &'static str,
        kind: ExpectedKind,
    },

    #[error("'{field}' must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: String,
        max: String,
    },

    #[error("'vin' must be unique")]
    DuplicateVin,

    #[error("{}", validation_message(.0))]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("sold vehicle references unknown vin '{0}'")]
    UnresolvedReference(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    /// Código HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingField(_)
            | AppError::InvalidType { .. }
            | AppError::OutOfRange { .. }
            | AppError::DuplicateVin
            | AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnresolvedReference(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Los 5xx no exponen detalles internos al cliente
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "An error occurred while accessing the database".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "An unexpected error occurred".to_string()
            }
            AppError::UnresolvedReference(_) => {
                tracing::warn!("{}", self);
                self.to_string()
            }
            _ => {
                tracing::debug!(status = status.as_u16(), "{}", self);
                self.to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Arma un mensaje legible a partir de los errores del crate `validator`
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    fields.sort_unstable();
    match fields.as_slice() {
        [] => "invalid request".to_string(),
        [field] => format!("'{}' is invalid", field),
        _ => format!("invalid fields: {}", fields.join(", ")),
    }
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::NotFound(format!("{} with {} '{}' not found", resource, field, value))
}

/// Función helper para valores del tipo correcto fuera del rango almacenable
pub fn out_of_range_error(
    field: &'static str,
    min: impl fmt::Display,
    max: impl fmt::Display,
) -> AppError {
    AppError::OutOfRange {
        field,
        min: min.to_string(),
        max: max.to_string(),
    }
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
