//! Sistema de manejo de errores
//!
//! Este módulo define la taxonomía de errores de la aplicación
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::repositories::StoreError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid user state: {0}")]
    InvalidUserState(String),

    #[error("Invalid address state: {0}")]
    InvalidAddressState(String),

    #[error("Invalid phone state: {0}")]
    InvalidPhoneState(String),

    #[error("CPF conflict: {0}")]
    CpfConflict(String),

    #[error("Existing address: {0}")]
    ConflictExistingAddress(String),

    #[error("Illegal operation: {0}")]
    IllegalOperation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidUserState(_)
            | AppError::InvalidAddressState(_)
            | AppError::InvalidPhoneState(_)
            | AppError::CpfConflict(_)
            | AppError::ConflictExistingAddress(_)
            | AppError::IllegalOperation(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound(NOT_FOUND.to_string()),
            other => AppError::Store(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // El cuerpo de los 4xx es un texto corto, sin envoltorio
        let body = match self {
            AppError::Store(e) => {
                error!("❌ Error de persistencia: {}", e);
                "Error interno al acceder a los datos".to_string()
            }
            AppError::Internal(msg) => {
                error!("❌ Error interno: {}", msg);
                "Error interno inesperado".to_string()
            }
            AppError::NotFound(msg)
            | AppError::InvalidUserState(msg)
            | AppError::InvalidAddressState(msg)
            | AppError::InvalidPhoneState(msg)
            | AppError::CpfConflict(msg)
            | AppError::ConflictExistingAddress(msg)
            | AppError::IllegalOperation(msg)
            | AppError::BadRequest(msg) => {
                warn!("⚠️ {} - {}", status, msg);
                msg
            }
        };

        (status, body).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

pub const NOT_FOUND: &str = "Recurso inexistente";
pub const USER_NOT_FOUND: &str = "Usuario(s) inexistente(s)";
pub const ADDRESS_NOT_FOUND: &str = "Usuario o dirección inexistente";
pub const PHONE_NOT_FOUND: &str = "Usuario o teléfono(s) inexistente(s)";
pub const USER_CPF: &str = "El usuario ya posee un CPF registrado";
pub const EXISTING_ADDRESS: &str = "El usuario ya posee una dirección registrada";
pub const DUPLICATED_PHONE: &str = "Número de teléfono duplicado";
pub const INVALID_USER: &str = "Datos de usuario incompletos o inválidos";
pub const INVALID_ADDRESS: &str = "Datos de dirección incompletos o inválidos";
pub const INVALID_PHONE: &str = "Datos de teléfono incompletos o inválidos";
