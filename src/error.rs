use thiserror::Error;

use crate::enums::Chain;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")] Validation(String),

    #[error("Failed to connect to {} network", .chain.display_name())]
    Connection {
        chain: Chain,
    },

    #[error("Failed to fetch {} balance: {reason}", .chain.display_name())]
    Fetch {
        chain: Chain,
        reason: String,
    },

    #[error("{} RPC error: {message}", .chain.display_name())]
    Rpc {
        chain: Chain,
        message: String,
    },

    #[error("Unsupported chain: {0}")] UnsupportedChain(String),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Internal error: {0}")] Internal(String),
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<Chain>,
}

impl AppError {
    pub fn fetch(chain: Chain, reason: impl Into<String>) -> Self {
        AppError::Fetch { chain, reason: reason.into() }
    }

    /// Chain the failure belongs to, if any.
    pub fn chain(&self) -> Option<Chain> {
        match self {
            | AppError::Connection { chain }
            | AppError::Fetch { chain, .. }
            | AppError::Rpc { chain, .. } => Some(*chain),
            _ => None,
        }
    }

    /// Stable machine-readable kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Connection { .. } => "CONNECTION_ERROR",
            AppError::Fetch { .. } => "FETCH_ERROR",
            AppError::Rpc { .. } => "RPC_ERROR",
            AppError::UnsupportedChain(_) => "UNSUPPORTED_CHAIN",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        let message = match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Rpc { message, .. } => message.clone(),
            other => other.to_string(),
        };

        ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
                chain: self.chain(),
            },
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::Validation(_) | AppError::UnsupportedChain(_) => {
                axum::http::StatusCode::BAD_REQUEST
            }
            AppError::Connection { .. } | AppError::Fetch { .. } | AppError::Rpc { .. } => {
                axum::http::StatusCode::BAD_GATEWAY
            }
            AppError::Config(_) | AppError::Internal(_) => {
                axum::http::StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let response = self.to_error_response();
        (status, axum::Json(response)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
