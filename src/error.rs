use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("This username is already taken")]
    UsernameTaken,

    #[error("This email is already registered")]
    EmailTaken,

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Business with ID {0} does not exist")]
    BusinessNotFound(i64),

    #[error("User with ID {0} does not exist")]
    UserNotFound(i64),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::UsernameTaken | AppError::EmailTaken => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::BusinessNotFound(_) | AppError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AppError::CorruptRecord(_) | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Storage details stay in the logs.
        let detail = match self {
            AppError::CorruptRecord(_) | AppError::Database(_) => {
                tracing::error!("[API] {}", self);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "detail": detail }))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value '{value}': {reason}")]
    InvalidVar {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed lexicon: {0}")]
    Lexicon(#[from] toml::de::Error),
}
