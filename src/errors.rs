use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

/// Unique index that allows one response per (instance, respondent).
pub const ONE_RESPONSE_PER_RESPONDENT: &str = "survey_responses_one_per_respondent";

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Session(String),
    Hash(String),
    NotFound(String),
    Unavailable(String),
    AuthenticationRequired(String),
    AlreadySubmitted,
    InvalidPayload(String),
    ValidationFailed(Vec<String>),
    PermissionDenied(String),
}

/// Structured failure body returned for every error.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
}

impl AppError {
    /// Machine-readable error code used in the JSON body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Unavailable(_) => "unavailable",
            AppError::AuthenticationRequired(_) => "authentication_required",
            AppError::AlreadySubmitted => "already_submitted",
            AppError::InvalidPayload(_) => "invalid_payload",
            AppError::ValidationFailed(_) => "validation_failed",
            AppError::PermissionDenied(_) => "permission_denied",
            AppError::Db(_) | AppError::Session(_) | AppError::Hash(_) => "internal_error",
        }
    }

    fn is_internal(&self) -> bool {
        matches!(self, AppError::Db(_) | AppError::Session(_) | AppError::Hash(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::NotFound(what) => write!(f, "{what} not found"),
            AppError::Unavailable(msg) => write!(f, "{msg}"),
            AppError::AuthenticationRequired(msg) => write!(f, "{msg}"),
            AppError::AlreadySubmitted => write!(f, "You have already responded to this survey"),
            AppError::InvalidPayload(msg) => write!(f, "Invalid payload: {msg}"),
            AppError::ValidationFailed(errors) => write!(f, "Validation failed: {}", errors.join("; ")),
            AppError::PermissionDenied(what) => write!(f, "Permission denied: {what}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unavailable(_) => StatusCode::GONE,
            AppError::AuthenticationRequired(_) => StatusCode::UNAUTHORIZED,
            AppError::AlreadySubmitted => StatusCode::CONFLICT,
            AppError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Db(_) | AppError::Session(_) | AppError::Hash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            log::error!("{self}");
            "Internal Server Error".to_string()
        } else {
            if let AppError::PermissionDenied(_) = self {
                log::warn!("{self}");
            }
            self.to_string()
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            error: self.code(),
            message,
        })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.constraint() == Some(ONE_RESPONSE_PER_RESPONDENT) {
                return AppError::AlreadySubmitted;
            }
        }
        AppError::Db(e)
    }
}

impl From<actix_session::SessionInsertError> for AppError {
    fn from(e: actix_session::SessionInsertError) -> Self {
        AppError::Session(e.to_string())
    }
}

impl From<actix_session::SessionGetError> for AppError {
    fn from(e: actix_session::SessionGetError) -> Self {
        AppError::Session(e.to_string())
    }
}
