use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::submission::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid authorization code")]
    InvalidCode,

    #[error("Not signed in")]
    Unauthorized,

    #[error("No form in progress")]
    NoActiveForm,

    #[error("No draft awaiting confirmation")]
    NotConfirming,

    #[error("Unknown submission")]
    UnknownSubmission,

    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("Corrupt record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("PDF render error: {0}")]
    Pdf(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidCode | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NoActiveForm | AppError::NotConfirming => StatusCode::CONFLICT,
            AppError::UnknownSubmission => StatusCode::NOT_FOUND,
            AppError::Store { .. } | AppError::Decode { .. } | AppError::Pdf { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_keep_their_field_message() {
        let err = AppError::from(ValidationError::MissingFullName);
        assert_eq!(err.to_string(), "Please fill in your full name");
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::InvalidCode.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NoActiveForm.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::UnknownSubmission.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Pdf("font".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
