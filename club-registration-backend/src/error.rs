use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use club_registration_config::ConfigError;
use club_registration_database::DatabaseError;
use serde::Serialize;

use crate::capacity::CapacityError;
use crate::registration::RegistrationError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    File(#[from] std::io::Error),
    #[error("invalid request body: {0}")]
    BadRequest(#[from] JsonRejection),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error("no student with id {0}")]
    StudentNotFound(String),
    #[error("no club with id {0}")]
    ClubNotFound(String),
    #[error("no route for {method} {path}")]
    NotFound { method: String, path: String },
    #[error("the request handler panicked")]
    Panicked,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: &'a str,
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Registration(error) => match error {
                RegistrationError::StudentNotFound(_) | RegistrationError::ClubNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                RegistrationError::IdentityMismatch => StatusCode::FORBIDDEN,
                RegistrationError::AlreadyRegistered(_)
                | RegistrationError::GradeNotAllowed { .. }
                | RegistrationError::ClubFull(_)
                | RegistrationError::QuotaExhausted
                | RegistrationError::NotRegistered => StatusCode::CONFLICT,
                RegistrationError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Capacity(error) => match error {
                CapacityError::ClubNotFound(_) => StatusCode::NOT_FOUND,
                CapacityError::InvalidCapacity(_) => StatusCode::BAD_REQUEST,
                CapacityError::CapacityBelowEnrollment { .. } => StatusCode::CONFLICT,
                CapacityError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::StudentNotFound(_) | Self::ClubNotFound(_) | Self::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            Self::File(_) | Self::Config(_) | Self::Database(_) | Self::Panicked => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The `error` field of the response body.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Registration(error) => error.kind(),
            Self::Capacity(error) => error.kind(),
            Self::BadRequest(_) => "bad_request",
            Self::StudentNotFound(_) => "student_not_found",
            Self::ClubNotFound(_) => "club_not_found",
            Self::NotFound { .. } => "not_found",
            Self::Database(_) => "database",
            Self::File(_) | Self::Config(_) | Self::Panicked => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(%message, "request failed");
        } else {
            tracing::debug!(kind = self.kind(), %message, "request refused");
        }
        let body = ErrorBody {
            error: self.kind(),
            message: &message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header;

    use super::*;

    #[test]
    fn refusals_keep_their_kind() {
        let error = AppError::from(RegistrationError::ClubFull("C003".to_owned()));
        assert_eq!(error.status(), StatusCode::CONFLICT);
        assert_eq!(error.kind(), "club_full");

        let error = AppError::from(RegistrationError::IdentityMismatch);
        assert_eq!(error.status(), StatusCode::FORBIDDEN);

        let error = AppError::from(CapacityError::InvalidCapacity(0));
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.kind(), "invalid_capacity");

        let error = AppError::Panicked;
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.kind(), "internal");
    }

    #[test]
    fn response_body_is_json() {
        let response = AppError::StudentNotFound("S404".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            mime::APPLICATION_JSON.as_ref()
        );
    }
}
