//! Application error type rendered as HTML error pages.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use blogicum_core::error::{DomainError, RepoError};
use blogicum_core::ports::AuthError;

use crate::views;

/// Errors a handler can end in. Validation failures and ownership denials
/// are not here: they re-render a form or redirect instead.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Forbidden(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::NotFound(detail) => {
                tracing::debug!("Not found: {}", detail);
                "The page you are looking for does not exist or is not available."
            }
            AppError::BadRequest(detail) => {
                tracing::debug!("Bad request: {}", detail);
                "The request could not be processed."
            }
            AppError::Forbidden(detail) => {
                tracing::warn!("Forbidden: {}", detail);
                "The request was rejected because it did not come from this site. \
                 Reload the page and try again."
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "An internal error occurred. Please try again later."
            }
        };

        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(views::pages::error(self.status_code(), message).into_string())
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => AppError::NotFound(err.to_string()),
            DomainError::Validation(msg) | DomainError::Duplicate(msg) => {
                AppError::BadRequest(msg)
            }
            DomainError::NotOwner { .. } | DomainError::Unauthenticated => {
                AppError::Forbidden(err.to_string())
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::BadRequest(msg),
            RepoError::Connection(msg) => {
                AppError::Internal(format!("Database connection error: {msg}"))
            }
            RepoError::Query(msg) => AppError::Internal(format!("Database query error: {msg}")),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    use actix_web::body::to_bytes;

    #[test]
    fn repo_errors_map_to_statuses() {
        assert_eq!(
            AppError::from(RepoError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepoError::Query("boom".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(RepoError::Constraint("dup".to_string())).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn domain_not_found_is_404() {
        let err = AppError::from(DomainError::not_found("post", 5));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Not found: Entity not found: post 5");
    }

    #[actix_rt::test]
    async fn error_page_is_html_without_internal_detail() {
        let response = AppError::Internal("password=hunter2".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("500"));
        assert!(!body.contains("hunter2"));
    }
}
