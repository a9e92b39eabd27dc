//! Error to HTTP response mapping
//!
//! Every failure leaves the API as an `ErrorResponse` JSON body. Retryable
//! failures carry `"retryable": true` in `details`.

use actix_web::{
    http::{header, StatusCode},
    web::JsonConfig,
    HttpResponse, ResponseError,
};
use tracing::{error, warn};
use validator::ValidationErrors;

use cc_core::errors::{AuthError, DomainError, ValidationError};
use cc_shared::errors::{error_codes, ErrorResponse};

/// Errors returned by route handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request body failed `validator` rules
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ValidationErrors),

    /// The core call did not finish within the request timeout
    #[error("Request timed out")]
    Timeout,
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::Domain(error.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(error) => domain_status(error),
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            ApiError::Domain(error) => domain_body(error),
            ApiError::InvalidRequest(errors) => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data")
                    .add_detail("fields", field_messages(errors))
            }
            ApiError::Timeout => {
                ErrorResponse::new(error_codes::TIMEOUT, "The request took too long, please retry")
                    .add_detail("retryable", true)
            }
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let mut response = HttpResponse::build(status);
        if let ApiError::Domain(DomainError::RateLimited { retry_after_secs }) = self {
            response.insert_header((header::RETRY_AFTER, retry_after_secs.to_string()));
        }
        response.json(body)
    }
}

fn domain_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } | DomainError::ValidationErr(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Store { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Dispatch { .. } => StatusCode::BAD_GATEWAY,
        DomainError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Auth(auth) => match auth {
            AuthError::AccountAlreadyExists => StatusCode::CONFLICT,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::AccountNotActivated | AuthError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
        },
    }
}

fn domain_body(error: &DomainError) -> ErrorResponse {
    match error {
        DomainError::ValidationErr(validation) => {
            let code = match validation {
                ValidationError::InvalidIdentifier => error_codes::IDENTIFIER_INVALID,
                ValidationError::InvalidCode { .. } => error_codes::VERIFICATION_CODE_INVALID,
                _ => error_codes::VALIDATION_ERROR,
            };
            let response = ErrorResponse::new(code, validation.to_string());
            match validation.field() {
                Some(field) => response.add_detail("field", field),
                None => response,
            }
        }
        DomainError::Validation { message } => {
            ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
        }
        DomainError::NotFound { .. } => {
            ErrorResponse::new(error_codes::NOT_FOUND, error.to_string())
        }
        DomainError::Store { .. } => ErrorResponse::new(
            error_codes::STORE_UNAVAILABLE,
            "Service temporarily unavailable, please retry",
        )
        .add_detail("retryable", true),
        DomainError::Dispatch { .. } => ErrorResponse::new(
            error_codes::DELIVERY_FAILED,
            "The code could not be delivered, please retry",
        )
        .add_detail("retryable", true),
        DomainError::RateLimited { retry_after_secs } => {
            ErrorResponse::new(error_codes::RATE_LIMIT_EXCEEDED, error.to_string())
                .add_detail("retryable", true)
                .add_detail("retry_after_secs", retry_after_secs)
        }
        DomainError::Internal { .. } => {
            ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
        }
        DomainError::Auth(auth) => {
            let code = match auth {
                AuthError::AccountAlreadyExists => error_codes::CONFLICT,
                AuthError::AccountNotFound => error_codes::NOT_FOUND,
                AuthError::AccountNotActivated => error_codes::ACCOUNT_NOT_ACTIVATED,
                AuthError::InvalidCredentials => error_codes::UNAUTHORIZED,
            };
            ErrorResponse::new(code, auth.to_string())
        }
    }
}

fn field_messages(errors: &ValidationErrors) -> serde_json::Value {
    let fields: serde_json::Map<String, serde_json::Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), serde_json::json!(messages))
        })
        .collect();
    serde_json::Value::Object(fields)
}

/// Malformed JSON bodies become 400 `ErrorResponse`s instead of plain text
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _req| {
        let body = ErrorResponse::new(error_codes::VALIDATION_ERROR, err.to_string());
        actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
            .into()
    })
}

/// JSON 404 for unknown routes
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (ValidationError::InvalidIdentifier.into(), StatusCode::BAD_REQUEST),
            (DomainError::RateLimited { retry_after_secs: 30 }, StatusCode::TOO_MANY_REQUESTS),
            (DomainError::store("down"), StatusCode::SERVICE_UNAVAILABLE),
            (
                DomainError::Dispatch { message: "smtp".to_string() },
                StatusCode::BAD_GATEWAY,
            ),
            (AuthError::InvalidCredentials.into(), StatusCode::UNAUTHORIZED),
            (AuthError::AccountNotActivated.into(), StatusCode::UNAUTHORIZED),
            (AuthError::AccountAlreadyExists.into(), StatusCode::CONFLICT),
            (AuthError::AccountNotFound.into(), StatusCode::NOT_FOUND),
            (
                DomainError::Internal { message: "bug".to_string() },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status_code(), expected);
        }
        assert_eq!(ApiError::Timeout.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response =
            ApiError::from(DomainError::RateLimited { retry_after_secs: 42 }).error_response();
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "42");
    }

    #[test]
    fn test_internal_message_is_not_leaked() {
        let body = domain_body(&DomainError::Internal {
            message: "bcrypt exploded".to_string(),
        });
        assert!(!body.message.contains("bcrypt"));
    }

    #[test]
    fn test_validation_error_codes() {
        let body = domain_body(&ValidationError::InvalidCode { length: 6 }.into());
        assert_eq!(body.error, error_codes::VERIFICATION_CODE_INVALID);

        let missing = ValidationError::RequiredField {
            field: "identifier".to_string(),
        };
        let body = domain_body(&missing.into());
        assert_eq!(body.error, error_codes::VALIDATION_ERROR);
        assert_eq!(body.details.unwrap()["field"], "identifier");
    }
}
