use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),
    DuplicateEmail(String),
    InvalidCredentials,
    TokenInvalid,
    TokenExpired,
    Forbidden(String),
    NotFound(String),
    VendorProfileNotFound,
    InvalidStatus(String),
    DatabaseError(mongodb::error::Error),
    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::DuplicateEmail(email) => {
                write!(f, "User already exists with email {}", email)
            }
            ApiError::InvalidCredentials => write!(f, "Invalid email or password"),
            ApiError::TokenInvalid => write!(f, "Invalid authentication token"),
            ApiError::TokenExpired => write!(f, "Authentication token has expired"),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::VendorProfileNotFound => write!(f, "Vendor profile not found"),
            ApiError::InvalidStatus(status) => write!(f, "Invalid order status: {}", status),
            ApiError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::DuplicateEmail(_) => "DUPLICATE_EMAIL",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::TokenInvalid => "TOKEN_INVALID",
            ApiError::TokenExpired => "TOKEN_EXPIRED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::VendorProfileNotFound => "VENDOR_PROFILE_NOT_FOUND",
            ApiError::InvalidStatus(_) => "INVALID_STATUS",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::ValidationError(_)
            | ApiError::DuplicateEmail(_)
            | ApiError::InvalidCredentials
            | ApiError::InvalidStatus(_) => HttpResponse::BadRequest().json(ErrorResponse {
                code: self.code().to_string(),
                message: self.to_string(),
            }),
            ApiError::TokenInvalid | ApiError::TokenExpired => {
                HttpResponse::Unauthorized().json(ErrorResponse {
                    code: self.code().to_string(),
                    message: self.to_string(),
                })
            }
            ApiError::Forbidden(_) => HttpResponse::Forbidden().json(ErrorResponse {
                code: self.code().to_string(),
                message: self.to_string(),
            }),
            ApiError::NotFound(_) | ApiError::VendorProfileNotFound => {
                HttpResponse::NotFound().json(ErrorResponse {
                    code: self.code().to_string(),
                    message: self.to_string(),
                })
            }
            ApiError::DatabaseError(_) => {
                // Never leak driver internals to the client
                HttpResponse::InternalServerError().json(ErrorResponse {
                    code: self.code().to_string(),
                    message: "Internal server error".to_string(),
                })
            }
            ApiError::InternalError(_) => HttpResponse::InternalServerError().json(ErrorResponse {
                code: self.code().to_string(),
                message: self.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn request_errors_map_to_400() {
        for err in [
            ApiError::ValidationError("price must be >= 0".into()),
            ApiError::DuplicateEmail("ada@x.com".into()),
            ApiError::InvalidCredentials,
            ApiError::InvalidStatus("shipped".into()),
        ] {
            assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn token_errors_map_to_401() {
        assert_eq!(
            ApiError::TokenInvalid.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::TokenExpired.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn role_and_ownership_errors_map_to_403_and_404() {
        assert_eq!(
            ApiError::Forbidden("vendor role required".into())
                .error_response()
                .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("Product not found".into())
                .error_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::VendorProfileNotFound.error_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn invalid_credentials_message_is_generic() {
        // Unknown email and wrong password must be indistinguishable
        assert_eq!(
            ApiError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }
}
