//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 400 Bad Request (malformed request, missing path/query ids)
            Self::InvalidRequest | Self::NoFileProvided | Self::EmptyFile => {
                StatusCode::BAD_REQUEST
            }

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::AccountPendingOtp
            | Self::AccountPendingApproval
            | Self::AccountRejected
            | Self::PermissionDenied
            | Self::AdminRequired
            | Self::RestaurantScopeMissing
            | Self::MenuDisabled
            | Self::MenuNotYetActive
            | Self::MenuExpired => StatusCode::FORBIDDEN,

            // 404 Not Found
            Self::NotFound
            | Self::AccountNotFound
            | Self::AdminNotFound
            | Self::RestaurantNotFound
            | Self::CategoryNotFound
            | Self::ItemNotFound => StatusCode::NOT_FOUND,

            // 405 Method Not Allowed
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            // 409 Conflict (duplicates and invalid state transitions)
            Self::AlreadyExists
            | Self::EmailAlreadyRegistered
            | Self::EmailInUse
            | Self::SlugTaken
            | Self::OtpNotPending => StatusCode::CONFLICT,

            // 413 Payload Too Large
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 429 Too Many Requests
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::FileStorageFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 422 Unprocessable Entity (field validation, OTP checks)
            Self::ValidationFailed
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::OtpInvalid
            | Self::OtpExpired
            | Self::PasswordTooShort
            | Self::InvalidStatus
            | Self::InvalidEmailTemplate
            | Self::NothingToUpdate
            | Self::NoOtpIssued
            | Self::InvalidAccessWindow
            | Self::UnsupportedFileFormat => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_validation_is_unprocessable() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::NothingToUpdate.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::OtpExpired.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_auth_statuses() {
        assert_eq!(
            ErrorCode::InvalidCredentials.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::AccountPendingApproval.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ErrorCode::AdminRequired.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_conflict_statuses() {
        assert_eq!(
            ErrorCode::EmailAlreadyRegistered.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ErrorCode::EmailInUse.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::OtpNotPending.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_gate_denials_differ_from_not_found() {
        assert_eq!(
            ErrorCode::RestaurantNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ErrorCode::MenuDisabled.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::MenuExpired.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_method_not_allowed() {
        assert_eq!(
            ErrorCode::MethodNotAllowed.http_status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_system_errors() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
