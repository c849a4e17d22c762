//! Unified error codes for the Store Menu platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account lifecycle errors (registration, OTP, credentials)
//! - 4xxx: Menu errors (restaurants, categories, items, public gate)
//! - 5xxx: Upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the dashboard and the
/// public menu viewer can branch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// HTTP method not supported on this route
    MethodNotAllowed = 9,
    /// Too many requests from the same client
    TooManyRequests = 10,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Registration still waiting for email verification
    AccountPendingOtp = 1010,
    /// Registration waiting for admin approval
    AccountPendingApproval = 1011,
    /// Registration rejected by admin
    AccountRejected = 1012,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Owner token carries no restaurant
    RestaurantScopeMissing = 2010,

    // ==================== 3xxx: Account ====================
    /// Email already registered by a merchant
    EmailAlreadyRegistered = 3001,
    /// Menu slug already taken
    SlugTaken = 3002,
    /// Merchant account not found
    AccountNotFound = 3003,
    /// OTP is not pending for this account
    OtpNotPending = 3004,
    /// OTP does not match
    OtpInvalid = 3005,
    /// OTP has expired
    OtpExpired = 3006,
    /// Password too short
    PasswordTooShort = 3007,
    /// Invalid account status value
    InvalidStatus = 3008,
    /// Invalid email template variant
    InvalidEmailTemplate = 3009,
    /// Email used by another account (either role)
    EmailInUse = 3010,
    /// Neither email nor password supplied
    NothingToUpdate = 3011,
    /// No OTP has been issued for this account
    NoOtpIssued = 3012,
    /// Admin account not found
    AdminNotFound = 3013,

    // ==================== 4xxx: Menu ====================
    /// Restaurant not found
    RestaurantNotFound = 4001,
    /// Menu is disabled
    MenuDisabled = 4002,
    /// Access window has not started yet
    MenuNotYetActive = 4003,
    /// Access window has ended
    MenuExpired = 4004,
    /// Access window value cannot be parsed or is inverted
    InvalidAccessWindow = 4005,
    /// Category not found
    CategoryNotFound = 4101,
    /// Item not found
    ItemNotFound = 4201,

    // ==================== 5xxx: Upload ====================
    /// File too large
    FileTooLarge = 5001,
    /// Unsupported file format
    UnsupportedFileFormat = 5002,
    /// No file provided in request
    NoFileProvided = 5003,
    /// Empty file provided
    EmptyFile = 5004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// File storage failed
    FileStorageFailed = 9401,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether this is the success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::MethodNotAllowed => "Method not allowed",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountPendingOtp => "Your registration is still pending email verification.",
            ErrorCode::AccountPendingApproval => {
                "Your registration is under review. Approval takes 12 to 24 hours."
            }
            ErrorCode::AccountRejected => "Your registration was rejected by admin.",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::RestaurantScopeMissing => "Restaurant scope missing",

            // Account
            ErrorCode::EmailAlreadyRegistered => {
                "This email is already registered and cannot submit another request."
            }
            ErrorCode::SlugTaken => "This business name is already registered.",
            ErrorCode::AccountNotFound => "Account not found",
            ErrorCode::OtpNotPending => "OTP is already verified or account is not eligible.",
            ErrorCode::OtpInvalid => "Invalid OTP",
            ErrorCode::OtpExpired => "OTP expired. Please request a new OTP.",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",
            ErrorCode::InvalidStatus => "Invalid status",
            ErrorCode::InvalidEmailTemplate => "Invalid email template",
            ErrorCode::EmailInUse => "Email is already in use",
            ErrorCode::NothingToUpdate => "Nothing to update",
            ErrorCode::NoOtpIssued => "No valid OTP found. Please request a new OTP.",
            ErrorCode::AdminNotFound => "Admin not found",

            // Menu
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::MenuDisabled => "This menu is currently unavailable.",
            ErrorCode::MenuNotYetActive => "This menu is not active yet.",
            ErrorCode::MenuExpired => "This menu subscription has expired.",
            ErrorCode::InvalidAccessWindow => "Invalid access window",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::ItemNotFound => "Item not found",

            // Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::FileStorageFailed => "Failed to store file",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            9 => Ok(ErrorCode::MethodNotAllowed),
            10 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1010 => Ok(ErrorCode::AccountPendingOtp),
            1011 => Ok(ErrorCode::AccountPendingApproval),
            1012 => Ok(ErrorCode::AccountRejected),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2010 => Ok(ErrorCode::RestaurantScopeMissing),

            // Account
            3001 => Ok(ErrorCode::EmailAlreadyRegistered),
            3002 => Ok(ErrorCode::SlugTaken),
            3003 => Ok(ErrorCode::AccountNotFound),
            3004 => Ok(ErrorCode::OtpNotPending),
            3005 => Ok(ErrorCode::OtpInvalid),
            3006 => Ok(ErrorCode::OtpExpired),
            3007 => Ok(ErrorCode::PasswordTooShort),
            3008 => Ok(ErrorCode::InvalidStatus),
            3009 => Ok(ErrorCode::InvalidEmailTemplate),
            3010 => Ok(ErrorCode::EmailInUse),
            3011 => Ok(ErrorCode::NothingToUpdate),
            3012 => Ok(ErrorCode::NoOtpIssued),
            3013 => Ok(ErrorCode::AdminNotFound),

            // Menu
            4001 => Ok(ErrorCode::RestaurantNotFound),
            4002 => Ok(ErrorCode::MenuDisabled),
            4003 => Ok(ErrorCode::MenuNotYetActive),
            4004 => Ok(ErrorCode::MenuExpired),
            4005 => Ok(ErrorCode::InvalidAccessWindow),
            4101 => Ok(ErrorCode::CategoryNotFound),
            4201 => Ok(ErrorCode::ItemNotFound),

            // Upload
            5001 => Ok(ErrorCode::FileTooLarge),
            5002 => Ok(ErrorCode::UnsupportedFileFormat),
            5003 => Ok(ErrorCode::NoFileProvided),
            5004 => Ok(ErrorCode::EmptyFile),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9401 => Ok(ErrorCode::FileStorageFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[ErrorCode] = &[
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::InvalidRequest,
        ErrorCode::InvalidFormat,
        ErrorCode::RequiredField,
        ErrorCode::MethodNotAllowed,
        ErrorCode::TooManyRequests,
        ErrorCode::NotAuthenticated,
        ErrorCode::InvalidCredentials,
        ErrorCode::TokenExpired,
        ErrorCode::TokenInvalid,
        ErrorCode::AccountPendingOtp,
        ErrorCode::AccountPendingApproval,
        ErrorCode::AccountRejected,
        ErrorCode::PermissionDenied,
        ErrorCode::AdminRequired,
        ErrorCode::RestaurantScopeMissing,
        ErrorCode::EmailAlreadyRegistered,
        ErrorCode::SlugTaken,
        ErrorCode::AccountNotFound,
        ErrorCode::OtpNotPending,
        ErrorCode::OtpInvalid,
        ErrorCode::OtpExpired,
        ErrorCode::PasswordTooShort,
        ErrorCode::InvalidStatus,
        ErrorCode::InvalidEmailTemplate,
        ErrorCode::EmailInUse,
        ErrorCode::NothingToUpdate,
        ErrorCode::NoOtpIssued,
        ErrorCode::AdminNotFound,
        ErrorCode::RestaurantNotFound,
        ErrorCode::MenuDisabled,
        ErrorCode::MenuNotYetActive,
        ErrorCode::MenuExpired,
        ErrorCode::InvalidAccessWindow,
        ErrorCode::CategoryNotFound,
        ErrorCode::ItemNotFound,
        ErrorCode::FileTooLarge,
        ErrorCode::UnsupportedFileFormat,
        ErrorCode::NoFileProvided,
        ErrorCode::EmptyFile,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
        ErrorCode::ConfigError,
        ErrorCode::FileStorageFailed,
    ];

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::AccountRejected.code(), 1012);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::OtpNotPending.code(), 3004);
        assert_eq!(ErrorCode::MenuExpired.code(), 4004);
        assert_eq!(ErrorCode::FileTooLarge.code(), 5001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_covers_every_code() {
        for code in ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(*code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(8), Err(InvalidErrorCode(8)));
        assert_eq!(ErrorCode::try_from(6001), Err(InvalidErrorCode(6001)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::MenuDisabled).unwrap();
        assert_eq!(json, "4002");
        let code: ErrorCode = serde_json::from_str("1011").unwrap();
        assert_eq!(code, ErrorCode::AccountPendingApproval);
        assert!(serde_json::from_str::<ErrorCode>("1234").is_err());
    }

    #[test]
    fn test_login_denials_are_distinct() {
        let msgs = [
            ErrorCode::AccountPendingOtp.message(),
            ErrorCode::AccountPendingApproval.message(),
            ErrorCode::AccountRejected.message(),
        ];
        assert_ne!(msgs[0], msgs[1]);
        assert_ne!(msgs[1], msgs[2]);
        assert_ne!(msgs[0], msgs[2]);
    }
}
