//! Unified error codes for the payment terminal service
//!
//! Error codes are shared between the server and the dashboard frontend.
//! They are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Quota errors
//! - 3xxx: Merchant errors
//! - 4xxx: Payment errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
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

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Session has expired
    SessionExpired = 1003,

    // ==================== 2xxx: Quota ====================
    /// Too many requests inside the rolling window
    RateLimited = 2001,
    /// Daily cumulative amount ceiling reached
    DailyLimitExceeded = 2002,

    // ==================== 3xxx: Merchant ====================
    /// Merchant not found
    MerchantNotFound = 3001,
    /// Email already registered
    EmailAlreadyRegistered = 3002,
    /// Merchant settings not found
    SettingsNotFound = 3003,
    /// Bank account not found
    BankAccountNotFound = 3004,
    /// Saved customer not found
    CustomerNotFound = 3005,
    /// Merchant has no linked processor account
    ProcessorNotLinked = 3006,

    // ==================== 4xxx: Payment ====================
    /// Amount below the currency minimum
    AmountBelowMinimum = 4001,
    /// Amount above the per-transaction maximum
    AmountAboveMaximum = 4002,
    /// Payment session not found
    PaymentSessionNotFound = 4003,
    /// Payment processor returned an error
    ProcessorError = 4004,
    /// Webhook payload or signature invalid
    WebhookInvalid = 4005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Configuration error
    ConfigError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
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

            // Auth
            ErrorCode::NotAuthenticated => "Please login first",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::SessionExpired => "Session has expired",

            // Quota
            ErrorCode::RateLimited => "Too many requests. Please wait a moment and try again.",
            ErrorCode::DailyLimitExceeded => {
                "Daily transaction limit reached. Please try again tomorrow."
            }

            // Merchant
            ErrorCode::MerchantNotFound => "Merchant not found",
            ErrorCode::EmailAlreadyRegistered => "Merchant already exists with this email",
            ErrorCode::SettingsNotFound => "Merchant settings not found",
            ErrorCode::BankAccountNotFound => "Bank account not found",
            ErrorCode::CustomerNotFound => "No saved card found for this customer",
            ErrorCode::ProcessorNotLinked => "No payment processor account is linked",

            // Payment
            ErrorCode::AmountBelowMinimum => "Amount is below the minimum for this currency",
            ErrorCode::AmountAboveMaximum => "Amount exceeds the per-transaction maximum",
            ErrorCode::PaymentSessionNotFound => "Payment session not found",
            ErrorCode::ProcessorError => "Payment processor request failed",
            ErrorCode::WebhookInvalid => "Webhook verification failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unrecognized u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,
            7 => Self::RequiredField,
            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::SessionExpired,
            2001 => Self::RateLimited,
            2002 => Self::DailyLimitExceeded,
            3001 => Self::MerchantNotFound,
            3002 => Self::EmailAlreadyRegistered,
            3003 => Self::SettingsNotFound,
            3004 => Self::BankAccountNotFound,
            3005 => Self::CustomerNotFound,
            3006 => Self::ProcessorNotLinked,
            4001 => Self::AmountBelowMinimum,
            4002 => Self::AmountAboveMaximum,
            4003 => Self::PaymentSessionNotFound,
            4004 => Self::ProcessorError,
            4005 => Self::WebhookInvalid,
            9001 => Self::InternalError,
            9002 => Self::ConfigError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
