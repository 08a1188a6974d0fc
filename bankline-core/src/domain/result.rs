//! Result and error types for the core library

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an account refused a deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnavailableReason {
    Inactive,
    Locked,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::Inactive => write!(f, "inactive"),
            UnavailableReason::Locked => write!(f, "locked"),
        }
    }
}

fn state_label(active: &bool) -> &'static str {
    if *active {
        "ACTIVE"
    } else {
        "INACTIVE"
    }
}

/// Core library error type
///
/// Every lifecycle operation fails with exactly one of these kinds. The
/// request layer turns them into an [`ApiResponse`] via [`Error::code`]
/// and [`Error::status`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Account not found with id: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidAmount(String),

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Account is {0}")]
    AccountUnavailable(UnavailableReason),

    #[error("Account is already locked.")]
    AlreadyLocked,

    #[error("Account is already unlocked.")]
    AlreadyUnlocked,

    #[error("Account is already {}.", state_label(.active))]
    NoOpState { active: bool },

    #[error("An account with this account number already exists")]
    DuplicateAccount,

    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Internal(String),
}

impl Error {
    /// Create a not found error for an account id
    pub fn not_found(id: impl fmt::Display) -> Self {
        Self::NotFound(id.to_string())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create an invalid amount error
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    /// Machine-readable error code for response bodies
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "ACCOUNT_NOT_FOUND",
            Error::InvalidAmount(_) => "INVALID_AMOUNT",
            Error::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Error::AccountUnavailable(UnavailableReason::Locked) => "ACCOUNT_LOCKED",
            Error::AccountUnavailable(UnavailableReason::Inactive) => "ACCOUNT_INACTIVE",
            Error::AlreadyLocked => "ACCOUNT_LOCKED",
            Error::AlreadyUnlocked => "ACCOUNT_UNLOCKED",
            Error::NoOpState { .. } => "ACCOUNT_STATE_UNCHANGED",
            Error::DuplicateAccount => "DUPLICATE_ACCOUNT",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Unauthorized(_) => "UNAUTHORIZED_ACCESS",
            Error::Database(_) | Error::Io(_) | Error::Json(_) | Error::Internal(_) => {
                "INTERNAL_SERVER_ERROR"
            }
        }
    }

    /// HTTP-equivalent status for transports that need one
    pub fn status(&self) -> u16 {
        match self {
            Error::NotFound(_) => 404,
            Error::InvalidAmount(_)
            | Error::InsufficientBalance
            | Error::AlreadyUnlocked
            | Error::NoOpState { .. }
            | Error::Validation(_) => 400,
            Error::Unauthorized(_) => 401,
            Error::AccountUnavailable(_) | Error::AlreadyLocked => 403,
            Error::DuplicateAccount => 409,
            Error::Database(_) | Error::Io(_) | Error::Json(_) | Error::Internal(_) => 500,
        }
    }

    /// True for the catch-all kinds nobody anticipated
    pub fn is_internal(&self) -> bool {
        self.status() >= 500
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Structured response body for acknowledgements and failures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ApiResponse {
    /// Acknowledge a successful operation
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_code: None,
            timestamp: Utc::now(),
        }
    }

    /// Report a failure with an explicit code
    pub fn fail(message: impl Into<String>, error_code: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_code: Some(error_code.into()),
            timestamp: Utc::now(),
        }
    }

    /// Translate a core error into its response body
    pub fn from_error(error: &Error) -> Self {
        Self::fail(error.to_string(), error.code())
    }
}

impl From<&Error> for ApiResponse {
    fn from(error: &Error) -> Self {
        Self::from_error(error)
    }
}

/// Operation result carrying data or a failure (for JSON output)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub error_code: Option<String>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>, error_code: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            error_code: Some(error_code.into()),
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.to_string(), e.code()),
        }
    }
}
