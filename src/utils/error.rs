use crate::domain::policy::MAX_OPEN_ADVERTISEMENTS;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdError {
    #[error(
        "Limit of {max} open advertisements reached: you currently have {open_count} open.",
        max = MAX_OPEN_ADVERTISEMENTS
    )]
    QuotaExceeded { open_count: usize },

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("Invalid token.")]
    AuthenticationFailed,

    #[error("Advertisement {id} not found")]
    NotFound { id: u64 },

    #[error("Validation error on '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error(
        "Request was throttled. Expected available in {secs} seconds.",
        secs = .retry_after.as_secs().max(1)
    )]
    Throttled { retry_after: Duration },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl AdError {
    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP status the request layer answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::QuotaExceeded { .. } | Self::ValidationError { .. } => 400,
            Self::AuthenticationFailed => 401,
            Self::PermissionDenied { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Throttled { .. } => 429,
            Self::IoError(_) | Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                500
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::QuotaExceeded { .. } => {
                "Close one of your open advertisements or create this one as CLOSED"
            }
            Self::PermissionDenied { .. } => {
                "Only the creator of an advertisement may change it; authenticate to create one"
            }
            Self::AuthenticationFailed => "Check the API token sent in the Authorization header",
            Self::NotFound { .. } => "Check the advertisement id",
            Self::ValidationError { .. } => "Fix the request payload and retry",
            Self::Throttled { .. } => "Wait before sending more requests",
            Self::IoError(_) => "Check that the config file exists and is readable",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AdError>;
