//! Error types module
//!
//! All moderation failures are unified under `AppError`. Invalid trigger input is
//! not an error: it is reported as a `Rejection` and never reaches this type.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "CLASSIFICATION_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether a redelivery of the same event may succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Fatal step of the remediation sequence. Scratch cleanup is never fatal and has no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationStep {
    DeleteSource,
    PrepareScratch,
    FetchPlaceholder,
    UploadPlaceholder,
}

impl Display for RemediationStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RemediationStep::DeleteSource => f.write_str("delete source"),
            RemediationStep::PrepareScratch => f.write_str("prepare scratch"),
            RemediationStep::FetchPlaceholder => f.write_str("fetch placeholder"),
            RemediationStep::UploadPlaceholder => f.write_str("upload placeholder"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Classification failed: {source}")]
    Classification {
        #[source]
        source: anyhow::Error,
    },

    #[error("Remediation failed at step '{step}': {source}")]
    Remediation {
        step: RemediationStep,
        #[source]
        source: anyhow::Error,
    },

    #[error("Pass-through failed: {source}")]
    PassThrough {
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn classification(source: impl Into<anyhow::Error>) -> Self {
        AppError::Classification {
            source: source.into(),
        }
    }

    pub fn remediation(step: RemediationStep, source: impl Into<anyhow::Error>) -> Self {
        AppError::Remediation {
            step,
            source: source.into(),
        }
    }

    pub fn pass_through(source: impl Into<anyhow::Error>) -> Self {
        AppError::PassThrough {
            source: source.into(),
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) => 400,
            AppError::Classification { .. } => 502,
            AppError::Remediation { .. } | AppError::PassThrough { .. } => 500,
            AppError::Config(_) | AppError::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Classification { .. } => "CLASSIFICATION_FAILED",
            AppError::Remediation { .. } => "REMEDIATION_FAILED",
            AppError::PassThrough { .. } => "PASS_THROUGH_FAILED",
            AppError::Config(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Classification { .. }
                | AppError::Remediation { .. }
                | AppError::PassThrough { .. }
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) => LogLevel::Debug,
            _ => LogLevel::Error,
        }
    }
}
