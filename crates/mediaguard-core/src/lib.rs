//! MediaGuard Core Library
//!
//! This crate provides the domain models, verdict policy, error types and configuration
//! shared across all MediaGuard components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ModerationConfig, Placeholder, SecretString};
pub use error::{AppError, ErrorMetadata, LogLevel, RemediationStep};
pub use models::{
    Annotation, ImageAnnotation, Likelihood, MediaKind, Rejection, UploadEvent, ValidatedUpload,
    Verdict, VideoAnnotation,
};
pub use storage_types::StorageBackend;
