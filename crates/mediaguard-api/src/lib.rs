//! MediaGuard HTTP service
//!
//! Receives upload notifications from the storage trigger (directly, or wrapped in a
//! Pub/Sub push envelope) and runs them through the moderation dispatcher.

pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
