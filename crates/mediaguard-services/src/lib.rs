//! MediaGuard Services Layer
//!
//! Business orchestration for upload moderation: classification through the
//! vendor plugins, remediation and pass-through against the object store. The HTTP
//! service and the CLI both drive an [`EventDispatcher`] and keep no logic of their own.

pub mod moderation;

#[cfg(test)]
mod test_support;

pub use mediaguard_storage::{create_storage, Storage, StorageError};
pub use moderation::{EventDispatcher, MediaProfile, Outcome, PassThrough, Remediator};
