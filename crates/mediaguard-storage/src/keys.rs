//! Shared key validation for storage backends.

use crate::{StorageError, StorageResult};

/// Reject keys that could escape a bucket-relative namespace.
///
/// Upload notifications carry object paths verbatim, and remediation maps those
/// paths onto the local scratch directory, so both backends apply the same rule.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.starts_with('/') || storage_key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    if storage_key
        .split('/')
        .any(|segment| segment == ".." || segment == ".")
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains relative path segments".to_string(),
        ));
    }
    Ok(())
}
