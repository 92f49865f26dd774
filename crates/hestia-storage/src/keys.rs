//! Key generation shared by every backend: `{folder}/{filename}`.

use crate::traits::{StorageError, StorageResult};

/// Build the storage key for `filename` under `folder`.
///
/// Only the last path segment of `filename` is kept so callers cannot escape the folder.
pub fn generate_storage_key(folder: &str, filename: &str) -> StorageResult<String> {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(StorageError::InvalidKey(format!(
            "Invalid file name: {:?}",
            filename
        )));
    }

    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        Ok(name.to_string())
    } else {
        Ok(format!("{}/{}", folder, name))
    }
}

/// Reject keys that could resolve outside the storage root.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_keeps_last_segment() {
        assert_eq!(
            generate_storage_key("uploads/images", "../../etc/passwd").unwrap(),
            "uploads/images/passwd"
        );
        assert_eq!(
            generate_storage_key("/videos/", "tour.webm").unwrap(),
            "videos/tour.webm"
        );
    }

    #[test]
    fn test_key_rejects_empty_names() {
        assert!(generate_storage_key("images", "dir/").is_err());
        assert!(generate_storage_key("images", "..").is_err());
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("images/a.jpg").is_ok());
        assert!(validate_key("/images/a.jpg").is_err());
        assert!(validate_key("images/../a.jpg").is_err());
    }
}
