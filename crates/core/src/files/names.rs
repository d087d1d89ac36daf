use super::error::FileStoreError;

/// Checks that a name addresses a single file inside the store directory.
///
/// Rejects empty names, path separators, `.`/`..` and NUL bytes.
pub fn validate_file_name(name: &str) -> Result<(), FileStoreError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        return Err(FileStoreError::InvalidName(name.to_string()));
    }
    Ok(())
}
