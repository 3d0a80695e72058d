use crate::error::Result;
use std::fs::DirBuilder;
use std::path::Path;

/// Creates a directory if it doesn't exist
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    DirBuilder::new()
        .recursive(true)
        .create(path)?;
    Ok(())
}

/// Splits a submission into individual questions on `delimiter`.
/// A blank submission has no questions; otherwise every segment is kept
/// verbatim, empty ones included.
pub fn split_queries(input: &str, delimiter: char) -> Vec<&str> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    input.split(delimiter).collect()
}

/// True when `input` names a remote http(s) resource rather than a path.
pub fn is_remote(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
