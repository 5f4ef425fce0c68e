use crate::shared::Result;
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Upper bound for repository snapshots (100 MB)
pub const MAX_SNAPSHOT_SIZE: u64 = 100 * 1024 * 1024;

/// Upper bound for configuration files (1 MB)
pub const MAX_CONFIG_SIZE: u64 = 1024 * 1024;

/// Reads a local file as UTF-8 after checking it is a regular file within `max_size`
///
/// # Security
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
///
/// # Errors
/// - The file cannot be stat'ed or read
/// - The path is a symbolic link or not a regular file
/// - The file is larger than `max_size`
pub fn read_guarded(path: &Path, description: &str, max_size: u64) -> Result<String> {
    let metadata = fs::symlink_metadata(path)
        .with_context(|| format!("Failed to read {} metadata: {}", description, path.display()))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. The {} must be a regular file.",
            path.display(),
            description
        );
    }
    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }
    if metadata.len() > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            max_size
        );
    }

    fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}: {}", description, path.display()))
}
