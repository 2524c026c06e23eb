use std::env;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};

// Exports above this size are refused before any parsing starts
const MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Rejects export files larger than 50MB
///
/// The size comes from the already-open handle, so the file that is checked is the file
/// that gets read even if the path is swapped or points through a symlink.
///
/// # Errors
///
/// Fails when the metadata is unreadable or the file exceeds the limit.
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    check_size(metadata.len(), path)
}

fn check_size(file_size: u64, path: &Path) -> Result<()> {
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }
    Ok(())
}

/// Shortens a path under `$HOME` to `~/...` for display
///
/// ```no_run
/// use std::path::Path;
/// use task_export_explorer::utils::format_path_with_tilde;
///
/// // "~/exports/tasks.csv" when HOME=/Users/alice
/// println!("{}", format_path_with_tilde(Path::new("/Users/alice/exports/tasks.csv")));
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    let home = env::var("HOME").ok();
    tilde_relative_to(path, home.as_deref())
}

pub(crate) fn tilde_relative_to(path: &Path, home: Option<&str>) -> String {
    match home.filter(|h| !h.is_empty()).map(|h| path.strip_prefix(h)) {
        Some(Ok(rest)) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(Ok(rest)) => format!("~/{}", rest.display()),
        _ => path.display().to_string(),
    }
}
