//! Destination path resolution under the output root

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Resolve the destination path for a file and ensure its directory exists.
///
/// The target directory is `output_root` joined with every segment of
/// `segments` in order; an empty segment list means the output root itself.
/// The directory tree is created recursively, which is idempotent: an
/// existing directory is not an error. Returns the target directory joined
/// with `file_name`.
///
/// # Errors
///
/// Returns an [`Io`](crate::Error::Io) error when directory creation fails
/// (permission denied, or a path component collides with a non-directory
/// file). The failure is logged with the attempted directory; the caller is
/// expected to skip the entry rather than abort the run.
///
/// # Examples
///
/// ```no_run
/// use integration_dl::paths::resolve_download_path;
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let segments = vec!["sub".to_string(), "dir".to_string()];
/// let dest = resolve_download_path(Path::new("/out"), &segments, "a.csv").await?;
/// assert_eq!(dest, Path::new("/out/sub/dir/a.csv"));
/// # Ok(())
/// # }
/// ```
pub async fn resolve_download_path(
    output_root: &Path,
    segments: &[String],
    file_name: &str,
) -> Result<PathBuf> {
    let mut target_dir = output_root.to_path_buf();
    for segment in segments {
        target_dir.push(segment);
    }

    if let Err(e) = tokio::fs::create_dir_all(&target_dir).await {
        tracing::error!(
            directory = %target_dir.display(),
            error = %e,
            "failed to create directory structure"
        );
        return Err(e.into());
    }

    let destination = target_dir.join(file_name);
    tracing::debug!(path = %destination.display(), "resolved download path");

    Ok(destination)
}
