//! Output writing.
//!
//! The complete PWL text is staged in a temporary file next to the target and
//! renamed over it in one step, so a failed run never leaves a truncated or
//! half-written output behind.

use crate::config::OutputTarget;
use crate::error::{PwlError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Write `content` to `target`, refusing to replace an existing file unless `force`
pub fn write_output(target: &OutputTarget, content: &str, force: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(content.as_bytes())?;
            handle.flush()?;
            Ok(())
        }
        OutputTarget::File(path) => write_file_atomic(path, content, force),
    }
}

/// Stage `content` in a temp file in the same directory, then persist it over `path`
pub fn write_file_atomic(path: &Path, content: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(PwlError::OutputExists {
            path: path.to_path_buf(),
        });
    }

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(directory)?;
    staged.write_all(content.as_bytes())?;
    staged.flush()?;
    debug!(
        "Staged {} bytes in {}",
        content.len(),
        staged.path().display()
    );

    staged.persist(path).map_err(|e| PwlError::Io(e.error))?;
    debug!("Wrote {}", path.display());
    Ok(())
}
