//! Output files: the rendered page and the `--debug` query dumps.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Writes a rendered page (HTML or JSON), creating parent directories as needed.
///
/// # Errors
///
/// Returns an error naming the path if the directory or the file cannot be written.
pub fn write_html(path: &Path, content: &str) -> Result<()> {
    write_file(path, content, "page")
}

/// Writes an auxiliary text file such as a saved SPARQL query.
///
/// # Errors
///
/// Returns an error naming the path if the directory or the file cannot be written.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_file(path, content, "file")
}

fn write_file(path: &Path, content: &str, what: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory {} for {what}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Cannot write {what} {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote {what}");
    Ok(())
}
