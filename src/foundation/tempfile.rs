use std::path::PathBuf;

/// Build a collision-resistant path in the system temp directory.
pub(crate) fn temp_path(prefix: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "{prefix}_{}_{}.{ext}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

/// Removes the held file on drop. Cleanup is best-effort: failures are
/// logged at debug level and never escalate.
pub(crate) struct TempFileGuard(pub(crate) Option<PathBuf>);

impl TempFileGuard {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self(Some(path))
    }

    /// Keep the file: the guard forgets the path and drop becomes a no-op.
    pub(crate) fn disarm(&mut self) {
        self.0 = None;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take()
            && let Err(e) = std::fs::remove_file(&path)
            && path.exists()
        {
            tracing::debug!("failed to remove temp file '{}': {e}", path.display());
        }
    }
}
