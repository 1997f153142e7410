// PanicScope - app/acquire.rs
//
// Acquisition: run the extraction tool into a scoped per-run directory and
// pick the newest panic log it produced.
//
// The extraction directory is a `tempfile::TempDir`, so it is removed when
// the `ExtractionRequest` is dropped on every exit path, including early
// returns, errors, and unwinding.

use crate::core::model::LogFile;
use crate::platform::device_tool::{self, ToolCommand};
use crate::platform::fs;
use crate::util::constants::{EXTRACTION_DIR_PREFIX, PANIC_FILE_PREFIX};
use crate::util::error::AcquisitionError;
use std::io;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tempfile::TempDir;

/// A freshly created, run-scoped output directory for the extraction tool.
#[derive(Debug)]
pub struct ExtractionRequest {
    dir: TempDir,
}

impl ExtractionRequest {
    /// Create a new extraction directory under the system temp directory.
    pub fn create() -> Result<Self, AcquisitionError> {
        Self::create_in(&std::env::temp_dir())
    }

    /// Create a new extraction directory under `base`.
    pub fn create_in(base: &Path) -> Result<Self, AcquisitionError> {
        let dir = tempfile::Builder::new()
            .prefix(EXTRACTION_DIR_PREFIX)
            .tempdir_in(base)
            .map_err(|e| AcquisitionError::Io {
                path: base.to_path_buf(),
                operation: "creating extraction directory",
                source: e,
            })?;
        tracing::debug!(destination = %dir.path().display(), "Extraction directory created");
        Ok(Self { dir })
    }

    /// The directory the tool writes into.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Delete the directory now, logging rather than silently ignoring a
    /// failed removal.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => tracing::debug!(destination = %path.display(), "Extraction directory removed"),
            Err(e) => tracing::warn!(
                destination = %path.display(),
                error = %e,
                "Failed to remove extraction directory"
            ),
        }
    }
}

/// Glob matching the crash reports the tool writes.
pub fn panic_file_pattern() -> Result<glob::Pattern, AcquisitionError> {
    let pattern = format!("{}*", glob::Pattern::escape(PANIC_FILE_PREFIX));
    glob::Pattern::new(&pattern).map_err(|e| AcquisitionError::Io {
        path: pattern.clone().into(),
        operation: "compiling panic file pattern",
        source: io::Error::new(io::ErrorKind::InvalidInput, e),
    })
}

/// Run `tool` into `destination` and select the newest panic log.
///
/// `Ok(None)` means the tool succeeded but wrote no matching file; that is
/// an ordinary outcome, not an error.
pub fn acquire(
    destination: &Path,
    tool: &ToolCommand,
    timeout: Duration,
    cancel: &AtomicBool,
) -> Result<Option<LogFile>, AcquisitionError> {
    device_tool::run_extraction(tool, destination, timeout, cancel)?;

    let pattern = panic_file_pattern()?;
    let latest = fs::find_latest_matching(destination, &pattern).map_err(|e| {
        AcquisitionError::Io {
            path: destination.to_path_buf(),
            operation: "listing extraction directory",
            source: e,
        }
    })?;

    match &latest {
        Some(file) => tracing::info!(
            file = %file.display_name(),
            modified = %file.modified.to_rfc3339(),
            "Selected latest panic log"
        ),
        None => tracing::info!(destination = %destination.display(), "No panic-full files found"),
    }

    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_directory_exists_until_closed() {
        let base = TempDir::new().unwrap();
        let request = ExtractionRequest::create_in(base.path()).unwrap();
        let path = request.path().to_path_buf();
        assert!(path.is_dir());
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(EXTRACTION_DIR_PREFIX));

        request.close();
        assert!(!path.exists());
    }

    #[test]
    fn test_request_removed_on_drop() {
        let base = TempDir::new().unwrap();
        let path = {
            let request = ExtractionRequest::create_in(base.path()).unwrap();
            std::fs::write(request.path().join("panic-full-1"), "x").unwrap();
            request.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_create_in_missing_base_is_io_error() {
        let base = TempDir::new().unwrap();
        let result = ExtractionRequest::create_in(&base.path().join("missing"));
        assert!(matches!(result, Err(AcquisitionError::Io { .. })));
    }

    #[test]
    fn test_panic_file_pattern() {
        let pattern = panic_file_pattern().unwrap();
        assert!(pattern.matches("panic-full-2024-05-01-101010.0002.ips"));
        assert!(pattern.matches("panic-full"));
        assert!(!pattern.matches("panic-base-2024.ips"));
    }

    #[cfg(unix)]
    #[test]
    fn test_acquire_returns_none_when_tool_writes_nothing() {
        let request = ExtractionRequest::create().unwrap();
        let tool = ToolCommand::new("true");
        let result = acquire(
            request.path(),
            &tool,
            Duration::from_secs(10),
            &AtomicBool::new(false),
        );
        assert!(matches!(result, Ok(None)), "got {result:?}");
    }
}
