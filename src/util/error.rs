// PanicScope - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation inside the pipeline; every error keeps
// its causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for PanicScope operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum PanicScopeError {
    /// Pulling or reading the panic log failed.
    Acquisition(AcquisitionError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for PanicScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acquisition(e) => write!(f, "Acquisition error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for PanicScopeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Acquisition(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Acquisition errors
// ---------------------------------------------------------------------------

/// Errors raised while pulling a panic log off the device.
///
/// `ToolFailed` deliberately carries no detail: a disconnected device, an
/// untrusted device, and a missing tool binary all look the same from here.
/// The underlying exit status or spawn error is logged, not surfaced.
#[derive(Debug)]
pub enum AcquisitionError {
    /// The extraction tool could not be started or exited non-zero.
    ToolFailed,

    /// The extraction tool ran past the configured timeout and was killed.
    TimedOut { timeout_secs: u64 },

    /// The run was cancelled by the user; the tool was killed.
    Cancelled,

    /// The background analysis thread exited without reporting a result.
    WorkerLost,

    /// Filesystem error around the extraction directory or the log file.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl AcquisitionError {
    /// Guidance shown to the user alongside the error.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::ToolFailed => {
                "Make sure the device is connected by cable, unlocked, and has \
                 trusted this computer, and that libimobiledevice is installed."
            }
            Self::TimedOut { .. } => {
                "The device did not respond in time. Reconnect it, unlock it, \
                 and try again, or raise [tool] timeout_secs in config.toml."
            }
            Self::Cancelled => "Press Analyze to start a new run.",
            Self::WorkerLost => {
                "This is an internal error, not a device problem. Run with --debug, \
                 check the log output, and try again."
            }
            Self::Io { .. } => "Check that the temporary directory is writable.",
        }
    }
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToolFailed => write!(f, "Failed to pull panic logs from the device"),
            Self::TimedOut { timeout_secs } => write!(
                f,
                "Pulling panic logs timed out after {timeout_secs}s"
            ),
            Self::Cancelled => write!(f, "Pulling panic logs was cancelled"),
            Self::WorkerLost => write!(f, "Analysis stopped unexpectedly"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for AcquisitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<AcquisitionError> for PanicScopeError {
    fn from(e: AcquisitionError) -> Self {
        Self::Acquisition(e)
    }
}

impl From<ConfigError> for PanicScopeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for PanicScope results.
pub type Result<T> = std::result::Result<T, PanicScopeError>;
