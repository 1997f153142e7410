// PanicScope - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.
// Every bound used by the pipeline or the config validator lives here.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "PanicScope";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "PanicScope";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// External extraction tool
// =============================================================================

/// Default extraction tool (libimobiledevice). Resolved via PATH.
pub const DEFAULT_TOOL_PROGRAM: &str = "idevicepaniclog";

/// Default upper bound on how long the extraction tool may run.
///
/// A device that is locked, untrusted, or mid-pairing can leave the tool
/// waiting forever; past this bound the child is killed and the run fails
/// with a timeout notice.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;

/// Minimum user-configurable tool timeout (seconds).
pub const MIN_TOOL_TIMEOUT_SECS: u64 = 1;

/// Maximum user-configurable tool timeout (seconds).
pub const MAX_TOOL_TIMEOUT_SECS: u64 = 600; // 10 min

/// How often the worker checks the child for exit, timeout, and cancel (ms).
pub const TOOL_POLL_INTERVAL_MS: u64 = 50;

/// Maximum bytes of tool stdout/stderr retained for diagnostic logging.
/// Anything beyond this is drained and discarded so the child never blocks
/// on a full pipe.
pub const MAX_TOOL_OUTPUT_BYTES: usize = 64 * 1024; // 64 KB

/// Prefix of the crash report files the tool writes.
pub const PANIC_FILE_PREFIX: &str = "panic-full";

/// Prefix used for the per-run temporary extraction directory.
pub const EXTRACTION_DIR_PREFIX: &str = "panicscope-";

// =============================================================================
// Log display
// =============================================================================

/// Default number of characters of the raw log shown in the log pane.
pub const DEFAULT_RAW_LOG_DISPLAY_CHARS: usize = 5_000;

/// Minimum user-configurable raw log display cap.
pub const MIN_RAW_LOG_DISPLAY_CHARS: usize = 500;

/// Maximum user-configurable raw log display cap. egui re-lays out the whole
/// text block every frame, so very large values make scrolling sluggish.
pub const MAX_RAW_LOG_DISPLAY_CHARS: usize = 100_000;

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.5;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

/// Maximum number of progress messages processed by the UI per frame.
pub const MAX_ANALYSIS_MESSAGES_PER_FRAME: usize = 50;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of tool output included in debug log lines.
pub const DEBUG_MAX_OUTPUT_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
