// PanicScope - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Local};
use std::path::PathBuf;

// =============================================================================
// Findings
// =============================================================================

/// Fault category a finding reports. Used by the UI for icons and colours
/// and by tests to assert on findings without comparing display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingKind {
    SoftwareFreeze,
    KeyMismatch,
    AopFailure,
    ModemCrash,
    Overheating,
    PowerManagement,
    MemoryFault,
    Unknown,
}

impl FindingKind {
    /// Short label for compact display.
    pub fn label(&self) -> &'static str {
        match self {
            FindingKind::SoftwareFreeze => "Userspace Watchdog",
            FindingKind::KeyMismatch => "Missing Keys",
            FindingKind::AopFailure => "AOP Panic",
            FindingKind::ModemCrash => "Baseband Crash",
            FindingKind::Overheating => "Thermal Issue",
            FindingKind::PowerManagement => "Power Manager Issue",
            FindingKind::MemoryFault => "Memory Fault",
            FindingKind::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One reported (cause, suggested repair) pair.
///
/// Findings are built from the static rule table, so they borrow their text
/// for the lifetime of the program and are freely copyable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finding {
    pub kind: FindingKind,
    /// What most likely caused the panic.
    pub cause: &'static str,
    /// What to repair or replace.
    pub fix: &'static str,
}

/// Output of classifying one panic log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The decoded log text, unmodified.
    pub raw_text: String,
    /// Findings in rule order. Never empty.
    pub findings: Vec<Finding>,
}

// =============================================================================
// Acquired log file
// =============================================================================

/// The panic log selected from the extraction directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    pub modified: DateTime<Local>,
}

impl LogFile {
    /// File name for display, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

// =============================================================================
// Analysis results
// =============================================================================

/// A completed analysis, detached from the (already deleted) extraction
/// directory so it can be held by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    /// File name of the analysed panic log.
    pub log_name: String,
    /// Modification time of the analysed panic log.
    pub log_modified: DateTime<Local>,
    pub classification: Classification,
}

/// Terminal result of one analysis run.
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// A panic log was pulled and classified.
    Completed(AnalysisReport),
    /// The tool succeeded but wrote no `panic-full*` file.
    NoFileFound,
    /// Pulling the log failed; nothing was classified.
    Failed(crate::util::error::AcquisitionError),
}

/// Progress messages sent from the analysis worker to the UI thread.
#[derive(Debug)]
pub enum AnalysisProgress {
    /// The extraction tool has been launched.
    PullingLogs { tool: String },
    /// The tool exited successfully; selecting and reading the log.
    ToolFinished,
    /// The run finished (successfully or not).
    Finished(AnalysisOutcome),
}
