// PanicScope - app/state.rs
//
// Application state management. Holds the current analysis result, the
// user-facing notice, status text, and pending UI requests.
// Owned by the eframe::App implementation; contains no egui types so it
// can be exercised without a display.

use crate::app::analysis::AnalysisSettings;
use crate::core::model::{AnalysisOutcome, AnalysisProgress, AnalysisReport};
use crate::core::report;
use crate::platform::config::AppConfig;
use crate::util::error::AcquisitionError;

/// How prominently a notice is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Inline banner in the findings pane.
    Info,
    /// Error dialog that must be dismissed before the next run.
    Error,
}

/// A message shown in place of results when a run ends without findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub guidance: String,
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Validated configuration (config.toml merged with CLI overrides).
    pub config: AppConfig,

    /// Whether an analysis is currently in progress.
    pub analysis_in_progress: bool,

    /// Result of the most recent completed analysis.
    pub report: Option<AnalysisReport>,

    /// Notice from the most recent run that produced no report.
    pub notice: Option<Notice>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Config warnings collected at startup, shown until dismissed.
    pub config_warnings: Vec<String>,

    /// Set by panels; consumed by the app on the next frame.
    pub request_analyze: bool,

    /// Set by panels; consumed by the app on the next frame.
    pub request_cancel: bool,

    /// Whether to show the About dialog.
    pub show_about: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    /// Create initial state.
    pub fn new(config: AppConfig, config_warnings: Vec<String>, debug_mode: bool) -> Self {
        Self {
            config,
            analysis_in_progress: false,
            report: None,
            notice: None,
            status_message: "Ready. Connect a device and press Analyze.".to_string(),
            config_warnings,
            request_analyze: false,
            request_cancel: false,
            show_about: false,
            debug_mode,
        }
    }

    /// Tool settings for the next run.
    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings::from_config(&self.config)
    }

    /// Reset results for a new run. Previous results are never mixed with
    /// the next run's.
    pub fn begin_analysis(&mut self) {
        self.report = None;
        self.notice = None;
        self.analysis_in_progress = true;
        self.status_message = "Starting analysis...".to_string();
    }

    /// Fold one progress message from the worker into the state.
    pub fn apply_progress(&mut self, msg: AnalysisProgress) {
        match msg {
            AnalysisProgress::PullingLogs { tool } => {
                self.status_message = format!("Pulling panic logs from device ({tool})...");
            }
            AnalysisProgress::ToolFinished => {
                self.status_message = "Reading latest panic log...".to_string();
            }
            AnalysisProgress::Finished(outcome) => {
                self.analysis_in_progress = false;
                self.apply_outcome(outcome);
            }
        }
    }

    fn apply_outcome(&mut self, outcome: AnalysisOutcome) {
        match outcome {
            AnalysisOutcome::Completed(report) => {
                self.status_message = format!(
                    "Analysed {}: {} finding(s).",
                    report.log_name,
                    report.classification.findings.len()
                );
                self.report = Some(report);
                self.notice = None;
            }
            AnalysisOutcome::NoFileFound => {
                self.status_message = "No panic-full files found.".to_string();
                self.notice = Some(Notice {
                    level: NoticeLevel::Info,
                    title: "No panic-full files found.".to_string(),
                    guidance: "The device has no full panic reports to pull.".to_string(),
                });
            }
            AnalysisOutcome::Failed(error) => {
                self.status_message = format!("Analysis failed: {error}");
                // The user asked for a cancel; nothing to acknowledge.
                let level = match error {
                    AcquisitionError::Cancelled => NoticeLevel::Info,
                    _ => NoticeLevel::Error,
                };
                self.notice = Some(Notice {
                    level,
                    title: error.to_string(),
                    guidance: error.guidance().to_string(),
                });
            }
        }
    }

    /// The error notice awaiting acknowledgement, if any. While one is
    /// pending a new run cannot be started.
    pub fn blocking_notice(&self) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|n| n.level == NoticeLevel::Error)
    }

    /// Whether the Analyze action is currently available.
    pub fn can_analyze(&self) -> bool {
        !self.analysis_in_progress && self.blocking_notice().is_none()
    }

    /// Acknowledge and clear the current notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
        self.status_message = "Ready. Connect a device and press Analyze.".to_string();
    }

    /// The part of the raw log shown in the log pane, and whether it was cut.
    pub fn raw_log_excerpt(&self) -> Option<(&str, bool)> {
        self.report.as_ref().map(|r| {
            report::display_excerpt(
                &r.classification.raw_text,
                self.config.raw_log_display_chars,
            )
        })
    }

    /// Plain-text findings report for the clipboard.
    pub fn report_text(&self) -> Option<String> {
        self.report.as_ref().map(report::format_report)
    }
}
