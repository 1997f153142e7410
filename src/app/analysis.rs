// PanicScope - app/analysis.rs
//
// Analysis lifecycle management. Runs the pull → select → classify pipeline
// on a background thread, sending progress messages to the UI thread via
// an mpsc channel.
//
// Architecture:
//   - `AnalysisManager` lives on the UI thread; `analyze` runs on a background thread.
//   - An `Arc<AtomicBool>` cancel flag lets the UI stop the run; the tool
//     subprocess is killed within TOOL_POLL_INTERVAL_MS.
//   - All cross-thread communication is via `AnalysisProgress` channel messages.
//   - Each run owns its own `ExtractionRequest`; nothing is shared between runs.

use crate::app::acquire::{self, ExtractionRequest};
use crate::core::classifier;
use crate::core::model::{AnalysisOutcome, AnalysisProgress, AnalysisReport};
use crate::platform::config::AppConfig;
use crate::platform::device_tool::ToolCommand;
use crate::platform::fs;
use crate::util::error::AcquisitionError;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

/// Everything a run needs to know about the extraction tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub tool: ToolCommand,
    pub timeout: Duration,
}

impl AnalysisSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            tool: ToolCommand::new(&config.tool_program).with_args(config.tool_args.clone()),
            timeout: Duration::from_secs(config.tool_timeout_secs),
        }
    }
}

// =============================================================================
// AnalysisManager
// =============================================================================

/// Manages an analysis run on a background thread.
pub struct AnalysisManager {
    /// Channel receiver for the UI to poll progress messages.
    progress_rx: Option<mpsc::Receiver<AnalysisProgress>>,

    /// Cancel flag shared with the background thread.
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl AnalysisManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
        }
    }

    /// Start an analysis with `settings`.
    ///
    /// Spawns a background thread immediately. If a run is already in
    /// flight it is cancelled first; its remaining messages are discarded.
    pub fn start(&mut self, settings: AnalysisSettings) {
        self.cancel();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        std::thread::spawn(move || {
            let outcome = analyze(&settings, &cancel, |msg| {
                // Receiver dropped means the UI moved on; keep going so the
                // extraction directory is still cleaned up.
                let _ = tx.send(msg);
            });
            let _ = tx.send(AnalysisProgress::Finished(outcome));
        });

        tracing::info!("Analysis started");
    }

    /// Request cancellation of the running analysis.
    /// The background thread kills the tool and reports `Cancelled`.
    pub fn cancel(&mut self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::SeqCst);
        }
        self.cancel_flag = None;
    }

    /// Returns `true` while a run has been started and not yet finished.
    pub fn is_running(&self) -> bool {
        self.progress_rx.is_some()
    }

    /// Poll for progress messages without blocking.
    ///
    /// Returns at most `max` messages. The receiver is released once the
    /// `Finished` message has been handed out.
    pub fn poll_progress(&mut self, max: usize) -> Vec<AnalysisProgress> {
        let mut messages = Vec::new();
        let mut finished = false;
        if let Some(ref rx) = self.progress_rx {
            while messages.len() < max {
                match rx.try_recv() {
                    Ok(msg) => {
                        finished = matches!(msg, AnalysisProgress::Finished(_));
                        messages.push(msg);
                        if finished {
                            break;
                        }
                    }
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => {
                        // Worker died without reporting; surface it as a failure.
                        tracing::error!("Analysis worker exited without a result");
                        messages.push(AnalysisProgress::Finished(AnalysisOutcome::Failed(
                            AcquisitionError::WorkerLost,
                        )));
                        finished = true;
                        break;
                    }
                }
            }
        }
        if finished {
            self.progress_rx = None;
            self.cancel_flag = None;
        }
        messages
    }
}

impl Default for AnalysisManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Full analysis pipeline in a fresh extraction directory under the system
/// temp dir. Blocks until the tool exits, times out, or is cancelled.
pub fn analyze<F>(settings: &AnalysisSettings, cancel: &AtomicBool, on_progress: F) -> AnalysisOutcome
where
    F: FnMut(AnalysisProgress),
{
    match ExtractionRequest::create() {
        Ok(request) => run_analysis(request, settings, cancel, on_progress),
        Err(e) => {
            tracing::error!(error = %e, "Could not create extraction directory");
            AnalysisOutcome::Failed(e)
        }
    }
}

/// Run the pipeline inside `request`, then delete it whatever the outcome.
pub fn run_analysis<F>(
    request: ExtractionRequest,
    settings: &AnalysisSettings,
    cancel: &AtomicBool,
    mut on_progress: F,
) -> AnalysisOutcome
where
    F: FnMut(AnalysisProgress),
{
    let started = Instant::now();
    let outcome = analyze_in(request.path(), settings, cancel, &mut on_progress);
    request.close();

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &outcome {
        AnalysisOutcome::Completed(report) => tracing::info!(
            file = %report.log_name,
            findings = report.classification.findings.len(),
            elapsed_ms,
            "Analysis complete"
        ),
        AnalysisOutcome::NoFileFound => {
            tracing::info!(elapsed_ms, "Analysis ended: no panic log on device")
        }
        AnalysisOutcome::Failed(e) => tracing::warn!(error = %e, elapsed_ms, "Analysis failed"),
    }
    outcome
}

fn analyze_in(
    destination: &Path,
    settings: &AnalysisSettings,
    cancel: &AtomicBool,
    on_progress: &mut dyn FnMut(AnalysisProgress),
) -> AnalysisOutcome {
    on_progress(AnalysisProgress::PullingLogs {
        tool: settings.tool.display(),
    });

    let log_file = match acquire::acquire(destination, &settings.tool, settings.timeout, cancel) {
        Ok(Some(file)) => file,
        Ok(None) => return AnalysisOutcome::NoFileFound,
        Err(e) => return AnalysisOutcome::Failed(e),
    };

    on_progress(AnalysisProgress::ToolFinished);

    if cancel.load(Ordering::SeqCst) {
        return AnalysisOutcome::Failed(AcquisitionError::Cancelled);
    }

    let text = match fs::read_text_permissive(&log_file.path) {
        Ok(t) => t,
        Err(e) => {
            return AnalysisOutcome::Failed(AcquisitionError::Io {
                path: log_file.path.clone(),
                operation: "reading panic log",
                source: e,
            })
        }
    };

    AnalysisOutcome::Completed(AnalysisReport {
        log_name: log_file.display_name(),
        log_modified: log_file.modified,
        classification: classifier::classify(&text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::FindingKind;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn sh_settings(script: &str, timeout_secs: u64) -> AnalysisSettings {
        AnalysisSettings {
            tool: ToolCommand::new("sh").with_args(vec![
                "-c".to_string(),
                script.to_string(),
                "sh".to_string(),
            ]),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    #[test]
    fn test_settings_from_config() {
        let config = AppConfig {
            tool_program: "/usr/local/bin/idevicepaniclog".to_string(),
            tool_args: vec!["-n".to_string()],
            tool_timeout_secs: 12,
            ..AppConfig::default()
        };
        let settings = AnalysisSettings::from_config(&config);
        assert_eq!(settings.tool.display(), "/usr/local/bin/idevicepaniclog -n");
        assert_eq!(settings.timeout, Duration::from_secs(12));
    }

    #[cfg(unix)]
    #[test]
    fn test_progress_sequence_for_successful_run() {
        let base = TempDir::new().unwrap();
        let request = ExtractionRequest::create_in(base.path()).unwrap();
        let settings = sh_settings("printf 'thermalmonitord tripped' > \"$1/panic-full-x\"", 10);

        let mut seen = Vec::new();
        let outcome = run_analysis(request, &settings, &AtomicBool::new(false), |m| {
            seen.push(m)
        });

        assert!(matches!(seen[0], AnalysisProgress::PullingLogs { .. }));
        assert!(matches!(seen[1], AnalysisProgress::ToolFinished));
        match outcome {
            AnalysisOutcome::Completed(report) => {
                assert_eq!(report.log_name, "panic-full-x");
                let kinds: Vec<_> = report
                    .classification
                    .findings
                    .iter()
                    .map(|f| f.kind)
                    .collect();
                assert_eq!(kinds, vec![FindingKind::Overheating]);
            }
            other => panic!("expected Completed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_cancel_after_tool_finished_skips_reading() {
        let base = TempDir::new().unwrap();
        let request = ExtractionRequest::create_in(base.path()).unwrap();
        let destination = request.path().to_path_buf();
        let settings = sh_settings("echo baseband > \"$1/panic-full-1\"", 10);
        let cancel = AtomicBool::new(false);

        let outcome = run_analysis(request, &settings, &cancel, |m| {
            if matches!(m, AnalysisProgress::ToolFinished) {
                cancel.store(true, Ordering::SeqCst);
            }
        });

        assert!(
            matches!(outcome, AnalysisOutcome::Failed(AcquisitionError::Cancelled)),
            "got {outcome:?}"
        );
        assert!(!destination.exists());
    }

    #[test]
    fn test_lost_worker_is_reported_as_internal_failure() {
        let (tx, rx) = mpsc::channel::<AnalysisProgress>();
        drop(tx);
        let mut manager = AnalysisManager {
            progress_rx: Some(rx),
            cancel_flag: Some(Arc::new(AtomicBool::new(false))),
        };

        let messages = manager.poll_progress(16);

        assert_eq!(messages.len(), 1);
        assert!(
            matches!(
                messages[0],
                AnalysisProgress::Finished(AnalysisOutcome::Failed(AcquisitionError::WorkerLost))
            ),
            "got {messages:?}"
        );
        assert!(!manager.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn test_manager_delivers_finished_outcome() {
        let mut manager = AnalysisManager::new();
        manager.start(sh_settings("exit 0", 10));
        assert!(manager.is_running());

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut outcome = None;
        while outcome.is_none() && Instant::now() < deadline {
            for msg in manager.poll_progress(16) {
                if let AnalysisProgress::Finished(o) = msg {
                    outcome = Some(o);
                }
            }
            std::thread::sleep(Duration::from_millis(20));
        }

        assert!(matches!(outcome, Some(AnalysisOutcome::NoFileFound)), "got {outcome:?}");
        assert!(!manager.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn test_manager_cancel_kills_hung_tool() {
        let mut manager = AnalysisManager::new();
        manager.start(sh_settings("sleep 30", 60));
        // Keep the receiver: cancel() only flips the flag.
        manager.cancel();

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut outcome = None;
        while outcome.is_none() && Instant::now() < deadline {
            for msg in manager.poll_progress(16) {
                if let AnalysisProgress::Finished(o) = msg {
                    outcome = Some(o);
                }
            }
            std::thread::sleep(Duration::from_millis(20));
        }

        assert!(
            matches!(outcome, Some(AnalysisOutcome::Failed(AcquisitionError::Cancelled))),
            "got {outcome:?}"
        );
    }
}
