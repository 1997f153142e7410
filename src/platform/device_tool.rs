// PanicScope - platform/device_tool.rs
//
// Runs the external panic log extraction tool (idevicepaniclog by default)
// as a child process.
//
// Contract with the tool:
//   - Invoked as `<program> [args...] <output-dir>`.
//   - Exit status zero means logs were written (possibly none).
//   - Any other status, or failure to launch, is a generic failure: a
//     missing device, an untrusted device, and a missing binary are not
//     distinguished.
//
// The child is polled every TOOL_POLL_INTERVAL_MS so that the caller's
// cancel flag and the timeout are honoured promptly. On either, the child
// is killed and reaped before returning. Stdout and stderr are drained on
// helper threads (so the child never blocks on a full pipe) and only ever
// logged. Collecting that output is bounded by the same deadline and cancel
// flag: a background process left behind by the tool can hold the pipes
// open indefinitely, in which case the readers are detached.

use crate::util::constants::{
    DEBUG_MAX_OUTPUT_PREVIEW, MAX_TOOL_OUTPUT_BYTES, TOOL_POLL_INTERVAL_MS,
};
use crate::util::error::AcquisitionError;
use crate::util::logging::preview;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// How to invoke the extraction tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Executable name (resolved via PATH) or path.
    pub program: PathBuf,
    /// Arguments placed before the output directory.
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Human-readable command line, for logs and the status bar.
    pub fn display(&self) -> String {
        let mut s = self.program.display().to_string();
        for a in &self.args {
            s.push(' ');
            s.push_str(a);
        }
        s
    }
}

impl Default for ToolCommand {
    fn default() -> Self {
        Self::new(crate::util::constants::DEFAULT_TOOL_PROGRAM)
    }
}

/// Run `tool` with `destination` as its output directory and wait for it.
///
/// Returns `Ok(())` only if the tool exits with status zero.
pub fn run_extraction(
    tool: &ToolCommand,
    destination: &Path,
    timeout: Duration,
    cancel: &AtomicBool,
) -> Result<(), AcquisitionError> {
    let mut child = Command::new(&tool.program)
        .args(&tool.args)
        .arg(destination)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            tracing::warn!(
                tool = %tool.display(),
                error = %e,
                "Failed to launch extraction tool"
            );
            AcquisitionError::ToolFailed
        })?;

    tracing::debug!(
        tool = %tool.display(),
        pid = child.id(),
        destination = %destination.display(),
        "Extraction tool launched"
    );

    let stdout = child.stdout.take().map(spawn_drain);
    let stderr = child.stderr.take().map(spawn_drain);

    let started = Instant::now();
    let poll = Duration::from_millis(TOOL_POLL_INTERVAL_MS);

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(tool = %tool.display(), error = %e, "Failed to poll extraction tool");
                kill_and_reap(&mut child);
                return Err(AcquisitionError::ToolFailed);
            }
        }

        if cancel.load(Ordering::SeqCst) {
            tracing::info!(tool = %tool.display(), "Extraction cancelled; killing tool");
            kill_and_reap(&mut child);
            return Err(AcquisitionError::Cancelled);
        }

        if started.elapsed() >= timeout {
            tracing::warn!(
                tool = %tool.display(),
                timeout_secs = timeout.as_secs(),
                "Extraction tool timed out; killing it"
            );
            kill_and_reap(&mut child);
            return Err(AcquisitionError::TimedOut {
                timeout_secs: timeout.as_secs(),
            });
        }

        std::thread::sleep(poll);
    };

    let deadline = started + timeout;
    let stdout = collect_drain(stdout, "stdout", deadline, cancel);
    let stderr = collect_drain(stderr, "stderr", deadline, cancel);
    let elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::debug!(
        stdout = preview(&stdout, DEBUG_MAX_OUTPUT_PREVIEW),
        stderr = preview(&stderr, DEBUG_MAX_OUTPUT_PREVIEW),
        "Extraction tool output"
    );

    if status.success() {
        tracing::info!(tool = %tool.display(), elapsed_ms, "Extraction tool succeeded");
        Ok(())
    } else {
        tracing::warn!(
            tool = %tool.display(),
            code = ?status.code(),
            elapsed_ms,
            "Extraction tool exited with failure status"
        );
        Err(AcquisitionError::ToolFailed)
    }
}

/// Kill the child and wait for it so no zombie is left behind.
/// The drain threads are left to finish on their own once the pipes close.
fn kill_and_reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!(error = %e, "Kill failed (child may have already exited)");
    }
    if let Err(e) = child.wait() {
        tracing::debug!(error = %e, "Failed to reap extraction tool");
    }
}

/// Read `pipe` to EOF on a helper thread, keeping at most
/// MAX_TOOL_OUTPUT_BYTES and discarding the rest. The kept bytes are sent
/// on the returned channel once the pipe closes.
fn spawn_drain<R: Read + Send + 'static>(mut pipe: R) -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut kept = Vec::new();
        let mut buf = [0u8; 8 * 1024];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let room = MAX_TOOL_OUTPUT_BYTES.saturating_sub(kept.len());
                    kept.extend_from_slice(&buf[..n.min(room)]);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        let _ = tx.send(kept);
    });
    rx
}

/// Wait for a drain thread's output until `deadline` or cancellation.
/// Past either, the reader is detached and an empty string returned.
fn collect_drain(
    drain: Option<mpsc::Receiver<Vec<u8>>>,
    stream: &'static str,
    deadline: Instant,
    cancel: &AtomicBool,
) -> String {
    let Some(rx) = drain else {
        return String::new();
    };
    let poll = Duration::from_millis(TOOL_POLL_INTERVAL_MS);

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining.min(poll)) {
            Ok(bytes) => return String::from_utf8_lossy(&bytes).into_owned(),
            Err(mpsc::RecvTimeoutError::Disconnected) => return String::new(),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }

        if cancel.load(Ordering::SeqCst) || Instant::now() >= deadline {
            tracing::debug!(stream, "Tool output still open; detaching reader");
            return String::new();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn sh(script: &str) -> ToolCommand {
        // `sh -c <script> sh <dir>`: the output directory arrives as $1.
        ToolCommand::new("sh").with_args(vec![
            "-c".to_string(),
            script.to_string(),
            "sh".to_string(),
        ])
    }

    #[test]
    fn test_display_includes_args() {
        let tool = ToolCommand::new("idevicepaniclog").with_args(vec!["-u".into(), "abc".into()]);
        assert_eq!(tool.display(), "idevicepaniclog -u abc");
    }

    #[test]
    fn test_missing_binary_is_tool_failed() {
        let dir = TempDir::new().unwrap();
        let tool = ToolCommand::new("/nonexistent/panicscope-test-tool");
        let result = run_extraction(&tool, dir.path(), Duration::from_secs(5), &AtomicBool::new(false));
        assert!(matches!(result, Err(AcquisitionError::ToolFailed)), "got {result:?}");
    }

    #[cfg(unix)]
    #[test]
    fn test_zero_exit_is_success_and_receives_directory() {
        let dir = TempDir::new().unwrap();
        let tool = sh("echo pulled > \"$1/panic-full-test\"");
        run_extraction(&tool, dir.path(), Duration::from_secs(10), &AtomicBool::new(false))
            .expect("tool should succeed");
        assert!(dir.path().join("panic-full-test").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_tool_failed() {
        let dir = TempDir::new().unwrap();
        let tool = sh("echo 'ERROR: No device found.' >&2; exit 255");
        let result = run_extraction(&tool, dir.path(), Duration::from_secs(10), &AtomicBool::new(false));
        assert!(matches!(result, Err(AcquisitionError::ToolFailed)), "got {result:?}");
    }

    #[cfg(unix)]
    #[test]
    fn test_hung_tool_times_out() {
        let dir = TempDir::new().unwrap();
        let tool = sh("sleep 30");
        let started = Instant::now();
        let result = run_extraction(&tool, dir.path(), Duration::from_secs(1), &AtomicBool::new(false));
        assert!(
            matches!(result, Err(AcquisitionError::TimedOut { timeout_secs: 1 })),
            "got {result:?}"
        );
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn test_cancel_flag_stops_tool() {
        let dir = TempDir::new().unwrap();
        let tool = sh("sleep 30");
        let cancel = AtomicBool::new(true);
        let result = run_extraction(&tool, dir.path(), Duration::from_secs(60), &cancel);
        assert!(matches!(result, Err(AcquisitionError::Cancelled)), "got {result:?}");
    }

    #[cfg(unix)]
    #[test]
    fn test_background_child_holding_pipes_does_not_outlive_timeout() {
        let dir = TempDir::new().unwrap();
        // The tool exits at once but leaves `sleep` holding stdout and stderr.
        let tool = sh("sleep 8 & exit 0");
        let started = Instant::now();
        let result = run_extraction(&tool, dir.path(), Duration::from_secs(1), &AtomicBool::new(false));
        assert!(result.is_ok(), "got {result:?}");
        assert!(
            started.elapsed() < Duration::from_secs(4),
            "took {:?}",
            started.elapsed()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_cancel_stops_waiting_for_held_pipes() {
        let dir = TempDir::new().unwrap();
        let tool = sh("sleep 8 & exit 0");
        let cancel = std::sync::Arc::new(AtomicBool::new(false));
        let flag = std::sync::Arc::clone(&cancel);
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(500));
            flag.store(true, Ordering::SeqCst);
        });

        let started = Instant::now();
        let result = run_extraction(&tool, dir.path(), Duration::from_secs(60), &cancel);
        canceller.join().unwrap();

        // The tool itself exited cleanly; the caller sees the flag afterwards.
        assert!(result.is_ok(), "got {result:?}");
        assert!(
            started.elapsed() < Duration::from_secs(4),
            "took {:?}",
            started.elapsed()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_large_output_does_not_block() {
        let dir = TempDir::new().unwrap();
        // Well past the pipe buffer and the retention cap.
        let tool = sh("i=0; while [ $i -lt 3000 ]; do echo 'xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx'; i=$((i+1)); done");
        run_extraction(&tool, dir.path(), Duration::from_secs(20), &AtomicBool::new(false))
            .expect("noisy tool should still succeed");
    }
}
