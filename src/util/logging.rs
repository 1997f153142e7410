// PanicScope - util/logging.rs
//
// Structured logging with runtime-selectable debug mode.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - CLI flag: --debug (sets RUST_LOG=debug)
//   - Config file: [logging] level = "debug"
//
// Output: stderr. Tool output is only ever logged as a bounded preview.

use tracing_subscriber::EnvFilter;

/// Initialise the logging subsystem.
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default "info".
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let filter = build_filter(debug_flag, config_level);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .init();

    tracing::debug!(
        app = super::constants::APP_NAME,
        version = super::constants::APP_VERSION,
        "Logging initialised"
    );
}

fn build_filter(debug_flag: bool, config_level: Option<&str>) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL)
    }
}

/// Truncate `text` to at most `max_chars` characters for a log preview.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
