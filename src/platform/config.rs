// PanicScope - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::{self, ConfigError};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for PanicScope configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/panicscope/ or %APPDATA%\PanicScope\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Full path of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[tool]` section.
    pub tool: ToolSection,
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[tool]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ToolSection {
    /// Extraction tool executable.
    pub program: Option<String>,
    /// Extra arguments placed before the output directory (e.g. `["-u", "<udid>"]`).
    pub args: Option<Vec<String>>,
    /// Seconds before a running tool is killed.
    pub timeout_secs: Option<u64>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Characters of raw log shown in the log pane.
    pub raw_log_display_chars: Option<usize>,
    /// Body font size in points.
    pub font_size: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Tool --
    pub tool_program: String,
    pub tool_args: Vec<String>,
    pub tool_timeout_secs: u64,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    pub raw_log_display_chars: usize,
    pub font_size: f32,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tool_program: constants::DEFAULT_TOOL_PROGRAM.to_string(),
            tool_args: Vec::new(),
            tool_timeout_secs: constants::DEFAULT_TOOL_TIMEOUT_SECS,
            dark_mode: true,
            raw_log_display_chars: constants::DEFAULT_RAW_LOG_DISPLAY_CHARS,
            font_size: constants::DEFAULT_FONT_SIZE,
            log_level: None,
        }
    }
}

/// Read and parse config.toml. `Ok(None)` when the file does not exist.
pub fn read_raw_config(path: &Path) -> Result<Option<RawConfig>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    toml::from_str(&content)
        .map(Some)
        .map_err(|e| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Load and validate config.toml at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults plus a warning so the application
/// still starts but the user is told why their settings were ignored.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let raw = match read_raw_config(config_path) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
            return (AppConfig::default(), Vec::new());
        }
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            return (AppConfig::default(), vec![msg]);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    validate(raw)
}

/// Load and validate a config file the user named explicitly (`--config`).
///
/// Unlike `load_config`, a missing, unreadable, or unparseable file is an
/// error. Out-of-range values are still warnings.
pub fn load_config_required(config_path: &Path) -> error::Result<(AppConfig, Vec<String>)> {
    let Some(raw) = read_raw_config(config_path)? else {
        return Err(ConfigError::Io {
            path: config_path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        }
        .into());
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    Ok(validate(raw))
}

/// Validate each field against named constants, accumulating all problems.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- Tool: program --
    if let Some(program) = raw.tool.program {
        if program.trim().is_empty() {
            warnings.push(format!(
                "[tool] program is empty. Using default ({}).",
                constants::DEFAULT_TOOL_PROGRAM
            ));
        } else {
            config.tool_program = program;
        }
    }

    // -- Tool: args --
    if let Some(args) = raw.tool.args {
        config.tool_args = args;
    }

    // -- Tool: timeout_secs --
    if let Some(secs) = raw.tool.timeout_secs {
        match check_range(
            "[tool] timeout_secs",
            secs,
            constants::MIN_TOOL_TIMEOUT_SECS,
            constants::MAX_TOOL_TIMEOUT_SECS,
        ) {
            Ok(v) => config.tool_timeout_secs = v,
            Err(e) => warnings.push(format!(
                "{e}. Using default ({}).",
                constants::DEFAULT_TOOL_TIMEOUT_SECS
            )),
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => {
                warnings.push(format!(
                    "[ui] theme = \"{other}\" is not recognised. Expected \"dark\" or \"light\". Using default (dark).",
                ));
            }
        }
    }

    // -- UI: raw_log_display_chars --
    if let Some(chars) = raw.ui.raw_log_display_chars {
        match check_range(
            "[ui] raw_log_display_chars",
            chars,
            constants::MIN_RAW_LOG_DISPLAY_CHARS,
            constants::MAX_RAW_LOG_DISPLAY_CHARS,
        ) {
            Ok(v) => config.raw_log_display_chars = v,
            Err(e) => warnings.push(format!(
                "{e}. Using default ({}).",
                constants::DEFAULT_RAW_LOG_DISPLAY_CHARS
            )),
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            warnings.push(format!(
                "[ui] font_size = {size} is out of range ({}-{}). Using default ({}).",
                constants::MIN_FONT_SIZE,
                constants::MAX_FONT_SIZE,
                constants::DEFAULT_FONT_SIZE,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Check that `value` lies in `min..=max`.
pub fn check_range<T>(field: &str, value: T, min: T, max: T) -> Result<T, ConfigError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            expected: format!("{min}-{max}"),
        })
    }
}
