// PanicScope - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and CLI overrides
// 3. Logging initialisation (debug mode support)
// 4. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can use
// `crate::app::...`, `crate::ui::...` etc.
pub use panicscope::app;
pub use panicscope::core;
pub use panicscope::platform;
pub use panicscope::ui;
pub use panicscope::util;

use clap::Parser;
use std::path::PathBuf;

/// PanicScope - panic log puller and analyser.
///
/// Pulls the newest full panic report from a connected device with
/// idevicepaniclog and suggests the likely faulty component.
#[derive(Parser, Debug)]
#[command(name = "PanicScope", version, about)]
struct Cli {
    /// Extraction tool to run instead of the configured one.
    #[arg(short = 't', long = "tool")]
    tool: Option<PathBuf>,

    /// Seconds before the extraction tool is killed.
    #[arg(long = "timeout-secs")]
    timeout_secs: Option<u64>,

    /// Read configuration from this file instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Start an analysis as soon as the window opens.
    #[arg(short = 'a', long = "analyze")]
    analyze: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Apply CLI overrides on top of the validated config, validating them the
/// same way config.toml values are.
fn apply_overrides(
    cli: &Cli,
    config: &mut platform::config::AppConfig,
    warnings: &mut Vec<String>,
) {
    if let Some(ref tool) = cli.tool {
        config.tool_program = tool.display().to_string();
        // Arguments configured for a different tool would not apply.
        config.tool_args.clear();
    }
    if let Some(secs) = cli.timeout_secs {
        match platform::config::check_range(
            "--timeout-secs",
            secs,
            util::constants::MIN_TOOL_TIMEOUT_SECS,
            util::constants::MAX_TOOL_TIMEOUT_SECS,
        ) {
            Ok(v) => config.tool_timeout_secs = v,
            Err(e) => warnings.push(format!(
                "{e}. Using {}s.",
                config.tool_timeout_secs
            )),
        }
    }
}

/// Resolve and load the configuration for this launch.
///
/// An explicit `--config` path must exist and parse; the platform default
/// is optional and falls back to defaults with a warning.
fn load_startup_config(
    cli: &Cli,
) -> util::error::Result<(PathBuf, platform::config::AppConfig, Vec<String>)> {
    match cli.config {
        Some(ref path) => {
            let (config, warnings) = platform::config::load_config_required(path)?;
            Ok((path.clone(), config, warnings))
        }
        None => {
            let path = platform::config::PlatformPaths::resolve().config_file();
            let (config, warnings) = platform::config::load_config(&path);
            Ok((path, config, warnings))
        }
    }
}

/// Scale every text style from the configured body size.
fn configure_text_size(ctx: &egui::Context, body: f32) {
    ctx.style_mut(|style| {
        for (text_style, font_id) in style.text_styles.iter_mut() {
            font_id.size = match text_style {
                egui::TextStyle::Small => body * 0.75,
                egui::TextStyle::Heading => body * 1.4,
                _ => body,
            };
        }
    });
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging so that [logging] level can take effect.
    let (config_path, mut config, mut warnings) = match load_startup_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };
    apply_overrides(&cli, &mut config, &mut warnings);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        tool = %config.tool_program,
        timeout_secs = config.tool_timeout_secs,
        "PanicScope starting"
    );
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    let dark_mode = config.dark_mode;
    let font_size = config.font_size;
    let mut state = app::state::AppState::new(config, warnings, cli.debug);
    state.request_analyze = cli.analyze;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(if dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            configure_text_size(&cc.egui_ctx, font_size);
            Ok(Box::new(gui::PanicScopeApp::new(state)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch PanicScope GUI: {e}");
        std::process::exit(1);
    }
}
