// PanicScope - ui/panels/config_warnings.rs
//
// Startup config.toml warnings, listed until the user dismisses them.

use crate::app::state::AppState;

/// Render the config warnings window (if any warnings are pending).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if state.config_warnings.is_empty() {
        return;
    }

    let mut dismiss = false;
    egui::Window::new("Configuration Warnings")
        .collapsible(false)
        .resizable(true)
        .min_width(420.0)
        .anchor(egui::Align2::CENTER_TOP, [0.0, 40.0])
        .show(ctx, |ui| {
            for warning in &state.config_warnings {
                ui.label(format!("\u{26a0} {warning}"));
            }
            ui.add_space(6.0);
            if ui.button("Dismiss").clicked() {
                dismiss = true;
            }
        });

    if dismiss {
        state.config_warnings.clear();
    }
}
