// PanicScope - ui/panels/about.rs
//
// About dialog: shown when the user clicks the ⓘ button in the top bar.
// Rendered as a centred, non-resizable, non-collapsible window.

use crate::app::state::AppState;
use crate::util::constants::{APP_NAME, APP_VERSION};

/// Render the About dialog (if `state.show_about` is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_about {
        return;
    }

    let mut open = true;
    egui::Window::new(format!("About {APP_NAME}"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .min_width(360.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(8.0);

            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(format!("\u{1f50d}  {APP_NAME}"))
                        .size(28.0)
                        .strong(),
                );
                ui.add_space(4.0);
                ui.label(egui::RichText::new(format!("v{APP_VERSION}")).size(14.0).weak());
            });

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(8.0);

            ui.vertical_centered(|ui| {
                ui.label("Pulls the latest panic log from a connected device");
                ui.label("and suggests the likely faulty component.");
            });

            ui.add_space(10.0);

            egui::Grid::new("about_tool_grid")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Extraction tool:");
                    ui.monospace(state.analysis_settings().tool.display());
                    ui.end_row();

                    ui.label("Timeout:");
                    ui.label(format!("{}s", state.config.tool_timeout_secs));
                    ui.end_row();
                });

            ui.add_space(8.0);
            ui.separator();
            ui.add_space(6.0);

            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("Requires libimobiledevice").small().weak());
                ui.label(egui::RichText::new("Built with Rust & egui").small().weak());
            });

            ui.add_space(8.0);
        });

    if !open {
        state.show_about = false;
    }
}
