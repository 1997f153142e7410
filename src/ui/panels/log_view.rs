// PanicScope - ui/panels/log_view.rs
//
// Raw panic log pane. Shows the first `raw_log_display_chars` characters
// of the analysed log in a read-only monospace scroll area.

use crate::app::state::AppState;

/// Render the raw log pane (central panel).
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.horizontal(|ui| {
        ui.strong("\u{1f4c4} Panic Log (Raw)");
        if let Some(ref report) = state.report {
            ui.label(egui::RichText::new(&report.log_name).weak());
        }
    });
    ui.separator();

    let Some((excerpt, truncated)) = state.raw_log_excerpt() else {
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new("No log loaded.").weak());
        });
        return;
    };

    if truncated {
        ui.label(
            egui::RichText::new(format!(
                "Showing the first {} characters. Use Copy Report for the findings.",
                state.config.raw_log_display_chars
            ))
            .small()
            .weak(),
        );
    }

    egui::ScrollArea::both()
        .id_salt("raw_log")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            ui.label(egui::RichText::new(excerpt).monospace());
        });
}
