// PanicScope - ui/panels/findings.rs
//
// Interpretation & repair suggestion list, or the informational notice
// from a run that produced no findings. Errors go to the error dialog.

use crate::app::state::AppState;
use crate::core::report::FINDINGS_HEADING;
use crate::ui::theme;

/// Render the findings pane (bottom panel).
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.strong("\u{1f6e0} Interpretation & Fix");
    ui.separator();

    if state.analysis_in_progress {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(&state.status_message);
        });
        return;
    }

    if state.blocking_notice().is_some() {
        ui.label(egui::RichText::new("Analysis failed. See the error dialog.").weak());
        return;
    }

    if let Some(ref notice) = state.notice {
        egui::Frame::group(ui.style())
            .fill(theme::notice_bg_colour(notice.level))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    egui::RichText::new(&notice.title)
                        .strong()
                        .color(theme::notice_text_colour(notice.level)),
                );
                ui.label(&notice.guidance);
            });
        return;
    }

    let Some(ref report) = state.report else {
        ui.label(egui::RichText::new("Press Analyze to pull the latest panic log.").weak());
        return;
    };

    egui::ScrollArea::vertical()
        .id_salt("findings")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            ui.label(format!("Latest log: {}", report.log_name));
            ui.label(
                egui::RichText::new(format!(
                    "Modified {}",
                    report.log_modified.format("%Y-%m-%d %H:%M:%S")
                ))
                .small()
                .weak(),
            );
            ui.add_space(6.0);
            ui.label(egui::RichText::new(FINDINGS_HEADING).strong());
            ui.add_space(6.0);

            for finding in &report.classification.findings {
                ui.label(
                    egui::RichText::new(format!(
                        "{} {}",
                        theme::finding_icon(finding.kind),
                        finding.cause
                    ))
                    .strong()
                    .color(theme::finding_colour(finding.kind)),
                );
                ui.label(format!("\u{1f527} {}", finding.fix));
                ui.add_space(8.0);
            }
        });
}
