// PanicScope - ui/panels/error_notice.rs
//
// Error dialog for a failed run. Stays open, with Analyze disabled, until
// the user acknowledges it.

use crate::app::state::{AppState, NoticeLevel};
use crate::ui::theme;

/// Render the error dialog (if an error notice is pending).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    let Some(notice) = state.blocking_notice() else {
        return;
    };

    let mut dismiss = false;
    egui::Window::new("Analysis Failed")
        .collapsible(false)
        .resizable(false)
        .min_width(380.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(format!("\u{26d4} {}", notice.title))
                    .strong()
                    .color(theme::notice_text_colour(NoticeLevel::Error)),
            );
            ui.add_space(6.0);
            ui.label(&notice.guidance);
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    dismiss = true;
                }
            });
        });

    if dismiss || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        state.dismiss_notice();
    }
}
