// PanicScope - gui.rs
//
// Top-level eframe::App implementation.
// Wires together the UI panels and manages the analysis lifecycle.

use crate::app::analysis::AnalysisManager;
use crate::app::state::AppState;
use crate::ui;
use crate::util::constants::{MAX_ANALYSIS_MESSAGES_PER_FRAME, TOOL_POLL_INTERVAL_MS};

/// The PanicScope application.
pub struct PanicScopeApp {
    pub state: AppState,
    pub analysis_manager: AnalysisManager,
}

impl PanicScopeApp {
    /// Create a new application instance with the given state.
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            analysis_manager: AnalysisManager::new(),
        }
    }

    fn start_analysis(&mut self) {
        self.state.begin_analysis();
        self.analysis_manager
            .start(self.state.analysis_settings());
    }
}

impl eframe::App for PanicScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll for analysis progress
        let messages = self
            .analysis_manager
            .poll_progress(MAX_ANALYSIS_MESSAGES_PER_FRAME);
        for msg in messages {
            self.state.apply_progress(msg);
        }
        // The worker only reports on state changes, so keep repainting while
        // it runs to pick them up promptly.
        if self.state.analysis_in_progress {
            ctx.request_repaint_after(std::time::Duration::from_millis(TOOL_POLL_INTERVAL_MS * 2));
        }

        // ---- Handle flags set by panels ----
        if self.state.request_analyze {
            self.state.request_analyze = false;
            self.start_analysis();
        }
        if self.state.request_cancel {
            self.state.request_cancel = false;
            self.analysis_manager.cancel();
            self.state.status_message = "Cancelling...".to_string();
        }

        // Top bar
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let busy = self.state.analysis_in_progress;
                let can_analyze = self.state.can_analyze();
                let analyze = egui::Button::new(
                    egui::RichText::new("\u{1f50d} Analyze Panic Log")
                        .strong()
                        .color(egui::Color32::WHITE),
                )
                .fill(ui::theme::ACCENT);
                if ui.add_enabled(can_analyze, analyze).clicked() {
                    self.state.request_analyze = true;
                }

                if busy && ui.button("Cancel").clicked() {
                    self.state.request_cancel = true;
                }

                let has_report = self.state.report.is_some();
                if ui
                    .add_enabled(has_report, egui::Button::new("Copy Report"))
                    .on_hover_text("Copy the findings to the clipboard")
                    .clicked()
                {
                    if let Some(text) = self.state.report_text() {
                        ctx.copy_text(text);
                        self.state.status_message = "Copied report to clipboard.".to_string();
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("\u{24d8}").on_hover_text("About").clicked() {
                        self.state.show_about = true;
                    }
                });
            });
            ui.add_space(6.0);
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    if self.state.analysis_in_progress {
                        ui.spinner();
                    }
                    ui.label(&self.state.status_message);
                    if self.state.debug_mode {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(egui::RichText::new("DEBUG").small().weak());
                        });
                    }
                });
            });

        // Findings pane (bottom)
        egui::TopBottomPanel::bottom("findings_pane")
            .resizable(true)
            .default_height(ui::theme::FINDINGS_PANEL_HEIGHT)
            .show(ctx, |ui| {
                ui::panels::findings::render(ui, &self.state);
            });

        // Central panel (raw log)
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::log_view::render(ui, &self.state);
        });

        ui::panels::about::render(ctx, &mut self.state);
        ui::panels::config_warnings::render(ctx, &mut self.state);
        ui::panels::error_notice::render(ctx, &mut self.state);
    }

    /// Called by eframe when the window is about to close. Signals a run
    /// still in flight to kill its tool process.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.analysis_manager.cancel();
    }
}
