//! Status bar at the bottom of the window.

use eframe::egui::{self, RichText};

use crate::app::SpowloApp;
use crate::ui::colors;

/// Render the status bar.
pub fn render(app: &SpowloApp, ui: &mut egui::Ui) {
    let muted = colors::muted(ui.visuals());

    ui.horizontal(|ui| {
        // Status message
        if let Some((notification, _)) = &app.status_message {
            let color = if notification.is_error() {
                colors::ERROR
            } else {
                muted
            };
            ui.label(RichText::new(&notification.message).size(11.0).color(color));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(format!("v{}", spowlo_core::VERSION))
                    .size(11.0)
                    .color(muted),
            );
            ui.separator();
            ui.label(
                RichText::new(format!("spotDL: {}", app.config.library_executable))
                    .size(11.0)
                    .color(muted),
            );
        });
    });
}
