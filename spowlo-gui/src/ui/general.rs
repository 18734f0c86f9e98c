//! General page.

use eframe::egui::{self, RichText, Rounding};
use spowlo_core::screens::general_items;
use spowlo_core::{SettingsAction, SettingsPage};

use crate::app::SpowloApp;
use crate::ui::colors;
use crate::ui::items::{self, ItemEvent};

pub fn render(app: &mut SpowloApp, ui: &mut egui::Ui) {
    let page = SettingsPage::General;
    items::page_header(ui, page.title(), page.description());

    let rows = general_items(&app.prefs, app.version_query.state());
    for event in items::render_items(ui, &rows) {
        match event {
            ItemEvent::Toggled(id) => app.apply(SettingsAction::Toggle(id)),
            ItemEvent::SliderMoved(_, raw) => app.apply(SettingsAction::SetThreads(raw)),
            _ => {}
        }
    }

    ui.add_space(12.0);
    render_download_dir(app, ui);

    if app.shared_link.is_some() {
        ui.add_space(12.0);
        render_shared_link(app, ui);
    }
}

fn render_download_dir(app: &mut SpowloApp, ui: &mut egui::Ui) {
    let muted = colors::muted(ui.visuals());
    let dir = app
        .config
        .effective_download_dir()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "Not set".to_string());

    ui.horizontal(|ui| {
        ui.label(RichText::new("📁").size(18.0));
        ui.vertical(|ui| {
            ui.label(RichText::new("Download directory").size(14.0).strong());
            ui.label(RichText::new(dir).size(12.0).color(muted));
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add(egui::Button::new("Choose...").rounding(Rounding::same(8.0)))
                .clicked()
            {
                app.open_folder_dialog();
            }
        });
    });
}

fn render_shared_link(app: &mut SpowloApp, ui: &mut egui::Ui) {
    let Some(url) = app.shared_link.as_ref().map(|l| l.url().to_string()) else {
        return;
    };
    let muted = colors::muted(ui.visuals());

    ui.separator();
    ui.label(RichText::new("Shared link").size(14.0).strong());
    ui.label(RichText::new(&url).size(12.0).color(muted));

    ui.horizontal(|ui| {
        if app.is_downloading() {
            ui.spinner();
            ui.label(RichText::new("Downloading...").size(12.0).color(muted));
        } else if ui
            .add(
                egui::Button::new(RichText::new("Download").strong())
                    .rounding(Rounding::same(8.0)),
            )
            .clicked()
        {
            app.start_download();
        }

        if ui.link("Open in browser").clicked() {
            if let Err(e) = webbrowser::open(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }
    });
}
