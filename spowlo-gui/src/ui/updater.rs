//! Updater page.

use eframe::egui::{self, RichText};
use spowlo_core::screens::{updater_items, SettingId};
use spowlo_core::{SettingsAction, SettingsPage, UpdateChannel};

use crate::app::SpowloApp;
use crate::ui::colors;
use crate::ui::items::{self, ItemEvent};

pub fn render(app: &mut SpowloApp, ui: &mut egui::Ui) {
    let page = SettingsPage::Updater;
    items::page_header(ui, page.title(), page.description());

    let rows = updater_items(&app.prefs, app.updater.is_loading());
    for event in items::render_items(ui, &rows) {
        match event {
            ItemEvent::Toggled(id) => app.apply(SettingsAction::Toggle(id)),
            ItemEvent::RadioSelected(SettingId::ChannelStable) => {
                app.apply(SettingsAction::SetUpdateChannel(UpdateChannel::Stable));
            }
            ItemEvent::RadioSelected(SettingId::ChannelPreRelease) => {
                app.apply(SettingsAction::SetUpdateChannel(UpdateChannel::PreRelease));
            }
            ItemEvent::Clicked(SettingId::CheckForUpdates) => app.check_for_updates(),
            _ => {}
        }
    }

    if let Some(installer) = &app.installer {
        ui.add_space(12.0);
        ui.label(
            RichText::new(format!("Downloading Spowlo {}", installer.version()))
                .size(14.0)
                .strong(),
        );
        match installer.progress().and_then(|p| p.percent) {
            Some(percent) => {
                ui.add(egui::ProgressBar::new(percent / 100.0).show_percentage());
            }
            None => {
                ui.spinner();
            }
        }
    }

    ui.add_space(12.0);
    ui.label(
        RichText::new(format!("Current version: {}", spowlo_core::VERSION))
            .size(11.0)
            .color(colors::muted(ui.visuals())),
    );
}
