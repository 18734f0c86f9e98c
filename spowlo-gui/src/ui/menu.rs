//! Top menu bar and page navigation.

use eframe::egui::{self, RichText};
use spowlo_core::prefs::keys::DARK_THEME_VALUE;
use spowlo_core::{DarkThemePreference, SettingsAction, SettingsPage};

use crate::app::SpowloApp;
use crate::ui::colors;

const RELEASES_URL: &str = "https://github.com/BobbyESP/Spowlo/releases";

/// Render the top menu bar.
pub fn render(app: &mut SpowloApp, ui: &mut egui::Ui, ctx: &egui::Context) {
    egui::menu::bar(ui, |ui| {
        // App title/logo
        ui.label(RichText::new("Spowlo").strong().size(15.0));
        ui.separator();

        // File menu
        ui.menu_button("File", |ui| {
            if ui.button("Download Directory...").clicked() {
                app.open_folder_dialog();
                ui.close_menu();
            }

            ui.separator();

            if ui.button("Quit").clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        // View menu
        ui.menu_button("View", |ui| {
            for &mode in DarkThemePreference::all() {
                let selected = app.prefs.get_value(&DARK_THEME_VALUE) == mode.value();
                if ui.radio(selected, mode.label()).clicked() {
                    app.apply(SettingsAction::SetDarkTheme(mode));
                    ui.close_menu();
                }
            }
        });

        // Help menu
        ui.menu_button("Help", |ui| {
            if ui.button("Check for Updates").clicked() {
                app.navigate(SettingsPage::Updater);
                app.check_for_updates();
                ui.close_menu();
            }

            ui.separator();

            if ui.button("Releases").clicked() {
                if let Err(e) = webbrowser::open(RELEASES_URL) {
                    tracing::warn!("Failed to open browser: {}", e);
                }
                ui.close_menu();
            }
        });

        // Right-aligned status
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if app.updater.is_loading() {
                ui.spinner();
                ui.label(
                    RichText::new("Checking for updates...")
                        .color(ui.visuals().hyperlink_color)
                        .size(12.0),
                );
            } else if app.updater.latest_release().is_some() {
                ui.label(
                    RichText::new("Update available")
                        .color(colors::SUCCESS)
                        .size(12.0),
                );
            }
        });
    });
}

/// Render the page list in the side panel.
pub fn render_nav(app: &mut SpowloApp, ui: &mut egui::Ui) {
    let muted = colors::muted(ui.visuals());
    ui.add_space(8.0);

    for &page in SettingsPage::all() {
        let selected = app.page == page;
        let response = ui.selectable_label(
            selected,
            RichText::new(format!("{}  {}", page.icon(), page.title())).size(14.0),
        );
        ui.label(RichText::new(page.description()).size(11.0).color(muted));
        ui.add_space(6.0);

        if response.clicked() {
            app.navigate(page);
        }
    }
}
