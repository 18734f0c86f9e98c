//! Modal dialogs: single-choice pickers, the template editor and the update
//! offer.

use eframe::egui::{self, RichText, Rounding, Vec2};
use spowlo_core::library::{AudioFormat, AudioQuality};
use spowlo_core::prefs::keys::{AUDIO_FORMAT, AUDIO_QUALITY, LANGUAGE};
use spowlo_core::theme::SUPPORTED_LANGUAGES;
use spowlo_core::{DarkThemePreference, SettingsAction, ThemeSelection};

use crate::app::SpowloApp;
use crate::ui::colors;

/// Dialogs opened from settings rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    DarkTheme,
    AudioFormat,
    AudioQuality,
    Language,
    CustomTemplate,
}

impl Dialog {
    fn title(self) -> &'static str {
        match self {
            Self::DarkTheme => "Dark theme",
            Self::AudioFormat => "Audio format",
            Self::AudioQuality => "Audio quality",
            Self::Language => "Language",
            Self::CustomTemplate => "Custom command",
        }
    }
}

/// Render whichever dialog is open.
pub fn render(app: &mut SpowloApp, ctx: &egui::Context) {
    if app.updater.show_update_dialog() {
        render_update_dialog(app, ctx);
        return;
    }

    let Some(dialog) = app.dialog else {
        return;
    };

    let mut open = true;
    let mut chosen: Option<SettingsAction> = None;
    let mut close = false;

    egui::Window::new(dialog.title())
        .collapsible(false)
        .resizable(false)
        .default_width(360.0)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing = Vec2::new(8.0, 8.0);
            match dialog {
                Dialog::DarkTheme => {
                    let current = ThemeSelection::load(&app.prefs).dark_theme;
                    for &mode in DarkThemePreference::all() {
                        if ui.radio(current == mode, mode.label()).clicked() {
                            chosen = Some(SettingsAction::SetDarkTheme(mode));
                        }
                    }
                }
                Dialog::AudioFormat => {
                    let current = AudioFormat::from_index(app.prefs.get_value(&AUDIO_FORMAT));
                    for &format in AudioFormat::all() {
                        if ui.radio(current == format, format.to_string()).clicked() {
                            chosen = Some(SettingsAction::SetAudioFormat(format));
                        }
                    }
                }
                Dialog::AudioQuality => {
                    let current = AudioQuality::from_index(app.prefs.get_value(&AUDIO_QUALITY));
                    for &quality in AudioQuality::all() {
                        if ui.radio(current == quality, quality.to_string()).clicked() {
                            chosen = Some(SettingsAction::SetAudioQuality(quality));
                        }
                    }
                }
                Dialog::Language => {
                    let current = app.prefs.get_value(&LANGUAGE);
                    for (tag, label) in SUPPORTED_LANGUAGES {
                        if ui.radio(current == *tag, *label).clicked() {
                            chosen = Some(SettingsAction::SetLanguage(tag.to_string()));
                        }
                    }
                }
                Dialog::CustomTemplate => {
                    ui.label(
                        RichText::new("Options passed to spotDL in place of the generated ones")
                            .size(12.0)
                            .color(colors::muted(ui.visuals())),
                    );
                    ui.add(
                        egui::TextEdit::multiline(&mut app.template_draft)
                            .code_editor()
                            .desired_rows(3)
                            .desired_width(f32::INFINITY),
                    );
                    ui.horizontal(|ui| {
                        if ui
                            .add(
                                egui::Button::new(RichText::new("Save").strong())
                                    .rounding(Rounding::same(8.0)),
                            )
                            .clicked()
                        {
                            chosen = Some(SettingsAction::SetCustomTemplate(
                                app.template_draft.trim().to_string(),
                            ));
                        }
                        if ui
                            .add(egui::Button::new("Cancel").rounding(Rounding::same(8.0)))
                            .clicked()
                        {
                            close = true;
                        }
                    });
                }
            }
        });

    if let Some(action) = chosen {
        app.apply(action);
        close = true;
    }
    if close || !open {
        app.dialog = None;
    }
}

fn render_update_dialog(app: &mut SpowloApp, ctx: &egui::Context) {
    let Some(release) = app.updater.latest_release().cloned() else {
        return;
    };

    let mut open = true;
    let mut install = false;
    let mut view = false;

    egui::Window::new("Update available")
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .open(&mut open)
        .show(ctx, |ui| {
            let muted = colors::muted(ui.visuals());

            ui.label(RichText::new(release.display_title()).size(16.0).strong());
            ui.label(
                RichText::new(format!(
                    "{} → {}",
                    spowlo_core::VERSION,
                    release.version
                ))
                .size(12.0)
                .color(muted),
            );
            if let Some(published) = release.published_at {
                ui.label(
                    RichText::new(format!("Published {}", published.format("%Y-%m-%d")))
                        .size(11.0)
                        .color(muted),
                );
            }
            if release.prerelease {
                ui.label(
                    RichText::new("Pre-release")
                        .size(11.0)
                        .color(colors::ERROR),
                );
            }

            ui.separator();
            egui::ScrollArea::vertical()
                .max_height(240.0)
                .show(ui, |ui| {
                    ui.label(RichText::new(&release.body).size(12.0));
                });
            ui.separator();

            ui.horizontal(|ui| {
                if ui
                    .add(
                        egui::Button::new(RichText::new("Download").strong())
                            .fill(ui.visuals().selection.bg_fill)
                            .rounding(Rounding::same(8.0)),
                    )
                    .clicked()
                {
                    install = true;
                }
                if ui
                    .add(egui::Button::new("View release").rounding(Rounding::same(8.0)))
                    .clicked()
                {
                    view = true;
                }
            });
        });

    if view {
        app.view_release();
    }
    if install {
        app.install_update();
    } else if !open {
        app.updater.dismiss_dialog();
    }
}
