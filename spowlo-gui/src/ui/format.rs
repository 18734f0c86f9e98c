//! Format page.

use eframe::egui::{self, RichText, Rounding};
use spowlo_core::prefs::keys::{CUSTOM_COMMAND, CUSTOM_COMMAND_TEMPLATE};
use spowlo_core::screens::{format_items, SettingId};
use spowlo_core::{SettingsAction, SettingsPage};

use crate::app::SpowloApp;
use crate::ui::colors;
use crate::ui::dialogs::Dialog;
use crate::ui::items::{self, ItemEvent};

pub fn render(app: &mut SpowloApp, ui: &mut egui::Ui) {
    let page = SettingsPage::Format;
    items::page_header(ui, page.title(), page.description());

    let rows = format_items(&app.prefs);
    for event in items::render_items(ui, &rows) {
        match event {
            ItemEvent::Toggled(id) => app.apply(SettingsAction::Toggle(id)),
            ItemEvent::ChoiceOpened(SettingId::AudioFormat) => {
                app.dialog = Some(Dialog::AudioFormat);
            }
            ItemEvent::ChoiceOpened(SettingId::AudioQuality) => {
                app.dialog = Some(Dialog::AudioQuality);
            }
            _ => {}
        }
    }

    if app.prefs.get_value(&CUSTOM_COMMAND) {
        ui.add_space(12.0);
        let template = app.prefs.get_value(&CUSTOM_COMMAND_TEMPLATE);
        let muted = colors::muted(ui.visuals());

        ui.label(RichText::new("Template").size(14.0).strong());
        ui.label(
            RichText::new(if template.is_empty() {
                "No template set"
            } else {
                template.as_str()
            })
            .monospace()
            .color(muted),
        );
        if ui
            .add(egui::Button::new("Edit template").rounding(Rounding::same(8.0)))
            .clicked()
        {
            app.template_draft = template;
            app.dialog = Some(Dialog::CustomTemplate);
        }
    }
}
