//! Appearance page: swatch grid plus theme rows.

use eframe::egui::{self, Color32, Rounding, Sense, Stroke, Vec2};
use spowlo_core::screens::{appearance_view, find_item, SettingId, SettingItem, Swatch};
use spowlo_core::{SettingsAction, SettingsPage};

use crate::app::SpowloApp;
use crate::ui::colors;
use crate::ui::dialogs::Dialog;
use crate::ui::items::{self, ItemEvent};

const SWATCH_SIZE: f32 = 44.0;

pub fn render(app: &mut SpowloApp, ui: &mut egui::Ui) {
    let page = SettingsPage::Appearance;
    items::page_header(ui, page.title(), page.description());

    let view = appearance_view(&app.prefs, &app.caps);

    egui::ScrollArea::horizontal()
        .id_salt("swatches")
        .show(ui, |ui| {
            for row in &view.swatches {
                ui.horizontal(|ui| {
                    for swatch in row {
                        if swatch_button(ui, swatch).clicked() {
                            app.apply(SettingsAction::SelectSwatch {
                                seed: swatch.seed,
                                style: swatch.style,
                            });
                        }
                    }
                });
            }
        });

    ui.add_space(12.0);

    for event in items::render_items(ui, &view.items) {
        match event {
            ItemEvent::Toggled(SettingId::DynamicColor) => {
                let enabled = items_checked(&view.items, SettingId::DynamicColor);
                app.apply(SettingsAction::SetDynamicColor(!enabled));
            }
            ItemEvent::Toggled(id) => app.apply(SettingsAction::Toggle(id)),
            ItemEvent::ChoiceOpened(SettingId::DarkTheme) => app.dialog = Some(Dialog::DarkTheme),
            ItemEvent::ChoiceOpened(SettingId::Language) => app.dialog = Some(Dialog::Language),
            _ => {}
        }
    }
}

fn items_checked(items: &[SettingItem], id: SettingId) -> bool {
    find_item(items, id)
        .and_then(|item| item.is_checked())
        .unwrap_or(false)
}

/// A round swatch split into the palette's three accents.
fn swatch_button(ui: &mut egui::Ui, swatch: &Swatch) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), Sense::click());
    let painter = ui.painter_at(rect);
    let [primary, secondary, tertiary] = swatch.colors.map(colors::from_argb);

    let radius = SWATCH_SIZE / 2.0 - 2.0;
    let center = rect.center();
    painter.circle_filled(center, radius, primary);

    // Lower half: secondary on the left, tertiary on the right.
    let lower = egui::Rect::from_min_max(
        egui::pos2(center.x - radius * 0.7, center.y),
        egui::pos2(center.x, center.y + radius * 0.7),
    );
    painter.rect_filled(lower, Rounding::same(2.0), secondary);
    painter.rect_filled(
        lower.translate(Vec2::new(radius * 0.7, 0.0)),
        Rounding::same(2.0),
        tertiary,
    );

    if swatch.selected {
        painter.circle_stroke(center, radius, Stroke::new(3.0, ui.visuals().selection.bg_fill));
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            "✔",
            egui::FontId::proportional(16.0),
            Color32::BLACK,
        );
    } else if response.hovered() {
        painter.circle_stroke(center, radius, Stroke::new(1.0, colors::border(ui.visuals())));
    }

    response.on_hover_text(swatch.style.label())
}
