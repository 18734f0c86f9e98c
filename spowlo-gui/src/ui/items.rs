//! Rendering of settings rows.

use eframe::egui::{self, RichText, Rounding, Vec2};
use spowlo_core::screens::{ItemKind, SettingId, SettingItem};

use crate::ui::colors;

/// What the user did with a row this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemEvent {
    Toggled(SettingId),
    SliderMoved(SettingId, f32),
    ChoiceOpened(SettingId),
    RadioSelected(SettingId),
    Clicked(SettingId),
}

/// Page heading with its description.
pub fn page_header(ui: &mut egui::Ui, title: &str, description: &str) {
    ui.add_space(8.0);
    ui.heading(RichText::new(title).size(22.0));
    ui.label(
        RichText::new(description)
            .size(12.0)
            .color(colors::muted(ui.visuals())),
    );
    ui.add_space(12.0);
}

/// Render rows in order, returning the interactions.
pub fn render_items(ui: &mut egui::Ui, items: &[SettingItem]) -> Vec<ItemEvent> {
    items
        .iter()
        .filter_map(|item| render_item(ui, item))
        .collect()
}

fn render_item(ui: &mut egui::Ui, item: &SettingItem) -> Option<ItemEvent> {
    let visuals = ui.visuals().clone();
    let muted = colors::muted(&visuals);
    let mut event = None;

    egui::Frame::none()
        .fill(colors::card_bg(&visuals))
        .stroke(egui::Stroke::new(1.0, colors::border(&visuals)))
        .rounding(Rounding::same(8.0))
        .inner_margin(egui::Margin::symmetric(12.0, 10.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.add_enabled_ui(item.enabled, |ui| {
                ui.horizontal(|ui| {
                    match &item.kind {
                        ItemKind::Button { busy: true } => {
                            ui.spinner();
                        }
                        ItemKind::Radio { selected } => {
                            if ui.radio(*selected, "").clicked() && !selected {
                                event = Some(ItemEvent::RadioSelected(item.id));
                            }
                        }
                        _ if !item.icon.is_empty() => {
                            ui.label(RichText::new(item.icon).size(18.0));
                        }
                        _ => {}
                    }

                    ui.vertical(|ui| {
                        ui.label(RichText::new(item.label).size(14.0).strong());
                        if let Some(description) = &item.description {
                            ui.label(RichText::new(description).size(12.0).color(muted));
                        }
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(e) = render_control(ui, item) {
                            event = Some(e);
                        }
                    });
                });

                if let ItemKind::Slider {
                    value,
                    min,
                    max,
                    steps,
                } = item.kind
                {
                    let mut raw = value;
                    let step = if steps > 0 {
                        f64::from(max - min) / steps as f64
                    } else {
                        1.0
                    };
                    let response = ui.add(
                        egui::Slider::new(&mut raw, min..=max)
                            .step_by(step)
                            .show_value(false),
                    );
                    if response.changed() {
                        event = Some(ItemEvent::SliderMoved(item.id, raw));
                    }
                }
            });
        });

    ui.add_space(6.0);
    event
}

fn render_control(ui: &mut egui::Ui, item: &SettingItem) -> Option<ItemEvent> {
    match &item.kind {
        ItemKind::Toggle { checked } => {
            let mut value = *checked;
            ui.checkbox(&mut value, "")
                .changed()
                .then_some(ItemEvent::Toggled(item.id))
        }
        ItemKind::Choice { current } => ui
            .add(egui::Button::new(current.as_str()).rounding(Rounding::same(8.0)))
            .clicked()
            .then_some(ItemEvent::ChoiceOpened(item.id)),
        ItemKind::Button { busy } => ui
            .add_enabled(
                !busy,
                egui::Button::new(RichText::new(item.label).strong())
                    .min_size(Vec2::new(120.0, 28.0))
                    .rounding(Rounding::same(8.0)),
            )
            .clicked()
            .then_some(ItemEvent::Clicked(item.id)),
        ItemKind::Info | ItemKind::Slider { .. } | ItemKind::Radio { .. } => None,
    }
}
