//! UI components for Spowlo.

pub mod appearance;
pub mod dialogs;
pub mod format;
pub mod general;
pub mod items;
pub mod menu;
pub mod status;
pub mod updater;

// Theme-aware colors for the UI
pub mod colors {
    use eframe::egui::{Color32, Visuals};
    use spowlo_core::theme::argb_channels;

    /// Success green
    pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);

    /// Error red
    pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);

    /// Convert a stored ARGB color. Alpha is ignored.
    pub fn from_argb(argb: u32) -> Color32 {
        let (r, g, b) = argb_channels(argb);
        Color32::from_rgb(r, g, b)
    }

    /// Get muted text color based on theme
    pub fn muted(visuals: &Visuals) -> Color32 {
        if visuals.dark_mode {
            Color32::from_rgb(156, 163, 175)
        } else {
            Color32::from_rgb(100, 100, 110)
        }
    }

    /// Row background on settings pages
    pub fn card_bg(visuals: &Visuals) -> Color32 {
        if visuals.dark_mode {
            Color32::from_rgb(40, 40, 45)
        } else {
            Color32::from_rgb(245, 245, 250)
        }
    }

    /// Get border color based on theme
    pub fn border(visuals: &Visuals) -> Color32 {
        if visuals.dark_mode {
            Color32::from_rgb(70, 70, 75)
        } else {
            Color32::from_rgb(200, 200, 210)
        }
    }
}
