//! What the host platform offers for theming and localization.

use tracing::{debug, info};

/// Minimum platform level at which per-app language selection is offered.
pub const LANGUAGE_MIN_PLATFORM_VERSION: u32 = 24;

/// Platform level reported by desktop builds.
const DESKTOP_PLATFORM_VERSION: u32 = 33;

/// Locale tags offered on the language dialog. Empty follows the system.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("", "Follow system"),
    ("en-US", "English"),
    ("es-ES", "Español"),
    ("de-DE", "Deutsch"),
    ("fr-FR", "Français"),
    ("it-IT", "Italiano"),
    ("pt-BR", "Português (Brasil)"),
    ("tr-TR", "Türkçe"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub platform_version: u32,
    /// Accent seed supplied by the platform, if it has one.
    pub dynamic_seed: Option<u32>,
}

impl Capabilities {
    /// Detect capabilities of the running desktop.
    ///
    /// `SPOWLO_ACCENT_COLOR` (hex RGB or ARGB) provides the dynamic seed and
    /// `SPOWLO_PLATFORM_VERSION` overrides the reported level.
    pub fn detect() -> Self {
        let platform_version = std::env::var("SPOWLO_PLATFORM_VERSION")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DESKTOP_PLATFORM_VERSION);

        let dynamic_seed = std::env::var("SPOWLO_ACCENT_COLOR")
            .ok()
            .and_then(|v| parse_hex_color(&v));

        let caps = Self {
            platform_version,
            dynamic_seed,
        };
        debug!(?caps, "Detected platform capabilities");
        caps
    }

    pub fn supports_dynamic_color(&self) -> bool {
        self.dynamic_seed.is_some()
    }

    pub fn supports_language_selection(&self) -> bool {
        self.platform_version >= LANGUAGE_MIN_PLATFORM_VERSION
    }

    /// Hand a locale list to the platform. One-way; nothing comes back.
    pub fn apply_locale(&self, tag: &str) {
        if !self.supports_language_selection() {
            return;
        }
        if tag.is_empty() {
            info!("Locale follows system");
        } else {
            info!(locale = %tag, "Applying locale");
        }
    }
}

/// Parse `#RRGGBB`, `RRGGBB` or `AARRGGBB`. Six-digit colors are opaque.
pub fn parse_hex_color(raw: &str) -> Option<u32> {
    let hex = raw.trim().trim_start_matches('#');
    let value = u32::from_str_radix(hex, 16).ok()?;
    match hex.len() {
        6 => Some(0xFF00_0000 | value),
        8 => Some(value),
        _ => None,
    }
}

/// Display name for a stored locale tag.
pub fn language_label(tag: &str) -> &str {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, label)| *label)
        .unwrap_or(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_gate() {
        let old = Capabilities {
            platform_version: 23,
            dynamic_seed: None,
        };
        let new = Capabilities {
            platform_version: 24,
            dynamic_seed: None,
        };
        assert!(!old.supports_language_selection());
        assert!(new.supports_language_selection());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#3366CC"), Some(0xFF33_66CC));
        assert_eq!(parse_hex_color("803366cc"), Some(0x8033_66CC));
        assert_eq!(parse_hex_color("#36C"), None);
        assert_eq!(parse_hex_color("blue"), None);
    }

    #[test]
    fn test_language_label() {
        assert_eq!(language_label(""), "Follow system");
        assert_eq!(language_label("es-ES"), "Español");
        assert_eq!(language_label("xx-YY"), "xx-YY");
    }

    #[test]
    fn test_language_list_has_one_system_entry() {
        let system: Vec<_> = SUPPORTED_LANGUAGES
            .iter()
            .filter(|(tag, _)| tag.is_empty())
            .collect();
        assert_eq!(system, vec![&("", "Follow system")]);
    }

    #[test]
    fn test_dynamic_color_support() {
        let caps = Capabilities {
            platform_version: 33,
            dynamic_seed: Some(0xFF00_00FF),
        };
        assert!(caps.supports_dynamic_color());
    }
}
