//! The global default table consulted when no theme overlay overrides a key.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Presentation keys understood by the built-in widgets.
pub struct ThemeKey;

impl ThemeKey {
    pub const FONT_FAMILY: &'static str = "font-family";
    pub const FONT_SIZE: &'static str = "font-size";
    pub const COLOR: &'static str = "color";
    pub const BACKGROUND_COLOR: &'static str = "background-color";
    pub const BUTTON_CLASS: &'static str = "button-class";
    pub const TOOLTIP_CLASS: &'static str = "tooltip-class";
    pub const TOOLTIP_DELAY: &'static str = "tooltip-delay";
    pub const TABLE_CLASS: &'static str = "table-class";

    /// Keys that are also style properties; inherited values for these are
    /// written into the node's own rule-set.
    pub fn is_style_property(key: &str) -> bool {
        matches!(
            key,
            Self::FONT_FAMILY | Self::FONT_SIZE | Self::COLOR | Self::BACKGROUND_COLOR
        )
    }

    /// Keys whose value must parse as a millisecond duration.
    pub fn is_duration(key: &str) -> bool {
        key == Self::TOOLTIP_DELAY
    }
}

static GLOBAL_DEFAULTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (ThemeKey::FONT_FAMILY, "sans-serif"),
        (ThemeKey::FONT_SIZE, "14px"),
        (ThemeKey::COLOR, "#222222"),
        (ThemeKey::BACKGROUND_COLOR, "transparent"),
        (ThemeKey::BUTTON_CLASS, "arbor-button"),
        (ThemeKey::TOOLTIP_CLASS, "arbor-tooltip"),
        (ThemeKey::TOOLTIP_DELAY, "500"),
        (ThemeKey::TABLE_CLASS, "arbor-table"),
    ])
});

/// Looks up the framework-wide default for a presentation key.
pub fn global_default(key: &str) -> Option<&'static str> {
    GLOBAL_DEFAULTS.get(key).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_defaults() {
        assert_eq!(global_default(ThemeKey::TOOLTIP_DELAY), Some("500"));
        assert_eq!(global_default(ThemeKey::FONT_FAMILY), Some("sans-serif"));
    }

    #[test]
    fn test_key_categories() {
        assert!(ThemeKey::is_style_property(ThemeKey::COLOR));
        assert!(!ThemeKey::is_style_property(ThemeKey::BUTTON_CLASS));
        assert!(ThemeKey::is_duration(ThemeKey::TOOLTIP_DELAY));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(global_default("no-such-key"), None);
    }
}
