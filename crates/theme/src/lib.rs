pub mod colors;

pub use colors::{Color, ColorError};

use limebar_config::BarConfig;

/// Compiled theme derived from [`BarConfig`].
///
/// All colors are pre-parsed from hex strings into normalised `[0, 1]` RGBA.
/// Calling [`Theme::from_config`] is infallible: invalid color strings fall
/// back to safe defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Bar background with the configured opacity already applied.
    pub background:      Color,
    /// Raw-mode text color.
    pub text_color:      Color,
    /// Last-resort underline color.
    pub underline_color: Color,
}

impl Theme {
    /// Build a [`Theme`] from the config's `[theme]` section and opacity.
    pub fn from_config(cfg: &BarConfig) -> Self {
        let theme = &cfg.theme;
        Self {
            background: parse_or_warn(&theme.background, Color::BLACK, "background")
                .scale_alpha(cfg.global.opacity),
            text_color:      parse_or_warn(&theme.text_color, Color::WHITE, "text color"),
            underline_color: parse_or_warn(&theme.underline_color, Color::WHITE, "underline color"),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&BarConfig::default())
    }
}

fn parse_or_warn(hex: &str, fallback: Color, what: &str) -> Color {
    Color::from_hex(hex).unwrap_or_else(|e| {
        tracing::warn!("{what}: {e}; falling back to {fallback:?}");
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme() {
        let t = Theme::default();
        assert!((t.background.r - 26.0 / 255.0).abs() < 1e-6);
        assert_eq!(t.background.a, 1.0);
        assert_eq!(t.text_color, Color::WHITE);
    }

    #[test]
    fn invalid_background_is_opaque_black() {
        let mut cfg = BarConfig::default();
        cfg.theme.background = "black".into();
        cfg.theme.text_color = "#12".into();
        let t = Theme::from_config(&cfg);
        assert_eq!(t.background, Color::BLACK);
        assert_eq!(t.text_color, Color::WHITE);
    }

    #[test]
    fn opacity_applies_to_background_only() {
        let mut cfg = BarConfig::default();
        cfg.global.opacity = 0.25;
        cfg.theme.background = "#000000".into();
        let t = Theme::from_config(&cfg);
        assert_eq!(t.background.a, 0.25);
        assert_eq!(t.text_color.a, 1.0);
    }
}
