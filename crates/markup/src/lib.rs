//! Segment model and the markup grammar that produces it.
//!
//! ```text
//! line    := (plain-char | segment)*
//! segment := '[' attrs ':' text ']'
//! attrs   := attr (',' attr)*
//! attr    := 'F=' color | 'B=' color | 'U=' color | 'T=' int | 'u'
//! ```

pub mod parser;
pub mod segment;

pub use parser::{parse, scan, MarkupError};
pub use segment::Segment;

use limebar_config::BarConfig;
use limebar_theme::{Color, Theme};

/// How input lines become segments.  Fixed for the whole process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    /// Lines follow the bracket grammar.
    Markup,
    /// The whole line is one segment in font 0.
    Raw { foreground: Color },
}

impl InputMode {
    pub fn from_config(config: &BarConfig, theme: &Theme) -> Self {
        if config.global.raw {
            Self::Raw { foreground: theme.text_color }
        } else {
            Self::Markup
        }
    }

    /// Turn one input line into a fresh segment list.
    pub fn parse(&self, line: &str) -> Vec<Segment> {
        match self {
            Self::Markup => parser::parse(line),
            Self::Raw { foreground } => vec![Segment::raw(line, *foreground)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_mode_ignores_brackets() {
        let mode = InputMode::Raw { foreground: Color::WHITE };
        for line in ["hello", "[F=#ff0000:hello]", "[[["] {
            let segs = mode.parse(line);
            assert_eq!(segs.len(), 1);
            assert_eq!(segs[0].text, line);
            assert_eq!(segs[0].font_index, 0);
            assert_eq!(segs[0].foreground, Some(Color::WHITE));
        }
    }

    #[test]
    fn mode_follows_config() {
        let mut cfg = BarConfig::default();
        cfg.theme.text_color = "#00ff00".into();
        let theme = Theme::from_config(&cfg);
        assert_eq!(InputMode::from_config(&cfg, &theme), InputMode::Markup);

        cfg.global.raw = true;
        assert_eq!(
            InputMode::from_config(&cfg, &theme),
            InputMode::Raw { foreground: Color::rgba(0.0, 1.0, 0.0, 1.0) }
        );
    }
}
