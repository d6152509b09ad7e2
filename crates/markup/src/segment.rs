use limebar_config::Alignment;
use limebar_theme::Color;

/// One styled run of text.
///
/// Every segment owns its text and colors outright; a new input line
/// always builds a fresh `Vec<Segment>`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Segment {
    pub text: String,
    /// `None` = default foreground.
    pub foreground: Option<Color>,
    /// `None` = no background rectangle.
    pub background: Option<Color>,
    /// `None` = fall back to the foreground, then the theme default.
    pub underline_color: Option<Color>,
    /// 0-based index into the configured font list.
    pub font_index: usize,
    pub underline: bool,
    /// Per-segment alignment.  Nothing in the markup sets it and layout
    /// ignores it: the bar-wide alignment always applies.
    pub alignment: Option<Alignment>,
}

impl Segment {
    /// A plain segment in the default font.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// The single segment raw mode builds from a whole input line.
    pub fn raw(line: impl Into<String>, foreground: Color) -> Self {
        Self {
            text: line.into(),
            foreground: Some(foreground),
            ..Self::default()
        }
    }
}
