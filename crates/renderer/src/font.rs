use std::fmt;
use std::str::FromStr;

/// Point size used when a descriptor names none.
pub const DEFAULT_SIZE: f32 = 12.0;

/// Slant of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// A pango-style font description such as `"Monospace Bold 12"`.
///
/// The trailing number is the size in points, trailing style words set
/// weight and slant, and whatever is left is the family.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub family: String,
    /// CSS weight, 100 – 900.
    pub weight: u16,
    pub style:  FontStyle,
    /// Size in points.
    pub size:   f32,
}

impl FontDescriptor {
    /// Size in pixels at 96 dpi.
    pub fn pixel_size(&self) -> f32 {
        self.size * 96.0 / 72.0
    }

    /// Line box height in pixels.
    pub fn line_height(&self) -> f32 {
        (self.pixel_size() * 1.2).ceil()
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "Monospace".to_string(),
            weight: 400,
            style:  FontStyle::Normal,
            size:   DEFAULT_SIZE,
        }
    }
}

impl FromStr for FontDescriptor {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|w| !w.is_empty())
            .collect();
        let mut desc = Self::default();

        if let Some(size) = words.last().and_then(|w| w.trim_end_matches("px").parse::<f32>().ok()) {
            if size > 0.0 {
                desc.size = size;
            }
            words.pop();
        }

        while let Some(word) = words.last() {
            match style_word(word) {
                Some(StyleWord::Weight(w)) => desc.weight = w,
                Some(StyleWord::Slant(s)) => desc.style = s,
                None => break,
            }
            words.pop();
        }

        if !words.is_empty() {
            desc.family = words.join(" ");
        }
        Ok(desc)
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}w {:?} {}", self.family, self.weight, self.style, self.size)
    }
}

enum StyleWord {
    Weight(u16),
    Slant(FontStyle),
}

fn style_word(word: &str) -> Option<StyleWord> {
    let w = match word.to_ascii_lowercase().as_str() {
        "thin" | "hairline" => 100,
        "ultralight" | "extralight" => 200,
        "light" => 300,
        "regular" | "normal" | "book" | "roman" => 400,
        "medium" => 500,
        "semibold" | "demibold" => 600,
        "bold" => 700,
        "ultrabold" | "extrabold" => 800,
        "heavy" | "black" => 900,
        "italic" => return Some(StyleWord::Slant(FontStyle::Italic)),
        "oblique" => return Some(StyleWord::Slant(FontStyle::Oblique)),
        _ => return None,
    };
    Some(StyleWord::Weight(w))
}
