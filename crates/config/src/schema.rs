use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fonts used when neither the config file nor the command line names any.
pub const DEFAULT_FONTS: [&str; 2] = ["Monospace 12", "Monospace Bold 12"];

/// Upper bound for padding, underline thickness and margins, in pixels.
pub const MAX_EXTENT: i32 = u16::MAX as i32;

/// Root configuration structure parsed from `limebar.toml`.
///
/// Immutable once the bar starts: the session receives a finished copy
/// and never reloads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Surface geometry, placement and process behaviour.
    pub global: GlobalConfig,
    /// Horizontal layout of the segment line.
    pub layout: LayoutConfig,
    /// Theme / color settings.
    pub theme: ThemeConfig,
    /// Ordered font list.  Index 0 is the fallback and separator font.
    pub fonts: Vec<String>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            layout: LayoutConfig::default(),
            theme:  ThemeConfig::default(),
            fonts:  DEFAULT_FONTS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl BarConfig {
    /// Fold out-of-range or empty values back onto safe ones.
    ///
    /// After this call the font list is non-empty, opacity is in `[0, 1]`
    /// and an empty separator reads as "no separator".  Pixel lengths are
    /// bounded by [`MAX_EXTENT`].
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.fonts.is_empty() {
            self.fonts = DEFAULT_FONTS.iter().map(|f| f.to_string()).collect();
        }
        self.global.opacity = self.global.opacity.clamp(0.0, 1.0);
        if self.layout.separator.as_deref() == Some("") {
            self.layout.separator = None;
        }
        self.layout.padding = self.layout.padding.clamp(0, MAX_EXTENT);
        self.layout.underline_thickness = self.layout.underline_thickness.clamp(0, MAX_EXTENT);
        let m = &mut self.layout.margins;
        for side in [&mut m.top, &mut m.right, &mut m.bottom, &mut m.left] {
            *side = (*side).clamp(-MAX_EXTENT, MAX_EXTENT);
        }
        self
    }
}

/// Global bar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Requested width in pixels; `0` spans the whole output.
    pub width: u32,
    /// Bar height in pixels.
    pub height: u32,
    /// Geometry x offset.  Accepted for compatibility, not used by layout.
    pub x: i32,
    /// Geometry y offset.  Accepted for compatibility, not used by layout.
    pub y: i32,
    /// Whether the bar sits at the top or the bottom.
    pub position: Position,
    /// Reserve an exclusive zone so windows don't overlap the bar.
    pub exclusive_zone: bool,
    /// Multiplier applied to the background alpha (0.0 – 1.0).
    pub opacity: f32,
    /// Layer-shell namespace of the surface.
    pub namespace: String,
    /// Treat every input line as literal text.
    pub raw: bool,
    /// Keep running after standard input closes.
    pub permanent: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            width:          0,
            height:         24,
            x:              0,
            y:              0,
            position:       Position::Top,
            exclusive_zone: true,
            opacity:        1.0,
            namespace:      "limebar".to_string(),
            raw:            false,
            permanent:      false,
        }
    }
}

/// Horizontal layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Pixels added on both sides of every segment.
    pub padding: i32,
    /// Underline stroke width in pixels.
    pub underline_thickness: i32,
    /// Where the whole line is placed.
    pub alignment: Alignment,
    pub margins: Margins,
    /// Literal text drawn between consecutive segments.
    pub separator: Option<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding:             10,
            underline_thickness: 2,
            alignment:           Alignment::Left,
            margins:             Margins::default(),
            separator:           None,
        }
    }
}

/// Theme / styling configuration.  Colors are hex strings, compiled later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Bar background color (`#RRGGBB` or `#RRGGBBAA`).
    pub background: String,
    /// Foreground used for raw-mode text.
    pub text_color: String,
    /// Underline color when a segment names neither `U` nor `F`.
    pub underline_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background:      "#1a1a1a".to_string(),
            text_color:      "#ffffff".to_string(),
            underline_color: "#ffffff".to_string(),
        }
    }
}

/// Bar position on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Top,
    Bottom,
}

/// Horizontal placement of the segment line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Space kept free around the content, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Margins {
    pub top:    i32,
    pub right:  i32,
    pub bottom: i32,
    pub left:   i32,
}

impl FromStr for Margins {
    type Err = String;

    /// Parse `top,right,bottom,left`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid margin '{s}': {e}"))?;

        match parts.as_slice() {
            &[top, right, bottom, left] => Ok(Self { top, right, bottom, left }),
            _ => Err(format!("expected four margins (top,right,bottom,left), got '{s}'")),
        }
    }
}

impl fmt::Display for Margins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.top, self.right, self.bottom, self.left)
    }
}

/// A `WxH+X+Y` geometry string where every part may be omitted.
///
/// `None` fields keep whatever the config already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub width:  Option<u32>,
    pub height: Option<u32>,
    pub x:      Option<i32>,
    pub y:      Option<i32>,
}

impl Geometry {
    /// Overwrite the fields this geometry specifies.
    pub fn apply(&self, global: &mut GlobalConfig) {
        if let Some(w) = self.width {
            global.width = w;
        }
        if let Some(h) = self.height {
            global.height = h;
        }
        if let Some(x) = self.x {
            global.x = x;
        }
        if let Some(y) = self.y {
            global.y = y;
        }
    }
}

impl FromStr for Geometry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn part<T: FromStr>(s: &str, what: &str) -> Result<Option<T>, String> {
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<T>()
                .map(Some)
                .map_err(|_| format!("invalid geometry {what} '{s}'"))
        }

        let (size, offsets) = match s.find('+') {
            Some(i) => (&s[..i], Some(&s[i + 1..])),
            None => (s, None),
        };
        let (w, h) = size.split_once('x').unwrap_or((size, ""));
        let (x, y) = match offsets {
            Some(o) => o.split_once('+').unwrap_or((o, "")),
            None => ("", ""),
        };

        Ok(Self {
            width:  part(w, "width")?,
            height: part(h, "height")?,
            x:      part(x, "x")?,
            y:      part(y, "y")?,
        })
    }
}
