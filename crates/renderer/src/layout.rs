use crate::command::{DrawCommand, LayoutPlan};
use crate::font::FontDescriptor;
use crate::shaper::{TextExtent, TextShaper};
use limebar_config::{Alignment, BarConfig, Margins, Position};
use limebar_markup::Segment;
use limebar_theme::{Color, Theme};
use tracing::debug;

/// Width charged per separator character when computing content width.
///
/// Separators are not shaped during measurement; this is an estimate.
pub const SEPARATOR_CHAR_WIDTH: i32 = 8;

/// Everything the layout pass needs from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    pub padding:             i32,
    pub underline_thickness: i32,
    pub separator:           Option<String>,
    pub alignment:           Alignment,
    pub position:            Position,
    pub margins:             Margins,
    /// Never empty; index 0 is the fallback.
    pub fonts:               Vec<FontDescriptor>,
    /// Underline color when a segment has neither `U` nor `F`.
    pub underline_color:     Color,
}

impl LayoutParams {
    pub fn from_config(config: &BarConfig, theme: &Theme) -> Self {
        let mut fonts: Vec<FontDescriptor> = config
            .fonts
            .iter()
            .map(|f| f.parse::<FontDescriptor>().unwrap_or_default())
            .collect();
        if fonts.is_empty() {
            fonts.push(FontDescriptor::default());
        }
        for (i, font) in fonts.iter().enumerate() {
            debug!("font {}: {font}", i + 1);
        }

        Self {
            padding:             config.layout.padding,
            underline_thickness: config.layout.underline_thickness,
            separator:           config.layout.separator.clone().filter(|s| !s.is_empty()),
            alignment:           config.layout.alignment,
            position:            config.global.position,
            margins:             config.layout.margins,
            fonts,
            underline_color:     theme.underline_color,
        }
    }

    /// Map a segment's font index onto the font list, falling back to 0.
    pub fn font_index(&self, index: usize) -> usize {
        if index < self.fonts.len() {
            index
        } else {
            debug!("font index {} out of range ({} fonts); using font 1", index + 1, self.fonts.len());
            0
        }
    }

    /// Estimated width of one separator.
    pub fn separator_width(&self) -> i32 {
        self.separator
            .as_deref()
            .map_or(0, |s| saturating_i32(s.chars().count()).saturating_mul(SEPARATOR_CHAR_WIDTH))
    }

    /// Horizontal space taken by a segment of text width `width`.
    pub fn span(&self, width: i32) -> i32 {
        width.saturating_add(self.padding.saturating_mul(2))
    }

    /// `Σ(width + 2×padding)` plus one separator between each pair.
    ///
    /// Saturates instead of overflowing.
    pub fn content_width(&self, extents: &[TextExtent]) -> i32 {
        let segments = extents
            .iter()
            .fold(0_i32, |acc, e| acc.saturating_add(self.span(e.width)));
        let gaps = saturating_i32(extents.len().saturating_sub(1));
        segments.saturating_add(gaps.saturating_mul(self.separator_width()))
    }

    /// Left edge of the content for the bar-wide alignment.
    pub fn start_x(&self, total_width: i32, surface_width: u32) -> i32 {
        let left = self.margins.left;
        let available = saturating_i32(surface_width as usize)
            .saturating_sub(left)
            .saturating_sub(self.margins.right);
        let slack = available.saturating_sub(total_width);
        match self.alignment {
            Alignment::Left => left,
            Alignment::Center => (slack / 2).saturating_add(left),
            Alignment::Right => slack.saturating_add(left),
        }
    }
}

fn saturating_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Measure every segment, align the line, and emit the draw commands.
///
/// Per segment the order is background, text, underline, then the
/// separator that follows it.  Segments flow left to right from the start
/// offset; their own `alignment` field is not consulted.
pub fn layout<S: TextShaper + ?Sized>(
    segments: &[Segment],
    params: &LayoutParams,
    shaper: &mut S,
    surface_width: u32,
    surface_height: u32,
) -> LayoutPlan {
    // Measure pass.
    let fonts: Vec<usize> = segments.iter().map(|s| params.font_index(s.font_index)).collect();
    let extents: Vec<TextExtent> = segments
        .iter()
        .zip(&fonts)
        .map(|(s, &f)| shaper.measure(&params.fonts[f], &s.text))
        .collect();

    let total_width = params.content_width(&extents);
    let start_x = params.start_x(total_width, surface_width);

    // Placement pass.
    let height = saturating_i32(surface_height as usize);
    let pad = params.padding;
    let Margins { top, bottom, .. } = params.margins;
    let anchor = match params.position {
        Position::Top => top,
        Position::Bottom => bottom,
    };

    let mut commands = Vec::with_capacity(segments.len() * 4);
    let mut x = start_x;

    for (i, ((segment, &font), extent)) in segments.iter().zip(&fonts).zip(&extents).enumerate() {
        let y = (height.saturating_sub(extent.height) / 2).saturating_add(anchor);
        let foreground = segment.foreground.unwrap_or(Color::WHITE);

        if let Some(color) = segment.background {
            commands.push(DrawCommand::FillRect {
                x: x.saturating_sub(pad),
                y: top,
                width: params.span(extent.width),
                height: height.saturating_sub(top).saturating_sub(bottom),
                color,
            });
        }

        commands.push(DrawCommand::Text {
            x,
            y,
            font,
            text: segment.text.clone(),
            color: foreground,
        });

        if segment.underline {
            let thickness = params.underline_thickness;
            commands.push(DrawCommand::Underline {
                x,
                y: height.saturating_sub(bottom).saturating_sub(thickness),
                width: extent.width,
                thickness,
                color: segment
                    .underline_color
                    .or(segment.foreground)
                    .unwrap_or(params.underline_color),
            });
        }

        x = x.saturating_add(params.span(extent.width));

        if i + 1 < segments.len() {
            if let Some(separator) = &params.separator {
                commands.push(DrawCommand::Separator {
                    x: x.saturating_sub(pad),
                    y,
                    text: separator.clone(),
                    color: Color::WHITE,
                });
            }
        }
    }

    LayoutPlan {
        surface_width,
        surface_height,
        total_width,
        start_x,
        commands,
    }
}
