use crate::font::FontDescriptor;
use limebar_surface::Canvas;
use limebar_theme::Color;

/// Pixel size of a shaped string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    pub width:  i32,
    pub height: i32,
}

/// Text measurement and drawing.
///
/// Implementations must be deterministic: the same font and text always
/// measure the same, so that laying out twice gives the same plan.
pub trait TextShaper {
    fn measure(&mut self, font: &FontDescriptor, text: &str) -> TextExtent;

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw(
        &mut self,
        canvas: &mut Canvas<'_>,
        font: &FontDescriptor,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
    );
}

/// A shaper that gives every character the same advance and draws each
/// visible character as a solid cell.
///
/// Needs no font files, which makes it useful headless and in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAdvanceShaper {
    pub advance: i32,
    pub height:  i32,
}

impl Default for FixedAdvanceShaper {
    fn default() -> Self {
        Self { advance: 8, height: 16 }
    }
}

impl TextShaper for FixedAdvanceShaper {
    fn measure(&mut self, _font: &FontDescriptor, text: &str) -> TextExtent {
        TextExtent {
            width:  i32::try_from(text.chars().count())
                .unwrap_or(i32::MAX)
                .saturating_mul(self.advance),
            height: self.height,
        }
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas<'_>,
        _font: &FontDescriptor,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
    ) {
        let mut gx = x;
        for c in text.chars() {
            if !c.is_whitespace() {
                canvas.fill_rect(
                    gx.saturating_add(1),
                    y.saturating_add(2),
                    self.advance - 2,
                    self.height - 4,
                    color,
                );
            }
            gx = gx.saturating_add(self.advance);
        }
    }
}
