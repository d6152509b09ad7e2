use crate::font::{FontDescriptor, FontStyle};
use crate::shaper::{TextExtent, TextShaper};
use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style, SwashCache, Weight};
use limebar_surface::Canvas;
use limebar_theme::Color;

/// [`TextShaper`] backed by the system font database and swash rasteriser.
pub struct CosmicShaper {
    font_system: FontSystem,
    cache:       SwashCache,
}

impl CosmicShaper {
    /// Load the system font database.  This scans font directories and can
    /// take a moment; do it once at startup.
    pub fn new() -> Self {
        let font_system = FontSystem::new();
        tracing::info!("Loaded {} font faces", font_system.db().len());
        Self {
            font_system,
            cache: SwashCache::new(),
        }
    }

    fn shape(&mut self, font: &FontDescriptor, text: &str) -> Buffer {
        let metrics = Metrics::new(font.pixel_size(), font.line_height());
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, attrs(font), Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }
}

impl Default for CosmicShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CosmicShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmicShaper")
            .field("faces", &self.font_system.db().len())
            .finish()
    }
}

impl TextShaper for CosmicShaper {
    fn measure(&mut self, font: &FontDescriptor, text: &str) -> TextExtent {
        let buffer = self.shape(font, text);
        let width = buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0_f32, f32::max);
        let lines = buffer.layout_runs().count().max(1);

        TextExtent {
            width:  width.ceil() as i32,
            height: (buffer.metrics().line_height * lines as f32).ceil() as i32,
        }
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas<'_>,
        font: &FontDescriptor,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
    ) {
        let buffer = self.shape(font, text);
        let [r, g, b, a] = color.to_rgba8();

        buffer.draw(
            &mut self.font_system,
            &mut self.cache,
            cosmic_text::Color::rgba(r, g, b, a),
            |gx, gy, w, h, c| {
                let coverage = Color::from_rgba8(c.r(), c.g(), c.b(), c.a());
                canvas.fill_rect(x.saturating_add(gx), y.saturating_add(gy), w as i32, h as i32, coverage);
            },
        );
    }
}

fn attrs(font: &FontDescriptor) -> Attrs<'_> {
    let family = match font.family.to_ascii_lowercase().as_str() {
        "monospace" | "mono" => Family::Monospace,
        "sans" | "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        _ => Family::Name(&font.family),
    };
    let style = match font.style {
        FontStyle::Normal => Style::Normal,
        FontStyle::Italic => Style::Italic,
        FontStyle::Oblique => Style::Oblique,
    };

    Attrs::new().family(family).weight(Weight(font.weight)).style(style)
}
