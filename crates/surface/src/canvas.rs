use limebar_core::{BarError, Result};
use limebar_theme::Color;
use tiny_skia::{Paint, PixmapMut, Rect, Transform};

/// Drawing primitives over one frame of premultiplied RGBA pixels.
///
/// Everything is clipped to the frame; nothing here can fail once the
/// canvas exists.
pub struct Canvas<'a> {
    pixmap: PixmapMut<'a>,
}

impl<'a> Canvas<'a> {
    /// Wrap `data`, which must hold exactly `width × height` pixels.
    pub fn new(data: &'a mut [u8], width: u32, height: u32) -> Result<Self> {
        let len = data.len();
        PixmapMut::from_bytes(data, width, height)
            .map(|pixmap| Self { pixmap })
            .ok_or_else(|| {
                BarError::Surface(format!("{len} bytes do not hold a {width}x{height} frame"))
            })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Replace every pixel with `color`, ignoring what was there.
    pub fn clear(&mut self, color: Color) {
        let px = color.to_skia().premultiply().to_color_u8();
        self.pixmap.pixels_mut().fill(px);
    }

    /// Composite `color` over the rectangle `(x, y, w, h)`.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(saturating_i32(self.width()));
        let y1 = y.saturating_add(h).min(saturating_i32(self.height()));
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let Some(rect) = Rect::from_ltrb(x0 as f32, y0 as f32, x1 as f32, y1 as f32) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = false;
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Stroke a horizontal line from `x0` to `x1`, `thickness` pixels wide,
    /// centred on row `y`.
    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, thickness: i32, color: Color) {
        if thickness <= 0 {
            return;
        }
        self.fill_rect(x0, y.saturating_sub(thickness / 2), x1.saturating_sub(x0), thickness, color);
    }

    /// The pixel at `(x, y)` as premultiplied `0xAARRGGBB`, or `None`
    /// outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        let p = self.pixmap.as_ref().pixel(x, y)?;
        Some(u32::from_be_bytes([p.alpha(), p.red(), p.green(), p.blue()]))
    }
}

/// Reorder premultiplied RGBA bytes into ARGB8888's little-endian
/// `[b, g, r, a]`, in place.
pub fn rgba_to_argb8888(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}

fn saturating_i32(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
