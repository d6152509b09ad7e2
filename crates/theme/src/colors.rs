use thiserror::Error;

/// A hex string that is not `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid color '{0}': expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),
}

/// Normalised RGBA colour (each channel in `[0.0, 1.0]`, not premultiplied).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE:       Self = Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const BLACK:       Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const TRANSPARENT: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit straight-alpha channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: f32::from(a) / 255.0,
        }
    }

    /// Parse `#RRGGBB` (alpha 1.0) or `#RRGGBBAA`.
    ///
    /// The leading `#` is required and every other character must be a hex
    /// digit; anything else is [`ColorError::InvalidColor`].
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidColor(hex.to_string());

        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());

        match digits.len() {
            6 => Ok(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Ok(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }

    /// Parse `hex`, substituting `fallback` when it is malformed.
    pub fn from_hex_or(hex: &str, fallback: Self) -> Self {
        Self::from_hex(hex).unwrap_or_else(|e| {
            tracing::debug!("{e}; using {fallback:?}");
            fallback
        })
    }

    /// Return a copy with the alpha channel set to `alpha`.
    #[inline]
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }

    /// Return a copy with the alpha channel multiplied by `factor`.
    #[inline]
    #[must_use]
    pub fn scale_alpha(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor)
    }

    /// 8-bit straight-alpha `[r, g, b, a]`.
    pub fn to_rgba8(self) -> [u8; 4] {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }

    /// The same color for the rasteriser.  Channels are clamped; a NaN
    /// channel gives transparent.
    pub fn to_skia(self) -> tiny_skia::Color {
        let [r, g, b, a] = [self.r, self.g, self.b, self.a].map(|c| c.clamp(0.0, 1.0));
        tiny_skia::Color::from_rgba(r, g, b, a).unwrap_or(tiny_skia::Color::TRANSPARENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn six_digit_hex_is_opaque() {
        let c = Color::from_hex("#1a1a1a").unwrap();
        assert!(close(c.r, 0.1020) && close(c.g, 0.1020) && close(c.b, 0.1020));
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn eight_digit_hex_carries_alpha() {
        let c = Color::from_hex("#ffffff00").unwrap();
        assert_eq!(c.a, 0.0);
        assert_eq!(c.r, 1.0);

        let c = Color::from_hex("#FF000080").unwrap();
        assert!(close(c.a, 128.0 / 255.0));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        for bad in ["ffffff", "#fff", "#fffffff", "#gggggg", "#+fffff", "", "#", "#ffé000"] {
            assert_eq!(
                Color::from_hex(bad),
                Err(ColorError::InvalidColor(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn fallback_on_invalid() {
        assert_eq!(Color::from_hex_or("nope", Color::BLACK), Color::BLACK);
        assert_eq!(Color::from_hex_or("#ffffff", Color::BLACK), Color::WHITE);
    }

    #[test]
    fn premultiply_scales_channels() {
        let px = |c: Color| {
            let p = c.to_skia().premultiply().to_color_u8();
            [p.red(), p.green(), p.blue(), p.alpha()]
        };
        assert_eq!(px(Color::WHITE), [255, 255, 255, 255]);
        assert_eq!(px(Color::rgba(1.0, 0.0, 0.5, 0.5)), [128, 0, 64, 128]);
        assert_eq!(px(Color::TRANSPARENT), [0, 0, 0, 0]);
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        let c = Color::rgba(2.0, -1.0, 0.5, 1.0).to_skia();
        assert_eq!((c.red(), c.green(), c.alpha()), (1.0, 0.0, 1.0));
        assert_eq!(Color::rgba(f32::NAN, 0.0, 0.0, 1.0).to_skia(), tiny_skia::Color::TRANSPARENT);
    }

    #[test]
    fn opacity_multiplies_alpha() {
        let c = Color::from_hex("#00000080").unwrap().scale_alpha(0.5);
        assert!(close(c.a, 64.0 / 255.0));
    }
}
