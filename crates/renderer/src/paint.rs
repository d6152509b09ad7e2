use crate::command::{DrawCommand, LayoutPlan};
use crate::layout::LayoutParams;
use crate::shaper::TextShaper;
use limebar_core::{BarError, Result};
use limebar_surface::Canvas;
use limebar_theme::Color;

/// Clear `canvas` to `background` and execute `plan` on it.
///
/// Refuses plans computed for a different surface size.
pub fn paint<S: TextShaper + ?Sized>(
    plan: &LayoutPlan,
    params: &LayoutParams,
    background: Color,
    shaper: &mut S,
    canvas: &mut Canvas<'_>,
) -> Result<()> {
    let size = (canvas.width(), canvas.height());
    if size != (plan.surface_width, plan.surface_height) {
        return Err(BarError::Render(format!(
            "plan for {}x{} issued against a {}x{} buffer",
            plan.surface_width, plan.surface_height, size.0, size.1
        )));
    }

    canvas.clear(background);

    for command in &plan.commands {
        match command {
            DrawCommand::FillRect { x, y, width, height, color } => {
                canvas.fill_rect(*x, *y, *width, *height, *color);
            }
            DrawCommand::Text { x, y, font, text, color } => {
                let font = &params.fonts[params.font_index(*font)];
                shaper.draw(canvas, font, text, *x, *y, *color);
            }
            DrawCommand::Underline { x, y, width, thickness, color } => {
                canvas.hline(*x, x.saturating_add(*width), *y, *thickness, *color);
            }
            DrawCommand::Separator { x, y, text, color } => {
                shaper.draw(canvas, &params.fonts[0], text, *x, *y, *color);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout;
    use crate::shaper::FixedAdvanceShaper;
    use limebar_config::BarConfig;
    use limebar_markup::Segment;
    use limebar_theme::Theme;

    fn setup() -> (LayoutParams, FixedAdvanceShaper) {
        let mut cfg = BarConfig::default();
        cfg.layout.padding = 2;
        (
            LayoutParams::from_config(&cfg, &Theme::default()),
            FixedAdvanceShaper { advance: 10, height: 10 },
        )
    }

    #[test]
    fn background_then_segment_colors() {
        let (params, mut shaper) = setup();
        let red = Color::rgba(1.0, 0.0, 0.0, 1.0);
        let segs = vec![Segment { background: Some(red), ..Segment::text("a") }];
        let plan = layout(&segs, &params, &mut shaper, 40, 20);

        let mut buf = vec![0u8; 40 * 20 * 4];
        let mut canvas = Canvas::new(&mut buf, 40, 20).unwrap();
        paint(&plan, &params, Color::BLACK, &mut shaper, &mut canvas).unwrap();

        // Bar background outside the segment.
        assert_eq!(canvas.pixel(39, 0), Some(0xff00_0000));
        // Segment background in the padding gap (x = 10..12 is padding).
        assert_eq!(canvas.pixel(11, 0), Some(0xffff_0000));
        // Glyph cell drawn white on top.
        assert_eq!(canvas.pixel(5, 10), Some(0xffff_ffff));
    }

    #[test]
    fn underline_lands_above_bottom_margin() {
        let (params, mut shaper) = setup();
        let segs = vec![Segment { underline: true, ..Segment::text("  ") }];
        let plan = layout(&segs, &params, &mut shaper, 40, 20);

        let mut buf = vec![0u8; 40 * 20 * 4];
        let mut canvas = Canvas::new(&mut buf, 40, 20).unwrap();
        paint(&plan, &params, Color::TRANSPARENT, &mut shaper, &mut canvas).unwrap();

        // thickness 2 centred on row 18 → rows 17 and 18
        assert_eq!(canvas.pixel(5, 17), Some(0xffff_ffff));
        assert_eq!(canvas.pixel(5, 18), Some(0xffff_ffff));
        assert_eq!(canvas.pixel(5, 19), Some(0));
        assert_eq!(canvas.pixel(5, 16), Some(0));
    }

    #[test]
    fn mismatched_plan_is_refused() {
        let (params, mut shaper) = setup();
        let plan = layout(&[Segment::text("a")], &params, &mut shaper, 100, 24);

        let mut buf = vec![0u8; 50 * 24 * 4];
        let mut canvas = Canvas::new(&mut buf, 50, 24).unwrap();
        let err = paint(&plan, &params, Color::BLACK, &mut shaper, &mut canvas).unwrap_err();
        assert!(matches!(err, BarError::Render(_)));
        // Nothing was drawn.
        assert_eq!(canvas.pixel(0, 0), Some(0));
    }
}
