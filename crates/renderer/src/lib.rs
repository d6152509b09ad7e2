//! Layout and drawing engine for the status bar.
//!
//! A redraw is two steps:
//! 1. [`layout`] measures the segments and turns them into [`DrawCommand`]s
//!    for one surface size.
//! 2. [`paint`] clears a [`Canvas`](limebar_surface::Canvas) and executes
//!    those commands on it.

pub mod command;
pub mod cosmic;
pub mod font;
pub mod layout;
pub mod paint;
pub mod shaper;

pub use command::{DrawCommand, LayoutPlan};
pub use cosmic::CosmicShaper;
pub use font::{FontDescriptor, FontStyle};
pub use layout::{layout, LayoutParams, SEPARATOR_CHAR_WIDTH};
pub use paint::paint;
pub use shaper::{FixedAdvanceShaper, TextExtent, TextShaper};

use limebar_config::BarConfig;
use limebar_core::Result;
use limebar_markup::Segment;
use limebar_surface::Canvas;
use limebar_theme::{Color, Theme};

/// Layout parameters, background and shaper bundled for the session.
#[derive(Debug)]
pub struct Renderer<S> {
    params:     LayoutParams,
    background: Color,
    shaper:     S,
}

impl<S: TextShaper> Renderer<S> {
    pub fn new(config: &BarConfig, theme: &Theme, shaper: S) -> Self {
        Self {
            params: LayoutParams::from_config(config, theme),
            background: theme.background,
            shaper,
        }
    }

    pub fn layout(&mut self, segments: &[Segment], width: u32, height: u32) -> LayoutPlan {
        layout(segments, &self.params, &mut self.shaper, width, height)
    }

    pub fn paint(&mut self, plan: &LayoutPlan, canvas: &mut Canvas<'_>) -> Result<()> {
        paint(plan, &self.params, self.background, &mut self.shaper, canvas)
    }
}
