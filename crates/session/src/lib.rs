//! The bar's event-driven state machine.
//!
//! ```text
//! AwaitingSurface ──configure──▶ Redrawing ──▶ Ready ◀──┐
//!                                                │      │
//!                                   configure / input ──┘
//! any state ──shutdown──▶ Closed
//! ```
//!
//! One event is handled completely, presentation included, before the
//! next one is looked at.  When the display still holds every frame, the
//! redraw waits for the next buffer release instead.

use limebar_config::BarConfig;
use limebar_core::{BarEvent, Result};
use limebar_markup::{InputMode, Segment};
use limebar_renderer::{Renderer, TextShaper};
use limebar_surface::{Presenter, SurfaceManager};
use limebar_theme::Theme;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No usable size yet; input is stored but not drawn.
    AwaitingSurface,
    Ready,
    /// Inside a redraw.  Only observable if that redraw failed.
    Redrawing,
    Closed,
}

/// What the loop driving the session should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Configuration, current segments and surface of one running bar.
#[derive(Debug)]
pub struct Session<S> {
    renderer:  Renderer<S>,
    mode:      InputMode,
    /// Size asked for at startup; fills in zero configure dimensions.
    requested: (u32, u32),
    segments:  Vec<Segment>,
    surface:   SurfaceManager,
    state:     SessionState,
    /// A redraw was due while no frame was free.
    deferred:  bool,
}

impl<S: TextShaper> Session<S> {
    pub fn new(config: &BarConfig, shaper: S) -> Self {
        let theme = Theme::from_config(config);
        let mode = InputMode::from_config(config, &theme);
        info!(
            "Session created ({} mode, {} fonts)",
            if matches!(mode, InputMode::Raw { .. }) { "raw" } else { "markup" },
            config.fonts.len()
        );

        Self {
            renderer:  Renderer::new(config, &theme, shaper),
            mode,
            requested: (config.global.width, config.global.height),
            segments:  Vec::new(),
            surface:   SurfaceManager::new(),
            state:     SessionState::AwaitingSurface,
            deferred:  false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn surface(&self) -> &SurfaceManager {
        &self.surface
    }

    /// Process one event to completion.
    ///
    /// Errors are resource failures (no buffer, display gone) and are not
    /// recoverable.
    pub fn handle<P: Presenter + ?Sized>(
        &mut self,
        event: BarEvent,
        presenter: &mut P,
    ) -> Result<Flow> {
        if self.state == SessionState::Closed {
            return Ok(Flow::Exit);
        }
        debug!("Handling {} event", event.kind());

        match event {
            BarEvent::Configure { width, height } => self.configure(width, height, presenter)?,
            BarEvent::InputLine(line) => self.input(&line, presenter)?,
            BarEvent::Released { generation, slot } => {
                if self.surface.release(generation, slot) && self.deferred {
                    self.redraw(presenter)?;
                }
            }
            BarEvent::Shutdown => {
                info!("Shutdown requested");
                self.state = SessionState::Closed;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn configure<P: Presenter + ?Sized>(
        &mut self,
        width: u32,
        height: u32,
        presenter: &mut P,
    ) -> Result<()> {
        let Some((width, height)) = resolve_size((width, height), self.requested) else {
            warn!("Configure without a usable size ({width}x{height}); waiting");
            return Ok(());
        };

        self.surface.resize(width, height)?;
        self.redraw(presenter)
    }

    fn input<P: Presenter + ?Sized>(&mut self, line: &str, presenter: &mut P) -> Result<()> {
        self.segments = self.mode.parse(line);
        debug!("{} segments from input line", self.segments.len());

        if self.state == SessionState::AwaitingSurface {
            return Ok(());
        }
        self.redraw(presenter)
    }

    fn redraw<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Result<()> {
        if !self.surface.can_draw() {
            debug!("Every frame is held by the display; redraw deferred");
            self.deferred = true;
            return Ok(());
        }
        self.deferred = false;
        self.state = SessionState::Redrawing;

        let (width, height) = self.surface.size();
        let plan = self.renderer.layout(&self.segments, width, height);
        {
            let mut canvas = self.surface.current_buffer()?;
            self.renderer.paint(&plan, &mut canvas)?;
        }
        self.surface.present(presenter)?;

        self.state = SessionState::Ready;
        Ok(())
    }
}

/// Fill zero configure dimensions from the requested size.
///
/// `None` when either axis is still zero afterwards.
pub fn resolve_size(configured: (u32, u32), requested: (u32, u32)) -> Option<(u32, u32)> {
    let pick = |got: u32, asked: u32| if got > 0 { got } else { asked };
    let size = (pick(configured.0, requested.0), pick(configured.1, requested.1));
    (size.0 > 0 && size.1 > 0).then_some(size)
}
