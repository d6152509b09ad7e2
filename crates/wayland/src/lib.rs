//! Wayland front end for `limebar`.
//!
//! Creates one wlr-layer-shell surface, feeds configure events and stdin
//! lines to a [`Session`], and shows its frames through `wl_shm`.  Both
//! sources are waited on from a single-threaded tokio runtime; every event
//! is handled to completion before the next wait.

mod presenter;
mod state;

pub use presenter::LayerPresenter;
pub use state::WaylandState;

use limebar_config::{BarConfig, GlobalConfig, Position};
use limebar_core::{BarError, BarEvent, Result};
use limebar_renderer::CosmicShaper;
use limebar_session::{Flow, Session};
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    shell::{
        wlr_layer::{Anchor, KeyboardInteractivity, Layer, LayerShell, LayerSurface},
        WaylandSurface,
    },
    shm::Shm,
};
use std::collections::VecDeque;
use std::io;
use std::os::fd::{AsRawFd, RawFd};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::io::unix::AsyncFd;
use tracing::{debug, info, warn};
use wayland_client::{backend::WaylandError, globals::registry_queue_init, Connection, QueueHandle};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Run the bar until stdin closes (unless `permanent`), the compositor
/// closes the surface, or a fatal error occurs.
pub fn run(config: BarConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(event_loop(config))
}

async fn event_loop(config: BarConfig) -> Result<()> {
    let conn = Connection::connect_to_env().map_err(wayland_err("cannot connect to compositor"))?;
    let (globals, mut queue) =
        registry_queue_init::<WaylandState>(&conn).map_err(wayland_err("registry init"))?;
    let qh = queue.handle();

    let mut state = WaylandState {
        registry:    RegistryState::new(&globals),
        outputs:     OutputState::new(&globals, &qh),
        compositor:  CompositorState::bind(&globals, &qh)
            .map_err(wayland_err("wl_compositor not available"))?,
        layer_shell: LayerShell::bind(&globals, &qh)
            .map_err(wayland_err("zwlr_layer_shell_v1 not available"))?,
        shm:         Shm::bind(&globals, &qh).map_err(wayland_err("wl_shm not available"))?,
        pending:     VecDeque::new(),
    };

    let layer = create_layer(&state, &qh, &config.global);
    let mut presenter = LayerPresenter::new(layer, state.shm.wl_shm().clone(), qh.clone());
    let mut session = Session::new(&config, CosmicShaper::new());
    info!(
        "Layer surface '{}' requested at {}x{} ({:?})",
        config.global.namespace, config.global.width, config.global.height, config.global.position
    );

    let display = AsyncFd::new(DisplayFd(conn.backend().poll_fd().as_raw_fd()))?;
    let mut input = BufReader::new(tokio::io::stdin());
    let mut line = Vec::new();
    let mut stdin_open = true;

    loop {
        queue.dispatch_pending(&mut state).map_err(wayland_err("dispatch"))?;
        let events: Vec<BarEvent> = state.take_events().collect();
        for event in events {
            if let BarEvent::Released { generation, slot } = event {
                presenter.release(generation, slot);
            }
            if session.handle(event, &mut presenter)? == Flow::Exit {
                info!("limebar exiting");
                return Ok(());
            }
        }

        let unsent = flush_outcome(conn.flush())?;
        if unsent {
            debug!("Display socket full; waiting to flush");
        }

        // Events already queued: go dispatch them first.
        let Some(guard) = queue.prepare_read() else { continue };

        tokio::select! {
            ready = display.readable() => {
                let mut ready = ready?;
                match guard.read() {
                    Ok(n) => debug!("Read {n} display events"),
                    Err(WaylandError::Io(e)) if e.kind() == io::ErrorKind::WouldBlock => {
                        ready.clear_ready();
                    }
                    Err(e) => return Err(BarError::Wayland(format!("connection lost: {e}"))),
                }
            }
            writable = display.writable(), if unsent => {
                drop(guard);
                // Flushed again at the top of the loop.
                writable?.clear_ready();
            }
            read = input.read_until(b'\n', &mut line), if stdin_open => {
                drop(guard);
                match read {
                    Ok(0) => {
                        stdin_open = false;
                        end_of_input(&config.global, &mut state);
                    }
                    Ok(_) => {
                        state.pending.push_back(BarEvent::InputLine(decode_line(&line)));
                        line.clear();
                    }
                    Err(e) => {
                        warn!("Reading stdin failed: {e}");
                        stdin_open = false;
                        end_of_input(&config.global, &mut state);
                    }
                }
            }
        }
    }
}

fn create_layer(state: &WaylandState, qh: &QueueHandle<WaylandState>, global: &GlobalConfig) -> LayerSurface {
    let surface = state.compositor.create_surface(qh);
    let layer = state.layer_shell.create_layer_surface(
        qh,
        surface,
        Layer::Top,
        Some(global.namespace.clone()),
        None,
    );
    layer.set_anchor(position_to_anchor(global.position));
    layer.set_size(global.width, global.height);
    layer.set_exclusive_zone(exclusive_zone(global));
    layer.set_keyboard_interactivity(KeyboardInteractivity::None);
    // Initial commit without a buffer; the compositor answers with configure.
    layer.commit();
    layer
}

fn end_of_input(global: &GlobalConfig, state: &mut WaylandState) {
    if global.permanent {
        info!("stdin closed; keeping the last line on screen");
    } else {
        info!("stdin closed");
        state.pending.push_back(BarEvent::Shutdown);
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Raw display socket, for readiness polling only.
struct DisplayFd(RawFd);

impl AsRawFd for DisplayFd {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

/// Span the output horizontally and stick to the configured edge.
pub fn position_to_anchor(pos: Position) -> Anchor {
    match pos {
        Position::Top    => Anchor::TOP    | Anchor::LEFT | Anchor::RIGHT,
        Position::Bottom => Anchor::BOTTOM | Anchor::LEFT | Anchor::RIGHT,
    }
}

/// Height reserved from other windows, `0` when disabled.
pub fn exclusive_zone(global: &GlobalConfig) -> i32 {
    if global.exclusive_zone {
        i32::try_from(global.height).unwrap_or(i32::MAX)
    } else {
        0
    }
}

/// One stdin line without its line ending.  Invalid UTF-8 is replaced,
/// not rejected.
pub fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// `Ok(true)` when the socket was full and requests are still queued.
pub fn flush_outcome(result: std::result::Result<(), WaylandError>) -> Result<bool> {
    match result {
        Ok(()) => Ok(false),
        Err(WaylandError::Io(e)) if e.kind() == io::ErrorKind::WouldBlock => Ok(true),
        Err(e) => Err(BarError::Wayland(format!("flush: {e}"))),
    }
}

pub(crate) fn wayland_err<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> BarError + '_ {
    move |e| BarError::Wayland(format!("{context}: {e}"))
}
