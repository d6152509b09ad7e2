use crate::state::{BufferSlot, WaylandState};
use crate::wayland_err;
use limebar_core::{BarError, Result};
use limebar_surface::{Frame, Presenter};
use smithay_client_toolkit::shell::{wlr_layer::LayerSurface, WaylandSurface};
use tracing::debug;
use wayland_client::{
    protocol::{wl_buffer::WlBuffer, wl_shm, wl_shm_pool::WlShmPool},
    QueueHandle,
};

/// Server-side view of one generation of the surface pool.
struct Buffers {
    generation: u64,
    pool:       WlShmPool,
    slots:      Vec<WlBuffer>,
    /// Attached and not yet released by the compositor.
    busy:       Vec<bool>,
}

impl Buffers {
    fn is_idle(&self) -> bool {
        !self.busy.contains(&true)
    }
}

impl Drop for Buffers {
    fn drop(&mut self) {
        for buffer in &self.slots {
            buffer.destroy();
        }
        self.pool.destroy();
    }
}

/// Puts frames on the layer surface through `wl_shm`.
///
/// Buffers of a replaced pool are kept until the compositor has released
/// all of them.
pub struct LayerPresenter {
    layer:   LayerSurface,
    shm:     wl_shm::WlShm,
    qh:      QueueHandle<WaylandState>,
    current: Option<Buffers>,
    retired: Vec<Buffers>,
}

impl LayerPresenter {
    pub fn new(layer: LayerSurface, shm: wl_shm::WlShm, qh: QueueHandle<WaylandState>) -> Self {
        Self { layer, shm, qh, current: None, retired: Vec::new() }
    }

    /// Record a `wl_buffer.release`, destroying retired pools that are now
    /// idle.
    pub fn release(&mut self, generation: u64, slot: usize) {
        let buffers = self
            .current
            .iter_mut()
            .chain(self.retired.iter_mut())
            .find(|b| b.generation == generation);
        if let Some(flag) = buffers.and_then(|b| b.busy.get_mut(slot)) {
            *flag = false;
        }

        let before = self.retired.len();
        self.retired.retain(|b| !b.is_idle());
        if self.retired.len() != before {
            debug!("Destroyed {} retired buffer pools", before - self.retired.len());
        }
    }

    /// Wrap the client pool in server objects, one `wl_buffer` per slot.
    fn rebuild(&mut self, frame: &Frame<'_>) -> Result<()> {
        if let Some(old) = self.current.take() {
            if !old.is_idle() {
                self.retired.push(old);
            }
        }

        let pool_len = to_i32(frame.pool_len, "pool size")?;
        let frame_len = frame.pixels.len();
        let width = to_i32(frame.width as usize, "width")?;
        let height = to_i32(frame.height as usize, "height")?;
        let stride = to_i32(frame.stride as usize, "stride")?;

        let pool = self.shm.create_pool(frame.fd, pool_len, &self.qh, ());
        let slots = (0..frame.pool_len / frame_len.max(1))
            .map(|slot| {
                let offset = to_i32(slot * frame_len, "offset")?;
                let tag = BufferSlot { generation: frame.generation, slot };
                Ok(pool.create_buffer(
                    offset,
                    width,
                    height,
                    stride,
                    wl_shm::Format::Argb8888,
                    &self.qh,
                    tag,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Created {} wl_buffers for generation {}", slots.len(), frame.generation);
        let busy = vec![false; slots.len()];
        self.current = Some(Buffers { generation: frame.generation, pool, slots, busy });
        Ok(())
    }
}

impl Presenter for LayerPresenter {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        if self.current.as_ref().map(|b| b.generation) != Some(frame.generation) {
            self.rebuild(frame)?;
        }
        let buffers = self
            .current
            .as_mut()
            .ok_or_else(|| BarError::Wayland("no wl_buffers for the current pool".into()))?;
        let buffer = buffers
            .slots
            .get(frame.slot)
            .ok_or_else(|| BarError::Wayland(format!("no wl_buffer for slot {}", frame.slot)))?;

        let surface = self.layer.wl_surface();
        surface.attach(Some(buffer), 0, 0);
        surface.damage_buffer(0, 0, frame.width as i32, frame.height as i32);
        self.layer.commit();
        buffers.busy[frame.slot] = true;
        Ok(())
    }
}

fn to_i32(value: usize, what: &str) -> Result<i32> {
    i32::try_from(value).map_err(wayland_err(&format!("{what} {value} out of range")))
}
