//! Pixel buffers backing the bar surface.
//!
//! The [`SurfaceManager`] owns a double-buffered [`ShmPool`], replaces it
//! whenever the display assigns a new size, and hands finished frames to a
//! [`Presenter`].  A frame handed over stays busy until the display
//! releases it; busy frames are never drawn into.

pub mod canvas;
pub mod pool;

pub use canvas::{rgba_to_argb8888, Canvas};
pub use pool::{ShmPool, BYTES_PER_PIXEL, SLOTS};

use limebar_core::{BarError, Result};
use std::os::fd::BorrowedFd;
use tracing::{debug, info};

/// A finished frame, described the way a display server wants it.
///
/// `pixels` are premultiplied ARGB8888, little-endian.
#[derive(Debug)]
pub struct Frame<'a> {
    /// File descriptor of the whole pool.
    pub fd:         BorrowedFd<'a>,
    /// Size of the whole pool in bytes.
    pub pool_len:   usize,
    /// Byte offset of this frame inside the pool.
    pub offset:     usize,
    pub slot:       usize,
    pub width:      u32,
    pub height:     u32,
    pub stride:     u32,
    /// Bumped on every reallocation; a change means the previous pool is gone.
    pub generation: u64,
    pub pixels:     &'a [u8],
}

/// Whatever puts a finished frame on screen.
pub trait Presenter {
    /// Make `frame` the visible contents and mark all of it damaged.
    /// Must not block waiting for the display.
    fn present(&mut self, frame: &Frame<'_>) -> Result<()>;
}

/// Owner of the bar's pixel memory.
#[derive(Debug, Default)]
pub struct SurfaceManager {
    pool:       Option<ShmPool>,
    /// Slot that the next draw goes into.
    back:       usize,
    /// Slots handed to the display and not yet released.
    busy:       [bool; SLOTS],
    generation: u64,
}

impl SurfaceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once a buffer exists.
    pub fn is_ready(&self) -> bool {
        self.pool.is_some()
    }

    /// Current `(width, height)`, `(0, 0)` before the first resize.
    pub fn size(&self) -> (u32, u32) {
        self.pool
            .as_ref()
            .map_or((0, 0), |p| (p.width(), p.height()))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the buffer with one of `width × height` pixels.
    ///
    /// Returns `Ok(false)` without touching anything when the size is
    /// unchanged.  The old pool is dropped only after the new one exists.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<bool> {
        if self.pool.is_some() && self.size() == (width, height) {
            return Ok(false);
        }

        let pool = ShmPool::new(width, height)?;
        info!("Surface resized to {width}x{height} ({} bytes)", pool.byte_len());

        self.pool = Some(pool);
        self.back = 0;
        self.busy = [false; SLOTS];
        self.generation += 1;
        Ok(true)
    }

    /// `true` when a frame can be drawn without touching one the display
    /// still holds.
    pub fn can_draw(&self) -> bool {
        self.is_ready() && self.free_slot().is_some()
    }

    /// The back slot if free, else any free slot.
    fn free_slot(&self) -> Option<usize> {
        (0..SLOTS)
            .map(|i| (self.back + i) % SLOTS)
            .find(|&slot| !self.busy[slot])
    }

    /// The frame the next draw should go into.  Its previous contents are
    /// unspecified.
    ///
    /// Fails when no buffer exists or every slot is still held by the
    /// display.
    pub fn current_buffer(&mut self) -> Result<Canvas<'_>> {
        let back = self
            .free_slot()
            .ok_or_else(|| BarError::Surface("every frame is still held by the display".into()))?;
        self.back = back;
        let pool = self.pool.as_mut().ok_or_else(no_surface)?;
        let (w, h) = (pool.width(), pool.height());
        Canvas::new(pool.slot_mut(back), w, h)
    }

    /// Submit the frame last returned by [`current_buffer`], mark it busy
    /// and move to the next slot.
    ///
    /// [`current_buffer`]: Self::current_buffer
    pub fn present<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Result<()> {
        let back = self.back;
        if self.busy[back] {
            return Err(BarError::Surface(format!("frame {back} is still held by the display")));
        }
        let pool = self.pool.as_mut().ok_or_else(no_surface)?;
        rgba_to_argb8888(pool.slot_mut(back));

        let frame = Frame {
            fd:         pool.fd(),
            pool_len:   pool.byte_len(),
            offset:     pool.offset(back),
            slot:       back,
            width:      pool.width(),
            height:     pool.height(),
            stride:     pool.stride() as u32,
            generation: self.generation,
            pixels:     pool.slot(back),
        };
        presenter.present(&frame)?;
        debug!("Presented slot {back} (generation {})", self.generation);

        self.busy[back] = true;
        self.back = (back + 1) % SLOTS;
        Ok(())
    }

    /// The display is done with `slot` of pool `generation`.
    ///
    /// Returns `true` if that freed a slot of the current pool; releases
    /// for a replaced pool are ignored.
    pub fn release(&mut self, generation: u64, slot: usize) -> bool {
        if generation != self.generation || slot >= SLOTS || !self.busy[slot] {
            return false;
        }
        self.busy[slot] = false;
        true
    }
}

fn no_surface() -> BarError {
    BarError::Surface("no buffer allocated yet".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use limebar_theme::Color;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(usize, u32, u32, u64, u32)>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
            assert_eq!(frame.pixels.len(), (frame.stride * frame.height) as usize);
            let first = u32::from_le_bytes(frame.pixels[..4].try_into().unwrap());
            self.frames.push((frame.slot, frame.width, frame.height, frame.generation, first));
            Ok(())
        }
    }

    #[test]
    fn nothing_to_draw_before_resize() {
        let mut surface = SurfaceManager::new();
        assert!(!surface.is_ready());
        assert!(surface.current_buffer().is_err());
        assert!(surface.present(&mut Recorder::default()).is_err());
    }

    #[test]
    fn resize_allocates_and_bumps_generation() {
        let mut surface = SurfaceManager::new();
        assert!(surface.resize(100, 24).unwrap());
        assert_eq!(surface.size(), (100, 24));
        assert_eq!(surface.generation(), 1);

        assert!(!surface.resize(100, 24).unwrap());
        assert_eq!(surface.generation(), 1);

        assert!(surface.resize(200, 30).unwrap());
        assert_eq!(surface.generation(), 2);
        let canvas = surface.current_buffer().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (200, 30));
    }

    #[test]
    fn present_alternates_slots() {
        let mut surface = SurfaceManager::new();
        surface.resize(4, 2).unwrap();
        let mut rec = Recorder::default();

        surface.current_buffer().unwrap().clear(Color::WHITE);
        surface.present(&mut rec).unwrap();
        surface.current_buffer().unwrap().clear(Color::rgba(1.0, 0.0, 0.0, 1.0));
        surface.present(&mut rec).unwrap();
        assert!(surface.release(1, 0));
        surface.current_buffer().unwrap().clear(Color::BLACK);
        surface.present(&mut rec).unwrap();

        let slots: Vec<_> = rec.frames.iter().map(|f| f.0).collect();
        assert_eq!(slots, vec![0, 1, 0]);
        assert_eq!(rec.frames[0].4, 0xffff_ffff);
        // ARGB8888 on the wire: red lands in bits 16..24.
        assert_eq!(rec.frames[1].4, 0xffff_0000);
        assert_eq!(rec.frames[2].4, 0xff00_0000);
    }

    #[test]
    fn busy_slot_is_not_reused() {
        let mut surface = SurfaceManager::new();
        surface.resize(2, 2).unwrap();
        let mut rec = Recorder::default();

        surface.current_buffer().unwrap();
        surface.present(&mut rec).unwrap();
        surface.current_buffer().unwrap();
        surface.present(&mut rec).unwrap();

        // Both frames held by the display.
        assert!(!surface.can_draw());
        assert!(surface.current_buffer().is_err());

        // Slot 1 comes back first; the next draw goes there, not to slot 0.
        assert!(surface.release(1, 1));
        assert!(surface.can_draw());
        surface.current_buffer().unwrap();
        surface.present(&mut rec).unwrap();
        assert_eq!(rec.frames.last().unwrap().0, 1);
        assert!(!surface.can_draw());
    }

    #[test]
    fn stale_releases_are_ignored() {
        let mut surface = SurfaceManager::new();
        let mut rec = Recorder::default();
        surface.resize(2, 2).unwrap();
        surface.current_buffer().unwrap();
        surface.present(&mut rec).unwrap();

        surface.resize(3, 3).unwrap();
        assert!(!surface.release(1, 0));
        assert!(!surface.release(2, 0), "slot 0 of the new pool was never presented");
        assert!(!surface.release(2, 9));
        assert!(surface.can_draw());
    }

    #[test]
    fn frames_after_resize_carry_new_size() {
        let mut surface = SurfaceManager::new();
        let mut rec = Recorder::default();
        surface.resize(10, 10).unwrap();
        surface.current_buffer().unwrap();
        surface.present(&mut rec).unwrap();
        surface.resize(20, 5).unwrap();
        surface.current_buffer().unwrap();
        surface.present(&mut rec).unwrap();

        assert_eq!(rec.frames[1], (0, 20, 5, 2, 0));
    }

    #[test]
    fn failed_resize_keeps_old_buffer() {
        let mut surface = SurfaceManager::new();
        surface.resize(10, 10).unwrap();
        assert!(surface.resize(0, 10).is_err());
        assert_eq!(surface.size(), (10, 10));
    }
}
