use limebar_core::{BarError, Result};
use memmap2::MmapMut;
use std::fs::File;
use std::os::fd::{AsFd, BorrowedFd};

/// Bytes per pixel of the ARGB8888 format.
pub const BYTES_PER_PIXEL: usize = 4;

/// Frames held by one pool: one on screen, one being drawn.
pub const SLOTS: usize = 2;

/// Shareable memory holding [`SLOTS`] frames of `width × height` pixels.
///
/// Backed by an unlinked file (in `$XDG_RUNTIME_DIR` when set) so the
/// display server can map the same pages through the file descriptor.
#[derive(Debug)]
pub struct ShmPool {
    file:   File,
    map:    MmapMut,
    width:  u32,
    height: u32,
}

impl ShmPool {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BarError::Surface(format!("cannot allocate a {width}x{height} buffer")));
        }

        let frame_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| BarError::Surface(format!("{width}x{height} buffer overflows")))?;
        let total = frame_len * SLOTS;

        let file = backing_file()
            .map_err(|e| BarError::Surface(format!("cannot create shm file: {e}")))?;
        file.set_len(total as u64)
            .map_err(|e| BarError::Surface(format!("cannot size shm file to {total} bytes: {e}")))?;

        // SAFETY: the file is private to this process (unlinked on creation)
        // and is only ever resized here, before the mapping exists.
        let map = unsafe { MmapMut::map_mut(&file) }
            .map_err(|e| BarError::Surface(format!("mmap failed: {e}")))?;

        Ok(Self { file, map, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Bytes per frame.
    pub fn frame_len(&self) -> usize {
        self.stride() * self.height as usize
    }

    /// Bytes in the whole pool.
    pub fn byte_len(&self) -> usize {
        self.map.len()
    }

    /// Byte offset of `slot` inside the pool.
    pub fn offset(&self, slot: usize) -> usize {
        slot * self.frame_len()
    }

    pub fn slot(&self, slot: usize) -> &[u8] {
        let start = self.offset(slot);
        &self.map[start..start + self.frame_len()]
    }

    pub fn slot_mut(&mut self, slot: usize) -> &mut [u8] {
        let start = self.offset(slot);
        let len = self.frame_len();
        &mut self.map[start..start + len]
    }

    pub fn fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

fn backing_file() -> std::io::Result<File> {
    match std::env::var_os("XDG_RUNTIME_DIR") {
        Some(dir) if std::path::Path::new(&dir).is_dir() => tempfile::tempfile_in(dir),
        _ => tempfile::tempfile(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_holds_two_frames() {
        let pool = ShmPool::new(10, 3).unwrap();
        assert_eq!(pool.stride(), 40);
        assert_eq!(pool.frame_len(), 120);
        assert_eq!(pool.byte_len(), 240);
        assert_eq!(pool.offset(1), 120);
    }

    #[test]
    fn slots_do_not_overlap() {
        let mut pool = ShmPool::new(2, 2).unwrap();
        pool.slot_mut(0).fill(0xaa);
        assert!(pool.slot(1).iter().all(|&b| b == 0));
        assert!(pool.slot(0).iter().all(|&b| b == 0xaa));
    }

    #[test]
    fn zero_size_is_refused() {
        assert!(matches!(ShmPool::new(0, 24), Err(BarError::Surface(_))));
        assert!(matches!(ShmPool::new(100, 0), Err(BarError::Surface(_))));
    }
}
