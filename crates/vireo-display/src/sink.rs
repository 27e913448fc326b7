use crate::convert::RectSink;
use crate::frame::{MAX_HEIGHT, MAX_WIDTH};
use crate::rect::PixelRect;

/// Host-side raster surface (window texture or equivalent).
///
/// `update_rect` receives `rect.w * rect.h` RGB pixels in row-major,
/// top-down order, restricted to the damage extent; the surface must consume
/// them before the call returns; the buffer is scratch and is overwritten
/// by the next conversion. The remaining hooks are window-system niceties
/// and default to no-ops.
pub trait RasterSurface {
    fn update_rect(&mut self, rect: PixelRect, pixels: &[u32]);
    fn present(&mut self);
    fn set_fullscreen(&mut self, _enabled: bool) {}
    fn set_cursor_visible(&mut self, _visible: bool) {}
    fn window_resized(&mut self, _width: u32, _height: u32) {}
}

/// Whether the remote session still has a live protocol peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Ended,
}

/// Display side of a remote-display protocol session.
///
/// The session owns a byte framebuffer at its native stride and depth
/// (RGB, one byte per channel, padded to `bytes_per_pixel`). Updates arrive
/// either as per-pixel draws or as raw byte writes at a framebuffer offset,
/// always followed by one `mark_modified` call that schedules the rectangle
/// for transmission. `pump` runs the protocol machinery once per tick.
pub trait RemoteSession {
    fn stride_bytes(&self) -> usize;
    fn bytes_per_pixel(&self) -> usize;
    /// Copies `bytes` into the session framebuffer at `offset`.
    fn write_raw(&mut self, offset: usize, bytes: &[u8]);
    fn draw_pixel(&mut self, x: u32, y: u32, color: u32);
    fn mark_modified(&mut self, rect: PixelRect);
    #[must_use]
    fn pump(&mut self) -> SessionStatus;
    fn shutdown(&mut self);
}

/// Reusable RGBA expansion buffer for the local raster path, sized once for
/// the largest supported frame and overwritten every conversion.
pub struct PixelScratch {
    pixels: Vec<u32>,
}

impl PixelScratch {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; MAX_WIDTH as usize * MAX_HEIGHT as usize],
        }
    }
}

impl Default for PixelScratch {
    fn default() -> Self {
        Self::new()
    }
}

/// Local raster write strategy: expand into the contiguous scratch, then
/// hand the surface a single sub-rectangle update and nothing else.
pub struct RasterSink<'a, S: RasterSurface + ?Sized> {
    surface: &'a mut S,
    scratch: &'a mut PixelScratch,
    rect: PixelRect,
}

impl<'a, S: RasterSurface + ?Sized> RasterSink<'a, S> {
    pub fn new(surface: &'a mut S, scratch: &'a mut PixelScratch) -> Self {
        Self {
            surface,
            scratch,
            rect: PixelRect {
                x: 0,
                y: 0,
                w: 0,
                h: 0,
            },
        }
    }
}

impl<S: RasterSurface + ?Sized> RectSink for RasterSink<'_, S> {
    fn begin(&mut self, rect: PixelRect) {
        self.rect = rect;
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: u32) {
        let idx = (y - self.rect.y) as usize * self.rect.w as usize + (x - self.rect.x) as usize;
        self.scratch.pixels[idx] = color;
    }

    fn commit(&mut self, rect: PixelRect) {
        self.surface
            .update_rect(rect, &self.scratch.pixels[..rect.pixel_count()]);
    }
}

/// How remote pixels are delivered for the current run's pixel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteWriteMode {
    /// Per-pixel draw calls (palette mode).
    Draw,
    /// Byte-swapped raw copy into the session framebuffer (monochrome mode).
    RawCopy,
}

/// Remote write strategy; both modes end in one mark-modified call covering
/// the full word-granularity extent.
pub struct RemoteSink<'a, S: RemoteSession + ?Sized> {
    session: &'a mut S,
    mode: RemoteWriteMode,
}

impl<'a, S: RemoteSession + ?Sized> RemoteSink<'a, S> {
    pub fn new(session: &'a mut S, mode: RemoteWriteMode) -> Self {
        Self { session, mode }
    }
}

impl<S: RemoteSession + ?Sized> RectSink for RemoteSink<'_, S> {
    fn begin(&mut self, _rect: PixelRect) {}

    fn set_pixel(&mut self, x: u32, y: u32, color: u32) {
        match self.mode {
            RemoteWriteMode::Draw => self.session.draw_pixel(x, y, color),
            RemoteWriteMode::RawCopy => {
                let bpp = self.session.bytes_per_pixel();
                let offset = y as usize * self.session.stride_bytes() + x as usize * bpp;
                // `0xRRGGBB` leaves memory as R, G, B (, pad) byte order,
                // swapped from the value's native little-endian layout.
                let rgb = [(color >> 16) as u8, (color >> 8) as u8, color as u8, 0];
                self.session.write_raw(offset, &rgb[..bpp]);
            }
        }
    }

    fn commit(&mut self, rect: PixelRect) {
        self.session.mark_modified(rect);
    }
}

// Shared-handle forwarding, so a surface or session can be owned by the
// embedder and handed to the frame loop at the same time.
impl<S: RasterSurface> RasterSurface for std::rc::Rc<std::cell::RefCell<S>> {
    fn update_rect(&mut self, rect: PixelRect, pixels: &[u32]) {
        self.borrow_mut().update_rect(rect, pixels);
    }

    fn present(&mut self) {
        self.borrow_mut().present();
    }

    fn set_fullscreen(&mut self, enabled: bool) {
        self.borrow_mut().set_fullscreen(enabled);
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.borrow_mut().set_cursor_visible(visible);
    }

    fn window_resized(&mut self, width: u32, height: u32) {
        self.borrow_mut().window_resized(width, height);
    }
}

impl<S: RemoteSession> RemoteSession for std::rc::Rc<std::cell::RefCell<S>> {
    fn stride_bytes(&self) -> usize {
        self.borrow().stride_bytes()
    }

    fn bytes_per_pixel(&self) -> usize {
        self.borrow().bytes_per_pixel()
    }

    fn write_raw(&mut self, offset: usize, bytes: &[u8]) {
        self.borrow_mut().write_raw(offset, bytes);
    }

    fn draw_pixel(&mut self, x: u32, y: u32, color: u32) {
        self.borrow_mut().draw_pixel(x, y, color);
    }

    fn mark_modified(&mut self, rect: PixelRect) {
        self.borrow_mut().mark_modified(rect);
    }

    fn pump(&mut self) -> SessionStatus {
        self.borrow_mut().pump()
    }

    fn shutdown(&mut self) {
        self.borrow_mut().shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert;
    use crate::frame::{PixelLayout, SourceFrame, MONO_BLACK, MONO_WHITE};
    use crate::rect::DamageRect;

    #[derive(Default)]
    struct CapturingSurface {
        updates: Vec<(PixelRect, Vec<u32>)>,
    }

    impl RasterSurface for CapturingSurface {
        fn update_rect(&mut self, rect: PixelRect, pixels: &[u32]) {
            self.updates.push((rect, pixels.to_vec()));
        }

        fn present(&mut self) {}
    }

    struct MemorySession {
        width: u32,
        fb: Vec<u8>,
        draws: Vec<(u32, u32, u32)>,
        modified: Vec<PixelRect>,
    }

    impl MemorySession {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                fb: vec![0; (width * height * 4) as usize],
                draws: Vec::new(),
                modified: Vec::new(),
            }
        }
    }

    impl RemoteSession for MemorySession {
        fn stride_bytes(&self) -> usize {
            self.width as usize * 4
        }

        fn bytes_per_pixel(&self) -> usize {
            4
        }

        fn write_raw(&mut self, offset: usize, bytes: &[u8]) {
            self.fb[offset..offset + bytes.len()].copy_from_slice(bytes);
        }

        fn draw_pixel(&mut self, x: u32, y: u32, color: u32) {
            self.draws.push((x, y, color));
        }

        fn mark_modified(&mut self, rect: PixelRect) {
            self.modified.push(rect);
        }

        fn pump(&mut self) -> SessionStatus {
            SessionStatus::Active
        }

        fn shutdown(&mut self) {}
    }

    #[test]
    fn raster_sink_hands_one_packed_update() {
        let mut words = vec![0u32; 2 * 32];
        words[32 + 1] = 1; // line 16, word 1, pixel 0
        let frame = SourceFrame::new(
            &words,
            64,
            32,
            PixelLayout::Monochrome {
                black: MONO_BLACK,
                white: MONO_WHITE,
            },
        )
        .unwrap();

        let mut surface = CapturingSurface::default();
        let mut scratch = PixelScratch::new();
        let mut sink = RasterSink::new(&mut surface, &mut scratch);
        convert(
            &frame,
            DamageRect {
                x1: 1,
                y1: 16,
                x2: 1,
                y2: 16,
            },
            &mut sink,
        );

        assert_eq!(surface.updates.len(), 1);
        let (rect, pixels) = &surface.updates[0];
        assert_eq!(
            *rect,
            PixelRect {
                x: 32,
                y: 32 - 16 - 1,
                w: 32,
                h: 1
            }
        );
        assert_eq!(pixels.len(), 32);
        assert_eq!(pixels[0], MONO_WHITE);
        assert!(pixels[1..].iter().all(|&p| p == MONO_BLACK));
    }

    #[test]
    fn remote_raw_copy_swaps_bytes_at_native_stride() {
        let mut words = vec![0u32; 32];
        words[31] = 1; // top source line, pixel 0 -> destination row 0
        let frame = SourceFrame::new(
            &words,
            32,
            32,
            PixelLayout::Monochrome {
                black: 0x112233,
                white: 0xAABBCC,
            },
        )
        .unwrap();

        let mut session = MemorySession::new(32, 32);
        let mut sink = RemoteSink::new(&mut session, RemoteWriteMode::RawCopy);
        convert(&frame, DamageRect::full(1, 32), &mut sink);

        // Destination (0, 0): white pixel, memory order R G B pad.
        assert_eq!(session.fb[0..4], [0xAA, 0xBB, 0xCC, 0x00]);
        // Destination (1, 0): black.
        assert_eq!(session.fb[4..8], [0x11, 0x22, 0x33, 0x00]);
        assert!(session.draws.is_empty());
        assert_eq!(
            session.modified,
            [PixelRect {
                x: 0,
                y: 0,
                w: 32,
                h: 32
            }]
        );
    }

    #[test]
    fn remote_draw_mode_draws_per_pixel() {
        let palette = {
            let mut p = [0u32; 16];
            p[5] = 0xDEAD55;
            p
        };
        let mut words = vec![0u32; 4 * 32];
        words[0] = 0x5; // bottom line, pixel 0 -> index 5
        let frame = SourceFrame::new(&words, 32, 32, PixelLayout::Palette(&palette)).unwrap();

        let mut session = MemorySession::new(32, 32);
        let mut sink = RemoteSink::new(&mut session, RemoteWriteMode::Draw);
        convert(
            &frame,
            DamageRect {
                x1: 0,
                y1: 0,
                x2: 0,
                y2: 0,
            },
            &mut sink,
        );

        assert_eq!(session.draws.len(), 8);
        assert_eq!(session.draws[0], (0, 31, 0xDEAD55));
        assert_eq!(session.modified.len(), 1);
        assert!(session.fb.iter().all(|&b| b == 0));
    }
}
