//! In-memory surface and session implementations.
//!
//! These back the native debug runner and tests; a real embedder swaps in a
//! window texture and a protocol server behind the same traits.

use std::collections::VecDeque;

use vireo_display::{PixelRect, RasterSurface, RemoteSession, SessionStatus};

use crate::remote::{RemoteEvent, RemoteInputSource};

/// Full-frame RGBA store that applies sub-rectangle updates in place.
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    presents: u64,
    fullscreen: bool,
    cursor_visible: bool,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
            presents: 0,
            fullscreen: false,
            cursor_visible: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Latest presented frame, row-major top-down `0xRRGGBB`.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn presents(&self) -> u64 {
        self.presents
    }

    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }
}

impl RasterSurface for HeadlessSurface {
    fn update_rect(&mut self, rect: PixelRect, pixels: &[u32]) {
        for row in 0..rect.h {
            let src = (row * rect.w) as usize;
            let dst = ((rect.y + row) * self.width + rect.x) as usize;
            self.pixels[dst..dst + rect.w as usize]
                .copy_from_slice(&pixels[src..src + rect.w as usize]);
        }
    }

    fn present(&mut self) {
        self.presents += 1;
    }

    fn set_fullscreen(&mut self, enabled: bool) {
        self.fullscreen = enabled;
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }
}

/// In-memory remote session: an RGBX byte framebuffer, a modified-rectangle
/// log, and a queue of input events the tests (or the runner) script.
pub struct LoopbackSession {
    width: u32,
    fb: Vec<u8>,
    modified: Vec<PixelRect>,
    events: VecDeque<RemoteEvent>,
    active: bool,
}

const LOOPBACK_BPP: usize = 4;

impl LoopbackSession {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            fb: vec![0; width as usize * height as usize * LOOPBACK_BPP],
            modified: Vec::new(),
            events: VecDeque::new(),
            active: true,
        }
    }

    pub fn framebuffer(&self) -> &[u8] {
        &self.fb
    }

    pub fn modified(&self) -> &[PixelRect] {
        &self.modified
    }

    /// Queues an input event for the next drain.
    pub fn push_event(&mut self, event: RemoteEvent) {
        self.events.push_back(event);
    }

    /// Simulates the peer going away; the next pump reports it.
    pub fn disconnect(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl RemoteSession for LoopbackSession {
    fn stride_bytes(&self) -> usize {
        self.width as usize * LOOPBACK_BPP
    }

    fn bytes_per_pixel(&self) -> usize {
        LOOPBACK_BPP
    }

    fn write_raw(&mut self, offset: usize, bytes: &[u8]) {
        self.fb[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    fn draw_pixel(&mut self, x: u32, y: u32, color: u32) {
        let offset = y as usize * self.stride_bytes() + x as usize * LOOPBACK_BPP;
        let rgb = [(color >> 16) as u8, (color >> 8) as u8, color as u8, 0];
        self.fb[offset..offset + LOOPBACK_BPP].copy_from_slice(&rgb);
    }

    fn mark_modified(&mut self, rect: PixelRect) {
        self.modified.push(rect);
    }

    fn pump(&mut self) -> SessionStatus {
        if self.active {
            SessionStatus::Active
        } else {
            SessionStatus::Ended
        }
    }

    fn shutdown(&mut self) {
        self.active = false;
    }
}

impl RemoteInputSource for LoopbackSession {
    fn drain_input(&mut self, out: &mut Vec<RemoteEvent>) {
        out.extend(self.events.drain(..));
    }
}
