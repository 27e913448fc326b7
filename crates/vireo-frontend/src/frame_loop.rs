use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};
use vireo_display::{
    convert, FrameError, PixelLayout, PixelScratch, RasterSink, RasterSurface, RemoteSink,
    RemoteWriteMode, SessionStatus, SourceFrame, MONO_BLACK, MONO_WHITE,
};
use vireo_input::{HostKeymap, Keymap};

use crate::chord::{default_chords, match_chord, ControlAction, KeyChord};
use crate::event::{EventSource, HostEvent, KeyEvent, TransferRequests};
use crate::machine::Core;
use crate::remote::{RemoteEndpoint, RemoteEvent, RemoteInput};

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("frame rate must be nonzero")]
    ZeroFrameRate,
    #[error("core clock must be nonzero")]
    ZeroClock,
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Fixed per-run loop parameters.
#[derive(Debug, Clone, Copy)]
pub struct FrameLoopConfig {
    /// Framebuffer width in pixels; must be a whole number of packed words.
    pub width: u32,
    /// Framebuffer height in scan lines.
    pub height: u32,
    /// Emulated core clock in Hz; together with `frame_rate` it sizes the
    /// per-tick instruction budget so the core keeps real-time pace.
    pub clock_hz: u32,
    /// Host frame rate in ticks per second.
    pub frame_rate: u32,
    /// Monochrome-mode colors.
    pub mono_black: u32,
    pub mono_white: u32,
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            clock_hz: 25_000_000,
            frame_rate: 60,
            mono_black: MONO_BLACK,
            mono_white: MONO_WHITE,
        }
    }
}

impl FrameLoopConfig {
    pub fn instruction_budget(&self) -> u32 {
        self.clock_hz / self.frame_rate
    }
}

/// Clamps a pointer position into the frame; the returned flag reports
/// whether clamping moved it (pointer left the emulated screen).
pub fn clamp_pointer(x: i32, y: i32, width: u32, height: u32) -> (u32, u32, bool) {
    let cx = x.clamp(0, width as i32 - 1);
    let cy = y.clamp(0, height as i32 - 1);
    (cx as u32, cy as u32, cx != x || cy != y)
}

/// Time left in the tick, or `None` when the tick overran. Overruns are
/// simply skipped; the loop never runs ahead to catch up.
pub fn pace_remainder(interval: Duration, elapsed: Duration) -> Option<Duration> {
    (elapsed < interval).then(|| interval - elapsed)
}

/// The coordinating driver: one instance owns the core, the attached sinks,
/// and every piece of per-run loop state.
pub struct FrameLoop<C: Core> {
    core: C,
    cfg: FrameLoopConfig,
    chords: Vec<KeyChord>,
    host_keymap: HostKeymap,
    remote_input: RemoteInput,
    surface: Option<Box<dyn RasterSurface>>,
    remote: Option<Box<dyn RemoteEndpoint>>,
    transfers: Option<Box<dyn TransferRequests>>,
    scratch: PixelScratch,
    remote_events: Vec<RemoteEvent>,
    start: Instant,
    fullscreen: bool,
    pointer_offscreen: bool,
    done: bool,
}

impl<C: Core> FrameLoop<C> {
    /// Validates the configuration against the core's framebuffer geometry
    /// and pixel mode.
    pub fn new(core: C, cfg: FrameLoopConfig) -> Result<Self, FrontendError> {
        if cfg.frame_rate == 0 {
            return Err(FrontendError::ZeroFrameRate);
        }
        if cfg.clock_hz == 0 {
            return Err(FrontendError::ZeroClock);
        }
        // A trial view catches misaligned widths and short buffers up
        // front; the per-tick views cannot fail afterwards.
        SourceFrame::new(core.framebuffer(), cfg.width, cfg.height, layout_of(&core, &cfg))?;
        Ok(Self {
            core,
            cfg,
            chords: default_chords(),
            host_keymap: HostKeymap,
            remote_input: RemoteInput::new(),
            surface: None,
            remote: None,
            transfers: None,
            scratch: PixelScratch::new(),
            remote_events: Vec::new(),
            start: Instant::now(),
            fullscreen: false,
            pointer_offscreen: false,
            done: false,
        })
    }

    pub fn with_surface(mut self, surface: Box<dyn RasterSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn with_remote(mut self, remote: Box<dyn RemoteEndpoint>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_transfers(mut self, transfers: Box<dyn TransferRequests>) -> Self {
        self.transfers = Some(transfers);
        self
    }

    /// Replaces the default chord table.
    pub fn with_chords(mut self, chords: Vec<KeyChord>) -> Self {
        self.chords = chords;
        self
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    pub fn config(&self) -> &FrameLoopConfig {
        &self.cfg
    }

    pub fn done(&self) -> bool {
        self.done
    }

    /// Runs paced ticks until something requests termination.
    pub fn run(&mut self, events: &mut dyn EventSource) {
        let interval = Duration::from_secs(1) / self.cfg.frame_rate;
        while !self.done {
            let tick_start = Instant::now();
            self.tick(events);
            if let Some(remaining) = pace_remainder(interval, tick_start.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    /// Runs at most `frames` unpaced ticks (headless/debug use); stops early
    /// on a termination request. Returns the number of ticks executed.
    pub fn run_frames(&mut self, frames: u64, events: &mut dyn EventSource) -> u64 {
        let mut executed = 0;
        while executed < frames && !self.done {
            self.tick(events);
            executed += 1;
        }
        executed
    }

    /// One full cycle: input, core advancement, per-sink conversion,
    /// presentation.
    pub fn tick(&mut self, events: &mut dyn EventSource) {
        self.drain_host_events(events);

        let now_ms = self.start.elapsed().as_millis() as u32;
        self.core.advance_clock(now_ms);
        self.core.run(self.cfg.instruction_budget());

        self.update_surface();
        self.update_remote();
    }

    fn drain_host_events(&mut self, events: &mut dyn EventSource) {
        while let Some(event) = events.poll() {
            match event {
                HostEvent::Quit => {
                    info!("quit requested");
                    self.done = true;
                }
                HostEvent::WindowResized { width, height } => {
                    if let Some(surface) = self.surface.as_deref_mut() {
                        surface.window_resized(width, height);
                    }
                }
                HostEvent::FileDropped(path) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    info!(file = %path.display(), "file dropped");
                    if let Some(transfers) = self.transfers.as_deref_mut() {
                        transfers.offer_file(&name, &path);
                    }
                }
                HostEvent::PointerMoved { x, y } => self.pointer_moved(x, y),
                HostEvent::PointerButton { button, pressed } => {
                    self.core.inject_mouse_button(button, pressed);
                }
                HostEvent::Key(key) => self.dispatch_key(key),
            }
        }
    }

    fn pointer_moved(&mut self, x: i32, y: i32) {
        let (cx, cy, offscreen) = clamp_pointer(x, y, self.cfg.width, self.cfg.height);
        if offscreen != self.pointer_offscreen {
            if let Some(surface) = self.surface.as_deref_mut() {
                surface.set_cursor_visible(offscreen);
            }
            self.pointer_offscreen = offscreen;
        }
        self.core.inject_mouse_move(cx, self.cfg.height - 1 - cy);
    }

    fn dispatch_key(&mut self, event: KeyEvent) {
        match match_chord(&self.chords, &event) {
            Some(ControlAction::Quit) => {
                info!("quit chord");
                self.done = true;
            }
            Some(ControlAction::Reset) => {
                info!("reset chord");
                self.core.reset();
            }
            Some(ControlAction::ToggleFullscreen) => {
                self.fullscreen = !self.fullscreen;
                if let Some(surface) = self.surface.as_deref_mut() {
                    surface.set_fullscreen(self.fullscreen);
                }
            }
            Some(ControlAction::FakeMouseButton(button)) => {
                self.core.inject_mouse_button(button, event.pressed);
            }
            None => {
                let frame = self.host_keymap.encode(event.scancode, event.pressed);
                debug!(scancode = event.scancode, bytes = frame.len(), "key forwarded");
                self.core.inject_key_bytes(&frame);
            }
        }
    }

    fn update_surface(&mut self) {
        let Some(surface) = self.surface.as_deref_mut() else {
            return;
        };
        let damage = self.core.damage();
        let layout = layout_of(&self.core, &self.cfg);
        match SourceFrame::new(self.core.framebuffer(), self.cfg.width, self.cfg.height, layout) {
            Ok(frame) => {
                let mut sink = RasterSink::new(&mut *surface, &mut self.scratch);
                convert(&frame, damage, &mut sink);
            }
            Err(err) => warn!("skipping surface update: {err}"),
        }
        surface.present();
    }

    fn update_remote(&mut self) {
        let Some(remote) = self.remote.as_deref_mut() else {
            return;
        };
        // Damage is queried fresh per sink; reading does not consume it, so
        // this sees the same rectangle the surface pass saw.
        let damage = self.core.damage();
        let layout = layout_of(&self.core, &self.cfg);
        let mode = match layout {
            PixelLayout::Palette(_) => RemoteWriteMode::Draw,
            PixelLayout::Monochrome { .. } => RemoteWriteMode::RawCopy,
        };
        match SourceFrame::new(self.core.framebuffer(), self.cfg.width, self.cfg.height, layout) {
            Ok(frame) => {
                let mut sink = RemoteSink::new(&mut *remote, mode);
                convert(&frame, damage, &mut sink);
            }
            Err(err) => warn!("skipping remote update: {err}"),
        }

        if remote.pump() == SessionStatus::Ended {
            info!("remote session ended");
            self.done = true;
            return;
        }

        let mut events = std::mem::take(&mut self.remote_events);
        events.clear();
        remote.drain_input(&mut events);
        for event in events.drain(..) {
            self.remote_input.dispatch(
                event,
                &mut self.core,
                &mut *remote,
                self.cfg.width,
                self.cfg.height,
            );
        }
        self.remote_events = events;
    }
}

fn layout_of<'a, C: Core>(core: &'a C, cfg: &FrameLoopConfig) -> PixelLayout<'a> {
    match core.palette() {
        Some(palette) => PixelLayout::Palette(palette),
        None => PixelLayout::Monochrome {
            black: cfg.mono_black,
            white: cfg.mono_white,
        },
    }
}
