#![forbid(unsafe_code)]

//! Native runner for the display/input bridge (pipeline debugging).
//!
//! Drives the frame loop against the built-in scanout test pattern with
//! headless sinks, so conversion and pacing behavior can be inspected
//! without a window system or a protocol peer attached.

mod pattern;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use vireo_display::{MAX_HEIGHT, MAX_WIDTH, MONO_BLACK, MONO_WHITE};
use vireo_frontend::{
    EventSource, FrameLoop, FrameLoopConfig, HeadlessSurface, HostEvent, LoopbackSession,
};

use crate::pattern::PatternCore;

#[derive(Debug, Parser)]
#[command(about = "Headless runner for the workstation display/input bridge")]
struct Args {
    /// Framebuffer size as WIDTHxHEIGHT; width is rounded down to a whole
    /// number of packed words.
    #[arg(long, default_value = "1024x768")]
    size: String,

    /// Use 16-color palette mode instead of monochrome.
    #[arg(long)]
    color: bool,

    /// Number of unpaced frames to run.
    #[arg(long, default_value_t = 600, conflicts_with = "max_ms")]
    frames: u64,

    /// Stop after running for at most N milliseconds of host time instead
    /// of a frame count.
    #[arg(long)]
    max_ms: Option<u64>,

    /// Attach an in-memory remote session next to the local surface.
    #[arg(long)]
    remote: bool,

    /// Monochrome "ink" color as RRGGBB hex.
    #[arg(long)]
    black: Option<String>,

    /// Monochrome "paper" color as RRGGBB hex.
    #[arg(long)]
    white: Option<String>,

    /// Write the final frame as a PNG on exit.
    #[arg(long)]
    dump_png: Option<PathBuf>,
}

/// The runner has no window system; the event queue is always empty.
struct NoEvents;

impl EventSource for NoEvents {
    fn poll(&mut self) -> Option<HostEvent> {
        None
    }
}

fn parse_size(size: &str) -> Result<(u32, u32)> {
    let (w, h) = size
        .split_once('x')
        .with_context(|| format!("--size must look like 1024x768, got {size:?}"))?;
    let w: u32 = w.parse().context("invalid width")?;
    let h: u32 = h.parse().context("invalid height")?;
    // Width must cover whole packed words; round down like the classic
    // front-ends do rather than erroring.
    let w = w.clamp(32, MAX_WIDTH) & !31;
    let h = h.clamp(32, MAX_HEIGHT);
    Ok((w, h))
}

fn parse_color(value: &str) -> Result<u32> {
    let trimmed = value.trim_start_matches("0x").trim_start_matches('#');
    let rgb = u32::from_str_radix(trimmed, 16).context("color must be RRGGBB hex")?;
    if rgb > 0xFF_FFFF {
        bail!("color {value:?} out of 24-bit range");
    }
    Ok(rgb)
}

fn write_png(path: &PathBuf, width: u32, height: u32, pixels: &[u32]) -> Result<()> {
    // Surface pixels are `0xRRGGBB`; expand to the byte order the `image`
    // crate expects.
    let mut rgba = Vec::with_capacity(pixels.len() * 4);
    for &p in pixels {
        rgba.push((p >> 16) as u8);
        rgba.push((p >> 8) as u8);
        rgba.push(p as u8);
        rgba.push(0xFF);
    }
    let img = image::RgbaImage::from_raw(width, height, rgba)
        .context("framebuffer does not match the requested image size")?;
    img.save(path)
        .with_context(|| format!("failed to write PNG: {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let (width, height) = parse_size(&args.size)?;

    let cfg = FrameLoopConfig {
        width,
        height,
        mono_black: args.black.as_deref().map(parse_color).transpose()?.unwrap_or(MONO_BLACK),
        mono_white: args.white.as_deref().map(parse_color).transpose()?.unwrap_or(MONO_WHITE),
        ..Default::default()
    };

    let core = if args.color {
        PatternCore::color(width, height)
    } else {
        PatternCore::mono(width, height)
    };

    let surface = Rc::new(RefCell::new(HeadlessSurface::new(width, height)));
    let session = args
        .remote
        .then(|| Rc::new(RefCell::new(LoopbackSession::new(width, height))));

    let mut frame_loop = FrameLoop::new(core, cfg)
        .context("frame loop configuration rejected")?
        .with_surface(Box::new(surface.clone()));
    if let Some(session) = &session {
        frame_loop = frame_loop.with_remote(Box::new(session.clone()));
    }

    tracing::info!(width, height, color = args.color, frames = args.frames, "starting");
    let executed = if let Some(max_ms) = args.max_ms {
        let deadline = std::time::Duration::from_millis(max_ms);
        let start = std::time::Instant::now();
        let mut executed: u64 = 0;
        while start.elapsed() < deadline && !frame_loop.done() {
            frame_loop.tick(&mut NoEvents);
            executed += 1;
        }
        executed
    } else {
        frame_loop.run_frames(args.frames, &mut NoEvents)
    };
    tracing::info!(executed, presents = surface.borrow().presents(), "finished");
    tracing::debug!(
        clock_ms = frame_loop.core().clock_ms(),
        guest_key_bytes = frame_loop.core().key_bytes().len(),
        "core state at exit"
    );

    if let Some(session) = &session {
        tracing::info!(
            updates = session.borrow().modified().len(),
            "remote session updates"
        );
    }

    if let Some(path) = &args.dump_png {
        let surface = surface.borrow();
        write_png(path, width, height, surface.pixels())?;
        println!("wrote {}", path.display());
    }

    Ok(())
}
