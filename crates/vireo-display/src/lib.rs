//! Damage-driven framebuffer conversion.
//!
//! The emulated workstation keeps its framebuffer packed one bit per pixel
//! (monochrome, 32 pixels per `u32` word) or one nibble per pixel (16-color
//! palette, 8 pixels per word), row-major and bottom-up, and reports a
//! word-granularity damage rectangle covering everything that changed since
//! the previous frame. This crate walks that rectangle once per sink and
//! expands it into the sink's native pixel format:
//!
//! - a local raster surface receives one contiguous RGBA sub-rectangle
//!   update per frame, rows flipped to top-down;
//! - a remote-display session receives either per-pixel draws (palette mode)
//!   or a byte-swapped raw copy into its own framebuffer at its native
//!   stride and depth (monochrome mode), followed by a mark-modified call
//!   covering the full pixel extent of the damage words.
//!
//! Pixel values are `0xRRGGBB` in a `u32` throughout; sinks own any further
//! format conversion.

mod convert;
mod frame;
mod rect;
mod sink;

pub use convert::{convert, RectSink};
pub use frame::{FrameError, PixelLayout, SourceFrame, MAX_HEIGHT, MAX_WIDTH, MONO_BLACK, MONO_WHITE};
pub use rect::{DamageRect, PixelRect};
pub use sink::{
    PixelScratch, RasterSink, RasterSurface, RemoteSession, RemoteSink, RemoteWriteMode,
    SessionStatus,
};
