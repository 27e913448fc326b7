//! Frame loop and event dispatch for the emulated workstation.
//!
//! One single-threaded loop drives everything, once per tick: drain host
//! input (chords first, then scancode encoding into the core), advance the
//! emulated clock and run the core for a fixed instruction budget, convert
//! the frame's damage rectangle into each attached display sink, pump the
//! remote session and feed its input events back through the remote
//! encoder, then sleep out the remainder of the tick.
//!
//! The emulated CPU/memory core itself is an external collaborator behind
//! the [`Core`] trait, as are the window system ([`EventSource`],
//! `RasterSurface`) and the remote protocol server (`RemoteSession` +
//! [`RemoteInputSource`]).

mod chord;
mod event;
mod frame_loop;
mod headless;
mod machine;
mod remote;

pub use chord::{default_chords, match_chord, ControlAction, KeyChord};
pub use machine::Core;
pub use event::{EventSource, HostEvent, KeyEvent, Modifiers, TransferRequests};
pub use frame_loop::{clamp_pointer, pace_remainder, FrameLoop, FrameLoopConfig, FrontendError};
pub use headless::{HeadlessSurface, LoopbackSession};
pub use remote::{RemoteEndpoint, RemoteEvent, RemoteInput, RemoteInputSource};
