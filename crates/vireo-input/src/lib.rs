//! Keyboard input translation for the emulated workstation.
//!
//! Host-side key events arrive as opaque key identifiers (a physical
//! scancode or a remote-protocol keysym, depending on the event source) and
//! leave as PS/2 Set-2 scancode byte sequences ready for injection into the
//! guest keyboard controller:
//!
//! - make codes are emitted bare, break codes behind an `0xF0` prefix,
//! - extended keys carry an `0xE0` prefix on both edges,
//! - keys whose guest decoding depends on shift/Num Lock state are bracketed
//!   with synthetic shift transitions (the guest's Num Lock is assumed to be
//!   permanently engaged, and no real shift state is ever tracked).
//!
//! The emission algorithm is shared; the two event sources differ only in
//! their lookup table ([`HostKeymap`] for physical scancodes,
//! [`RemoteKeymap`] for the remote protocol's keysym space).

mod host;
mod remote;
mod scancode;

pub use host::{scancodes, HostKeymap};
pub use remote::{keysyms, RemoteKeymap};
pub use scancode::{encode_key, KeyInfo, KeyRule, Keymap, ScancodeFrame, MAX_SEQUENCE_LEN};
