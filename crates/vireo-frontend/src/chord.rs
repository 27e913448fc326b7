//! Control chords: key events the frontend consumes itself instead of
//! forwarding to the guest.

use vireo_input::scancodes;

use crate::event::{KeyEvent, Modifiers};

/// What a matched chord does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Quit,
    Reset,
    ToggleFullscreen,
    /// Synthesize a guest mouse button (1..=3) from a keyboard edge, for
    /// hosts without a three-button mouse.
    FakeMouseButton(u8),
}

/// One chord binding. A modifier field that is empty matches any modifier
/// state; a non-empty field requires at least one of its bits.
#[derive(Debug, Clone, Copy)]
pub struct KeyChord {
    pub pressed: bool,
    pub scancode: u32,
    pub mod1: Modifiers,
    pub mod2: Modifiers,
    pub action: ControlAction,
}

/// Returns the first matching chord's action, scanning in table order.
pub fn match_chord(table: &[KeyChord], event: &KeyEvent) -> Option<ControlAction> {
    table
        .iter()
        .find(|chord| {
            chord.pressed == event.pressed
                && chord.scancode == event.scancode
                && (chord.mod1.is_empty() || event.mods.intersects(chord.mod1))
                && (chord.mod2.is_empty() || event.mods.intersects(chord.mod2))
        })
        .map(|chord| chord.action)
}

/// The stock bindings.
pub fn default_chords() -> Vec<KeyChord> {
    vec![
        KeyChord {
            pressed: true,
            scancode: scancodes::F4,
            mod1: Modifiers::ALT,
            mod2: Modifiers::empty(),
            action: ControlAction::Quit,
        },
        KeyChord {
            pressed: true,
            scancode: scancodes::F12,
            mod1: Modifiers::empty(),
            mod2: Modifiers::empty(),
            action: ControlAction::Reset,
        },
        KeyChord {
            pressed: true,
            scancode: scancodes::DELETE,
            mod1: Modifiers::CTRL,
            mod2: Modifiers::SHIFT,
            action: ControlAction::Reset,
        },
        KeyChord {
            pressed: true,
            scancode: scancodes::F11,
            mod1: Modifiers::empty(),
            mod2: Modifiers::empty(),
            action: ControlAction::ToggleFullscreen,
        },
        KeyChord {
            pressed: true,
            scancode: scancodes::RETURN,
            mod1: Modifiers::ALT,
            mod2: Modifiers::empty(),
            action: ControlAction::ToggleFullscreen,
        },
        // Mac-style binding.
        KeyChord {
            pressed: true,
            scancode: scancodes::F,
            mod1: Modifiers::GUI,
            mod2: Modifiers::SHIFT,
            action: ControlAction::ToggleFullscreen,
        },
        KeyChord {
            pressed: true,
            scancode: scancodes::LEFT_ALT,
            mod1: Modifiers::empty(),
            mod2: Modifiers::empty(),
            action: ControlAction::FakeMouseButton(2),
        },
        KeyChord {
            pressed: false,
            scancode: scancodes::LEFT_ALT,
            mod1: Modifiers::empty(),
            mod2: Modifiers::empty(),
            action: ControlAction::FakeMouseButton(2),
        },
    ]
}
