use std::path::{Path, PathBuf};

use bitflags::bitflags;

bitflags! {
    /// Host modifier state delivered with each key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const GUI = 1 << 3;
    }
}

/// One host keyboard edge: physical scancode plus modifier snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub scancode: u32,
    pub mods: Modifiers,
    pub pressed: bool,
}

/// Host window-system events the loop classifies and dispatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Quit,
    WindowResized { width: u32, height: u32 },
    FileDropped(PathBuf),
    PointerMoved { x: i32, y: i32 },
    PointerButton { button: u8, pressed: bool },
    Key(KeyEvent),
}

/// Non-blocking host event queue; `poll` returns `None` once drained for
/// this tick.
pub trait EventSource {
    fn poll(&mut self) -> Option<HostEvent>;
}

/// File-transfer collaborator fed by host file-drop events.
pub trait TransferRequests {
    fn offer_file(&mut self, name: &str, path: &Path);
}
