//! Input side of the remote-display session.

use vireo_display::RemoteSession;
use vireo_input::{keysyms, Keymap, RemoteKeymap};

use crate::frame_loop::clamp_pointer;
use crate::machine::Core;

/// Input events drained from the remote protocol session each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEvent {
    Key { keysym: u32, pressed: bool },
    /// Absolute pointer state: position in remote framebuffer coordinates
    /// (top-down) plus the current button mask (bit 0 = button 1).
    Pointer { x: i32, y: i32, buttons: u8 },
}

/// Source of remote input events, drained once per tick after the session
/// pump.
pub trait RemoteInputSource {
    fn drain_input(&mut self, out: &mut Vec<RemoteEvent>);
}

impl<S: RemoteInputSource> RemoteInputSource for std::rc::Rc<std::cell::RefCell<S>> {
    fn drain_input(&mut self, out: &mut Vec<RemoteEvent>) {
        self.borrow_mut().drain_input(out);
    }
}

/// Full remote endpoint: display sink plus input source.
pub trait RemoteEndpoint: RemoteSession + RemoteInputSource {}

impl<T: RemoteSession + RemoteInputSource> RemoteEndpoint for T {}

/// Remote input dispatcher.
///
/// Remote clients report produced keysyms, so Shift keysyms are dropped
/// outright and the Control keys only feed a latch (explicit state here,
/// threaded through every dispatch) that turns a handful of letter keys
/// into synthetic mouse buttons and session shutdown. Everything else goes
/// through the keysym table into the guest keyboard.
#[derive(Debug, Default)]
pub struct RemoteInput {
    keymap: RemoteKeymap,
    control_down: bool,
    buttons: u8,
}

impl RemoteInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch<C: Core>(
        &mut self,
        event: RemoteEvent,
        core: &mut C,
        session: &mut (impl RemoteSession + ?Sized),
        width: u32,
        height: u32,
    ) {
        match event {
            RemoteEvent::Key { keysym, pressed } => {
                self.dispatch_key(keysym, pressed, core, session)
            }
            RemoteEvent::Pointer { x, y, buttons } => {
                self.dispatch_pointer(x, y, buttons, core, width, height)
            }
        }
    }

    fn dispatch_key<C: Core>(
        &mut self,
        keysym: u32,
        pressed: bool,
        core: &mut C,
        session: &mut (impl RemoteSession + ?Sized),
    ) {
        match keysym {
            keysyms::SHIFT_L | keysyms::SHIFT_R => return,
            keysyms::CONTROL_L | keysyms::CONTROL_R => {
                self.control_down = pressed;
                return;
            }
            _ => {}
        }

        if self.control_down {
            let button = match keysym {
                k if k == ';' as u32 => Some(1),
                k if k == 'q' as u32 => Some(2),
                k if k == 'j' as u32 => Some(3),
                _ => None,
            };
            if let Some(button) = button {
                core.inject_mouse_button(button, pressed);
                return;
            }
            if keysym == 'x' as u32 {
                tracing::info!("remote shutdown chord");
                session.shutdown();
                return;
            }
        }

        let frame = self.keymap.encode(keysym, pressed);
        core.inject_key_bytes(&frame);
    }

    fn dispatch_pointer<C: Core>(
        &mut self,
        x: i32,
        y: i32,
        buttons: u8,
        core: &mut C,
        width: u32,
        height: u32,
    ) {
        let (cx, cy, _) = clamp_pointer(x, y, width, height);
        core.inject_mouse_move(cx, height - 1 - cy);

        let changed = (buttons ^ self.buttons) & 0x7;
        for bit in 0..3 {
            if changed & (1 << bit) != 0 {
                core.inject_mouse_button(bit + 1, buttons & (1 << bit) != 0);
            }
        }
        self.buttons = buttons & 0x7;
    }
}
