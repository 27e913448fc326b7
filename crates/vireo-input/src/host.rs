//! Keymap for host window-system key events, indexed by physical scancode
//! (USB HID usage numbering, the space SDL-style hosts report).

use crate::scancode::{KeyInfo, Keymap};

/// Host scancodes referenced by the table and by frontend chord bindings.
///
/// Values follow USB HID usage page 0x07. Modifier usages live at 224..,
/// outside the table, so modifiers are never forwarded to the guest.
pub mod scancodes {
    pub const A: u32 = 4;
    pub const B: u32 = 5;
    pub const C: u32 = 6;
    pub const D: u32 = 7;
    pub const E: u32 = 8;
    pub const F: u32 = 9;
    pub const G: u32 = 10;
    pub const H: u32 = 11;
    pub const I: u32 = 12;
    pub const J: u32 = 13;
    pub const K: u32 = 14;
    pub const L: u32 = 15;
    pub const M: u32 = 16;
    pub const N: u32 = 17;
    pub const O: u32 = 18;
    pub const P: u32 = 19;
    pub const Q: u32 = 20;
    pub const R: u32 = 21;
    pub const S: u32 = 22;
    pub const T: u32 = 23;
    pub const U: u32 = 24;
    pub const V: u32 = 25;
    pub const W: u32 = 26;
    pub const X: u32 = 27;
    pub const Y: u32 = 28;
    pub const Z: u32 = 29;

    pub const DIGIT_1: u32 = 30;
    pub const DIGIT_2: u32 = 31;
    pub const DIGIT_3: u32 = 32;
    pub const DIGIT_4: u32 = 33;
    pub const DIGIT_5: u32 = 34;
    pub const DIGIT_6: u32 = 35;
    pub const DIGIT_7: u32 = 36;
    pub const DIGIT_8: u32 = 37;
    pub const DIGIT_9: u32 = 38;
    pub const DIGIT_0: u32 = 39;

    pub const RETURN: u32 = 40;
    pub const ESCAPE: u32 = 41;
    pub const BACKSPACE: u32 = 42;
    pub const TAB: u32 = 43;
    pub const SPACE: u32 = 44;

    pub const MINUS: u32 = 45;
    pub const EQUALS: u32 = 46;
    pub const LEFT_BRACKET: u32 = 47;
    pub const RIGHT_BRACKET: u32 = 48;
    pub const BACKSLASH: u32 = 49;
    pub const NON_US_HASH: u32 = 50;
    pub const SEMICOLON: u32 = 51;
    pub const APOSTROPHE: u32 = 52;
    pub const GRAVE: u32 = 53;
    pub const COMMA: u32 = 54;
    pub const PERIOD: u32 = 55;
    pub const SLASH: u32 = 56;

    pub const F1: u32 = 58;
    pub const F2: u32 = 59;
    pub const F3: u32 = 60;
    pub const F4: u32 = 61;
    pub const F5: u32 = 62;
    pub const F6: u32 = 63;
    pub const F7: u32 = 64;
    pub const F8: u32 = 65;
    pub const F9: u32 = 66;
    pub const F10: u32 = 67;
    pub const F11: u32 = 68;
    pub const F12: u32 = 69;

    pub const INSERT: u32 = 73;
    pub const HOME: u32 = 74;
    pub const PAGE_UP: u32 = 75;
    pub const DELETE: u32 = 76;
    pub const END: u32 = 77;
    pub const PAGE_DOWN: u32 = 78;
    pub const RIGHT: u32 = 79;
    pub const LEFT: u32 = 80;
    pub const DOWN: u32 = 81;
    pub const UP: u32 = 82;

    pub const KP_DIVIDE: u32 = 84;
    pub const KP_MULTIPLY: u32 = 85;
    pub const KP_MINUS: u32 = 86;
    pub const KP_PLUS: u32 = 87;
    pub const KP_ENTER: u32 = 88;
    pub const KP_1: u32 = 89;
    pub const KP_2: u32 = 90;
    pub const KP_3: u32 = 91;
    pub const KP_4: u32 = 92;
    pub const KP_5: u32 = 93;
    pub const KP_6: u32 = 94;
    pub const KP_7: u32 = 95;
    pub const KP_8: u32 = 96;
    pub const KP_9: u32 = 97;
    pub const KP_0: u32 = 98;
    pub const KP_PERIOD: u32 = 99;
    pub const NON_US_BACKSLASH: u32 = 100;
    pub const APPLICATION: u32 = 101;

    // Modifiers, for chord bindings only; these never reach the table.
    pub const LEFT_CTRL: u32 = 224;
    pub const LEFT_SHIFT: u32 = 225;
    pub const LEFT_ALT: u32 = 226;
    pub const LEFT_GUI: u32 = 227;
    pub const RIGHT_CTRL: u32 = 228;
    pub const RIGHT_SHIFT: u32 = 229;
    pub const RIGHT_ALT: u32 = 230;
    pub const RIGHT_GUI: u32 = 231;
}

const TABLE_LEN: usize = 128;

const fn build_table() -> [Option<KeyInfo>; TABLE_LEN] {
    use scancodes as sc;

    let mut t: [Option<KeyInfo>; TABLE_LEN] = [None; TABLE_LEN];

    t[sc::A as usize] = Some(KeyInfo::normal(0x1C));
    t[sc::B as usize] = Some(KeyInfo::normal(0x32));
    t[sc::C as usize] = Some(KeyInfo::normal(0x21));
    t[sc::D as usize] = Some(KeyInfo::normal(0x23));
    t[sc::E as usize] = Some(KeyInfo::normal(0x24));
    t[sc::F as usize] = Some(KeyInfo::normal(0x2B));
    t[sc::G as usize] = Some(KeyInfo::normal(0x34));
    t[sc::H as usize] = Some(KeyInfo::normal(0x33));
    t[sc::I as usize] = Some(KeyInfo::normal(0x43));
    t[sc::J as usize] = Some(KeyInfo::normal(0x3B));
    t[sc::K as usize] = Some(KeyInfo::normal(0x42));
    t[sc::L as usize] = Some(KeyInfo::normal(0x4B));
    t[sc::M as usize] = Some(KeyInfo::normal(0x3A));
    t[sc::N as usize] = Some(KeyInfo::normal(0x31));
    t[sc::O as usize] = Some(KeyInfo::normal(0x44));
    t[sc::P as usize] = Some(KeyInfo::normal(0x4D));
    t[sc::Q as usize] = Some(KeyInfo::normal(0x15));
    t[sc::R as usize] = Some(KeyInfo::normal(0x2D));
    t[sc::S as usize] = Some(KeyInfo::normal(0x1B));
    t[sc::T as usize] = Some(KeyInfo::normal(0x2C));
    t[sc::U as usize] = Some(KeyInfo::normal(0x3C));
    t[sc::V as usize] = Some(KeyInfo::normal(0x2A));
    t[sc::W as usize] = Some(KeyInfo::normal(0x1D));
    t[sc::X as usize] = Some(KeyInfo::normal(0x22));
    t[sc::Y as usize] = Some(KeyInfo::normal(0x35));
    t[sc::Z as usize] = Some(KeyInfo::normal(0x1A));

    t[sc::DIGIT_1 as usize] = Some(KeyInfo::normal(0x16));
    t[sc::DIGIT_2 as usize] = Some(KeyInfo::normal(0x1E));
    t[sc::DIGIT_3 as usize] = Some(KeyInfo::normal(0x26));
    t[sc::DIGIT_4 as usize] = Some(KeyInfo::normal(0x25));
    t[sc::DIGIT_5 as usize] = Some(KeyInfo::normal(0x2E));
    t[sc::DIGIT_6 as usize] = Some(KeyInfo::normal(0x36));
    t[sc::DIGIT_7 as usize] = Some(KeyInfo::normal(0x3D));
    t[sc::DIGIT_8 as usize] = Some(KeyInfo::normal(0x3E));
    t[sc::DIGIT_9 as usize] = Some(KeyInfo::normal(0x46));
    t[sc::DIGIT_0 as usize] = Some(KeyInfo::normal(0x45));

    t[sc::RETURN as usize] = Some(KeyInfo::normal(0x5A));
    t[sc::ESCAPE as usize] = Some(KeyInfo::normal(0x76));
    t[sc::BACKSPACE as usize] = Some(KeyInfo::normal(0x66));
    t[sc::TAB as usize] = Some(KeyInfo::normal(0x0D));
    t[sc::SPACE as usize] = Some(KeyInfo::normal(0x29));

    t[sc::MINUS as usize] = Some(KeyInfo::normal(0x4E));
    t[sc::EQUALS as usize] = Some(KeyInfo::normal(0x55));
    t[sc::LEFT_BRACKET as usize] = Some(KeyInfo::normal(0x54));
    t[sc::RIGHT_BRACKET as usize] = Some(KeyInfo::normal(0x5B));
    t[sc::BACKSLASH as usize] = Some(KeyInfo::normal(0x5D));
    // Same physical key as BACKSLASH on ISO boards.
    t[sc::NON_US_HASH as usize] = Some(KeyInfo::normal(0x5D));
    t[sc::SEMICOLON as usize] = Some(KeyInfo::normal(0x4C));
    t[sc::APOSTROPHE as usize] = Some(KeyInfo::normal(0x52));
    t[sc::GRAVE as usize] = Some(KeyInfo::normal(0x0E));
    t[sc::COMMA as usize] = Some(KeyInfo::normal(0x41));
    t[sc::PERIOD as usize] = Some(KeyInfo::normal(0x49));
    t[sc::SLASH as usize] = Some(KeyInfo::normal(0x4A));

    t[sc::F1 as usize] = Some(KeyInfo::normal(0x05));
    t[sc::F2 as usize] = Some(KeyInfo::normal(0x06));
    t[sc::F3 as usize] = Some(KeyInfo::normal(0x04));
    t[sc::F4 as usize] = Some(KeyInfo::normal(0x0C));
    t[sc::F5 as usize] = Some(KeyInfo::normal(0x03));
    t[sc::F6 as usize] = Some(KeyInfo::normal(0x0B));
    t[sc::F7 as usize] = Some(KeyInfo::normal(0x83));
    t[sc::F8 as usize] = Some(KeyInfo::normal(0x0A));
    t[sc::F9 as usize] = Some(KeyInfo::normal(0x01));
    t[sc::F10 as usize] = Some(KeyInfo::normal(0x09));
    t[sc::F11 as usize] = Some(KeyInfo::normal(0x78));
    t[sc::F12 as usize] = Some(KeyInfo::normal(0x07));

    // Navigation cluster: the guest decodes these as editing keys only with
    // a shift bracket, since its Num Lock is permanently engaged.
    t[sc::INSERT as usize] = Some(KeyInfo::numlock_hack(0x70));
    t[sc::HOME as usize] = Some(KeyInfo::numlock_hack(0x6C));
    t[sc::PAGE_UP as usize] = Some(KeyInfo::numlock_hack(0x7D));
    t[sc::DELETE as usize] = Some(KeyInfo::numlock_hack(0x71));
    t[sc::END as usize] = Some(KeyInfo::numlock_hack(0x69));
    t[sc::PAGE_DOWN as usize] = Some(KeyInfo::numlock_hack(0x7A));
    t[sc::RIGHT as usize] = Some(KeyInfo::numlock_hack(0x74));
    t[sc::LEFT as usize] = Some(KeyInfo::numlock_hack(0x6B));
    t[sc::DOWN as usize] = Some(KeyInfo::numlock_hack(0x72));
    t[sc::UP as usize] = Some(KeyInfo::numlock_hack(0x75));

    t[sc::KP_DIVIDE as usize] = Some(KeyInfo::shift_hack(0x4A));
    t[sc::KP_MULTIPLY as usize] = Some(KeyInfo::normal(0x7C));
    t[sc::KP_MINUS as usize] = Some(KeyInfo::normal(0x7B));
    t[sc::KP_PLUS as usize] = Some(KeyInfo::normal(0x79));
    t[sc::KP_ENTER as usize] = Some(KeyInfo::extended(0x5A));
    t[sc::KP_1 as usize] = Some(KeyInfo::normal(0x69));
    t[sc::KP_2 as usize] = Some(KeyInfo::normal(0x72));
    t[sc::KP_3 as usize] = Some(KeyInfo::normal(0x7A));
    t[sc::KP_4 as usize] = Some(KeyInfo::normal(0x6B));
    t[sc::KP_5 as usize] = Some(KeyInfo::normal(0x73));
    t[sc::KP_6 as usize] = Some(KeyInfo::normal(0x74));
    t[sc::KP_7 as usize] = Some(KeyInfo::normal(0x6C));
    t[sc::KP_8 as usize] = Some(KeyInfo::normal(0x75));
    t[sc::KP_9 as usize] = Some(KeyInfo::normal(0x7D));
    t[sc::KP_0 as usize] = Some(KeyInfo::normal(0x70));
    t[sc::KP_PERIOD as usize] = Some(KeyInfo::normal(0x71));
    t[sc::NON_US_BACKSLASH as usize] = Some(KeyInfo::normal(0x61));
    t[sc::APPLICATION as usize] = Some(KeyInfo::extended(0x2F));

    t
}

static HOST_TABLE: [Option<KeyInfo>; TABLE_LEN] = build_table();

/// Scancode-indexed keymap for host window-system key events.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostKeymap;

impl Keymap for HostKeymap {
    fn lookup(&self, key: u32) -> Option<KeyInfo> {
        HOST_TABLE.get(key as usize).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_make_and_break() {
        let map = HostKeymap;
        assert_eq!(map.encode(scancodes::A, true).as_bytes(), [0x1C]);
        assert_eq!(map.encode(scancodes::A, false).as_bytes(), [0xF0, 0x1C]);
    }

    #[test]
    fn arrow_keys_use_the_numlock_bracket() {
        let map = HostKeymap;
        assert_eq!(
            map.encode(scancodes::UP, true).as_bytes(),
            [0xE0, 0x12, 0xE0, 0x75]
        );
        assert_eq!(
            map.encode(scancodes::LEFT, false).as_bytes(),
            [0xE0, 0xF0, 0x6B, 0xE0, 0xF0, 0x12]
        );
    }

    #[test]
    fn keypad_divide_uses_the_shift_bracket() {
        let map = HostKeymap;
        assert_eq!(
            map.encode(scancodes::KP_DIVIDE, true).as_bytes(),
            [0xE0, 0xF0, 0x12, 0xE0, 0x4A]
        );
    }

    #[test]
    fn keypad_enter_is_extended() {
        let map = HostKeymap;
        assert_eq!(map.encode(scancodes::KP_ENTER, true).as_bytes(), [0xE0, 0x5A]);
    }

    #[test]
    fn modifiers_are_out_of_range_and_silent() {
        let map = HostKeymap;
        for sc in [
            scancodes::LEFT_CTRL,
            scancodes::LEFT_SHIFT,
            scancodes::LEFT_ALT,
            scancodes::RIGHT_GUI,
        ] {
            assert!(map.encode(sc, true).is_empty());
            assert!(map.encode(sc, false).is_empty());
        }
    }

    #[test]
    fn unknown_scancodes_are_silent() {
        let map = HostKeymap;
        assert!(map.encode(57, true).is_empty()); // caps lock, unmapped
        assert!(map.encode(512, true).is_empty());
        assert!(map.encode(u32::MAX, false).is_empty());
    }
}
