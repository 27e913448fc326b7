use crate::frame::{PixelLayout, SourceFrame};
use crate::rect::{DamageRect, PixelRect};

/// Destination write strategy for one damage conversion.
///
/// `begin` announces the destination-space rectangle the following
/// `set_pixel` calls stay inside; `commit` is called exactly once afterwards
/// with the same rectangle. A conversion with empty damage calls nothing.
pub trait RectSink {
    fn begin(&mut self, rect: PixelRect);
    fn set_pixel(&mut self, x: u32, y: u32, color: u32);
    fn commit(&mut self, rect: PixelRect);
}

/// Expands the damaged part of `frame` into `sink`.
///
/// Source lines are walked from `damage.y2` down to `damage.y1` so the
/// bottom-up buffer lands top-down in the destination; the damage is
/// word-granular, so partial words always unpack to their full pixel width.
/// Damage coordinates are trusted to lie within the frame (the core derives
/// them from its own writes).
pub fn convert(frame: &SourceFrame<'_>, damage: DamageRect, sink: &mut impl RectSink) {
    if damage.is_empty() {
        return;
    }

    let ppw = frame.layout().pixels_per_word();
    let height = frame.height();
    let rect = PixelRect {
        x: damage.x1 * ppw,
        y: height - damage.y2 - 1,
        w: (damage.x2 - damage.x1 + 1) * ppw,
        h: damage.y2 - damage.y1 + 1,
    };
    sink.begin(rect);

    let words = frame.words();
    let words_per_line = frame.words_per_line();
    for line in (damage.y1..=damage.y2).rev() {
        let dst_y = height - line - 1;
        let line_start = line * words_per_line;
        for col in damage.x1..=damage.x2 {
            let mut pixels = words[(line_start + col) as usize];
            let dst_x = col * ppw;
            match frame.layout() {
                PixelLayout::Monochrome { black, white } => {
                    for bit in 0..32 {
                        let color = if pixels & 1 != 0 { white } else { black };
                        sink.set_pixel(dst_x + bit, dst_y, color);
                        pixels >>= 1;
                    }
                }
                PixelLayout::Palette(palette) => {
                    for nibble in 0..8 {
                        sink.set_pixel(dst_x + nibble, dst_y, palette[(pixels & 0xF) as usize]);
                        pixels >>= 4;
                    }
                }
            }
        }
    }

    sink.commit(rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{MONO_BLACK, MONO_WHITE};

    /// Records every call for order and placement assertions.
    #[derive(Default)]
    struct RecordingSink {
        begun: Option<PixelRect>,
        committed: Option<PixelRect>,
        writes: Vec<(u32, u32, u32)>,
    }

    impl RectSink for RecordingSink {
        fn begin(&mut self, rect: PixelRect) {
            self.begun = Some(rect);
        }

        fn set_pixel(&mut self, x: u32, y: u32, color: u32) {
            self.writes.push((x, y, color));
        }

        fn commit(&mut self, rect: PixelRect) {
            self.committed = Some(rect);
        }
    }

    fn mono_layout() -> PixelLayout<'static> {
        PixelLayout::Monochrome {
            black: MONO_BLACK,
            white: MONO_WHITE,
        }
    }

    #[test]
    fn empty_damage_touches_nothing() {
        let words = vec![0u32; 2 * 32];
        let frame = SourceFrame::new(&words, 64, 32, mono_layout()).unwrap();
        let mut sink = RecordingSink::default();
        convert(&frame, DamageRect::EMPTY, &mut sink);
        assert!(sink.begun.is_none());
        assert!(sink.committed.is_none());
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn mono_words_expand_to_the_fixed_colors() {
        let mut words = vec![0u32; 2 * 32];
        words[0] = 0xFFFF_FFFF; // bottom line, left word
        let frame = SourceFrame::new(&words, 64, 32, mono_layout()).unwrap();
        let mut sink = RecordingSink::default();
        convert(&frame, DamageRect::full(2, 32), &mut sink);

        assert_eq!(sink.writes.len(), 64 * 32);
        // Source line 0 is the bottom; it must land on destination row 31.
        let bottom: Vec<_> = sink.writes.iter().filter(|w| w.1 == 31).collect();
        assert_eq!(bottom.len(), 64);
        for &&(x, _, color) in &bottom {
            if x < 32 {
                assert_eq!(color, MONO_WHITE);
            } else {
                assert_eq!(color, MONO_BLACK);
            }
        }
    }

    #[test]
    fn mono_bits_unpack_lsb_first() {
        let mut words = vec![0u32; 32];
        let line = 3;
        words[line] = 0b101; // pixels 0 and 2 of that line
        let frame = SourceFrame::new(&words, 32, 32, mono_layout()).unwrap();
        let mut sink = RecordingSink::default();
        convert(
            &frame,
            DamageRect {
                x1: 0,
                y1: line as u32,
                x2: 0,
                y2: line as u32,
            },
            &mut sink,
        );
        let dst_y = 32 - line as u32 - 1;
        let white: Vec<_> = sink
            .writes
            .iter()
            .filter(|&&(_, _, c)| c == MONO_WHITE)
            .collect();
        assert_eq!(white.as_slice(), [&(0, dst_y, MONO_WHITE), &(2, dst_y, MONO_WHITE)]);
    }

    #[test]
    fn palette_nibbles_index_the_palette() {
        let mut palette = [0u32; 16];
        for (i, slot) in palette.iter_mut().enumerate() {
            *slot = 0x10_0000 + i as u32;
        }
        let mut words = vec![0u32; 4 * 32];
        words[0] = 0x7654_3210; // bottom line: pixels 0..8 hold indices 0..8
        let frame = SourceFrame::new(&words, 32, 32, PixelLayout::Palette(&palette)).unwrap();
        let mut sink = RecordingSink::default();
        convert(
            &frame,
            DamageRect {
                x1: 0,
                y1: 0,
                x2: 0,
                y2: 0,
            },
            &mut sink,
        );
        assert_eq!(sink.writes.len(), 8);
        for (i, &(x, y, color)) in sink.writes.iter().enumerate() {
            assert_eq!(x, i as u32);
            assert_eq!(y, 31);
            assert_eq!(color, palette[i]);
        }
    }

    #[test]
    fn damage_rect_maps_to_word_granular_pixel_extent() {
        let words = vec![0u32; 2 * 32];
        let frame = SourceFrame::new(&words, 64, 32, mono_layout()).unwrap();
        let mut sink = RecordingSink::default();
        // One word column, lines 4..=7 of the bottom-up source.
        convert(
            &frame,
            DamageRect {
                x1: 1,
                y1: 4,
                x2: 1,
                y2: 7,
            },
            &mut sink,
        );
        let rect = sink.committed.expect("commit must follow writes");
        assert_eq!(rect, PixelRect {
            x: 32,
            y: 32 - 7 - 1,
            w: 32,
            h: 4,
        });
        assert_eq!(sink.begun, Some(rect));
        assert_eq!(sink.writes.len(), 32 * 4);
    }
}
