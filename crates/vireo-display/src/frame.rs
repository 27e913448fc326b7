use thiserror::Error;

/// Largest framebuffer the conversion scratch is sized for.
pub const MAX_WIDTH: u32 = 2048;
pub const MAX_HEIGHT: u32 = 2048;

/// Default monochrome colors (soft black-on-paper pair).
pub const MONO_BLACK: u32 = 0x657B83;
pub const MONO_WHITE: u32 = 0xFDF6E3;

/// How pixels are packed into source words. Fixed for an entire run.
#[derive(Debug, Clone, Copy)]
pub enum PixelLayout<'a> {
    /// One bit per pixel, LSB first, 32 pixels per word.
    Monochrome { black: u32, white: u32 },
    /// One 4-bit palette index per pixel, LSB first, 8 pixels per word.
    Palette(&'a [u32; 16]),
}

impl PixelLayout<'_> {
    pub const fn pixels_per_word(&self) -> u32 {
        match self {
            PixelLayout::Monochrome { .. } => 32,
            PixelLayout::Palette(_) => 8,
        }
    }
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame width {width} is not a multiple of {pixels_per_word} pixels per word")]
    UnalignedWidth { width: u32, pixels_per_word: u32 },
    #[error("frame size {width}x{height} outside supported range (32x32..={MAX_WIDTH}x{MAX_HEIGHT})")]
    SizeOutOfRange { width: u32, height: u32 },
    #[error("word buffer holds {actual} words, geometry needs {expected}")]
    BufferTooShort { expected: usize, actual: usize },
}

/// Borrowed view of the core's packed framebuffer for one conversion.
///
/// Rows are bottom-up: word index 0 is the leftmost word of the bottom
/// scan line.
#[derive(Debug, Clone, Copy)]
pub struct SourceFrame<'a> {
    words: &'a [u32],
    width: u32,
    height: u32,
    layout: PixelLayout<'a>,
}

impl<'a> SourceFrame<'a> {
    pub fn new(
        words: &'a [u32],
        width: u32,
        height: u32,
        layout: PixelLayout<'a>,
    ) -> Result<Self, FrameError> {
        let ppw = layout.pixels_per_word();
        if !(32..=MAX_WIDTH).contains(&width) || !(32..=MAX_HEIGHT).contains(&height) {
            return Err(FrameError::SizeOutOfRange { width, height });
        }
        if width % ppw != 0 {
            return Err(FrameError::UnalignedWidth {
                width,
                pixels_per_word: ppw,
            });
        }
        let expected = (width / ppw) as usize * height as usize;
        if words.len() < expected {
            return Err(FrameError::BufferTooShort {
                expected,
                actual: words.len(),
            });
        }
        Ok(Self {
            words,
            width,
            height,
            layout,
        })
    }

    pub fn words(&self) -> &'a [u32] {
        self.words
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> PixelLayout<'a> {
        self.layout
    }

    pub fn words_per_line(&self) -> u32 {
        self.width / self.layout.pixels_per_word()
    }
}
