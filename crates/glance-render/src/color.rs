use std::ops::Range;

/// Straight (non premultiplied) color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: f32::from(a) / 255.0,
        }
    }

    /// Scale to bytes, replacing the alpha channel.
    ///
    /// `alpha > 1.0` keeps the color's own opacity; anything else is clamped
    /// at zero and used as is.
    pub fn to_bytes_with_alpha(self, alpha: f32) -> [u8; 4] {
        let alpha = if alpha > 1.0 { self.a } else { alpha.max(0.0) };
        [
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b),
            channel_to_byte(alpha),
        ]
    }
}

fn channel_to_byte(value: f32) -> u8 {
    (value * 255.0).clamp(0.0, 255.0) as u8
}

/// A run of document text sharing one foreground color.
///
/// Spans arrive in increasing offset order, never overlap and together cover
/// the whole document. `range` holds byte offsets and may cross line breaks.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpan {
    pub range: Range<usize>,
    pub color: Rgba,
}

impl TokenSpan {
    pub fn new(range: Range<usize>, color: Rgba) -> Self {
        Self { range, color }
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }
}
