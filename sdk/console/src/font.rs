//! # Bitmap Fonts
//!
//! A [`Font`] is a run of 8×8 one-bit glyphs covering consecutive character
//! codes. Each glyph is 8 bytes, one per row, top to bottom; the least
//! significant bit of a row is its leftmost pixel.
//!
//! Glyphs are uploaded as 2bpp tiles: lit pixels use color 1 of the active
//! palette and unlit pixels color 2, so a glyph cell always paints both the
//! foreground and the background color.

use bit_field::BitField;

use crate::scr::BgLayer;

/// Palette index of a lit glyph pixel.
pub const GLYPH_FG: u8 = 1;
/// Palette index of an unlit glyph pixel.
pub const GLYPH_BG: u8 = 2;

/// Words per 2bpp 8×8 tile.
pub const TILE_WORDS: u16 = 8;

pub struct Font {
    pub name: &'static str,
    /// Character code of the first glyph.
    pub first: u8,
    pub glyphs: &'static [[u8; 8]],
}

impl Font {
    #[inline(always)]
    pub fn glyph_count(&self) -> u16 {
        self.glyphs.len() as u16
    }

    /// Glyph index for `ch`, or `None` when the font has no glyph for it.
    pub fn glyph_index(&self, ch: char) -> Option<u16> {
        let code = ch as u32;
        let first = self.first as u32;
        if code >= first && code < first + self.glyphs.len() as u32 {
            Some((code - first) as u16)
        } else {
            None
        }
    }

    /// Glyph drawn in place of characters the font lacks: `?` if present,
    /// otherwise the first glyph.
    pub fn fallback_index(&self) -> u16 {
        self.glyph_index('?').unwrap_or(0)
    }

    pub fn glyph(&self, index: u16) -> &[u8; 8] {
        &self.glyphs[index as usize]
    }

    /// Character code of glyph `index`.
    pub fn char_at(&self, index: u16) -> Option<char> {
        if index < self.glyph_count() {
            char::from_u32(self.first as u32 + index as u32)
        } else {
            None
        }
    }
}

impl core::fmt::Debug for Font {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.name)
            .field("first", &self.first)
            .field("glyphs", &self.glyphs.len())
            .finish()
    }
}

/// Glyph height class.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GlyphHeight {
    /// 8 pixels: one tile per glyph, one map row per text line.
    Short,
    /// 16 pixels: each bitmap row is doubled and the glyph spans two
    /// vertically stacked tiles (two map rows).
    #[default]
    Tall,
}

impl GlyphHeight {
    pub fn from_pixels(pixels: u8) -> Option<Self> {
        match pixels {
            8 => Some(GlyphHeight::Short),
            16 => Some(GlyphHeight::Tall),
            _ => None,
        }
    }

    pub const fn pixels(self) -> u8 {
        match self {
            GlyphHeight::Short => 8,
            GlyphHeight::Tall => 16,
        }
    }

    /// Tiles (and map rows) one glyph occupies.
    pub const fn tiles_per_glyph(self) -> u16 {
        match self {
            GlyphHeight::Short => 1,
            GlyphHeight::Tall => 2,
        }
    }

    /// Bitmap rows of tile `part` (0 = top) of `glyph`.
    pub fn tile_rows(self, glyph: &[u8; 8], part: u16) -> [u8; 8] {
        match self {
            GlyphHeight::Short => *glyph,
            GlyphHeight::Tall => core::array::from_fn(|y| glyph[part as usize * 4 + y / 2]),
        }
    }
}

/// A font attached to a background layer.
#[derive(Copy, Clone, Debug)]
pub struct FontBinding {
    pub font: &'static Font,
    /// Added to every draw row.
    pub row_offset: u8,
    pub glyph_height: GlyphHeight,
    pub layer: BgLayer,
}

impl FontBinding {
    pub const fn new(row_offset: u8, glyph_height: GlyphHeight, font: &'static Font) -> Self {
        Self {
            font,
            row_offset,
            glyph_height,
            layer: BgLayer::Bg1,
        }
    }

    pub const fn on_layer(mut self, layer: BgLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Tiles needed for the whole font.
    pub fn glyph_tiles(&self) -> u16 {
        self.font.glyph_count() * self.glyph_height.tiles_per_glyph()
    }
}

/// Encode one row-bitmap tile as 2bpp planar words: low byte is bitplane 0,
/// high byte bitplane 1, bit 7 the leftmost pixel.
pub fn encode_tile(rows: [u8; 8], fg: u8, bg: u8) -> [u16; 8] {
    let mut words = [0u16; 8];
    for (word, row) in words.iter_mut().zip(rows) {
        let lit = row.reverse_bits();
        let mut planes = [0u8; 2];
        for (plane, bits) in planes.iter_mut().enumerate() {
            if fg.get_bit(plane) {
                *bits |= lit;
            }
            if bg.get_bit(plane) {
                *bits |= !lit;
            }
        }
        *word = u16::from_le_bytes(planes);
    }
    words
}

/// Palette index of pixel `x` (0 = leftmost) in a 2bpp tile row word.
#[inline(always)]
pub fn decode_pixel(word: u16, x: usize) -> u8 {
    let [plane0, plane1] = word.to_le_bytes();
    let bit = 7 - x;
    (plane0.get_bit(bit) as u8) | ((plane1.get_bit(bit) as u8) << 1)
}

/// Printable ASCII, `0x20..=0x7F`.
pub static SNES_FONT: Font = Font {
    name: "snesfont",
    first: 0x20,
    glyphs: &FONT_8X8,
};

#[rustfmt::skip]
static FONT_8X8: [[u8; 8]; 96] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x18, 0x3C, 0x3C, 0x18, 0x18, 0x00, 0x18, 0x00], // !
    [0x36, 0x36, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // "
    [0x36, 0x36, 0x7F, 0x36, 0x7F, 0x36, 0x36, 0x00], // #
    [0x0C, 0x3E, 0x03, 0x1E, 0x30, 0x1F, 0x0C, 0x00], // $
    [0x00, 0x63, 0x33, 0x18, 0x0C, 0x66, 0x63, 0x00], // %
    [0x1C, 0x36, 0x1C, 0x6E, 0x3B, 0x33, 0x6E, 0x00], // &
    [0x06, 0x06, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00], // '
    [0x18, 0x0C, 0x06, 0x06, 0x06, 0x0C, 0x18, 0x00], // (
    [0x06, 0x0C, 0x18, 0x18, 0x18, 0x0C, 0x06, 0x00], // )
    [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // *
    [0x00, 0x0C, 0x0C, 0x3F, 0x0C, 0x0C, 0x00, 0x00], // +
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x06], // ,
    [0x00, 0x00, 0x00, 0x3F, 0x00, 0x00, 0x00, 0x00], // -
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x00], // .
    [0x60, 0x30, 0x18, 0x0C, 0x06, 0x03, 0x01, 0x00], // /
    [0x3E, 0x63, 0x73, 0x7B, 0x6F, 0x67, 0x3E, 0x00], // 0
    [0x0C, 0x0E, 0x0C, 0x0C, 0x0C, 0x0C, 0x3F, 0x00], // 1
    [0x1E, 0x33, 0x30, 0x1C, 0x06, 0x33, 0x3F, 0x00], // 2
    [0x1E, 0x33, 0x30, 0x1C, 0x30, 0x33, 0x1E, 0x00], // 3
    [0x38, 0x3C, 0x36, 0x33, 0x7F, 0x30, 0x78, 0x00], // 4
    [0x3F, 0x03, 0x1F, 0x30, 0x30, 0x33, 0x1E, 0x00], // 5
    [0x1C, 0x06, 0x03, 0x1F, 0x33, 0x33, 0x1E, 0x00], // 6
    [0x3F, 0x33, 0x30, 0x18, 0x0C, 0x0C, 0x0C, 0x00], // 7
    [0x1E, 0x33, 0x33, 0x1E, 0x33, 0x33, 0x1E, 0x00], // 8
    [0x1E, 0x33, 0x33, 0x3E, 0x30, 0x18, 0x0E, 0x00], // 9
    [0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x00], // :
    [0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x06], // ;
    [0x18, 0x0C, 0x06, 0x03, 0x06, 0x0C, 0x18, 0x00], // <
    [0x00, 0x00, 0x3F, 0x00, 0x00, 0x3F, 0x00, 0x00], // =
    [0x06, 0x0C, 0x18, 0x30, 0x18, 0x0C, 0x06, 0x00], // >
    [0x1E, 0x33, 0x30, 0x18, 0x0C, 0x00, 0x0C, 0x00], // ?
    [0x3E, 0x63, 0x7B, 0x7B, 0x7B, 0x03, 0x1E, 0x00], // @
    [0x0C, 0x1E, 0x33, 0x33, 0x3F, 0x33, 0x33, 0x00], // A
    [0x3F, 0x66, 0x66, 0x3E, 0x66, 0x66, 0x3F, 0x00], // B
    [0x3C, 0x66, 0x03, 0x03, 0x03, 0x66, 0x3C, 0x00], // C
    [0x1F, 0x36, 0x66, 0x66, 0x66, 0x36, 0x1F, 0x00], // D
    [0x7F, 0x46, 0x16, 0x1E, 0x16, 0x46, 0x7F, 0x00], // E
    [0x7F, 0x46, 0x16, 0x1E, 0x16, 0x06, 0x0F, 0x00], // F
    [0x3C, 0x66, 0x03, 0x03, 0x73, 0x66, 0x7C, 0x00], // G
    [0x33, 0x33, 0x33, 0x3F, 0x33, 0x33, 0x33, 0x00], // H
    [0x1E, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // I
    [0x78, 0x30, 0x30, 0x30, 0x33, 0x33, 0x1E, 0x00], // J
    [0x67, 0x66, 0x36, 0x1E, 0x36, 0x66, 0x67, 0x00], // K
    [0x0F, 0x06, 0x06, 0x06, 0x46, 0x66, 0x7F, 0x00], // L
    [0x63, 0x77, 0x7F, 0x7F, 0x6B, 0x63, 0x63, 0x00], // M
    [0x63, 0x67, 0x6F, 0x7B, 0x73, 0x63, 0x63, 0x00], // N
    [0x1C, 0x36, 0x63, 0x63, 0x63, 0x36, 0x1C, 0x00], // O
    [0x3F, 0x66, 0x66, 0x3E, 0x06, 0x06, 0x0F, 0x00], // P
    [0x1E, 0x33, 0x33, 0x33, 0x3B, 0x1E, 0x38, 0x00], // Q
    [0x3F, 0x66, 0x66, 0x3E, 0x36, 0x66, 0x67, 0x00], // R
    [0x1E, 0x33, 0x07, 0x0E, 0x38, 0x33, 0x1E, 0x00], // S
    [0x3F, 0x2D, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // T
    [0x33, 0x33, 0x33, 0x33, 0x33, 0x33, 0x3F, 0x00], // U
    [0x33, 0x33, 0x33, 0x33, 0x33, 0x1E, 0x0C, 0x00], // V
    [0x63, 0x63, 0x63, 0x6B, 0x7F, 0x77, 0x63, 0x00], // W
    [0x63, 0x63, 0x36, 0x1C, 0x1C, 0x36, 0x63, 0x00], // X
    [0x33, 0x33, 0x33, 0x1E, 0x0C, 0x0C, 0x1E, 0x00], // Y
    [0x7F, 0x63, 0x31, 0x18, 0x4C, 0x66, 0x7F, 0x00], // Z
    [0x1E, 0x06, 0x06, 0x06, 0x06, 0x06, 0x1E, 0x00], // [
    [0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x40, 0x00], // \
    [0x1E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x1E, 0x00], // ]
    [0x08, 0x1C, 0x36, 0x63, 0x00, 0x00, 0x00, 0x00], // ^
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF], // _
    [0x0C, 0x0C, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00], // `
    [0x00, 0x00, 0x1E, 0x30, 0x3E, 0x33, 0x6E, 0x00], // a
    [0x07, 0x06, 0x06, 0x3E, 0x66, 0x66, 0x3B, 0x00], // b
    [0x00, 0x00, 0x1E, 0x33, 0x03, 0x33, 0x1E, 0x00], // c
    [0x38, 0x30, 0x30, 0x3E, 0x33, 0x33, 0x6E, 0x00], // d
    [0x00, 0x00, 0x1E, 0x33, 0x3F, 0x03, 0x1E, 0x00], // e
    [0x1C, 0x36, 0x06, 0x0F, 0x06, 0x06, 0x0F, 0x00], // f
    [0x00, 0x00, 0x6E, 0x33, 0x33, 0x3E, 0x30, 0x1F], // g
    [0x07, 0x06, 0x36, 0x6E, 0x66, 0x66, 0x67, 0x00], // h
    [0x0C, 0x00, 0x0E, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // i
    [0x30, 0x00, 0x30, 0x30, 0x30, 0x33, 0x33, 0x1E], // j
    [0x07, 0x06, 0x66, 0x36, 0x1E, 0x36, 0x67, 0x00], // k
    [0x0E, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // l
    [0x00, 0x00, 0x33, 0x7F, 0x7F, 0x6B, 0x63, 0x00], // m
    [0x00, 0x00, 0x1F, 0x33, 0x33, 0x33, 0x33, 0x00], // n
    [0x00, 0x00, 0x1E, 0x33, 0x33, 0x33, 0x1E, 0x00], // o
    [0x00, 0x00, 0x3B, 0x66, 0x66, 0x3E, 0x06, 0x0F], // p
    [0x00, 0x00, 0x6E, 0x33, 0x33, 0x3E, 0x30, 0x78], // q
    [0x00, 0x00, 0x3B, 0x6E, 0x66, 0x06, 0x0F, 0x00], // r
    [0x00, 0x00, 0x3E, 0x03, 0x1E, 0x30, 0x1F, 0x00], // s
    [0x08, 0x0C, 0x3E, 0x0C, 0x0C, 0x2C, 0x18, 0x00], // t
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x33, 0x6E, 0x00], // u
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x1E, 0x0C, 0x00], // v
    [0x00, 0x00, 0x63, 0x6B, 0x7F, 0x7F, 0x36, 0x00], // w
    [0x00, 0x00, 0x63, 0x36, 0x1C, 0x36, 0x63, 0x00], // x
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x3E, 0x30, 0x1F], // y
    [0x00, 0x00, 0x3F, 0x19, 0x0C, 0x26, 0x3F, 0x00], // z
    [0x38, 0x0C, 0x0C, 0x07, 0x0C, 0x0C, 0x38, 0x00], // {
    [0x18, 0x18, 0x18, 0x00, 0x18, 0x18, 0x18, 0x00], // |
    [0x07, 0x0C, 0x0C, 0x38, 0x0C, 0x0C, 0x07, 0x00], // }
    [0x6E, 0x3B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ~
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // DEL
];
