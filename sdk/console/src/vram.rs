//! # Video Memory Layout
//!
//! VRAM is 32K 16-bit words. The text console claims two regions of it:
//!
//! - the **tile map** at `map_base`: 32×32 attribute words, one per screen cell,
//! - the **glyph tiles**: `tiles_per_glyph` 2bpp tiles per font glyph, starting
//!   at tile number `tile_offset` counted from `tile_base`.
//!
//! ```text
//! $0000                                                           $7FFF
//!   |....[tile_base ... [glyphs @ tile_offset * 8]]....[map_base +$400]..|
//! ```
//!
//! All addresses here are word addresses.

use bit_field::BitField;

use crate::error::{Conflict, Error};
use crate::font::TILE_WORDS;

pub const VRAM_WORDS: u32 = 0x8000;

pub const MAP_WIDTH: u16 = 32;
pub const MAP_HEIGHT: u16 = 32;
pub const MAP_WORDS: u16 = MAP_WIDTH * MAP_HEIGHT;

/// `BGnSC` places maps on 1K-word boundaries.
pub const MAP_ALIGN: u16 = 0x0400;
/// `BGnnNBA` places tile data on 4K-word boundaries.
pub const TILE_ALIGN: u16 = 0x1000;

/// Tile numbers in a map entry are 10 bits.
pub const TILE_NUMBERS: u32 = 0x400;

/// A half-open span of VRAM words.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub start: u32,
    pub len: u32,
}

impl Region {
    #[inline(always)]
    pub const fn end(&self) -> u32 {
        self.start + self.len
    }

    pub fn overlaps(&self, other: &Region) -> bool {
        self.len > 0 && other.len > 0 && self.start < other.end() && other.start < self.end()
    }

    pub fn fits_in_vram(&self) -> bool {
        self.end() <= VRAM_WORDS
    }
}

/// Where the text layer lives in VRAM.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VramLayout {
    /// Word address of the 32×32 tile map.
    pub map_base: u16,
    /// Word address of tile 0 (the layer's character base).
    pub tile_base: u16,
    /// Tile number of the first glyph; added to every glyph index.
    pub tile_offset: u16,
}

impl Default for VramLayout {
    fn default() -> Self {
        Self {
            map_base: 0x0800,
            tile_base: 0x3000,
            tile_offset: 0,
        }
    }
}

impl VramLayout {
    pub const fn new(map_base: u16, tile_base: u16, tile_offset: u16) -> Self {
        Self {
            map_base,
            tile_base,
            tile_offset,
        }
    }

    pub fn map_region(&self) -> Region {
        Region {
            start: self.map_base as u32,
            len: MAP_WORDS as u32,
        }
    }

    pub fn glyph_region(&self, glyph_tiles: u16) -> Region {
        Region {
            start: self.tile_base as u32 + self.tile_offset as u32 * TILE_WORDS as u32,
            len: glyph_tiles as u32 * TILE_WORDS as u32,
        }
    }

    /// Tile 0, shown by every cleared map cell.
    pub fn blank_tile_region(&self) -> Region {
        Region {
            start: self.tile_base as u32,
            len: TILE_WORDS as u32,
        }
    }

    /// Check alignment, tile numbering, VRAM bounds and overlap for a font
    /// needing `glyph_tiles` tiles. The map must also stay clear of tile 0.
    pub fn validate(&self, glyph_tiles: u16) -> Result<(), Error> {
        if self.map_base % MAP_ALIGN != 0 {
            return Err(Error::Misaligned {
                what: "tile map base",
                addr: self.map_base,
                align: MAP_ALIGN,
            });
        }
        if self.tile_base % TILE_ALIGN != 0 {
            return Err(Error::Misaligned {
                what: "tile data base",
                addr: self.tile_base,
                align: TILE_ALIGN,
            });
        }

        if self.tile_offset as u32 + glyph_tiles as u32 > TILE_NUMBERS {
            return Err(Error::ConfigurationConflict(Conflict::TileRange {
                first: self.tile_offset,
                count: glyph_tiles,
            }));
        }

        let map = self.map_region();
        let glyphs = self.glyph_region(glyph_tiles);
        for region in [map, glyphs] {
            if !region.fits_in_vram() {
                return Err(Error::ConfigurationConflict(Conflict::OutsideVram(region)));
            }
        }
        if map.overlaps(&glyphs) {
            return Err(Error::ConfigurationConflict(Conflict::Overlap { map, glyphs }));
        }
        let blank = self.blank_tile_region();
        if map.overlaps(&blank) {
            return Err(Error::ConfigurationConflict(Conflict::BlankTile { map, tile: blank }));
        }

        Ok(())
    }

    /// Word address of map cell (`col`, `row`).
    #[inline(always)]
    pub fn map_addr(&self, col: u16, row: u16) -> u16 {
        self.map_base + row * MAP_WIDTH + col
    }

    /// Tile number of tile `part` of glyph `glyph`.
    #[inline(always)]
    pub fn tile_number(&self, glyph: u16, part: u16, tiles_per_glyph: u16) -> u16 {
        self.tile_offset + glyph * tiles_per_glyph + part
    }

    /// Word address of tile number `tile`.
    #[inline(always)]
    pub fn tile_addr(&self, tile: u16) -> u16 {
        self.tile_base.wrapping_add(tile.wrapping_mul(TILE_WORDS))
    }
}

/// A tile map attribute word.
///
/// ```text
/// vhopppcc cccccccc
/// v/h: flip, o: priority, p: palette, c: tile number
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TileMapEntry(pub u16);

impl TileMapEntry {
    pub fn new(tile: u16, palette: u8) -> Self {
        let mut bits = 0u16;
        bits.set_bits(0..10, tile & 0x3FF);
        bits.set_bits(10..13, (palette & 0x7) as u16);
        TileMapEntry(bits)
    }

    #[inline(always)]
    pub fn tile(self) -> u16 {
        self.0.get_bits(0..10)
    }

    #[inline(always)]
    pub fn palette(self) -> u8 {
        self.0.get_bits(10..13) as u8
    }

    #[inline(always)]
    pub fn priority(self) -> bool {
        self.0.get_bit(13)
    }

    #[inline(always)]
    pub fn h_flip(self) -> bool {
        self.0.get_bit(14)
    }

    #[inline(always)]
    pub fn v_flip(self) -> bool {
        self.0.get_bit(15)
    }

    pub fn with_priority(mut self, priority: bool) -> Self {
        self.0.set_bit(13, priority);
        self
    }

    pub fn with_flip(mut self, h: bool, v: bool) -> Self {
        self.0.set_bit(14, h);
        self.0.set_bit(15, v);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: VramLayout = VramLayout::new(0x6800, 0x3000, 0x0100);

    #[test]
    fn test_hello_layout_is_valid() {
        assert_eq!(HELLO.validate(192), Ok(()));
        assert_eq!(HELLO.map_region(), Region { start: 0x6800, len: 0x400 });
        assert_eq!(HELLO.glyph_region(192), Region { start: 0x3800, len: 0x600 });
    }

    #[test]
    fn test_overlap_rejected() {
        // glyphs start at $3000 + $100 * 8 = $3800, map placed right on them
        let layout = VramLayout::new(0x3800, 0x3000, 0x0100);
        assert!(matches!(
            layout.validate(192),
            Err(Error::ConfigurationConflict(Conflict::Overlap { .. }))
        ));
    }

    #[test]
    fn test_adjacent_regions_accepted() {
        // glyph region ends exactly where the map begins
        let layout = VramLayout::new(0x3C00, 0x3000, 0x0100);
        assert_eq!(layout.glyph_region(128).end(), 0x3C00);
        assert_eq!(layout.validate(128), Ok(()));
        assert!(layout.validate(129).is_err());
    }

    #[test]
    fn test_map_over_blank_tile_rejected() {
        // glyphs start at $3800, but the map covers tile 0 at $3000
        let layout = VramLayout::new(0x3000, 0x3000, 0x0100);
        assert_eq!(layout.blank_tile_region(), Region { start: 0x3000, len: 8 });
        assert!(matches!(
            layout.validate(192),
            Err(Error::ConfigurationConflict(Conflict::BlankTile { .. }))
        ));
        // map ending right before tile 0 is fine
        assert_eq!(VramLayout::new(0x2C00, 0x3000, 0x0100).validate(192), Ok(()));
    }

    #[test]
    fn test_alignment() {
        assert!(matches!(
            VramLayout::new(0x6810, 0x3000, 0).validate(96),
            Err(Error::Misaligned { what: "tile map base", .. })
        ));
        assert!(matches!(
            VramLayout::new(0x6800, 0x3800, 0).validate(96),
            Err(Error::Misaligned { what: "tile data base", .. })
        ));
    }

    #[test]
    fn test_tile_range_and_vram_bounds() {
        assert!(matches!(
            VramLayout::new(0x0000, 0x1000, 0x0380).validate(192),
            Err(Error::ConfigurationConflict(Conflict::TileRange { first: 0x380, count: 192 }))
        ));
        // $7000 + $300 * 8 runs past the end of VRAM
        assert!(matches!(
            VramLayout::new(0x0000, 0x7000, 0x0300).validate(192),
            Err(Error::ConfigurationConflict(Conflict::OutsideVram(_)))
        ));
    }

    #[test]
    fn test_addresses() {
        assert_eq!(HELLO.map_addr(5, 10), 0x6800 + 10 * 32 + 5);
        assert_eq!(HELLO.tile_number(0x28, 1, 2), 0x100 + 0x50 + 1);
        assert_eq!(HELLO.tile_addr(0x100), 0x3800);
    }

    #[test]
    fn test_map_entry_fields() {
        let entry = TileMapEntry::new(0x151, 5).with_priority(true).with_flip(false, true);
        assert_eq!(entry.tile(), 0x151);
        assert_eq!(entry.palette(), 5);
        assert!(entry.priority());
        assert!(!entry.h_flip());
        assert!(entry.v_flip());
        assert_eq!(entry.0, 0b1011_0101_0101_0001);
    }
}
