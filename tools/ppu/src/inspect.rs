//! Reads text back out of a tile map.
//!
//! Inverse of `Console::draw_text`: every map cell holding the top tile of a
//! glyph is decoded to its character, and neighbouring cells that share a
//! palette are joined into a [`TextRun`].

use alloc::string::String;
use alloc::vec::Vec;

use snes_console::font::{GLYPH_BG, GLYPH_FG};
use snes_console::vram::{MAP_HEIGHT, MAP_WIDTH, TileMapEntry};
use snes_console::{ColorPair, FontBinding, VramLayout};

use crate::ppu::Ppu;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRun {
    pub col: u16,
    /// Draw row, i.e. the map row minus the binding's row offset.
    pub row: u16,
    pub text: String,
    pub palette: u8,
    pub colors: ColorPair,
}

/// Character in map cell (`col`, `row`) and its palette, if the cell holds
/// the top tile of a glyph.
fn decode_cell(ppu: &Ppu, binding: &FontBinding, layout: &VramLayout, col: u16, row: u16) -> Option<(char, u8)> {
    let word = ppu.read_vram(layout.map_addr(col, row));
    // cleared cell; also what a palette-0 glyph 0 looks like at tile offset 0
    if word == 0 {
        return None;
    }

    let entry = TileMapEntry(word);
    let tiles_per_glyph = binding.glyph_height.tiles_per_glyph();
    let relative = entry.tile().checked_sub(layout.tile_offset)?;
    if relative % tiles_per_glyph != 0 {
        return None;
    }
    let ch = binding.font.char_at(relative / tiles_per_glyph)?;
    Some((ch, entry.palette()))
}

fn palette_colors(ppu: &Ppu, binding: &FontBinding, palette: u8) -> ColorPair {
    let base = binding.layer.palette_base() + palette * 4;
    ColorPair::new(ppu.cgram(base + GLYPH_FG), ppu.cgram(base + GLYPH_BG))
}

/// All text runs in the map, top to bottom, left to right.
pub fn text_runs(ppu: &Ppu, binding: &FontBinding, layout: &VramLayout) -> Vec<TextRun> {
    let mut runs = Vec::new();

    for map_row in 0..MAP_HEIGHT {
        let mut current: Option<TextRun> = None;

        for col in 0..MAP_WIDTH {
            let cell = decode_cell(ppu, binding, layout, col, map_row);
            match (cell, current.as_mut()) {
                (Some((ch, palette)), Some(run)) if run.palette == palette => run.text.push(ch),
                (Some((ch, palette)), _) => {
                    runs.extend(current.take());
                    current = Some(TextRun {
                        col,
                        row: map_row.saturating_sub(binding.row_offset as u16),
                        text: String::from(ch),
                        palette,
                        colors: palette_colors(ppu, binding, palette),
                    });
                }
                (None, _) => runs.extend(current.take()),
            }
        }

        runs.extend(current);
    }

    runs
}
