//! Mode 0 background renderer.
//!
//! Produces the visible 256×224 frame from VRAM, CGRAM and the register
//! file. Only what the text console can set up is drawn: four 2bpp layers
//! with 8×8 tiles and 32×32 maps, no scrolling, no sprites. Lower-numbered
//! layers are in front; tile priority bits are ignored.

use alloc::vec;
use alloc::vec::Vec;

use snes_console::font::{decode_pixel, TILE_WORDS};
use snes_console::vram::{MAP_WIDTH, TileMapEntry};
use snes_console::{BgLayer, Rgb15};

use crate::ppu::Ppu;

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 224;

#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<Rgb15>,
}

impl Frame {
    fn filled(color: Rgb15) -> Self {
        Self {
            pixels: vec![color; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    #[inline(always)]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb15 {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    pub fn pixels(&self) -> &[Rgb15] {
        &self.pixels
    }

    /// Every pixel is black.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == Rgb15::BLACK)
    }

    /// Packed RGB888, row-major, for image encoders.
    pub fn to_rgb888(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_rgb888()).collect()
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Frame({}x{}, blank: {})", SCREEN_WIDTH, SCREEN_HEIGHT, self.is_blank())
    }
}

/// Palette index of BG pixel (`x`, `y`) on `layer`; 0 is transparent.
fn layer_pixel(ppu: &Ppu, layer: BgLayer, x: usize, y: usize) -> (u8, u8) {
    let regs = ppu.registers();
    let map_base = regs.map_base(layer);
    let tile_base = regs.tile_base(layer);

    let cell = (y / 8) as u16 * MAP_WIDTH + (x / 8) as u16;
    let entry = TileMapEntry(ppu.read_vram(map_base.wrapping_add(cell)));

    let mut row = (y % 8) as u16;
    let mut col = x % 8;
    if entry.v_flip() {
        row = 7 - row;
    }
    if entry.h_flip() {
        col = 7 - col;
    }

    let tile_addr = tile_base.wrapping_add(entry.tile() * TILE_WORDS + row);
    (decode_pixel(ppu.read_vram(tile_addr), col), entry.palette())
}

pub fn render(ppu: &Ppu) -> Frame {
    let regs = ppu.registers();
    if regs.inidisp.force_blank() {
        return Frame::filled(Rgb15::BLACK);
    }

    let brightness = regs.inidisp.brightness();
    let backdrop = ppu.cgram(0).dimmed(brightness);
    let mut frame = Frame::filled(backdrop);

    let layers: Vec<BgLayer> = BgLayer::ALL.into_iter().filter(|l| regs.tm.shows(*l)).collect();
    if layers.is_empty() {
        return frame;
    }

    for y in 0..SCREEN_HEIGHT {
        for x in 0..SCREEN_WIDTH {
            for layer in &layers {
                let (index, palette) = layer_pixel(ppu, *layer, x, y);
                if index != 0 {
                    let color = ppu.cgram(layer.palette_base() + palette * 4 + index);
                    frame.pixels[y * SCREEN_WIDTH + x] = color.dimmed(brightness);
                    break;
                }
            }
        }
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use snes_console::font::encode_tile;
    use snes_console::{Hardware, Register};

    fn solid_tile(ppu: &mut Ppu, addr: u16, index: u8) {
        let words = encode_tile([0xFF; 8], index, index);
        ppu.write_vram(addr, &words);
    }

    #[test]
    fn test_forced_blank_is_black() {
        let mut ppu = Ppu::new();
        ppu.write_cgram(0, Rgb15::WHITE);
        assert!(render(&ppu).is_blank());
    }

    #[test]
    fn test_backdrop_and_brightness() {
        let mut ppu = Ppu::new();
        ppu.write_cgram(0, Rgb15::WHITE);
        ppu.write_register(Register::Inidisp, 0x0F);
        assert_eq!(render(&ppu).pixel(0, 0), Rgb15::WHITE);

        ppu.write_register(Register::Inidisp, 0x00);
        assert!(render(&ppu).is_blank());
    }

    #[test]
    fn test_layer_order() {
        let mut ppu = Ppu::new();
        // BG1: map at $0400, tiles at $1000; BG2: map at $0800, tiles at $2000
        ppu.write_register(Register::Bg1sc, 1 << 2);
        ppu.write_register(Register::Bg2sc, 2 << 2);
        ppu.write_register(Register::Bg12nba, 0x21);
        solid_tile(&mut ppu, 0x1000 + 8, 1);
        solid_tile(&mut ppu, 0x2000 + 8, 3);
        ppu.write_vram(0x0400, &[TileMapEntry::new(1, 0).0]);
        ppu.write_vram(0x0800, &[TileMapEntry::new(1, 0).0, TileMapEntry::new(1, 1).0]);
        ppu.write_cgram(1, Rgb15::YELLOW);
        ppu.write_cgram(32 + 3, Rgb15::WHITE);
        ppu.write_cgram(32 + 4 + 3, Rgb15::new(0, 0, 31));
        ppu.write_register(Register::Tm, 0b11);
        ppu.write_register(Register::Inidisp, 0x0F);

        let frame = render(&ppu);
        assert_eq!(frame.pixel(0, 0), Rgb15::YELLOW);
        assert_eq!(frame.pixel(8, 7), Rgb15::new(0, 0, 31));
        assert_eq!(frame.pixel(16, 0), Rgb15::BLACK);
    }

    #[test]
    fn test_rgb888_size() {
        let ppu = Ppu::new();
        assert_eq!(render(&ppu).to_rgb888().len(), SCREEN_WIDTH * SCREEN_HEIGHT * 3);
    }
}
