//! # snes-console
//!
//! Brings up a text overlay on an SNES background layer: reset the PPU, bind
//! a bitmap font to a layer, place the tile map and glyph tiles in VRAM, pick
//! colors, draw strings into the map, turn the screen on and idle on vblank.
//!
//! ```ignore
//! let mut console = Console::init(hw)?;
//! console.init_text(FontBinding::new(0, GlyphHeight::Tall, &SNES_FONT))?;
//! console.set_text_map_addr(0x6800)?;
//! console.set_text_tile_addr(0x3000)?;
//! console.set_text_offset(0x0100)?;
//! console.set_text_color(ColorPair::new(Rgb15::new(31, 31, 0), Rgb15::BLACK))?;
//! console.draw_text(5, 10, "Hello World!")?;
//! console.set_screen_on()?;
//! console.idle();
//! ```
//!
//! The hardware sits behind the [`Hardware`] trait, so the same sequence runs
//! against the real PPU registers or an emulated one.

// std only for the unit test harness
#![cfg_attr(not(test), no_std)]

pub mod boot;
pub mod color;
pub mod console;
pub mod error;
pub mod font;
pub mod hw;
pub mod scr;
pub mod vram;

pub use color::{ColorPair, Rgb15};
pub use console::{BootState, Console, Overflow};
pub use error::{Conflict, Error};
pub use font::{Font, FontBinding, GlyphHeight, SNES_FONT};
pub use hw::{Hardware, HardwareError, Register};
pub use scr::BgLayer;
pub use vram::{Region, TileMapEntry, VramLayout};
