//! # Text Console
//!
//! [`Console`] walks the PPU through the bring-up sequence exactly once:
//!
//! ```text
//! Uninitialized --set_text_color--> Configured --set_screen_on--> Displaying --enter_idle--> Idling
//! ```
//!
//! - `init` resets the hardware and leaves the screen force-blanked.
//! - `init_text` binds a font; the three layout setters follow it, each once.
//! - The first `set_text_color` commits the layout: it is validated, the
//!   glyph tiles are uploaded and the BG registers written.
//! - `draw_text` writes map entries with the active palette.
//! - `set_screen_on` puts the text layer on the main screen.
//! - `idle` waits for vblank forever.
//!
//! Each distinct [`ColorPair`] gets its own BG palette, so recoloring never
//! touches text that is already on screen.

use log::{debug, info, trace, warn};

use crate::color::ColorPair;
use crate::error::Error;
use crate::font::{FontBinding, GLYPH_BG, GLYPH_FG, encode_tile};
use crate::hw::{Hardware, Register};
use crate::scr::{self, BgMode, DisplayFlags, Layers};
use crate::vram::{MAP_HEIGHT, MAP_WIDTH, TileMapEntry, VramLayout};

/// BG palettes available to a 2bpp layer.
pub const PALETTE_COUNT: usize = 8;
const COLORS_PER_PALETTE: u8 = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BootState {
    Uninitialized,
    Configured,
    Displaying,
    Idling,
}

/// What `draw_text` does with text that runs off the tile map.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    /// Refuse the whole draw; nothing is written.
    #[default]
    Reject,
    /// Write the cells that fit and drop the rest.
    Clip,
}

#[derive(Copy, Clone)]
enum LayoutField {
    MapBase,
    TileBase,
    TileOffset,
}

impl LayoutField {
    const fn name(self) -> &'static str {
        match self {
            LayoutField::MapBase => "text map address",
            LayoutField::TileBase => "text tile address",
            LayoutField::TileOffset => "text tile offset",
        }
    }
}

/// Layout values collected before the commit.
#[derive(Default)]
struct PendingLayout {
    map_base: Option<u16>,
    tile_base: Option<u16>,
    tile_offset: Option<u16>,
}

impl PendingLayout {
    fn slot(&mut self, field: LayoutField) -> &mut Option<u16> {
        match field {
            LayoutField::MapBase => &mut self.map_base,
            LayoutField::TileBase => &mut self.tile_base,
            LayoutField::TileOffset => &mut self.tile_offset,
        }
    }

    fn resolve(&self) -> VramLayout {
        let defaults = VramLayout::default();
        VramLayout {
            map_base: self.map_base.unwrap_or(defaults.map_base),
            tile_base: self.tile_base.unwrap_or(defaults.tile_base),
            tile_offset: self.tile_offset.unwrap_or(defaults.tile_offset),
        }
    }
}

pub struct Console<H: Hardware> {
    hw: H,
    state: BootState,
    text: Option<FontBinding>,
    pending: PendingLayout,
    layout: Option<VramLayout>,
    palettes: [Option<ColorPair>; PALETTE_COUNT],
    active_palette: u8,
    overflow: Overflow,

    /// Shadow copies of write-only registers
    display: DisplayFlags,
    nba: [u8; 2],

    frames: u64,
}

impl<H: Hardware> Console<H> {
    /// Reset the video hardware to a zeroed baseline: mode 0, no layers on the
    /// main screen, forced blank.
    pub fn init(mut hw: H) -> Result<Self, Error> {
        hw.probe()?;
        hw.reset()?;

        let display = DisplayFlags::blanked();
        hw.write_register(Register::Inidisp, display.bits());
        hw.write_register(Register::Bgmode, BgMode::MODE_0.bits());
        hw.write_register(Register::Tm, Layers::empty().bits());
        hw.write_register(Register::Bg12nba, 0);
        hw.write_register(Register::Bg34nba, 0);
        info!("console reset, screen blanked");

        Ok(Self {
            hw,
            state: BootState::Uninitialized,
            text: None,
            pending: PendingLayout::default(),
            layout: None,
            palettes: [None; PALETTE_COUNT],
            active_palette: 0,
            overflow: Overflow::default(),
            display,
            nba: [0; 2],
            frames: 0,
        })
    }

    #[inline(always)]
    pub fn state(&self) -> BootState {
        self.state
    }

    pub fn hw(&self) -> &H {
        &self.hw
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn into_inner(self) -> H {
        self.hw
    }

    pub fn text_binding(&self) -> Option<&FontBinding> {
        self.text.as_ref()
    }

    /// The committed layout; `None` until the first `set_text_color`.
    pub fn layout(&self) -> Option<VramLayout> {
        self.layout
    }

    pub fn display_flags(&self) -> DisplayFlags {
        self.display
    }

    /// Color pair held by BG palette `index`, if allocated.
    pub fn palette(&self, index: u8) -> Option<ColorPair> {
        self.palettes.get(index as usize).copied().flatten()
    }

    /// Vertical blanks waited for since entering the idle state.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn set_overflow(&mut self, overflow: Overflow) {
        self.overflow = overflow;
    }

    fn require_state(&self, state: BootState, op: &'static str) -> Result<(), Error> {
        if self.state == state {
            Ok(())
        } else {
            Err(Error::OutOfOrder {
                op,
                state: self.state,
            })
        }
    }

    /// Bind a font to the text layer. Must come before the layout and color
    /// steps.
    pub fn init_text(&mut self, binding: FontBinding) -> Result<(), Error> {
        self.require_state(BootState::Uninitialized, "init_text")?;
        if self.text.is_some() {
            return Err(Error::AlreadySet("font binding"));
        }
        debug!(
            "bound font {} to {:?}: {}px glyphs, row offset {}",
            binding.font.name,
            binding.layer,
            binding.glyph_height.pixels(),
            binding.row_offset
        );
        self.text = Some(binding);
        Ok(())
    }

    /// Word address of the text layer's tile map.
    pub fn set_text_map_addr(&mut self, addr: u16) -> Result<(), Error> {
        self.set_layout_field(LayoutField::MapBase, addr)
    }

    /// Word address of the text layer's tile data.
    pub fn set_text_tile_addr(&mut self, addr: u16) -> Result<(), Error> {
        self.set_layout_field(LayoutField::TileBase, addr)
    }

    /// Tile number added to every glyph index.
    pub fn set_text_offset(&mut self, offset: u16) -> Result<(), Error> {
        self.set_layout_field(LayoutField::TileOffset, offset)
    }

    fn set_layout_field(&mut self, field: LayoutField, value: u16) -> Result<(), Error> {
        self.require_state(BootState::Uninitialized, field.name())?;
        if self.text.is_none() {
            return Err(Error::FontNotBound);
        }
        let slot = self.pending.slot(field);
        if slot.is_some() {
            return Err(Error::AlreadySet(field.name()));
        }
        *slot = Some(value);
        debug!("{} = ${:04X}", field.name(), value);
        Ok(())
    }

    /// Validate the pending layout, upload the glyphs and point the layer's
    /// registers at them.
    fn commit(&mut self) -> Result<(), Error> {
        let binding = self.text.ok_or(Error::FontNotBound)?;
        let layout = self.pending.resolve();
        layout.validate(binding.glyph_tiles())?;

        self.upload_font(&binding, &layout);

        let blank_row = [0u16; MAP_WIDTH as usize];
        for row in 0..MAP_HEIGHT {
            self.hw.write_vram(layout.map_addr(0, row), &blank_row);
        }

        let layer = binding.layer;
        self.hw.write_register(layer.sc_register(), scr::sc_value(layout.map_base));
        let (nba_register, _) = layer.nba_register();
        let shadow = &mut self.nba[layer.index() / 2];
        *shadow = scr::nba_value(*shadow, layer, layout.tile_base);
        self.hw.write_register(nba_register, *shadow);

        info!(
            "text layout committed: map ${:04X}, tiles ${:04X}, offset ${:03X}",
            layout.map_base, layout.tile_base, layout.tile_offset
        );
        self.layout = Some(layout);
        self.state = BootState::Configured;
        Ok(())
    }

    fn upload_font(&mut self, binding: &FontBinding, layout: &VramLayout) {
        let height = binding.glyph_height;
        let tiles_per_glyph = height.tiles_per_glyph();
        for glyph in 0..binding.font.glyph_count() {
            let bitmap = binding.font.glyph(glyph);
            for part in 0..tiles_per_glyph {
                let tile = layout.tile_number(glyph, part, tiles_per_glyph);
                let words = encode_tile(height.tile_rows(bitmap, part), GLYPH_FG, GLYPH_BG);
                self.hw.write_vram(layout.tile_addr(tile), &words);
            }
        }
        debug!("uploaded {} glyph tiles", binding.glyph_tiles());
    }

    /// Select the colors for subsequent draws. The first call commits the
    /// layout.
    pub fn set_text_color(&mut self, pair: ColorPair) -> Result<(), Error> {
        match self.state {
            BootState::Uninitialized => self.commit()?,
            BootState::Configured | BootState::Displaying => {}
            BootState::Idling => {
                return Err(Error::OutOfOrder {
                    op: "set_text_color",
                    state: self.state,
                });
            }
        }

        let index = match self.palettes.iter().position(|p| *p == Some(pair)) {
            Some(index) => index,
            None => {
                let index = self
                    .palettes
                    .iter()
                    .position(Option::is_none)
                    .ok_or(Error::PaletteExhausted)?;
                self.load_palette(index as u8, pair);
                self.palettes[index] = Some(pair);
                index
            }
        };

        self.active_palette = index as u8;
        debug!("text color {} on {} (palette {})", pair.fg, pair.bg, index);
        Ok(())
    }

    fn load_palette(&mut self, index: u8, pair: ColorPair) {
        let layer = self.text.map(|t| t.layer).unwrap_or_default();
        let base = layer.palette_base() + index * COLORS_PER_PALETTE;
        self.hw.write_cgram(base + GLYPH_FG, pair.fg);
        self.hw.write_cgram(base + GLYPH_BG, pair.bg);
    }

    /// Write `text` into the tile map starting at (`col`, `row`), left to
    /// right. Returns the number of cells written.
    ///
    /// `row` is a map row; the binding's row offset is added to it and tall
    /// glyphs also cover the row below.
    pub fn draw_text(&mut self, col: u16, row: u16, text: &str) -> Result<usize, Error> {
        if !matches!(self.state, BootState::Configured | BootState::Displaying) {
            return Err(Error::OutOfOrder {
                op: "draw_text",
                state: self.state,
            });
        }
        let (Some(binding), Some(layout)) = (self.text, self.layout) else {
            return Err(Error::FontNotBound);
        };

        let tiles_per_glyph = binding.glyph_height.tiles_per_glyph();
        let map_row = row as u32 + binding.row_offset as u32;
        let len = text.chars().count();
        let fits = col as usize + len <= MAP_WIDTH as usize
            && map_row + tiles_per_glyph as u32 <= MAP_HEIGHT as u32;

        if !fits {
            match self.overflow {
                Overflow::Reject => return Err(Error::OutOfBoundsWrite { col, row, len }),
                Overflow::Clip => warn!("clipping {len} characters at ({col}, {row})"),
            }
        }

        let visible = len.min((MAP_WIDTH as usize).saturating_sub(col as usize));
        if visible == 0 || map_row >= MAP_HEIGHT as u32 {
            return Ok(0);
        }

        let font = binding.font;
        for part in 0..tiles_per_glyph {
            let y = map_row + part as u32;
            if y >= MAP_HEIGHT as u32 {
                break;
            }

            let mut entries = [0u16; MAP_WIDTH as usize];
            for (entry, ch) in entries.iter_mut().zip(text.chars()).take(visible) {
                let glyph = font.glyph_index(ch).unwrap_or_else(|| {
                    if part == 0 {
                        warn!("no glyph for {ch:?} in {}", font.name);
                    }
                    font.fallback_index()
                });
                let tile = layout.tile_number(glyph, part, tiles_per_glyph);
                *entry = TileMapEntry::new(tile, self.active_palette).0;
            }
            self.hw.write_vram(layout.map_addr(col, y as u16), &entries[..visible]);
        }

        trace!("drew {visible} cells at ({col}, {row}): {text:?}");
        Ok(visible)
    }

    /// Put the text layer on the main screen and lift the forced blank.
    pub fn set_screen_on(&mut self) -> Result<(), Error> {
        self.require_state(BootState::Configured, "set_screen_on")?;
        self.hw.probe()?;

        let layer = self.text.map(|t| t.layer).unwrap_or_default();
        self.hw.write_register(Register::Tm, layer.layer_flag().bits());
        self.display = DisplayFlags::full_brightness();
        self.hw.write_register(Register::Inidisp, self.display.bits());

        info!("screen on, {:?} on the main screen", layer);
        self.state = BootState::Displaying;
        Ok(())
    }

    /// Enter the terminal idle state. No configuration is accepted after this.
    pub fn enter_idle(&mut self) -> Result<(), Error> {
        self.require_state(BootState::Displaying, "enter_idle")?;
        debug!("entering idle loop");
        self.state = BootState::Idling;
        Ok(())
    }

    /// One turn of the idle loop: wait for the next vertical blank.
    pub fn wait_frame(&mut self) -> Result<(), Error> {
        self.require_state(BootState::Idling, "wait_frame")?;
        self.hw.wait_for_vblank();
        self.frames = self.frames.wrapping_add(1);
        Ok(())
    }

    /// Idle for `frames` vertical blanks, entering the idle state first if
    /// the screen is on.
    pub fn idle_for(&mut self, frames: u64) -> Result<(), Error> {
        if self.state == BootState::Displaying {
            self.enter_idle()?;
        }
        for _ in 0..frames {
            self.wait_frame()?;
        }
        Ok(())
    }

    /// Wait for vertical blank forever.
    pub fn idle(mut self) -> ! {
        match self.state {
            BootState::Displaying => self.state = BootState::Idling,
            BootState::Idling => {}
            state => {
                warn!("idling while {state:?}, nothing will be shown");
                self.state = BootState::Idling;
            }
        }
        loop {
            self.hw.wait_for_vblank();
            self.frames = self.frames.wrapping_add(1);
        }
    }
}
