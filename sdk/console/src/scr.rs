//! # PPU Screen Register Flags
//!
//! Flags and field helpers for the PPU registers the text console programs.
//!
//! ## DisplayFlags (`INIDISP`, `$2100`)
//!
//! | Bits  | Effect                                              |
//! |-------|-----------------------------------------------------|
//! | 7     | Force blank: the screen outputs black while set     |
//! | 0-3   | Master brightness, 0 (black) to 15 (full)           |
//!
//! ## Layers (`TM`, `$212C`)
//!
//! One bit per layer; a layer only reaches the screen when its bit is set.
//!
//! ## BgMode (`BGMODE`, `$2105`)
//!
//! The console runs in mode 0: four 2bpp layers, each with its own 32-color
//! slice of CGRAM.

use bit_field::BitField;

use crate::hw::Register;

bitflags::bitflags! {
    /// Screen display register at `$2100`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DisplayFlags: u8 {
        /// Master brightness, 4 bits.
        const BRIGHTNESS  = 0b0000_1111;
        /// Blank the screen regardless of layer state.
        const FORCE_BLANK = 0b1000_0000;
    }

    /// Main screen designation at `$212C`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Layers: u8 {
        const BG1 = 0b0000_0001;
        const BG2 = 0b0000_0010;
        const BG3 = 0b0000_0100;
        const BG4 = 0b0000_1000;
        const OBJ = 0b0001_0000;
    }

    /// Background mode and tile size register at `$2105`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct BgMode: u8 {
        /// Mode number, 3 bits. Zero is mode 0.
        const MODE          = 0b0000_0111;
        /// In mode 1, BG3 tiles with priority go in front of everything.
        const BG3_PRIORITY  = 0b0000_1000;
        const BG1_16X16     = 0b0001_0000;
        const BG2_16X16     = 0b0010_0000;
        const BG3_16X16     = 0b0100_0000;
        const BG4_16X16     = 0b1000_0000;
    }
}

impl DisplayFlags {
    /// Forced blank, brightness 0. The state the console resets into.
    pub const fn blanked() -> Self {
        DisplayFlags::FORCE_BLANK
    }

    /// Screen on at full brightness.
    pub const fn full_brightness() -> Self {
        DisplayFlags::BRIGHTNESS
    }

    #[inline(always)]
    pub fn brightness(self) -> u8 {
        self.bits().get_bits(0..4)
    }

    pub fn with_brightness(self, brightness: u8) -> Self {
        let mut bits = self.bits();
        bits.set_bits(0..4, brightness.min(15));
        DisplayFlags::from_bits_retain(bits)
    }
}

impl BgMode {
    pub const MODE_0: BgMode = BgMode::empty();

    #[inline(always)]
    pub fn mode(self) -> u8 {
        self.bits().get_bits(0..3)
    }
}

/// Background layer selector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BgLayer {
    #[default]
    Bg1,
    Bg2,
    Bg3,
    Bg4,
}

impl BgLayer {
    pub const ALL: [BgLayer; 4] = [BgLayer::Bg1, BgLayer::Bg2, BgLayer::Bg3, BgLayer::Bg4];

    /// Zero-based layer index.
    #[inline(always)]
    pub const fn index(self) -> usize {
        match self {
            BgLayer::Bg1 => 0,
            BgLayer::Bg2 => 1,
            BgLayer::Bg3 => 2,
            BgLayer::Bg4 => 3,
        }
    }

    /// One-based layer number (1 for BG1).
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(BgLayer::Bg1),
            2 => Some(BgLayer::Bg2),
            3 => Some(BgLayer::Bg3),
            4 => Some(BgLayer::Bg4),
            _ => None,
        }
    }

    pub const fn layer_flag(self) -> Layers {
        match self {
            BgLayer::Bg1 => Layers::BG1,
            BgLayer::Bg2 => Layers::BG2,
            BgLayer::Bg3 => Layers::BG3,
            BgLayer::Bg4 => Layers::BG4,
        }
    }

    /// The `BGnSC` register holding this layer's map base.
    pub const fn sc_register(self) -> Register {
        match self {
            BgLayer::Bg1 => Register::Bg1sc,
            BgLayer::Bg2 => Register::Bg2sc,
            BgLayer::Bg3 => Register::Bg3sc,
            BgLayer::Bg4 => Register::Bg4sc,
        }
    }

    /// The `BGnnNBA` register holding this layer's tile base, and whether the
    /// layer lives in its high nibble.
    pub const fn nba_register(self) -> (Register, bool) {
        match self {
            BgLayer::Bg1 => (Register::Bg12nba, false),
            BgLayer::Bg2 => (Register::Bg12nba, true),
            BgLayer::Bg3 => (Register::Bg34nba, false),
            BgLayer::Bg4 => (Register::Bg34nba, true),
        }
    }

    /// First CGRAM index used by this layer in mode 0 (8 palettes of 4 colors).
    #[inline(always)]
    pub const fn palette_base(self) -> u8 {
        (self.index() * 32) as u8
    }
}

/// `BGnSC` value for a 32x32 map at `map_base` (word address, 1K aligned).
#[inline(always)]
pub fn sc_value(map_base: u16) -> u8 {
    let mut value = 0u8;
    value.set_bits(2..8, (map_base >> 10) as u8);
    value
}

/// `BGnnNBA` value with `tile_base` (word address, 4K aligned) placed in the
/// nibble for `layer`, keeping the other layer's nibble from `shadow`.
pub fn nba_value(shadow: u8, layer: BgLayer, tile_base: u16) -> u8 {
    let (_, high) = layer.nba_register();
    let nibble = (tile_base >> 12) as u8;
    let mut value = shadow;
    if high {
        value.set_bits(4..8, nibble);
    } else {
        value.set_bits(0..4, nibble);
    }
    value
}
