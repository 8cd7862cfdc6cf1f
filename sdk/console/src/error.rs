use core::fmt;

use crate::console::BootState;
use crate::hw::HardwareError;
use crate::vram::Region;

/// Why a VRAM layout was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Conflict {
    /// The tile map and glyph tiles share words.
    Overlap { map: Region, glyphs: Region },
    /// The tile map covers tile 0, which every cleared map cell shows.
    BlankTile { map: Region, tile: Region },
    /// A region runs past the end of VRAM.
    OutsideVram(Region),
    /// Glyph tile numbers would not fit in a 10-bit map entry.
    TileRange { first: u16, count: u16 },
}

/// Bring-up errors. All of them are fatal: the console has no steady state
/// to recover into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    ConfigurationConflict(Conflict),
    Misaligned {
        what: &'static str,
        addr: u16,
        align: u16,
    },
    /// A write-once setting was written twice.
    AlreadySet(&'static str),
    /// Layout or color configured before a font was bound.
    FontNotBound,
    OutOfBoundsWrite {
        col: u16,
        row: u16,
        len: usize,
    },
    /// Every BG palette already holds a different color pair.
    PaletteExhausted,
    OutOfOrder {
        op: &'static str,
        state: BootState,
    },
    HardwareUnavailable(HardwareError),
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::Overlap { map, glyphs } => write!(
                f,
                "tile map ${:04X}..${:04X} overlaps glyph tiles ${:04X}..${:04X}",
                map.start,
                map.end(),
                glyphs.start,
                glyphs.end()
            ),
            Conflict::BlankTile { map, tile } => write!(
                f,
                "tile map ${:04X}..${:04X} covers blank tile 0 at ${:04X}",
                map.start,
                map.end(),
                tile.start
            ),
            Conflict::OutsideVram(region) => write!(
                f,
                "region ${:04X}..${:04X} runs past the end of VRAM",
                region.start,
                region.end()
            ),
            Conflict::TileRange { first, count } => write!(
                f,
                "{count} glyph tiles starting at tile ${first:03X} exceed the 10-bit tile range"
            ),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigurationConflict(conflict) => write!(f, "configuration conflict: {conflict}"),
            Error::Misaligned { what, addr, align } => {
                write!(f, "{what} ${addr:04X} is not aligned to ${align:04X} words")
            }
            Error::AlreadySet(what) => write!(f, "{what} can only be set once"),
            Error::FontNotBound => write!(f, "no font bound to the text layer"),
            Error::OutOfBoundsWrite { col, row, len } => {
                write!(f, "{len} characters at ({col}, {row}) run past the 32x32 tile map")
            }
            Error::PaletteExhausted => write!(f, "all 8 background palettes are in use"),
            Error::OutOfOrder { op, state } => write!(f, "{op} is not allowed while {state:?}"),
            Error::HardwareUnavailable(e) => write!(f, "hardware unavailable: {e}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::HardwareUnavailable(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HardwareError> for Error {
    fn from(e: HardwareError) -> Self {
        Error::HardwareUnavailable(e)
    }
}
