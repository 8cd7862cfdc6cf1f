//! # Hardware Boundary
//!
//! Everything the console needs from the machine: a probe, a reset, PPU
//! register writes, VRAM and CGRAM uploads, and a vertical-blank wait.
//! Real hardware and the emulated PPU implement the same trait.

use core::fmt;

use crate::color::Rgb15;

/// Write-only PPU registers touched by the text console.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Register {
    /// Screen display: force blank and brightness.
    Inidisp = 0x2100,
    /// BG mode and tile size.
    Bgmode = 0x2105,
    Bg1sc = 0x2107,
    Bg2sc = 0x2108,
    Bg3sc = 0x2109,
    Bg4sc = 0x210A,
    /// BG1/BG2 character (tile) base.
    Bg12nba = 0x210B,
    /// BG3/BG4 character (tile) base.
    Bg34nba = 0x210C,
    /// Main screen layer designation.
    Tm = 0x212C,
}

impl Register {
    #[inline(always)]
    pub const fn addr(self) -> u16 {
        self as u16
    }

    pub fn from_addr(address: u16) -> Option<Self> {
        match address {
            0x2100 => Some(Register::Inidisp),
            0x2105 => Some(Register::Bgmode),
            0x2107 => Some(Register::Bg1sc),
            0x2108 => Some(Register::Bg2sc),
            0x2109 => Some(Register::Bg3sc),
            0x210A => Some(Register::Bg4sc),
            0x210B => Some(Register::Bg12nba),
            0x210C => Some(Register::Bg34nba),
            0x212C => Some(Register::Tm),
            _ => None,
        }
    }
}

/// Failure reported by a hardware backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HardwareError {
    /// Nothing answered the probe.
    NotResponding,
    /// The reset sequence did not complete.
    ResetFailed,
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareError::NotResponding => write!(f, "video hardware is not responding"),
            HardwareError::ResetFailed => write!(f, "video hardware reset failed"),
        }
    }
}

impl core::error::Error for HardwareError {}

/// Capability set of the console's video hardware.
///
/// VRAM addresses are word addresses (`0x0000..0x8000`); writes past the
/// end wrap, as on the real bus.
pub trait Hardware {
    /// Check that the video hardware is present and answering.
    fn probe(&mut self) -> Result<(), HardwareError> {
        Ok(())
    }

    /// Return VRAM, CGRAM and registers to a zeroed baseline.
    fn reset(&mut self) -> Result<(), HardwareError>;

    fn write_register(&mut self, reg: Register, value: u8);

    fn write_vram(&mut self, word_addr: u16, data: &[u16]);

    fn write_cgram(&mut self, index: u8, color: Rgb15);

    /// Block until the start of the next vertical blank.
    fn wait_for_vblank(&mut self);
}

impl<H: Hardware + ?Sized> Hardware for &mut H {
    #[inline(always)]
    fn probe(&mut self) -> Result<(), HardwareError> {
        (**self).probe()
    }

    #[inline(always)]
    fn reset(&mut self) -> Result<(), HardwareError> {
        (**self).reset()
    }

    #[inline(always)]
    fn write_register(&mut self, reg: Register, value: u8) {
        (**self).write_register(reg, value)
    }

    #[inline(always)]
    fn write_vram(&mut self, word_addr: u16, data: &[u16]) {
        (**self).write_vram(word_addr, data)
    }

    #[inline(always)]
    fn write_cgram(&mut self, index: u8, color: Rgb15) {
        (**self).write_cgram(index, color)
    }

    #[inline(always)]
    fn wait_for_vblank(&mut self) {
        (**self).wait_for_vblank()
    }
}
