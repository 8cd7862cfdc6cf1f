use alloc::boxed::Box;
use alloc::vec;
use core::fmt::{Debug, Formatter};

use bit_field::BitField;
use log::{debug, trace, warn};
use snes_console::vram::VRAM_WORDS;
use snes_console::{Hardware, HardwareError, Register, Rgb15};

use crate::registers::PpuRegisters;

pub const CGRAM_COLORS: usize = 256;

const VRAM_MASK: u16 = (VRAM_WORDS - 1) as u16;

// data ports, not part of the console's register set
const VMAIN: u16 = 0x2115;
const VMADDL: u16 = 0x2116;
const VMADDH: u16 = 0x2117;
const VMDATAL: u16 = 0x2118;
const VMDATAH: u16 = 0x2119;
const CGADD: u16 = 0x2121;
const CGDATA: u16 = 0x2122;

/// The parts of the PPU the text console touches: registers, 64 KiB of VRAM,
/// 256 colors of CGRAM and a frame counter.
pub struct Ppu {
    vram: Box<[u16]>,
    cgram: [Rgb15; CGRAM_COLORS],
    regs: PpuRegisters,

    vram_addr: u16,
    /// Increment the VRAM address after the high byte (`VMAIN` bit 7) rather
    /// than the low byte.
    vram_inc_high: bool,
    cgram_addr: u8,
    cgram_latch: Option<u8>,

    frames: u64,
    connected: bool,
}

impl Debug for Ppu {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ppu")
            .field("regs", &self.regs)
            .field("vram_addr", &self.vram_addr)
            .field("cgram_addr", &self.cgram_addr)
            .field("frames", &self.frames)
            .field("connected", &self.connected)
            .finish()
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    pub fn new() -> Self {
        Self {
            vram: vec![0u16; VRAM_WORDS as usize].into_boxed_slice(),
            cgram: [Rgb15::BLACK; CGRAM_COLORS],
            regs: PpuRegisters::blanked(),
            vram_addr: 0,
            vram_inc_high: true,
            cgram_addr: 0,
            cgram_latch: None,
            frames: 0,
            connected: true,
        }
    }

    /// A PPU that fails every probe, for exercising bring-up failures.
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::new()
        }
    }

    /// CPU write to a PPU port in `$2100..=$213F`.
    pub fn write_byte(&mut self, address: u16, data: u8) {
        match address {
            VMAIN => {
                if data.get_bits(0..4) != 0 {
                    warn!("VMAIN ${:02X}: only 1-word increments are emulated", data);
                }
                self.vram_inc_high = data.get_bit(7);
            }
            VMADDL => {
                self.vram_addr.set_bits(0..8, data as u16);
            }
            VMADDH => {
                self.vram_addr.set_bits(8..16, data as u16);
            }
            VMDATAL => {
                let word = &mut self.vram[(self.vram_addr & VRAM_MASK) as usize];
                word.set_bits(0..8, data as u16);
                if !self.vram_inc_high {
                    self.vram_addr = self.vram_addr.wrapping_add(1);
                }
            }
            VMDATAH => {
                let word = &mut self.vram[(self.vram_addr & VRAM_MASK) as usize];
                word.set_bits(8..16, data as u16);
                if self.vram_inc_high {
                    self.vram_addr = self.vram_addr.wrapping_add(1);
                }
            }

            CGADD => {
                self.cgram_addr = data;
                self.cgram_latch = None;
            }
            CGDATA => match self.cgram_latch.take() {
                None => self.cgram_latch = Some(data),
                Some(low) => {
                    self.cgram[self.cgram_addr as usize] = Rgb15::from_bits(u16::from_le_bytes([low, data]));
                    self.cgram_addr = self.cgram_addr.wrapping_add(1);
                }
            },

            _ => match Register::from_addr(address) {
                Some(reg) => self.regs.write(reg, data),
                None => debug!("unhandled PPU write ${:04X}=${:02X}", address, data),
            },
        }
    }

    #[inline(always)]
    pub fn registers(&self) -> &PpuRegisters {
        &self.regs
    }

    #[inline(always)]
    pub fn read_vram(&self, word_addr: u16) -> u16 {
        self.vram[(word_addr & VRAM_MASK) as usize]
    }

    pub fn vram(&self) -> &[u16] {
        &self.vram
    }

    /// VRAM as raw bytes, words in host byte order.
    pub fn vram_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vram)
    }

    #[inline(always)]
    pub fn cgram(&self, index: u8) -> Rgb15 {
        self.cgram[index as usize]
    }

    pub fn cgram_all(&self) -> &[Rgb15; CGRAM_COLORS] {
        &self.cgram
    }

    /// Vertical blanks seen since the last reset.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// True when a background layer can reach the screen: no forced blank,
    /// nonzero brightness and at least one BG on the main screen.
    pub fn display_enabled(&self) -> bool {
        let regs = &self.regs;
        !regs.inidisp.force_blank() && regs.inidisp.brightness() > 0 && regs.tm.any_bg()
    }
}

impl Hardware for Ppu {
    fn probe(&mut self) -> Result<(), HardwareError> {
        if self.connected {
            Ok(())
        } else {
            Err(HardwareError::NotResponding)
        }
    }

    fn reset(&mut self) -> Result<(), HardwareError> {
        if !self.connected {
            return Err(HardwareError::ResetFailed);
        }
        self.vram.fill(0);
        self.cgram = [Rgb15::BLACK; CGRAM_COLORS];
        self.regs = PpuRegisters::blanked();
        self.vram_addr = 0;
        self.vram_inc_high = true;
        self.cgram_addr = 0;
        self.cgram_latch = None;
        self.frames = 0;
        debug!("PPU reset");
        Ok(())
    }

    fn write_register(&mut self, reg: Register, value: u8) {
        trace!("{:?} <- ${:02X}", reg, value);
        self.write_byte(reg.addr(), value);
    }

    fn write_vram(&mut self, word_addr: u16, data: &[u16]) {
        self.write_byte(VMAIN, 0x80);
        let [low, high] = word_addr.to_le_bytes();
        self.write_byte(VMADDL, low);
        self.write_byte(VMADDH, high);
        for word in data {
            let [low, high] = word.to_le_bytes();
            self.write_byte(VMDATAL, low);
            self.write_byte(VMDATAH, high);
        }
    }

    fn write_cgram(&mut self, index: u8, color: Rgb15) {
        let [low, high] = color.bits().to_le_bytes();
        self.write_byte(CGADD, index);
        self.write_byte(CGDATA, low);
        self.write_byte(CGDATA, high);
    }

    fn wait_for_vblank(&mut self) {
        self.frames = self.frames.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vram_port_writes() {
        let mut ppu = Ppu::new();
        ppu.write_vram(0x6800, &[0x1234, 0xABCD]);
        assert_eq!(ppu.read_vram(0x6800), 0x1234);
        assert_eq!(ppu.read_vram(0x6801), 0xABCD);
        assert_eq!(ppu.read_vram(0x6802), 0);
    }

    #[test]
    fn test_vram_address_ports() {
        let mut ppu = Ppu::new();
        ppu.write_byte(VMAIN, 0x80);
        ppu.write_byte(VMADDL, 0x34);
        ppu.write_byte(VMADDH, 0x12);
        ppu.write_byte(VMDATAL, 0xCD);
        ppu.write_byte(VMDATAH, 0xAB);
        assert_eq!(ppu.read_vram(0x1234), 0xABCD);

        // rewriting only the low byte keeps the high one
        ppu.write_byte(VMADDL, 0x00);
        ppu.write_byte(VMDATAL, 0x01);
        ppu.write_byte(VMDATAH, 0x00);
        assert_eq!(ppu.read_vram(0x1200), 0x0001);
    }

    #[test]
    fn test_vram_wraps() {
        let mut ppu = Ppu::new();
        ppu.write_vram(0x7FFF, &[1, 2]);
        assert_eq!(ppu.read_vram(0x7FFF), 1);
        assert_eq!(ppu.read_vram(0x0000), 2);
        // the bus ignores the top address bit
        assert_eq!(ppu.read_vram(0x8000), 2);
    }

    #[test]
    fn test_cgram_latch() {
        let mut ppu = Ppu::new();
        ppu.write_cgram(3, Rgb15::YELLOW);
        assert_eq!(ppu.cgram(3), Rgb15::YELLOW);

        // a lone low byte does not commit
        ppu.write_byte(CGADD, 4);
        ppu.write_byte(CGDATA, 0xFF);
        assert_eq!(ppu.cgram(4), Rgb15::BLACK);
    }

    #[test]
    fn test_vram_bytes_view() {
        let mut ppu = Ppu::new();
        ppu.write_vram(0, &[0x0102]);
        assert_eq!(ppu.vram_bytes().len(), 0x10000);
        assert_eq!(&ppu.vram_bytes()[..2], &0x0102u16.to_ne_bytes());
    }

    #[test]
    fn test_reset_and_probe() {
        let mut ppu = Ppu::new();
        ppu.write_vram(0x100, &[7]);
        ppu.write_register(Register::Inidisp, 0x0F);
        ppu.wait_for_vblank();
        assert!(ppu.reset().is_ok());
        assert_eq!(ppu.read_vram(0x100), 0);
        assert!(ppu.registers().inidisp.force_blank());
        assert_eq!(ppu.frames(), 0);

        let mut dead = Ppu::disconnected();
        assert_eq!(dead.probe(), Err(HardwareError::NotResponding));
        assert_eq!(dead.reset(), Err(HardwareError::ResetFailed));
    }

    #[test]
    fn test_display_enabled() {
        let mut ppu = Ppu::new();
        assert!(!ppu.display_enabled());
        ppu.write_register(Register::Tm, 0x01);
        assert!(!ppu.display_enabled());
        ppu.write_register(Register::Inidisp, 0x0F);
        assert!(ppu.display_enabled());
        ppu.write_register(Register::Inidisp, 0x00);
        assert!(!ppu.display_enabled());
    }
}
