use bitfield::bitfield;
use log::warn;
use snes_console::{BgLayer, Register};

bitfield! {
    /// `$2100` screen display.
    #[derive(Copy, Clone, Default, PartialEq, Eq)]
    pub struct Inidisp(u8);
    impl Debug;
    pub u8, brightness, set_brightness: 3, 0;
    pub force_blank, set_force_blank: 7;
}

bitfield! {
    /// `$2105` background mode.
    #[derive(Copy, Clone, Default, PartialEq, Eq)]
    pub struct BgModeReg(u8);
    impl Debug;
    pub u8, mode, set_mode: 2, 0;
    pub bg3_priority, _: 3;
    pub u8, big_tiles, _: 7, 4;
}

bitfield! {
    /// `$2107..=$210A` tile map address and size.
    #[derive(Copy, Clone, Default, PartialEq, Eq)]
    pub struct BgSc(u8);
    impl Debug;
    pub u8, size, _: 1, 0;
    pub u8, base, _: 7, 2;
}

impl BgSc {
    /// Word address of the tile map.
    #[inline(always)]
    pub fn map_base(&self) -> u16 {
        (self.base() as u16) << 10
    }
}

bitfield! {
    /// `$210B`/`$210C` character base for two layers.
    #[derive(Copy, Clone, Default, PartialEq, Eq)]
    pub struct BgNba(u8);
    impl Debug;
    pub u8, low, _: 3, 0;
    pub u8, high, _: 7, 4;
}

impl BgNba {
    /// Word address of tile 0 for the layer in the low (`false`) or high
    /// (`true`) nibble.
    #[inline(always)]
    pub fn tile_base(&self, high: bool) -> u16 {
        let nibble = if high { self.high() } else { self.low() };
        (nibble as u16) << 12
    }
}

bitfield! {
    /// `$212C` main screen designation.
    #[derive(Copy, Clone, Default, PartialEq, Eq)]
    pub struct Tm(u8);
    impl Debug;
    pub bg1, _: 0;
    pub bg2, _: 1;
    pub bg3, _: 2;
    pub bg4, _: 3;
    pub obj, _: 4;
}

impl Tm {
    /// Any background layer on the main screen.
    #[inline(always)]
    pub fn any_bg(&self) -> bool {
        self.0 & 0x0F != 0
    }

    #[inline(always)]
    pub fn shows(&self, layer: BgLayer) -> bool {
        match layer {
            BgLayer::Bg1 => self.bg1(),
            BgLayer::Bg2 => self.bg2(),
            BgLayer::Bg3 => self.bg3(),
            BgLayer::Bg4 => self.bg4(),
        }
    }
}

/// Register file as last written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PpuRegisters {
    pub inidisp: Inidisp,
    pub bgmode: BgModeReg,
    pub bgsc: [BgSc; 4],
    pub bg12nba: BgNba,
    pub bg34nba: BgNba,
    pub tm: Tm,
}

impl PpuRegisters {
    /// Power-on state: forced blank, everything else zero.
    pub fn blanked() -> Self {
        let mut regs = Self::default();
        regs.inidisp.set_force_blank(true);
        regs
    }

    pub fn write(&mut self, reg: Register, data: u8) {
        match reg {
            Register::Inidisp => self.inidisp = Inidisp(data),
            Register::Bgmode => {
                self.bgmode = BgModeReg(data);
                if self.bgmode.mode() != 0 {
                    warn!("BG mode {} is not emulated, rendering as mode 0", self.bgmode.mode());
                }
            }
            Register::Bg1sc => self.bgsc[0] = BgSc(data),
            Register::Bg2sc => self.bgsc[1] = BgSc(data),
            Register::Bg3sc => self.bgsc[2] = BgSc(data),
            Register::Bg4sc => self.bgsc[3] = BgSc(data),
            Register::Bg12nba => self.bg12nba = BgNba(data),
            Register::Bg34nba => self.bg34nba = BgNba(data),
            Register::Tm => self.tm = Tm(data),
        }
    }

    pub fn map_base(&self, layer: BgLayer) -> u16 {
        self.bgsc[layer.index()].map_base()
    }

    pub fn tile_base(&self, layer: BgLayer) -> u16 {
        let (_, high) = layer.nba_register();
        match layer {
            BgLayer::Bg1 | BgLayer::Bg2 => self.bg12nba.tile_base(high),
            BgLayer::Bg3 | BgLayer::Bg4 => self.bg34nba.tile_base(high),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inidisp_fields() {
        let reg = Inidisp(0x8F);
        assert!(reg.force_blank());
        assert_eq!(reg.brightness(), 15);
        assert!(PpuRegisters::blanked().inidisp.force_blank());
    }

    #[test]
    fn test_layer_bases() {
        let regs = PpuRegisters {
            bgsc: [BgSc(26 << 2), BgSc(0), BgSc(0x7C), BgSc(0)],
            bg12nba: BgNba(0x53),
            bg34nba: BgNba(0x20),
            ..Default::default()
        };
        assert_eq!(regs.map_base(BgLayer::Bg1), 0x6800);
        assert_eq!(regs.map_base(BgLayer::Bg3), 0x7C00);
        assert_eq!(regs.tile_base(BgLayer::Bg1), 0x3000);
        assert_eq!(regs.tile_base(BgLayer::Bg2), 0x5000);
        assert_eq!(regs.tile_base(BgLayer::Bg4), 0x2000);
    }

    #[test]
    fn test_write_decodes_registers() {
        let mut regs = PpuRegisters::blanked();
        regs.write(Register::Bg3sc, 26 << 2);
        regs.write(Register::Bg34nba, 0x03);
        regs.write(Register::Inidisp, 0x0F);
        assert_eq!(regs.map_base(BgLayer::Bg3), 0x6800);
        assert_eq!(regs.tile_base(BgLayer::Bg3), 0x3000);
        assert!(!regs.inidisp.force_blank());
    }

    #[test]
    fn test_tm() {
        let tm = Tm(0b0100);
        assert!(tm.shows(BgLayer::Bg3));
        assert!(!tm.shows(BgLayer::Bg1));
        assert!(tm.any_bg());
        assert!(!Tm(0x10).any_bg());
    }
}
