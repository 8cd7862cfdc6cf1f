//! # Colors
//!
//! CGRAM holds 256 colors in the SNES's 15-bit BGR format:
//!
//! ```text
//! 0bbbbbgg gggrrrrr
//! ```

use core::fmt;

use bit_field::BitField;

/// A 15-bit color, 5 bits per channel.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rgb15(pub u16);

impl Rgb15 {
    pub const BLACK: Rgb15 = Rgb15::new(0, 0, 0);
    pub const WHITE: Rgb15 = Rgb15::new(31, 31, 31);
    pub const YELLOW: Rgb15 = Rgb15::new(31, 31, 0);

    /// Channels above 31 are masked to their low 5 bits.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb15(((b as u16 & 0x1F) << 10) | ((g as u16 & 0x1F) << 5) | (r as u16 & 0x1F))
    }

    #[inline(always)]
    pub fn r(self) -> u8 {
        self.0.get_bits(0..5) as u8
    }

    #[inline(always)]
    pub fn g(self) -> u8 {
        self.0.get_bits(5..10) as u8
    }

    #[inline(always)]
    pub fn b(self) -> u8 {
        self.0.get_bits(10..15) as u8
    }

    /// Bit 15 is ignored by the hardware and dropped here.
    pub fn from_bits(mut bits: u16) -> Self {
        bits.set_bit(15, false);
        Rgb15(bits)
    }

    #[inline(always)]
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Scale by the INIDISP master brightness (0 = black, 15 = unchanged).
    pub fn dimmed(self, brightness: u8) -> Self {
        let brightness = brightness.min(15) as u16;
        let scale = |c: u8| ((c as u16 * brightness) / 15) as u8;
        Rgb15::new(scale(self.r()), scale(self.g()), scale(self.b()))
    }

    /// Expand to 8 bits per channel, replicating the top bits into the bottom.
    pub fn to_rgb888(self) -> [u8; 3] {
        let expand = |c: u8| (c << 3) | (c >> 2);
        [expand(self.r()), expand(self.g()), expand(self.b())]
    }
}

impl fmt::Debug for Rgb15 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgb15({}, {}, {})", self.r(), self.g(), self.b())
    }
}

impl fmt::Display for Rgb15 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB15({},{},{})", self.r(), self.g(), self.b())
    }
}

/// Foreground/background pair used by text draws.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColorPair {
    pub fg: Rgb15,
    pub bg: Rgb15,
}

impl ColorPair {
    pub const fn new(fg: Rgb15, bg: Rgb15) -> Self {
        Self { fg, bg }
    }
}

impl Default for ColorPair {
    fn default() -> Self {
        Self::new(Rgb15::WHITE, Rgb15::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packing() {
        assert_eq!(Rgb15::new(31, 0, 0).bits(), 0x001F);
        assert_eq!(Rgb15::new(0, 31, 0).bits(), 0x03E0);
        assert_eq!(Rgb15::new(0, 0, 31).bits(), 0x7C00);
        assert_eq!(Rgb15::YELLOW.bits(), 0x03FF);
    }

    #[test]
    fn test_channels_are_masked() {
        let c = Rgb15::new(33, 64, 255);
        assert_eq!((c.r(), c.g(), c.b()), (1, 0, 31));
    }

    #[test]
    fn test_from_bits_drops_bit_15() {
        assert_eq!(Rgb15::from_bits(0xFFFF), Rgb15::new(31, 31, 31));
    }

    #[test]
    fn test_rgb888() {
        assert_eq!(Rgb15::YELLOW.to_rgb888(), [255, 255, 0]);
        assert_eq!(Rgb15::new(16, 1, 0).to_rgb888(), [132, 8, 0]);
    }

    #[test]
    fn test_dimmed() {
        assert_eq!(Rgb15::WHITE.dimmed(15), Rgb15::WHITE);
        assert_eq!(Rgb15::WHITE.dimmed(0), Rgb15::BLACK);
        assert_eq!(Rgb15::WHITE.dimmed(7), Rgb15::new(14, 14, 14));
    }
}
