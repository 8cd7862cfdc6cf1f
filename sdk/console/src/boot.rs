//! Scripted bring-up.
//!
//! A [`BootScript`] is the data half of the startup sequence: which font,
//! where it lives in VRAM, and the color and text steps to replay. [`boot`]
//! runs it through a [`Console`] up to display enable.

use log::info;

use crate::color::{ColorPair, Rgb15};
use crate::console::{BootState, Console, Overflow};
use crate::error::Error;
use crate::font::{FontBinding, GlyphHeight, SNES_FONT};
use crate::hw::Hardware;
use crate::vram::VramLayout;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BootStep<'a> {
    Color(ColorPair),
    Draw { col: u16, row: u16, text: &'a str },
}

#[derive(Copy, Clone, Debug)]
pub struct BootScript<'a> {
    pub font: FontBinding,
    pub layout: VramLayout,
    pub overflow: Overflow,
    pub steps: &'a [BootStep<'a>],
}

static HELLO_STEPS: [BootStep<'static>; 3] = [
    BootStep::Color(ColorPair::new(Rgb15::YELLOW, Rgb15::BLACK)),
    BootStep::Draw { col: 5, row: 10, text: "Hello World!" },
    BootStep::Draw { col: 3, row: 12, text: "PVSnesLib Test!" },
];

impl BootScript<'static> {
    /// Yellow "Hello World!" and "PVSnesLib Test!" on black, 16px glyphs, map
    /// at `$6800`, glyph tiles from tile `$100` of `$3000`.
    pub fn hello() -> Self {
        BootScript {
            font: FontBinding::new(0, GlyphHeight::Tall, &SNES_FONT),
            layout: VramLayout::new(0x6800, 0x3000, 0x0100),
            overflow: Overflow::Reject,
            steps: &HELLO_STEPS,
        }
    }
}

/// Reset `hw`, configure the text layer, replay the script's steps and turn
/// the screen on.
///
/// Draws that come before any color step use the default white on black.
pub fn boot<H: Hardware>(hw: H, script: &BootScript) -> Result<Console<H>, Error> {
    let mut console = Console::init(hw)?;
    console.set_overflow(script.overflow);

    console.init_text(script.font)?;
    console.set_text_map_addr(script.layout.map_base)?;
    console.set_text_tile_addr(script.layout.tile_base)?;
    console.set_text_offset(script.layout.tile_offset)?;

    for step in script.steps {
        match *step {
            BootStep::Color(pair) => console.set_text_color(pair)?,
            BootStep::Draw { col, row, text } => {
                if console.state() == BootState::Uninitialized {
                    console.set_text_color(ColorPair::default())?;
                }
                console.draw_text(col, row, text)?;
            }
        }
    }
    if console.state() == BootState::Uninitialized {
        console.set_text_color(ColorPair::default())?;
    }

    console.set_screen_on()?;
    info!("boot complete: {} steps", script.steps.len());
    Ok(console)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb15;
    use crate::hw::{HardwareError, Register};

    /// Counts calls and remembers the last register values.
    #[derive(Default)]
    struct Counter {
        registers: std::collections::HashMap<Register, u8>,
        vram_writes: usize,
        vblanks: usize,
        fail_reset: bool,
    }

    impl Hardware for Counter {
        fn reset(&mut self) -> Result<(), HardwareError> {
            if self.fail_reset { Err(HardwareError::ResetFailed) } else { Ok(()) }
        }

        fn write_register(&mut self, reg: Register, value: u8) {
            self.registers.insert(reg, value);
        }

        fn write_vram(&mut self, _word_addr: u16, _data: &[u16]) {
            self.vram_writes += 1;
        }

        fn write_cgram(&mut self, _index: u8, _color: Rgb15) {}

        fn wait_for_vblank(&mut self) {
            self.vblanks += 1;
        }
    }

    #[test]
    fn test_hello_boots_to_display() {
        let console = boot(Counter::default(), &BootScript::hello()).unwrap();
        assert_eq!(console.state(), BootState::Displaying);
        assert_eq!(console.layout(), Some(VramLayout::new(0x6800, 0x3000, 0x0100)));
        assert_eq!(console.palette(0), Some(ColorPair::new(Rgb15::YELLOW, Rgb15::BLACK)));

        let hw = console.into_inner();
        assert_eq!(hw.registers[&Register::Inidisp], 0x0F);
        assert_eq!(hw.registers[&Register::Tm], 0x01);
        assert_eq!(hw.vblanks, 0);
    }

    #[test]
    fn test_draw_before_color_uses_default() {
        let steps = [BootStep::Draw { col: 0, row: 0, text: "A" }];
        let script = BootScript { steps: &steps, ..BootScript::hello() };
        let console = boot(Counter::default(), &script).unwrap();
        assert_eq!(console.palette(0), Some(ColorPair::default()));
    }

    #[test]
    fn test_empty_script_still_commits() {
        let script = BootScript { steps: &[], ..BootScript::hello() };
        let console = boot(Counter::default(), &script).unwrap();
        assert_eq!(console.state(), BootState::Displaying);
        // 192 glyph tiles plus 32 cleared map rows
        assert_eq!(console.hw().vram_writes, 192 + 32);
    }

    #[test]
    fn test_failed_reset_surfaces() {
        let hw = Counter { fail_reset: true, ..Default::default() };
        assert_eq!(
            boot(hw, &BootScript::hello()).err(),
            Some(Error::HardwareUnavailable(HardwareError::ResetFailed))
        );
    }

    #[test]
    fn test_overflow_policy_applies() {
        let steps = [BootStep::Draw { col: 30, row: 0, text: "Hello" }];
        let rejecting = BootScript { steps: &steps, ..BootScript::hello() };
        assert!(matches!(
            boot(Counter::default(), &rejecting).err(),
            Some(Error::OutOfBoundsWrite { col: 30, .. })
        ));

        let clipping = BootScript { overflow: Overflow::Clip, ..rejecting };
        assert!(boot(Counter::default(), &clipping).is_ok());
    }
}
