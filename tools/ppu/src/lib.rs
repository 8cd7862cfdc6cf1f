//! Host model of the SNES picture processing unit, as far as a text console
//! needs it. [`Ppu`] implements [`snes_console::Hardware`], so a console can
//! be brought up on it and the result rendered or read back as text.

#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod inspect;
pub mod ppu;
pub mod registers;
pub mod render;

pub use inspect::{text_runs, TextRun};
pub use ppu::Ppu;
pub use render::{render, Frame, SCREEN_HEIGHT, SCREEN_WIDTH};
