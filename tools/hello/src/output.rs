use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use image::RgbImage;
use snes_ppu::{Frame, Ppu, SCREEN_HEIGHT, SCREEN_WIDTH, TextRun};

/// One line per run: position, colors, text.
pub fn print_runs(runs: &[TextRun], out: &mut impl Write) -> io::Result<()> {
    for run in runs {
        writeln!(
            out,
            "({:2}, {:2}) {} on {}: {:?}",
            run.col, run.row, run.colors.fg, run.colors.bg, run.text
        )?;
    }
    Ok(())
}

pub fn save_screenshot(frame: &Frame, path: &Path) -> anyhow::Result<()> {
    let image = RgbImage::from_raw(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, frame.to_rgb888())
        .context("frame buffer does not match the screen size")?;
    image
        .save(path)
        .with_context(|| format!("saving screenshot to {}", path.display()))
}

pub fn dump_vram(ppu: &Ppu, path: &Path) -> anyhow::Result<()> {
    fs::write(path, ppu.vram_bytes()).with_context(|| format!("writing VRAM dump to {}", path.display()))
}
