mod config;
mod output;
mod pacing;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use snes_console::Overflow;
use snes_console::boot::{BootScript, boot};
use snes_ppu::{Ppu, render, text_runs};
use tracing::{Level, info};
use tracing_subscriber::util::SubscriberInitExt;

use crate::pacing::Paced;

#[derive(Parser)]
#[command(name = "hello")]
#[command(version, about = "Bring up the SNES text console on an emulated PPU", long_about = None)]
struct Cli {
    /// JSON boot script (defaults to the built-in hello world sequence)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Idle for this many frames, then exit (idles forever if not given)
    #[arg(short, long)]
    frames: Option<u64>,

    /// Print the text found in the tile map once the screen is on
    #[arg(short, long)]
    print: bool,

    /// Save the displayed frame as a PNG
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Write the raw 64 KiB of VRAM to a file
    #[arg(long)]
    dump_vram: Option<PathBuf>,

    /// Run frames as fast as possible instead of at 60 Hz
    #[arg(long)]
    unpaced: bool,

    /// Clip text that runs off the map instead of failing
    #[arg(long)]
    clip: bool,

    /// More logging; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .compact()
        .finish()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = cli.script.as_deref().map(config::load).transpose()?;
    let steps = match &config {
        Some(config) => config.steps()?,
        None => Vec::new(),
    };
    let mut script = match &config {
        Some(config) => config.script(&steps)?,
        None => BootScript::hello(),
    };
    if cli.clip {
        script.overflow = Overflow::Clip;
    }

    let hw = if cli.unpaced {
        Paced::unpaced(Ppu::new())
    } else {
        Paced::ntsc(Ppu::new())
    };
    let mut console = boot(hw, &script).context("console bring-up failed")?;

    let ppu = console.hw().inner();
    if cli.print {
        let runs = text_runs(ppu, &script.font, &script.layout);
        output::print_runs(&runs, &mut io::stdout().lock())?;
    }
    if let Some(path) = &cli.screenshot {
        output::save_screenshot(&render(ppu), path)?;
        info!(path = %path.display(), "saved screenshot");
    }
    if let Some(path) = &cli.dump_vram {
        output::dump_vram(ppu, path)?;
        info!(path = %path.display(), "dumped VRAM");
    }

    match cli.frames {
        Some(frames) => {
            console.idle_for(frames).context("idle loop")?;
            info!(frames, "idle finished");
            Ok(())
        }
        None => console.idle(),
    }
}
