//! JSON boot scripts.
//!
//! ```json
//! {
//!   "font": { "row_offset": 0, "glyph_height": 16, "layer": 1 },
//!   "layout": { "map_base": "0x6800", "tile_base": "0x3000", "tile_offset": "0x0100" },
//!   "overflow": "reject",
//!   "steps": [
//!     { "color": { "fg": [31, 31, 0], "bg": [0, 0, 0] } },
//!     { "draw": { "col": 5, "row": 10, "text": "Hello World!" } }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, bail, ensure};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use snes_console::boot::{BootScript, BootStep};
use snes_console::{BgLayer, ColorPair, FontBinding, GlyphHeight, Overflow, Rgb15, SNES_FONT, VramLayout};

#[derive(Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BootConfig {
    #[serde(default)]
    pub font: FontConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub overflow: OverflowConfig,
    pub steps: Vec<StepConfig>,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    pub row_offset: u8,
    /// 8 or 16 pixels.
    pub glyph_height: u8,
    /// BG layer number, 1 to 4.
    pub layer: u8,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            row_offset: 0,
            glyph_height: 16,
            layer: 1,
        }
    }
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    #[serde(deserialize_with = "address")]
    pub map_base: u16,
    #[serde(deserialize_with = "address")]
    pub tile_base: u16,
    #[serde(deserialize_with = "address")]
    pub tile_offset: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let layout = VramLayout::default();
        Self {
            map_base: layout.map_base,
            tile_base: layout.tile_base,
            tile_offset: layout.tile_offset,
        }
    }
}

#[derive(Deserialize, Debug, Default, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OverflowConfig {
    #[default]
    Reject,
    Clip,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(rename_all = "lowercase", deny_unknown_fields)]
pub enum StepConfig {
    Color { fg: [u8; 3], bg: [u8; 3] },
    Draw { col: u16, row: u16, text: String },
}

impl StepConfig {
    fn to_boot_step(&self) -> anyhow::Result<BootStep<'_>> {
        Ok(match self {
            StepConfig::Color { fg, bg } => BootStep::Color(ColorPair::new(rgb15(*fg)?, rgb15(*bg)?)),
            StepConfig::Draw { col, row, text } => BootStep::Draw {
                col: *col,
                row: *row,
                text: text.as_str(),
            },
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAddress {
    Number(u16),
    Text(String),
}

/// Accepts `26624`, `"26624"`, `"0x6800"` or `"$6800"`.
pub fn parse_address(text: &str) -> Result<u16, String> {
    let text = text.trim();
    let hex = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix('$'));
    let parsed = match hex {
        Some(digits) => u16::from_str_radix(digits, 16),
        None => text.parse::<u16>(),
    };
    parsed.map_err(|e| format!("invalid address {text:?}: {e}"))
}

fn address<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    match RawAddress::deserialize(deserializer)? {
        RawAddress::Number(n) => Ok(n),
        RawAddress::Text(s) => parse_address(&s).map_err(D::Error::custom),
    }
}

fn rgb15([r, g, b]: [u8; 3]) -> anyhow::Result<Rgb15> {
    ensure!(r <= 31 && g <= 31 && b <= 31, "color channels must be 0-31, got [{r}, {g}, {b}]");
    Ok(Rgb15::new(r, g, b))
}

pub fn load(path: &Path) -> anyhow::Result<BootConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading boot script {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing boot script {}", path.display()))
}

impl BootConfig {
    pub fn binding(&self) -> anyhow::Result<FontBinding> {
        let Some(height) = GlyphHeight::from_pixels(self.font.glyph_height) else {
            bail!("glyph_height must be 8 or 16, got {}", self.font.glyph_height);
        };
        let Some(layer) = BgLayer::from_number(self.font.layer) else {
            bail!("layer must be 1-4, got {}", self.font.layer);
        };
        Ok(FontBinding::new(self.font.row_offset, height, &SNES_FONT).on_layer(layer))
    }

    pub fn layout(&self) -> VramLayout {
        VramLayout::new(self.layout.map_base, self.layout.tile_base, self.layout.tile_offset)
    }

    pub fn overflow(&self) -> Overflow {
        match self.overflow {
            OverflowConfig::Reject => Overflow::Reject,
            OverflowConfig::Clip => Overflow::Clip,
        }
    }

    pub fn steps(&self) -> anyhow::Result<Vec<BootStep<'_>>> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| step.to_boot_step().with_context(|| format!("step {i}")))
            .collect()
    }

    /// The script described by this config, replaying `steps` (from
    /// [`BootConfig::steps`]).
    pub fn script<'a>(&self, steps: &'a [BootStep<'a>]) -> anyhow::Result<BootScript<'a>> {
        Ok(BootScript {
            font: self.binding()?,
            layout: self.layout(),
            overflow: self.overflow(),
            steps,
        })
    }
}
