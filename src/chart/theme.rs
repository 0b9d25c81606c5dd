//! Chart palette.
//!
//! A `Theme` is a plain value: built once from config and handed to the
//! composer and renderer. Nothing mutates renderer-wide defaults.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// An opaque RGB color, written `#rrggbb` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn color(self) -> RGBColor {
        RGBColor(self.0, self.1, self.2)
    }

    /// Blend towards white by `amount` (0 = unchanged, 1 = white).
    pub fn lighten(self, amount: f64) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f64 + (255.0 - c as f64) * amount).round() as u8;
        Rgb(mix(self.0), mix(self.1), mix(self.2))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}': expected #rrggbb")]
pub struct InvalidColor(String);

impl FromStr for Rgb {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| InvalidColor(s.to_string()))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

const fn hex(v: u32) -> Rgb {
    Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

/// Colors used for every chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Theme {
    pub background: Rgb,
    pub axes: Rgb,
    pub edge: Rgb,
    pub text: Rgb,
    pub title: Rgb,
    pub grid: Rgb,
    pub legend_edge: Rgb,
    pub reference: Rgb,
    pub reference_text: Rgb,
    /// Fixed colors per benchmark group (lowercase names).
    pub group_colors: IndexMap<String, Rgb>,
    /// Fixed colors per source.
    pub source_colors: IndexMap<String, Rgb>,
    /// Secondary color per source, for the second group of a source.
    pub source_accents: IndexMap<String, Rgb>,
    /// Fallback cycle for anything without a fixed color.
    pub palette: Vec<Rgb>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: hex(0x0f1116),
            axes: hex(0x111318),
            edge: hex(0xc7c7c7),
            text: hex(0xe6e6e6),
            title: hex(0xf0f0f0),
            grid: hex(0x3a3f4b),
            legend_edge: hex(0x2a2f3a),
            reference: hex(0xa0a0a0),
            reference_text: hex(0xb8b8b8),
            group_colors: IndexMap::from([
                ("knitting".to_string(), hex(0x1f77b4)),
                ("worker".to_string(), hex(0xff7f0e)),
                ("websocket".to_string(), hex(0x2ca02c)),
                ("http".to_string(), hex(0xd62728)),
            ]),
            source_colors: IndexMap::from([
                ("Node.js".to_string(), hex(0x1f77b4)),
                ("Deno".to_string(), hex(0x2ca02c)),
                ("Bun".to_string(), hex(0xd62728)),
            ]),
            source_accents: IndexMap::from([
                ("Node.js".to_string(), hex(0xaec7e8)),
                ("Deno".to_string(), hex(0x98df8a)),
                ("Bun".to_string(), hex(0xff9896)),
            ]),
            palette: vec![
                hex(0x1f77b4),
                hex(0xff7f0e),
                hex(0x2ca02c),
                hex(0xd62728),
                hex(0x9467bd),
                hex(0x8c564b),
                hex(0xe377c2),
                hex(0x7f7f7f),
                hex(0xbcbd22),
                hex(0x17becf),
            ],
        }
    }
}

impl Theme {
    fn cycle(&self, index: usize) -> Rgb {
        if self.palette.is_empty() {
            return self.text;
        }
        self.palette[index % self.palette.len()]
    }

    pub fn group_color(&self, group: &str, index: usize) -> Rgb {
        self.group_colors
            .get(&group.to_lowercase())
            .copied()
            .unwrap_or_else(|| self.cycle(index))
    }

    pub fn source_color(&self, source: &str, index: usize) -> Rgb {
        self.source_colors
            .get(source)
            .copied()
            .unwrap_or_else(|| self.cycle(index))
    }

    pub fn source_accent(&self, source: &str, index: usize) -> Rgb {
        self.source_accents
            .get(source)
            .copied()
            .unwrap_or_else(|| self.source_color(source, index).lighten(0.55))
    }
}
