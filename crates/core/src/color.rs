//! RGB colors and the SVTR brand palette.

use serde::{Deserialize, Serialize};

/// A 24-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Upper-case hex form used by `a:srgbClr`, e.g. `2962FF`.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse a six-digit hex color, with or without a leading `#`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('#');
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Primary brand color.
pub const SVTR_BLUE: Rgb = Rgb::new(41, 98, 255);

/// Dark brand color, used for headings and body text.
pub const SVTR_DARK: Rgb = Rgb::new(26, 32, 44);

/// Light brand color.
pub const SVTR_LIGHT: Rgb = Rgb::new(237, 242, 247);

pub const WHITE: Rgb = Rgb::new(255, 255, 255);

/// Muted text on the blue cover.
pub const PALE_BLUE: Rgb = Rgb::new(200, 220, 255);
