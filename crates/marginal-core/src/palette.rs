//! Colors for plan elements
//!
//! Label groups get colors from a categorical cycle (the tab10 set);
//! the unconditional density curve is drawn in a neutral gray. Colors
//! serialize as `#RRGGBB` strings so a renderer can use them directly.

use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Parse `#RRGGBB` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let packed = u32::from_str_radix(digits, 16).ok()?;
        Some(Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Neutral gray used for the unconditional density curve
    pub fn gray() -> Self {
        Self {
            r: 0x80,
            g: 0x80,
            b: 0x80,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::gray()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(hex: String) -> Result<Self, Self::Error> {
        Color::from_hex(&hex).ok_or_else(|| format!("invalid hex color '{}'", hex))
    }
}

const TAB10: [&str; 10] = [
    "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B", "#E377C2", "#7F7F7F",
    "#BCBD22", "#17BECF",
];

/// Categorical colors, cycling when there are more groups than colors
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    /// The default ten-color categorical palette
    pub fn categorical() -> Self {
        Self::new(TAB10.iter().filter_map(|hex| Color::from_hex(hex)).collect())
    }

    /// Color for group `index`
    pub fn color(&self, index: usize) -> Color {
        if self.colors.is_empty() {
            return Color::default();
        }
        self.colors[index % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::categorical()
    }
}
