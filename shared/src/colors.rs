use serde::{Deserialize, Serialize};

/// 8-bit RGBA color as stored by the territory and guild collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Multiply the RGB channels by `factor`, clamping at 255 and truncating.
    pub fn scale_rgb(self, factor: f64) -> Self {
        Self {
            r: scale_channel(self.r, factor),
            g: scale_channel(self.g, factor),
            b: scale_channel(self.b, factor),
            a: self.a,
        }
    }

    /// Multiply only the alpha channel by `factor`, clamping at 255 and truncating.
    pub fn scale_alpha(self, factor: f64) -> Self {
        Self {
            a: scale_channel(self.a, factor),
            ..self
        }
    }

    /// Normalized `[r, g, b, a]` in 0..1 for vertex colors.
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Parse `#RRGGBB` (opaque) or `#RRGGBBAA`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::opaque(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

fn scale_channel(value: u8, factor: f64) -> u8 {
    (value as f64 * factor).clamp(0.0, 255.0) as u8
}

/// Deterministic guild color via CRC32 hash of guild name.
/// Used when a guild has no registered color of its own.
pub fn guild_color(name: &str) -> Rgba {
    let hash = crc32fast::hash(name.as_bytes());
    let bytes = hash.to_be_bytes();
    Rgba::opaque(bytes[0], bytes[1], bytes[2])
}

/// Rec. 601 luma of a normalized RGB triple.
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}
