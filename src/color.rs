use std::str::FromStr;

use crate::foundation::error::{CaptionError, CaptionResult};

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Construct from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an `[r, g, b]` array.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

const NAMED_COLORS: &[(&str, Rgb8)] = &[
    ("black", Rgb8::new(0x00, 0x00, 0x00)),
    ("white", Rgb8::new(0xff, 0xff, 0xff)),
    ("yellow", Rgb8::new(0xff, 0xff, 0x00)),
    ("red", Rgb8::new(0xff, 0x00, 0x00)),
    ("blue", Rgb8::new(0x00, 0x00, 0xff)),
    ("green", Rgb8::new(0x00, 0xff, 0x00)),
    ("gray", Rgb8::new(0x80, 0x80, 0x80)),
    ("grey", Rgb8::new(0x80, 0x80, 0x80)),
];

/// Resolve a color name (case-insensitive) or `#RRGGBB` hex code.
pub fn resolve(spec: &str) -> CaptionResult<Rgb8> {
    let s = spec.trim();
    let Some(hex) = s.strip_prefix('#') else {
        return NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, c)| *c)
            .ok_or_else(|| CaptionError::invalid_color(format!("unknown color name \"{spec}\"")));
    };

    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CaptionError::invalid_color(format!(
            "\"{spec}\" is not a #RRGGBB hex code"
        )));
    }

    let byte = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| CaptionError::invalid_color(format!("invalid hex byte in \"{spec}\"")))
    };
    Ok(Rgb8::new(byte(0)?, byte(2)?, byte(4)?))
}

impl FromStr for Rgb8 {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl serde::Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        resolve(&s).map_err(serde::de::Error::custom)
    }
}
