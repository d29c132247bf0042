//! RGB color type

use crate::error::KeyboardError;

/// RGB color value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    /// Create a new RGB color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel bytes in wire order (red, green, blue)
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Black (all LEDs off)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (all LEDs full)
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Red
    pub const RED: Self = Self::new(255, 0, 0);
    /// Green
    pub const GREEN: Self = Self::new(0, 255, 0);
    /// Blue
    pub const BLUE: Self = Self::new(0, 0, 255);
}

impl TryFrom<(i64, i64, i64)> for RgbColor {
    type Error = KeyboardError;

    /// Checks every component; reports all of them if any is out of range
    fn try_from((r, g, b): (i64, i64, i64)) -> Result<Self, Self::Error> {
        match (u8::try_from(r), u8::try_from(g), u8::try_from(b)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Self { r, g, b }),
            _ => Err(KeyboardError::InvalidColor {
                values: vec![r, g, b],
            }),
        }
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl std::fmt::Display for RgbColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
