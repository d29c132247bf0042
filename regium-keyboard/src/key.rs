//! Key model: a labelled LED with three channel coordinates

use crate::error::KeyboardError;
use crate::led::RgbColor;

/// Location of one color channel byte: which step buffer, which byte in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub step: usize,
    pub offset: usize,
}

impl Coordinate {
    pub const fn new(step: usize, offset: usize) -> Self {
        Self { step, offset }
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((step, offset): (usize, usize)) -> Self {
        Self { step, offset }
    }
}

/// A key on the keyboard
///
/// Coordinates are fixed at construction, one per channel in red, green,
/// blue order. The color starts black and only changes through
/// [`Key::set_color`], which never leaves a half-applied value behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    label: String,
    color: RgbColor,
    coordinates: [Coordinate; 3],
}

impl Key {
    pub fn new(label: impl Into<String>, coordinates: [Coordinate; 3]) -> Self {
        Self {
            label: label.into(),
            color: RgbColor::BLACK,
            coordinates,
        }
    }

    /// Build a key from an untyped coordinate table, e.g. loaded from a file
    ///
    /// The table must hold exactly three pairs of exactly two non-negative
    /// integers.
    pub fn from_raw(label: impl Into<String>, table: &[Vec<i64>]) -> Result<Self, KeyboardError> {
        let label = label.into();
        let shape_error = |reason: String| KeyboardError::InvalidIndexShape {
            label: label.clone(),
            reason,
        };

        if table.len() != 3 {
            return Err(shape_error(format!(
                "expected 3 coordinates, found {}",
                table.len()
            )));
        }

        let mut coordinates = [Coordinate::new(0, 0); 3];
        for (slot, pair) in coordinates.iter_mut().zip(table) {
            let [step, offset] = pair.as_slice() else {
                return Err(shape_error(format!(
                    "expected 2 values per coordinate, found {}",
                    pair.len()
                )));
            };
            let (Ok(step), Ok(offset)) = (usize::try_from(*step), usize::try_from(*offset))
            else {
                return Err(shape_error(format!(
                    "negative coordinate ({step}, {offset})"
                )));
            };
            *slot = Coordinate::new(step, offset);
        }

        Ok(Self::new(label, coordinates))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color(&self) -> RgbColor {
        self.color
    }

    pub fn coordinates(&self) -> &[Coordinate; 3] {
        &self.coordinates
    }

    /// Set the key color; out-of-range components leave the key untouched
    pub fn set_color(&mut self, rgb: (i64, i64, i64)) -> Result<(), KeyboardError> {
        self.color = RgbColor::try_from(rgb)?;
        Ok(())
    }

    /// Set an already validated color
    pub fn set_rgb(&mut self, color: RgbColor) {
        self.color = color;
    }

    /// Channel bytes paired with where they go
    pub fn channel_writes(&self) -> impl Iterator<Item = (Coordinate, u8)> + '_ {
        self.coordinates
            .iter()
            .copied()
            .zip(self.color.channels())
    }
}
