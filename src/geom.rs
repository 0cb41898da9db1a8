#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A pane-local pixel position.
///
/// `x` is measured from the left edge of the plotting region, `y` from the
/// top of the pane the point was resolved into.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in pixels.
    #[must_use]
    pub fn distance(&self, other: Coordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
