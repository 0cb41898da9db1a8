//! Pane resolution: which horizontal chart strip a pointer event falls in,
//! and where inside it.
//!
//! The chart is a vertical stack of panes sharing one horizontal plotting
//! region. [`PaneResolver`] is the contract the handler consumes;
//! [`PaneLayout`] is the reference implementation driven by the content
//! bounds the layout pass reports.

#[cfg(test)]
#[path = "pane_test.rs"]
mod pane_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::CANDLE_PANE_ID;
use crate::input::PointerEvent;

/// Identity of a chart pane.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(String);

impl PaneId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The primary candlestick pane.
    #[must_use]
    pub fn candle() -> Self {
        Self::new(CANDLE_PANE_ID)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A pointer event resolved into a pane.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneLocation {
    pub pane_id: PaneId,
    /// Vertical position relative to the pane's content top.
    pub y: f64,
}

/// Maps raw pointer events onto panes.
pub trait PaneResolver {
    /// Resolve the pane under `event`. `None` when outside every pane.
    fn resolve(&self, event: &PointerEvent) -> Option<PaneLocation>;

    /// Whether `x` lies inside the horizontal plotting region.
    fn is_valid_x(&self, x: f64) -> bool;
}

/// Vertical content bounds of one pane, chart-relative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneBounds {
    pub top: f64,
    pub bottom: f64,
}

/// Pane layout as reported by the chart's layout pass.
#[derive(Debug, Clone, Default)]
pub struct PaneLayout {
    content_left: f64,
    content_right: f64,
    panes: Vec<(PaneId, PaneBounds)>,
}

impl PaneLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal extent of the plotting region.
    pub fn set_content_width(&mut self, left: f64, right: f64) {
        self.content_left = left;
        self.content_right = right;
    }

    /// Insert or update the vertical bounds of `pane_id`. Panes keep the
    /// order in which they were first reported.
    pub fn set_pane_bounds(&mut self, pane_id: PaneId, top: f64, bottom: f64) {
        let bounds = PaneBounds { top, bottom };
        match self.panes.iter_mut().find(|(id, _)| *id == pane_id) {
            Some((_, existing)) => *existing = bounds,
            None => self.panes.push((pane_id, bounds)),
        }
    }

    /// Drop a pane from the layout. Returns whether it was present.
    pub fn remove_pane(&mut self, pane_id: &PaneId) -> bool {
        let before = self.panes.len();
        self.panes.retain(|(id, _)| id != pane_id);
        self.panes.len() != before
    }

    #[must_use]
    pub fn bounds(&self, pane_id: &PaneId) -> Option<PaneBounds> {
        self.panes.iter().find(|(id, _)| id == pane_id).map(|(_, b)| *b)
    }
}

impl PaneResolver for PaneLayout {
    fn resolve(&self, event: &PointerEvent) -> Option<PaneLocation> {
        self.panes
            .iter()
            .find(|(_, b)| event.y > b.top && event.y < b.bottom)
            .map(|(id, b)| PaneLocation { pane_id: id.clone(), y: event.y - b.top })
    }

    fn is_valid_x(&self, x: f64) -> bool {
        x > 0.0 && x < self.content_right - self.content_left
    }
}
