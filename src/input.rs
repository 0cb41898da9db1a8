//! Input model: the pointer event as seen by the overlay handler.
//!
//! The host normalizes raw DOM / windowing events into [`PointerEvent`]s
//! before handing them over. Button classification has already happened at
//! that point: the host picks which handler method to call (down, right-down,
//! pressed-move, up). The handler only needs the chart-local position and the
//! originating device, which gates hover enter/leave callbacks.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

/// Which kind of device produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerDevice {
    /// Mouse or trackpad cursor (default).
    #[default]
    Mouse,
    /// Finger on a touch surface.
    Touch,
    /// Stylus.
    Pen,
}

/// A normalized pointer event.
///
/// `x` / `y` are relative to the chart's content origin: `x` from the left
/// edge of the plotting region, `y` from the top of the chart (not yet
/// resolved into a pane).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Horizontal position in CSS pixels.
    pub x: f64,
    /// Vertical position in CSS pixels, chart-relative.
    pub y: f64,
    /// Originating device.
    pub device: PointerDevice,
}

impl PointerEvent {
    /// A mouse event at `(x, y)`.
    #[must_use]
    pub fn mouse(x: f64, y: f64) -> Self {
        Self { x, y, device: PointerDevice::Mouse }
    }

    /// A touch event at `(x, y)`.
    #[must_use]
    pub fn touch(x: f64, y: f64) -> Self {
        Self { x, y, device: PointerDevice::Touch }
    }

    /// Whether the event came from a mouse. Hover enter/leave only fire for
    /// mouse events; touch has no hover.
    #[must_use]
    pub fn is_mouse(&self) -> bool {
        self.device == PointerDevice::Mouse
    }
}
