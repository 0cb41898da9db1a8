//! Overlay capability model: ids, callback payloads, and the traits every
//! graphic mark and annotation implements.
//!
//! The mandatory surface is small: identity, ordered control points, and a
//! hit test. Lifecycle hooks (click, right-click, hover enter/leave) have
//! default no-op bodies, so an overlay opts in only to what it handles.
//! Geometry stays inside the overlay; the handler never inspects shapes.
//!
//! Overlays are shared between the catalog, the handler (pressed drag) and
//! published hit results, all on the UI thread, so they are held as
//! `Rc<RefCell<_>>` handles. Hit results keep only a `Weak` back-reference.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::OverlayError;
use crate::geom::Coordinate;
use crate::hit::Hit;
use crate::input::PointerEvent;

/// Identity of an overlay. The empty id means "no overlay".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayId(String);

impl OverlayId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The neutral, empty identity.
    #[must_use]
    pub fn none() -> Self {
        Self(String::new())
    }

    /// A fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OverlayId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Payload passed to every overlay lifecycle hook.
#[derive(Debug, Clone, Copy)]
pub struct OverlayEvent<'a> {
    /// Id of the overlay the hook is invoked on.
    pub id: &'a OverlayId,
    /// The overlay's ordered control points.
    pub points: &'a [Coordinate],
    /// The pointer event that triggered the hook.
    pub event: &'a PointerEvent,
}

/// Capabilities shared by graphic marks and annotations.
pub trait Overlay {
    /// Stable identity of this overlay.
    fn id(&self) -> &OverlayId;

    /// Ordered control points.
    fn points(&self) -> Vec<Coordinate>;

    /// Test whether `coordinate` (pane-local) touches this overlay.
    fn hit_test(&self, coordinate: Coordinate) -> Option<Hit>;

    /// Left click landed on this overlay.
    fn on_click(&mut self, _event: &OverlayEvent<'_>) -> Result<(), OverlayError> {
        Ok(())
    }

    /// Right click landed on this overlay. Return `true` to claim the click.
    ///
    /// A graphic mark that returns `false` is removed from the chart.
    fn on_right_click(&mut self, _event: &OverlayEvent<'_>) -> Result<bool, OverlayError> {
        Ok(false)
    }

    /// The mouse started hovering this overlay.
    fn on_mouse_enter(&mut self, _event: &OverlayEvent<'_>) -> Result<(), OverlayError> {
        Ok(())
    }

    /// The mouse stopped hovering this overlay.
    fn on_mouse_leave(&mut self, _event: &OverlayEvent<'_>) -> Result<(), OverlayError> {
        Ok(())
    }
}

/// A user-drawn shape with a drawing lifecycle and draggable control points.
pub trait GraphicMark: Overlay {
    /// Whether the mark is still collecting control points.
    fn is_drawing(&self) -> bool;

    /// The pointer moved while this mark is drawing (rubber-band preview).
    fn on_drawing_move(&mut self, coordinate: Coordinate);

    /// The primary button went down while this mark is drawing: place the
    /// next control point and advance the drawing sequence.
    fn on_drawing_press(&mut self, coordinate: Coordinate);

    /// The pointer moved with the button held after a control point was
    /// pressed: reposition that point.
    fn on_pressed_move(&mut self, coordinate: Coordinate, event: &PointerEvent);
}

/// A pane-anchored marker. Click and right-click only; no drawing, no drag.
pub trait Annotation: Overlay {}

/// Shared handle to a graphic mark.
pub type MarkHandle = Rc<RefCell<dyn GraphicMark>>;

/// Shared handle to an annotation.
pub type AnnotationHandle = Rc<RefCell<dyn Annotation>>;

/// Immutable borrow that reports re-entrancy as an error.
pub(crate) fn borrow<T: ?Sized>(cell: &RefCell<T>) -> Result<Ref<'_, T>, OverlayError> {
    cell.try_borrow().map_err(|_| OverlayError::Reentrant)
}

/// Mutable borrow that reports re-entrancy as an error.
pub(crate) fn borrow_mut<T: ?Sized>(cell: &RefCell<T>) -> Result<RefMut<'_, T>, OverlayError> {
    cell.try_borrow_mut().map_err(|_| OverlayError::Reentrant)
}
