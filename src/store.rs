//! Overlay catalog and operate-state store.
//!
//! [`OverlayStore`] is everything the handler needs from the chart's data
//! layer: the overlay sequences, the last-published operate state, and the
//! few mutations the handler performs (publish, drag flag, removal,
//! invalidation). [`ChartStore`] is the in-memory implementation.
//!
//! Scan order is insertion order. The handler relies on it for
//! first-match-wins dispatch, and on the last graphic mark being the only one
//! that may still be drawing.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OverlayError;
use crate::hit::{AnnotationOperate, GraphicMarkOperate, MarkHit};
use crate::overlay::{self, AnnotationHandle, MarkHandle, OverlayId};
use crate::pane::PaneId;

/// How much of the chart the renderer must redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidateLevel {
    /// Nothing pending.
    #[default]
    None,
    /// Overlay layer only; the cheapest partial repaint.
    Overlay,
    /// Main series and overlays.
    Main,
    /// Everything, including axes.
    Full,
}

/// Data-layer contract consumed by the overlay handler.
pub trait OverlayStore {
    /// Graphic marks in insertion order.
    fn graphic_marks(&self) -> Vec<MarkHandle>;

    /// Annotations visible on `pane_id`, in insertion order. `None` when the
    /// pane has no annotation collection at all.
    fn visible_annotations(&self, pane_id: &PaneId) -> Option<Vec<AnnotationHandle>>;

    /// Last-published graphic mark hover / click state.
    fn graphic_mark_operate(&self) -> GraphicMarkOperate;

    /// Last-published annotation hover state.
    fn annotation_operate(&self) -> AnnotationOperate;

    /// Publish new operate state. `None` leaves the annotation state as is.
    fn set_overlay_operate(&mut self, mark: GraphicMarkOperate, annotation: Option<AnnotationOperate>);

    /// Flag that a control point drag is in progress.
    fn set_drag_graphic_mark_flag(&mut self, dragging: bool);

    /// Remove the graphic mark with `id`. Returns whether one was removed.
    fn remove_graphic_mark(&mut self, id: &OverlayId) -> bool;

    /// Request a repaint at `level`.
    fn invalidate(&mut self, level: InvalidateLevel);
}

/// In-memory overlay catalog and operate-state store.
#[derive(Default)]
pub struct ChartStore {
    marks: Vec<MarkHandle>,
    annotations: HashMap<PaneId, Vec<AnnotationHandle>>,
    mark_operate: GraphicMarkOperate,
    annotation_operate: AnnotationOperate,
    dragging: bool,
    pending: InvalidateLevel,
}

impl ChartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a graphic mark.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::DrawingInProgress`] if the current tail mark is
    /// still drawing; only the newest mark may be mid-drawing.
    pub fn add_graphic_mark(&mut self, mark: MarkHandle) -> Result<(), OverlayError> {
        if let Some(tail) = self.marks.last() {
            let tail = overlay::borrow(tail)?;
            if tail.is_drawing() {
                return Err(OverlayError::DrawingInProgress { id: tail.id().clone() });
            }
        }
        self.marks.push(mark);
        self.invalidate(InvalidateLevel::Overlay);
        Ok(())
    }

    /// Append an annotation to `pane_id`, creating the pane's collection on
    /// first use.
    pub fn add_annotation(&mut self, pane_id: PaneId, annotation: AnnotationHandle) {
        self.annotations.entry(pane_id).or_default().push(annotation);
        self.invalidate(InvalidateLevel::Overlay);
    }

    /// Remove the annotation with `id` from `pane_id`. Returns whether one was removed.
    pub fn remove_annotation(&mut self, pane_id: &PaneId, id: &OverlayId) -> bool {
        let Some(list) = self.annotations.get_mut(pane_id) else {
            return false;
        };
        let before = list.len();
        list.retain(|a| a.try_borrow().map_or(true, |a| a.id() != id));
        let removed = list.len() != before;
        if removed {
            self.invalidate(InvalidateLevel::Overlay);
        }
        removed
    }

    /// Number of graphic marks.
    #[must_use]
    pub fn graphic_mark_count(&self) -> usize {
        self.marks.len()
    }

    /// Whether a control-point drag is in progress.
    #[must_use]
    pub fn is_dragging_graphic_mark(&self) -> bool {
        self.dragging
    }

    /// Highest repaint level requested since the last call; resets to `None`.
    pub fn take_invalidation(&mut self) -> InvalidateLevel {
        std::mem::take(&mut self.pending)
    }

    /// Highest repaint level requested so far, without resetting it.
    #[must_use]
    pub fn pending_invalidation(&self) -> InvalidateLevel {
        self.pending
    }
}

impl OverlayStore for ChartStore {
    fn graphic_marks(&self) -> Vec<MarkHandle> {
        self.marks.clone()
    }

    fn visible_annotations(&self, pane_id: &PaneId) -> Option<Vec<AnnotationHandle>> {
        self.annotations.get(pane_id).cloned()
    }

    fn graphic_mark_operate(&self) -> GraphicMarkOperate {
        self.mark_operate.clone()
    }

    fn annotation_operate(&self) -> AnnotationOperate {
        self.annotation_operate.clone()
    }

    fn set_overlay_operate(&mut self, mark: GraphicMarkOperate, annotation: Option<AnnotationOperate>) {
        let mut changed = false;
        if mark != self.mark_operate {
            self.mark_operate = mark;
            changed = true;
        }
        if let Some(annotation) = annotation {
            if annotation.id != self.annotation_operate.id {
                changed = true;
            }
            self.annotation_operate = annotation;
        }
        if changed {
            self.invalidate(InvalidateLevel::Overlay);
        }
    }

    fn set_drag_graphic_mark_flag(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    fn remove_graphic_mark(&mut self, id: &OverlayId) -> bool {
        let before = self.marks.len();
        self.marks.retain(|m| m.try_borrow().map_or(true, |m| m.id() != id));
        let removed = self.marks.len() != before;
        if removed {
            debug!(%id, remaining = self.marks.len(), "graphic mark removed");
            if self.mark_operate.hover.id == *id {
                self.mark_operate.hover = MarkHit::neutral();
            }
            if self.mark_operate.click.id == *id {
                self.mark_operate.click = MarkHit::neutral();
            }
            self.invalidate(InvalidateLevel::Overlay);
        }
        removed
    }

    fn invalidate(&mut self, level: InvalidateLevel) {
        self.pending = self.pending.max(level);
    }
}
