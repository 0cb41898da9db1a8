//! The overlay event handler.
//!
//! Consumes normalized pointer events and drives hover, click, drawing and
//! drag state for every overlay on the chart. Each entry point resolves the
//! event into a pane, scans overlays in insertion order (graphic marks, then
//! the pane's annotations), dispatches lifecycle hooks to whatever was hit,
//! and publishes the resulting operate state back into the store.
//!
//! A graphic mark that is still drawing is always the last one in the
//! catalog. While it exists, moves and presses are routed to it alone: no
//! hover scan runs, clicks go to its drawing handler, and drags are ignored.
//!
//! Hook failures propagate. The first failing hook aborts the remaining
//! dispatch for that event and nothing is published for it.

#[cfg(test)]
#[path = "handler_test.rs"]
mod handler_test;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::HandlerConfig;
use crate::error::OverlayError;
use crate::geom::Coordinate;
use crate::hit::{GraphicMarkOperate, HitTestResult, MarkHit, OperateElement};
use crate::input::PointerEvent;
use crate::overlay::{self, MarkHandle, Overlay, OverlayEvent, OverlayId};
use crate::pane::{PaneLocation, PaneResolver};
use crate::store::{InvalidateLevel, OverlayStore};
use crate::throttle::FrameThrottle;

/// Pointer-driven state machine for graphic marks and annotations.
pub struct OverlayEventHandler<R> {
    resolver: R,
    config: HandlerConfig,
    /// Mark whose control point is being dragged.
    pressed: Option<MarkHandle>,
    throttle: FrameThrottle,
}

impl<R: PaneResolver> OverlayEventHandler<R> {
    #[must_use]
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, HandlerConfig::default())
    }

    #[must_use]
    pub fn with_config(resolver: R, config: HandlerConfig) -> Self {
        let throttle = FrameThrottle::new(config.throttle);
        Self { resolver, config, pressed: None, throttle }
    }

    // --- Accessors ---

    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Mutable access to the resolver, e.g. to feed it new pane bounds.
    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    #[must_use]
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// The mark whose control point is currently pressed, if any.
    #[must_use]
    pub fn pressed_graphic_mark(&self) -> Option<&MarkHandle> {
        self.pressed.as_ref()
    }

    /// Whether the move gate is closed; moves arriving now are dropped.
    #[must_use]
    pub fn is_move_pending(&self) -> bool {
        self.throttle.is_closed()
    }

    /// The host painted a frame. Reopens the move gate.
    pub fn on_animation_frame(&mut self) {
        self.throttle.next_frame();
    }

    // --- Pointer events ---

    /// Pointer moved with no button held.
    ///
    /// Ignored when the event lies outside the plotting region or every pane,
    /// or while an earlier move still holds the gate.
    ///
    /// # Errors
    ///
    /// Propagates the first overlay hook failure. The move gate is released
    /// either way.
    pub fn on_mouse_move<S>(&mut self, store: &mut S, event: &PointerEvent) -> Result<(), OverlayError>
    where
        S: OverlayStore + ?Sized,
    {
        let Some(location) = self.locate(event) else {
            trace!(x = event.x, y = event.y, "move outside panes ignored");
            return Ok(());
        };
        if !self.throttle.try_acquire() {
            trace!(x = event.x, y = event.y, "move dropped; gate closed");
            return Ok(());
        }
        let result = process_move(store, event, &location);
        self.throttle.release();
        result
    }

    /// Primary button went down.
    ///
    /// # Errors
    ///
    /// Propagates the first overlay hook failure; nothing is published then.
    pub fn on_mouse_down<S>(&mut self, store: &mut S, event: &PointerEvent) -> Result<(), OverlayError>
    where
        S: OverlayStore + ?Sized,
    {
        let Some(location) = self.locate(event) else {
            return Ok(());
        };
        let coordinate = Coordinate::new(event.x, location.y);
        let marks = store.graphic_marks();
        let mut hover = MarkHit::neutral();
        let mut click = None;

        if let Some(tail) = drawing_tail(&marks)? {
            {
                let mut mark = overlay::borrow_mut(&tail)?;
                mark.on_drawing_press(coordinate);
                debug!(id = %mark.id(), drawing = mark.is_drawing(), "drawing point placed");
            }
            click = HitTestResult::probe(&tail, coordinate)?;
        } else {
            if let Some((mark, hit)) = find_hit(&marks, coordinate)? {
                if hit.element == OperateElement::Point {
                    debug!(id = %hit.id, index = ?hit.element_index, "control point pressed");
                    self.pressed = Some(Rc::clone(mark));
                    store.set_drag_graphic_mark_flag(true);
                    hover = hit.clone();
                }
                dispatch(mark, &hit.id, event, |m, p| m.on_click(p))?;
                click = Some(hit);
            }
            if let Some(annotations) = store.visible_annotations(&location.pane_id) {
                if let Some((annotation, hit)) = find_hit(&annotations, coordinate)? {
                    dispatch(annotation, &hit.id, event, |a, p| a.on_click(p))?;
                }
            }
        }

        store.set_overlay_operate(GraphicMarkOperate { hover, click: click.unwrap_or_default() }, None);
        Ok(())
    }

    /// Secondary button went down.
    ///
    /// On the primary pane the first graphic mark hit gets `on_right_click`;
    /// if it declines, the mark is removed. The first annotation hit on the
    /// resolved pane gets `on_right_click` too, but annotations are never
    /// removed here.
    ///
    /// # Errors
    ///
    /// Propagates the first overlay hook failure.
    pub fn on_mouse_right_down<S>(&mut self, store: &mut S, event: &PointerEvent) -> Result<(), OverlayError>
    where
        S: OverlayStore + ?Sized,
    {
        let Some(location) = self.resolver.resolve(event) else {
            return Ok(());
        };
        let coordinate = Coordinate::new(event.x, location.y);

        if location.pane_id == self.config.primary_pane {
            let marks = store.graphic_marks();
            if let Some((mark, hit)) = find_hit(&marks, coordinate)? {
                let claimed = dispatch(mark, &hit.id, event, |m, p| m.on_right_click(p))?;
                if !claimed {
                    debug!(id = %hit.id, "right click declined; removing graphic mark");
                    store.remove_graphic_mark(&hit.id);
                }
            }
        }

        if let Some(annotations) = store.visible_annotations(&location.pane_id) {
            if let Some((annotation, hit)) = find_hit(&annotations, coordinate)? {
                let claimed = dispatch(annotation, &hit.id, event, |a, p| a.on_right_click(p))?;
                trace!(id = %hit.id, claimed, "annotation right click");
            }
        }
        Ok(())
    }

    /// Pointer moved with the primary button held.
    ///
    /// Moves the pressed control point to the raw event position. Does
    /// nothing while a mark is drawing or when no point is pressed.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Reentrant`] if an overlay is already borrowed.
    pub fn on_pressed_mouse_move<S>(&mut self, store: &mut S, event: &PointerEvent) -> Result<(), OverlayError>
    where
        S: OverlayStore + ?Sized,
    {
        let Some(pressed) = self.pressed.as_ref() else {
            return Ok(());
        };
        if drawing_tail(&store.graphic_marks())?.is_some() {
            trace!("drag suppressed while drawing");
            return Ok(());
        }
        overlay::borrow_mut(pressed)?.on_pressed_move(Coordinate::new(event.x, event.y), event);
        store.invalidate(InvalidateLevel::Overlay);
        Ok(())
    }

    /// Primary button released. Ends any control-point drag.
    pub fn on_mouse_up<S>(&mut self, store: &mut S)
    where
        S: OverlayStore + ?Sized,
    {
        if let Some(mark) = self.pressed.take() {
            if let Ok(mark) = mark.try_borrow() {
                debug!(id = %mark.id(), "control point released");
            }
            store.set_drag_graphic_mark_flag(false);
        }
    }

    /// Resolve `event` into a pane, rejecting positions outside the plotting
    /// region.
    fn locate(&self, event: &PointerEvent) -> Option<PaneLocation> {
        if !self.resolver.is_valid_x(event.x) {
            return None;
        }
        self.resolver.resolve(event)
    }
}

/// Body of [`OverlayEventHandler::on_mouse_move`] once the gate is held.
fn process_move<S>(store: &mut S, event: &PointerEvent, location: &PaneLocation) -> Result<(), OverlayError>
where
    S: OverlayStore + ?Sized,
{
    let coordinate = Coordinate::new(event.x, location.y);
    let marks = store.graphic_marks();
    let previous = store.graphic_mark_operate();

    let (mark_operate, annotation_hover) = if let Some(tail) = drawing_tail(&marks)? {
        overlay::borrow_mut(&tail)?.on_drawing_move(coordinate);
        let hover = HitTestResult::probe(&tail, coordinate)?;
        (GraphicMarkOperate { hover: hover.unwrap_or_default(), click: MarkHit::neutral() }, None)
    } else {
        let hover = perform_hover(&marks, &previous.hover, coordinate, event)?;
        let annotation_hover = match store.visible_annotations(&location.pane_id) {
            Some(annotations) => perform_hover(&annotations, &store.annotation_operate(), coordinate, event)?,
            None => None,
        };
        (GraphicMarkOperate { hover: hover.unwrap_or_default(), click: previous.click }, annotation_hover)
    };

    store.set_overlay_operate(mark_operate, Some(annotation_hover.unwrap_or_default()));
    Ok(())
}

/// The last mark, if it is still drawing.
fn drawing_tail(marks: &[MarkHandle]) -> Result<Option<MarkHandle>, OverlayError> {
    let Some(tail) = marks.last() else {
        return Ok(None);
    };
    let drawing = overlay::borrow(tail)?.is_drawing();
    Ok(drawing.then(|| Rc::clone(tail)))
}

/// First overlay in `overlays` hit at `coordinate`, with its hit result.
fn find_hit<T>(
    overlays: &[Rc<RefCell<T>>],
    coordinate: Coordinate,
) -> Result<Option<(&Rc<RefCell<T>>, HitTestResult<T>)>, OverlayError>
where
    T: Overlay + ?Sized,
{
    for candidate in overlays {
        if let Some(hit) = HitTestResult::probe(candidate, coordinate)? {
            return Ok(Some((candidate, hit)));
        }
    }
    Ok(None)
}

/// Invoke `hook` on `handle` with the standard `{id, points, event}` payload.
fn dispatch<T, U>(
    handle: &Rc<RefCell<T>>,
    id: &OverlayId,
    event: &PointerEvent,
    hook: impl FnOnce(&mut T, &OverlayEvent<'_>) -> Result<U, OverlayError>,
) -> Result<U, OverlayError>
where
    T: Overlay + ?Sized,
{
    let mut target = overlay::borrow_mut(handle)?;
    let points = target.points();
    let payload = OverlayEvent { id, points: &points, event };
    hook(&mut *target, &payload)
}

/// Hover diff for one overlay category.
///
/// Scans `overlays` for the first hit and, if its identity differs from
/// `previous`, fires leave on the previous overlay and then enter on the new
/// one. Enter/leave only fire for mouse events. Returns the new hit.
fn perform_hover<T>(
    overlays: &[Rc<RefCell<T>>],
    previous: &HitTestResult<T>,
    coordinate: Coordinate,
    event: &PointerEvent,
) -> Result<Option<HitTestResult<T>>, OverlayError>
where
    T: Overlay + ?Sized,
{
    let hover = find_hit(overlays, coordinate)?.map(|(_, hit)| hit);
    let changed = hover.as_ref().map_or(true, |h| h.id != previous.id);
    if !changed || !event.is_mouse() {
        return Ok(hover);
    }

    if !previous.id.is_none() {
        if let Some(instance) = previous.instance() {
            debug!(id = %previous.id, "overlay mouse leave");
            dispatch(&instance, &previous.id, event, |o, p| o.on_mouse_leave(p))?;
        }
    }
    if let Some(hit) = hover.as_ref().filter(|h| !h.id.is_none()) {
        if let Some(instance) = hit.instance() {
            debug!(id = %hit.id, element = ?hit.element, "overlay mouse enter");
            dispatch(&instance, &hit.id, event, |o, p| o.on_mouse_enter(p))?;
        }
    }
    Ok(hover)
}
