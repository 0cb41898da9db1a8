//! End-to-end drawing session against the in-memory store and pane layout.
//!
//! Drives the handler the way a chart host would: draw a two-point segment,
//! hover it, drag an endpoint, right-click it away, and poke at an annotation
//! on a secondary pane. Published state is checked through its serialized
//! form, which is what a renderer would consume.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use overlay_events::config::HandlerConfig;
use overlay_events::geom::Coordinate;
use overlay_events::hit::Hit;
use overlay_events::input::PointerEvent;
use overlay_events::overlay::{Annotation, GraphicMark, Overlay, OverlayEvent, OverlayId};
use overlay_events::pane::{PaneId, PaneLayout};
use overlay_events::store::{ChartStore, InvalidateLevel, OverlayStore};
use overlay_events::{OverlayError, OverlayEventHandler};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

// =============================================================
// Overlays
// =============================================================

const ENDPOINT_RADIUS: f64 = 4.0;
const LINE_TOLERANCE: f64 = 3.0;

/// Straight line between two control points.
#[derive(Default)]
struct Segment {
    id: OverlayId,
    points: Vec<Coordinate>,
    cursor: Option<Coordinate>,
    enters: usize,
    leaves: usize,
    right_clicks: usize,
}

impl Segment {
    fn new(id: &str) -> Self {
        Self { id: OverlayId::new(id), ..Self::default() }
    }
}

fn distance_to_segment(p: Coordinate, a: Coordinate, b: Coordinate) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Coordinate::new(a.x + t * dx, a.y + t * dy))
}

impl Overlay for Segment {
    fn id(&self) -> &OverlayId {
        &self.id
    }

    fn points(&self) -> Vec<Coordinate> {
        self.points.clone()
    }

    fn hit_test(&self, coordinate: Coordinate) -> Option<Hit> {
        if let Some(i) = self.points.iter().position(|p| p.distance(coordinate) <= ENDPOINT_RADIUS) {
            return Some(Hit::point(i));
        }
        match self.points.as_slice() {
            [a, b] if distance_to_segment(coordinate, *a, *b) <= LINE_TOLERANCE => Some(Hit::other(0)),
            _ => None,
        }
    }

    fn on_right_click(&mut self, _event: &OverlayEvent<'_>) -> Result<bool, OverlayError> {
        self.right_clicks += 1;
        Ok(false)
    }

    fn on_mouse_enter(&mut self, _event: &OverlayEvent<'_>) -> Result<(), OverlayError> {
        self.enters += 1;
        Ok(())
    }

    fn on_mouse_leave(&mut self, _event: &OverlayEvent<'_>) -> Result<(), OverlayError> {
        self.leaves += 1;
        Ok(())
    }
}

impl GraphicMark for Segment {
    fn is_drawing(&self) -> bool {
        self.points.len() < 2
    }

    fn on_drawing_move(&mut self, coordinate: Coordinate) {
        self.cursor = Some(coordinate);
    }

    fn on_drawing_press(&mut self, coordinate: Coordinate) {
        self.points.push(coordinate);
    }

    fn on_pressed_move(&mut self, coordinate: Coordinate, _event: &PointerEvent) {
        let nearest = self
            .points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.distance(coordinate).total_cmp(&b.distance(coordinate)))
            .map(|(i, _)| i);
        if let Some(i) = nearest {
            self.points[i] = coordinate;
        }
    }
}

/// Fixed-size marker on a pane. Claims its right clicks.
struct Badge {
    id: OverlayId,
    at: Coordinate,
    clicks: Vec<Vec<Coordinate>>,
    right_clicks: usize,
}

impl Badge {
    fn new(id: &str, x: f64, y: f64) -> Self {
        Self { id: OverlayId::new(id), at: Coordinate::new(x, y), clicks: Vec::new(), right_clicks: 0 }
    }
}

impl Overlay for Badge {
    fn id(&self) -> &OverlayId {
        &self.id
    }

    fn points(&self) -> Vec<Coordinate> {
        vec![self.at]
    }

    fn hit_test(&self, coordinate: Coordinate) -> Option<Hit> {
        ((coordinate.x - self.at.x).abs() <= 10.0 && (coordinate.y - self.at.y).abs() <= 10.0).then(|| Hit::other(0))
    }

    fn on_click(&mut self, event: &OverlayEvent<'_>) -> Result<(), OverlayError> {
        self.clicks.push(event.points.to_vec());
        Ok(())
    }

    fn on_right_click(&mut self, _event: &OverlayEvent<'_>) -> Result<bool, OverlayError> {
        self.right_clicks += 1;
        Ok(true)
    }
}

impl Annotation for Badge {}

// =============================================================
// Session
// =============================================================

struct Session {
    handler: OverlayEventHandler<PaneLayout>,
    store: ChartStore,
}

impl Session {
    fn new() -> Self {
        init_tracing();
        let mut layout = PaneLayout::new();
        layout.set_content_width(0.0, 600.0);
        layout.set_pane_bounds(PaneId::candle(), 0.0, 300.0);
        layout.set_pane_bounds(PaneId::new("volume"), 300.0, 400.0);
        Self { handler: OverlayEventHandler::with_config(layout, HandlerConfig::default()), store: ChartStore::new() }
    }

    fn hover(&mut self, x: f64, y: f64) {
        self.handler.on_mouse_move(&mut self.store, &PointerEvent::mouse(x, y)).unwrap();
    }

    fn press(&mut self, x: f64, y: f64) {
        self.handler.on_mouse_down(&mut self.store, &PointerEvent::mouse(x, y)).unwrap();
    }

    fn drag(&mut self, x: f64, y: f64) {
        self.handler.on_pressed_mouse_move(&mut self.store, &PointerEvent::mouse(x, y)).unwrap();
    }

    fn release(&mut self) {
        self.handler.on_mouse_up(&mut self.store);
    }

    fn right_click(&mut self, x: f64, y: f64) {
        self.handler.on_mouse_right_down(&mut self.store, &PointerEvent::mouse(x, y)).unwrap();
    }

    fn mark_state(&self) -> serde_json::Value {
        serde_json::to_value(self.store.graphic_mark_operate()).unwrap()
    }

    /// Draw a finished segment from `a` to `b`.
    fn draw_segment(&mut self, id: &str, a: (f64, f64), b: (f64, f64)) -> Rc<RefCell<Segment>> {
        let segment = Rc::new(RefCell::new(Segment::new(id)));
        self.store.add_graphic_mark(segment.clone()).unwrap();
        self.hover(a.0, a.1);
        self.press(a.0, a.1);
        self.hover(b.0, b.1);
        self.press(b.0, b.1);
        segment
    }
}

fn neutral() -> serde_json::Value {
    json!({ "id": "", "element": "none", "element_index": null })
}

#[test]
fn segment_drawing_lifecycle() {
    let mut s = Session::new();
    let segment = Rc::new(RefCell::new(Segment::new("seg-1")));
    s.store.add_graphic_mark(segment.clone()).unwrap();

    s.hover(100.0, 100.0);
    assert_eq!(segment.borrow().cursor, Some(Coordinate::new(100.0, 100.0)));
    s.press(100.0, 100.0);
    assert!(segment.borrow().is_drawing());

    // Another mark cannot start while this one is unfinished.
    let err = s.store.add_graphic_mark(Rc::new(RefCell::new(Segment::new("seg-2")))).unwrap_err();
    assert!(matches!(err, OverlayError::DrawingInProgress { .. }));

    s.hover(200.0, 150.0);
    s.press(200.0, 150.0);
    assert!(!segment.borrow().is_drawing());
    assert_eq!(segment.borrow().points, vec![Coordinate::new(100.0, 100.0), Coordinate::new(200.0, 150.0)]);
    assert_eq!(segment.borrow().enters, 0);

    assert_eq!(
        s.mark_state(),
        json!({
            "hover": neutral(),
            "click": { "id": "seg-1", "element": "point", "element_index": 1 },
        })
    );
}

#[test]
fn hover_body_then_endpoint_enters_once() {
    let mut s = Session::new();
    let segment = s.draw_segment("seg-1", (100.0, 100.0), (200.0, 200.0));

    s.hover(400.0, 50.0);
    s.hover(150.0, 151.0);
    assert_eq!(s.mark_state()["hover"], json!({ "id": "seg-1", "element": "other", "element_index": 0 }));

    s.hover(199.0, 199.0);
    assert_eq!(s.mark_state()["hover"], json!({ "id": "seg-1", "element": "point", "element_index": 1 }));
    assert_eq!(segment.borrow().enters, 1);
    assert_eq!(segment.borrow().leaves, 0);

    s.hover(400.0, 50.0);
    assert_eq!(segment.borrow().leaves, 1);
    assert_eq!(s.mark_state()["hover"], neutral());
}

#[test]
fn drag_endpoint_and_release() {
    let mut s = Session::new();
    let segment = s.draw_segment("seg-1", (100.0, 100.0), (200.0, 200.0));
    s.store.take_invalidation();

    s.press(200.0, 200.0);
    assert!(s.store.is_dragging_graphic_mark());
    s.drag(230.0, 180.0);
    s.drag(260.0, 170.0);
    assert_eq!(s.store.take_invalidation(), InvalidateLevel::Overlay);
    s.release();

    assert!(!s.store.is_dragging_graphic_mark());
    assert!(s.handler.pressed_graphic_mark().is_none());
    assert_eq!(segment.borrow().points, vec![Coordinate::new(100.0, 100.0), Coordinate::new(260.0, 170.0)]);

    // The moved endpoint is hit where it now lives.
    s.hover(260.0, 170.0);
    assert_eq!(s.mark_state()["hover"]["element_index"], json!(1));
}

#[test]
fn pressing_segment_body_does_not_drag() {
    let mut s = Session::new();
    let segment = s.draw_segment("seg-1", (100.0, 100.0), (200.0, 200.0));

    s.press(150.0, 150.0);
    assert!(!s.store.is_dragging_graphic_mark());
    s.drag(170.0, 120.0);
    s.release();
    assert_eq!(segment.borrow().points, vec![Coordinate::new(100.0, 100.0), Coordinate::new(200.0, 200.0)]);
    assert_eq!(s.mark_state()["click"], json!({ "id": "seg-1", "element": "other", "element_index": 0 }));
}

#[test]
fn right_click_removes_segment_and_clears_state() {
    let mut s = Session::new();
    let first = s.draw_segment("seg-1", (100.0, 100.0), (200.0, 200.0));
    let second = s.draw_segment("seg-2", (300.0, 100.0), (400.0, 100.0));

    s.hover(150.0, 150.0);
    s.right_click(150.0, 150.0);
    assert_eq!(first.borrow().right_clicks, 1);
    assert_eq!(s.store.graphic_mark_count(), 1);
    // Hover pointed at the removed mark; the click still belongs to seg-2's last placed point.
    assert_eq!(
        s.mark_state(),
        json!({
            "hover": neutral(),
            "click": { "id": "seg-2", "element": "point", "element_index": 1 },
        })
    );

    // Removed marks are gone for good; the next move produces no leave.
    s.hover(350.0, 100.0);
    assert_eq!(first.borrow().leaves, 0);
    assert_eq!(second.borrow().enters, 1);
    assert_eq!(s.mark_state()["hover"]["id"], json!("seg-2"));
}

#[test]
fn volume_pane_badge_reacts_without_touching_marks() {
    let mut s = Session::new();
    let segment = s.draw_segment("seg-1", (200.0, 200.0), (250.0, 250.0));
    let badge = Rc::new(RefCell::new(Badge::new("badge-1", 50.0, 50.0)));
    s.store.add_annotation(PaneId::new("volume"), badge.clone());

    // Chart y 350 is pane-local y 50 on the volume pane.
    s.hover(50.0, 350.0);
    let annotation = serde_json::to_value(s.store.annotation_operate()).unwrap();
    assert_eq!(annotation, json!({ "id": "badge-1", "element": "other", "element_index": 0 }));
    assert_eq!(segment.borrow().enters, 0);

    s.press(50.0, 350.0);
    assert_eq!(badge.borrow().clicks, vec![vec![Coordinate::new(50.0, 50.0)]]);

    s.right_click(50.0, 350.0);
    assert_eq!(badge.borrow().right_clicks, 1);
    assert_eq!(segment.borrow().right_clicks, 0);
    assert_eq!(s.store.graphic_mark_count(), 1);
    assert_eq!(s.store.visible_annotations(&PaneId::new("volume")).map(|a| a.len()), Some(1));
}

#[test]
fn generated_ids_drive_dispatch() {
    let mut s = Session::new();
    let segment = Rc::new(RefCell::new(Segment { id: OverlayId::generate(), ..Segment::default() }));
    let id = segment.borrow().id.clone();
    s.store.add_graphic_mark(segment.clone()).unwrap();
    s.press(10.0, 10.0);
    s.press(50.0, 10.0);

    s.hover(30.0, 10.0);
    assert_eq!(s.mark_state()["hover"]["id"], json!(id.as_str()));
    s.right_click(30.0, 10.0);
    assert_eq!(s.store.graphic_mark_count(), 0);
}
