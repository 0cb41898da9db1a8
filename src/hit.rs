#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::OverlayError;
use crate::geom::Coordinate;
use crate::overlay::{self, Annotation, GraphicMark, Overlay, OverlayId};

/// Which part of an overlay was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperateElement {
    /// Nothing (neutral state).
    #[default]
    None,
    /// A control point. Pressing one starts a drag.
    Point,
    /// Any other part of the shape (segment, body, label).
    Other,
}

/// What an overlay reports from its own hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element: OperateElement,
    /// Index of the hit element within its kind (e.g. which control point).
    pub element_index: Option<usize>,
}

impl Hit {
    /// A hit on control point `index`.
    #[must_use]
    pub fn point(index: usize) -> Self {
        Self { element: OperateElement::Point, element_index: Some(index) }
    }

    /// A hit on a non-point part of the shape, e.g. segment `index`.
    #[must_use]
    pub fn other(index: usize) -> Self {
        Self { element: OperateElement::Other, element_index: Some(index) }
    }
}

/// A hit annotated with the overlay's identity and a back-reference to it.
///
/// The back-reference is weak: a published result never keeps a removed
/// overlay alive.
pub struct HitTestResult<T: ?Sized> {
    pub id: OverlayId,
    pub element: OperateElement,
    pub element_index: Option<usize>,
    pub instance: Option<Weak<RefCell<T>>>,
}

impl<T: ?Sized> HitTestResult<T> {
    /// The neutral result: empty id, no element, no instance.
    #[must_use]
    pub fn neutral() -> Self {
        Self { id: OverlayId::none(), element: OperateElement::None, element_index: None, instance: None }
    }

    /// Whether this is a hit on a real overlay.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        !self.id.is_none()
    }

    /// Upgrade the back-reference, if the overlay still exists.
    #[must_use]
    pub fn instance(&self) -> Option<Rc<RefCell<T>>> {
        self.instance.as_ref().and_then(Weak::upgrade)
    }
}

impl<T: Overlay + ?Sized> HitTestResult<T> {
    /// Run `handle`'s hit test at `coordinate` and wrap the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Reentrant`] if the overlay is mutably borrowed.
    pub fn probe(handle: &Rc<RefCell<T>>, coordinate: Coordinate) -> Result<Option<Self>, OverlayError> {
        let overlay = overlay::borrow(handle)?;
        Ok(overlay.hit_test(coordinate).map(|hit| Self {
            id: overlay.id().clone(),
            element: hit.element,
            element_index: hit.element_index,
            instance: Some(Rc::downgrade(handle)),
        }))
    }
}

impl<T: ?Sized> Default for HitTestResult<T> {
    fn default() -> Self {
        Self::neutral()
    }
}

impl<T: ?Sized> Clone for HitTestResult<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            element: self.element,
            element_index: self.element_index,
            instance: self.instance.clone(),
        }
    }
}

impl<T: ?Sized> PartialEq for HitTestResult<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.element == other.element && self.element_index == other.element_index
    }
}

impl<T: ?Sized> fmt::Debug for HitTestResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HitTestResult")
            .field("id", &self.id)
            .field("element", &self.element)
            .field("element_index", &self.element_index)
            .field("live", &self.instance().is_some())
            .finish()
    }
}

impl<T: ?Sized> Serialize for HitTestResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("HitTestResult", 3)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("element", &self.element)?;
        s.serialize_field("element_index", &self.element_index)?;
        s.end()
    }
}

/// Hit result for graphic marks.
pub type MarkHit = HitTestResult<dyn GraphicMark>;

/// Hit result for annotations. Published as the annotation operate state.
pub type AnnotationHit = HitTestResult<dyn Annotation>;

/// Published hover / click state for graphic marks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphicMarkOperate {
    pub hover: MarkHit,
    pub click: MarkHit,
}

/// Published hover state for annotations.
pub type AnnotationOperate = AnnotationHit;
