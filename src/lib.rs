//! Pointer-driven interaction engine for chart overlays.
//!
//! This crate owns the hover / click / drawing / drag state machine for the
//! overlays drawn on top of a financial chart. Two overlay categories exist:
//! graphic marks (user-drawn shapes with draggable control points and a
//! drawing lifecycle) and annotations (pane-anchored markers that only react
//! to clicks). The host is responsible for normalizing raw pointer input,
//! rendering, and persistence; it feeds events into
//! [`handler::OverlayEventHandler`] together with an [`store::OverlayStore`]
//! and reads the published operate state back out of the store.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`handler`] | The event handler: move, down, right-down, pressed-move, up |
//! | [`overlay`] | Overlay capability traits, ids, and callback payloads |
//! | [`hit`] | Hit-test results and published operate state |
//! | [`store`] | Store contract and the in-memory [`store::ChartStore`] |
//! | [`pane`] | Pane resolution and the reference [`pane::PaneLayout`] |
//! | [`input`] | Pointer event and device types |
//! | [`throttle`] | One-slot move gate |
//! | [`config`] | Handler configuration from the environment |
//! | [`geom`] | Pane-local coordinates |
//! | [`error`] | Crate error types |
//! | [`consts`] | Shared constants |

pub mod config;
pub mod consts;
pub mod error;
pub mod geom;
pub mod handler;
pub mod hit;
pub mod input;
pub mod overlay;
pub mod pane;
pub mod store;
pub mod throttle;

pub use error::OverlayError;
pub use handler::OverlayEventHandler;
