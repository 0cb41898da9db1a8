//! Crate error types.
//!
//! Nothing in the handler performs I/O. Missing panes, empty catalogs and
//! misses are modelled as sentinels, not errors. What remains are faults
//! raised by overlay collaborators and violations of the catalog invariants.

use crate::overlay::OverlayId;

/// Error returned by handler operations and store mutations.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// An overlay lifecycle hook reported a failure. Dispatch for the current
    /// event stops at the first such failure.
    #[error("overlay {id} failed in {hook}: {message}")]
    Callback { id: OverlayId, hook: &'static str, message: String },
    /// The overlay was already borrowed, i.e. a hook re-entered the handler.
    #[error("overlay is already borrowed by an in-progress dispatch")]
    Reentrant,
    /// A graphic mark was appended while the tail mark is still drawing.
    #[error("graphic mark {id} is still drawing; finish it before adding another")]
    DrawingInProgress { id: OverlayId },
}

impl OverlayError {
    /// Convenience constructor for hook failures raised by overlay implementations.
    #[must_use]
    pub fn callback(id: &OverlayId, hook: &'static str, message: impl Into<String>) -> Self {
        Self::Callback { id: id.clone(), hook, message: message.into() }
    }
}

/// Error returned by [`crate::config::HandlerConfig::from_env`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held a value outside its accepted set.
    #[error("invalid value for {var}: {value} (expected {expected})")]
    InvalidValue { var: &'static str, value: String, expected: &'static str },
}
