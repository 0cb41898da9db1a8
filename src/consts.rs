//! Shared constants for the overlay crate.

// ── Panes ───────────────────────────────────────────────────────

/// Id of the primary (candlestick) plotting pane. Graphic marks live here.
pub const CANDLE_PANE_ID: &str = "candle_pane";

// ── Environment ─────────────────────────────────────────────────

/// Selects the move gate mode: `in_flight` or `per_frame`.
pub const ENV_MOVE_THROTTLE: &str = "OVERLAY_MOVE_THROTTLE";

/// Overrides the primary plotting pane id.
pub const ENV_PRIMARY_PANE: &str = "OVERLAY_PRIMARY_PANE";
