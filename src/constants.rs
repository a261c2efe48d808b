/// Browser-side wiring constants.
///
/// Element ids and interaction tuning used by the web front-end. Scene layout
/// and motion tuning live in `tree_core::constants`.
// DOM element ids
pub const MODE_LABEL_ID: &str = "mode-label";
pub const HINT_OVERLAY_ID: &str = "hint-overlay";
pub const MODE_BUTTON_ID: &str = "mode-toggle";

// Frame clock
// Deltas above this are treated as a stall (tab in background) and capped.
pub const MAX_FRAME_DELTA_SEC: f32 = 0.25;

// Pointer fallback
// Pointer samples feed the camera only while a button is held.
pub const POINTER_REQUIRES_PRESS: bool = true;

// Wheel zoom
// Orbit distance change per wheel pixel (deltaMode 0); lines and pages are
// scaled to pixels first.
pub const WHEEL_ZOOM_PER_PIXEL: f32 = 0.02;
pub const WHEEL_LINE_PIXELS: f32 = 16.0;
pub const WHEEL_PAGE_PIXELS: f32 = 400.0;

// Matrix layout
pub const FLOATS_PER_MATRIX: usize = 16;
