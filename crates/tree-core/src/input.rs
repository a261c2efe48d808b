//! Per-frame inputs polled by the scene: the display mode, the latest hand
//! sample and the frame clock.
//!
//! All three are plain values owned by the host. The constructors here are the
//! only place where untrusted numbers are cleaned up, so the animation and
//! camera code can assume finite, in-range values.

/// Which configuration the instances are heading toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Assembled tree shape.
    Formed,
    /// Scattered shell around the tree.
    #[default]
    Chaos,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Formed => Mode::Chaos,
            Mode::Chaos => Mode::Formed,
        }
    }

    pub fn is_formed(self) -> bool {
        matches!(self, Mode::Formed)
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Formed => "Formed",
            Mode::Chaos => "Chaos",
        }
    }
}

/// Normalized hand position as delivered by the tracker.
///
/// `x` and `y` are expected in \[0, 1\]; `detected` is false whenever the
/// tracker has no hand (the camera freezes in that case).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandSample {
    pub x: f32,
    pub y: f32,
    pub detected: bool,
}

impl HandSample {
    pub fn new(x: f32, y: f32, detected: bool) -> Self {
        Self { x, y, detected }
    }

    pub fn lost() -> Self {
        Self::default()
    }

    /// Clamp coordinates into \[0, 1\]. A non-finite coordinate cannot be
    /// clamped meaningfully, so the sample is reported as not detected.
    pub fn sanitized(self) -> Self {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Self {
                detected: false,
                ..Self::default()
            };
        }
        Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
            detected: self.detected,
        }
    }
}

/// Frame clock values in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    pub delta: f32,
    pub elapsed: f32,
}

impl FrameTime {
    /// Negative or non-finite deltas become zero (a frozen frame) and a
    /// non-finite elapsed time resets to zero.
    pub fn new(delta: f32, elapsed: f32) -> Self {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let elapsed = if elapsed.is_finite() { elapsed } else { 0.0 };
        Self { delta, elapsed }
    }
}
