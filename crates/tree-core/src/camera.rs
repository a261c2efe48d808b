//! Hand-driven orbit camera.
//!
//! A normalized hand position picks a target azimuth/polar pair; the live
//! angles follow it with exponential smoothing and are turned into a camera
//! eye on a sphere around a look-at point on the vertical axis.

use crate::config::ConfigError;
use crate::constants::*;
use crate::input::HandSample;
use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

/// Camera placement derived from the orbit: where it sits, what it looks at
/// and its vertical field of view. Up is always +Y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
}

impl CameraPose {
    /// World to view space.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    /// Perspective for a viewport of `aspect` (width / height). A degenerate
    /// aspect falls back to square.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(self.fov_y, aspect, CAMERA_NEAR, CAMERA_FAR)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

/// Orbit mapping and bounds.
///
/// - `azimuth_range`: radians of swing for a full left-to-right hand sweep
/// - `y_offset`, `y_sensitivity`: re-bias of hand `y` before it is clamped to \[0, 1\]
/// - `min_polar`, `max_polar`: vertical cone measured from +Y
/// - `radius`: initial distance, clamped into `[min_distance, max_distance]`
/// - `look_at_height`: height of the orbit centre on the Y axis
/// - `damping`: exponential approach rate of both angles (1/s)
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitConfig {
    pub azimuth_range: f32,
    pub y_offset: f32,
    pub y_sensitivity: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub radius: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub look_at_height: f32,
    pub damping: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            azimuth_range: ORBIT_AZIMUTH_RANGE,
            y_offset: ORBIT_Y_OFFSET,
            y_sensitivity: ORBIT_Y_SENSITIVITY,
            min_polar: ORBIT_MIN_POLAR,
            max_polar: ORBIT_MAX_POLAR,
            radius: ORBIT_RADIUS,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            look_at_height: ORBIT_LOOK_AT_HEIGHT,
            damping: ORBIT_DAMPING_PER_SEC,
        }
    }
}

impl OrbitConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_polar >= 0.0 && self.min_polar < self.max_polar && self.max_polar <= PI) {
            return Err(ConfigError::PolarBounds {
                min: self.min_polar,
                max: self.max_polar,
            });
        }
        if !(self.min_distance > 0.0
            && self.min_distance <= self.max_distance
            && self.max_distance.is_finite())
        {
            return Err(ConfigError::DistanceBounds {
                min: self.min_distance,
                max: self.max_distance,
            });
        }
        for (name, value) in [
            ("azimuth_range", self.azimuth_range),
            ("y_sensitivity", self.y_sensitivity),
            ("damping", self.damping),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::OrbitParameter { name, value });
            }
        }
        if !(self.radius.is_finite() && self.y_offset.is_finite() && self.look_at_height.is_finite())
        {
            return Err(ConfigError::OrbitParameter {
                name: "radius/y_offset/look_at_height",
                value: f32::NAN,
            });
        }
        Ok(())
    }

    pub fn look_at(&self) -> Vec3 {
        Vec3::new(0.0, self.look_at_height, 0.0)
    }
}

/// Wrap an angle into (-π, π]. Non-finite input maps to 0.
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    if !a.is_finite() {
        return 0.0;
    }
    let mut a = a % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

/// Move `current` toward `target` by `alpha` of the shortest signed arc.
#[inline]
pub fn step_angle(current: f32, target: f32, alpha: f32) -> f32 {
    let diff = wrap_angle(target - current);
    wrap_angle(current + diff * alpha)
}

/// Smoothing weight for one frame of exponential decay at `rate` per second.
#[inline]
pub fn decay_alpha(delta: f32, rate: f32) -> f32 {
    if !(delta.is_finite() && delta > 0.0) {
        return 0.0;
    }
    (1.0 - (-delta * rate).exp()).clamp(0.0, 1.0)
}

/// Live orbit state. Owned by one caller; nothing else writes the angles.
#[derive(Clone, Debug)]
pub struct OrbitController {
    config: OrbitConfig,
    azimuth: f32,
    polar: f32,
    distance: f32,
}

impl OrbitController {
    pub fn new(config: OrbitConfig) -> Self {
        let polar = 0.5 * (config.min_polar + config.max_polar);
        let distance = config.radius.clamp(config.min_distance, config.max_distance);
        Self {
            config,
            azimuth: 0.0,
            polar,
            distance,
        }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Place the angles directly (clamped and wrapped), bypassing smoothing.
    pub fn set_angles(&mut self, azimuth: f32, polar: f32) {
        self.azimuth = wrap_angle(azimuth);
        if polar.is_finite() {
            self.polar = polar.clamp(self.config.min_polar, self.config.max_polar);
        }
    }

    /// Request a new orbit distance; clamped into the distance bounds.
    pub fn set_distance(&mut self, distance: f32) {
        if distance.is_finite() {
            self.distance = distance.clamp(self.config.min_distance, self.config.max_distance);
        }
    }

    pub fn azimuth_target(&self, x: f32) -> f32 {
        (x - 0.5) * self.config.azimuth_range
    }

    pub fn polar_target(&self, y: f32) -> f32 {
        let t = ((y - self.config.y_offset) * self.config.y_sensitivity).clamp(0.0, 1.0);
        self.config.min_polar + t * (self.config.max_polar - self.config.min_polar)
    }

    /// Follow the hand for one frame. Returns false (and changes nothing) when
    /// no hand is detected.
    pub fn update(&mut self, sample: HandSample, delta: f32) -> bool {
        let sample = sample.sanitized();
        if !sample.detected {
            return false;
        }
        let alpha = decay_alpha(delta, self.config.damping);
        self.azimuth = step_angle(self.azimuth, self.azimuth_target(sample.x), alpha);
        let polar_target = self.polar_target(sample.y);
        self.polar = (self.polar + (polar_target - self.polar) * alpha)
            .clamp(self.config.min_polar, self.config.max_polar);
        true
    }

    /// Camera eye for the current angles, on a sphere around `look_at`.
    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.config.look_at() + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            eye: self.eye(),
            target: self.config.look_at(),
            fov_y: CAMERA_FOV_Y,
        }
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(OrbitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_lands_in_half_open_range() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert_eq!(wrap_angle(-PI), PI);
        assert_eq!(wrap_angle(PI), PI);
        assert_eq!(wrap_angle(f32::NAN), 0.0);
        assert!((wrap_angle(5.0 * TAU + 0.25) - 0.25).abs() < 1e-4);
    }

    #[test]
    fn decay_alpha_bounds() {
        assert_eq!(decay_alpha(0.0, 3.0), 0.0);
        assert_eq!(decay_alpha(-1.0, 3.0), 0.0);
        assert!(decay_alpha(1000.0, 3.0) <= 1.0);
        let a = decay_alpha(1.0 / 60.0, 3.5);
        assert!(a > 0.0 && a < 0.1);
    }

    #[test]
    fn eye_keeps_distance_from_look_at() {
        let mut orbit = OrbitController::default();
        orbit.set_angles(1.1, 1.0);
        let d = orbit.eye().distance(orbit.config().look_at());
        assert!((d - orbit.distance()).abs() < 1e-3);
    }

    #[test]
    fn distance_requests_are_clamped() {
        let mut orbit = OrbitController::default();
        orbit.set_distance(1.0);
        assert_eq!(orbit.distance(), ORBIT_MIN_DISTANCE);
        orbit.set_distance(1e6);
        assert_eq!(orbit.distance(), ORBIT_MAX_DISTANCE);
        orbit.set_distance(f32::NAN);
        assert_eq!(orbit.distance(), ORBIT_MAX_DISTANCE);
    }
}
