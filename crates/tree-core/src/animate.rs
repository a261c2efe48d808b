//! Per-frame transform interpolation for instanced groups.
//!
//! Nothing here keeps per-instance state: each frame reads the previous
//! transform back from the buffer, moves it toward the active destination with
//! a clamped exponential approach and writes it forward.

use crate::constants::*;
use crate::dataset::{Category, InstanceRecord};
use crate::input::{FrameTime, Mode};
use crate::transform::{Transform, TransformBuffer};
use glam::{EulerRot, Quat, Vec3};

/// How an element turns each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Spin {
    /// Rotation is left as read back.
    Still,
    /// Add `delta * rate` radians per axis (XYZ order).
    Accumulate(Vec3),
    /// Face away from the vertical axis through the current position.
    FaceOutward,
}

/// Secondary motion rules shared by every element of a category.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionProfile {
    pub wobble: bool,
    pub spin: Spin,
    pub pulse: bool,
}

impl MotionProfile {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Foliage => Self {
                wobble: false,
                spin: Spin::Still,
                pulse: false,
            },
            Category::Ball => Self {
                wobble: true,
                spin: Spin::Still,
                pulse: false,
            },
            Category::Gift => Self {
                wobble: false,
                spin: Spin::Accumulate(GIFT_SPIN),
                pulse: false,
            },
            Category::Light => Self {
                wobble: true,
                spin: Spin::Still,
                pulse: true,
            },
            Category::Photo => Self {
                wobble: false,
                spin: Spin::FaceOutward,
                pulse: false,
            },
            Category::Star => Self {
                wobble: false,
                spin: Spin::Accumulate(STAR_SPIN),
                pulse: true,
            },
        }
    }
}

/// Outcome of one group update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupUpdate {
    pub written: usize,
    /// Instances whose new transform was non-finite and therefore not written.
    pub rejected: usize,
}

/// Fraction of the remaining distance covered this frame, `clamp(delta * speed, 0, 1)`.
/// Non-finite inputs freeze the instance instead of poisoning the buffer.
#[inline]
pub fn approach_factor(delta: f32, speed: f32) -> f32 {
    let f = delta * speed;
    if f.is_finite() {
        f.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[inline]
pub fn damped_approach(current: Vec3, destination: Vec3, factor: f32) -> Vec3 {
    current + (destination - current) * factor
}

#[inline]
pub fn destination(record: &InstanceRecord, mode: Mode) -> Vec3 {
    match mode {
        Mode::Formed => record.target_position,
        Mode::Chaos => record.chaos_position,
    }
}

/// Yaw-only rotation whose local +Z points away from the Y axis. `None` on
/// the axis itself where the direction is undefined.
#[inline]
pub fn face_outward(position: Vec3) -> Option<Quat> {
    let horizontal = Vec3::new(position.x, 0.0, position.z);
    if horizontal.length_squared() < AXIS_EPSILON * AXIS_EPSILON {
        return None;
    }
    Some(Quat::from_rotation_y(horizontal.x.atan2(horizontal.z)))
}

#[inline]
fn pulse_factor(elapsed: f32, phase: f32) -> f32 {
    1.0 + (elapsed * PULSE_FREQUENCY + phase).sin() * PULSE_AMPLITUDE
}

/// Transform an instance starts with before its first frame: parked on its
/// chaos position at base scale.
pub fn initial_transform(record: &InstanceRecord) -> Transform {
    let rotation = match MotionProfile::for_category(record.category).spin {
        Spin::Still => Quat::IDENTITY,
        Spin::Accumulate(_) => Quat::from_rotation_y(record.phase),
        Spin::FaceOutward => face_outward(record.chaos_position).unwrap_or(Quat::IDENTITY),
    };
    Transform::new(record.chaos_position, rotation, Vec3::splat(record.scale))
}

/// Advance every instance of one group by one frame.
///
/// Records beyond the buffer's capacity are left alone. The buffer is marked
/// dirty once if anything was written; an empty group never touches it.
pub fn animate_group<B: TransformBuffer + ?Sized>(
    mode: Mode,
    records: &[InstanceRecord],
    profile: &MotionProfile,
    buffer: &mut B,
    time: FrameTime,
) -> GroupUpdate {
    let mut update = GroupUpdate::default();
    if records.is_empty() {
        return update;
    }
    let dt = time.delta;
    for (i, record) in records.iter().enumerate().take(buffer.len()) {
        let current = buffer.read_transform(i);

        let factor = approach_factor(dt, record.speed);
        let mut position = damped_approach(current.translation, destination(record, mode), factor);

        if profile.wobble && position.distance(record.target_position) < WOBBLE_ENGAGE_DISTANCE {
            position.y +=
                (time.elapsed * WOBBLE_FREQUENCY + record.phase).sin() * WOBBLE_AMPLITUDE * dt;
        }

        let rotation = match profile.spin {
            Spin::Still => current.rotation,
            Spin::Accumulate(rate) => {
                let step = Quat::from_euler(EulerRot::XYZ, rate.x * dt, rate.y * dt, rate.z * dt);
                (current.rotation * step).normalize()
            }
            Spin::FaceOutward => face_outward(position).unwrap_or(current.rotation),
        };

        let mut scale = record.scale;
        if profile.pulse {
            scale *= pulse_factor(time.elapsed, record.phase);
        }

        let next = Transform::new(position, rotation, Vec3::splat(scale));
        if next.is_finite() {
            buffer.write_transform(i, &next);
            update.written += 1;
        } else {
            update.rejected += 1;
        }
    }
    if update.written > 0 {
        buffer.mark_dirty();
    }
    if update.rejected > 0 {
        log::warn!(
            "[animate] dropped {} non-finite transforms in {:?} group",
            update.rejected,
            records[0].category
        );
    }
    update
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approach_factor_is_clamped() {
        assert_eq!(approach_factor(0.5, 4.0), 1.0);
        assert_eq!(approach_factor(-0.1, 2.0), 0.0);
        assert_eq!(approach_factor(0.01, f32::INFINITY), 0.0);
        assert_eq!(approach_factor(f32::NAN, 1.0), 0.0);
        assert!((approach_factor(0.016, 2.0) - 0.032).abs() < 1e-6);
    }

    #[test]
    fn full_factor_lands_exactly_on_destination() {
        let p = damped_approach(Vec3::new(3.0, 1.0, -2.0), Vec3::new(-1.0, 0.0, 5.0), 1.0);
        assert_eq!(p, Vec3::new(-1.0, 0.0, 5.0));
    }

    #[test]
    fn face_outward_points_away_from_axis() {
        for p in [
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(0.0, -3.0, -4.0),
            Vec3::new(-1.0, 0.0, 1.0),
        ] {
            let q = face_outward(p).expect("off-axis");
            let forward = q * Vec3::Z;
            let outward = Vec3::new(p.x, 0.0, p.z).normalize();
            assert!(forward.abs_diff_eq(outward, 1e-5), "{forward:?} vs {outward:?}");
        }
        assert!(face_outward(Vec3::new(0.0, 5.0, 0.0)).is_none());
    }

    #[test]
    fn initial_rotation_follows_the_spin_rule() {
        let mut record = InstanceRecord {
            chaos_position: Vec3::new(0.0, 2.0, 15.0),
            target_position: Vec3::ZERO,
            category: Category::Ball,
            color: ORNAMENT_PALETTE[0],
            scale: 0.2,
            speed: 1.0,
            phase: 1.2,
        };
        assert_eq!(initial_transform(&record).rotation, Quat::IDENTITY);

        record.category = Category::Gift;
        let gift = initial_transform(&record).rotation;
        assert!(gift.abs_diff_eq(Quat::from_rotation_y(1.2), 1e-6));

        record.category = Category::Photo;
        let forward = initial_transform(&record).rotation * Vec3::Z;
        assert!(forward.abs_diff_eq(Vec3::Z, 1e-5));
        assert_eq!(initial_transform(&record).translation, record.chaos_position);
    }

    #[test]
    fn every_category_has_a_profile() {
        for c in Category::ALL {
            let _ = MotionProfile::for_category(c);
        }
        assert!(MotionProfile::for_category(Category::Light).pulse);
        assert_eq!(
            MotionProfile::for_category(Category::Photo).spin,
            Spin::FaceOutward
        );
    }
}
