//! Sinkhole - A top-down "swallow everything" arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hole, swallowing, progression, camera, NPCs)
//! - `pool`: FIFO object pool used for short-lived visuals
//! - `tuning`: Data-driven game balance

pub mod pool;
pub mod sim;
pub mod tuning;

pub use pool::ObjectPool;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted by the frame loop
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Hole defaults
    pub const HOLE_BASE_RADIUS: f32 = 0.5;
    pub const HOLE_MOVE_SPEED: f32 = 6.0;
    pub const HOLE_START_LEVEL: u32 = 1;
    pub const DEFAULT_MAX_LEVEL: u32 = 7;
    /// Scale multiplier added per level-up (0.12 = +12%)
    pub const GROWTH_PER_LEVEL: f32 = 0.12;

    /// Swallow animation length (seconds)
    pub const SWALLOW_DURATION: f32 = 0.35;
    /// Floor for any swallow duration, including negative config values
    pub const MIN_SWALLOW_DURATION: f32 = 0.01;
    /// Alpha applied to targets the hole is too small for
    pub const BLOCKED_ALPHA: f32 = 0.4;

    /// Cost used when the level-cost table has no entry for a level
    pub const DEFAULT_LEVEL_COST: u32 = 10;

    /// Camera defaults (zoom is the orthographic half-height)
    pub const CAMERA_FOLLOW_SMOOTH_TIME: f32 = 0.20;
    pub const CAMERA_ZOOM_SMOOTH_TIME: f32 = 0.25;
    pub const CAMERA_MENU_SMOOTH_TIME: f32 = 0.6;
    pub const CAMERA_START_ZOOM: f32 = 3.0;
    pub const CAMERA_ZOOM_PER_LEVEL: f32 = 0.75;
    pub const CAMERA_MENU_ZOOM: f32 = 12.0;
    pub const CAMERA_MIN_ZOOM: f32 = 0.1;
    pub const CAMERA_MAX_ZOOM: f32 = 40.0;
    pub const CAMERA_ASPECT: f32 = 16.0 / 9.0;
    /// Floor for SmoothDamp time constants
    pub const MIN_SMOOTH_TIME: f32 = 0.0001;

    /// Round length (seconds)
    pub const ROUND_DURATION: f32 = 90.0;
}

/// Quadratic ease-in on [0, 1]
#[inline]
pub fn ease_in_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Cubic ease-out on [0, 1]
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Critically damped spring toward `target`.
///
/// Converges in roughly `smooth_time` seconds. `velocity` is the spring state
/// and must be carried between calls. The result never overshoots `target`.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> f32 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(consts::MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let max_change = max_speed * smooth_time;
    let change = (current - target).clamp(-max_change, max_change);
    let limited_target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = limited_target + (change + temp) * decay;

    // Overshoot guard
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}

/// Vector form of [`smooth_damp`]
pub fn smooth_damp_vec2(
    current: Vec2,
    target: Vec2,
    velocity: &mut Vec2,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> Vec2 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(consts::MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = (current - target).clamp_length_max(max_speed * smooth_time);
    let limited_target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = limited_target + (change + temp) * decay;

    // Overshoot guard
    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = Vec2::ZERO;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_curves_endpoints() {
        assert_eq!(ease_in_quad(0.0), 0.0);
        assert_eq!(ease_in_quad(1.0), 1.0);
        assert_eq!(ease_in_quad(2.0), 1.0);
        assert!((ease_in_quad(0.5) - 0.25).abs() < 1e-6);
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_smooth_damp_converges_without_overshoot() {
        let mut value = 0.0;
        let mut vel = 0.0;
        for _ in 0..600 {
            value = smooth_damp(value, 10.0, &mut vel, 0.25, f32::INFINITY, 1.0 / 60.0);
            assert!(value <= 10.0);
        }
        assert!((value - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_smooth_damp_carries_velocity() {
        let mut vel = 0.0;
        let a = smooth_damp(0.0, 10.0, &mut vel, 0.5, f32::INFINITY, 0.02);
        assert!(vel > 0.0);
        let b = smooth_damp(a, 10.0, &mut vel, 0.5, f32::INFINITY, 0.02);
        // Second step moves further than the first because the spring is moving
        assert!(b - a > a);
    }

    #[test]
    fn test_smooth_damp_zero_dt_is_noop() {
        let mut vel = 3.0;
        assert_eq!(smooth_damp(1.0, 5.0, &mut vel, 0.2, f32::INFINITY, 0.0), 1.0);
        assert_eq!(vel, 3.0);
    }

    #[test]
    fn test_smooth_damp_max_speed_limits_step() {
        let mut vel = 0.0;
        let mut value = 0.0;
        for _ in 0..10 {
            value = smooth_damp(value, 1000.0, &mut vel, 0.1, 5.0, 0.1);
        }
        // 1 second at 5 units/s cannot get far
        assert!(value < 10.0);
    }

    #[test]
    fn test_smooth_damp_vec2_converges() {
        let mut pos = Vec2::ZERO;
        let mut vel = Vec2::ZERO;
        let target = Vec2::new(4.0, -3.0);
        for _ in 0..600 {
            pos = smooth_damp_vec2(pos, target, &mut vel, 0.2, f32::INFINITY, 1.0 / 60.0);
        }
        assert!(pos.distance(target) < 1e-3);
    }
}
