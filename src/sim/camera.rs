//! Camera rig: smoothed follow and zoom
//!
//! Zoom is the orthographic half-height of the view. Both position and zoom
//! are critically damped springs (see [`crate::smooth_damp`]) whose
//! velocities persist between frames.
//!
//! Desired zoom, highest priority first:
//! 1. menu mode zoom
//! 2. hard zoom lock
//! 3. the configured [`ZoomFormula`] on the hole's level or radius
//!
//! and is always clamped to `[min_zoom, max_zoom]`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::hole::Hole;
use super::rect::Rect;
use crate::tuning::CameraTuning;
use crate::{smooth_damp, smooth_damp_vec2};

/// Menu presentation: fixed zoom, optionally frozen position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MenuMode {
    pub zoom: f32,
    pub freeze_position: bool,
}

/// Follow/zoom controller for the main view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRig {
    pub pos: Vec2,
    pub zoom: f32,
    vel: Vec2,
    zoom_vel: f32,
    pub settings: CameraTuning,
    /// Viewport never leaves this rectangle
    pub bounds: Option<Rect>,
    zoom_lock: Option<f32>,
    menu: Option<MenuMode>,
}

impl CameraRig {
    pub fn new(settings: CameraTuning, bounds: Option<Rect>) -> Self {
        let zoom = settings
            .zoom
            .evaluate(1, 0.0)
            .clamp(settings.min_zoom, settings.max_zoom.max(settings.min_zoom));
        Self {
            pos: Vec2::ZERO,
            zoom,
            vel: Vec2::ZERO,
            zoom_vel: 0.0,
            settings,
            bounds,
            zoom_lock: None,
            menu: None,
        }
    }

    #[inline]
    fn clamp_zoom(&self, zoom: f32) -> f32 {
        let lo = self.settings.min_zoom;
        zoom.clamp(lo, self.settings.max_zoom.max(lo))
    }

    /// Half width/height of the visible area
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.zoom * self.settings.aspect, self.zoom)
    }

    /// Visible area in world units
    pub fn viewport(&self) -> Rect {
        Rect::from_center_size(self.pos, self.half_extents() * 2.0)
    }

    /// Hard zoom override (None releases it)
    pub fn lock_zoom(&mut self, zoom: Option<f32>) {
        self.zoom_lock = zoom;
    }

    #[inline]
    pub fn zoom_lock(&self) -> Option<f32> {
        self.zoom_lock
    }

    /// Switch to menu presentation. `snap` jumps straight to the menu zoom.
    pub fn enter_menu(&mut self, zoom: f32, freeze_position: bool, snap: bool) {
        self.menu = Some(MenuMode {
            zoom,
            freeze_position,
        });
        if snap {
            self.zoom = self.clamp_zoom(zoom);
            self.zoom_vel = 0.0;
        }
    }

    pub fn exit_menu(&mut self) {
        self.menu = None;
    }

    #[inline]
    pub fn in_menu(&self) -> bool {
        self.menu.is_some()
    }

    /// Zoom the rig is heading for, after overrides and clamping
    pub fn desired_zoom(&self, follow: Option<&Hole>) -> f32 {
        let raw = if let Some(menu) = self.menu {
            menu.zoom
        } else if let Some(lock) = self.zoom_lock {
            lock
        } else {
            match follow {
                Some(hole) => self.settings.zoom.evaluate(hole.level(), hole.radius()),
                None => self.zoom,
            }
        };
        self.clamp_zoom(raw)
    }

    /// Position the rig is heading for at the current zoom
    pub fn desired_position(&self, hole: &Hole) -> Vec2 {
        self.clamp_to_bounds(hole.pos + self.settings.offset)
    }

    fn clamp_to_bounds(&self, center: Vec2) -> Vec2 {
        match self.bounds {
            Some(bounds) => bounds.clamp_center(center, self.half_extents()),
            None => center,
        }
    }

    /// Jump to the hole with no smoothing (scene start)
    pub fn snap_to(&mut self, hole: &Hole) {
        self.zoom = self.desired_zoom(Some(hole));
        self.zoom_vel = 0.0;
        self.pos = self.desired_position(hole);
        self.vel = Vec2::ZERO;
    }

    /// One render-frame update
    pub fn tick(&mut self, dt: f32, follow: Option<&Hole>) {
        if follow.is_none() && self.menu.is_none() {
            return;
        }

        // Zoom first so the bounds clamp below sees the new viewport size
        let zoom_smooth = if self.menu.is_some() {
            self.settings.menu_smooth_time
        } else {
            self.settings.zoom_smooth_time
        };
        let target_zoom = self.desired_zoom(follow);
        let zoom = smooth_damp(
            self.zoom,
            target_zoom,
            &mut self.zoom_vel,
            zoom_smooth,
            f32::INFINITY,
            dt,
        );
        self.zoom = self.clamp_zoom(zoom);

        let frozen = self.menu.is_some_and(|m| m.freeze_position);
        if let Some(hole) = follow.filter(|_| !frozen) {
            let target = self.desired_position(hole);
            let max_speed = self
                .settings
                .max_follow_speed
                .filter(|&v| v > 0.0)
                .unwrap_or(f32::INFINITY);
            let smoothed = smooth_damp_vec2(
                self.pos,
                target,
                &mut self.vel,
                self.settings.follow_smooth_time,
                max_speed,
                dt,
            );
            self.pos = smoothed;
        }

        // Zoom changes can push a parked camera out of bounds too
        let clamped = self.clamp_to_bounds(self.pos);
        if clamped.x != self.pos.x {
            self.vel.x = 0.0;
        }
        if clamped.y != self.pos.y {
            self.vel.y = 0.0;
        }
        self.pos = clamped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{Tuning, ZoomFormula};
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn hole_at(pos: Vec2) -> Hole {
        Hole::new(pos, &Tuning::default())
    }

    fn run(rig: &mut CameraRig, hole: Option<&Hole>, seconds: f32) {
        let steps = (seconds / DT) as usize;
        for _ in 0..steps {
            rig.tick(DT, hole);
        }
    }

    #[test]
    fn test_zoom_follows_level() {
        let mut rig = CameraRig::new(CameraTuning::default(), None);
        let mut hole = hole_at(Vec2::ZERO);
        let costs = Tuning::default().progression.level_costs;
        hole.award(100, &costs);
        let expected = rig.settings.zoom.evaluate(hole.level(), hole.radius());
        run(&mut rig, Some(&hole), 5.0);
        assert!((rig.zoom - expected).abs() < 1e-2);
    }

    #[test]
    fn test_zoom_by_radius() {
        let settings = CameraTuning {
            zoom: ZoomFormula::ByRadius {
                base: 3.0,
                per_unit_radius: 1.5,
            },
            ..Default::default()
        };
        let mut rig = CameraRig::new(settings, None);
        let hole = hole_at(Vec2::ZERO);
        run(&mut rig, Some(&hole), 5.0);
        assert!((rig.zoom - (3.0 + 1.5 * hole.radius())).abs() < 1e-2);
    }

    #[test]
    fn test_lock_overrides_level_zoom() {
        let mut rig = CameraRig::new(CameraTuning::default(), None);
        let mut hole = hole_at(Vec2::ZERO);
        hole.award(100, &Tuning::default().progression.level_costs);
        rig.lock_zoom(Some(9.0));
        run(&mut rig, Some(&hole), 5.0);
        assert!((rig.zoom - 9.0).abs() < 1e-2);

        // Lock outside the clamp range settles on the clamp edge
        rig.lock_zoom(Some(1000.0));
        run(&mut rig, Some(&hole), 10.0);
        assert!((rig.zoom - rig.settings.max_zoom).abs() < 1e-2);
    }

    #[test]
    fn test_menu_overrides_lock_and_freezes_position() {
        let mut rig = CameraRig::new(CameraTuning::default(), None);
        let hole = hole_at(Vec2::new(5.0, 5.0));
        rig.lock_zoom(Some(4.0));
        rig.enter_menu(12.0, true, false);
        run(&mut rig, Some(&hole), 8.0);
        assert!((rig.zoom - 12.0).abs() < 1e-2);
        assert_eq!(rig.pos, Vec2::ZERO);

        rig.exit_menu();
        run(&mut rig, Some(&hole), 5.0);
        assert!((rig.zoom - 4.0).abs() < 1e-2);
        assert!(rig.pos.distance(hole.pos) < 1e-2);
    }

    #[test]
    fn test_menu_zoom_uses_menu_smooth_time() {
        let settings = CameraTuning {
            zoom_smooth_time: 0.01,
            menu_smooth_time: 2.0,
            ..Default::default()
        };
        let mut rig = CameraRig::new(settings, None);
        let hole = hole_at(Vec2::ZERO);
        rig.enter_menu(12.0, true, false);

        let mut expected = rig.zoom;
        let mut vel = 0.0;
        for _ in 0..30 {
            rig.tick(DT, Some(&hole));
            expected = smooth_damp(expected, 12.0, &mut vel, 2.0, f32::INFINITY, DT);
        }
        assert!((rig.zoom - expected).abs() < 1e-4);
        // Half a second into a two second glide: still well short of the menu zoom
        assert!(rig.zoom < 6.0);

        rig.exit_menu();
        run(&mut rig, Some(&hole), 0.5);
        let gameplay = rig.settings.zoom.evaluate(hole.level(), hole.radius());
        assert!((rig.zoom - gameplay).abs() < 1e-2);
    }

    #[test]
    fn test_negative_follow_speed_still_moves_toward_hole() {
        let settings = CameraTuning {
            max_follow_speed: Some(-5.0),
            ..Default::default()
        };
        let mut rig = CameraRig::new(settings, None);
        let hole = hole_at(Vec2::new(10.0, 0.0));
        run(&mut rig, Some(&hole), 10.0);
        assert!(rig.pos.distance(hole.pos) < 1e-2);
    }

    #[test]
    fn test_menu_snap_sets_zoom_instantly() {
        let mut rig = CameraRig::new(CameraTuning::default(), None);
        rig.enter_menu(12.0, true, true);
        assert_eq!(rig.zoom, 12.0);
        assert!(rig.in_menu());
    }

    #[test]
    fn test_follow_converges_with_offset() {
        let settings = CameraTuning {
            offset: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        let mut rig = CameraRig::new(settings, None);
        let hole = hole_at(Vec2::new(3.0, -2.0));
        run(&mut rig, Some(&hole), 3.0);
        assert!(rig.pos.distance(Vec2::new(3.0, -1.0)) < 1e-2);
    }

    #[test]
    fn test_no_target_is_noop() {
        let mut rig = CameraRig::new(CameraTuning::default(), None);
        rig.pos = Vec2::new(1.0, 2.0);
        let zoom = rig.zoom;
        run(&mut rig, None, 1.0);
        assert_eq!(rig.pos, Vec2::new(1.0, 2.0));
        assert_eq!(rig.zoom, zoom);
    }

    #[test]
    fn test_bounds_keep_viewport_inside() {
        let bounds = Rect::new(Vec2::new(-20.0, -10.0), Vec2::new(20.0, 10.0));
        let mut rig = CameraRig::new(CameraTuning::default(), Some(bounds));
        let hole = hole_at(Vec2::new(100.0, -100.0));
        for _ in 0..600 {
            rig.tick(DT, Some(&hole));
            assert!(bounds.contains_rect(&rig.viewport(), 1e-3));
        }
        let half = rig.half_extents();
        assert!((rig.pos.x - (20.0 - half.x)).abs() < 1e-2);
        assert!((rig.pos.y - (-10.0 + half.y)).abs() < 1e-2);
    }

    proptest! {
        #[test]
        fn prop_viewport_stays_in_bounds(
            hx in -200.0f32..200.0,
            hy in -200.0f32..200.0,
            level_points in 0u32..200,
            steps in 1usize..120,
        ) {
            let bounds = Rect::new(Vec2::new(-30.0, -20.0), Vec2::new(30.0, 20.0));
            let mut rig = CameraRig::new(CameraTuning::default(), Some(bounds));
            let mut hole = hole_at(Vec2::new(hx, hy));
            hole.award(level_points, &Tuning::default().progression.level_costs);
            for _ in 0..steps {
                rig.tick(DT, Some(&hole));
                prop_assert!(bounds.contains_rect(&rig.viewport(), 1e-3));
            }
        }

        #[test]
        fn prop_locked_zoom_within_clamp(lock in -50.0f32..100.0) {
            let mut rig = CameraRig::new(CameraTuning::default(), None);
            let hole = hole_at(Vec2::ZERO);
            rig.lock_zoom(Some(lock));
            for _ in 0..600 {
                rig.tick(DT, Some(&hole));
            }
            let expected = lock.clamp(rig.settings.min_zoom, rig.settings.max_zoom);
            prop_assert!((rig.zoom - expected).abs() < 0.05);
            prop_assert!(rig.zoom >= rig.settings.min_zoom && rig.zoom <= rig.settings.max_zoom);
        }
    }
}
