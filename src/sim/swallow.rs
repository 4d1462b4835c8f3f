//! Swallow eligibility and the swallow animation
//!
//! A target goes `Idle -> Swallowing -> Removed` exactly once. The
//! `being_swallowed` flag is the guard: it is set when swallowing starts and
//! never cleared, so repeated overlap triggers cannot award a target twice.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::path::PathFollower;
use crate::consts::MIN_SWALLOW_DURATION;
use crate::ease_in_quad;

/// Outcome of a hole touching a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwallowVerdict {
    /// Hole is big enough: start swallowing
    Eligible,
    /// Hole is too small: fade the target until the overlap ends
    Blocked,
    /// Target is already on its way down; ignore
    Neutral,
}

/// Level check on its own
#[inline]
pub fn can_swallow(hole_level: u32, required_level: u32) -> bool {
    hole_level >= required_level
}

/// Decide what an overlap between a hole and a target means
pub fn swallow_verdict(
    hole_level: u32,
    required_level: u32,
    being_swallowed: bool,
) -> SwallowVerdict {
    if being_swallowed {
        SwallowVerdict::Neutral
    } else if can_swallow(hole_level, required_level) {
        SwallowVerdict::Eligible
    } else {
        SwallowVerdict::Blocked
    }
}

/// Lifecycle of a swallowable target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SwallowState {
    #[default]
    Idle,
    Swallowing,
    /// Animation finished; the world drops the target this tick
    Removed,
}

/// Physics participation of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyMode {
    /// Moves under its own velocity / path
    #[default]
    Dynamic,
    /// Driven only by the swallow animation
    Kinematic,
}

/// Something the hole can eat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swallowable {
    pub id: u32,
    /// Minimum hole level that can swallow this
    pub required_level: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radius at scale 1
    pub radius: f32,
    pub scale: f32,
    pub state: SwallowState,
    being_swallowed: bool,
    /// Faded because an ineligible overlap is in progress
    pub blocked: bool,
    pub body: BodyMode,
    pub collider_enabled: bool,
    /// Overlap state seen on the previous tick
    #[serde(default)]
    pub overlapping: bool,
    /// Optional NPC route
    #[serde(default)]
    pub path: Option<PathFollower>,
}

impl Swallowable {
    pub fn new(id: u32, required_level: u32, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            required_level,
            pos,
            vel: Vec2::ZERO,
            radius: radius.max(0.0),
            scale: 1.0,
            state: SwallowState::Idle,
            being_swallowed: false,
            blocked: false,
            body: BodyMode::Dynamic,
            collider_enabled: true,
            overlapping: false,
            path: None,
        }
    }

    /// Attach a route; the target is placed on its first waypoint
    pub fn with_path(mut self, path: PathFollower) -> Self {
        if let Some(start) = path.start_pos() {
            self.pos = start;
        }
        self.path = Some(path);
        self
    }

    #[inline]
    pub fn is_being_swallowed(&self) -> bool {
        self.being_swallowed
    }

    /// Radius in world units at the current scale
    #[inline]
    pub fn world_radius(&self) -> f32 {
        self.radius * self.scale
    }

    /// Render alpha: faded while blocked
    pub fn alpha(&self, blocked_alpha: f32) -> f32 {
        if self.blocked {
            blocked_alpha.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Hand the target over to the swallow animation.
    ///
    /// Returns false if it was already taken. Physics is suspended: velocity
    /// zeroed, body kinematic, collider off.
    pub fn begin_swallow(&mut self) -> bool {
        if self.being_swallowed {
            return false;
        }
        self.being_swallowed = true;
        self.state = SwallowState::Swallowing;
        self.blocked = false;
        self.vel = Vec2::ZERO;
        self.body = BodyMode::Kinematic;
        self.collider_enabled = false;
        true
    }

    /// Free movement for one physics step (paths or velocity)
    pub fn integrate(&mut self, dt: f32) {
        if self.body != BodyMode::Dynamic {
            return;
        }
        match self.path.as_mut() {
            Some(path) => self.pos = path.advance(self.pos, dt),
            None => self.pos += self.vel * dt,
        }
    }
}

/// Timer pulling one target into the hole.
///
/// Owned by the hole that started it: dropping the hole drops the animation,
/// and its completion never fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwallowAnim {
    pub target_id: u32,
    /// 0..=1
    progress: f32,
    duration: f32,
    start_pos: Vec2,
    start_scale: f32,
}

impl SwallowAnim {
    pub fn new(target: &Swallowable, duration: f32) -> Self {
        Self {
            target_id: target.id,
            progress: 0.0,
            duration: duration.max(MIN_SWALLOW_DURATION),
            start_pos: target.pos,
            start_scale: target.scale,
        }
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Advance by `dt`, pulling the target toward `dest` (the hole center,
    /// re-read every tick so a moving hole is tracked).
    ///
    /// Returns true on the tick the animation completes; the target is then
    /// marked `Removed`.
    pub fn step(&mut self, dt: f32, dest: Vec2, target: &mut Swallowable) -> bool {
        if target.state != SwallowState::Swallowing {
            return false;
        }
        self.progress = (self.progress + dt.max(0.0) / self.duration).min(1.0);
        let k = ease_in_quad(self.progress);
        target.pos = self.start_pos.lerp(dest, k);
        target.scale = self.start_scale * (1.0 - k);

        if self.progress >= 1.0 {
            target.state = SwallowState::Removed;
            true
        } else {
            false
        }
    }
}
