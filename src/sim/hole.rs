//! The player's hole
//!
//! Moves under input, swallows targets, levels up and grows. The hole owns
//! its in-flight swallow animations.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::progression::{LevelCostTable, Progression};
use super::rect::Rect;
use super::swallow::{SwallowAnim, Swallowable};
use crate::tuning::Tuning;

/// The player-controlled hole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hole {
    pub pos: Vec2,
    /// Never shrinks during play
    scale: f32,
    /// Radius at scale 1
    pub base_radius: f32,
    /// World units per second
    pub move_speed: f32,
    /// Scale multiplier added per level-up
    pub growth_per_level: f32,
    pub progress: Progression,
    /// Input is ignored while frozen
    frozen: bool,
    /// Swallow animations in flight
    pub swallows: Vec<SwallowAnim>,
}

impl Hole {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            scale: 1.0,
            base_radius: tuning.hole.base_radius,
            move_speed: tuning.hole.move_speed,
            growth_per_level: tuning.hole.growth_per_level,
            progress: Progression::new(tuning.hole.start_level, tuning.progression.max_level),
            frozen: false,
            swallows: Vec::new(),
        }
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.progress.level()
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Radius in world units at the current scale
    #[inline]
    pub fn radius(&self) -> f32 {
        self.base_radius * self.scale
    }

    /// Gate input (menus, game over)
    pub fn freeze(&mut self, frozen: bool) {
        if self.frozen != frozen {
            log::debug!("Hole {}", if frozen { "frozen" } else { "released" });
        }
        self.frozen = frozen;
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Move along `dir` (normalized here) for one physics step, staying
    /// inside `bounds` if given
    pub fn apply_input(&mut self, dir: Vec2, dt: f32, bounds: Option<&Rect>) {
        if self.frozen {
            return;
        }
        let dir = dir.normalize_or_zero();
        self.pos += dir * self.move_speed * dt.max(0.0);
        if let Some(bounds) = bounds {
            self.pos = bounds.clamp_circle(self.pos, self.radius());
        }
    }

    /// Multiply scale by `1 + growth_per_level`
    pub fn grow(&mut self) {
        self.scale *= 1.0 + self.growth_per_level.max(0.0);
    }

    /// Pay points into the ledger and take every level-up it covers,
    /// growing once per level. Returns `(level, scale)` after each step.
    pub fn award(&mut self, points: u32, costs: &LevelCostTable) -> Vec<(u32, f32)> {
        let mut reached = Vec::new();
        if points == 0 {
            return reached;
        }
        self.progress.deposit(points);
        while let Some(level) = self.progress.try_advance(costs) {
            self.grow();
            reached.push((level, self.scale));
        }
        reached
    }

    /// Start pulling `target` in. False if someone already has it.
    pub fn start_swallow(&mut self, target: &mut Swallowable, duration: f32) -> bool {
        if !target.begin_swallow() {
            return false;
        }
        self.swallows.push(SwallowAnim::new(target, duration));
        true
    }

    /// Whether this hole is currently swallowing `target_id`
    pub fn is_swallowing(&self, target_id: u32) -> bool {
        self.swallows.iter().any(|a| a.target_id == target_id)
    }

    /// Check circle overlap with a target
    pub fn overlaps(&self, target: &Swallowable) -> bool {
        target.collider_enabled
            && self.pos.distance(target.pos) < self.radius() + target.world_radius()
    }
}
