//! Floating "+N" score popups
//!
//! Purely visual: they rise above the hole and fade out, then go back to the
//! pool. Nothing in gameplay reads them.

use glam::Vec2;

use crate::ease_out_cubic;
use crate::pool::ObjectPool;
use crate::tuning::PopupTuning;

/// A single popup
#[derive(Debug, Clone, Default)]
pub struct Popup {
    pub text: String,
    pub pos: Vec2,
    pub alpha: f32,
    start_pos: Vec2,
    /// Offset from the anchor when spawned
    anchor_offset: Vec2,
    elapsed: f32,
    duration: f32,
    rise: f32,
}

impl Popup {
    /// Reset for a new showing at `world_pos`, optionally riding along with
    /// an anchor (the hole)
    pub fn play(
        &mut self,
        text: String,
        world_pos: Vec2,
        anchor: Option<Vec2>,
        tuning: &PopupTuning,
    ) {
        self.text = text;
        self.pos = world_pos;
        self.start_pos = world_pos;
        self.anchor_offset = world_pos - anchor.unwrap_or(Vec2::ZERO);
        self.elapsed = 0.0;
        self.duration = tuning.duration.max(f32::EPSILON);
        self.rise = tuning.rise_distance;
        self.alpha = 1.0;
    }

    /// Advance one frame. `anchor` is the hole position and scale if the hole
    /// still exists. Returns true when finished.
    pub fn update(&mut self, dt: f32, anchor: Option<(Vec2, f32)>) -> bool {
        self.elapsed += dt.max(0.0);
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);

        let (base, size) = match anchor {
            Some((pos, scale)) => (pos + self.anchor_offset, scale.clamp(0.5, 3.0)),
            None => (self.start_pos, 1.0),
        };
        self.pos = base + Vec2::Y * (self.rise * size * ease_out_cubic(t));
        self.alpha = 1.0 - t;
        t >= 1.0
    }
}

/// Live popups plus their pool
#[derive(Debug, Clone, Default)]
pub struct PopupLayer {
    pub active: Vec<Popup>,
    pool: ObjectPool<Popup>,
}

impl PopupLayer {
    pub fn new(tuning: &PopupTuning) -> Self {
        Self {
            active: Vec::with_capacity(tuning.pool_size),
            pool: ObjectPool::with_capacity(tuning.pool_size, true, Popup::default),
        }
    }

    /// Show `+points` near the hole
    pub fn spawn_points(&mut self, points: u32, hole_pos: Vec2, tuning: &PopupTuning) {
        let Some(mut popup) = self.pool.spawn() else {
            return;
        };
        popup.play(format!("+{}", points), hole_pos + tuning.offset, Some(hole_pos), tuning);
        self.active.push(popup);
    }

    pub fn update(&mut self, dt: f32, anchor: Option<(Vec2, f32)>) {
        let mut i = 0;
        while i < self.active.len() {
            if self.active[i].update(dt, anchor) {
                let done = self.active.swap_remove(i);
                self.pool.despawn(done);
            } else {
                i += 1;
            }
        }
    }

    /// Popups waiting in the pool
    pub fn pooled(&self) -> usize {
        self.pool.available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_rises_and_fades() {
        let tuning = PopupTuning {
            rise_distance: 1.0,
            duration: 1.0,
            ..Default::default()
        };
        let mut p = Popup::default();
        p.play("+3".into(), Vec2::new(0.0, 0.5), Some(Vec2::ZERO), &tuning);

        assert!(!p.update(0.5, Some((Vec2::ZERO, 1.0))));
        assert!((p.alpha - 0.5).abs() < 1e-5);
        assert!((p.pos.y - (0.5 + 0.875)).abs() < 1e-5);

        assert!(p.update(0.5, Some((Vec2::ZERO, 1.0))));
        assert_eq!(p.alpha, 0.0);
    }

    #[test]
    fn test_popup_follows_anchor_and_scales_rise() {
        let tuning = PopupTuning {
            rise_distance: 1.0,
            duration: 1.0,
            ..Default::default()
        };
        let mut p = Popup::default();
        p.play("+1".into(), Vec2::new(0.0, 0.5), Some(Vec2::ZERO), &tuning);
        p.update(1.0, Some((Vec2::new(10.0, 0.0), 10.0)));
        // Scale clamped to 3
        assert!((p.pos - Vec2::new(10.0, 3.5)).length() < 1e-5);
    }

    #[test]
    fn test_layer_recycles_through_pool() {
        let tuning = PopupTuning {
            pool_size: 2,
            duration: 0.5,
            ..Default::default()
        };
        let mut layer = PopupLayer::new(&tuning);
        assert_eq!(layer.pooled(), 2);
        layer.spawn_points(3, Vec2::ZERO, &tuning);
        layer.spawn_points(5, Vec2::ZERO, &tuning);
        layer.spawn_points(7, Vec2::ZERO, &tuning);
        assert_eq!(layer.active.len(), 3);
        assert_eq!(layer.pooled(), 0);
        assert_eq!(layer.active[2].text, "+7");

        layer.update(1.0, None);
        assert!(layer.active.is_empty());
        assert_eq!(layer.pooled(), 3);
    }
}
