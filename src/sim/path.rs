//! Waypoint routes for NPC targets, and the timed spawner that feeds them

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Minimum spawner interval (seconds)
const MIN_SPAWN_INTERVAL: f32 = 0.01;
/// Default distance at which a waypoint counts as reached
pub const ARRIVE_THRESHOLD: f32 = 0.05;

/// What happens at the end of a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathMode {
    /// Stop at the last waypoint
    Once,
    /// Head back to the first waypoint, wait `dwell` seconds there, go again
    Loop { dwell: f32, snap_on_loop: bool },
}

/// Step from `current` toward `target` by at most `max_delta`
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_delta || dist == 0.0 {
        target
    } else {
        current + delta / dist * max_delta
    }
}

/// Walks a target along a list of waypoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathFollower {
    waypoints: Vec<Vec2>,
    /// Waypoint currently headed for
    index: usize,
    pub speed: f32,
    pub arrive_threshold: f32,
    pub mode: PathMode,
    /// Remaining wait at the start of a lap
    dwell_left: f32,
    finished: bool,
    /// Completed laps (loop mode)
    laps: u32,
}

impl PathFollower {
    pub fn new(waypoints: Vec<Vec2>, speed: f32, mode: PathMode) -> Self {
        let mut follower = Self {
            waypoints,
            index: 0,
            speed: speed.max(0.0),
            arrive_threshold: ARRIVE_THRESHOLD,
            mode,
            dwell_left: 0.0,
            finished: false,
            laps: 0,
        };
        if let PathMode::Loop { dwell, .. } = mode {
            follower.begin_dwell(dwell);
        }
        follower
    }

    pub fn start_pos(&self) -> Option<Vec2> {
        self.waypoints.first().copied()
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    #[inline]
    pub fn target_index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn laps(&self) -> u32 {
        self.laps
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    pub fn is_dwelling(&self) -> bool {
        self.dwell_left > 0.0
    }

    /// Cycles through `count` variants, one step per completed lap
    pub fn variant(&self, start: u32, count: u32) -> u32 {
        if count == 0 {
            0
        } else {
            (start + self.laps) % count
        }
    }

    fn begin_dwell(&mut self, dwell: f32) {
        self.index = 0;
        self.dwell_left = dwell.max(0.0);
        if self.dwell_left == 0.0 && self.waypoints.len() > 1 {
            self.index = 1;
        }
    }

    /// Move one step from `pos`, returning the new position
    pub fn advance(&mut self, pos: Vec2, dt: f32) -> Vec2 {
        match self.waypoints.len() {
            0 => return pos,
            1 => return self.waypoints[0],
            _ => {}
        }
        if self.finished {
            return pos;
        }
        if self.dwell_left > 0.0 {
            self.dwell_left -= dt.max(0.0);
            if self.dwell_left <= 0.0 {
                self.dwell_left = 0.0;
                self.index = 1;
            }
            return pos;
        }

        let target = self.waypoints[self.index];
        let mut next = move_towards(pos, target, self.speed * dt.max(0.0));

        if next.distance(target) <= self.arrive_threshold {
            self.index += 1;
            if self.index >= self.waypoints.len() {
                match self.mode {
                    PathMode::Once => {
                        self.index = self.waypoints.len() - 1;
                        self.finished = true;
                    }
                    PathMode::Loop { dwell, snap_on_loop } => {
                        if snap_on_loop {
                            next = self.waypoints[0];
                        }
                        self.laps += 1;
                        self.begin_dwell(dwell);
                    }
                }
            }
        }
        next
    }
}

/// Releases a new target every `interval` seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub interval: f32,
    timer: f32,
    /// Fire once on the first update
    pub spawn_on_start: bool,
    started: bool,
    /// Route given to each spawned target (first point is the spawn point)
    pub route: Vec<Vec2>,
    pub route_speed: f32,
    pub route_mode: PathMode,
    /// Inclusive range of required levels to draw from
    pub levels: (u32, u32),
    pub target_radius: f32,
}

impl Spawner {
    pub fn new(route: Vec<Vec2>, interval: f32) -> Self {
        Self {
            interval,
            timer: 0.0,
            spawn_on_start: true,
            started: false,
            route,
            route_speed: 3.0,
            route_mode: PathMode::Once,
            levels: (1, 1),
            target_radius: 0.4,
        }
    }

    /// Advance the timer and return how many spawns are due
    pub fn update(&mut self, dt: f32) -> u32 {
        let mut due = 0;
        if !self.started {
            self.started = true;
            if self.spawn_on_start {
                due += 1;
            }
        }
        self.timer += dt.max(0.0);
        if self.timer >= self.interval.max(MIN_SPAWN_INTERVAL) {
            self.timer = 0.0;
            due += 1;
        }
        due
    }

    /// Inclusive level range with the bounds put in order
    pub fn level_range(&self) -> (u32, u32) {
        let (a, b) = self.levels;
        (a.min(b), a.max(b))
    }

    /// Fresh follower for a newly spawned target
    pub fn make_follower(&self) -> PathFollower {
        PathFollower::new(self.route.clone(), self.route_speed, self.route_mode)
    }
}
