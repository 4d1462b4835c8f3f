//! Game state and session flow
//!
//! `GameState` is the context object every operation takes: it owns the
//! hole, the targets, the camera, the score and the tuning. There are no
//! globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::CameraRig;
use super::hole::Hole;
use super::path::Spawner;
use super::popup::PopupLayer;
use super::swallow::Swallowable;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen: hole frozen, camera pulled back, NPCs keep moving
    Menu,
    /// Round in progress
    Playing,
    /// Round timer ran out
    GameOver,
}

/// Things that happened during a tick, for audio/UI to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Swallowed { target_id: u32, points: u32 },
    LevelUp { level: u32, scale: f32 },
    /// Hole touched a target it is too small for
    Blocked { target_id: u32 },
    Unblocked { target_id: u32 },
    ScoreChanged { score: u64 },
    PhaseChanged { phase: GamePhase },
    TargetSpawned { target_id: u32 },
    /// Hole removed; its pending swallows were dropped
    HoleDestroyed { cancelled: usize },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Fresh generator for the next draw; every call gets its own stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let mixed = self.seed ^ self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        self.stream += 1;
        Pcg32::seed_from_u64(mixed)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seconds left in the round
    pub round_time_left: f32,
    /// Session score
    pub score: u64,
    /// The player; None once destroyed
    pub hole: Option<Hole>,
    /// Live targets, in spawn order
    pub targets: Vec<Swallowable>,
    pub camera: Option<CameraRig>,
    pub spawners: Vec<Spawner>,
    /// Visual only
    #[serde(skip)]
    pub popups: PopupLayer,
    /// Drained by the caller
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// New session: hole at the world center, camera snapped onto it, and
    /// either the menu or a running round depending on tuning
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let center = tuning.world.bounds.map(|b| b.center()).unwrap_or(Vec2::ZERO);
        let hole = Hole::new(center, &tuning);
        let mut camera = CameraRig::new(tuning.camera.clone(), tuning.world.bounds);
        camera.snap_to(&hole);
        let popups = PopupLayer::new(&tuning.popup);
        let round_time_left = tuning.session.round_duration;

        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            popups,
            round_time_left,
            tuning,
            phase: GamePhase::Menu,
            time_ticks: 0,
            score: 0,
            hole: Some(hole),
            targets: Vec::new(),
            camera: Some(camera),
            spawners: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };

        if state.tuning.session.show_menu_on_start {
            state.enter_menu(true);
        } else {
            state.start_game();
        }
        state.events.clear();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged { phase });
        }
    }

    /// Show the menu: freeze the hole and pull the camera back
    pub fn enter_menu(&mut self, snap_zoom: bool) {
        if let Some(hole) = self.hole.as_mut() {
            hole.freeze(true);
        }
        if let Some(camera) = self.camera.as_mut() {
            camera.enter_menu(
                self.tuning.session.menu_zoom,
                self.tuning.session.menu_freezes_camera,
                snap_zoom,
            );
        }
        self.set_phase(GamePhase::Menu);
    }

    /// Begin a round: reset score and timer, release the hole
    pub fn start_game(&mut self) {
        self.reset_score();
        self.round_time_left = self.tuning.session.round_duration;
        if let Some(hole) = self.hole.as_mut() {
            hole.freeze(false);
        }
        if let Some(camera) = self.camera.as_mut() {
            camera.exit_menu();
        }
        self.set_phase(GamePhase::Playing);
    }

    /// End the round and lock the hole in place
    pub fn game_over(&mut self) {
        if let Some(hole) = self.hole.as_mut() {
            hole.freeze(true);
        }
        self.set_phase(GamePhase::GameOver);
    }

    /// Add to the session score (zero is ignored)
    pub fn add_score(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.score += u64::from(amount);
        self.events.push(GameEvent::ScoreChanged { score: self.score });
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
        self.events.push(GameEvent::ScoreChanged { score: 0 });
    }

    /// Place a stationary target
    pub fn spawn_target(&mut self, pos: Vec2, required_level: u32, radius: f32) -> u32 {
        let id = self.next_entity_id();
        self.targets.push(Swallowable::new(id, required_level, pos, radius));
        self.events.push(GameEvent::TargetSpawned { target_id: id });
        id
    }

    /// Release one target from `spawners[index]` onto its route
    pub fn spawn_from(&mut self, index: usize) -> Option<u32> {
        let spawner = self.spawners.get(index)?;
        let (lo, hi) = spawner.level_range();
        let radius = spawner.target_radius;
        let follower = spawner.make_follower();

        let level = self.rng_state.next_rng().random_range(lo..=hi);
        let id = self.next_entity_id();
        let target = Swallowable::new(id, level, Vec2::ZERO, radius).with_path(follower);
        log::debug!("Spawned target {} (level {}) at {:?}", id, level, target.pos);
        self.targets.push(target);
        self.events.push(GameEvent::TargetSpawned { target_id: id });
        Some(id)
    }

    pub fn target(&self, id: u32) -> Option<&Swallowable> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn target_mut(&mut self, id: u32) -> Option<&mut Swallowable> {
        self.targets.iter_mut().find(|t| t.id == id)
    }

    /// Remove the hole. Its swallow animations go with it and never complete;
    /// targets it was pulling in stay flagged and are never eaten.
    pub fn destroy_hole(&mut self) {
        if let Some(hole) = self.hole.take() {
            let cancelled = hole.swallows.len();
            if cancelled > 0 {
                log::warn!("Hole destroyed with {} swallows in flight", cancelled);
            }
            self.events.push(GameEvent::HoleDestroyed { cancelled });
        }
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::path::Spawner;

    #[test]
    fn test_new_starts_in_menu_with_frozen_hole() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.hole.as_ref().unwrap().is_frozen());
        let camera = state.camera.as_ref().unwrap();
        assert!(camera.in_menu());
        assert_eq!(camera.zoom, state.tuning.session.menu_zoom);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_start_and_end_round() {
        let mut tuning = Tuning::default();
        tuning.session.show_menu_on_start = false;
        let mut state = GameState::new(1, tuning);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.hole.as_ref().unwrap().is_frozen());

        state.add_score(12);
        state.game_over();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.hole.as_ref().unwrap().is_frozen());

        state.start_game();
        assert_eq!(state.score, 0);
        assert_eq!(state.round_time_left, state.tuning.session.round_duration);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ScoreChanged { score: 12 }));
        assert!(events.contains(&GameEvent::PhaseChanged {
            phase: GamePhase::Playing
        }));
    }

    #[test]
    fn test_zero_score_ignored() {
        let mut state = GameState::new(1, Tuning::default());
        state.add_score(0);
        assert_eq!(state.score, 0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_spawner_levels_deterministic() {
        let route = vec![Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0)];
        let make = || {
            let mut state = GameState::new(42, Tuning::default());
            let mut spawner = Spawner::new(route.clone(), 1.0);
            spawner.levels = (1, 5);
            state.spawners.push(spawner);
            let ids: Vec<u32> = (0..8).filter_map(|_| state.spawn_from(0)).collect();
            ids.iter()
                .map(|&id| {
                    let t = state.target(id).unwrap();
                    assert_eq!(t.pos, Vec2::new(-5.0, 0.0));
                    assert!((1..=5).contains(&t.required_level));
                    t.required_level
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(make(), make());
        let mut state = GameState::new(42, Tuning::default());
        assert_eq!(state.spawn_from(3), None);
    }

    #[test]
    fn test_state_survives_json_round_trip() {
        let mut state = GameState::new(9, Tuning::default());
        state.start_game();
        state.spawn_target(Vec2::new(2.0, 1.0), 3, 0.4);
        state.spawners.push(Spawner::new(vec![Vec2::ZERO, Vec2::X], 2.0));
        state.spawn_from(0);
        state.add_score(7);
        state.hole.as_mut().unwrap().pos = Vec2::new(-4.0, 2.5);

        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.seed, state.seed);
        assert_eq!(restored.phase, GamePhase::Playing);
        assert_eq!(restored.score, 7);
        assert_eq!(restored.tuning, state.tuning);
        assert_eq!(restored.hole.as_ref().unwrap().pos, Vec2::new(-4.0, 2.5));
        let ids = |s: &GameState| {
            s.targets
                .iter()
                .map(|t| (t.id, t.required_level))
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&restored), ids(&state));
        assert_eq!(restored.camera.as_ref().unwrap().zoom, state.camera.as_ref().unwrap().zoom);
        // Visual-only and transient fields start empty
        assert!(restored.events.is_empty());
        assert!(restored.popups.active.is_empty());
        // Id allocation and RNG streams carry on where they left off
        assert_eq!(restored.next_entity_id(), state.next_entity_id());
        assert_eq!(restored.rng_state.stream, state.rng_state.stream);
    }

    #[test]
    fn test_destroy_hole_reports_cancelled() {
        let mut state = GameState::new(1, Tuning::default());
        let id = state.spawn_target(Vec2::ZERO, 1, 0.3);
        let hole = state.hole.as_mut().unwrap();
        let target = state.targets.iter_mut().find(|t| t.id == id).unwrap();
        hole.start_swallow(target, 0.35);
        state.destroy_hole();
        assert!(state.hole.is_none());
        assert!(state
            .drain_events()
            .contains(&GameEvent::HoleDestroyed { cancelled: 1 }));
    }
}
