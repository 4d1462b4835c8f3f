//! Sinkhole entry point
//!
//! Headless demo: loads tuning, seeds a small level and lets the autopilot
//! play one round at a simulated 60 fps.
//!
//! Usage: `sinkhole [tuning.json] [seed]`

use glam::Vec2;

use sinkhole::consts::*;
use sinkhole::sim::{
    GameEvent, GamePhase, GameState, PathMode, Spawner, TickInput, tick, update_camera,
};
use sinkhole::tuning::Tuning;

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 60.0;
/// Stop after this many frames even if the round never ends
const MAX_FRAMES: u32 = 60 * 60 * 10;

/// Game instance holding all state
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
}

impl Game {
    fn new(seed: u64, tuning: Tuning) -> Self {
        let mut state = GameState::new(seed, tuning);
        populate(&mut state);
        Self {
            state,
            accumulator: 0.0,
            input: TickInput {
                idle_mode: true,
                start: true,
                ..Default::default()
            },
        }
    }

    /// Run simulation ticks
    fn update(&mut self, dt: f32) {
        let dt = dt.min(MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.start = false;
        }

        update_camera(&mut self.state, dt);

        for event in self.state.drain_events() {
            match event {
                GameEvent::LevelUp { level, scale } => {
                    log::info!("Hole reached level {} (scale {:.2})", level, scale)
                }
                GameEvent::PhaseChanged { phase } => log::info!("Phase: {:?}", phase),
                other => log::debug!("{:?}", other),
            }
        }
    }
}

/// Scatter a ring of static targets and add two NPC routes
fn populate(state: &mut GameState) {
    let center = state.tuning.world.bounds.map(|b| b.center()).unwrap_or(Vec2::ZERO);
    let max_level = state.tuning.progression.max_level;

    for ring in 1..=max_level {
        let count = 6 + ring * 2;
        let radius = 2.0 + ring as f32 * 2.5;
        for i in 0..count {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            let pos = center + Vec2::from_angle(angle) * radius;
            state.spawn_target(pos, ring, 0.25 + 0.1 * ring as f32);
        }
    }

    let mut walkers = Spawner::new(
        vec![
            center + Vec2::new(-12.0, -4.0),
            center + Vec2::new(12.0, -4.0),
            center + Vec2::new(12.0, 4.0),
        ],
        3.0,
    );
    walkers.levels = (1, 3);
    state.spawners.push(walkers);

    let mut patrol = Spawner::new(
        vec![center + Vec2::new(0.0, 8.0), center + Vec2::new(0.0, -8.0)],
        12.0,
    );
    patrol.route_mode = PathMode::Loop {
        dwell: 1.0,
        snap_on_loop: true,
    };
    patrol.levels = (2, 4);
    state.spawners.push(patrol);
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Sinkhole (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5EED);

    let mut game = Game::new(seed, tuning);
    let mut frames = 0;
    while game.state.phase != GamePhase::GameOver && frames < MAX_FRAMES {
        game.update(FRAME_DT);
        frames += 1;
    }

    let level = game.state.hole.as_ref().map(|h| h.level()).unwrap_or(0);
    log::info!(
        "Round over after {} frames: score {}, level {}, {} targets left",
        frames,
        game.state.score,
        level,
        game.state.targets.len()
    );
    println!("score={} level={}", game.state.score, level);
}
