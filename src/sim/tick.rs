//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. The
//! camera is not part of the physics step: call [`update_camera`] once per
//! rendered frame.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState};
use super::swallow::{SwallowState, SwallowVerdict, can_swallow, swallow_verdict};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement direction (any length; normalized by the hole)
    pub move_dir: Option<Vec2>,
    /// Start a round from the menu or game over screen
    pub start: bool,
    /// Idle/demo mode - autopilot drives the hole
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = dt.max(0.0);

    if input.start && state.phase != GamePhase::Playing {
        state.start_game();
    }

    state.time_ticks += 1;

    // Round timer
    if state.phase == GamePhase::Playing {
        state.round_time_left -= dt;
        if state.round_time_left <= 0.0 {
            state.round_time_left = 0.0;
            state.game_over();
        }
    }

    // Hole movement
    let move_dir = if input.idle_mode {
        autopilot_dir(state)
    } else {
        input.move_dir
    };
    if let (Some(hole), Some(dir)) = (state.hole.as_mut(), move_dir) {
        hole.apply_input(dir, dt, state.tuning.world.bounds.as_ref());
    }

    // NPCs keep moving in every phase
    for target in &mut state.targets {
        target.integrate(dt);
    }

    for index in 0..state.spawners.len() {
        let due = state.spawners[index].update(dt);
        for _ in 0..due {
            state.spawn_from(index);
        }
    }

    if state.phase == GamePhase::Playing {
        detect_overlaps(state);
    } else {
        clear_overlaps(state);
    }

    advance_swallows(state, dt);

    let anchor = state.hole.as_ref().map(|h| (h.pos, h.scale()));
    state.popups.update(dt, anchor);
}

/// Hole started touching a target.
///
/// Eligible targets start their swallow animation; targets the hole is too
/// small for are faded until the overlap ends. Missing hole or target is a
/// no-op.
pub fn on_overlap_enter(state: &mut GameState, target_id: u32) -> SwallowVerdict {
    let duration = state.tuning.swallow.duration;
    let Some(target) = state.targets.iter_mut().find(|t| t.id == target_id) else {
        return SwallowVerdict::Neutral;
    };
    target.overlapping = true;
    let Some(hole) = state.hole.as_mut() else {
        return SwallowVerdict::Neutral;
    };

    let verdict = swallow_verdict(hole.level(), target.required_level, target.is_being_swallowed());
    match verdict {
        SwallowVerdict::Eligible => {
            hole.start_swallow(target, duration);
            log::debug!(
                "Swallowing target {} (needs {}, hole level {})",
                target_id,
                target.required_level,
                hole.level()
            );
        }
        SwallowVerdict::Blocked => {
            if !target.blocked {
                target.blocked = true;
                state.events.push(GameEvent::Blocked { target_id });
            }
        }
        SwallowVerdict::Neutral => {}
    }
    verdict
}

/// Hole stopped touching a target: drop the blocked fade
pub fn on_overlap_exit(state: &mut GameState, target_id: u32) {
    let Some(target) = state.targets.iter_mut().find(|t| t.id == target_id) else {
        return;
    };
    target.overlapping = false;
    if target.blocked {
        target.blocked = false;
        state.events.push(GameEvent::Unblocked { target_id });
    }
}

/// Camera update, once per rendered frame
pub fn update_camera(state: &mut GameState, dt: f32) {
    if let Some(camera) = state.camera.as_mut() {
        camera.tick(dt, state.hole.as_ref());
    }
}

/// Circle overlap pass that turns contact changes into enter/exit calls
fn detect_overlaps(state: &mut GameState) {
    let Some(hole) = state.hole.as_ref() else {
        clear_overlaps(state);
        return;
    };

    let mut entered = Vec::new();
    let mut exited = Vec::new();
    for target in &state.targets {
        let touching = hole.overlaps(target);
        if touching && !target.overlapping {
            entered.push(target.id);
        } else if !touching && target.overlapping {
            exited.push(target.id);
        }
    }

    for id in exited {
        on_overlap_exit(state, id);
    }
    for id in entered {
        on_overlap_enter(state, id);
    }
}

/// Outside of a round nothing counts as touching
fn clear_overlaps(state: &mut GameState) {
    let touching: Vec<u32> = state
        .targets
        .iter()
        .filter(|t| t.overlapping)
        .map(|t| t.id)
        .collect();
    for id in touching {
        on_overlap_exit(state, id);
    }
}

/// Step every swallow animation the hole owns and settle the finished ones
fn advance_swallows(state: &mut GameState, dt: f32) {
    let Some(hole) = state.hole.as_mut() else {
        return;
    };
    let dest = hole.pos;
    let targets = &mut state.targets;
    let mut completed: Vec<(u32, u32)> = Vec::new();

    hole.swallows.retain_mut(|anim| {
        match targets.iter_mut().find(|t| t.id == anim.target_id) {
            Some(target) => {
                if anim.step(dt, dest, target) {
                    completed.push((target.id, target.required_level));
                    false
                } else {
                    true
                }
            }
            // Target vanished from under us
            None => false,
        }
    });

    state.targets.retain(|t| t.state != SwallowState::Removed);

    for (target_id, required_level) in completed {
        complete_swallow(state, target_id, required_level);
    }
}

/// Pay out a finished swallow: score, ledger, level-ups, popup
fn complete_swallow(state: &mut GameState, target_id: u32, required_level: u32) {
    let points = state.tuning.progression.points.points_for(required_level);
    state.add_score(points);
    state.events.push(GameEvent::Swallowed { target_id, points });

    let Some(hole) = state.hole.as_mut() else {
        return;
    };
    for (level, scale) in hole.award(points, &state.tuning.progression.level_costs) {
        log::info!("Level up! {} (scale {:.3})", level, scale);
        state.events.push(GameEvent::LevelUp { level, scale });
    }
    let hole_pos = hole.pos;
    if points > 0 {
        state.popups.spawn_points(points, hole_pos, &state.tuning.popup);
    }
}

/// Steer toward the nearest target the hole can already eat
fn autopilot_dir(state: &GameState) -> Option<Vec2> {
    let hole = state.hole.as_ref()?;
    let level = hole.level();
    state
        .targets
        .iter()
        .filter(|t| t.state == SwallowState::Idle && can_swallow(level, t.required_level))
        .min_by(|a, b| {
            a.pos
                .distance_squared(hole.pos)
                .partial_cmp(&b.pos.distance_squared(hole.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|t| t.pos - hole.pos)
}
