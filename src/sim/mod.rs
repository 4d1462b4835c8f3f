//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod hole;
pub mod path;
pub mod popup;
pub mod progression;
pub mod rect;
pub mod state;
pub mod swallow;
pub mod tick;

pub use camera::{CameraRig, MenuMode};
pub use hole::Hole;
pub use path::{PathFollower, PathMode, Spawner};
pub use popup::{Popup, PopupLayer};
pub use progression::{LevelCostTable, PointsTable, Progression};
pub use rect::Rect;
pub use state::{GameEvent, GamePhase, GameState, RngState};
pub use swallow::{
    BodyMode, SwallowAnim, SwallowState, SwallowVerdict, Swallowable, can_swallow, swallow_verdict,
};
pub use tick::{TickInput, on_overlap_enter, on_overlap_exit, tick, update_camera};
