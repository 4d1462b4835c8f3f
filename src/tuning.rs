//! Data-driven game balance
//!
//! Every number the simulation reads lives here. All sections default
//! field-by-field, so a tuning file only needs the values it changes, and
//! nonsense values are pulled back into range by [`Tuning::sanitized`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::progression::{LevelCostTable, PointsTable};
use crate::sim::rect::Rect;

/// Errors from reading a tuning file
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Hole movement and growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoleTuning {
    /// Radius at scale 1
    pub base_radius: f32,
    /// World units per second
    pub move_speed: f32,
    pub start_level: u32,
    /// Scale multiplier added per level-up (0.12 = +12%)
    pub growth_per_level: f32,
}

impl Default for HoleTuning {
    fn default() -> Self {
        Self {
            base_radius: HOLE_BASE_RADIUS,
            move_speed: HOLE_MOVE_SPEED,
            start_level: HOLE_START_LEVEL,
            growth_per_level: GROWTH_PER_LEVEL,
        }
    }
}

/// Swallow animation and feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwallowTuning {
    /// Seconds for a target to vanish into the hole
    pub duration: f32,
    /// Alpha of targets the hole is too small for
    pub blocked_alpha: f32,
}

impl Default for SwallowTuning {
    fn default() -> Self {
        Self {
            duration: SWALLOW_DURATION,
            blocked_alpha: BLOCKED_ALPHA,
        }
    }
}

/// Levels, costs and payouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub max_level: u32,
    pub level_costs: LevelCostTable,
    pub points: PointsTable,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            level_costs: LevelCostTable::default(),
            points: PointsTable::default(),
        }
    }
}

/// How gameplay zoom follows the hole
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ZoomFormula {
    /// `start + per_level * (level - 1)`
    ByLevel { start: f32, per_level: f32 },
    /// `base + per_unit_radius * hole_radius`
    ByRadius { base: f32, per_unit_radius: f32 },
}

impl Default for ZoomFormula {
    fn default() -> Self {
        ZoomFormula::ByLevel {
            start: CAMERA_START_ZOOM,
            per_level: CAMERA_ZOOM_PER_LEVEL,
        }
    }
}

impl ZoomFormula {
    pub fn evaluate(&self, level: u32, hole_radius: f32) -> f32 {
        match *self {
            ZoomFormula::ByLevel { start, per_level } => {
                start + per_level * (level.max(1) - 1) as f32
            }
            ZoomFormula::ByRadius {
                base,
                per_unit_radius,
            } => base + per_unit_radius * hole_radius.max(0.0),
        }
    }
}

/// Camera follow and zoom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Lower = snappier
    pub follow_smooth_time: f32,
    pub zoom_smooth_time: f32,
    /// Zoom smoothing while in menu mode
    pub menu_smooth_time: f32,
    pub zoom: ZoomFormula,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Viewport width / height
    pub aspect: f32,
    /// Added to the hole position
    pub offset: Vec2,
    /// Cap on follow speed (None = unlimited)
    pub max_follow_speed: Option<f32>,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            follow_smooth_time: CAMERA_FOLLOW_SMOOTH_TIME,
            zoom_smooth_time: CAMERA_ZOOM_SMOOTH_TIME,
            menu_smooth_time: CAMERA_MENU_SMOOTH_TIME,
            zoom: ZoomFormula::default(),
            min_zoom: CAMERA_MIN_ZOOM,
            max_zoom: CAMERA_MAX_ZOOM,
            aspect: CAMERA_ASPECT,
            offset: Vec2::ZERO,
            max_follow_speed: None,
        }
    }
}

/// Menu / round flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Round length in seconds
    pub round_duration: f32,
    pub menu_zoom: f32,
    /// Stop camera tracking while the menu is up
    pub menu_freezes_camera: bool,
    pub show_menu_on_start: bool,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            round_duration: ROUND_DURATION,
            menu_zoom: CAMERA_MENU_ZOOM,
            menu_freezes_camera: true,
            show_menu_on_start: true,
        }
    }
}

/// Floating "+N" score popups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupTuning {
    pub rise_distance: f32,
    pub duration: f32,
    pub pool_size: usize,
    /// Where the popup appears relative to the hole
    pub offset: Vec2,
}

impl Default for PopupTuning {
    fn default() -> Self {
        Self {
            rise_distance: 0.6,
            duration: 0.6,
            pool_size: 16,
            offset: Vec2::new(0.0, 0.5),
        }
    }
}

/// Playfield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// Hole and camera stay inside this (None = unbounded)
    pub bounds: Option<Rect>,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            bounds: Some(Rect::new(Vec2::new(-40.0, -25.0), Vec2::new(40.0, 25.0))),
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub hole: HoleTuning,
    pub swallow: SwallowTuning,
    pub progression: ProgressionTuning,
    pub camera: CameraTuning,
    pub session: SessionTuning,
    pub popup: PopupTuning,
    pub world: WorldTuning,
}

impl Tuning {
    /// Parse from JSON and sanitize
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn to_json_pretty(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read a tuning file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Pull every value back into a usable range
    pub fn sanitized(mut self) -> Self {
        let p = &mut self.progression;
        p.max_level = p.max_level.max(1);
        self.hole.start_level = self.hole.start_level.clamp(1, p.max_level);
        self.hole.base_radius = self.hole.base_radius.max(0.0);
        self.hole.move_speed = self.hole.move_speed.max(0.0);
        self.hole.growth_per_level = self.hole.growth_per_level.max(0.0);

        self.swallow.duration = self.swallow.duration.max(MIN_SWALLOW_DURATION);
        self.swallow.blocked_alpha = self.swallow.blocked_alpha.clamp(0.0, 1.0);

        let c = &mut self.camera;
        c.follow_smooth_time = c.follow_smooth_time.max(MIN_SMOOTH_TIME);
        c.zoom_smooth_time = c.zoom_smooth_time.max(MIN_SMOOTH_TIME);
        c.menu_smooth_time = c.menu_smooth_time.max(MIN_SMOOTH_TIME);
        c.min_zoom = c.min_zoom.max(CAMERA_MIN_ZOOM);
        if c.max_zoom < c.min_zoom {
            c.max_zoom = c.min_zoom;
        }
        if c.aspect.is_nan() || c.aspect <= 0.0 {
            c.aspect = CAMERA_ASPECT;
        }
        // A speed cap has to be positive to mean anything
        c.max_follow_speed = c.max_follow_speed.filter(|&v| v > 0.0);

        self.session.round_duration = self.session.round_duration.max(0.0);
        self.popup.duration = self.popup.duration.max(MIN_SWALLOW_DURATION);
        self
    }
}
