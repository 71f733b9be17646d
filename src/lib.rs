//! Shape Grazer - simulation core for a grid-based eat-and-grow arcade game
//!
//! Core modules:
//! - `sim`: Simulation (grid occupancy, spawning, streak scoring, orchestration)
//! - `highscores`: In-memory score board fed on player death
//! - `settings`: Data-driven spawn/score tuning with JSON overrides
//! - `error`: Construction-time failures

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use highscores::{ScoreBoard, ScoreSink};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame interval of the host loop (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Polygon sides for spawned food and enemies
    pub const ENTITY_SIDES: u32 = 6;
    /// Polygon sides for the player shape
    pub const PLAYER_SIDES: u32 = 12;
    /// Player shape radii before scaling
    pub const PLAYER_OUTER_RADIUS: f32 = 0.5;
    pub const PLAYER_INNER_RADIUS: f32 = 0.4;

    /// Scale every shape starts at (and returns to on reset)
    pub const DEFAULT_SCALE: f32 = 0.1;
    /// Scale targeted by spawned entities once they appear
    pub const SPAWNED_SCALE: f32 = 1.0;
    /// Scale the player grows to while boosting
    pub const PLAYER_BOOST_SCALE: f32 = 4.0;
    /// Scale change per second when growing / shrinking
    pub const SCALE_EXPAND_SPEED: f32 = 2.0;
    pub const SCALE_SHRINK_SPEED: f32 = 2.0;

    /// Food radius is drawn from this fraction range of the max radius
    pub const FOOD_RADIUS_FRACTION: (f32, f32) = (0.4, 0.8);
    /// Enemy radius fraction range
    pub const ENEMY_RADIUS_FRACTION: (f32, f32) = (0.4, 0.8);

    /// Spin speed (radians/sec) before the random range is applied
    pub const SPIN_BASE_SPEED: f32 = 1.0;
    pub const SPIN_RANGE: f32 = 0.5;
}

/// Integer cell containing a world position (floor rounding on both axes)
#[inline]
pub fn world_to_cell(pos: Vec2) -> (i32, i32) {
    (pos.x.floor() as i32, pos.y.floor() as i32)
}

/// World position of a cell's origin corner
#[inline]
pub fn cell_to_world(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32, y as f32)
}
