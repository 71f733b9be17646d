//! Spawn and scoring tuning
//!
//! Every value has a default; a partial JSON document overrides only the
//! fields it names.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Largest accepted spawn window side, in cells
pub const MAX_SPAWN_WINDOW: i32 = 1024;

/// Simulation settings, fixed at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Spawning ===
    /// Frames between spawn passes
    pub tick_rate: u32,
    /// Minimum Manhattan distance from the player for spawns after the first pass
    pub min_spawn_distance: i32,
    /// Spawn window around the player, in cells
    pub grid_width: i32,
    pub grid_height: i32,

    // === Enemies ===
    /// Minimum cell distance between a new enemy and the player
    pub enemy_min_distance_from_player: f32,
    /// Minimum cell distance between two enemies
    pub enemy_min_distance_from_enemies: f32,
    /// Maximum enemies placed per spawn pass
    pub enemy_spawn_count_per_tick: u32,

    // === Shapes ===
    /// Max outer radius of a spawned polygon
    pub polygon_outer_radius: f32,
    /// Ring thickness (outer minus inner radius)
    pub polygon_thickness: f32,
    /// Radius fraction ranges (min, max) of `polygon_outer_radius`
    pub food_radius_fraction: (f32, f32),
    pub enemy_radius_fraction: (f32, f32),

    // === Scoring ===
    /// Seconds without eating after which the next eat closes the streak
    pub time_difference_to_zero_streak: f32,

    // === Culling ===
    /// Entities further than this from the player are destroyed
    pub distance_to_be_disabled: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            min_spawn_distance: 2,
            grid_width: 10,
            grid_height: 10,

            enemy_min_distance_from_player: 3.0,
            enemy_min_distance_from_enemies: 2.0,
            enemy_spawn_count_per_tick: 2,

            polygon_outer_radius: 0.5,
            polygon_thickness: 0.1,
            food_radius_fraction: FOOD_RADIUS_FRACTION,
            enemy_radius_fraction: ENEMY_RADIUS_FRACTION,

            time_difference_to_zero_streak: 5.0,

            distance_to_be_disabled: 5.0,
        }
    }
}

impl Settings {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the scheduler cannot work with
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |msg: String| Err(SimError::InvalidSettings(msg));

        if self.grid_width <= 0 || self.grid_height <= 0 {
            return invalid(format!(
                "spawn window must be positive, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }
        if self.grid_width > MAX_SPAWN_WINDOW || self.grid_height > MAX_SPAWN_WINDOW {
            return invalid(format!(
                "spawn window {}x{} exceeds {MAX_SPAWN_WINDOW} cells per side",
                self.grid_width, self.grid_height
            ));
        }
        if self.min_spawn_distance < 0 {
            return invalid(format!("min_spawn_distance {} is negative", self.min_spawn_distance));
        }
        if !(self.polygon_outer_radius > 0.0) {
            return invalid(format!(
                "polygon_outer_radius {} must be positive",
                self.polygon_outer_radius
            ));
        }
        if !(self.polygon_thickness >= 0.0 && self.polygon_thickness < self.polygon_outer_radius) {
            return invalid(format!(
                "polygon_thickness {} must be in [0, {})",
                self.polygon_thickness, self.polygon_outer_radius
            ));
        }
        for (name, (lo, hi)) in [
            ("food_radius_fraction", self.food_radius_fraction),
            ("enemy_radius_fraction", self.enemy_radius_fraction),
        ] {
            if !(lo > 0.0 && lo <= hi) {
                return invalid(format!("{name} ({lo}, {hi}) must satisfy 0 < min <= max"));
            }
        }
        if self.enemy_min_distance_from_player < 0.0 || self.enemy_min_distance_from_enemies < 0.0 {
            return invalid("enemy distances must not be negative".to_string());
        }
        if !(self.time_difference_to_zero_streak >= 0.0) {
            return invalid(format!(
                "time_difference_to_zero_streak {} must not be negative",
                self.time_difference_to_zero_streak
            ));
        }
        if !(self.distance_to_be_disabled > 0.0) {
            return invalid(format!(
                "distance_to_be_disabled {} must be positive",
                self.distance_to_be_disabled
            ));
        }
        Ok(())
    }

    /// Per-axis bound of the random offset applied inside a spawn cell
    pub fn jitter_extent(&self) -> f32 {
        self.polygon_outer_radius - self.polygon_thickness
    }

    /// Real-time period between spawn passes for a loop running at `frame_dt`
    ///
    /// A pass fires once more than `tick_rate` frames have elapsed.
    pub fn tick_period_secs(&self, frame_dt: f32) -> f32 {
        (self.tick_rate + 1) as f32 * frame_dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_override() {
        let settings = Settings::from_json(r#"{ "tick_rate": 30, "grid_width": 6 }"#).unwrap();
        assert_eq!(settings.tick_rate, 30);
        assert_eq!(settings.grid_width, 6);
        // Untouched fields keep their defaults
        assert_eq!(settings.grid_height, 10);
        assert_eq!(settings.enemy_spawn_count_per_tick, 2);
    }

    #[test]
    fn test_rejects_thick_polygon() {
        let settings = Settings {
            polygon_thickness: 0.6,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SimError::InvalidSettings(_))));
    }

    #[test]
    fn test_rejects_inverted_fraction() {
        let result = Settings::from_json(r#"{ "enemy_radius_fraction": [0.9, 0.2] }"#);
        assert!(matches!(result, Err(SimError::InvalidSettings(_))));
    }

    #[test]
    fn test_rejects_oversized_window() {
        let result = Settings::from_json(r#"{ "grid_width": 70000, "grid_height": 70000 }"#);
        assert!(matches!(result, Err(SimError::InvalidSettings(_))));

        let settings = Settings {
            grid_width: MAX_SPAWN_WINDOW,
            grid_height: MAX_SPAWN_WINDOW,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(Settings::from_json("{ nope"), Err(SimError::Settings(_))));
    }

    #[test]
    fn test_tick_period() {
        let settings = Settings::default();
        let period = settings.tick_period_secs(FRAME_DT);
        assert!((period - 61.0 / 60.0).abs() < 1e-5);
    }
}
