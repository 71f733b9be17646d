//! Frame-counted spawning around the player
//!
//! Every `tick_rate` frames the scheduler walks a window of cells around the
//! player, filters out cells that are too close or already taken, shuffles the
//! rest and places enemies (subject to spacing rules) and food.

use std::ops::Range;

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::grid::{GridCell, GridOccupancy};
use super::state::EntityKind;
use crate::consts::SPAWNED_SCALE;
use crate::settings::Settings;

/// An entity the controller should create. The cell is already claimed.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub kind: EntityKind,
    pub cell: GridCell,
    /// Cell position plus random jitter
    pub pos: Vec2,
    pub outer_radius: f32,
    pub inner_radius: f32,
    /// Spin rate (radians/sec), random magnitude and sign
    pub spin: f32,
    /// Scale the entity should grow into
    pub target_scale: f32,
}

/// Decides when and where food and enemies appear
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    settings: Settings,
    last_tick_frame: u64,
    has_initial_spawn_occurred: bool,
}

impl SpawnScheduler {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            last_tick_frame: 0,
            has_initial_spawn_occurred: false,
        }
    }

    pub fn has_initial_spawn_occurred(&self) -> bool {
        self.has_initial_spawn_occurred
    }

    pub fn last_tick_frame(&self) -> u64 {
        self.last_tick_frame
    }

    /// Forget the initial pass and the cadence (player death / respawn)
    pub fn reset(&mut self) {
        self.last_tick_frame = 0;
        self.has_initial_spawn_occurred = false;
    }

    /// True once more than `tick_rate` frames have passed since the last pass
    pub fn is_due(&self, frame: u64) -> bool {
        frame.saturating_sub(self.last_tick_frame) > self.settings.tick_rate as u64
    }

    /// Run a spawn pass if one is due at `frame`
    ///
    /// Without a player nothing happens and the cadence is left untouched.
    pub fn tick<R: Rng>(
        &mut self,
        frame: u64,
        player_pos: Option<Vec2>,
        occupancy: &mut GridOccupancy,
        rng: &mut R,
    ) -> Vec<SpawnRequest> {
        let Some(player_pos) = player_pos else {
            return Vec::new();
        };
        if !self.is_due(frame) {
            return Vec::new();
        }
        self.last_tick_frame = frame;
        self.spawn_pass(player_pos, occupancy, rng)
    }

    /// Cells eligible this pass, in window order (before shuffling)
    pub fn candidate_cells(&self, player_cell: GridCell, occupancy: &GridOccupancy) -> Vec<GridCell> {
        let width = self.settings.grid_width;
        let height = self.settings.grid_height;
        let area = usize::try_from(width)
            .unwrap_or(0)
            .saturating_mul(usize::try_from(height).unwrap_or(0));
        let mut cells = Vec::with_capacity(area);
        for x in window_span(player_cell.x, width) {
            for y in window_span(player_cell.y, height) {
                let cell = GridCell::new(x, y);
                if cell == player_cell {
                    continue;
                }
                // The very first pass may fill cells right next to the player
                if self.has_initial_spawn_occurred
                    && cell.manhattan(player_cell) < self.settings.min_spawn_distance
                {
                    continue;
                }
                if occupancy.is_occupied(cell) {
                    continue;
                }
                cells.push(cell);
            }
        }
        cells
    }

    /// Whether an enemy may go in `cell` given the player and every enemy
    /// already tracked (including ones placed earlier in this pass)
    pub fn can_spawn_enemy_at(
        &self,
        cell: GridCell,
        player_cell: GridCell,
        occupancy: &GridOccupancy,
    ) -> bool {
        if cell.distance(player_cell) < self.settings.enemy_min_distance_from_player {
            return false;
        }
        occupancy
            .cells_of(EntityKind::Enemy)
            .all(|enemy| cell.distance(enemy) >= self.settings.enemy_min_distance_from_enemies)
    }

    /// One full spawn pass around `player_pos`, ignoring cadence
    pub fn spawn_pass<R: Rng>(
        &mut self,
        player_pos: Vec2,
        occupancy: &mut GridOccupancy,
        rng: &mut R,
    ) -> Vec<SpawnRequest> {
        let player_cell = GridCell::from_world(player_pos);
        let mut candidates = self.candidate_cells(player_cell, occupancy);
        candidates.shuffle(rng);

        let mut requests = Vec::with_capacity(candidates.len());
        let mut enemies_this_pass = 0;

        for cell in candidates {
            let kind = if enemies_this_pass < self.settings.enemy_spawn_count_per_tick
                && self.can_spawn_enemy_at(cell, player_cell, occupancy)
            {
                EntityKind::Enemy
            } else {
                EntityKind::Food
            };

            if !occupancy.claim(cell, kind) {
                continue;
            }
            if kind == EntityKind::Enemy {
                enemies_this_pass += 1;
            }
            requests.push(self.build_request(kind, cell, rng));
        }

        log::debug!(
            "Spawn pass at {}: {} entities ({} enemies)",
            player_cell,
            requests.len(),
            enemies_this_pass
        );

        self.has_initial_spawn_occurred = true;
        requests
    }

    /// Roll radius, jitter and spin for a claimed cell
    fn build_request<R: Rng>(&self, kind: EntityKind, cell: GridCell, rng: &mut R) -> SpawnRequest {
        let (lo, hi) = match kind {
            EntityKind::Enemy => self.settings.enemy_radius_fraction,
            _ => self.settings.food_radius_fraction,
        };
        let max_radius = self.settings.polygon_outer_radius;
        let outer_radius = max_radius * rng.random_range(lo..=hi);
        let inner_radius = (outer_radius - self.settings.polygon_thickness).max(0.0);

        let jitter = self.settings.jitter_extent();
        let offset = Vec2::new(
            rng.random_range(-jitter..=jitter),
            rng.random_range(-jitter..=jitter),
        );

        SpawnRequest {
            kind,
            cell,
            pos: cell.to_world() + offset,
            outer_radius,
            inner_radius,
            spin: random_spin(rng),
            target_scale: SPAWNED_SCALE,
        }
    }
}

/// Spin rate in `base * [0.2 * range, range]` with a random direction
fn random_spin<R: Rng>(rng: &mut R) -> f32 {
    use crate::consts::{SPIN_BASE_SPEED, SPIN_RANGE};

    let speed = SPIN_BASE_SPEED * rng.random_range(0.2 * SPIN_RANGE..=SPIN_RANGE);
    if rng.random_bool(0.5) { speed } else { -speed }
}

/// Cells `extent` wide around `center`, clipped to the i32 cell space
fn window_span(center: i32, extent: i32) -> Range<i32> {
    let start = i64::from(center) - i64::from(extent / 2);
    let end = start + i64::from(extent);
    let clip = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    clip(start)..clip(end)
}
