//! Simulation controller
//!
//! Owns the entity set, the occupancy index, the spawn scheduler, the streak
//! scorer and the random source. Nothing else mutates them.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::contact::{Contact, find_contacts};
use super::grid::{GridCell, GridOccupancy};
use super::spawn::{SpawnRequest, SpawnScheduler};
use super::state::{DestroyCause, Entity, EntityKind, GamePhase, Scale, SimEvent};
use super::streak::StreakScorer;
use crate::consts::ENTITY_SIDES;
use crate::error::SimError;
use crate::highscores::ScoreSink;
use crate::settings::Settings;

/// Collects construction parameters for a [`SimulationController`]
pub struct SimulationBuilder {
    settings: Settings,
    seed: u64,
    score_sink: Option<Box<dyn ScoreSink>>,
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            seed: 0,
            score_sink: None,
        }
    }
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Seed for the shared random source (shuffle, jitter, radius, spin)
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Where finished runs are reported
    pub fn score_sink(mut self, sink: impl ScoreSink + 'static) -> Self {
        self.score_sink = Some(Box::new(sink));
        self
    }

    /// Validate and start a simulation with a live player at the origin
    pub fn build(self) -> Result<SimulationController, SimError> {
        let score_sink = self.score_sink.ok_or(SimError::MissingDependency("score sink"))?;
        self.settings.validate()?;

        let mut sim = SimulationController {
            rng: Pcg32::seed_from_u64(self.seed),
            seed: self.seed,
            occupancy: GridOccupancy::new(),
            scheduler: SpawnScheduler::new(self.settings.clone()),
            scorer: StreakScorer::new(self.settings.time_difference_to_zero_streak),
            score_sink,
            player: None,
            entities: Vec::new(),
            events: Vec::new(),
            phase: GamePhase::GameOver,
            frame: 0,
            time_secs: 0.0,
            next_id: 1,
            settings: self.settings,
        };
        sim.spawn_player();
        log::info!("Simulation started (seed {})", sim.seed);
        Ok(sim)
    }
}

/// Orchestrates spawning, eating, death and culling one step at a time
pub struct SimulationController {
    pub(super) settings: Settings,
    pub(super) rng: Pcg32,
    seed: u64,
    pub(super) occupancy: GridOccupancy,
    pub(super) scheduler: SpawnScheduler,
    pub(super) scorer: StreakScorer,
    score_sink: Box<dyn ScoreSink>,
    /// The single live player (None while awaiting respawn)
    pub(super) player: Option<Entity>,
    /// Food and enemies, sorted by id
    pub(super) entities: Vec<Entity>,
    pub(super) events: Vec<SimEvent>,
    pub(super) phase: GamePhase,
    /// Steps taken since construction (never reset)
    pub(super) frame: u64,
    /// Simulation time in seconds (drives streak timing)
    pub(super) time_secs: f64,
    next_id: u32,
}

impl SimulationController {
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn time_secs(&self) -> f64 {
        self.time_secs
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.as_ref()
    }

    /// Live food and enemies, sorted by id
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn occupancy(&self) -> &GridOccupancy {
        &self.occupancy
    }

    pub fn scheduler(&self) -> &SpawnScheduler {
        &self.scheduler
    }

    pub fn scorer(&self) -> &StreakScorer {
        &self.scorer
    }

    pub fn score_sink(&self) -> &dyn ScoreSink {
        self.score_sink.as_ref()
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Shapes the player currently overlaps, nearest first
    pub fn contacts(&self) -> Vec<Contact> {
        match &self.player {
            Some(player) => find_contacts(player, &self.entities),
            None => Vec::new(),
        }
    }

    // === Score projection ===

    /// Live score label; empty while no player is alive
    pub fn current_score_display(&self) -> String {
        if self.player.is_none() {
            return String::new();
        }
        self.scorer.current_score().to_string()
    }

    /// "xN" while a streak multiplier is active, otherwise empty
    pub fn multiplier_display(&self) -> String {
        if self.player.is_none() || self.scorer.multiplier() <= 1 {
            return String::new();
        }
        format!("x{}", self.scorer.multiplier())
    }

    pub fn high_score(&self) -> u64 {
        self.score_sink.high_score()
    }

    pub fn last_score(&self) -> u64 {
        self.score_sink.last_score()
    }

    pub fn high_score_display(&self) -> String {
        format!("HIGH: {}", self.high_score())
    }

    pub fn last_score_display(&self) -> String {
        format!("LAST: {}", self.last_score())
    }

    // === Player events ===

    /// Move the player (no-op while awaiting respawn)
    pub fn player_moved_to(&mut self, pos: Vec2) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.teleport_to(pos);
        self.events.push(SimEvent::PlayerMoved { pos });
    }

    /// Boost grows the player toward its max scale; releasing it eases back
    pub fn set_boost(&mut self, boost: bool) {
        if let Some(player) = self.player.as_mut() {
            if boost {
                player.scale.set(crate::consts::PLAYER_BOOST_SCALE);
            } else {
                player.scale.reset_to_default();
            }
        }
    }

    /// Food nearest to `pos` was eaten
    pub fn player_ate_food_at(&mut self, pos: Vec2) -> bool {
        let nearest = self
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Food)
            .min_by(|a, b| {
                a.pos
                    .distance_squared(pos)
                    .partial_cmp(&b.pos.distance_squared(pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| e.id);

        match nearest {
            Some(id) => self.player_ate_food(id),
            None => {
                log::warn!("Player ate food at {:?} but no food is tracked", pos);
                false
            }
        }
    }

    /// Food `id` was eaten: release its cell, extend the streak, move the
    /// player onto it and remove it
    pub fn player_ate_food(&mut self, id: u32) -> bool {
        if self.player.is_none() {
            log::warn!("Food {} eaten while no player is alive", id);
            return false;
        }
        let Some(index) = self
            .entities
            .iter()
            .position(|e| e.id == id && e.kind == EntityKind::Food)
        else {
            log::warn!("Attempted to eat food {} which isn't tracked", id);
            return false;
        };

        let food = self.entities.remove(index);
        self.occupancy.release(food.cell, EntityKind::Food);
        self.scorer.compute_eating(food.pos, self.time_secs);
        if let Some(player) = self.player.as_mut() {
            player.teleport_to(food.pos);
        }

        self.events.push(SimEvent::EntityDestroyed {
            id,
            cause: DestroyCause::Eaten,
        });
        self.events.push(SimEvent::FoodEaten {
            id,
            pos: food.pos,
            score_preview: self.scorer.current_score(),
        });
        self.events.push(SimEvent::PlayerMoved { pos: food.pos });
        true
    }

    /// Enemy contact: close the streak, report the run, clear the world and
    /// wait for a respawn
    pub fn player_collided_with_enemy(&mut self) {
        let Some(player) = self.player.take() else {
            log::warn!("Enemy collision reported while no player is alive");
            return;
        };

        self.scorer.finish_streak();
        let final_score = self.scorer.score();
        self.score_sink.record(final_score);

        self.events.push(SimEvent::EntityDestroyed {
            id: player.id,
            cause: DestroyCause::Killed,
        });
        self.clear_world();
        self.phase = GamePhase::GameOver;
        self.events.push(SimEvent::PlayerDied { final_score });
        log::info!("Player has died (score {})", final_score);
    }

    /// Start a new run. Ignored while a player is alive.
    pub fn respawn(&mut self) -> bool {
        if self.player.is_some() {
            log::warn!("Respawn requested while the player is alive");
            return false;
        }
        self.clear_world();
        self.spawn_player();
        log::info!("Player respawned at frame {}", self.frame);
        true
    }

    // === Entity lifecycle ===

    /// Place a food or enemy by hand. Returns its id, or None if the cell is
    /// taken or `kind` is the player.
    pub fn place_entity(
        &mut self,
        kind: EntityKind,
        cell: GridCell,
        pos: Vec2,
        outer_radius: f32,
        inner_radius: f32,
    ) -> Option<u32> {
        if !self.occupancy.claim(cell, kind) {
            return None;
        }
        Some(self.spawn_entity(SpawnRequest {
            kind,
            cell,
            pos,
            outer_radius,
            inner_radius,
            spin: 0.0,
            target_scale: crate::consts::SPAWNED_SCALE,
        }))
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create the entity for a request whose cell is already claimed
    pub(super) fn spawn_entity(&mut self, request: SpawnRequest) -> u32 {
        let id = self.next_entity_id();
        let mut scale = Scale::default();
        scale.set(request.target_scale);

        self.entities.push(Entity {
            id,
            kind: request.kind,
            cell: request.cell,
            pos: request.pos,
            outer_radius: request.outer_radius,
            inner_radius: request.inner_radius,
            sides: ENTITY_SIDES,
            scale,
            rotation: 0.0,
            spin: request.spin,
        });
        self.events.push(SimEvent::EntitySpawned {
            id,
            kind: request.kind,
            cell: request.cell,
            pos: request.pos,
            outer_radius: request.outer_radius,
            inner_radius: request.inner_radius,
        });
        id
    }

    /// Destroy entities beyond the disable distance and free their cells
    pub(super) fn cull_distant(&mut self) {
        let Some(player_pos) = self.player.as_ref().map(|p| p.pos) else {
            return;
        };
        let limit = self.settings.distance_to_be_disabled;
        let occupancy = &mut self.occupancy;
        let events = &mut self.events;

        self.entities.retain(|e| {
            if e.pos.distance(player_pos) <= limit {
                return true;
            }
            occupancy.release(e.cell, e.kind);
            events.push(SimEvent::EntityDestroyed {
                id: e.id,
                cause: DestroyCause::Culled,
            });
            false
        });
    }

    /// Drop every food/enemy, free all cells and rewind the scheduler
    fn clear_world(&mut self) {
        for entity in self.entities.drain(..) {
            self.events.push(SimEvent::EntityDestroyed {
                id: entity.id,
                cause: DestroyCause::Reset,
            });
        }
        self.occupancy.clear();
        self.scheduler.reset();
    }

    /// Fresh player at the origin with a zeroed streak
    fn spawn_player(&mut self) {
        let id = self.next_entity_id();
        let player = Entity::player(id, Vec2::ZERO);
        self.scorer.reset(player.pos);
        self.events.push(SimEvent::PlayerSpawned { id, pos: player.pos });
        self.player = Some(player);
        self.phase = GamePhase::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::ScoreBoard;

    fn sim() -> SimulationController {
        SimulationController::builder()
            .seed(12345)
            .score_sink(ScoreBoard::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_requires_score_sink() {
        let result = SimulationController::builder().build();
        assert!(matches!(result, Err(SimError::MissingDependency("score sink"))));
    }

    #[test]
    fn test_build_rejects_invalid_settings() {
        let result = SimulationController::builder()
            .settings(Settings {
                grid_width: 0,
                ..Default::default()
            })
            .score_sink(ScoreBoard::new())
            .build();
        assert!(matches!(result, Err(SimError::InvalidSettings(_))));
    }

    #[test]
    fn test_starts_with_player_at_origin() {
        let mut sim = sim();
        assert_eq!(sim.phase(), GamePhase::Playing);
        let player = sim.player().unwrap();
        assert_eq!(player.kind, EntityKind::Player);
        assert_eq!(player.pos, Vec2::ZERO);
        assert!(sim.occupancy().is_empty());
        let events = sim.drain_events();
        assert!(matches!(events.as_slice(), [SimEvent::PlayerSpawned { .. }]));
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_eating_food_releases_cell_and_scores() {
        let mut sim = sim();
        let cell = GridCell::new(3, 4);
        let id = sim
            .place_entity(EntityKind::Food, cell, Vec2::new(3.0, 4.0), 0.3, 0.2)
            .unwrap();

        assert!(sim.player_ate_food(id));
        assert!(!sim.occupancy().is_occupied(cell));
        assert!(sim.entity(id).is_none());
        assert_eq!(sim.player().unwrap().pos, Vec2::new(3.0, 4.0));
        assert_eq!(sim.current_score_display(), "10");
        assert_eq!(sim.multiplier_display(), "x2");

        // Same food cannot be eaten twice
        assert!(!sim.player_ate_food(id));
    }

    #[test]
    fn test_ate_food_at_resolves_nearest() {
        let mut sim = sim();
        let near = sim
            .place_entity(EntityKind::Food, GridCell::new(1, 0), Vec2::new(1.1, 0.0), 0.3, 0.2)
            .unwrap();
        let far = sim
            .place_entity(EntityKind::Food, GridCell::new(4, 0), Vec2::new(4.0, 0.0), 0.3, 0.2)
            .unwrap();

        assert!(sim.player_ate_food_at(Vec2::new(1.0, 0.0)));
        assert!(sim.entity(near).is_none());
        assert!(sim.entity(far).is_some());
    }

    #[test]
    fn test_enemies_are_not_food() {
        let mut sim = sim();
        let id = sim
            .place_entity(EntityKind::Enemy, GridCell::new(2, 2), Vec2::new(2.0, 2.0), 0.3, 0.2)
            .unwrap();
        assert!(!sim.player_ate_food(id));
        assert!(sim.occupancy().is_occupied(GridCell::new(2, 2)));
    }

    #[test]
    fn test_death_records_score_and_clears_world() {
        let mut sim = sim();
        let food = sim
            .place_entity(EntityKind::Food, GridCell::new(3, 4), Vec2::new(3.0, 4.0), 0.3, 0.2)
            .unwrap();
        sim.place_entity(EntityKind::Enemy, GridCell::new(-3, 0), Vec2::new(-3.0, 0.0), 0.3, 0.2);
        sim.player_ate_food(food);
        sim.drain_events();

        sim.player_collided_with_enemy();

        assert_eq!(sim.phase(), GamePhase::GameOver);
        assert!(sim.player().is_none());
        assert!(sim.entities().is_empty());
        assert!(sim.occupancy().is_empty());
        assert!(!sim.scheduler().has_initial_spawn_occurred());
        assert_eq!(sim.last_score(), 10);
        assert_eq!(sim.high_score(), 10);
        assert_eq!(sim.current_score_display(), "");
        assert_eq!(sim.multiplier_display(), "");

        let events = sim.drain_events();
        assert!(events.contains(&SimEvent::PlayerDied { final_score: 10 }));
    }

    #[test]
    fn test_respawn_resets_streak() {
        let mut sim = sim();
        let food = sim
            .place_entity(EntityKind::Food, GridCell::new(1, 0), Vec2::new(1.0, 0.0), 0.3, 0.2)
            .unwrap();
        sim.player_ate_food(food);
        sim.player_collided_with_enemy();

        assert!(sim.respawn());
        assert_eq!(sim.phase(), GamePhase::Playing);
        assert_eq!(sim.scorer().score(), 0);
        assert_eq!(sim.scorer().multiplier(), 1);
        assert_eq!(sim.current_score_display(), "0");
        // A second respawn while alive is refused
        assert!(!sim.respawn());
    }

    #[test]
    fn test_place_entity_respects_occupancy() {
        let mut sim = sim();
        let cell = GridCell::new(2, 0);
        assert!(sim.place_entity(EntityKind::Food, cell, Vec2::new(2.0, 0.0), 0.3, 0.2).is_some());
        assert!(sim.place_entity(EntityKind::Enemy, cell, Vec2::new(2.0, 0.0), 0.3, 0.2).is_none());
        assert!(sim.place_entity(EntityKind::Player, GridCell::new(9, 9), Vec2::ZERO, 0.3, 0.2).is_none());
    }

    #[test]
    fn test_boost_targets_max_scale() {
        let mut sim = sim();
        sim.set_boost(true);
        assert_eq!(sim.player().unwrap().scale.desired, crate::consts::PLAYER_BOOST_SCALE);
        sim.set_boost(false);
        assert_eq!(sim.player().unwrap().scale.desired, crate::consts::DEFAULT_SCALE);
    }
}
