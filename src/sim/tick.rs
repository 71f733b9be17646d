//! Per-frame simulation step
//!
//! Order within a step: player input, eaten food, enemy contact, spawn pass,
//! distance culling, animation.

use glam::Vec2;

use super::controller::SimulationController;
use super::state::GamePhase;

/// Reference to a piece of food the player consumed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FoodRef {
    /// Known entity id
    Id(u32),
    /// Nearest food to this world position
    At(Vec2),
}

/// Input commands for a single step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// New player position (from the host's movement/input handling)
    pub move_to: Option<Vec2>,
    /// Boost key held
    pub boost: bool,
    /// Food the player reached this frame
    pub ate_food: Vec<FoodRef>,
    /// Player touched an enemy this frame
    pub collided_with_enemy: bool,
}

/// Advance the simulation by one frame of `dt` seconds
pub fn tick(sim: &mut SimulationController, input: &TickInput, dt: f32) {
    sim.frame += 1;
    sim.time_secs += f64::from(dt);

    if sim.phase == GamePhase::GameOver {
        return;
    }

    // Player input
    if let Some(pos) = input.move_to {
        sim.player_moved_to(pos);
    }
    sim.set_boost(input.boost);

    // Eaten food
    for food in &input.ate_food {
        match *food {
            FoodRef::Id(id) => sim.player_ate_food(id),
            FoodRef::At(pos) => sim.player_ate_food_at(pos),
        };
    }

    // Enemy contact ends the run; the remaining stages see no player
    if input.collided_with_enemy {
        sim.player_collided_with_enemy();
    }

    // Spawn pass (frame-counted cadence)
    let player_pos = sim.player.as_ref().map(|p| p.pos);
    let requests = sim
        .scheduler
        .tick(sim.frame, player_pos, &mut sim.occupancy, &mut sim.rng);
    if !requests.is_empty() {
        log::debug!("Frame {}: spawning {} entities", sim.frame, requests.len());
    }
    for request in requests {
        sim.spawn_entity(request);
    }

    // Distance culling runs every step
    sim.cull_distant();

    if let Some(player) = sim.player.as_mut() {
        player.animate(dt);
    }
    for entity in &mut sim.entities {
        entity.animate(dt);
    }
}
