//! Entity records and simulation events
//!
//! Food, enemies and the player share one record type tagged by
//! [`EntityKind`]; systems switch on the kind instead of attaching behaviour
//! to individual objects.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::GridCell;
use crate::consts::*;

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Food,
    Enemy,
    Player,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// A player is alive and the world is spawning around it
    Playing,
    /// Player died, waiting for a respawn trigger
    GameOver,
}

/// Eased scale of a shape
///
/// `current` moves toward `desired` at the expand/shrink speed and never
/// overshoots it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub current: f32,
    pub desired: f32,
    pub default: f32,
    pub expand_speed: f32,
    pub shrink_speed: f32,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            current: DEFAULT_SCALE,
            desired: DEFAULT_SCALE,
            default: DEFAULT_SCALE,
            expand_speed: SCALE_EXPAND_SPEED,
            shrink_speed: SCALE_SHRINK_SPEED,
        }
    }
}

impl Scale {
    /// Target a new scale
    pub fn set(&mut self, scale: f32) {
        self.desired = scale;
    }

    /// Target the default scale again
    pub fn reset_to_default(&mut self) {
        self.desired = self.default;
    }

    /// Snap to a scale immediately
    pub fn override_to(&mut self, scale: f32) {
        self.current = scale;
    }

    /// Step `current` toward `desired`
    pub fn advance(&mut self, dt: f32) {
        if self.current < self.desired {
            self.current = (self.current + self.expand_speed * dt).min(self.desired);
        } else if self.current > self.desired {
            self.current = (self.current - self.shrink_speed * dt).max(self.desired);
        }
    }
}

/// A food, enemy or player shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Cell the entity was spawned into (the player's is recomputed on move)
    pub cell: GridCell,
    /// Jittered world position
    pub pos: Vec2,
    /// Radii before scaling
    pub outer_radius: f32,
    pub inner_radius: f32,
    pub sides: u32,
    pub scale: Scale,
    /// Rotation angle (radians) and its rate (radians/sec)
    pub rotation: f32,
    pub spin: f32,
}

impl Entity {
    /// The player shape at `pos`
    pub fn player(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            kind: EntityKind::Player,
            cell: GridCell::from_world(pos),
            pos,
            outer_radius: PLAYER_OUTER_RADIUS,
            inner_radius: PLAYER_INNER_RADIUS,
            sides: PLAYER_SIDES,
            scale: Scale::default(),
            rotation: 0.0,
            spin: 0.0,
        }
    }

    /// Outer radius after scaling (what a renderer or collider sees)
    pub fn effective_outer_radius(&self) -> f32 {
        self.outer_radius * self.scale.current
    }

    pub fn effective_inner_radius(&self) -> f32 {
        self.inner_radius * self.scale.current
    }

    /// Move the entity; keeps the cell in sync for the player
    pub fn teleport_to(&mut self, pos: Vec2) {
        self.pos = pos;
        if self.kind == EntityKind::Player {
            self.cell = GridCell::from_world(pos);
        }
    }

    /// Advance per-frame animation (scale easing, spin)
    pub fn animate(&mut self, dt: f32) {
        self.scale.advance(dt);
        if self.spin != 0.0 {
            self.rotation = (self.rotation + self.spin * dt).rem_euclid(std::f32::consts::TAU);
        }
    }
}

/// Why an entity left the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyCause {
    /// Food consumed by the player
    Eaten,
    /// Too far from the player
    Culled,
    /// Cleared by a death/respawn reset
    Reset,
    /// The player, on enemy contact
    Killed,
}

/// Events emitted for renderers and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    EntitySpawned {
        id: u32,
        kind: EntityKind,
        cell: GridCell,
        pos: Vec2,
        outer_radius: f32,
        inner_radius: f32,
    },
    EntityDestroyed {
        id: u32,
        cause: DestroyCause,
    },
    PlayerSpawned {
        id: u32,
        pos: Vec2,
    },
    PlayerMoved {
        pos: Vec2,
    },
    FoodEaten {
        id: u32,
        pos: Vec2,
        score_preview: u64,
    },
    PlayerDied {
        final_score: u64,
    },
}
