//! Circle contact tests between the player and spawned shapes
//!
//! Hosts with their own collider geometry ignore this. The headless runner
//! and tests use it to turn overlaps into "ate food" / "collided" input.

use glam::Vec2;

use super::state::{Entity, EntityKind};

/// Check if two circles overlap (touching counts)
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance_squared(b_pos) <= (a_radius + b_radius) * (a_radius + b_radius)
}

/// A shape the player is touching
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
}

/// Every entity whose scaled outline overlaps the player's, nearest first
pub fn find_contacts<'a>(player: &Entity, entities: impl IntoIterator<Item = &'a Entity>) -> Vec<Contact> {
    let player_radius = player.effective_outer_radius();
    let mut contacts: Vec<(f32, Contact)> = entities
        .into_iter()
        .filter(|e| e.kind != EntityKind::Player)
        .filter(|e| circles_overlap(player.pos, player_radius, e.pos, e.effective_outer_radius()))
        .map(|e| {
            (
                player.pos.distance_squared(e.pos),
                Contact {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                },
            )
        })
        .collect();
    contacts.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    contacts.into_iter().map(|(_, c)| c).collect()
}
