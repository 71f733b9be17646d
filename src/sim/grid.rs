//! Grid cells and the occupancy index
//!
//! Occupancy records which cells hold food or an enemy. It never stores
//! entity references; the controller looks entities up by id.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::EntityKind;
use crate::{cell_to_world, world_to_cell};

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing a world position
    pub fn from_world(pos: Vec2) -> Self {
        let (x, y) = world_to_cell(pos);
        Self { x, y }
    }

    /// World position of the cell's origin corner
    pub fn to_world(self) -> Vec2 {
        cell_to_world(self.x, self.y)
    }

    pub fn manhattan(self, other: GridCell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Straight-line distance between cells
    pub fn distance(self, other: GridCell) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::fmt::Display for GridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cells currently claimed by food or enemies
///
/// A cell holds at most one kind at a time; the player never claims.
#[derive(Debug, Clone, Default)]
pub struct GridOccupancy {
    cells: HashMap<GridCell, EntityKind>,
}

impl GridOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if food or an enemy holds the cell
    pub fn is_occupied(&self, cell: GridCell) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Kind holding the cell, if any
    pub fn occupant(&self, cell: GridCell) -> Option<EntityKind> {
        self.cells.get(&cell).copied()
    }

    /// Record `kind` at `cell`. Returns false (and changes nothing) if the
    /// cell is already taken or `kind` is the player.
    pub fn claim(&mut self, cell: GridCell, kind: EntityKind) -> bool {
        if kind == EntityKind::Player {
            log::debug!("Player does not claim cells (ignored claim at {})", cell);
            return false;
        }
        if let Some(existing) = self.cells.get(&cell) {
            log::debug!("Cell {} already holds {:?}, {:?} claim skipped", cell, existing, kind);
            return false;
        }
        self.cells.insert(cell, kind);
        true
    }

    /// Remove the `kind` record at `cell`. A release that does not match what
    /// is recorded is reported and ignored.
    pub fn release(&mut self, cell: GridCell, kind: EntityKind) -> bool {
        match self.cells.get(&cell) {
            Some(existing) if *existing == kind => {
                self.cells.remove(&cell);
                true
            }
            Some(existing) => {
                log::warn!(
                    "Attempted to release {:?} at {} but the cell holds {:?}",
                    kind,
                    cell,
                    existing
                );
                false
            }
            None => {
                log::warn!("Attempted to release a {:?} cell that wasn't claimed: {}", kind, cell);
                false
            }
        }
    }

    /// Cells held by `kind`
    pub fn cells_of(&self, kind: EntityKind) -> impl Iterator<Item = GridCell> + '_ {
        self.cells
            .iter()
            .filter(move |(_, k)| **k == kind)
            .map(|(cell, _)| *cell)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.cells.values().filter(|k| **k == kind).count()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
