//! Simulation module
//!
//! All gameplay logic lives here:
//! - Single owner (the controller) for entities, occupancy and scoring
//! - One seeded RNG shared by every random draw
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod contact;
pub mod controller;
pub mod grid;
pub mod spawn;
pub mod state;
pub mod streak;
pub mod tick;

pub use contact::{Contact, circles_overlap, find_contacts};
pub use controller::{SimulationBuilder, SimulationController};
pub use grid::{GridCell, GridOccupancy};
pub use spawn::{SpawnRequest, SpawnScheduler};
pub use state::{DestroyCause, Entity, EntityKind, GamePhase, Scale, SimEvent};
pub use streak::StreakScorer;
pub use tick::{FoodRef, TickInput, tick};
