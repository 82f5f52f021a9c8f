//! The collaborator contract between the agent and the game arena.
//!
//! The arena owns all authoritative state (treasury, structures, waves) and
//! enforces the rules; the agent only reads fresh state each tick and issues
//! gated mutations. Build/sell/send are fire-and-forget: if a precondition
//! is not met the arena ignores the call, so the agent always checks the
//! corresponding `can_*` query first.

use crate::constants::*;
use crate::location::*;

pub type StructureId = u32;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Team {
    Ally,
    Enemy,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Structure {
    pub id: StructureId,
    pub kind: StructureKind,
    pub loc: Location,
}

/// A hostile unit travelling along the path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Threat {
    /// Number of path cells already traversed.
    pub progress: u32,
    pub health: u32,
    pub total_health: u32,
    pub cooldown: u32,
    /// Ticks per path cell; lower is faster.
    pub total_cooldown: u32,
}

/// Target-selection rule for single-target weapons.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SnipePriority {
    /// The unit with the most path progress.
    First,
    /// The unit with the highest remaining health.
    Strong,
}

pub trait GameApi {
    /// Whether the cell is buildable space, in bounds, and unoccupied for
    /// the given team. Out-of-bounds coordinates return false.
    fn is_buildable(&self, team: Team, x: i32, y: i32) -> bool;

    fn can_build(&self, kind: StructureKind, loc: Location) -> bool;
    fn build(&mut self, kind: StructureKind, loc: Location);

    fn can_sell(&self, id: StructureId) -> bool;
    /// Returns the refunded amount.
    fn sell(&mut self, id: StructureId) -> u32;

    fn structures(&self, team: Team) -> Vec<Structure>;
    fn balance(&self, team: Team) -> u32;
    fn turn(&self) -> u32;
    fn health(&self, team: Team) -> u32;

    fn incoming_threats(&self, team: Team) -> Vec<Threat>;

    /// Cost of sending `count` units of the given starting health.
    fn wave_cost(&self, count: u32, strength: u32) -> u32;
    fn can_send_wave(&self, count: u32, strength: u32) -> bool;
    fn send_wave(&mut self, count: u32, strength: u32);

    fn auto_target_single(&mut self, id: StructureId, priority: SnipePriority);
    fn auto_target_area(&mut self, id: StructureId);
}
