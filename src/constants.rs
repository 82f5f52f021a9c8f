//! Structure stats for the arena ruleset. Ranges are squared-Euclidean
//! thresholds; a cell is in range when dx^2 + dy^2 <= range.

use serde::{Deserialize, Serialize};

/// Fraction of build cost returned when a structure is sold.
pub const SELL_REFUND_RATIO: f64 = 0.8;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    /// Generates passive income each tick.
    SolarFarm,
    /// Boosts output of nearby structures; placed on the cluster lattice.
    Reinforcer,
    /// Single-target weapon, one shot per cooldown cycle.
    Gunship,
    /// Area weapon, hits everything in range per cooldown cycle.
    Bomber,
}

impl StructureKind {
    pub fn cost(self) -> u32 {
        match self {
            StructureKind::SolarFarm => 2000,
            StructureKind::Reinforcer => 3000,
            StructureKind::Gunship => 1000,
            StructureKind::Bomber => 1750,
        }
    }

    /// Squared-distance range threshold. Zero for structures that do not act
    /// at a distance on their own.
    pub fn range(self) -> u32 {
        match self {
            StructureKind::SolarFarm => 0,
            StructureKind::Reinforcer => 8,
            StructureKind::Gunship => 60,
            StructureKind::Bomber => 10,
        }
    }

    /// Ticks between shots.
    pub fn cooldown(self) -> u32 {
        match self {
            StructureKind::Gunship => 20,
            StructureKind::Bomber => 15,
            _ => 0,
        }
    }

    /// Damage dealt per shot.
    pub fn damage(self) -> u32 {
        match self {
            StructureKind::Gunship => 25,
            StructureKind::Bomber => 6,
            _ => 0,
        }
    }

    /// Damage per tick, cooldown-adjusted.
    pub fn dps(self) -> f64 {
        match self.cooldown() {
            0 => 0.0,
            cd => self.damage() as f64 / cd as f64,
        }
    }

    /// Half-width of the bounding box that encloses the range circle.
    pub fn bounding_radius(self) -> i32 {
        (self.range() as f64).sqrt() as i32
    }

    pub fn is_weapon(self) -> bool {
        matches!(self, StructureKind::Gunship | StructureKind::Bomber)
    }
}
