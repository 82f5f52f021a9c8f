//! Greedy lattice layout for production and amplifier structures.
//!
//! Anchors (reinforcer sites) sit on a fixed (+/-2, +/-2) lattice; the
//! axis-aligned interior between two consumed anchors, corners excluded,
//! holds production structures. Anchors are claimed cheapest-first by
//! combined reinforcer score so the valuable cells near the path stay free
//! for weapons:
//!
//! ```text
//! XOOOXOOOX
//! OOOOOOOOO
//! OOXOOOXOO
//! OOOOOOOOO
//! XOOOXOOOX
//! ```

use crate::api::*;
use crate::config::*;
use crate::constants::*;
use crate::location::*;
use crate::map::*;
use crate::scoring::*;
use fnv::FnvHashSet;
use log::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Lattice offsets from an anchor to its candidate neighbors.
pub const ANCHOR_OFFSETS: [(i32, i32); 4] = [(-2, -2), (-2, 2), (2, -2), (2, 2)];

/// What one planner step did, mostly for logging and tests.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Built a production structure on a cluster interior cell.
    Production(Location),
    /// Built an amplifier on the current anchor.
    Amplifier(Location),
    /// Built a production structure via the global fallback scan.
    Fallback(Location),
    /// A candidate was chosen but the build was rejected; nothing consumed.
    Deferred,
    /// No placeable candidate exists anywhere on the board.
    Exhausted,
}

pub struct ClusterPlanner {
    current_anchor: Option<Location>,
    consumed: FnvHashSet<Location>,
    boundary: Vec<Location>,
    production_cells: Vec<Location>,
    rng: Option<SmallRng>,
}

impl ClusterPlanner {
    pub fn new(tie_break: TieBreak) -> ClusterPlanner {
        ClusterPlanner {
            current_anchor: None,
            consumed: FnvHashSet::default(),
            boundary: Vec::new(),
            production_cells: Vec::new(),
            rng: match tie_break {
                TieBreak::FirstScan => None,
                TieBreak::Seeded(seed) => Some(SmallRng::seed_from_u64(seed)),
            },
        }
    }

    pub fn current_anchor(&self) -> Option<Location> {
        self.current_anchor
    }

    pub fn pending_production(&self) -> &[Location] {
        &self.production_cells
    }

    pub fn boundary_len(&self) -> usize {
        self.boundary.len()
    }

    pub fn consumed_anchors(&self) -> &FnvHashSet<Location> {
        &self.consumed
    }

    /// Start the lattice at the globally least valuable space cell, then
    /// claim the first boundary anchor so an interior exists to fill.
    pub fn seed(&mut self, rc: &dyn GameApi, map: &GameMap, reinf: &Grid<u32>) {
        let mut best: Option<(Location, u32)> = None;
        for cell in map.space_cells() {
            let value = reinf.get(cell.x() as usize, cell.y() as usize);
            if best.map_or(true, |(_, bv)| value < bv) {
                best = Some((cell, value));
            }
        }

        if let Some((origin, _)) = best {
            debug!("seeding farm lattice at ({}, {})", origin.x(), origin.y());
            self.adopt_anchor(origin, rc);
            self.advance_anchor(rc, reinf);
        }
    }

    /// One placement attempt. Never blocks and never consumes a candidate
    /// unless its build succeeded.
    pub fn build_step(
        &mut self,
        rc: &mut dyn GameApi,
        map: &GameMap,
        scores: &TileScores,
        reinf: &Grid<u32>,
    ) -> StepOutcome {
        if !self.production_cells.is_empty() {
            return self.try_build_production(rc);
        }

        // The interior is exhausted; the cluster's amplifier goes up before
        // the lattice moves on.
        if let Some(anchor) = self.current_anchor {
            if rc.can_build(StructureKind::Reinforcer, anchor) {
                rc.build(StructureKind::Reinforcer, anchor);
                trace!("amplifier at ({}, {})", anchor.x(), anchor.y());
                self.current_anchor = None;
                return StepOutcome::Amplifier(anchor);
            }
            return StepOutcome::Deferred;
        }

        while self.production_cells.is_empty() && !self.boundary.is_empty() {
            self.advance_anchor(rc, reinf);
        }
        if !self.production_cells.is_empty() {
            return self.try_build_production(rc);
        }

        self.fallback_build(rc, map, scores)
    }

    /// Give a freed cell back to the interior pool (liquidated farm sites).
    pub fn reclaim(&mut self, cell: Location) {
        if !self.production_cells.contains(&cell) {
            self.production_cells.push(cell);
        }
    }

    pub fn reset(&mut self) {
        self.current_anchor = None;
        self.consumed.clear();
        self.boundary.clear();
        self.production_cells.clear();
    }

    fn try_build_production(&mut self, rc: &mut dyn GameApi) -> StepOutcome {
        let Some(&cell) = self.production_cells.last() else {
            return StepOutcome::Deferred;
        };
        if !rc.can_build(StructureKind::SolarFarm, cell) {
            return StepOutcome::Deferred;
        }
        rc.build(StructureKind::SolarFarm, cell);
        self.production_cells.pop();
        StepOutcome::Production(cell)
    }

    /// Mark an anchor consumed and register its unconsumed, buildable
    /// lattice neighbors on the boundary.
    fn adopt_anchor(&mut self, anchor: Location, rc: &dyn GameApi) {
        self.current_anchor = Some(anchor);
        self.consumed.insert(anchor);

        for (dx, dy) in ANCHOR_OFFSETS {
            let (nx, ny) = anchor.offset(dx, dy);
            if !rc.is_buildable(Team::Ally, nx, ny) {
                continue;
            }
            let neighbor = Location::new(nx as u8, ny as u8);
            if !self.consumed.contains(&neighbor) && !self.boundary.contains(&neighbor) {
                self.boundary.push(neighbor);
            }
        }
    }

    /// Claim the cheapest boundary anchor and populate the interiors it
    /// shares with already-consumed neighbors.
    fn advance_anchor(&mut self, rc: &dyn GameApi, reinf: &Grid<u32>) {
        let mut best: Option<(usize, u32)> = None;
        for (index, corner) in self.boundary.iter().enumerate() {
            let value = reinf.get(corner.x() as usize, corner.y() as usize);
            if best.map_or(true, |(_, bv)| value < bv) {
                best = Some((index, value));
            }
        }

        let Some((index, _)) = best else {
            self.current_anchor = None;
            return;
        };
        let corner = self.boundary.remove(index);
        trace!("next anchor ({}, {})", corner.x(), corner.y());
        self.adopt_anchor(corner, rc);
        self.populate_interior(corner, rc);
    }

    fn populate_interior(&mut self, anchor: Location, rc: &dyn GameApi) {
        for (dx, dy) in ANCHOR_OFFSETS {
            let (cx, cy) = anchor.offset(dx, dy);
            if cx < 0 || cy < 0 {
                continue;
            }
            let corner = Location::new(cx as u8, cy as u8);
            if !self.consumed.contains(&corner) {
                continue;
            }

            let (min_x, max_x) = (anchor.x().min(corner.x()), anchor.x().max(corner.x()));
            let (min_y, max_y) = (anchor.y().min(corner.y()), anchor.y().max(corner.y()));
            for tx in min_x..=max_x {
                for ty in min_y..=max_y {
                    let cell = Location::new(tx, ty);
                    if cell == anchor || cell == corner {
                        continue;
                    }
                    if rc.is_buildable(Team::Ally, tx as i32, ty as i32)
                        && !self.production_cells.contains(&cell)
                    {
                        self.production_cells.push(cell);
                    }
                }
            }
        }
    }

    /// Lattice exhausted: place production on the globally least valuable
    /// placeable cell so forward progress never stops while space remains.
    fn fallback_build(
        &mut self,
        rc: &mut dyn GameApi,
        map: &GameMap,
        scores: &TileScores,
    ) -> StepOutcome {
        let mut best_value = u32::MAX;
        let mut ties: Vec<Location> = Vec::new();

        for y in 0..map.height() {
            for x in 0..map.width() {
                if !rc.is_buildable(Team::Ally, x as i32, y as i32) {
                    continue;
                }
                let value = scores.gunship.get(x as usize, y as usize);
                if value < best_value {
                    best_value = value;
                    ties.clear();
                    ties.push(Location::new(x, y));
                } else if value == best_value && self.rng.is_some() {
                    ties.push(Location::new(x, y));
                }
            }
        }

        let chosen = match (&mut self.rng, ties.as_slice()) {
            (_, []) => return StepOutcome::Exhausted,
            (None, cells) => cells[0],
            (Some(rng), cells) => cells[rng.gen_range(0..cells.len())],
        };

        if rc.can_build(StructureKind::SolarFarm, chosen) {
            rc.build(StructureKind::SolarFarm, chosen);
            debug!("fallback farm at ({}, {})", chosen.x(), chosen.y());
            StepOutcome::Fallback(chosen)
        } else {
            StepOutcome::Deferred
        }
    }
}
