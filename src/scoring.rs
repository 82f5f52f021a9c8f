//! Precomputed spatial value model.
//!
//! Everything here is a pure function of the static map, computed once at
//! game start. Tile scores count how many path cells each weapon kind
//! threatens from each buildable cell; reinforcer values estimate the
//! amplification benefit of a support structure from the best tile scores in
//! its range; strike multipliers estimate how often a wandering path lets a
//! stationary weapon re-acquire the same unit.

use crate::config::*;
use crate::constants::*;
use crate::location::*;
use crate::map::*;
use fnv::FnvHashSet;
use itertools::Itertools;
use std::collections::VecDeque;

/// Per-cell path coverage counts for both weapon kinds.
#[derive(Clone)]
pub struct TileScores {
    pub gunship: Grid<u32>,
    pub bomber: Grid<u32>,
}

/// Expected bonus re-acquisitions for a well-placed weapon, per kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrikeMultipliers {
    pub gunship: f64,
    pub bomber: f64,
}

pub fn compute_tile_scores(map: &GameMap) -> TileScores {
    TileScores {
        gunship: coverage_grid(map, StructureKind::Gunship),
        bomber: coverage_grid(map, StructureKind::Bomber),
    }
}

/// For each path cell, bump every space cell whose range circle covers it.
fn coverage_grid(map: &GameMap, kind: StructureKind) -> Grid<u32> {
    let range = kind.range();
    let radius = kind.bounding_radius();
    let mut grid = Grid::new(map.width(), map.height(), 0u32);

    for cell in map.path() {
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                let (tx, ty) = cell.offset(dx, dy);
                if !map.is_space(tx, ty) {
                    continue;
                }
                if (dx * dx + dy * dy) as u32 <= range {
                    *grid.get_mut(tx as usize, ty as usize) += 1;
                }
            }
        }
    }

    grid
}

/// Value of placing a reinforcer at each space cell, assuming it can amplify
/// at most `cap` towers: the sum of the `cap` best tile scores within
/// reinforcer range, the cell itself excluded.
pub fn reinforcer_values(tile_scores: &Grid<u32>, cap: usize, map: &GameMap) -> Grid<u32> {
    let range = StructureKind::Reinforcer.range();
    let radius = StructureKind::Reinforcer.bounding_radius();
    let mut values = Grid::new(map.width(), map.height(), 0u32);

    for cell in map.space_cells() {
        let mut in_range = Vec::new();
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (tx, ty) = cell.offset(dx, dy);
                if !map.is_space(tx, ty) {
                    continue;
                }
                if (dx * dx + dy * dy) as u32 <= range {
                    in_range.push(tile_scores.get(tx as usize, ty as usize));
                }
            }
        }

        let value: u32 = in_range
            .into_iter()
            .sorted_unstable_by(|a, b| b.cmp(a))
            .take(cap)
            .sum();
        values.set(cell.x() as usize, cell.y() as usize, value);
    }

    values
}

/// Gunship and bomber reinforcer values folded with the configured rate
/// weights. The weighted sum is kept as an integer; dividing by the weight
/// sum would not change any argmin or argmax.
pub fn combined_reinforcer_values(
    scores: &TileScores,
    config: &StrategyConfig,
    map: &GameMap,
) -> Grid<u32> {
    let gun = reinforcer_values(&scores.gunship, config.towers_per_reinforcer, map);
    let bomb = reinforcer_values(&scores.bomber, config.towers_per_reinforcer, map);

    let mut combined = Grid::new(map.width(), map.height(), 0u32);
    for ((x, y), _) in gun.iter() {
        combined.set(
            x,
            y,
            config.gun_rate * gun.get(x, y) + config.bomb_rate * bomb.get(x, y),
        );
    }
    combined
}

pub fn strike_multipliers(map: &GameMap) -> StrikeMultipliers {
    StrikeMultipliers {
        gunship: strike_multiplier(map, StructureKind::Gunship),
        bomber: strike_multiplier(map, StructureKind::Bomber),
    }
}

/// Simulate a single stationary weapon on each space cell against the full
/// path walk, counting how many times a unit re-enters effective range after
/// the cooldown has elapsed since the last hit. Wandering paths that loop
/// past the same cell yield counts above one. Returns the mean of the top
/// ten cells.
fn strike_multiplier(map: &GameMap, kind: StructureKind) -> f64 {
    let range = kind.range();
    let cooldown = kind.cooldown();
    let mut counts = Vec::new();

    for cell in map.space_cells() {
        let mut since_in_range = cooldown;
        let mut acquisitions = 0u32;
        for step in map.path() {
            since_in_range += 1;
            if cell.dist_sq(*step) <= range && since_in_range >= cooldown {
                acquisitions += 1;
                since_in_range = 0;
            }
        }
        counts.push(acquisitions);
    }

    let top: Vec<u32> = counts
        .into_iter()
        .sorted_unstable_by(|a, b| b.cmp(a))
        .take(10)
        .collect();
    if top.is_empty() {
        0.0
    } else {
        top.iter().sum::<u32>() as f64 / top.len() as f64
    }
}

/// Greedy argmax over a live score copy. Cells that fail the placement check
/// are zeroed so they are never reconsidered; the selected cell is zeroed as
/// well. A zero maximum means the grid is spent and the first such cell is
/// returned for the caller to gate on.
pub fn best_tile<F>(live: &mut Grid<u32>, placeable: F) -> Option<Location>
where
    F: Fn(Location) -> bool,
{
    loop {
        let mut best: Option<(usize, usize, u32)> = None;
        for ((x, y), &value) in live.iter() {
            match best {
                Some((_, _, bv)) if bv >= value => {}
                _ => best = Some((x, y, value)),
            }
        }

        let (x, y, value) = best?;
        let loc = Location::new(x as u8, y as u8);
        if value == 0 {
            return Some(loc);
        }
        live.set(x, y, 0);
        if placeable(loc) {
            return Some(loc);
        }
    }
}

/// All offsets whose squared distance is within the given range. The
/// historical implementations hardcoded the complement of this set for the
/// bomber; deriving it keeps the geometry correct for any range constant.
pub fn offset_mask(range: u32) -> Vec<(i32, i32)> {
    let radius = (range as f64).sqrt() as i32;
    let mut mask = Vec::new();
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            if (dx * dx + dy * dy) as u32 <= range {
                mask.push((dx, dy));
            }
        }
    }
    mask
}

/// Candidate sites ordered ascending by path-coverage efficiency.
///
/// The directional asymmetry matters: production structures are sited on the
/// least valuable cells (front of the ladder) so the best cells stay free
/// for weapons (back of the ladder).
#[derive(Clone, Debug)]
pub struct SiteLadder {
    sites: VecDeque<(Location, u32)>,
}

impl SiteLadder {
    pub fn from_map(map: &GameMap, range: u32) -> SiteLadder {
        let mask = offset_mask(range);
        let path: FnvHashSet<Location> = map.path().iter().copied().collect();

        let mut sites: Vec<(Location, u32)> = map
            .space_cells()
            .map(|cell| {
                let efficiency = mask
                    .iter()
                    .filter(|&&(dx, dy)| {
                        let (tx, ty) = cell.offset(dx, dy);
                        map.in_bounds(tx, ty) && path.contains(&Location::new(tx as u8, ty as u8))
                    })
                    .count() as u32;
                (cell, efficiency)
            })
            .collect();

        // Stable sort keeps scan order among ties.
        sites.sort_by_key(|&(_, efficiency)| efficiency);

        SiteLadder {
            sites: sites.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Highest-efficiency site remaining.
    pub fn pop_best(&mut self) -> Option<(Location, u32)> {
        self.sites.pop_back()
    }

    /// Lowest-efficiency site remaining.
    pub fn pop_worst(&mut self) -> Option<(Location, u32)> {
        self.sites.pop_front()
    }

    /// Pop best sites until one passes the check; rejected sites are
    /// discarded for good.
    pub fn pop_best_where<F>(&mut self, accept: F) -> Option<Location>
    where
        F: Fn(Location) -> bool,
    {
        while let Some((loc, _)) = self.sites.pop_back() {
            if accept(loc) {
                return Some(loc);
            }
        }
        None
    }
}
