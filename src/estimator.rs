//! Threat projection and offensive commitment decisions.
//!
//! All projections work in whole-hit increments: a weapon only deals damage
//! in multiples of its per-shot damage, so requirements round up to the
//! nearest such multiple before comparison.

use crate::api::*;
use crate::config::*;
use crate::constants::*;
use crate::map::*;
use crate::scoring::*;
use log::*;

/// Path coverage owned by one team, weighted by tile scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coverage {
    pub gunship_tiles: u32,
    pub gunships: u32,
    pub bomber_tiles: u32,
    pub bombers: u32,
}

impl Coverage {
    pub fn weapons(&self) -> u32 {
        self.gunships + self.bombers
    }
}

pub fn coverage(structures: &[Structure], scores: &TileScores) -> Coverage {
    let mut cov = Coverage::default();
    for s in structures {
        let (x, y) = (s.loc.x() as usize, s.loc.y() as usize);
        match s.kind {
            StructureKind::Gunship => {
                cov.gunship_tiles += scores.gunship.get(x, y);
                cov.gunships += 1;
            }
            StructureKind::Bomber => {
                cov.bomber_tiles += scores.bomber.get(x, y);
                cov.bombers += 1;
            }
            _ => {}
        }
    }
    cov
}

/// Per-unit health an outgoing wave needs to survive the given defensive
/// coverage. Bomber damage is projected with two additional bombers on the
/// defender's best free tile and scaled by the strike multiplier for
/// wandering paths; gunships contribute one whole hit per five weapons.
pub fn required_wave_health(
    defense: &Coverage,
    best_free_bomber_tile: u32,
    strike: StrikeMultipliers,
    config: &StrategyConfig,
) -> u32 {
    let bomber_damage = StructureKind::Bomber.damage() as f64;
    let bomber_rate = StructureKind::Bomber.dps()
        * strike.bomber.max(1.0)
        * (defense.bomber_tiles + 2 * best_free_bomber_tile) as f64;
    let bomber_term = bomber_damage * (bomber_rate / bomber_damage).ceil();

    let gunship_term = StructureKind::Gunship.damage() * (defense.gunships / 5);

    let required = bomber_term + gunship_term as f64 + config.gapfill as f64;
    (required as u32).max(config.minimum_wave_health)
}

/// Decision to go on the offensive, produced before entering the attacking
/// phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Commitment {
    /// Per-unit health of each outgoing wave.
    pub health: u32,
    /// Number of waves to send.
    pub count: u32,
    /// Whether everything owned is sold to fund the waves.
    pub liquidate: bool,
}

/// Whether an offensive is worth starting right now.
///
/// All-in: if liquidating the whole board buys enough damage-per-cost to
/// cover the enemy's remaining health plus an overkill margin that grows in
/// the late game, commit everything. Otherwise a bounded fixed-size wave
/// goes out when the treasury (plus the farm-advantage credit) covers it.
pub fn evaluate_offense(
    rc: &dyn GameApi,
    scores: &TileScores,
    strike: StrikeMultipliers,
    config: &StrategyConfig,
    num_farms: u32,
    num_enemy_farms: u32,
) -> Option<Commitment> {
    let enemy = coverage(&rc.structures(Team::Enemy), scores);
    let desired = required_wave_health(&enemy, scores.bomber.max_value(), strike, config);

    let wave_cost = rc.wave_cost(1, desired).max(1) as f64;
    // Assume half the wave gets through once the defender has any weapon.
    let effectiveness = if enemy.weapons() <= 1 {
        1.0
    } else {
        config.contested_discount
    };
    let damage_per_cost = effectiveness * desired as f64 / wave_cost;

    let owned_value: f64 = rc
        .structures(Team::Ally)
        .iter()
        .map(|s| s.kind.cost() as f64)
        .sum();
    let total_value = rc.balance(Team::Ally) as f64 + owned_value * SELL_REFUND_RATIO;
    let affordable_waves = (total_value / wave_cost).floor();
    let all_in_damage = damage_per_cost * wave_cost * affordable_waves;
    let overkill = rc.turn().saturating_sub(config.overkill_turn) as f64;

    if all_in_damage >= rc.health(Team::Enemy) as f64 + overkill
        && all_in_damage >= config.commit_damage_floor
    {
        debug!(
            "all-in: {} waves of {} health ({} projected damage)",
            affordable_waves, desired, all_in_damage
        );
        return Some(Commitment {
            health: desired,
            count: affordable_waves as u32,
            liquidate: true,
        });
    }

    let mut bounded_value = rc.balance(Team::Ally) as f64;
    if num_farms > num_enemy_farms {
        bounded_value +=
            (num_farms - num_enemy_farms) as f64 * SELL_REFUND_RATIO * StructureKind::SolarFarm.cost() as f64;
    }
    let bounded_damage =
        config.wave_cluster_size as f64 * config.contested_discount * desired as f64;
    if bounded_value >= wave_cost * config.wave_cluster_size as f64
        && bounded_damage >= config.bounded_damage_floor
    {
        debug!(
            "bounded offensive: {} waves of {} health",
            config.wave_cluster_size, desired
        );
        return Some(Commitment {
            health: desired,
            count: config.wave_cluster_size,
            liquidate: false,
        });
    }

    None
}

/// Projected defensive strength against the current incoming threats.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DefensePower {
    /// Health absorbed per unit by area weapons alone.
    pub area_health: f64,
    /// Health absorbed per unit by all weapons combined.
    pub single_health: f64,
    /// Expected hit points the defense must absorb from incoming waves.
    pub debris_life: f64,
}

pub fn defense_power(
    rc: &dyn GameApi,
    scores: &TileScores,
    map: &GameMap,
    config: &StrategyConfig,
) -> DefensePower {
    let own = coverage(&rc.structures(Team::Ally), scores);

    let bomber_damage = StructureKind::Bomber.damage() as f64;
    let gunship_damage = StructureKind::Gunship.damage() as f64;
    let area_health = bomber_damage
        * (StructureKind::Bomber.dps() * own.bomber_tiles as f64 / bomber_damage).ceil();
    let single_health = area_health
        + gunship_damage
            * (StructureKind::Gunship.dps() * own.gunship_tiles as f64 / gunship_damage).ceil();

    // Sample only threats near the path's start or end so mid-path units are
    // not double-counted across reviews; which end depends on whether the
    // unit is hardened (fast or high-health, or anything in the late game).
    let window = config.threat_sample_window;
    let path_len = map.path_length() as u32;
    let mut debris_life = 0.0;
    for threat in rc.incoming_threats(Team::Ally) {
        let hardened = threat.total_cooldown <= 2
            || threat.total_health >= 50
            || rc.turn() > config.late_game_turn;
        let near_start = threat.progress < window;
        let near_end = threat.progress >= path_len.saturating_sub(window);

        if (near_start && hardened) || (near_end && !hardened) {
            let per_cell = threat.health as f64 / threat.total_cooldown.max(1) as f64;
            debris_life += 25.0 * ((per_cell - area_health).max(0.0) / 25.0).ceil();
        }
    }
    debris_life *= path_len as f64 / window as f64;

    DefensePower {
        area_health,
        single_health,
        debris_life,
    }
}
