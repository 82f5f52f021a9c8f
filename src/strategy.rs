//! The per-tick decision driver: a finite-state economic/military
//! controller over the scoring model, cluster planner, and estimator.

use crate::api::*;
use crate::cluster::*;
use crate::config::*;
use crate::constants::*;
use crate::estimator::*;
use crate::location::*;
use crate::map::*;
use crate::scoring::*;
use crate::targeting::*;
use log::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// First-tick initialization; leaves immediately.
    Starting,
    /// Economic growth through the cluster lattice.
    Farming,
    /// Weapon buildup against incoming pressure.
    Defending,
    /// Sending committed waves.
    Attacking,
    /// Endgame: board is full, convert production into weapons.
    Liquidating,
}

/// One agent instance per game. All cross-tick state lives here; everything
/// about the opponent and the treasury is read fresh from the `GameApi`
/// each tick.
pub struct Agent {
    config: StrategyConfig,
    map: GameMap,
    phase: Phase,
    initialized: bool,

    /// Immutable per-cell value model, computed once from the map.
    scores: TileScores,
    strike: StrikeMultipliers,
    reinf: Grid<u32>,

    /// Live copies consumed by greedy weapon placement.
    live_gunship: Grid<u32>,
    live_bomber: Grid<u32>,
    live_reinf: Grid<u32>,

    planner: ClusterPlanner,
    ladder: SiteLadder,

    /// Waves remaining and their per-unit health while attacking.
    sending_count: u32,
    sending_health: u32,

    /// Farms pending endgame replacement, with their sites.
    liquidation_queue: Vec<(StructureId, Location)>,
}

impl Agent {
    pub fn new(map: GameMap, config: StrategyConfig) -> Result<Agent, ConfigError> {
        config.validate()?;

        let scores = compute_tile_scores(&map);
        let strike = strike_multipliers(&map);
        let reinf = combined_reinforcer_values(&scores, &config, &map);
        let ladder = SiteLadder::from_map(&map, StructureKind::Gunship.range());

        Ok(Agent {
            phase: Phase::Starting,
            initialized: false,
            live_gunship: scores.gunship.clone(),
            live_bomber: scores.bomber.clone(),
            live_reinf: reinf.clone(),
            planner: ClusterPlanner::new(config.tie_break),
            ladder,
            sending_count: 0,
            sending_health: 0,
            liquidation_queue: Vec::new(),
            scores,
            strike,
            reinf,
            map,
            config,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn planner(&self) -> &ClusterPlanner {
        &self.planner
    }

    pub fn strike(&self) -> StrikeMultipliers {
        self.strike
    }

    pub fn tile_scores(&self) -> &TileScores {
        &self.scores
    }

    /// Called exactly once per game tick by the arena.
    pub fn play_turn(&mut self, rc: &mut dyn GameApi) {
        if !self.initialized {
            self.planner.seed(rc, &self.map, &self.reinf);
            self.initialized = true;
        }

        if self.phase == Phase::Starting {
            self.transition(Phase::Farming, rc.turn());
        }

        match self.phase {
            Phase::Starting => {}
            Phase::Farming => self.farming_tick(rc),
            Phase::Defending => self.defending_tick(rc),
            Phase::Attacking => self.attacking_tick(rc),
            Phase::Liquidating => self.liquidating_tick(rc),
        }

        assign_targets(rc, &self.config);
    }

    fn transition(&mut self, next: Phase, turn: u32) {
        if self.phase != next {
            debug!("turn {}: {:?} -> {:?}", turn, self.phase, next);
            self.phase = next;
        }
    }

    fn count_farms(structures: &[Structure]) -> u32 {
        structures
            .iter()
            .filter(|s| s.kind == StructureKind::SolarFarm)
            .count() as u32
    }

    fn farming_tick(&mut self, rc: &mut dyn GameApi) {
        let num_farms = Self::count_farms(&rc.structures(Team::Ally));

        let under_cap = match self.config.farm_cap_fraction {
            None => true,
            Some(fraction) => (num_farms as f64) < fraction * self.map.space_count() as f64,
        };
        if under_cap && rc.balance(Team::Ally) >= StructureKind::SolarFarm.cost() {
            let outcome = self
                .planner
                .build_step(rc, &self.map, &self.scores, &self.reinf);
            if outcome == StepOutcome::Exhausted {
                self.begin_liquidation(rc);
                return;
            }
        }

        if rc.turn() % self.config.review_interval == 0 {
            let power = defense_power(rc, &self.scores, &self.map, &self.config);
            if power.debris_life > power.single_health + self.config.defense_margin {
                self.transition(Phase::Defending, rc.turn());
                return;
            }

            let num_enemy_farms = Self::count_farms(&rc.structures(Team::Enemy));
            if let Some(commitment) = evaluate_offense(
                rc,
                &self.scores,
                self.strike,
                &self.config,
                num_farms,
                num_enemy_farms,
            ) {
                if commitment.liquidate {
                    self.sell_everything(rc);
                }
                self.sending_count = commitment.count;
                self.sending_health = commitment.health;
                self.transition(Phase::Attacking, rc.turn());
            }
        }
    }

    fn defending_tick(&mut self, rc: &mut dyn GameApi) {
        let own = coverage(&rc.structures(Team::Ally), &self.scores);

        // Bombers saturate quickly; once their (amplified) coverage carries
        // the weighted ratio, spend on gunships instead.
        let bomber_side =
            (own.bomber_tiles + self.live_bomber.max_value()) as u64 * self.config.gun_rate as u64 * 4;
        let gunship_side = self.config.bomb_rate as u64 * own.gunship_tiles as u64;

        if bomber_side >= gunship_side {
            self.place_weapon(rc, StructureKind::Gunship);
        } else {
            self.place_weapon(rc, StructureKind::Bomber);
        }

        if rc.turn() % self.config.review_interval == 0 {
            let power = defense_power(rc, &self.scores, &self.map, &self.config);
            if power.debris_life <= power.single_health {
                self.transition(Phase::Farming, rc.turn());
            } else if power.debris_life > power.single_health * self.config.severe_threat_ratio {
                let num_enemy_farms = Self::count_farms(&rc.structures(Team::Enemy));
                self.sell_farms_down_to(rc, num_enemy_farms);
            }
        }
    }

    fn attacking_tick(&mut self, rc: &mut dyn GameApi) {
        if self.sending_count == 0 {
            self.transition(Phase::Farming, rc.turn());
            return;
        }

        let cost = rc.wave_cost(1, self.sending_health);
        if rc.balance(Team::Ally) < cost {
            let num_farms = Self::count_farms(&rc.structures(Team::Ally));
            self.sell_farms_down_to(rc, num_farms.saturating_sub(1));
        }
        if rc.balance(Team::Ally) >= cost && rc.can_send_wave(1, self.sending_health) {
            rc.send_wave(1, self.sending_health);
            self.sending_count -= 1;
        }
    }

    fn begin_liquidation(&mut self, rc: &dyn GameApi) {
        self.liquidation_queue = rc
            .structures(Team::Ally)
            .iter()
            .filter(|s| s.kind == StructureKind::SolarFarm)
            .map(|s| (s.id, s.loc))
            .collect();
        debug!(
            "board full, liquidating {} farms",
            self.liquidation_queue.len()
        );
        self.transition(Phase::Liquidating, rc.turn());
    }

    fn liquidating_tick(&mut self, rc: &mut dyn GameApi) {
        if let Some(&(id, loc)) = self.liquidation_queue.last() {
            if rc.can_sell(id) {
                rc.sell(id);
                if rc.can_build(StructureKind::Gunship, loc) {
                    rc.build(StructureKind::Gunship, loc);
                } else {
                    // Freed site rejected (e.g. reclaimed meanwhile); take
                    // the best remaining ladder site instead.
                    let probe: &dyn GameApi = rc;
                    if let Some(alt) = self
                        .ladder
                        .pop_best_where(|l| probe.is_buildable(Team::Ally, l.x() as i32, l.y() as i32))
                    {
                        if rc.can_build(StructureKind::Gunship, alt) {
                            rc.build(StructureKind::Gunship, alt);
                        }
                    }
                }
            }
            self.liquidation_queue.pop();
            return;
        }

        if self.config.lattice_fill_after_liquidation
            && rc.balance(Team::Ally) >= StructureKind::Reinforcer.cost()
        {
            let loc = {
                let probe: &dyn GameApi = rc;
                best_tile(&mut self.live_reinf, |l| {
                    probe.is_buildable(Team::Ally, l.x() as i32, l.y() as i32)
                })
            };
            if let Some(loc) = loc {
                if rc.can_build(StructureKind::Reinforcer, loc) {
                    rc.build(StructureKind::Reinforcer, loc);
                }
            }
        }
    }

    fn place_weapon(&mut self, rc: &mut dyn GameApi, kind: StructureKind) {
        if rc.balance(Team::Ally) < kind.cost() {
            return;
        }
        let live = match kind {
            StructureKind::Gunship => &mut self.live_gunship,
            StructureKind::Bomber => &mut self.live_bomber,
            _ => return,
        };
        let loc = {
            let probe: &dyn GameApi = rc;
            best_tile(live, |l| {
                probe.is_buildable(Team::Ally, l.x() as i32, l.y() as i32)
            })
        };
        if let Some(loc) = loc {
            if rc.can_build(kind, loc) {
                rc.build(kind, loc);
            }
        }
    }

    /// Liquidate the whole board ahead of an all-in commitment; the lattice
    /// restarts from scratch with the freed farm sites back in the pool.
    fn sell_everything(&mut self, rc: &mut dyn GameApi) {
        let structures = rc.structures(Team::Ally);
        let mut freed = Vec::new();
        for s in &structures {
            if rc.can_sell(s.id) {
                if s.kind == StructureKind::SolarFarm {
                    freed.push(s.loc);
                }
                rc.sell(s.id);
            }
        }
        self.planner.reset();
        self.planner.seed(rc, &self.map, &self.reinf);
        for loc in freed {
            self.planner.reclaim(loc);
        }
    }

    /// Sell farms until at most `target` remain, returning their sites to
    /// the planner.
    fn sell_farms_down_to(&mut self, rc: &mut dyn GameApi, target: u32) {
        let structures = rc.structures(Team::Ally);
        let mut remaining = Self::count_farms(&structures);

        for s in &structures {
            if remaining <= target {
                break;
            }
            if s.kind == StructureKind::SolarFarm && rc.can_sell(s.id) {
                rc.sell(s.id);
                self.planner.reclaim(s.loc);
                remaining -= 1;
            }
        }
    }
}
