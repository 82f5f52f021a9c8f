//! Strategy tuning. Every threshold the controller or estimator consults
//! lives here so that the historical bot variants become presets over one
//! engine instead of separate implementations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("weapon rate weights must both be nonzero")]
    ZeroRateWeights,
    #[error("review interval must be nonzero")]
    ZeroReviewInterval,
    #[error("strong snipe stride must be nonzero")]
    ZeroSnipeStride,
    #[error("threat sample window must be nonzero")]
    ZeroSampleWindow,
}

/// How the fallback placement scan breaks ties between equally-scored cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// First minimum in row-major scan order.
    FirstScan,
    /// Uniform choice among tied minima from a PRNG seeded with this value.
    Seeded(u64),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Weight of gunship tile value in the combined reinforcer score.
    pub gun_rate: u32,
    /// Weight of bomber tile value in the combined reinforcer score.
    pub bomb_rate: u32,
    /// How many neighboring towers one reinforcer is assumed to amplify.
    pub towers_per_reinforcer: usize,
    /// Wave health floor; enough to survive two gunship hits.
    pub minimum_wave_health: u32,
    /// Flat buffer added on top of the projected survivability requirement.
    pub gapfill: u32,
    /// Unit count of a bounded (non-liquidating) offensive wave.
    pub wave_cluster_size: u32,
    /// Minimum total damage before an all-in commitment is allowed.
    pub commit_damage_floor: f64,
    /// Minimum total damage before a bounded offensive is allowed.
    pub bounded_damage_floor: f64,
    /// Turn after which the commitment overkill margin starts growing.
    pub overkill_turn: u32,
    /// Extra debris life tolerated before switching to defense.
    pub defense_margin: f64,
    /// Debris life over survivability by this ratio forces farm liquidation.
    pub severe_threat_ratio: f64,
    /// Ticks between phase re-evaluations.
    pub review_interval: u32,
    /// Turn horizon before which all gunships snipe the frontmost unit.
    pub snipe_horizon: u32,
    /// Past the horizon, every Nth gunship snipes the strongest unit.
    pub strong_snipe_stride: usize,
    /// Assumed wave effectiveness when the defender owns any weapon.
    pub contested_discount: f64,
    /// Stop expanding production once farms exceed this fraction of space
    /// cells. None disables the cap.
    pub farm_cap_fraction: Option<f64>,
    /// After endgame liquidation drains, fill freed area with reinforcers.
    pub lattice_fill_after_liquidation: bool,
    /// Path-cell window at either end sampled for incoming threat life.
    pub threat_sample_window: u32,
    /// Turn after which every incoming threat is treated as hardened.
    pub late_game_turn: u32,
    pub tie_break: TieBreak,
}

impl StrategyConfig {
    /// The richest variant: lattice farming, full defense/offense state
    /// machine, all-in commitment.
    pub fn fortress() -> Self {
        StrategyConfig {
            gun_rate: 6,
            bomb_rate: 2,
            towers_per_reinforcer: 5,
            minimum_wave_health: 51,
            gapfill: 7,
            wave_cluster_size: 60,
            commit_damage_floor: 500.0,
            bounded_damage_floor: 1250.0,
            overkill_turn: 1500,
            defense_margin: 10.0,
            severe_threat_ratio: 1.2,
            review_interval: 5,
            snipe_horizon: 2000,
            strong_snipe_stride: 6,
            contested_discount: 0.5,
            farm_cap_fraction: None,
            lattice_fill_after_liquidation: true,
            threat_sample_window: 15,
            late_game_turn: 2000,
            tie_break: TieBreak::FirstScan,
        }
    }

    /// Farm-capped variant: stops production at a third of the board and
    /// liquidates without the reinforcer fill.
    pub fn greenhouse() -> Self {
        StrategyConfig {
            farm_cap_fraction: Some(1.0 / 3.0),
            lattice_fill_after_liquidation: false,
            ..StrategyConfig::fortress()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gun_rate == 0 || self.bomb_rate == 0 {
            return Err(ConfigError::ZeroRateWeights);
        }
        if self.review_interval == 0 {
            return Err(ConfigError::ZeroReviewInterval);
        }
        if self.strong_snipe_stride == 0 {
            return Err(ConfigError::ZeroSnipeStride);
        }
        if self.threat_sample_window == 0 {
            return Err(ConfigError::ZeroSampleWindow);
        }
        Ok(())
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::fortress()
    }
}
