//! Decision engine for a tower-defense arena agent.
//!
//! The arena implements [`api::GameApi`] and calls
//! [`strategy::Agent::play_turn`] once per tick; everything else here is the
//! machinery behind that call: a precomputed spatial value model
//! ([`scoring`]), a lattice layout planner for production and amplifier
//! structures ([`cluster`]), a threat/commitment estimator ([`estimator`]),
//! and the phase state machine that ties them together ([`strategy`]).

pub mod api;
pub mod cluster;
pub mod config;
pub mod constants;
pub mod estimator;
pub mod location;
pub mod map;
pub mod scoring;
pub mod strategy;
pub mod targeting;

pub use api::{GameApi, SnipePriority, Structure, StructureId, Team, Threat};
pub use config::{ConfigError, StrategyConfig, TieBreak};
pub use constants::StructureKind;
pub use location::Location;
pub use map::{GameMap, Grid};
pub use strategy::{Agent, Phase};
