//! Per-weapon target priority, reassigned every tick.
//!
//! Early on, every gunship snipes the frontmost unit to stop leaks. Past the
//! horizon, waves arrive with mixed health pools and a fixed fraction of
//! gunships switches to the strongest unit so high-health carriers do not
//! ride through on chip damage. Bombers have no target selection.

use crate::api::*;
use crate::config::*;
use crate::constants::*;

pub fn assign_targets(rc: &mut dyn GameApi, config: &StrategyConfig) {
    let turn = rc.turn();
    let structures = rc.structures(Team::Ally);

    for (index, structure) in structures.iter().enumerate() {
        match structure.kind {
            StructureKind::Gunship => {
                let priority = if turn < config.snipe_horizon || index % config.strong_snipe_stride != 0
                {
                    SnipePriority::First
                } else {
                    SnipePriority::Strong
                };
                rc.auto_target_single(structure.id, priority);
            }
            StructureKind::Bomber => rc.auto_target_area(structure.id),
            _ => {}
        }
    }
}
