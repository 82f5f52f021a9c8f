//! Scripted arena fake shared by the scenario tests. Implements the rules
//! the agent relies on: occupancy, treasury gating, sell refunds, and a
//! linear wave cost model (cost = count * strength).

use tower_marshal::api::*;
use tower_marshal::constants::*;
use tower_marshal::location::Location;
use tower_marshal::map::GameMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Build(StructureKind, Location),
    Sell(StructureId),
    SendWave { count: u32, strength: u32 },
    TargetSingle(StructureId, SnipePriority),
    TargetArea(StructureId),
}

pub struct FakeGame {
    pub map: GameMap,
    pub turn: u32,
    pub ally_balance: u32,
    pub enemy_balance: u32,
    pub ally_health: u32,
    pub enemy_health: u32,
    pub ally: Vec<Structure>,
    pub enemy: Vec<Structure>,
    pub threats: Vec<Threat>,
    pub actions: Vec<Action>,
    next_id: StructureId,
}

impl FakeGame {
    pub fn new(map: GameMap) -> FakeGame {
        FakeGame {
            map,
            turn: 1,
            ally_balance: 10_000,
            enemy_balance: 10_000,
            ally_health: 2500,
            enemy_health: 2500,
            ally: Vec::new(),
            enemy: Vec::new(),
            threats: Vec::new(),
            actions: Vec::new(),
            next_id: 1,
        }
    }

    pub fn add_enemy(&mut self, kind: StructureKind, loc: Location) {
        let id = self.next_id;
        self.next_id += 1;
        self.enemy.push(Structure { id, kind, loc });
    }

    pub fn add_ally(&mut self, kind: StructureKind, loc: Location) -> StructureId {
        let id = self.next_id;
        self.next_id += 1;
        self.ally.push(Structure { id, kind, loc });
        id
    }

    pub fn builds(&self) -> Vec<(StructureKind, Location)> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                Action::Build(kind, loc) => Some((*kind, *loc)),
                _ => None,
            })
            .collect()
    }

    pub fn waves_sent(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, Action::SendWave { .. }))
            .count()
    }

    fn occupied(&self, loc: Location) -> bool {
        self.ally.iter().any(|s| s.loc == loc)
    }
}

impl GameApi for FakeGame {
    fn is_buildable(&self, _team: Team, x: i32, y: i32) -> bool {
        self.map.is_space(x, y) && !self.occupied(Location::new(x as u8, y as u8))
    }

    fn can_build(&self, kind: StructureKind, loc: Location) -> bool {
        self.ally_balance >= kind.cost()
            && self.is_buildable(Team::Ally, loc.x() as i32, loc.y() as i32)
    }

    fn build(&mut self, kind: StructureKind, loc: Location) {
        if !self.can_build(kind, loc) {
            return;
        }
        self.ally_balance -= kind.cost();
        let id = self.next_id;
        self.next_id += 1;
        self.ally.push(Structure { id, kind, loc });
        self.actions.push(Action::Build(kind, loc));
    }

    fn can_sell(&self, id: StructureId) -> bool {
        self.ally.iter().any(|s| s.id == id)
    }

    fn sell(&mut self, id: StructureId) -> u32 {
        let Some(index) = self.ally.iter().position(|s| s.id == id) else {
            return 0;
        };
        let sold = self.ally.remove(index);
        let refund = (sold.kind.cost() as f64 * SELL_REFUND_RATIO) as u32;
        self.ally_balance += refund;
        self.actions.push(Action::Sell(id));
        refund
    }

    fn structures(&self, team: Team) -> Vec<Structure> {
        match team {
            Team::Ally => self.ally.clone(),
            Team::Enemy => self.enemy.clone(),
        }
    }

    fn balance(&self, team: Team) -> u32 {
        match team {
            Team::Ally => self.ally_balance,
            Team::Enemy => self.enemy_balance,
        }
    }

    fn turn(&self) -> u32 {
        self.turn
    }

    fn health(&self, team: Team) -> u32 {
        match team {
            Team::Ally => self.ally_health,
            Team::Enemy => self.enemy_health,
        }
    }

    fn incoming_threats(&self, _team: Team) -> Vec<Threat> {
        self.threats.clone()
    }

    fn wave_cost(&self, count: u32, strength: u32) -> u32 {
        count * strength
    }

    fn can_send_wave(&self, count: u32, strength: u32) -> bool {
        self.ally_balance >= self.wave_cost(count, strength)
    }

    fn send_wave(&mut self, count: u32, strength: u32) {
        if !self.can_send_wave(count, strength) {
            return;
        }
        self.ally_balance -= self.wave_cost(count, strength);
        self.actions.push(Action::SendWave { count, strength });
    }

    fn auto_target_single(&mut self, id: StructureId, priority: SnipePriority) {
        self.actions.push(Action::TargetSingle(id, priority));
    }

    fn auto_target_area(&mut self, id: StructureId) {
        self.actions.push(Action::TargetArea(id));
    }
}

/// 12x3 board with a straight 10-cell path along the middle row.
pub fn straight_map() -> GameMap {
    let path = (1..11).map(|x| Location::new(x, 1)).collect();
    GameMap::new(12, 3, path, &[])
}

/// 5x5 all-space board with no path at all.
pub fn pathless_map() -> GameMap {
    GameMap::new(5, 5, Vec::new(), &[])
}

/// 9x9 all-space board around a short path, roomy enough for the lattice.
pub fn open_map() -> GameMap {
    let path = (0..9).map(|y| Location::new(0, y)).collect();
    GameMap::new(9, 9, path, &[])
}
