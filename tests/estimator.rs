mod common;

use common::*;
use tower_marshal::api::Threat;
use tower_marshal::config::StrategyConfig;
use tower_marshal::constants::StructureKind;
use tower_marshal::estimator::*;
use tower_marshal::scoring::*;
use tower_marshal::{GameMap, Location};

fn flat_strike() -> StrikeMultipliers {
    StrikeMultipliers {
        gunship: 1.0,
        bomber: 1.0,
    }
}

#[test]
fn wave_health_floor_holds_against_empty_defense() {
    let config = StrategyConfig::fortress();
    let health = required_wave_health(&Coverage::default(), 0, flat_strike(), &config);
    assert_eq!(health, config.minimum_wave_health);
}

#[test]
fn wave_health_rounds_to_whole_bomber_hits() {
    let config = StrategyConfig::fortress();
    let defense = Coverage {
        bomber_tiles: 100,
        bombers: 4,
        ..Coverage::default()
    };

    // 0.4 dps over 100 + 2*30 projected tiles is 64/tick; eleven 6-point
    // hits cover it, plus the 7-point gapfill.
    assert_eq!(required_wave_health(&defense, 30, flat_strike(), &config), 73);

    // Ten gunships add two whole 25-point hits.
    let defense = Coverage {
        gunships: 10,
        ..defense
    };
    assert_eq!(required_wave_health(&defense, 30, flat_strike(), &config), 123);
}

#[test]
fn strike_multiplier_scales_the_bomber_term() {
    let config = StrategyConfig::fortress();
    let defense = Coverage {
        bomber_tiles: 100,
        bombers: 4,
        ..Coverage::default()
    };

    let doubled = StrikeMultipliers {
        gunship: 1.0,
        bomber: 2.0,
    };
    assert_eq!(required_wave_health(&defense, 30, doubled, &config), 139);

    // Multipliers below one never reduce the requirement.
    let below = StrikeMultipliers {
        gunship: 0.5,
        bomber: 0.5,
    };
    assert_eq!(
        required_wave_health(&defense, 30, below, &config),
        required_wave_health(&defense, 30, flat_strike(), &config)
    );
}

#[test]
fn all_in_commitment_never_returns_once_enemy_health_outgrows_it() {
    let map = straight_map();
    let scores = compute_tile_scores(&map);
    let strike = strike_multipliers(&map);
    let config = StrategyConfig::fortress();

    // Treasury of 10_000 buys 196 waves of 51 health: 9_996 projected
    // damage against an undefended opponent.
    let mut last_all_in = true;
    for enemy_health in [100, 5_000, 9_996, 9_997, 1_000_000] {
        let mut game = FakeGame::new(map.clone());
        game.enemy_health = enemy_health;

        let commitment = evaluate_offense(&game, &scores, strike, &config, 0, 0);
        let all_in = commitment.map_or(false, |c| c.liquidate);

        assert!(
            last_all_in || !all_in,
            "all-in reappeared at enemy health {}",
            enemy_health
        );
        if enemy_health <= 9_996 {
            assert!(all_in, "all-in expected at enemy health {}", enemy_health);
        }
        last_all_in = all_in;
    }
}

#[test]
fn bounded_offensive_covers_unkillable_opponents() {
    let map = straight_map();
    let scores = compute_tile_scores(&map);
    let strike = strike_multipliers(&map);
    let config = StrategyConfig::fortress();

    let mut game = FakeGame::new(map);
    game.enemy_health = 1_000_000;

    let commitment = evaluate_offense(&game, &scores, strike, &config, 0, 0)
        .expect("rich treasury supports a bounded wave");
    assert!(!commitment.liquidate);
    assert_eq!(commitment.count, config.wave_cluster_size);
    assert_eq!(commitment.health, config.minimum_wave_health);
}

#[test]
fn poor_treasury_commits_to_nothing() {
    let map = straight_map();
    let scores = compute_tile_scores(&map);
    let strike = strike_multipliers(&map);
    let config = StrategyConfig::fortress();

    let mut game = FakeGame::new(map);
    game.ally_balance = 100;
    assert_eq!(evaluate_offense(&game, &scores, strike, &config, 0, 0), None);
}

#[test]
fn farm_advantage_credit_unlocks_the_bounded_wave() {
    let map = straight_map();
    let scores = compute_tile_scores(&map);
    let strike = strike_multipliers(&map);
    let config = StrategyConfig::fortress();

    let mut game = FakeGame::new(map);
    game.ally_balance = 2_000;

    // 2_000 alone is short of sixty 51-health waves.
    assert_eq!(evaluate_offense(&game, &scores, strike, &config, 0, 0), None);

    // Two surplus farms are worth their sell refund toward the same wave.
    let commitment = evaluate_offense(&game, &scores, strike, &config, 2, 0);
    assert!(matches!(commitment, Some(c) if !c.liquidate));
}

#[test]
fn defense_power_projects_whole_hits() {
    let map = straight_map();
    let scores = compute_tile_scores(&map);
    let config = StrategyConfig::fortress();

    let mut game = FakeGame::new(map.clone());
    game.add_ally(StructureKind::Gunship, Location::new(3, 0));
    game.threats.push(Threat {
        progress: 0,
        health: 60,
        total_health: 60,
        cooldown: 4,
        total_cooldown: 4,
    });

    let power = defense_power(&game, &scores, &map, &config);
    assert_eq!(power.area_health, 0.0);
    // One gunship over the full 10-cell path: 12.5 dps rounds up to one
    // whole 25-point hit.
    assert_eq!(power.single_health, 25.0);
    // 15 health per path cell rounds up to a single 25-point block,
    // scaled from the 15-cell window to the 10-cell path.
    assert!((power.debris_life - 25.0 * 10.0 / 15.0).abs() < 1e-9);
}

#[test]
fn mid_path_threats_fall_outside_the_sample_window() {
    let path = (1..42).map(|x| Location::new(x, 1)).collect();
    let map = GameMap::new(43, 3, path, &[]);
    let scores = compute_tile_scores(&map);
    let config = StrategyConfig::fortress();

    let mut game = FakeGame::new(map.clone());
    game.threats.push(Threat {
        progress: 20,
        health: 500,
        total_health: 500,
        cooldown: 1,
        total_cooldown: 1,
    });

    let power = defense_power(&game, &scores, &map, &config);
    assert_eq!(power.debris_life, 0.0);
}

#[test]
fn soft_units_are_sampled_at_the_path_exit() {
    let path = (1..42).map(|x| Location::new(x, 1)).collect();
    let map = GameMap::new(43, 3, path, &[]);
    let scores = compute_tile_scores(&map);
    let config = StrategyConfig::fortress();

    let mut game = FakeGame::new(map.clone());
    let soft = Threat {
        progress: 0,
        health: 10,
        total_health: 10,
        cooldown: 10,
        total_cooldown: 10,
    };

    // Soft and slow: ignored at the entrance...
    game.threats.push(soft);
    assert_eq!(defense_power(&game, &scores, &map, &config).debris_life, 0.0);

    // ...but counted once it nears the exit.
    game.threats[0].progress = 30;
    let power = defense_power(&game, &scores, &map, &config);
    assert!((power.debris_life - 25.0 * 41.0 / 15.0).abs() < 1e-9);
}
