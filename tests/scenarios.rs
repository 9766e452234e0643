use glam::Vec2;
use hunt_runner::consts::*;
use hunt_runner::sim::{
    Antagonist, ComboEffect, GameEvent, GamePhase, GameState, ObstacleKind, Player, PlayerState,
    RenderSnapshot, RunOutcome, SpawnCursor, Symbol, TickInput, tick,
};
use hunt_runner::tuning::{GameMode, PlayerTuning, SpawnTuning, Tuning};
use rand::SeedableRng;
use rand_pcg::Pcg32;

const DT: f32 = 1.0 / 60.0;

/// A running session with no random collectibles and no starter drops
fn quiet_session(seed: u64) -> GameState {
    let mut tuning = Tuning::default();
    tuning.spawn.collectible_chance = 0.0;
    let mut state = GameState::with_tuning(seed, tuning);
    state.pending_drops.clear();
    state.phase = GamePhase::Running;
    state
}

fn idle() -> TickInput {
    TickInput::default()
}

#[test]
fn scenario_a_first_spawn_fills_look_ahead() {
    let mut cursor = SpawnCursor::new();
    let tuning = SpawnTuning::default();
    let mut rng = Pcg32::seed_from_u64(1);

    cursor.update(100.0, GROUND_Y, &tuning, &mut rng);

    let xs: Vec<f32> = cursor.obstacles.iter().map(|o| o.pos.x).collect();
    assert_eq!(xs, vec![400.0, 700.0, 1000.0, 1300.0, 1600.0]);
    assert_eq!(cursor.frontier(), Some(1600.0));
}

#[test]
fn scenario_b_jump_is_edge_triggered() {
    let mut player = Player::new(PLAYER_START_X, GROUND_Y, &PlayerTuning::default());
    let jump = TickInput {
        jump_pressed: true,
        jump_just_pressed: true,
        ..Default::default()
    };

    // Zero-length step isolates the impulse from gravity
    player.update(0.0, GROUND_Y, &jump);
    assert_eq!(player.state, PlayerState::Jumping);
    assert_eq!(player.vel.y, PLAYER_JUMP_IMPULSE);
    assert!(!player.grounded);

    player.update(DT, GROUND_Y, &idle());
    let vy = player.vel.y;
    let step = player.update(0.0, GROUND_Y, &jump);
    assert!(!step.jumped);
    assert_eq!(player.vel.y, vy);
}

#[test]
fn scenario_c_collection_cancels_active_combo() {
    let mut state = quiet_session(3);

    for symbol in [Symbol::Two, Symbol::Three, Symbol::Two] {
        let pos = state.player.pos;
        state.spawner.place_collectible(symbol, pos, 32.0);
        tick(&mut state, &idle(), DT);
    }
    assert_eq!(state.combo.active_effect(), Some(ComboEffect::Protection));
    assert!(
        state
            .drain_events()
            .contains(&GameEvent::ComboMatched(ComboEffect::Protection))
    );

    for _ in 0..60 {
        tick(&mut state, &idle(), DT);
    }
    let remaining = state.combo.active().map(|a| a.remaining).unwrap_or(0.0);
    assert!(remaining > 4.5 && remaining < 5.0, "remaining={remaining}");

    let pos = state.player.pos;
    state.spawner.place_collectible(Symbol::Five, pos, 32.0);
    tick(&mut state, &idle(), DT);

    assert_eq!(state.combo.active_effect(), None);
    assert_eq!(state.combo.buffer(), &[Symbol::Five]);
    assert!(
        state
            .drain_events()
            .contains(&GameEvent::EffectCancelled(ComboEffect::Protection))
    );
}

#[test]
fn scenario_d_shield_absorbs_catch() {
    let mut state = quiet_session(4);
    state.collections = 2;
    state.grace_timer = 0.0;
    state.combo.activate(ComboEffect::Protection);
    if let Antagonist::Pursuer(p) = &mut state.antagonist {
        p.pos.x = state.player.pos.x;
    }

    tick(&mut state, &idle(), DT);

    assert_eq!(state.phase, GamePhase::Running);
    assert_eq!(state.combo.active_effect(), None);
    assert!(state.invulnerable_timer > 0.0);
    assert!(state.drain_events().contains(&GameEvent::ShieldConsumed));

    // Still overlapping, but inside the invulnerability window
    tick(&mut state, &idle(), DT);
    assert_eq!(state.phase, GamePhase::Running);
    assert_ne!(state.player.state, PlayerState::Dead);
}

#[test]
fn caught_without_shield_reports_summary() {
    let mut state = quiet_session(5).with_high_score(0);
    state.collections = 2;
    state.grace_timer = 0.0;
    for _ in 0..30 {
        tick(&mut state, &idle(), DT);
    }
    if let Antagonist::Pursuer(p) = &mut state.antagonist {
        p.pos.x = state.player.pos.x;
    }
    tick(&mut state, &idle(), DT);

    assert_eq!(state.phase, GamePhase::GameOver);
    let over = state.drain_events().into_iter().find_map(|e| match e {
        GameEvent::GameOver(summary) => Some(summary),
        _ => None,
    });
    let summary = over.expect("game over event");
    assert_eq!(summary.outcome, RunOutcome::Caught);
    assert_eq!(summary.final_score, state.score);
    assert!(summary.new_high_score);
    assert_eq!(state.high_score, summary.final_score);
}

#[test]
fn same_seed_same_run() {
    let run = |seed: u64| {
        let mut state = GameState::new(seed);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..900 {
            tick(&mut state, &input, DT);
        }
        serde_json::to_string(&RenderSnapshot::capture(&state)).unwrap()
    };
    assert_eq!(run(77), run(77));
    assert_ne!(run(77), run(78));
}

#[test]
fn rescue_mode_can_be_won() {
    let mut tuning = Tuning::default();
    tuning.mode = GameMode::Rescue;
    tuning.spawn.obstacle_kinds = vec![ObstacleKind::GroundBlock];
    tuning.spawn.collectible_chance = 0.0;
    let mut state = GameState::with_tuning(9, tuning);
    state.pending_drops.clear();

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    for _ in 0..(60 * 30) {
        tick(&mut state, &input, DT);
        if state.is_game_over() {
            break;
        }
    }
    assert_eq!(state.phase, GamePhase::Rescued);
    assert_eq!(
        state.summary.as_ref().map(|s| s.outcome),
        Some(RunOutcome::Rescued)
    );
}

#[test]
fn rescue_mode_lost_when_faller_leaves_view() {
    let mut tuning = Tuning::default();
    tuning.mode = GameMode::Rescue;
    let mut state = GameState::with_tuning(10, tuning);
    state.phase = GamePhase::Running;
    if let Antagonist::Faller(f) = &mut state.antagonist {
        f.pos.y = state.camera.pos.y + VIEWPORT_HEIGHT + 200.0;
    }
    tick(&mut state, &idle(), DT);
    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(
        state.summary.as_ref().map(|s| s.outcome),
        Some(RunOutcome::FallerLost)
    );
}

#[test]
fn starter_drops_appear_on_schedule() {
    let mut state = GameState::new(11);
    state.phase = GamePhase::Running;
    state.tuning.spawn.collectible_chance = 0.0;
    // Nothing to trip over while idling
    state.tuning.spawn.obstacle_kinds = vec![ObstacleKind::GapMarker];

    for _ in 0..55 {
        tick(&mut state, &idle(), DT);
    }
    assert!(state.spawner.collectibles.is_empty());

    for _ in 0..10 {
        tick(&mut state, &idle(), DT);
    }
    assert_eq!(state.spawner.collectibles.len(), 1);
    assert_eq!(state.spawner.collectibles[0].symbol, Symbol::Two);

    for _ in 0..60 {
        tick(&mut state, &idle(), DT);
    }
    let symbols: Vec<Symbol> = state.spawner.collectibles.iter().map(|c| c.symbol).collect();
    assert_eq!(symbols, vec![Symbol::Two, Symbol::Three]);
    assert!(state.pending_drops.is_empty());
}

#[test]
fn restart_replaces_world_in_one_step() {
    let mut state = quiet_session(12).with_high_score(99);
    for _ in 0..120 {
        tick(&mut state, &idle(), DT);
    }
    state.combo.activate(ComboEffect::SpeedBoost);

    let restart = TickInput {
        restart: true,
        ..Default::default()
    };
    tick(&mut state, &restart, DT);

    assert_eq!(state.phase, GamePhase::Running);
    assert_eq!(state.player.pos, Vec2::new(PLAYER_START_X, GROUND_Y - PLAYER_HEIGHT / 2.0));
    assert_eq!(state.combo.active_effect(), None);
    assert_eq!(state.time, 0.0);
    assert_eq!(state.high_score, 99);
    assert_eq!(state.pending_drops.len(), 2);
}
