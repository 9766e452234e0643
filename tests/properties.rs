use glam::Vec2;
use hunt_runner::consts::*;
use hunt_runner::sim::{
    ChaseInput, ComboEffect, ComboSystem, FollowCamera, GamePhase, GameState, Player, Pursuer,
    SpawnCursor, Symbol, TickInput, match_combo, tick,
};
use hunt_runner::tuning::{CameraTuning, ComboTuning, PlayerTuning, PursuerTuning, SpawnTuning};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

const DT: f32 = 1.0 / 60.0;

fn symbol() -> impl Strategy<Value = Symbol> {
    prop::sample::select(Symbol::ALL.to_vec())
}

fn tick_input() -> impl Strategy<Value = TickInput> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(jump_pressed, jump_just_pressed, slide_pressed, slide_just_pressed)| TickInput {
            jump_pressed,
            jump_just_pressed,
            slide_pressed,
            slide_just_pressed,
            ..Default::default()
        },
    )
}

proptest! {
    #[test]
    fn player_never_below_ground(
        inputs in prop::collection::vec(tick_input(), 1..400),
        dts in prop::collection::vec(0.001f32..0.033, 1..400),
    ) {
        let mut player = Player::new(PLAYER_START_X, GROUND_Y, &PlayerTuning::default());
        let ground_level = GROUND_Y - PLAYER_HEIGHT / 2.0;
        for (input, dt) in inputs.iter().zip(dts.iter().cycle()) {
            let prev_y = player.pos.y;
            let was_airborne = !player.grounded;
            player.update(*dt, GROUND_Y, input);

            prop_assert!(player.pos.y <= ground_level + 1e-3);
            prop_assert!(player.vel.y <= PLAYER_MAX_FALL_SPEED);
            if player.pos.y > prev_y + 1e-4 {
                // Only ever moves down while airborne and falling
                prop_assert!(was_airborne);
                prop_assert!(player.vel.y >= 0.0 || player.grounded);
            }
        }
    }

    #[test]
    fn camera_never_outruns_player(
        speeds in prop::collection::vec(0.0f32..600.0, 1..300),
        dt in 0.001f32..0.033,
        jolt in -800.0f32..800.0,
    ) {
        let mut pos = Vec2::new(PLAYER_START_X, 515.0);
        let mut camera = FollowCamera::new(pos, PLAYER_RUN_SPEED, &CameraTuning::default());
        camera.pos.x += jolt;
        for speed in speeds {
            pos.x += speed * dt;
            let before = camera.pos.x;
            camera.update(dt, pos, speed);
            prop_assert!((camera.pos.x - before).abs() <= speed * dt + 1e-3);
        }
    }

    #[test]
    fn frontier_monotonic_and_bounded(
        steps in prop::collection::vec(0.0f32..40.0, 1..300),
        seed in any::<u64>(),
    ) {
        let mut cursor = SpawnCursor::new();
        let tuning = SpawnTuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut x = PLAYER_START_X;
        let mut last = f32::MIN;
        for step in steps {
            x += step;
            cursor.update(x, GROUND_Y, &tuning, &mut rng);
            let frontier = cursor.frontier().unwrap_or(f32::MIN);
            prop_assert!(frontier >= last);
            prop_assert!(frontier >= x + tuning.look_ahead);
            prop_assert!(frontier - x < tuning.look_ahead + tuning.spacing);
            prop_assert!(cursor.obstacles.iter().all(|o| o.pos.x >= x - tuning.cull_distance));
            last = frontier;
        }
    }

    #[test]
    fn combo_buffer_clears_every_third(
        symbols in prop::collection::vec(symbol(), 0..30),
    ) {
        let mut combo = ComboSystem::new(ComboTuning::default());
        for (i, s) in symbols.iter().enumerate() {
            combo.add_symbol(*s);
            prop_assert_eq!(combo.buffer().len(), (i + 1) % 3);
        }
    }

    #[test]
    fn combo_matches_exact_triples_only(a in symbol(), b in symbol(), c in symbol()) {
        let mut combo = ComboSystem::new(ComboTuning::default());
        combo.add_symbol(a);
        combo.add_symbol(b);
        let outcome = combo.add_symbol(c);

        let expected = ComboEffect::ALL
            .into_iter()
            .filter(|e| !e.is_extended())
            .find(|e| e.sequence() == [a, b, c]);
        prop_assert_eq!(outcome.matched, expected);
        prop_assert_eq!(match_combo(&[a, b, c], false), expected);
        prop_assert_eq!(combo.active_effect(), expected);
        prop_assert_eq!(outcome.failed, expected.is_none());
    }

    #[test]
    fn pursuer_speed_non_decreasing_in_pressure(
        distance in 0.0f32..1200.0,
        missed in 0u32..15,
        escape in 0.0f32..20.0,
    ) {
        let speed_for = |missed: u32, escape: f32| {
            let mut p = Pursuer::new(0.0, GROUND_Y, &PursuerTuning::default());
            p.update(0.0, &ChaseInput {
                player_pos: Vec2::new(distance, 515.0),
                ground_y: GROUND_Y,
                game_speed: PLAYER_RUN_SPEED,
                missed,
                time_since_collection: escape,
                allow_catch: true,
            });
            prop_assert!(p.current_speed >= 0.0);
            Ok(p.current_speed)
        };
        let base = speed_for(missed, escape)?;
        prop_assert!(speed_for(missed + 1, escape)? >= base - 1e-3);
        prop_assert!(speed_for(missed, escape + 1.0)? >= base - 1e-3);
    }

    #[test]
    fn grace_forces_baseline_rage(missed in 0u32..50, escape in 0.0f32..60.0) {
        let p = Pursuer::new(0.0, GROUND_Y, &PursuerTuning::default());
        prop_assert_eq!(p.rage_multiplier(missed, escape, false), 1.0);
        prop_assert!(p.rage_multiplier(missed, escape, true) >= 1.0);
    }

    #[test]
    fn full_game_stays_consistent(
        seed in any::<u64>(),
        inputs in prop::collection::vec(tick_input(), 1..600),
    ) {
        let mut state = GameState::new(seed);
        state.phase = GamePhase::Running;
        let ground_level = GROUND_Y - PLAYER_HEIGHT / 2.0;
        let mut last_frontier = f32::MIN;
        for input in &inputs {
            let cam_before = state.camera.pos.x;
            tick(&mut state, input, DT);

            prop_assert!(state.player.pos.y <= ground_level + 1e-3);
            let step = (state.camera.pos.x - cam_before).abs();
            prop_assert!(step <= state.player.speed() * DT + 1e-3);
            if let Some(frontier) = state.spawner.frontier() {
                prop_assert!(frontier >= last_frontier);
                last_frontier = frontier;
            }
            // Taken items linger for at most the tick they were collected in
            prop_assert!(state.spawner.collectibles.iter().filter(|c| c.collected).count() <= 1);
            if state.phase != GamePhase::Running {
                break;
            }
        }
    }
}
