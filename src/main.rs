//! Hunt Runner entry point
//!
//! The browser build is driven from JS through `hunt_runner::web`. Natively
//! this runs a headless autopilot session and logs how each run ended.
//!
//! Usage: `hunt-runner [seed] [easy|normal|hard] [chase|rescue] [runs]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hunt_runner::DifficultyPreset;
    use hunt_runner::persistence::{self, MemoryStore};
    use hunt_runner::sim::{GameEvent, GameState, TickInput, tick};
    use hunt_runner::tuning::GameMode;

    /// Frame length the demo pretends the host runs at
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Ten minutes of frames per run at most
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args.first().and_then(|s| s.parse().ok()).unwrap_or(12345u64);
    let preset = args
        .get(1)
        .and_then(|s| DifficultyPreset::from_str(s))
        .unwrap_or_default();
    let mode = match args.get(2).map(|s| s.to_lowercase()) {
        Some(m) if m == "rescue" => GameMode::Rescue,
        _ => GameMode::Chase,
    };
    let runs: u32 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(3);

    log::info!("Hunt Runner (native) starting...");
    log::info!("seed={} preset={} mode={:?} runs={}", seed, preset.as_str(), mode, runs);

    let mut store = MemoryStore::default();
    let mut save = persistence::load(&store);

    let mut tuning = preset.tuning();
    tuning.mode = mode;
    let mut state = GameState::with_tuning(seed, tuning).with_high_score(save.high_score());

    let autopilot = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let restart = TickInput {
        restart: true,
        ..Default::default()
    };

    for run in 1..=runs {
        if run > 1 {
            tick(&mut state, &restart, FRAME_DT);
        }

        let mut frames = 0;
        while !state.is_game_over() && frames < MAX_FRAMES {
            tick(&mut state, &autopilot, FRAME_DT);
            frames += 1;

            for event in state.drain_events() {
                match event {
                    GameEvent::ComboMatched(effect) => {
                        log::info!("[run {}] combo {}", run, effect.name())
                    }
                    GameEvent::ShieldConsumed => log::info!("[run {}] shield absorbed a catch", run),
                    GameEvent::BoostSurvived => log::info!("[run {}] survived the speed boost", run),
                    GameEvent::GameOver(summary) | GameEvent::Rescued(summary) => {
                        let rank = save.record_run(&summary, f64::from(run));
                        println!(
                            "Run {}: {:?} score={} distance={:.0} collections={} perfect={} time={:.1}s{}",
                            run,
                            summary.outcome,
                            summary.final_score,
                            summary.distance_traveled,
                            summary.collections,
                            summary.perfect_timings,
                            summary.elapsed,
                            rank.map(|r| format!(" (leaderboard #{})", r)).unwrap_or_default()
                        );
                    }
                    _ => {}
                }
            }
        }

        if !state.is_game_over() {
            println!("Run {}: still running after {} frames, score={}", run, frames, state.score);
        }
    }

    if let Err(e) = persistence::save(&mut store, &save) {
        log::error!("Failed to save: {}", e);
    }
    println!(
        "Best score: {} over {} runs",
        save.high_score(),
        save.runs_played
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is hunt_runner::web::start, this is just to satisfy the compiler
}
