//! Per-frame simulation tick
//!
//! Advances the whole world in a fixed order: player, spawn cursor,
//! obstacles and collectibles, combo timers, antagonist, camera.

use glam::Vec2;

use super::collision::{
    ContactOutcome, check_collision, collect_first, first_obstacle_hit, resolve_antagonist_contact,
};
use super::combo::ComboEffect;
use super::pursuer::ChaseInput;
use super::state::{Antagonist, GameEvent, GamePhase, GameState, RunOutcome, RunSummary};
use crate::platform::InputSignals;
use crate::sanitize_dt;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump held
    pub jump_pressed: bool,
    /// Jump went down since the last tick
    pub jump_just_pressed: bool,
    pub slide_pressed: bool,
    pub slide_just_pressed: bool,
    /// Leave the Ready phase without jumping
    pub start: bool,
    /// Replace the world with a fresh run
    pub restart: bool,
    /// Idle/demo mode - AI jumps for the player
    pub autopilot: bool,
}

impl TickInput {
    /// Sample a host input source; edge signals are consumed
    pub fn from_signals<S: InputSignals + ?Sized>(signals: &mut S) -> Self {
        Self {
            jump_pressed: signals.is_jump_pressed(),
            jump_just_pressed: signals.take_jump_just_pressed(),
            slide_pressed: signals.is_slide_pressed(),
            slide_just_pressed: signals.take_slide_just_pressed(),
            start: false,
            restart: signals.take_restart_requested(),
            autopilot: false,
        }
    }
}

/// Whether the antagonist may end the run this tick
pub fn catch_allowed(state: &GameState) -> bool {
    state.collections >= state.tuning.grace.catch_after_collections && state.grace_timer <= 0.0
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = sanitize_dt(dt);

    if input.restart {
        state.emit(GameEvent::RestartRequested);
        let seed = state.next_seed();
        state.restart(seed);
        state.emit(GameEvent::Restarted);
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }
    let input = &input;

    match state.phase {
        GamePhase::Ready => {
            if input.jump_just_pressed || input.start {
                state.phase = GamePhase::Running;
                state.emit(GameEvent::Started);
                log::info!("Run started (seed {})", state.seed);
            }
            return;
        }
        // Final frame stays frozen until restart
        GamePhase::GameOver | GamePhase::Rescued => return,
        GamePhase::Running => {}
    }

    state.time += dt;
    state.time_ticks += 1;
    state.time_since_collection += dt;
    state.grace_timer = (state.grace_timer - dt).max(0.0);
    state.invulnerable_timer = (state.invulnerable_timer - dt).max(0.0);

    // Player physics
    apply_effects(state);
    let ground_y = state.tuning.ground_y;
    let step = state.player.update(dt, ground_y, input);
    if step.jumped {
        state.emit(GameEvent::Jumped);
    }
    if step.slid {
        state.emit(GameEvent::SlideStarted);
    }
    if step.perfect {
        state.emit(GameEvent::PerfectTiming);
    }
    if step.landed {
        state.emit(GameEvent::Landed);
    }
    state.game_speed = state.player.speed();

    // Scheduled drops and the spawn cursor
    release_pending_drops(state, dt);
    let report = state
        .spawner
        .update(state.player.pos.x, ground_y, &state.tuning.spawn, &mut state.rng);
    if report.obstacles_spawned > 0 {
        log::debug!(
            "Spawned {} obstacles, {} collectibles; culled {}",
            report.obstacles_spawned,
            report.collectibles_spawned,
            report.culled
        );
    }

    if state.combo.is_active(ComboEffect::Magnet) {
        let t = state.combo.tuning();
        let (radius, pull) = (t.magnet_radius, t.magnet_pull_speed);
        state.spawner.attract(state.player.pos, radius, pull, dt);
    }

    // Obstacles
    let player_box = state.player.bounds();
    let shielded =
        state.combo.is_active(ComboEffect::Protection) || state.invulnerable_timer > 0.0;
    if !shielded {
        if let Some(hit) = first_obstacle_hit(&player_box, &state.spawner.obstacles) {
            let (id, kind) = (hit.id, hit.kind);
            state.emit(GameEvent::ObstacleHit { id, kind });
            log::info!("Hit {:?} #{}", kind, id);
            end_run(state, RunOutcome::HitObstacle);
            return;
        }
    }

    // Collectibles
    if let Some(index) = collect_first(&player_box, &mut state.spawner.collectibles) {
        let (id, symbol) = {
            let c = &state.spawner.collectibles[index];
            (c.id, c.symbol)
        };
        state.collections += 1;
        state.missed = 0;
        state.time_since_collection = 0.0;
        state.grace_timer = state.tuning.grace.collection_grace;
        state.emit(GameEvent::Collected { id, symbol });

        let outcome = state.combo.add_symbol(symbol);
        if let Some(effect) = outcome.cancelled {
            state.emit(GameEvent::EffectCancelled(effect));
        }
        if let Some(effect) = outcome.matched {
            state.emit(GameEvent::ComboMatched(effect));
        }
        if outcome.failed {
            state.emit(GameEvent::ComboFailed);
        }
    }

    for id in state.spawner.mark_missed(player_box.min.x) {
        state.missed += 1;
        state.emit(GameEvent::Missed { id });
    }

    // Effect timers; a survived boost chains into a long shield
    if let Some(effect) = state.combo.update(dt) {
        state.emit(GameEvent::EffectEnded(effect));
    }
    if state.combo.take_survived_boost() {
        let duration = state.combo.survival_protection();
        state.combo.activate_for(ComboEffect::Protection, duration);
        state.emit(GameEvent::BoostSurvived);
    }
    apply_effects(state);

    // Antagonist
    let time_scale = if state.combo.is_active(ComboEffect::SlowMotion) {
        state.combo.tuning().slow_motion_scale
    } else {
        1.0
    };
    let allow_catch = catch_allowed(state);
    let chase = ChaseInput {
        player_pos: state.player.pos,
        ground_y,
        game_speed: state.game_speed,
        missed: state.missed,
        time_since_collection: state.time_since_collection,
        allow_catch,
    };
    let mut faller_lost = false;
    let mut rescued = false;
    match &mut state.antagonist {
        Antagonist::Pursuer(pursuer) => pursuer.update(dt * time_scale, &chase),
        Antagonist::Faller(faller) => {
            faller.update(dt * time_scale, ground_y);
            let view_bottom = state.camera.pos.y + state.tuning.viewport_height;
            faller_lost = faller.has_left_view(view_bottom, state.tuning.rescue.offscreen_margin);
            let rescue = &state.tuning.rescue;
            rescued = state.player.pos.x - crate::consts::PLAYER_START_X
                >= rescue.rescue_distance - rescue.reach_margin;
        }
    }

    if rescued {
        end_run(state, RunOutcome::Rescued);
        return;
    }
    if faller_lost {
        end_run(state, RunOutcome::FallerLost);
        return;
    }

    if let Antagonist::Pursuer(pursuer) = &state.antagonist {
        let overlapping = check_collision(&state.player.bounds(), &pursuer.bounds());
        let outcome = resolve_antagonist_contact(
            overlapping,
            allow_catch,
            state.combo.is_active(ComboEffect::Protection),
            state.invulnerable_timer > 0.0,
        );
        match outcome {
            ContactOutcome::Ignored => {}
            ContactOutcome::ShieldAbsorbed => {
                state.combo.consume_protection();
                state.invulnerable_timer = state.tuning.grace.hit_invulnerability;
                state.emit(GameEvent::ShieldConsumed);
            }
            ContactOutcome::Fatal => {
                log::info!("Caught by the pursuer");
                end_run(state, RunOutcome::Caught);
                return;
            }
        }
    }

    // Camera
    state
        .camera
        .update(dt, state.player.pos, state.player.speed());

    state.score = (state.distance() / 10.0).floor() as u64;
}

/// Push the active effect's side effects onto the world.
///
/// Derived from combo state every call, so cancellation and expiry
/// reverse them without extra bookkeeping.
fn apply_effects(state: &mut GameState) {
    let effect = state.combo.active_effect();

    state.player.speed_multiplier = if effect == Some(ComboEffect::SpeedBoost) {
        state.tuning.player.speed_boost_multiplier
    } else {
        1.0
    };
    state.player.double_jump = effect == Some(ComboEffect::DoubleJump);

    let suppress = effect == Some(ComboEffect::HazardSuppression);
    if suppress != state.spawner.suppress_hazards {
        state.spawner.set_hazards_active(!suppress);
        if !suppress {
            log::info!("Hazards re-armed");
        }
    }
}

/// Count scheduled drops down and place the ones that are due
fn release_pending_drops(state: &mut GameState, dt: f32) {
    if state.pending_drops.is_empty() {
        return;
    }
    for drop in &mut state.pending_drops {
        drop.delay -= dt;
    }
    let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut state.pending_drops)
        .into_iter()
        .partition(|d| d.delay <= 0.0);
    state.pending_drops = waiting;

    let ground_y = state.tuning.ground_y;
    let size = state.tuning.spawn.collectible_size;
    for drop in due {
        let pos = Vec2::new(state.player.pos.x + drop.ahead, ground_y - drop.height);
        let id = state.spawner.place_collectible(drop.symbol, pos, size);
        log::debug!("Dropped {:?} #{} at x={:.0}", drop.symbol, id, pos.x);
    }
}

/// Freeze the run and hand the summary to the host
fn end_run(state: &mut GameState, outcome: RunOutcome) {
    state.player.kill();
    state.score = (state.distance() / 10.0).floor() as u64;

    let new_high_score = state.score > state.high_score;
    if new_high_score {
        state.high_score = state.score;
    }
    let summary = RunSummary {
        outcome,
        final_score: state.score,
        distance_traveled: state.distance(),
        collections: state.collections,
        perfect_timings: state.player.perfect_timings,
        elapsed: state.time,
        new_high_score,
    };
    state.summary = Some(summary.clone());

    if outcome == RunOutcome::Rescued {
        state.phase = GamePhase::Rescued;
        state.emit(GameEvent::Rescued(summary));
        log::info!("Rescued! score {}", state.score);
    } else {
        state.phase = GamePhase::GameOver;
        state.emit(GameEvent::GameOver(summary));
        log::info!("Game over ({:?}), score {}", outcome, state.score);
    }
}

/// Jump anything solid on the ground just ahead
fn autopilot(state: &GameState, input: &mut TickInput) {
    if state.phase == GamePhase::Ready {
        input.start = true;
        return;
    }
    if !state.player.grounded {
        return;
    }
    let player_box = state.player.bounds();
    let lead = 60.0 * state.player.speed_multiplier;
    let threat = state.spawner.obstacles.iter().any(|o| {
        let gap = o.bounds().min.x - player_box.max.x;
        o.active
            && super::collision::obstacle_is_solid(o.kind)
            && !o.kind.is_airborne()
            && gap > 0.0
            && gap <= lead
    });
    if threat {
        input.jump_pressed = true;
        input.jump_just_pressed = true;
    }
}
