//! Pursuit AI
//!
//! The hunter has no discrete states. Everything hangs off one rage
//! scalar and two chase distances that tighten while the player keeps
//! missing collectibles or running without collecting.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::SimError;
use crate::tuning::PursuerTuning;

/// Inputs to one pursuer update
#[derive(Debug, Clone, Copy)]
pub struct ChaseInput {
    pub player_pos: Vec2,
    pub ground_y: f32,
    pub game_speed: f32,
    pub missed: u32,
    pub time_since_collection: f32,
    pub allow_catch: bool,
}

/// The antagonist chasing from behind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    /// Box centre
    pub pos: Vec2,
    pub size: Vec2,
    pub current_speed: f32,
    pub rage: f32,
    pub target_distance: f32,
    pub min_distance: f32,
    /// Last observed gap to the player (never negative)
    pub distance_to_player: f32,
    pub missed: u32,
    pub time_since_collection: f32,
    tuning: PursuerTuning,
}

impl Pursuer {
    pub fn new(x: f32, ground_y: f32, tuning: &PursuerTuning) -> Self {
        let size = Vec2::new(tuning.width, tuning.height);
        Self {
            pos: Vec2::new(x, ground_y - size.y / 2.0),
            size,
            current_speed: tuning.base_speed,
            rage: 1.0,
            target_distance: tuning.target_distance,
            min_distance: tuning.min_distance,
            distance_to_player: 0.0,
            missed: 0,
            time_since_collection: 0.0,
            tuning: tuning.clone(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Rage for a given miss count and escape time
    pub fn rage_multiplier(&self, missed: u32, time_since_collection: f32, allow_catch: bool) -> f32 {
        if !allow_catch {
            return 1.0;
        }
        let t = &self.tuning;
        let escape = (time_since_collection - t.escape_grace).max(0.0);
        let bonus = (escape * t.escape_rage_rate).min(t.escape_rage_cap);
        1.0 + missed as f32 * t.rage_per_miss + bonus
    }

    /// Shrink chase distances with escape time and misses, or reset them during grace
    fn tighten(&mut self, missed: u32, time_since_collection: f32, allow_catch: bool) {
        let t = &self.tuning;
        if !allow_catch {
            self.target_distance = t.target_distance;
            self.min_distance = t.min_distance;
            return;
        }
        let tighten = (time_since_collection - t.tighten_delay).max(0.0) * t.tighten_per_second
            + missed as f32 * t.tighten_per_miss;
        self.target_distance = (t.target_distance - tighten).max(0.0);
        self.min_distance = (self.target_distance - t.min_gap).max(0.0);
    }

    /// Speed law over the current distance band
    fn chase_speed(&self, distance: f32, game_speed: f32, allow_catch: bool) -> f32 {
        let t = &self.tuning;
        let base = t.base_speed;

        let band_speed = if distance > self.target_distance {
            let overshoot = distance - self.target_distance;
            (base + overshoot * t.chase_gain) * self.rage
        } else if distance < self.min_distance {
            let undershoot = self.min_distance - distance;
            ((base - undershoot * t.brake_gain) * self.rage).max(base * t.floor_factor)
        } else {
            base * self.rage
        };

        let share = if allow_catch {
            t.game_speed_share
        } else {
            t.grace_game_speed_share
        };
        (band_speed.min(t.max_speed) + game_speed.max(0.0) * share).max(0.0)
    }

    /// Advance one tick
    pub fn update(&mut self, dt: f32, input: &ChaseInput) {
        self.missed = input.missed;
        self.time_since_collection = input.time_since_collection.max(0.0);

        let distance = (input.player_pos.x - self.pos.x).max(0.0);
        self.distance_to_player = distance;

        self.rage = self.rage_multiplier(self.missed, self.time_since_collection, input.allow_catch);
        self.tighten(self.missed, self.time_since_collection, input.allow_catch);

        let speed = self.chase_speed(distance, input.game_speed, input.allow_catch);
        if !speed.is_finite() {
            let err = SimError::NonFinite { entity: "pursuer", id: 0 };
            log::warn!("{}; holding speed {}", err, self.current_speed);
        } else {
            self.current_speed = speed;
        }

        let next_x = self.pos.x + self.current_speed * dt;
        if next_x.is_finite() {
            self.pos.x = next_x.max(self.pos.x);
        }
        self.pos.y = input.ground_y - self.size.y / 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn pursuer() -> Pursuer {
        Pursuer::new(0.0, GROUND_Y, &PursuerTuning::default())
    }

    fn input(distance: f32, missed: u32, escape: f32, allow_catch: bool) -> ChaseInput {
        ChaseInput {
            player_pos: Vec2::new(distance, GROUND_Y - 35.0),
            ground_y: GROUND_Y,
            game_speed: PLAYER_RUN_SPEED,
            missed,
            time_since_collection: escape,
            allow_catch,
        }
    }

    #[test]
    fn test_rage_from_misses() {
        let p = pursuer();
        assert!((p.rage_multiplier(3, 0.0, true) - 1.45).abs() < 1e-6);
    }

    #[test]
    fn test_escape_bonus_capped() {
        let p = pursuer();
        assert!((p.rage_multiplier(0, 3.0, true) - 1.1).abs() < 1e-5);
        assert!((p.rage_multiplier(0, 100.0, true) - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_grace_resets_rage_and_distances() {
        let mut p = pursuer();
        p.update(1.0 / 60.0, &input(400.0, 5, 10.0, true));
        assert!(p.rage > 1.0);
        assert!(p.target_distance < PURSUER_TARGET_DISTANCE);

        p.update(1.0 / 60.0, &input(400.0, 5, 10.0, false));
        assert_eq!(p.rage, 1.0);
        assert_eq!(p.target_distance, PURSUER_TARGET_DISTANCE);
        assert_eq!(p.min_distance, PURSUER_MIN_DISTANCE);
    }

    #[test]
    fn test_tightening_formula() {
        let mut p = pursuer();
        // 2.5s escape -> 1s past the delay -> 60, plus 2 misses -> 90
        p.update(1.0 / 60.0, &input(1000.0, 2, 2.5, true));
        assert!((p.target_distance - 150.0).abs() < 1e-3);
        assert!((p.min_distance - 125.0).abs() < 1e-3);
    }

    #[test]
    fn test_speed_bands() {
        let mut p = pursuer();
        // Far behind: accelerates, capped
        p.update(0.0, &input(10_000.0, 0, 0.0, true));
        let share = PLAYER_RUN_SPEED * 0.25;
        assert!((p.current_speed - (PURSUER_MAX_SPEED + share)).abs() < 1e-3);

        // Inside the hold band
        let mut p = pursuer();
        p.update(0.0, &input(280.0, 0, 0.0, true));
        assert!((p.current_speed - (PURSUER_BASE_SPEED + share)).abs() < 1e-3);

        // Too close: brakes to the floor
        let mut p = pursuer();
        p.update(0.0, &input(0.0, 0, 0.0, true));
        assert!((p.current_speed - (PURSUER_BASE_SPEED * 0.6 + share)).abs() < 1e-3);
    }

    #[test]
    fn test_never_moves_backward() {
        let mut p = pursuer();
        p.pos.x = 1000.0;
        let x = p.pos.x;
        // Player behind the pursuer: distance clamps to zero
        p.update(1.0 / 60.0, &input(0.0, 0, 0.0, true));
        assert_eq!(p.distance_to_player, 0.0);
        assert!(p.current_speed >= 0.0);
        assert!(p.pos.x >= x);
    }

    #[test]
    fn test_non_finite_speed_is_held() {
        let mut p = pursuer();
        let speed = p.current_speed;
        let x = p.pos.x;
        let mut chase = input(400.0, 0, 0.0, true);
        chase.game_speed = f32::INFINITY;
        p.update(1.0 / 60.0, &chase);
        assert_eq!(p.current_speed, speed);
        assert!(p.pos.x.is_finite() && p.pos.x > x);
    }

    #[test]
    fn test_speed_non_decreasing_in_misses() {
        let mut last = 0.0;
        for missed in 0..20 {
            let mut p = pursuer();
            p.update(0.0, &input(320.0, missed, 0.0, true));
            assert!(p.current_speed >= last - 1e-3, "missed={missed}");
            last = p.current_speed;
        }
    }
}
