//! Follow camera
//!
//! Frame-rate independent smoothing toward a look-ahead target, with a
//! hard cap so the camera never moves further in a tick than the player.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::is_finite_vec;
use crate::tuning::CameraTuning;

/// `1 - (1 - damping)^(dt * fps)`: approaches 1 as dt grows
#[inline]
pub fn damping_factor(damping: f32, dt: f32, reference_fps: f32) -> f32 {
    let damping = damping.clamp(0.0, 1.0);
    1.0 - (1.0 - damping).powf(dt * reference_fps)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowCamera {
    /// View origin (top-left) in world units
    pub pos: Vec2,
    pub target: Vec2,
    /// Estimated velocity from the last update
    pub velocity: Vec2,
    pub zoom: f32,
    tuning: CameraTuning,
}

impl FollowCamera {
    /// Start already settled on the player
    pub fn new(player_pos: Vec2, player_speed: f32, tuning: &CameraTuning) -> Self {
        let mut camera = Self {
            pos: Vec2::ZERO,
            target: Vec2::ZERO,
            velocity: Vec2::ZERO,
            zoom: tuning.base_zoom,
            tuning: tuning.clone(),
        };
        camera.target = camera.target_for(player_pos, player_speed);
        camera.pos = camera.target;
        camera
    }

    /// Look-ahead grows with speed up to its clamp
    pub fn look_ahead(&self, speed: f32) -> f32 {
        let t = &self.tuning;
        if t.reference_speed <= 0.0 {
            return 0.0;
        }
        (t.look_ahead * speed / t.reference_speed).clamp(0.0, t.max_look_ahead)
    }

    /// Allowed range for the view origin: `[x - max_lag, x - min_lead]`
    fn frame_bounds(&self, player_x: f32) -> (f32, f32) {
        let t = &self.tuning;
        let lo = player_x - t.max_lag.max(t.min_lead);
        let hi = player_x - t.min_lead.min(t.max_lag);
        (lo, hi)
    }

    fn target_for(&self, player_pos: Vec2, speed: f32) -> Vec2 {
        let t = &self.tuning;
        let (lo, hi) = self.frame_bounds(player_pos.x);
        let x = player_pos.x - t.follow_offset + self.look_ahead(speed);
        Vec2::new(x.clamp(lo, hi), player_pos.y - t.follow_offset_y)
    }

    pub fn update(&mut self, dt: f32, player_pos: Vec2, player_speed: f32) {
        if !is_finite_vec(player_pos) || !player_speed.is_finite() || dt <= 0.0 {
            return;
        }
        let t = &self.tuning;
        let speed = player_speed.max(0.0);
        self.target = self.target_for(player_pos, speed);

        let factor = damping_factor(t.damping, dt, t.reference_fps);
        let smoothed = self.pos + (self.target - self.pos) * factor;

        // Keep the player framed, then cap the step to the player's own
        let (lo, hi) = self.frame_bounds(player_pos.x);
        let framed = smoothed.x.clamp(lo, hi);
        let max_step = speed * dt;
        let x = framed.clamp(self.pos.x - max_step, self.pos.x + max_step);

        let next = Vec2::new(x, smoothed.y);
        self.velocity = (next - self.pos) / dt;
        self.pos = next;

        let target_zoom = t.base_zoom * (1.0 + speed / 1000.0).min(1.1);
        self.zoom += (target_zoom - self.zoom) * t.zoom_smoothing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_damping_factor_limits() {
        assert_eq!(damping_factor(0.15, 0.0, 60.0), 0.0);
        let one_frame = damping_factor(0.15, DT, 60.0);
        assert!((one_frame - 0.15).abs() < 1e-5);
        assert!(damping_factor(0.15, 1.0, 60.0) > 0.99);
    }

    #[test]
    fn test_starts_settled() {
        let player = Vec2::new(PLAYER_START_X, 515.0);
        let cam = FollowCamera::new(player, PLAYER_RUN_SPEED, &CameraTuning::default());
        assert!((cam.pos.x - (PLAYER_START_X - 250.0)).abs() < 1e-3);
    }

    #[test]
    fn test_step_never_exceeds_player_step() {
        let mut player = Vec2::new(PLAYER_START_X, 515.0);
        let mut cam = FollowCamera::new(player, PLAYER_RUN_SPEED, &CameraTuning::default());
        // Jolt the camera far off target
        cam.pos.x -= 400.0;
        for _ in 0..120 {
            player.x += PLAYER_RUN_SPEED * DT;
            let before = cam.pos.x;
            cam.update(DT, player, PLAYER_RUN_SPEED);
            assert!((cam.pos.x - before).abs() <= PLAYER_RUN_SPEED * DT + 1e-3);
        }
    }

    #[test]
    fn test_frozen_when_player_stops() {
        let player = Vec2::new(500.0, 515.0);
        let mut cam = FollowCamera::new(player, PLAYER_RUN_SPEED, &CameraTuning::default());
        let x = cam.pos.x;
        cam.update(DT, player, 0.0);
        assert_eq!(cam.pos.x, x);
    }

    #[test]
    fn test_stays_in_frame() {
        let mut player = Vec2::new(PLAYER_START_X, 515.0);
        let tuning = CameraTuning::default();
        let mut cam = FollowCamera::new(player, PLAYER_RUN_SPEED, &tuning);
        for i in 0..300 {
            let speed = if i % 50 < 25 { 300.0 } else { 200.0 };
            player.x += speed * DT;
            cam.update(DT, player, speed);
            assert!(cam.pos.x >= player.x - tuning.max_lag - 1e-2);
            assert!(cam.pos.x <= player.x - tuning.min_lead + 1e-2);
        }
    }

    #[test]
    fn test_zoom_eases_out_with_speed() {
        let player = Vec2::new(0.0, 515.0);
        let tuning = CameraTuning::default();
        let mut cam = FollowCamera::new(player, 0.0, &tuning);
        for _ in 0..200 {
            cam.update(DT, player, 500.0);
        }
        assert!((cam.zoom - tuning.base_zoom * 1.1).abs() < 1e-3);
    }
}
