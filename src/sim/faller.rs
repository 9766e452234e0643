//! Falling antagonist for rescue mode
//!
//! Drops from high above the rescue point with a fall speed that grows
//! over time. The player wins by reaching the rescue point first.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::SimError;
use crate::tuning::RescueTuning;

const FALLER_SIZE: Vec2 = Vec2::new(60.0, 60.0);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faller {
    /// Box centre
    pub pos: Vec2,
    pub size: Vec2,
    pub start_y: f32,
    pub fall_speed: f32,
    pub elapsed: f32,
    /// 0 at spawn, 1 when it reaches the ground line
    pub urgency: f32,
    base_fall_speed: f32,
    fall_acceleration: f32,
}

impl Faller {
    pub fn new(x: f32, tuning: &RescueTuning) -> Self {
        Self {
            pos: Vec2::new(x, tuning.start_y),
            size: FALLER_SIZE,
            start_y: tuning.start_y,
            fall_speed: tuning.fall_speed,
            elapsed: 0.0,
            urgency: 0.0,
            base_fall_speed: tuning.fall_speed,
            fall_acceleration: tuning.fall_acceleration,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    pub fn update(&mut self, dt: f32, ground_y: f32) {
        self.elapsed += dt;
        self.fall_speed = self.base_fall_speed * (1.0 + self.fall_acceleration * self.elapsed);

        let next_y = self.pos.y + self.fall_speed * dt;
        if next_y.is_finite() {
            self.pos.y = next_y;
        } else {
            let err = SimError::NonFinite { entity: "faller", id: 0 };
            log::warn!("{}; holding at y={}", err, self.pos.y);
        }

        let span = ground_y - self.start_y;
        self.urgency = if span > 0.0 {
            ((self.pos.y - self.start_y) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    /// Top edge has dropped below the bottom of the view
    pub fn has_left_view(&self, view_bottom: f32, margin: f32) -> bool {
        self.pos.y - self.size.y / 2.0 > view_bottom + margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GROUND_Y;

    #[test]
    fn test_fall_accelerates() {
        let mut f = Faller::new(0.0, &RescueTuning::default());
        f.update(1.0, GROUND_Y);
        let first = f.fall_speed;
        f.update(1.0, GROUND_Y);
        assert!(f.fall_speed > first);
        assert!(f.pos.y > f.start_y);
        assert!(f.urgency > 0.0 && f.urgency < 1.0);
    }

    #[test]
    fn test_leaves_view() {
        let mut f = Faller::new(0.0, &RescueTuning::default());
        assert!(!f.has_left_view(600.0, 50.0));
        f.pos.y = 720.0;
        assert!(f.has_left_view(600.0, 50.0));
    }
}
