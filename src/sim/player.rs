//! Player physics: auto-run, jump, slide, ground clamp
//!
//! Horizontal speed is never under player control. Input only decides
//! when to jump or slide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::tick::TickInput;
use crate::consts::{PERFECT_IDLE_WINDOW, PERFECT_TIMING_WINDOW};
use crate::SimError;
use crate::is_finite_vec;
use crate::tuning::PlayerTuning;

/// Player movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Running,
    Jumping,
    Falling,
    Sliding,
    Dead,
}

/// What the player did during one update (for events and VFX collaborators)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStep {
    pub jumped: bool,
    pub landed: bool,
    pub slid: bool,
    /// The action this tick landed inside the perfect timing window
    pub perfect: bool,
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Box centre
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub state: PlayerState,
    pub grounded: bool,
    pub sliding: bool,
    /// Seconds spent in the current slide
    pub slide_timer: f32,
    pub base_speed: f32,
    /// Applied on top of base speed (speed boost combo)
    pub speed_multiplier: f32,
    /// Extra airborne jump available while the double-jump combo is active
    pub double_jump: bool,
    air_jump_used: bool,
    /// Cleared by a jump, re-armed on landing
    jump_armed: bool,
    jump_impulse: f32,
    gravity: f32,
    max_fall_speed: f32,
    max_slide: f32,
    /// Local clock for timing bookkeeping
    pub clock: f32,
    pub last_action_time: f32,
    pub last_action_perfect: bool,
    pub perfect_timings: u32,
    /// Grounded and idle for longer than half a second
    pub hesitation_time: f32,
}

impl Player {
    /// Spawn standing on the ground at `x`
    pub fn new(x: f32, ground_y: f32, tuning: &PlayerTuning) -> Self {
        let size = Vec2::new(tuning.width, tuning.height);
        Self {
            pos: Vec2::new(x, ground_y - size.y / 2.0),
            vel: Vec2::new(tuning.run_speed, 0.0),
            size,
            state: PlayerState::Running,
            grounded: true,
            sliding: false,
            slide_timer: 0.0,
            base_speed: tuning.run_speed,
            speed_multiplier: 1.0,
            double_jump: false,
            air_jump_used: false,
            jump_armed: true,
            jump_impulse: tuning.jump_impulse,
            gravity: tuning.gravity,
            max_fall_speed: tuning.max_fall_speed,
            max_slide: tuning.max_slide,
            clock: 0.0,
            last_action_time: 0.0,
            last_action_perfect: false,
            perfect_timings: 0,
            hesitation_time: 0.0,
        }
    }

    /// Current forward speed
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.x
    }

    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    /// Collision box; half height while sliding, still standing on the ground
    pub fn bounds(&self) -> Aabb {
        if self.sliding {
            let size = Vec2::new(self.size.x, self.size.y * 0.5);
            let center = Vec2::new(self.pos.x, self.pos.y + self.size.y * 0.25);
            Aabb::from_center(center, size)
        } else {
            Aabb::from_center(self.pos, self.size)
        }
    }

    /// Terminal until the session restarts
    pub fn kill(&mut self) {
        self.vel = Vec2::ZERO;
        self.sliding = false;
        self.state = PlayerState::Dead;
    }

    /// Advance one tick
    pub fn update(&mut self, dt: f32, ground_y: f32, input: &TickInput) -> PlayerStep {
        self.clock += dt;
        if self.is_dead() {
            self.vel = Vec2::ZERO;
            return PlayerStep::default();
        }

        let mut step = self.handle_input(input);

        let prev_pos = self.pos;
        let prev_vel = self.vel;
        step.landed = self.integrate(dt, ground_y);

        if !is_finite_vec(self.pos) || !is_finite_vec(self.vel) {
            let err = SimError::NonFinite { entity: "player", id: 0 };
            log::warn!("{} ({:?}, {:?}); reverting", err, self.pos, self.vel);
            self.pos = prev_pos;
            self.vel = Vec2::new(prev_vel.x, 0.0);
        }

        self.refresh_state();
        step
    }

    fn handle_input(&mut self, input: &TickInput) -> PlayerStep {
        let mut step = PlayerStep::default();
        // Edge only: holding jump through a landing does not hop again
        if input.jump_just_pressed && self.grounded && !self.sliding && self.jump_armed {
            step.perfect = self.jump();
            step.jumped = true;
        } else if input.jump_just_pressed
            && !self.grounded
            && self.double_jump
            && !self.air_jump_used
        {
            self.air_jump_used = true;
            step.perfect = self.jump();
            step.jumped = true;
        }

        if input.slide_just_pressed && self.grounded && !self.sliding && !step.jumped {
            step.perfect = self.slide();
            step.slid = true;
        } else if self.sliding && !input.slide_pressed && !input.slide_just_pressed {
            self.end_slide();
        }

        step
    }

    /// Record an action for timing bookkeeping. Returns whether it was perfect.
    fn record_action(&mut self) -> bool {
        let gap = self.clock - self.last_action_time;
        let perfect = gap < PERFECT_TIMING_WINDOW || gap > PERFECT_IDLE_WINDOW;
        self.last_action_perfect = perfect;
        if perfect {
            self.perfect_timings += 1;
        }
        self.last_action_time = self.clock;
        self.hesitation_time = 0.0;
        perfect
    }

    fn jump(&mut self) -> bool {
        let perfect = self.record_action();
        self.vel.y = self.jump_impulse;
        self.grounded = false;
        self.jump_armed = false;
        self.state = PlayerState::Jumping;
        perfect
    }

    fn slide(&mut self) -> bool {
        let perfect = self.record_action();
        self.sliding = true;
        self.slide_timer = 0.0;
        self.state = PlayerState::Sliding;
        perfect
    }

    fn end_slide(&mut self) {
        self.sliding = false;
        self.slide_timer = 0.0;
    }

    /// Gravity, auto-run and ground clamp. Returns true on touchdown.
    fn integrate(&mut self, dt: f32, ground_y: f32) -> bool {
        self.vel.x = self.base_speed * self.speed_multiplier;

        if !self.grounded {
            self.vel.y += self.gravity * dt;
        }
        self.vel.y = self.vel.y.min(self.max_fall_speed);

        self.pos += self.vel * dt;

        let ground_level = ground_y - self.size.y / 2.0;
        let mut landed = false;
        if self.pos.y >= ground_level && self.vel.y >= 0.0 {
            landed = !self.grounded;
            self.pos.y = ground_level;
            self.vel.y = 0.0;
            self.grounded = true;
            if landed {
                self.jump_armed = true;
                self.air_jump_used = false;
            }
        } else {
            // Rising off the ground line
            self.pos.y = self.pos.y.min(ground_level);
            self.grounded = false;
        }

        if self.sliding {
            self.slide_timer += dt;
            if self.slide_timer >= self.max_slide {
                self.end_slide();
            }
        }

        if self.grounded && !self.sliding && self.clock - self.last_action_time > 0.5 {
            self.hesitation_time += dt;
        } else {
            self.hesitation_time = 0.0;
        }

        landed
    }

    fn refresh_state(&mut self) {
        self.state = if !self.grounded {
            if self.vel.y < 0.0 {
                PlayerState::Jumping
            } else {
                PlayerState::Falling
            }
        } else if self.sliding {
            PlayerState::Sliding
        } else {
            PlayerState::Running
        };
    }
}
