//! Latched input for event-driven hosts
//!
//! Key events arrive between frames; the latch remembers a press until
//! the next tick reads it, so a tap shorter than a frame is never lost.

use serde::{Deserialize, Serialize};

use super::InputSignals;

/// One button: level plus a self-clearing edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyLatch {
    down: bool,
    pressed_edge: bool,
}

impl KeyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Auto-repeat while held does not re-trigger the edge.
    pub fn press(&mut self) {
        if !self.down {
            self.pressed_edge = true;
        }
        self.down = true;
    }

    pub fn release(&mut self) {
        self.down = false;
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    /// Read and clear the edge
    pub fn take_pressed(&mut self) -> bool {
        std::mem::take(&mut self.pressed_edge)
    }
}

/// Jump and slide latches plus a restart request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatchedInput {
    pub jump: KeyLatch,
    pub slide: KeyLatch,
    restart: bool,
}

impl LatchedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_restart(&mut self) {
        self.restart = true;
    }

    /// Drop all held state (focus lost, tab hidden)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl InputSignals for LatchedInput {
    fn is_jump_pressed(&self) -> bool {
        self.jump.is_down()
    }

    fn take_jump_just_pressed(&mut self) -> bool {
        self.jump.take_pressed()
    }

    fn is_slide_pressed(&self) -> bool {
        self.slide.is_down()
    }

    fn take_slide_just_pressed(&mut self) -> bool {
        self.slide.take_pressed()
    }

    fn take_restart_requested(&mut self) -> bool {
        std::mem::take(&mut self.restart)
    }
}
