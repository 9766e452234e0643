//! Platform abstraction layer
//!
//! The core never sees raw key codes. Hosts (browser, native demo, tests)
//! translate their own events into the boolean signals below.

pub mod input;

pub use input::{KeyLatch, LatchedInput};

/// Boolean input signals consumed once per tick
pub trait InputSignals {
    /// Jump held (level-triggered)
    fn is_jump_pressed(&self) -> bool;
    /// Jump went down since the last read; reading clears it
    fn take_jump_just_pressed(&mut self) -> bool;
    fn is_slide_pressed(&self) -> bool;
    fn take_slide_just_pressed(&mut self) -> bool;
    /// Host asked for a new run; reading clears it
    fn take_restart_requested(&mut self) -> bool;
}
