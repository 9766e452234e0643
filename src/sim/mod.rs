//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order = entity ID order)
//! - Timers are countdown scalars advanced by the tick, never callbacks
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod combo;
pub mod faller;
pub mod player;
pub mod pursuer;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use camera::{FollowCamera, damping_factor};
pub use collision::{Aabb, ContactOutcome, check_collision, collect_first, first_obstacle_hit};
pub use combo::{ActiveEffect, COMBO_LENGTH, ComboEffect, ComboOutcome, ComboSystem, match_combo};
pub use faller::Faller;
pub use player::{Player, PlayerState, PlayerStep};
pub use pursuer::{ChaseInput, Pursuer};
pub use snapshot::RenderSnapshot;
pub use spawner::{SpawnCursor, SpawnPolicy, SpawnReport};
pub use state::{
    Antagonist, Collectible, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind,
    PendingDrop, RunOutcome, RunSummary, Symbol,
};
pub use tick::{TickInput, catch_allowed, tick};
