//! Collision detection for axis-aligned boxes
//!
//! Every actor in the runner is a box. The interesting part is policy, not
//! geometry: at most one collectible per tick, gap markers never hit, and
//! antagonist contact can be absorbed by a shield.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Collectible, Obstacle, ObstacleKind};

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box centred on `center` with full extents `size`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn is_finite(&self) -> bool {
        crate::is_finite_vec(self.min) && crate::is_finite_vec(self.max)
    }

    /// Strict overlap on both axes (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Pure overlap test between two boxes.
///
/// Non-finite boxes never collide; the offending entity is skipped rather
/// than poisoning the result.
pub fn check_collision(a: &Aabb, b: &Aabb) -> bool {
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    a.overlaps(b)
}

/// Whether touching an obstacle of this kind ends the run
pub fn obstacle_is_solid(kind: ObstacleKind) -> bool {
    match kind {
        ObstacleKind::GapMarker => false,
        ObstacleKind::GroundBlock
        | ObstacleKind::AirBlock
        | ObstacleKind::Bomb
        | ObstacleKind::Wall
        | ObstacleKind::LowBar
        | ObstacleKind::Platform
        | ObstacleKind::Ramp => true,
    }
}

/// First active, solid obstacle the player overlaps (iteration order)
pub fn first_obstacle_hit<'a>(player: &Aabb, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .filter(|o| o.active && obstacle_is_solid(o.kind))
        .find(|o| check_collision(player, &o.bounds()))
}

/// Collect at most one collectible this tick.
///
/// Returns the index of the newly collected item. Already-collected items
/// are skipped, so calling this again never re-reports the same one.
pub fn collect_first(player: &Aabb, collectibles: &mut [Collectible]) -> Option<usize> {
    let index = collectibles
        .iter()
        .position(|c| !c.collected && check_collision(player, &c.bounds()))?;
    collectibles[index].collect().then_some(index)
}

/// What antagonist contact means this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// No overlap, catching not yet allowed, or player is invulnerable
    Ignored,
    /// Protection absorbed the catch
    ShieldAbsorbed,
    /// Player is caught
    Fatal,
}

/// Decide the outcome of antagonist vs player contact
pub fn resolve_antagonist_contact(
    overlapping: bool,
    allow_catch: bool,
    protected: bool,
    invulnerable: bool,
) -> ContactOutcome {
    if !overlapping || !allow_catch || invulnerable {
        ContactOutcome::Ignored
    } else if protected {
        ContactOutcome::ShieldAbsorbed
    } else {
        ContactOutcome::Fatal
    }
}
