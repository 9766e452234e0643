//! Spawn cursor
//!
//! Streams obstacles and collectibles ahead of the player. The frontier
//! only ever moves forward, and everything far enough behind the player
//! is culled, so the live entity count stays bounded.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Collectible, Obstacle, ObstacleKind, Symbol};
use crate::tuning::SpawnTuning;
use crate::{SimError, is_finite_vec};

/// How obstacle kinds are picked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum SpawnPolicy {
    /// Uniform over the configured kind set
    #[default]
    Uniform,
    /// Ground blocks only until `warmup_distance`, then `special_chance`
    /// of a uniform pick among the other configured kinds
    Staged {
        warmup_distance: f32,
        special_chance: f64,
    },
}

/// What one cursor update did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub obstacles_spawned: u32,
    pub collectibles_spawned: u32,
    pub culled: u32,
}

/// Where the next obstacle goes and what is currently alive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnCursor {
    /// High-water mark; `None` until the first update
    frontier: Option<f32>,
    /// Frontier at initialization (warm-up is measured from here)
    origin: f32,
    next_id: u32,
    /// Spawn order, which is also id order
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    /// New hazards spawn disarmed while set
    pub suppress_hazards: bool,
}

impl SpawnCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frontier(&self) -> Option<f32> {
        self.frontier
    }

    fn next_entity_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Advance the frontier, then cull what fell behind
    pub fn update<R: Rng>(
        &mut self,
        player_x: f32,
        ground_y: f32,
        tuning: &SpawnTuning,
        rng: &mut R,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();

        if !player_x.is_finite() {
            log::warn!("Spawn cursor got a non-finite player x; skipping update");
            return report;
        }
        if !(tuning.spacing > 0.0 && tuning.spacing.is_finite()) {
            log::warn!("Spawn spacing {} would stall the cursor; skipping", tuning.spacing);
            return report;
        }

        let mut frontier = match self.frontier {
            Some(f) => f,
            None => {
                self.origin = player_x;
                player_x
            }
        };

        while frontier < player_x + tuning.look_ahead {
            let slot_start = frontier;
            frontier += tuning.spacing;

            let kind = self.pick_kind(frontier, tuning, rng);
            self.spawn_obstacle(kind, frontier, ground_y, tuning, rng);
            report.obstacles_spawned += 1;

            if rng.random_bool(tuning.collectible_chance.clamp(0.0, 1.0)) {
                let symbol = Symbol::ALL[rng.random_range(0..Symbol::ALL.len())];
                let height = sample_band(tuning.collectible_band, rng);
                let pos = Vec2::new(slot_start + tuning.spacing / 2.0, ground_y - height);
                self.place_collectible(symbol, pos, tuning.collectible_size);
                report.collectibles_spawned += 1;
            }
        }
        self.frontier = Some(frontier);

        report.culled = self.cull(player_x - tuning.cull_distance);
        report
    }

    fn pick_kind<R: Rng>(&self, x: f32, tuning: &SpawnTuning, rng: &mut R) -> ObstacleKind {
        let kinds = &tuning.obstacle_kinds;
        match tuning.policy {
            SpawnPolicy::Uniform => {
                if kinds.is_empty() {
                    return ObstacleKind::GroundBlock;
                }
                kinds[rng.random_range(0..kinds.len())]
            }
            SpawnPolicy::Staged {
                warmup_distance,
                special_chance,
            } => {
                if x - self.origin < warmup_distance {
                    return ObstacleKind::GroundBlock;
                }
                let specials: Vec<ObstacleKind> = kinds
                    .iter()
                    .copied()
                    .filter(|k| *k != ObstacleKind::GroundBlock)
                    .collect();
                if specials.is_empty() || !rng.random_bool(special_chance.clamp(0.0, 1.0)) {
                    ObstacleKind::GroundBlock
                } else {
                    specials[rng.random_range(0..specials.len())]
                }
            }
        }
    }

    fn spawn_obstacle<R: Rng>(
        &mut self,
        kind: ObstacleKind,
        x: f32,
        ground_y: f32,
        tuning: &SpawnTuning,
        rng: &mut R,
    ) {
        let size = kind.size();
        let y = if kind.is_airborne() {
            ground_y - sample_band(tuning.airborne_band, rng)
        } else if kind == ObstacleKind::LowBar {
            // Bottom edge above a sliding player, below a standing one
            ground_y - tuning.low_bar_clearance - size.y / 2.0
        } else {
            ground_y - size.y / 2.0
        };

        let id = self.next_entity_id();
        let mut obstacle = Obstacle::new(id, kind, Vec2::new(x, y));
        if kind.is_hazard() && self.suppress_hazards {
            obstacle.active = false;
        }
        log::debug!("Spawned {:?} #{} at x={:.0}", kind, id, x);
        self.obstacles.push(obstacle);
    }

    /// Place a collectible at an explicit position. Returns its id.
    pub fn place_collectible(&mut self, symbol: Symbol, pos: Vec2, size: f32) -> u32 {
        let id = self.next_entity_id();
        self.collectibles.push(Collectible::new(id, symbol, pos, size));
        id
    }

    /// Drop entities behind `min_x` and collectibles already taken
    fn cull(&mut self, min_x: f32) -> u32 {
        let before = self.obstacles.len() + self.collectibles.len();
        let poisoned = self
            .obstacles
            .iter()
            .filter(|o| !is_finite_vec(o.pos))
            .map(|o| SimError::NonFinite { entity: "obstacle", id: o.id })
            .chain(
                self.collectibles
                    .iter()
                    .filter(|c| !is_finite_vec(c.pos))
                    .map(|c| SimError::NonFinite { entity: "collectible", id: c.id }),
            );
        for err in poisoned {
            log::warn!("{}; dropping it", err);
        }
        self.obstacles
            .retain(|o| o.pos.x.is_finite() && o.pos.x >= min_x);
        self.collectibles
            .retain(|c| !c.collected && c.pos.x.is_finite() && c.pos.x >= min_x);
        (before - self.obstacles.len() - self.collectibles.len()) as u32
    }

    /// Flag collectibles that passed fully behind `player_left` uncollected.
    /// Each one is reported once.
    pub fn mark_missed(&mut self, player_left: f32) -> Vec<u32> {
        self.collectibles
            .iter_mut()
            .filter(|c| !c.collected && !c.missed && c.bounds().max.x < player_left)
            .map(|c| {
                c.missed = true;
                c.id
            })
            .collect()
    }

    /// Arm or disarm every live hazard
    pub fn set_hazards_active(&mut self, active: bool) {
        self.suppress_hazards = !active;
        for obstacle in self.obstacles.iter_mut().filter(|o| o.kind.is_hazard()) {
            obstacle.active = active;
        }
    }

    /// Pull uncollected collectibles within `radius` toward `target`
    pub fn attract(&mut self, target: Vec2, radius: f32, pull_speed: f32, dt: f32) {
        for c in self.collectibles.iter_mut().filter(|c| !c.collected) {
            let to_target = target - c.pos;
            let dist = to_target.length();
            if dist > 0.0 && dist < radius {
                let step = (pull_speed * dt).min(dist);
                c.pos += to_target / dist * step;
            }
        }
    }
}

/// Uniform sample from an inclusive (min, max) band, tolerant of reversed bounds
fn sample_band<R: Rng>(band: (f32, f32), rng: &mut R) -> f32 {
    let (lo, hi) = if band.0 <= band.1 {
        band
    } else {
        (band.1, band.0)
    };
    if lo == hi || !lo.is_finite() || !hi.is_finite() {
        return lo;
    }
    rng.random_range(lo..=hi)
}
