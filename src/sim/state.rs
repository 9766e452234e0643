//! Game state and core simulation types
//!
//! The whole world lives in one `GameState`; the tick is the only writer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::FollowCamera;
use super::collision::Aabb;
use super::combo::{ComboEffect, ComboSystem};
use super::faller::Faller;
use super::player::Player;
use super::pursuer::Pursuer;
use super::spawner::SpawnCursor;
use crate::SimError;
use crate::consts::*;
use crate::tuning::{GameMode, Tuning};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start signal
    Ready,
    /// Active gameplay
    Running,
    /// Run ended; the final frame stays frozen until restart
    GameOver,
    /// Rescue mode won
    Rescued,
}

/// Collectible symbol alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Two,
    Three,
    Five,
    Six,
}

impl Symbol {
    pub const ALL: [Symbol; 4] = [Symbol::Two, Symbol::Three, Symbol::Five, Symbol::Six];

    pub fn value(self) -> u8 {
        match self {
            Symbol::Two => 2,
            Symbol::Three => 3,
            Symbol::Five => 5,
            Symbol::Six => 6,
        }
    }
}

impl TryFrom<u8> for Symbol {
    type Error = SimError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Symbol::Two),
            3 => Ok(Symbol::Three),
            5 => Ok(Symbol::Five),
            6 => Ok(Symbol::Six),
            other => Err(SimError::InvalidSymbol(other)),
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    GroundBlock,
    AirBlock,
    /// Hazard: the only kind hazard suppression disarms
    Bomb,
    Wall,
    /// Hangs at head height; slide under it
    LowBar,
    Platform,
    Ramp,
    /// Marks a gap for the renderer; never collides
    GapMarker,
}

impl ObstacleKind {
    /// Full box extents
    pub fn size(self) -> Vec2 {
        match self {
            ObstacleKind::GroundBlock | ObstacleKind::AirBlock => Vec2::new(40.0, 40.0),
            ObstacleKind::Bomb => Vec2::new(30.0, 30.0),
            ObstacleKind::Wall => Vec2::new(30.0, 70.0),
            ObstacleKind::LowBar => Vec2::new(60.0, 20.0),
            ObstacleKind::Platform => Vec2::new(120.0, 20.0),
            ObstacleKind::Ramp => Vec2::new(60.0, 25.0),
            ObstacleKind::GapMarker => Vec2::new(80.0, 10.0),
        }
    }

    /// Airborne kinds get a randomized height band
    pub fn is_airborne(self) -> bool {
        matches!(self, ObstacleKind::AirBlock | ObstacleKind::Platform)
    }

    pub fn is_hazard(self) -> bool {
        self == ObstacleKind::Bomb
    }
}

/// An obstacle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Box centre
    pub pos: Vec2,
    pub size: Vec2,
    /// Inactive obstacles are drawn dimmed and never collide
    pub active: bool,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size: kind.size(),
            active: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

/// A collectible symbol cube
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub symbol: Symbol,
    pub pos: Vec2,
    pub size: f32,
    /// Set once, never cleared
    pub collected: bool,
    /// Passed behind the player uncollected
    pub missed: bool,
}

impl Collectible {
    pub fn new(id: u32, symbol: Symbol, pos: Vec2, size: f32) -> Self {
        Self {
            id,
            symbol,
            pos,
            size,
            collected: false,
            missed: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.size))
    }

    /// Mark as collected. Returns true only on the first call.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}

/// The antagonist for this session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Antagonist {
    Pursuer(Pursuer),
    Faller(Faller),
}

impl Antagonist {
    pub fn pos(&self) -> Vec2 {
        match self {
            Antagonist::Pursuer(p) => p.pos,
            Antagonist::Faller(f) => f.pos,
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            Antagonist::Pursuer(p) => p.bounds(),
            Antagonist::Faller(f) => f.bounds(),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    HitObstacle,
    Caught,
    /// Faller dropped out of view
    FallerLost,
    Rescued,
}

/// Handed to the persistence sink when a run ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub final_score: u64,
    pub distance_traveled: f32,
    pub collections: u32,
    pub perfect_timings: u32,
    /// Seconds of gameplay
    pub elapsed: f32,
    pub new_high_score: bool,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Jumped,
    Landed,
    SlideStarted,
    PerfectTiming,
    Collected { id: u32, symbol: Symbol },
    Missed { id: u32 },
    ComboMatched(ComboEffect),
    ComboFailed,
    EffectCancelled(ComboEffect),
    EffectEnded(ComboEffect),
    ShieldConsumed,
    /// A speed boost ran its full course and chained into Protection
    BoostSurvived,
    ObstacleHit { id: u32, kind: ObstacleKind },
    GameOver(RunSummary),
    Rescued(RunSummary),
    RestartRequested,
    Restarted,
}

/// A collectible scheduled to appear after a delay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingDrop {
    /// Seconds until it appears
    pub delay: f32,
    /// Placed this far ahead of the player
    pub ahead: f32,
    /// Centre height above ground
    pub height: f32,
    pub symbol: Symbol,
}

/// Starter collectibles: a 2 then a 3, so the first combo is within reach
pub fn starter_drops() -> Vec<PendingDrop> {
    vec![
        PendingDrop {
            delay: 1.0,
            ahead: 400.0,
            height: 110.0,
            symbol: Symbol::Two,
        },
        PendingDrop {
            delay: 2.0,
            ahead: 700.0,
            height: 110.0,
            symbol: Symbol::Three,
        },
    ]
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Seconds of gameplay this run
    pub time: f32,
    pub time_ticks: u64,
    pub player: Player,
    pub antagonist: Antagonist,
    pub spawner: SpawnCursor,
    pub combo: ComboSystem,
    pub camera: FollowCamera,
    /// World scroll speed handed to the antagonist
    pub game_speed: f32,
    pub score: u64,
    /// Best score known to the host, shown but never stored here
    pub high_score: u64,
    pub collections: u32,
    /// Collectibles missed since the last collection
    pub missed: u32,
    pub time_since_collection: f32,
    /// Antagonist cannot catch while this is positive
    pub grace_timer: f32,
    /// Post-shield invulnerability
    pub invulnerable_timer: f32,
    pub pending_drops: Vec<PendingDrop>,
    pub summary: Option<RunSummary>,
    pub(crate) rng: Pcg32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let ground_y = tuning.ground_y;
        let player = Player::new(PLAYER_START_X, ground_y, &tuning.player);
        let antagonist = match tuning.mode {
            GameMode::Chase => Antagonist::Pursuer(Pursuer::new(
                PLAYER_START_X - tuning.pursuer.start_behind,
                ground_y,
                &tuning.pursuer,
            )),
            GameMode::Rescue => Antagonist::Faller(Faller::new(
                PLAYER_START_X + tuning.rescue.rescue_distance,
                &tuning.rescue,
            )),
        };
        let camera = FollowCamera::new(player.pos, player.speed(), &tuning.camera);
        let combo = ComboSystem::new(tuning.combo.clone());

        Self {
            seed,
            phase: GamePhase::Ready,
            time: 0.0,
            time_ticks: 0,
            game_speed: player.speed(),
            player,
            antagonist,
            spawner: SpawnCursor::new(),
            combo,
            camera,
            score: 0,
            high_score: 0,
            collections: 0,
            missed: 0,
            time_since_collection: 0.0,
            grace_timer: tuning.grace.start_grace,
            invulnerable_timer: 0.0,
            pending_drops: starter_drops(),
            summary: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            tuning,
        }
    }

    /// Seed the displayed best score from the host's storage
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    /// Replace every owned entity in one step.
    ///
    /// Tuning, the known high score and undrained events survive; the new
    /// run starts directly in `Running`.
    pub fn restart(&mut self, seed: u64) {
        let tuning = self.tuning.clone();
        let high_score = self.high_score;
        let events = std::mem::take(&mut self.events);

        *self = GameState::with_tuning(seed, tuning).with_high_score(high_score);
        self.events = events;
        self.phase = GamePhase::Running;
        log::info!("Run restarted with seed {}", seed);
    }

    /// Seed for the next run, derived so replays stay reproducible
    pub fn next_seed(&self) -> u64 {
        self.seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver | GamePhase::Rescued)
    }

    /// Distance covered since the start line
    pub fn distance(&self) -> f32 {
        (self.player.pos.x - PLAYER_START_X).max(0.0)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
