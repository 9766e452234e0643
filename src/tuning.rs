//! Data-driven game balance
//!
//! Every number the simulation reads lives here so a host can ship JSON
//! overrides without a rebuild. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::SimError;
use crate::consts::*;
use crate::sim::{ObstacleKind, SpawnPolicy};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "Easy",
            DifficultyPreset::Normal => "Normal",
            DifficultyPreset::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" | "med" | "medium" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }

    /// Balance table for this preset
    pub fn tuning(&self) -> Tuning {
        let mut tuning = Tuning::default();
        tuning.apply_preset(*self);
        tuning
    }
}

/// Which antagonist flavour drives the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Pursuer chases from behind; caught = game over
    #[default]
    Chase,
    /// Faller drops ahead; reach the rescue point before it leaves the screen
    Rescue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub run_speed: f32,
    pub jump_impulse: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub max_slide: f32,
    /// Auto-run multiplier while the speed boost combo is active
    pub speed_boost_multiplier: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            run_speed: PLAYER_RUN_SPEED,
            jump_impulse: PLAYER_JUMP_IMPULSE,
            gravity: PLAYER_GRAVITY,
            max_fall_speed: PLAYER_MAX_FALL_SPEED,
            max_slide: PLAYER_MAX_SLIDE,
            speed_boost_multiplier: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Frontier is kept at least this far ahead of the player
    pub look_ahead: f32,
    /// Distance between consecutive spawn slots
    pub spacing: f32,
    /// Entities further than this behind the player are dropped
    pub cull_distance: f32,
    /// Chance that a spawn slot also receives a collectible
    pub collectible_chance: f64,
    pub collectible_size: f32,
    /// Collectible centre height above ground (min, max)
    pub collectible_band: (f32, f32),
    /// Airborne obstacle centre height above ground (min, max)
    pub airborne_band: (f32, f32),
    /// Gap between the ground and a low bar's bottom edge
    pub low_bar_clearance: f32,
    pub obstacle_kinds: Vec<ObstacleKind>,
    pub policy: SpawnPolicy,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            look_ahead: SPAWN_LOOK_AHEAD,
            spacing: SPAWN_SPACING,
            cull_distance: CULL_DISTANCE,
            collectible_chance: 0.35,
            collectible_size: 32.0,
            collectible_band: (50.0, 200.0),
            airborne_band: (100.0, 200.0),
            low_bar_clearance: LOW_BAR_CLEARANCE,
            obstacle_kinds: vec![
                ObstacleKind::GroundBlock,
                ObstacleKind::Bomb,
                ObstacleKind::AirBlock,
            ],
            policy: SpawnPolicy::Uniform,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuerTuning {
    pub width: f32,
    pub height: f32,
    /// Spawn offset behind the player
    pub start_behind: f32,
    pub base_speed: f32,
    pub max_speed: f32,
    pub target_distance: f32,
    pub min_distance: f32,
    pub rage_per_miss: f32,
    /// Escape time before the escape bonus kicks in
    pub escape_grace: f32,
    pub escape_rage_rate: f32,
    pub escape_rage_cap: f32,
    /// Escape time before chase distances start shrinking
    pub tighten_delay: f32,
    pub tighten_per_second: f32,
    pub tighten_per_miss: f32,
    /// min_distance trails target_distance by this much once tightening
    pub min_gap: f32,
    pub chase_gain: f32,
    pub brake_gain: f32,
    /// Floor speed as a fraction of base speed when braking
    pub floor_factor: f32,
    /// Share of global game speed added when catching is allowed / in grace
    pub game_speed_share: f32,
    pub grace_game_speed_share: f32,
}

impl Default for PursuerTuning {
    fn default() -> Self {
        Self {
            width: PURSUER_WIDTH,
            height: PURSUER_HEIGHT,
            start_behind: PURSUER_START_BEHIND,
            base_speed: PURSUER_BASE_SPEED,
            max_speed: PURSUER_MAX_SPEED,
            target_distance: PURSUER_TARGET_DISTANCE,
            min_distance: PURSUER_MIN_DISTANCE,
            rage_per_miss: RAGE_PER_MISS,
            escape_grace: 2.0,
            escape_rage_rate: 0.1,
            escape_rage_cap: 0.5,
            tighten_delay: 1.5,
            tighten_per_second: 60.0,
            tighten_per_miss: 45.0,
            min_gap: 25.0,
            chase_gain: 0.6,
            brake_gain: 0.5,
            floor_factor: 0.6,
            game_speed_share: 0.25,
            grace_game_speed_share: 0.15,
        }
    }
}

/// When the antagonist is allowed to end the run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraceTuning {
    /// Collections required before a catch can count
    pub catch_after_collections: u32,
    /// Grace after (re)start
    pub start_grace: f32,
    /// Grace after each collection
    pub collection_grace: f32,
    /// Invulnerability after a shield absorbs a catch
    pub hit_invulnerability: f32,
}

impl Default for GraceTuning {
    fn default() -> Self {
        Self {
            catch_after_collections: 2,
            start_grace: 3.0,
            collection_grace: 1.0,
            hit_invulnerability: 1.0,
        }
    }
}

/// Combo effect durations (seconds) and effect strengths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboTuning {
    /// Enables the 222 / 333 / 666 combos
    pub extended_combos: bool,
    pub protection: f32,
    pub speed_boost: f32,
    pub hazard_suppression: f32,
    /// Protection granted for surviving a full speed boost
    pub survival_protection: f32,
    pub double_jump: f32,
    pub slow_motion: f32,
    pub magnet: f32,
    pub slow_motion_scale: f32,
    pub magnet_radius: f32,
    pub magnet_pull_speed: f32,
}

impl Default for ComboTuning {
    fn default() -> Self {
        Self {
            extended_combos: false,
            protection: 6.0,
            speed_boost: 5.0,
            hazard_suppression: 4.0,
            survival_protection: 10.0,
            double_jump: 8.0,
            slow_motion: 5.0,
            magnet: 10.0,
            slow_motion_scale: 0.5,
            magnet_radius: 200.0,
            magnet_pull_speed: 400.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Player sits this far right of the camera origin
    pub follow_offset: f32,
    /// Look-ahead at the reference speed
    pub look_ahead: f32,
    pub max_look_ahead: f32,
    pub reference_speed: f32,
    pub damping: f32,
    pub reference_fps: f32,
    /// Camera origin never further than this behind the player
    pub max_lag: f32,
    /// Camera origin never closer than this behind the player
    pub min_lead: f32,
    pub follow_offset_y: f32,
    pub base_zoom: f32,
    pub zoom_smoothing: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            follow_offset: CAMERA_FOLLOW_OFFSET,
            look_ahead: 50.0,
            max_look_ahead: 100.0,
            reference_speed: PLAYER_RUN_SPEED,
            damping: CAMERA_DAMPING,
            reference_fps: CAMERA_REFERENCE_FPS,
            max_lag: 500.0,
            min_lead: 200.0,
            follow_offset_y: VIEWPORT_HEIGHT / 2.0,
            base_zoom: 0.8,
            zoom_smoothing: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RescueTuning {
    /// Distance from the start to the rescue point
    pub rescue_distance: f32,
    pub start_y: f32,
    pub fall_speed: f32,
    /// Fall speed grows by this fraction per second
    pub fall_acceleration: f32,
    pub reach_margin: f32,
    pub offscreen_margin: f32,
}

impl Default for RescueTuning {
    fn default() -> Self {
        Self {
            rescue_distance: 2500.0,
            start_y: -2400.0,
            fall_speed: 120.0,
            fall_acceleration: 0.1,
            reach_margin: 50.0,
            offscreen_margin: 50.0,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub preset: DifficultyPreset,
    pub mode: GameMode,
    pub ground_y: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub player: PlayerTuning,
    pub spawn: SpawnTuning,
    pub pursuer: PursuerTuning,
    pub grace: GraceTuning,
    pub combo: ComboTuning,
    pub camera: CameraTuning,
    pub rescue: RescueTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            preset: DifficultyPreset::Normal,
            mode: GameMode::Chase,
            ground_y: GROUND_Y,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            player: PlayerTuning::default(),
            spawn: SpawnTuning::default(),
            pursuer: PursuerTuning::default(),
            grace: GraceTuning::default(),
            combo: ComboTuning::default(),
            camera: CameraTuning::default(),
            rescue: RescueTuning::default(),
        }
    }
}

impl Tuning {
    /// Apply a difficulty preset on top of the current values
    pub fn apply_preset(&mut self, preset: DifficultyPreset) {
        self.preset = preset;
        match preset {
            DifficultyPreset::Easy => {
                self.pursuer.base_speed = 130.0;
                self.pursuer.rage_per_miss = 0.1;
                self.grace.catch_after_collections = 3;
                self.grace.start_grace = 5.0;
                self.spawn.spacing = 340.0;
                self.spawn.collectible_chance = 0.45;
            }
            DifficultyPreset::Normal => {}
            DifficultyPreset::Hard => {
                self.pursuer.base_speed = 170.0;
                self.pursuer.rage_per_miss = 0.2;
                self.grace.catch_after_collections = 1;
                self.grace.start_grace = 2.0;
                self.spawn.spacing = 260.0;
                self.spawn.collectible_chance = 0.25;
            }
        }
    }

    /// Parse and validate a JSON balance table
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tables that would stall the spawn cursor or blow up the integrators
    pub fn validate(&self) -> Result<(), SimError> {
        let finite = [
            self.ground_y,
            self.viewport_width,
            self.viewport_height,
            self.player.width,
            self.player.height,
            self.player.run_speed,
            self.player.jump_impulse,
            self.player.gravity,
            self.player.max_fall_speed,
            self.pursuer.base_speed,
            self.pursuer.max_speed,
            self.camera.damping,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(SimError::Config("non-finite value".into()));
        }
        if self.spawn.spacing <= 0.0 || !self.spawn.spacing.is_finite() {
            return Err(SimError::Config(format!(
                "spawn spacing must be positive, got {}",
                self.spawn.spacing
            )));
        }
        if self.spawn.look_ahead <= 0.0 || !self.spawn.look_ahead.is_finite() {
            return Err(SimError::Config("spawn look-ahead must be positive".into()));
        }
        if self.spawn.cull_distance <= 0.0 {
            return Err(SimError::Config("cull distance must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.spawn.collectible_chance) {
            return Err(SimError::Config("collectible chance must be in [0, 1]".into()));
        }
        if self.spawn.obstacle_kinds.is_empty() {
            return Err(SimError::Config("obstacle kind set is empty".into()));
        }
        if self.player.run_speed <= 0.0 {
            return Err(SimError::Config("run speed must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.camera.damping) {
            return Err(SimError::Config("camera damping must be in [0, 1]".into()));
        }
        if self.camera.min_lead > self.camera.max_lag {
            return Err(SimError::Config("camera min_lead exceeds max_lag".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_round_trip_names() {
        for preset in [DifficultyPreset::Easy, DifficultyPreset::Normal, DifficultyPreset::Hard] {
            assert_eq!(DifficultyPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(DifficultyPreset::from_str("nightmare"), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "spawn": { "spacing": 250.0 } }"#).unwrap();
        assert_eq!(tuning.spawn.spacing, 250.0);
        assert_eq!(tuning.spawn.look_ahead, SPAWN_LOOK_AHEAD);
        assert_eq!(tuning.player.run_speed, PLAYER_RUN_SPEED);
    }

    #[test]
    fn test_rejects_zero_spacing() {
        let err = Tuning::from_json(r#"{ "spawn": { "spacing": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_rejects_empty_kind_set() {
        let mut tuning = Tuning::default();
        tuning.spawn.obstacle_kinds.clear();
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_hard_is_harsher() {
        let hard = DifficultyPreset::Hard.tuning();
        let normal = DifficultyPreset::Normal.tuning();
        assert!(hard.pursuer.base_speed > normal.pursuer.base_speed);
        assert!(hard.spawn.spacing < normal.spawn.spacing);
        assert_eq!(hard.preset, DifficultyPreset::Hard);
    }
}
