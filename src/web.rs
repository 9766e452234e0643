//! Browser facade
//!
//! A thin wasm-bindgen wrapper: JS owns the animation-frame loop, key
//! listeners and storage, and calls in here once per frame.

use wasm_bindgen::prelude::*;

use crate::persistence::SaveData;
use crate::platform::LatchedInput;
use crate::sim::{GameEvent, GameState, RenderSnapshot, TickInput, tick};
use crate::tuning::{DifficultyPreset, GameMode, Tuning};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Hunt Runner starting...");
}

fn to_js(e: crate::SimError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Game instance held by the page
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    input: LatchedInput,
    save: SaveData,
    autopilot: bool,
}

impl WebGame {
    fn with_tuning(tuning: Tuning, mut save: SaveData) -> WebGame {
        save.preset = tuning.preset;
        let seed = js_sys::Date::now() as u64;
        let state = GameState::with_tuning(seed, tuning).with_high_score(save.high_score());
        WebGame {
            state,
            input: LatchedInput::new(),
            save,
            autopilot: false,
        }
    }
}

#[wasm_bindgen]
impl WebGame {
    /// `save_json` is whatever `save_json()` returned last session
    #[wasm_bindgen(constructor)]
    pub fn new(preset: &str, rescue: bool, save_json: Option<String>) -> WebGame {
        let save = SaveData::load_or_default(save_json.as_deref());
        let preset = DifficultyPreset::from_str(preset).unwrap_or(save.preset);
        let mut tuning = preset.tuning();
        if rescue {
            tuning.mode = GameMode::Rescue;
        }
        Self::with_tuning(tuning, save)
    }

    /// Start from a JSON balance table instead of a preset
    pub fn from_tuning_json(json: &str, save_json: Option<String>) -> Result<WebGame, JsValue> {
        let tuning = Tuning::from_json(json).map_err(to_js)?;
        Ok(Self::with_tuning(tuning, SaveData::load_or_default(save_json.as_deref())))
    }

    pub fn key_down(&mut self, code: &str) {
        match code {
            "Space" | "ArrowUp" | "KeyW" => self.input.jump.press(),
            "ArrowDown" | "KeyS" => self.input.slide.press(),
            "KeyR" => self.input.request_restart(),
            _ => {}
        }
    }

    pub fn key_up(&mut self, code: &str) {
        match code {
            "Space" | "ArrowUp" | "KeyW" => self.input.jump.release(),
            "ArrowDown" | "KeyS" => self.input.slide.release(),
            _ => {}
        }
    }

    /// Tab hidden or focus lost
    pub fn blur(&mut self) {
        self.input.clear();
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
    }

    /// Advance one frame. Returns the frame's events as JSON.
    pub fn frame(&mut self, dt_seconds: f32) -> Result<String, JsValue> {
        let mut input = TickInput::from_signals(&mut self.input);
        input.autopilot = self.autopilot;
        tick(&mut self.state, &input, dt_seconds);

        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::GameOver(summary) | GameEvent::Rescued(summary) = event {
                if let Some(rank) = self.save.record_run(summary, js_sys::Date::now()) {
                    log::info!("New leaderboard entry at #{}", rank);
                }
            }
        }
        serde_json::to_string(&events).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        RenderSnapshot::capture(&self.state).to_json().map_err(to_js)
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Versioned save for the page to put in LocalStorage
    pub fn save_json(&self) -> Result<String, JsValue> {
        self.save.to_json().map_err(to_js)
    }

    /// Leaderboard rows as JSON, with relative dates
    pub fn high_scores_json(&self) -> Result<String, JsValue> {
        let rows: Vec<(u64, f32, String)> = self
            .save
            .high_scores
            .entries
            .iter()
            .map(|e| (e.score, e.distance, crate::highscores::format_date(e.timestamp)))
            .collect();
        serde_json::to_string(&rows).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
