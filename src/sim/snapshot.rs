//! Read-only render view
//!
//! Everything a renderer needs after a tick, flattened into plain data so
//! it can cross the wasm boundary as JSON.

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::player::PlayerState;
use super::state::{Antagonist, GamePhase, GameState, ObstacleKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub state: PlayerState,
    pub bounds: Aabb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AntagonistView {
    Pursuer { x: f32, y: f32, rage: f32, bounds: Aabb },
    Faller { x: f32, y: f32, urgency: f32, bounds: Aabb },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub active: bool,
    pub bounds: Aabb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleView {
    pub id: u32,
    pub value: u8,
    pub x: f32,
    pub y: f32,
    pub bounds: Aabb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraView {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub tag: String,
    pub remaining_fraction: f32,
}

/// One frame's worth of drawable state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub player: PlayerView,
    pub antagonist: AntagonistView,
    pub obstacles: Vec<ObstacleView>,
    pub collectibles: Vec<CollectibleView>,
    pub camera: CameraView,
    pub effect: Option<EffectView>,
    pub combo_buffer: Vec<u8>,
    pub score: u64,
    pub high_score: u64,
    pub distance: f32,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        let antagonist = match &state.antagonist {
            Antagonist::Pursuer(p) => AntagonistView::Pursuer {
                x: p.pos.x,
                y: p.pos.y,
                rage: p.rage,
                bounds: p.bounds(),
            },
            Antagonist::Faller(f) => AntagonistView::Faller {
                x: f.pos.x,
                y: f.pos.y,
                urgency: f.urgency,
                bounds: f.bounds(),
            },
        };

        // Skip anything a runaway calculation has poisoned
        let obstacles = state
            .spawner
            .obstacles
            .iter()
            .filter(|o| crate::is_finite_vec(o.pos))
            .map(|o| ObstacleView {
                id: o.id,
                kind: o.kind,
                x: o.pos.x,
                y: o.pos.y,
                active: o.active,
                bounds: o.bounds(),
            })
            .collect();
        let collectibles = state
            .spawner
            .collectibles
            .iter()
            .filter(|c| !c.collected && crate::is_finite_vec(c.pos))
            .map(|c| CollectibleView {
                id: c.id,
                value: c.symbol.value(),
                x: c.pos.x,
                y: c.pos.y,
                bounds: c.bounds(),
            })
            .collect();

        Self {
            phase: state.phase,
            player: PlayerView {
                x: player.pos.x,
                y: player.pos.y,
                state: player.state,
                bounds: player.bounds(),
            },
            antagonist,
            obstacles,
            collectibles,
            camera: CameraView {
                x: state.camera.pos.x,
                y: state.camera.pos.y,
                zoom: state.camera.zoom,
            },
            effect: state.combo.active().map(|a| EffectView {
                tag: a.effect.name().to_string(),
                remaining_fraction: a.remaining_fraction(),
            }),
            combo_buffer: state.combo.buffer().iter().map(|s| s.value()).collect(),
            score: state.score,
            high_score: state.high_score,
            distance: state.distance(),
        }
    }

    pub fn to_json(&self) -> Result<String, crate::SimError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::combo::ComboEffect;
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_capture_reflects_state() {
        let mut state = GameState::new(3);
        state.phase = GamePhase::Running;
        tick(&mut state, &TickInput::default(), 1.0 / 60.0);
        state.combo.activate(ComboEffect::Protection);

        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.phase, GamePhase::Running);
        assert_eq!(snap.obstacles.len(), state.spawner.obstacles.len());
        assert_eq!(snap.player.x, state.player.pos.x);
        let effect = snap.effect.unwrap();
        assert_eq!(effect.tag, "PROTECTION_232");
        assert_eq!(effect.remaining_fraction, 1.0);
        assert!(matches!(snap.antagonist, AntagonistView::Pursuer { .. }));
    }

    #[test]
    fn test_json_is_tagged() {
        let snap = RenderSnapshot::capture(&GameState::new(1));
        let json = snap.to_json().unwrap();
        assert!(json.contains(r#""kind":"Pursuer""#));
    }
}
