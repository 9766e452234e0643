//! Combo / power-up state machine
//!
//! Collected symbols go into a three-slot buffer. A full buffer is matched
//! against the combo table and cleared either way. Collecting anything
//! while an effect runs cancels that effect.

use serde::{Deserialize, Serialize};

use super::state::Symbol;
use crate::SimError;
use crate::tuning::ComboTuning;

/// Symbols needed for a match
pub const COMBO_LENGTH: usize = 3;

/// Time-boxed effects a combo can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComboEffect {
    /// One-shot shield against the antagonist; obstacles are ignored while it lasts
    Protection,
    /// Auto-run multiplied; surviving it earns a long Protection
    SpeedBoost,
    /// Hazards disarmed, then all re-armed at once on expiry
    HazardSuppression,
    DoubleJump,
    SlowMotion,
    Magnet,
}

impl ComboEffect {
    pub const ALL: [ComboEffect; 6] = [
        ComboEffect::Protection,
        ComboEffect::SpeedBoost,
        ComboEffect::HazardSuppression,
        ComboEffect::DoubleJump,
        ComboEffect::SlowMotion,
        ComboEffect::Magnet,
    ];

    /// Host-facing name
    pub fn name(self) -> &'static str {
        match self {
            ComboEffect::Protection => "PROTECTION_232",
            ComboEffect::SpeedBoost => "SPEED_636",
            ComboEffect::HazardSuppression => "DANGEROUS_555",
            ComboEffect::DoubleJump => "DOUBLE_JUMP_222",
            ComboEffect::SlowMotion => "SLOW_MOTION_333",
            ComboEffect::Magnet => "MAGNET_666",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }

    /// The triple that triggers this effect
    pub fn sequence(self) -> [Symbol; COMBO_LENGTH] {
        use Symbol::*;
        match self {
            ComboEffect::Protection => [Two, Three, Two],
            ComboEffect::SpeedBoost => [Six, Three, Six],
            ComboEffect::HazardSuppression => [Five, Five, Five],
            ComboEffect::DoubleJump => [Two, Two, Two],
            ComboEffect::SlowMotion => [Three, Three, Three],
            ComboEffect::Magnet => [Six, Six, Six],
        }
    }

    /// Only in the table when extended combos are enabled
    pub fn is_extended(self) -> bool {
        matches!(
            self,
            ComboEffect::DoubleJump | ComboEffect::SlowMotion | ComboEffect::Magnet
        )
    }

    pub fn duration(self, tuning: &ComboTuning) -> f32 {
        match self {
            ComboEffect::Protection => tuning.protection,
            ComboEffect::SpeedBoost => tuning.speed_boost,
            ComboEffect::HazardSuppression => tuning.hazard_suppression,
            ComboEffect::DoubleJump => tuning.double_jump,
            ComboEffect::SlowMotion => tuning.slow_motion,
            ComboEffect::Magnet => tuning.magnet,
        }
    }
}

/// Look a full buffer up in the combo table (exact order)
pub fn match_combo(symbols: &[Symbol], extended: bool) -> Option<ComboEffect> {
    ComboEffect::ALL
        .into_iter()
        .filter(|e| extended || !e.is_extended())
        .find(|e| e.sequence().as_slice() == symbols)
}

/// The running effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub effect: ComboEffect,
    pub remaining: f32,
    pub duration: f32,
}

impl ActiveEffect {
    /// 1 at activation, 0 at expiry
    pub fn remaining_fraction(&self) -> f32 {
        if self.duration > 0.0 {
            (self.remaining / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Result of adding one symbol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComboOutcome {
    /// Effect that was running and got cancelled by this collection
    pub cancelled: Option<ComboEffect>,
    /// Effect activated by completing a triple
    pub matched: Option<ComboEffect>,
    /// Buffer filled without matching anything
    pub failed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboSystem {
    buffer: Vec<Symbol>,
    active: Option<ActiveEffect>,
    /// Set when a speed boost ran its full course
    survived_boost: bool,
    tuning: ComboTuning,
}

impl ComboSystem {
    pub fn new(tuning: ComboTuning) -> Self {
        Self {
            buffer: Vec::with_capacity(COMBO_LENGTH),
            active: None,
            survived_boost: false,
            tuning,
        }
    }

    pub fn buffer(&self) -> &[Symbol] {
        &self.buffer
    }

    pub fn active(&self) -> Option<&ActiveEffect> {
        self.active.as_ref()
    }

    pub fn active_effect(&self) -> Option<ComboEffect> {
        self.active.map(|a| a.effect)
    }

    pub fn is_active(&self, effect: ComboEffect) -> bool {
        self.active_effect() == Some(effect)
    }

    /// Push a collected symbol
    pub fn add_symbol(&mut self, symbol: Symbol) -> ComboOutcome {
        let mut outcome = ComboOutcome {
            cancelled: self.active.take().map(|a| a.effect),
            ..Default::default()
        };
        if let Some(effect) = outcome.cancelled {
            log::info!("{} cancelled by collection", effect.name());
        }

        if self.buffer.len() == COMBO_LENGTH {
            self.buffer.remove(0);
        }
        self.buffer.push(symbol);

        if self.buffer.len() == COMBO_LENGTH {
            outcome.matched = match_combo(&self.buffer, self.tuning.extended_combos);
            self.buffer.clear();
            match outcome.matched {
                Some(effect) => self.activate(effect),
                None => outcome.failed = true,
            }
        }
        outcome
    }

    /// Push a raw symbol value; values outside the alphabet leave state untouched
    pub fn add_value(&mut self, value: u8) -> Result<ComboOutcome, SimError> {
        let symbol = Symbol::try_from(value).inspect_err(|e| log::warn!("{}", e))?;
        Ok(self.add_symbol(symbol))
    }

    /// Start an effect with its configured duration, replacing any running one
    pub fn activate(&mut self, effect: ComboEffect) {
        let duration = effect.duration(&self.tuning);
        self.activate_for(effect, duration);
    }

    pub fn activate_for(&mut self, effect: ComboEffect, duration: f32) {
        self.active = Some(ActiveEffect {
            effect,
            remaining: duration,
            duration,
        });
        log::info!("{} activated for {:.1}s", effect.name(), duration);
    }

    /// Activate by host-facing name; unknown names are logged and ignored
    pub fn activate_named(&mut self, name: &str) -> Result<ComboEffect, SimError> {
        match ComboEffect::from_name(name) {
            Some(effect) => {
                self.activate(effect);
                Ok(effect)
            }
            None => {
                log::warn!("Ignoring unknown combo effect {:?}", name);
                Err(SimError::UnknownEffect(name.to_string()))
            }
        }
    }

    /// Count the active effect down. Returns the effect that expired this tick.
    pub fn update(&mut self, dt: f32) -> Option<ComboEffect> {
        let active = self.active.as_mut()?;
        active.remaining -= dt;
        if active.remaining > 0.0 {
            return None;
        }

        let effect = active.effect;
        self.active = None;
        if effect == ComboEffect::SpeedBoost {
            self.survived_boost = true;
        }
        log::info!("{} expired", effect.name());
        Some(effect)
    }

    /// Read and clear the survived-boost flag
    pub fn take_survived_boost(&mut self) -> bool {
        std::mem::take(&mut self.survived_boost)
    }

    /// Spend an active Protection as a one-shot shield
    pub fn consume_protection(&mut self) -> bool {
        if self.is_active(ComboEffect::Protection) {
            self.active = None;
            log::info!("Protection consumed");
            true
        } else {
            false
        }
    }

    pub fn survival_protection(&self) -> f32 {
        self.tuning.survival_protection
    }

    pub fn tuning(&self) -> &ComboTuning {
        &self.tuning
    }
}
