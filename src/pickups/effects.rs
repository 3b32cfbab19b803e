//! Timed effects granted by pickups

/// Ticks a pickup effect lasts unless stated otherwise
pub const DEFAULT_EFFECT_DURATION: u32 = 10;

/// Resistance granted by invulnerability; larger than any damage in play
pub const INVULNERABILITY_RESISTANCE: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Invulnerability,
    DamageBoost { damage_boost: i32 },
}

impl EffectKind {
    /// Resistance added while the effect is active
    pub fn resistance_bonus(&self) -> i32 {
        match self {
            EffectKind::Invulnerability => INVULNERABILITY_RESISTANCE,
            EffectKind::DamageBoost { .. } => 0,
        }
    }

    /// Attack strength added while the effect is active
    pub fn attack_bonus(&self) -> i32 {
        match *self {
            EffectKind::Invulnerability => 0,
            EffectKind::DamageBoost { damage_boost } => damage_boost,
        }
    }
}

/// An effect with a countdown, owned by one avatar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEffect {
    kind: EffectKind,
    remaining_ticks: u32,
}

impl TimedEffect {
    pub fn new(kind: EffectKind, duration: u32) -> Self {
        Self { kind, remaining_ticks: duration }
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }

    pub fn on_tick(&mut self) {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ticks == 0
    }
}
