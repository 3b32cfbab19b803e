//! Pickups lying on cells
//!
//! A pickup is owned by exactly one cell. Applying it consumes the value, and
//! the resolution code takes it out of the cell before applying, so a pickup
//! can never reach two avatars.

pub mod effects;

pub use effects::{EffectKind, TimedEffect, DEFAULT_EFFECT_DURATION};

use crate::avatar::AvatarRuntime;
use rand::Rng;
use serde::Serialize;

/// Health restored by a default health pickup
pub const DEFAULT_HEALTH_RESTORED: i32 = 3;

/// Health pickups cannot push an avatar past this
pub const HEALTH_RESTORE_MAX: i32 = 100;

/// Attack strength added by a default damage pickup
pub const DEFAULT_DAMAGE_BOOST: i32 = 5;

/// Items an avatar can carry around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeldItem {
    DeliveryTote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Pickup {
    Health { health_restored: i32 },
    Invulnerability,
    DamageBoost { damage_boost: i32 },
    DeliveryTote,
}

impl Pickup {
    /// Pick one of the default pickups uniformly
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..4) {
            0 => Pickup::Health { health_restored: DEFAULT_HEALTH_RESTORED },
            1 => Pickup::Invulnerability,
            2 => Pickup::DamageBoost { damage_boost: DEFAULT_DAMAGE_BOOST },
            _ => Pickup::DeliveryTote,
        }
    }

    pub fn apply(self, avatar: &mut AvatarRuntime) {
        match self {
            Pickup::Health { health_restored } => {
                avatar.health = (avatar.health + health_restored).min(HEALTH_RESTORE_MAX);
            }
            Pickup::Invulnerability => {
                avatar.add_effect(TimedEffect::new(
                    EffectKind::Invulnerability,
                    DEFAULT_EFFECT_DURATION,
                ));
            }
            Pickup::DamageBoost { damage_boost } => {
                avatar.add_effect(TimedEffect::new(
                    EffectKind::DamageBoost { damage_boost },
                    DEFAULT_EFFECT_DURATION,
                ));
            }
            Pickup::DeliveryTote => avatar.add_held_item(HeldItem::DeliveryTote),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Location, PlayerId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    fn avatar() -> AvatarRuntime {
        AvatarRuntime::new(
            PlayerId(1),
            Location::new(0, 0),
            "http://localhost:5000/turn/".parse().unwrap(),
        )
    }

    #[test]
    fn test_health_pickup_is_capped() {
        let mut avatar = avatar();
        Pickup::Health { health_restored: 3 }.apply(&mut avatar);
        assert_eq!(avatar.health, 8);

        avatar.health = 99;
        Pickup::Health { health_restored: 3 }.apply(&mut avatar);
        assert_eq!(avatar.health, HEALTH_RESTORE_MAX);
    }

    #[test]
    fn test_invulnerability_pickup_grants_resistance() {
        let mut avatar = avatar();
        Pickup::Invulnerability.apply(&mut avatar);
        assert_eq!(avatar.resistance, effects::INVULNERABILITY_RESISTANCE);
        assert_eq!(avatar.active_effects().len(), 1);
    }

    #[test]
    fn test_damage_pickup_boosts_attack() {
        let mut avatar = avatar();
        let base = avatar.attack_strength;
        Pickup::DamageBoost { damage_boost: 5 }.apply(&mut avatar);
        assert_eq!(avatar.attack_strength, base + 5);
    }

    #[test]
    fn test_delivery_tote_is_held() {
        let mut avatar = avatar();
        Pickup::DeliveryTote.apply(&mut avatar);
        Pickup::DeliveryTote.apply(&mut avatar);
        assert_eq!(avatar.held_count(HeldItem::DeliveryTote), 2);
    }

    #[test]
    fn test_random_covers_every_variant() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(std::mem::discriminant(&Pickup::random(&mut rng)));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_serialization_tag() {
        assert_eq!(
            serde_json::to_value(Pickup::Health { health_restored: 3 }).unwrap(),
            json!({"type": "health", "health_restored": 3})
        );
        assert_eq!(
            serde_json::to_value(Pickup::DeliveryTote).unwrap(),
            json!({"type": "delivery_tote"})
        );
    }
}
