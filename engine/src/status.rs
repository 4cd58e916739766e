//! Timed modifiers on actors.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Status effect types.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EffectKind {
    /// Adds magnitude to damage dealt.
    Strength,
    /// Adds magnitude to attack rolls.
    Skill,
    /// Doubles the movement allowed per turn.
    Speed,
    /// Adds magnitude to sight radius.
    Sight,
    /// Enemies don't pursue the bearer.
    Invisibility,
    /// Blocks all incoming damage.
    Stone,
    Poison,
    Attraction,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StatusEffect {
    pub kind: EffectKind,
    pub magnitude: i32,
    pub turns_remaining: u32,
}

impl StatusEffect {
    pub fn new(kind: EffectKind, duration: u32) -> Self {
        StatusEffect::with_magnitude(kind, duration, 1)
    }

    pub fn with_magnitude(
        kind: EffectKind,
        duration: u32,
        magnitude: i32,
    ) -> Self {
        StatusEffect {
            kind,
            magnitude,
            turns_remaining: duration,
        }
    }
}

/// Active effects on one actor, at most one per kind.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct StatusEffects(Vec<StatusEffect>);

impl StatusEffects {
    /// Add an effect.
    ///
    /// An effect of a kind that's already active replaces the old one only
    /// if it lasts strictly longer. Returns whether the effect was applied.
    pub fn add(&mut self, effect: StatusEffect) -> bool {
        if effect.turns_remaining == 0 {
            return false;
        }

        match self.0.iter_mut().find(|e| e.kind == effect.kind) {
            Some(old) if effect.turns_remaining > old.turns_remaining => {
                *old = effect;
                true
            }
            Some(_) => false,
            None => {
                self.0.push(effect);
                true
            }
        }
    }

    /// Count down one turn, return the kinds of effects that ran out.
    pub fn update(&mut self) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        self.0.retain_mut(|e| {
            e.turns_remaining = e.turns_remaining.saturating_sub(1);
            if e.turns_remaining == 0 {
                expired.push(e.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn get(&self, kind: EffectKind) -> Option<&StatusEffect> {
        self.0.iter().find(|e| e.kind == kind)
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.get(kind).is_some()
    }

    /// Magnitude of an effect, zero if it isn't active.
    pub fn magnitude(&self, kind: EffectKind) -> i32 {
        self.get(kind).map_or(0, |e| e.magnitude)
    }

    pub fn remove(&mut self, kind: EffectKind) -> Option<StatusEffect> {
        let idx = self.0.iter().position(|e| e.kind == kind)?;
        Some(self.0.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
