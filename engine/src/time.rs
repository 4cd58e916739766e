use serde::{Deserialize, Serialize};

use crate::{EffectKind, StatusEffects};

/// Phase of the movement-driven turn cycle.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TurnState {
    /// Not enough movement for a turn yet.
    Idle,
    /// The movement threshold has been crossed, a turn is due.
    Advancing,
}

/// Game turn counter driven by distance moved.
#[derive(
    Copy, Clone, Default, PartialEq, Debug, Serialize, Deserialize,
)]
pub struct TurnClock {
    /// World distance moved since the last turn.
    pub moved: f32,
    /// Number of completed turns.
    pub turn: u64,
}

impl TurnClock {
    pub fn accumulate(&mut self, distance: f32) {
        if distance.is_finite() && distance > 0.0 {
            self.moved += distance;
        }
    }

    /// Movement needed for a turn given the mover's status effects.
    ///
    /// Speed doubles the distance, a fast mover covers more ground per turn.
    pub fn threshold(base: f32, effects: &StatusEffects) -> f32 {
        if effects.has(EffectKind::Speed) {
            base * 2.0
        } else {
            base
        }
    }

    pub fn check(&self, threshold: f32) -> TurnState {
        if self.moved >= threshold {
            TurnState::Advancing
        } else {
            TurnState::Idle
        }
    }

    /// Count a turn and drop all accumulated movement, overshoot included.
    pub fn advance(&mut self) {
        self.turn += 1;
        self.moved = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusEffect;

    #[test]
    fn idle_until_threshold() {
        let mut clock = TurnClock::default();
        clock.accumulate(1.5);
        assert_eq!(clock.check(2.0), TurnState::Idle);
        clock.accumulate(0.5);
        assert_eq!(clock.check(2.0), TurnState::Advancing);
    }

    #[test]
    fn overshoot_is_discarded() {
        let mut clock = TurnClock::default();
        clock.accumulate(17.0);
        assert_eq!(clock.check(2.0), TurnState::Advancing);
        clock.advance();
        assert_eq!(clock.turn, 1);
        assert_eq!(clock.moved, 0.0);
        assert_eq!(clock.check(2.0), TurnState::Idle);
    }

    #[test]
    fn bad_distances_ignored() {
        let mut clock = TurnClock::default();
        clock.accumulate(-3.0);
        clock.accumulate(f32::NAN);
        clock.accumulate(f32::INFINITY);
        assert_eq!(clock.moved, 0.0);
    }

    #[test]
    fn speed_doubles_threshold() {
        let mut fx = StatusEffects::default();
        assert_eq!(TurnClock::threshold(2.0, &fx), 2.0);
        fx.add(StatusEffect::new(EffectKind::Speed, 3));
        assert_eq!(TurnClock::threshold(2.0, &fx), 4.0);
    }
}
