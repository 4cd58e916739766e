//! Attack and damage rolls.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use util::RngExt;

use crate::{Actor, EffectKind};

/// Natural d20 roll that always hits and doubles damage.
pub const CRITICAL_ROLL: i32 = 20;

/// Natural d20 roll that gets flagged as a fumble.
pub const FUMBLE_ROLL: i32 = 1;

/// Outcome of a single attack.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct AttackResult {
    /// Natural d20 roll.
    pub roll: i32,
    pub hit: bool,
    pub critical: bool,
    /// Natural 1. Doesn't affect whether the attack hits.
    pub fumble: bool,
    /// Damage actually dealt.
    pub damage: i32,
    /// A hit that the defender's stone skin turned aside.
    pub blocked: bool,
    pub killed: bool,
}

pub fn roll_d20(rng: &mut (impl RngCore + ?Sized)) -> i32 {
    rng.int_in(1, 20)
}

/// Roll `count` dice with `sides` faces and add `bonus`.
///
/// The result is never below 1.
pub fn roll_damage(
    rng: &mut (impl RngCore + ?Sized),
    count: u32,
    sides: u32,
    bonus: i32,
) -> i32 {
    let sides = i32::try_from(sides).unwrap_or(i32::MAX);
    let mut sum = bonus;
    if sides > 0 {
        for _ in 0..count {
            sum = sum.saturating_add(rng.int_in(1, sides));
        }
    }
    sum.max(1)
}

/// Damage of a successful hit by `attacker`.
pub fn damage_roll(
    rng: &mut (impl RngCore + ?Sized),
    attacker: &Actor,
    critical: bool,
) -> i32 {
    let dice = attacker.attack_dice();
    let bonus = dice
        .bonus
        .saturating_add(attacker.effects.magnitude(EffectKind::Strength));
    let damage = roll_damage(rng, dice.count, dice.sides, bonus);
    if critical {
        damage.saturating_mul(2)
    } else {
        damage
    }
}

/// Roll a d20 for an attack and apply the result to `defender`.
pub fn attack(
    rng: &mut (impl RngCore + ?Sized),
    attacker: &Actor,
    defender: &mut Actor,
) -> AttackResult {
    let roll = roll_d20(rng);
    attack_with_roll(rng, attacker, defender, roll)
}

/// Resolve an attack with a given natural d20 roll.
pub fn attack_with_roll(
    rng: &mut (impl RngCore + ?Sized),
    attacker: &Actor,
    defender: &mut Actor,
    roll: i32,
) -> AttackResult {
    let critical = roll == CRITICAL_ROLL;
    let to_hit = roll
        .saturating_add(attacker.attack_bonus)
        .saturating_add(attacker.effects.magnitude(EffectKind::Skill));

    let mut ret = AttackResult {
        roll,
        hit: critical || to_hit >= defender.defense(),
        critical,
        fumble: roll == FUMBLE_ROLL,
        ..Default::default()
    };

    if !ret.hit {
        return ret;
    }

    if defender.effects.has(EffectKind::Stone) {
        ret.blocked = true;
        return ret;
    }

    ret.damage = damage_roll(rng, attacker, critical);
    let was_alive = defender.is_alive();
    defender.take_damage(ret.damage);
    ret.killed = was_alive && !defender.is_alive();
    ret
}
