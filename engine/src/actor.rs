//! Creatures that take part in combat.

use std::fmt;

use anyhow::ensure;
use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::{Data, PlayerConfig, Result, StatusEffects, MAX_DEPTH};

/// Damage dice expression, `count`d`sides` + `bonus`.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
#[serde(default)]
pub struct Dice {
    pub count: u32,
    pub sides: u32,
    pub bonus: i32,
}

/// Most dice a single damage expression may roll.
pub const MAX_DICE: u32 = 100;

/// Largest die a damage expression may use.
pub const MAX_SIDES: u32 = 1000;

impl Dice {
    pub const fn new(count: u32, sides: u32, bonus: i32) -> Self {
        Dice {
            count,
            sides,
            bonus,
        }
    }

    /// Check that the dice can be rolled without numbers running away.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.count <= MAX_DICE,
            "{self} rolls more than {MAX_DICE} dice"
        );
        ensure!(
            self.sides <= MAX_SIDES,
            "{self} uses dice larger than d{MAX_SIDES}"
        );
        Ok(())
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.bonus != 0 {
            write!(f, "{:+}", self.bonus)?;
        }
        Ok(())
    }
}

/// Player or enemy creature.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Actor {
    /// Type key the actor was created from.
    pub kind: String,
    hp: i32,
    pub max_hp: i32,
    pub ac: i32,
    pub attack_bonus: i32,
    pub damage: Dice,
    pub pos: IVec2,
    pub effects: StatusEffects,
    /// Experience awarded to whoever kills this actor.
    pub xp: i32,
    /// Equipped weapon damage, owned by the inventory layer.
    pub weapon: Option<Dice>,
    /// Armor class bonus from worn armor, owned by the inventory layer.
    pub armor: i32,
}

impl Actor {
    /// Create an actor with full health.
    ///
    /// `max_hp` must be positive, callers check it against their data.
    pub fn new(kind: impl Into<String>, max_hp: i32, pos: IVec2) -> Self {
        debug_assert!(max_hp > 0, "actor with {max_hp} max hp");
        Actor {
            kind: kind.into(),
            hp: max_hp,
            max_hp,
            ac: 10,
            attack_bonus: 0,
            damage: Dice::new(1, 4, 0),
            pos,
            effects: Default::default(),
            xp: 0,
            weapon: None,
            armor: 0,
        }
    }

    /// Instantiate a monster template, scaled for dungeon depth.
    ///
    /// Hit points, attack bonus and damage bonus grow by 20% per level below
    /// the first, armor class grows by one every two levels.
    pub fn spawn(
        kind: &str,
        pos: IVec2,
        depth: u32,
        data: &Data,
    ) -> Result<Actor> {
        ensure!(
            (1..=MAX_DEPTH).contains(&depth),
            "invalid dungeon depth {depth}"
        );
        let m = data.monster(kind)?;
        ensure!(m.hp > 0, "monster {kind:?} has no hit points");

        let mult = 1.0 + 0.2 * (depth - 1) as f32;
        let scale = |x: i32| (x as f32 * mult).round() as i32;

        let mut ret = Actor::new(kind, scale(m.hp), pos);
        ret.ac = m.ac.saturating_add(((depth - 1) / 2) as i32);
        ret.attack_bonus = scale(m.attack_bonus);
        ret.damage = Dice {
            bonus: scale(m.damage.bonus),
            ..m.damage
        };
        ret.xp = m.xp;
        Ok(ret)
    }

    pub fn player(config: &PlayerConfig, pos: IVec2) -> Actor {
        let mut ret = Actor::new("player", config.hp, pos);
        ret.ac = config.ac;
        ret.attack_bonus = config.attack_bonus;
        ret.damage = config.damage;
        ret
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Lose hit points, never dropping below zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount.max(0)).clamp(0, self.max_hp);
    }

    /// Regain hit points up to maximum. The dead stay dead.
    pub fn heal(&mut self, amount: i32) {
        if self.is_alive() {
            self.hp = (self.hp + amount.max(0)).clamp(0, self.max_hp);
        }
    }

    /// Armor class including worn armor.
    pub fn defense(&self) -> i32 {
        self.ac + self.armor
    }

    /// Damage dice of the current attack, the weapon's if one is wielded.
    pub fn attack_dice(&self) -> Dice {
        self.weapon.unwrap_or(self.damage)
    }
}
