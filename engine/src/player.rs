use glam::{IVec2, Vec2};

use crate::{Actor, Config, Scale};

/// Experience needed per character level to gain the next one.
pub const XP_PER_LEVEL: i32 = 20;

/// Hit points gained on level up.
pub const LEVEL_UP_HP: i32 = 5;

/// The player character.
#[derive(Clone, PartialEq, Debug)]
pub struct Player {
    pub actor: Actor,
    /// Satiation, starts full and goes down every turn.
    pub hunger: f32,
    pub level: u32,
    /// Experience collected towards the next level.
    pub xp: i32,
    /// View direction in radians.
    pub facing: f32,
    /// Continuous position, always inside the tile at `actor.pos`.
    pub world_pos: Vec2,
}

impl Player {
    pub fn new(config: &Config, scale: &Scale, pos: IVec2) -> Self {
        Player {
            actor: Actor::player(&config.player, pos),
            hunger: config.max_hunger,
            level: 1,
            xp: 0,
            facing: 0.0,
            world_pos: scale.grid_to_world(pos),
        }
    }

    pub fn pos(&self) -> IVec2 {
        self.actor.pos
    }

    /// Put the player at the center of a tile.
    pub fn teleport(&mut self, scale: &Scale, pos: IVec2) {
        self.actor.pos = pos;
        self.world_pos = scale.grid_to_world(pos);
    }

    /// Lose one turn's worth of satiation, return whether the player is
    /// starving.
    pub fn decay_hunger(&mut self, rate: f32) -> bool {
        self.hunger = (self.hunger - rate).max(0.0);
        self.hunger <= 0.0
    }

    /// Experience needed for the next level.
    pub fn xp_to_next(&self) -> i32 {
        self.level as i32 * XP_PER_LEVEL
    }

    /// Add experience, return the levels reached.
    pub fn gain_xp(&mut self, amount: i32) -> Vec<u32> {
        let mut ret = Vec::new();
        self.xp += amount.max(0);
        while self.xp >= self.xp_to_next() {
            self.xp -= self.xp_to_next();
            self.level += 1;
            self.actor.max_hp += LEVEL_UP_HP;
            self.actor.heal(LEVEL_UP_HP);
            self.actor.attack_bonus += 1;
            log::info!("player reached level {}", self.level);
            ret.push(self.level);
        }
        ret
    }
}
