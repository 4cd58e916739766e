//! Deterministic simulation kernel of the dungeon crawler.

pub mod ai;
pub use ai::Decision;

mod actor;
pub use actor::{Actor, Dice, MAX_DICE, MAX_SIDES};

pub mod combat;
pub use combat::AttackResult;

mod config;
pub use config::{Config, DungeonConfig, PlayerConfig};

mod data;
pub use data::{Data, Item, ItemKind, Monster, Spawnable};

mod dungeon;
pub use dungeon::{Dungeon, Room, Spawn, MAX_DEPTH};

pub mod fov;
pub use fov::{Explored, TileSet, Visibility};

mod grid;
pub use grid::{Scale, TileGrid};

mod msg;
pub use msg::{Event, Receiver};

mod player;
pub use player::Player;

pub mod prelude;

mod runtime;
pub use runtime::{EnemyView, Input, PlayerView, Runtime, Snapshot};

mod status;
pub use status::{EffectKind, StatusEffect, StatusEffects};

mod tile;
pub use tile::Tile;

mod time;
pub use time::{TurnClock, TurnState};

pub type Result<T> = anyhow::Result<T>;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ScenarioStatus {
    Ongoing,
    Lost,
}

/// Result of a player action that the game rules may refuse.
#[must_use]
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Outcome<T = ()> {
    Done(T),
    /// The action wasn't possible, nothing changed.
    Refused(String),
}

impl<T> Outcome<T> {
    pub fn refused(reason: impl Into<String>) -> Self {
        Outcome::Refused(reason.into())
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }
}
