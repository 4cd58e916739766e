//! Enemy and item type tables.

use std::sync::LazyLock;

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use util::IndexMap;

use crate::{Dice, Result};

/// Spawnable type tables, keyed by type name.
///
/// Table order is significant, weighted spawn selection walks the entries in
/// the order they are listed.
#[derive(Clone, Default, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Data {
    pub bestiary: IndexMap<String, Monster>,
    pub armory: IndexMap<String, Item>,
}

// Built-in content tables, embedded in the binary.
static DATA: LazyLock<Data> = LazyLock::new(|| {
    Data::from_json(include_str!("../data/content.json"))
        .expect("embedded content data is malformed")
});

impl Data {
    /// Built-in content tables.
    pub fn get() -> &'static Data {
        &DATA
    }

    pub fn from_json(s: &str) -> Result<Data> {
        let ret: Data =
            serde_json::from_str(s).context("malformed content data")?;
        ret.validate()?;
        Ok(ret)
    }

    /// Check that every monster can be instantiated and fought.
    pub fn validate(&self) -> Result<()> {
        for (kind, m) in &self.bestiary {
            ensure!(m.hp > 0, "monster {kind:?} has no hit points");
            m.damage
                .validate()
                .with_context(|| format!("monster {kind:?} damage"))?;
        }
        Ok(())
    }

    pub fn monster(&self, kind: &str) -> Result<&Monster> {
        self.bestiary
            .get(kind)
            .with_context(|| format!("unknown actor type {kind:?}"))
    }
}

/// Things that can show up in spawn tables.
pub trait Spawnable {
    fn min_depth(&self) -> u32;
    fn spawn_weight(&self) -> u32;

    fn available_at(&self, depth: u32) -> bool {
        self.min_depth() <= depth && self.spawn_weight() > 0
    }
}

#[derive(Clone, Default, Eq, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Monster {
    pub min_depth: u32,
    pub spawn_weight: u32,
    pub hp: i32,
    pub ac: i32,
    pub attack_bonus: i32,
    pub damage: Dice,
    /// Experience awarded for killing the monster.
    pub xp: i32,
}

impl Spawnable for Monster {
    fn min_depth(&self) -> u32 {
        self.min_depth
    }

    fn spawn_weight(&self) -> u32 {
        self.spawn_weight
    }
}

#[derive(Clone, Default, Eq, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Item {
    pub min_depth: u32,
    pub spawn_weight: u32,
    pub kind: ItemKind,
}

impl Spawnable for Item {
    fn min_depth(&self) -> u32 {
        self.min_depth
    }

    fn spawn_weight(&self) -> u32 {
        self.spawn_weight
    }
}

/// Coarse item category, interpreted by the inventory layer.
#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ItemKind {
    #[default]
    Food,
    Potion,
    Scroll,
    Weapon,
    Armor,
}

impl ItemKind {
    pub fn icon(&self) -> char {
        use ItemKind::*;
        match self {
            Food => '%',
            Potion => '!',
            Scroll => '?',
            Weapon => ')',
            Armor => '[',
        }
    }
}
