//! Tunable kernel parameters.

use std::path::Path;

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use util::MAX_PACKED_COORD;

use crate::{Dice, Result, Scale};

/// Top-level kernel configuration.
///
/// Every field has a default, so a configuration file only needs to list
/// the values it changes.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub dungeon: DungeonConfig,
    pub player: PlayerConfig,
    /// Side length of a grid tile in world units.
    pub tile_size: f32,
    /// Base sight radius in world units.
    pub sight_radius: f32,
    /// Distance in world units the player moves before a turn passes.
    pub move_threshold: f32,
    /// World units per second at full stick deflection.
    pub move_speed: f32,
    /// Radians per second at full rotation input.
    pub turn_speed: f32,
    /// Movement axes shorter than this are treated as no input.
    pub deadzone: f32,
    pub max_hunger: f32,
    /// Hunger lost per turn.
    pub hunger_rate: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dungeon: Default::default(),
            player: Default::default(),
            tile_size: 2.0,
            sight_radius: 12.0,
            move_threshold: 2.0,
            move_speed: 4.0,
            turn_speed: 2.5,
            deadzone: 0.15,
            max_hunger: 100.0,
            hunger_rate: 1.0,
        }
    }
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self> {
        let ret: Config =
            serde_json::from_str(s).context("malformed configuration")?;
        ret.validate()?;
        Ok(ret)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Config::from_json(&text)
            .with_context(|| format!("loading {}", path.display()))
    }

    pub fn scale(&self) -> Result<Scale> {
        Scale::new(self.tile_size)
    }

    /// Check that the values describe a playable setup.
    pub fn validate(&self) -> Result<()> {
        self.dungeon.validate()?;
        self.player.validate()?;
        self.scale()?;

        for (name, value) in [
            ("sight-radius", self.sight_radius),
            ("move-speed", self.move_speed),
            ("turn-speed", self.turn_speed),
            ("deadzone", self.deadzone),
            ("max-hunger", self.max_hunger),
            ("hunger-rate", self.hunger_rate),
        ] {
            ensure!(
                value.is_finite() && value >= 0.0,
                "{name} must be a non-negative number, got {value}"
            );
        }
        ensure!(
            self.move_threshold.is_finite() && self.move_threshold > 0.0,
            "move-threshold must be positive, got {}",
            self.move_threshold
        );
        ensure!(self.deadzone < 1.0, "deadzone must be below 1");
        Ok(())
    }
}

/// Level generator parameters.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DungeonConfig {
    pub width: i32,
    pub height: i32,
    pub min_rooms: i32,
    pub max_rooms: i32,
    pub min_room_size: i32,
    pub max_room_size: i32,
    /// Minimum number of wall tiles between a room and the grid edge.
    pub margin: i32,
    /// Room placement attempts before the generator gives up on reaching
    /// the target room count.
    pub placement_attempts: u32,
    pub max_items_per_room: i32,
    pub max_enemies_per_room: i32,
    /// Random positions tried for one spawn before it's skipped.
    pub spawn_attempts: u32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        DungeonConfig {
            width: 56,
            height: 40,
            min_rooms: 6,
            max_rooms: 12,
            min_room_size: 4,
            max_room_size: 10,
            margin: 1,
            placement_attempts: 200,
            max_items_per_room: 2,
            max_enemies_per_room: 4,
            spawn_attempts: 30,
        }
    }
}

impl DungeonConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "invalid dungeon dimensions {}x{}",
            self.width,
            self.height
        );
        ensure!(
            self.width <= MAX_PACKED_COORD + 1
                && self.height <= MAX_PACKED_COORD + 1,
            "dungeon {}x{} is too large",
            self.width,
            self.height
        );
        ensure!(self.margin >= 1, "margin must be at least 1");
        ensure!(
            self.min_room_size >= 1
                && self.min_room_size <= self.max_room_size,
            "invalid room size range {}..={}",
            self.min_room_size,
            self.max_room_size
        );
        let span = self.max_room_size + 2 * self.margin;
        ensure!(
            self.width >= span && self.height >= span,
            "{}x{} dungeon can't fit rooms of size {}",
            self.width,
            self.height,
            self.max_room_size
        );
        ensure!(
            self.min_rooms >= 2 && self.min_rooms <= self.max_rooms,
            "invalid room count range {}..={}",
            self.min_rooms,
            self.max_rooms
        );
        ensure!(
            self.max_items_per_room >= 0 && self.max_enemies_per_room >= 0,
            "negative spawn counts"
        );
        ensure!(
            self.placement_attempts > 0,
            "placement-attempts must be positive"
        );
        ensure!(self.spawn_attempts > 0, "spawn-attempts must be positive");
        Ok(())
    }
}

/// Starting statistics of the player character.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PlayerConfig {
    pub hp: i32,
    pub ac: i32,
    pub attack_bonus: i32,
    pub damage: Dice,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            hp: 30,
            ac: 12,
            attack_bonus: 3,
            damage: Dice::new(1, 6, 1),
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.hp > 0, "player hp must be positive");
        self.damage.validate().context("player damage")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn partial_json() {
        let config = Config::from_json(
            r#"{ "hunger-rate": 2.5, "dungeon": { "max-rooms": 8 } }"#,
        )
        .unwrap();
        assert_eq!(config.hunger_rate, 2.5);
        assert_eq!(config.dungeon.max_rooms, 8);
        assert_eq!(config.dungeon.min_rooms, DungeonConfig::default().min_rooms);
        assert_eq!(config.tile_size, Config::default().tile_size);
    }

    #[test]
    fn degenerate_values_fail() {
        assert!(Config::from_json(r#"{ "tile-size": 0 }"#).is_err());
        assert!(Config::from_json(r#"{ "move-threshold": -1 }"#).is_err());
        assert!(Config::from_json(r#"{ "dungeon": { "width": 0 } }"#).is_err());
        assert!(Config::from_json(r#"{ "dungeon": { "height": -3 } }"#).is_err());
        assert!(Config::from_json(
            r#"{ "dungeon": { "min-rooms": 9, "max-rooms": 3 } }"#
        )
        .is_err());
        assert!(Config::from_json(r#"{ "dungeon": { "width": 8 } }"#).is_err());
        assert!(Config::from_json(
            r#"{ "dungeon": { "min-rooms": 1, "max-rooms": 1 } }"#
        )
        .is_err());
        assert!(Config::from_json(r#"{ "player": { "hp": 0 } }"#).is_err());
        assert!(Config::from_json("not json").is_err());
        assert!(Config::from_json(
            r#"{ "player": { "damage": { "count": 1, "sides": 3000000000 } } }"#
        )
        .is_err());
        assert!(Config::from_json(
            r#"{ "player": { "damage": { "count": 5000, "sides": 6 } } }"#
        )
        .is_err());
    }
}
