use serde::{Deserialize, Serialize};

/// Terrain in a single dungeon map cell.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
#[serde(try_from = "char", into = "char")]
pub enum Tile {
    #[default]
    Wall,
    Floor,
    Door,
    StairsDown,
    StairsUp,
}

use Tile::*;

impl Tile {
    pub fn is_walkable(self) -> bool {
        !matches!(self, Wall)
    }
}

impl TryFrom<char> for Tile {
    type Error = &'static str;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '#' => Ok(Wall),
            '.' => Ok(Floor),
            '+' => Ok(Door),
            '>' => Ok(StairsDown),
            '<' => Ok(StairsUp),
            _ => Err("invalid terrain char"),
        }
    }
}

impl From<Tile> for char {
    fn from(val: Tile) -> Self {
        // NB. This must match Tile's TryFrom inputs above.
        match val {
            Wall => '#',
            Floor => '.',
            Door => '+',
            StairsDown => '>',
            StairsUp => '<',
        }
    }
}
