//! Tile grid storage, coordinate conversion and pathfinding.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, ensure};
use glam::{ivec2, IVec2, Vec2};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use util::{AsciiMap, VecExt, DIR_4, MAX_PACKED_COORD};

use crate::{Result, Tile};

/// Row-major rectangle of tiles.
///
/// Serializes as its textual encoding, one character per tile and one line
/// per row.
#[derive(Clone, Eq, PartialEq, Debug, SerializeDisplay, DeserializeFromStr)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create a grid filled with walls.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "invalid grid dimensions {width}x{height}"
        );
        ensure!(
            width <= MAX_PACKED_COORD + 1 && height <= MAX_PACKED_COORD + 1,
            "grid {width}x{height} is too large"
        );
        Ok(TileGrid {
            width,
            height,
            tiles: vec![Tile::Wall; (width * height) as usize],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, p: IVec2) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }

    fn idx(&self, p: IVec2) -> Option<usize> {
        self.contains(p).then(|| (p.y * self.width + p.x) as usize)
    }

    pub fn get(&self, p: IVec2) -> Option<Tile> {
        self.idx(p).map(|i| self.tiles[i])
    }

    /// Tile at position, space outside the grid reads as wall.
    pub fn tile(&self, p: IVec2) -> Tile {
        self.get(p).unwrap_or_default()
    }

    /// Set a tile, positions outside the grid are ignored.
    pub fn set(&mut self, p: IVec2, tile: Tile) {
        if let Some(i) = self.idx(p) {
            self.tiles[i] = tile;
        }
    }

    pub fn is_walkable(&self, p: IVec2) -> bool {
        self.tile(p).is_walkable()
    }

    /// Iterate all grid positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| ivec2(x, y)))
    }

    /// Positions on the outer edge of the grid.
    pub fn is_border(&self, p: IVec2) -> bool {
        p.x == 0 || p.y == 0 || p.x == self.width - 1 || p.y == self.height - 1
    }

    /// Walkable 4-neighbors of a position, in `DIR_4` order.
    pub fn walk_neighbors(
        &self,
        p: IVec2,
    ) -> impl Iterator<Item = IVec2> + '_ {
        DIR_4
            .into_iter()
            .map(move |d| p + d)
            .filter(|&q| self.is_walkable(q))
    }

    /// Shortest 4-directional path from `start` to `goal`.
    ///
    /// The path excludes `start` and includes `goal`. It is empty if the goal
    /// is not walkable, can't be reached, or is the start position.
    pub fn find_path(&self, start: IVec2, goal: IVec2) -> Vec<IVec2> {
        if !self.is_walkable(goal) {
            return Vec::new();
        }

        util::astar_path(
            &start,
            &goal,
            |&p| self.walk_neighbors(p),
            |a, b| (*b - *a).taxi_len() as usize,
        )
        .unwrap_or_default()
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width {
                write!(f, "{}", char::from(self.tile(ivec2(x, y))))?;
            }
        }
        Ok(())
    }
}

impl FromStr for TileGrid {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let map = AsciiMap::new(s);
        let dim = map.dim();
        if dim.x == 0 {
            bail!("empty tile map");
        }

        for (y, line) in map.lines().enumerate() {
            ensure!(
                line.chars().count() as i32 == dim.x,
                "tile map row {y} is not {} tiles wide",
                dim.x
            );
        }

        let mut ret = TileGrid::new(dim.x, dim.y)?;
        for (y, line) in map.lines().enumerate() {
            for (x, c) in line.chars().enumerate() {
                let tile = Tile::try_from(c)
                    .map_err(|e| anyhow!("{e} {c:?} at {x},{y}"))?;
                ret.set(ivec2(x as i32, y as i32), tile);
            }
        }
        Ok(ret)
    }
}

/// Conversion between grid coordinates and continuous world coordinates.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Scale {
    tile_size: f32,
}

impl Scale {
    pub fn new(tile_size: f32) -> Result<Self> {
        ensure!(
            tile_size.is_finite() && tile_size > 0.0,
            "invalid tile size {tile_size}"
        );
        Ok(Scale { tile_size })
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World position of the center of a tile.
    pub fn grid_to_world(&self, p: IVec2) -> Vec2 {
        (p.as_vec2() + Vec2::splat(0.5)) * self.tile_size
    }

    /// Grid cell containing a world position.
    pub fn world_to_grid(&self, pos: Vec2) -> Result<IVec2> {
        ensure!(pos.is_finite(), "non-finite world position {pos}");
        Ok((pos / self.tile_size).floor().as_ivec2())
    }
}
