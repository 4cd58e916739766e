//! Procedural level generation.

use anyhow::{bail, ensure, Context};
use glam::{ivec2, IVec2};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use util::{level_seed, GameRng, HashSet, IndexMap, RngExt};

use crate::{Data, DungeonConfig, Result, Spawnable, Tile, TileGrid};

/// Deepest level that can be generated.
pub const MAX_DEPTH: u32 = i32::MAX as u32;

/// Axis-aligned rectangular room.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Room { x, y, w, h }
    }

    pub fn center(&self) -> IVec2 {
        ivec2(self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Whether rooms overlap or touch.
    ///
    /// Rooms that don't intersect always have a wall between them.
    pub fn intersects(&self, other: &Room) -> bool {
        self.x <= other.x + other.w
            && other.x <= self.x + self.w
            && self.y <= other.y + other.h
            && other.y <= self.y + self.h
    }

    pub fn contains(&self, p: IVec2) -> bool {
        (self.x..self.x + self.w).contains(&p.x)
            && (self.y..self.y + self.h).contains(&p.y)
    }

    pub fn positions(&self) -> impl Iterator<Item = IVec2> + '_ {
        (self.y..self.y + self.h).flat_map(move |y| {
            (self.x..self.x + self.w).map(move |x| ivec2(x, y))
        })
    }
}

/// Something to be placed in the level when it's entered.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Spawn {
    /// Type key in the content tables.
    pub kind: String,
    pub pos: IVec2,
    pub depth: u32,
}

/// A generated dungeon level.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct Dungeon {
    pub grid: TileGrid,
    /// Rooms in generation order.
    pub rooms: Vec<Room>,
    /// Stairs down, at the center of the last room.
    pub descent: IVec2,
    /// Where the player enters, at the center of the first room.
    pub arrival: IVec2,
    pub enemy_spawns: Vec<Spawn>,
    pub item_spawns: Vec<Spawn>,
    pub seed: u32,
    pub depth: u32,
}

impl Dungeon {
    /// Generate level `depth` of the run started with `seed`.
    ///
    /// The same arguments always produce the same level.
    pub fn generate(
        seed: u32,
        depth: u32,
        config: &DungeonConfig,
        data: &Data,
    ) -> Result<Dungeon> {
        ensure!(
            (1..=MAX_DEPTH).contains(&depth),
            "invalid dungeon depth {depth}"
        );
        config.validate()?;

        let max_enemies = enemy_cap(depth, config);
        if max_enemies > 0 {
            ensure_available(&data.bestiary, depth, "enemy")?;
        }
        if config.max_items_per_room > 0 {
            ensure_available(&data.armory, depth, "item")?;
        }

        let mut rng = GameRng::new(level_seed(seed, depth));
        let mut grid = TileGrid::new(config.width, config.height)?;
        let rooms = place_rooms(&mut rng, &mut grid, config);

        // Arrival and descent need rooms of their own.
        let [first, .., last] = rooms.as_slice() else {
            bail!(
                "depth {depth}: could only place {} room(s), need at least 2",
                rooms.len()
            );
        };
        if (rooms.len() as i32) < config.min_rooms {
            log::warn!(
                "depth {depth}: only placed {} of at least {} rooms",
                rooms.len(),
                config.min_rooms
            );
        }

        let arrival = first.center();
        let descent = last.center();
        if depth > 1 {
            grid.set(arrival, Tile::StairsUp);
        }
        grid.set(descent, Tile::StairsDown);

        let mut ret = Dungeon {
            grid,
            rooms,
            descent,
            arrival,
            enemy_spawns: Vec::new(),
            item_spawns: Vec::new(),
            seed,
            depth,
        };
        ret.populate(&mut rng, config, data, max_enemies)?;

        log::info!(
            "generated depth {depth}: {} rooms, {} enemies, {} items",
            ret.rooms.len(),
            ret.enemy_spawns.len(),
            ret.item_spawns.len()
        );
        Ok(ret)
    }

    /// Fill the rooms between the first and the last one with enemies and
    /// items.
    fn populate(
        &mut self,
        rng: &mut GameRng,
        config: &DungeonConfig,
        data: &Data,
        max_enemies: i32,
    ) -> Result<()> {
        let mut occupied = HashSet::default();
        occupied.insert(self.arrival);
        occupied.insert(self.descent);

        let inner = if self.rooms.len() > 2 {
            &self.rooms[1..self.rooms.len() - 1]
        } else {
            &[][..]
        };

        for room in inner {
            for _ in 0..rng.int_in(0, max_enemies) {
                let kind = pick_kind(rng, &data.bestiary, self.depth)?;
                if let Some(pos) = self.free_spot(rng, room, &occupied, config)
                {
                    occupied.insert(pos);
                    self.enemy_spawns.push(Spawn {
                        kind,
                        pos,
                        depth: self.depth,
                    });
                }
            }

            for _ in 0..rng.int_in(0, config.max_items_per_room) {
                let kind = pick_kind(rng, &data.armory, self.depth)?;
                if let Some(pos) = self.free_spot(rng, room, &occupied, config)
                {
                    occupied.insert(pos);
                    self.item_spawns.push(Spawn {
                        kind,
                        pos,
                        depth: self.depth,
                    });
                }
            }
        }
        Ok(())
    }

    /// Sample a floor position in the room that isn't taken yet.
    fn free_spot(
        &self,
        rng: &mut GameRng,
        room: &Room,
        occupied: &HashSet<IVec2>,
        config: &DungeonConfig,
    ) -> Option<IVec2> {
        for _ in 0..config.spawn_attempts {
            let p = ivec2(
                rng.int_in(room.x, room.x + room.w - 1),
                rng.int_in(room.y, room.y + room.h - 1),
            );
            if self.grid.tile(p) == Tile::Floor
                && p != self.descent
                && !occupied.contains(&p)
            {
                return Some(p);
            }
        }
        log::warn!(
            "depth {}: no free spot found in room at {},{}, skipping spawn",
            self.depth,
            room.x,
            room.y
        );
        None
    }
}

/// Largest number of enemies a single room gets at a depth.
fn enemy_cap(depth: u32, config: &DungeonConfig) -> i32 {
    let cap = (1 + depth / 2).min(config.max_enemies_per_room.max(0) as u32);
    cap as i32
}

fn place_rooms(
    rng: &mut GameRng,
    grid: &mut TileGrid,
    config: &DungeonConfig,
) -> Vec<Room> {
    let target = rng.int_in(config.min_rooms, config.max_rooms) as usize;
    let mut rooms: Vec<Room> = Vec::new();

    for _ in 0..config.placement_attempts {
        if rooms.len() >= target {
            break;
        }

        let w = rng.int_in(config.min_room_size, config.max_room_size);
        let h = rng.int_in(config.min_room_size, config.max_room_size);
        let room = Room::new(
            rng.int_in(config.margin, config.width - config.margin - w),
            rng.int_in(config.margin, config.height - config.margin - h),
            w,
            h,
        );

        if rooms.iter().any(|r| r.intersects(&room)) {
            log::debug!("room {room:?} overlaps, skipping");
            continue;
        }

        for p in room.positions() {
            grid.set(p, Tile::Floor);
        }
        if let Some(prev) = rooms.last() {
            let horizontal_first = rng.one_chance_in(2);
            dig_corridor(grid, prev.center(), room.center(), horizontal_first);
        }
        rooms.push(room);
    }

    rooms
}

/// Dig an L-shaped corridor between two points.
///
/// Only walls are turned into floor, existing features stay.
fn dig_corridor(
    grid: &mut TileGrid,
    a: IVec2,
    b: IVec2,
    horizontal_first: bool,
) {
    let corner = if horizontal_first {
        ivec2(b.x, a.y)
    } else {
        ivec2(a.x, b.y)
    };

    for p in line(a, corner).chain(line(corner, b)) {
        if grid.tile(p) == Tile::Wall {
            grid.set(p, Tile::Floor);
        }
    }
}

/// Points of an axis-aligned line segment, both ends included.
fn line(a: IVec2, b: IVec2) -> impl Iterator<Item = IVec2> {
    let d = (b - a).signum();
    let n = (b - a).abs().max_element();
    (0..=n).map(move |i| a + d * i)
}

fn ensure_available<T: Spawnable>(
    table: &IndexMap<String, T>,
    depth: u32,
    what: &str,
) -> Result<()> {
    ensure!(
        table.values().any(|t| t.available_at(depth)),
        "no {what} types available at depth {depth}"
    );
    Ok(())
}

/// Weighted random pick of a type available at depth.
fn pick_kind<T: Spawnable>(
    rng: &mut GameRng,
    table: &IndexMap<String, T>,
    depth: u32,
) -> Result<String> {
    let candidates: Vec<_> =
        table.iter().filter(|(_, t)| t.available_at(depth)).collect();
    let (kind, _) = candidates
        .choose_weighted(rng, |(_, t)| t.spawn_weight())
        .with_context(|| format!("no spawnable types at depth {depth}"))?;
    Ok(kind.to_string())
}
