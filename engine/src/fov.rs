//! Logic for revealing unexplored dungeon terrain.

use derive_more::Deref;
use glam::{ivec2, IVec2};
use util::{pack, HashSet, VecExt};

use crate::{Scale, TileGrid};

/// Set of grid positions as packed integer keys.
pub type TileSet = HashSet<u32>;

/// Fog-of-war state of a tile.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Visibility {
    Visible,
    Explored,
    Hidden,
}

/// Portions of the level the player has seen.
///
/// Only grows while the level lives.
#[derive(Clone, Default, Eq, PartialEq, Debug, Deref)]
pub struct Explored(TileSet);

impl Explored {
    pub fn update(&mut self, visible: &TileSet) {
        self.0.extend(visible.iter().copied());
    }

    pub fn contains(&self, p: IVec2) -> bool {
        key(p).is_some_and(|k| self.0.contains(&k))
    }
}

/// Tiles within `radius` world units of grid position `pos`.
///
/// Radius based, walls do not block sight.
pub fn visible_tiles(
    grid: &TileGrid,
    pos: IVec2,
    radius: f32,
    scale: &Scale,
) -> TileSet {
    let mut ret = TileSet::default();

    let r = radius / scale.tile_size();
    if r.is_nan() || r < 0.0 {
        return ret;
    }
    let span = r.min((grid.width() + grid.height()) as f32).floor() as i32;

    let min = (pos - IVec2::splat(span)).max(IVec2::ZERO);
    let max = (pos + IVec2::splat(span))
        .min(ivec2(grid.width() - 1, grid.height() - 1));

    for y in min.y..=max.y {
        for x in min.x..=max.x {
            let p = ivec2(x, y);
            if (p - pos).euclid_len() <= r {
                ret.insert(pack(p));
            }
        }
    }
    ret
}

/// Is grid position in a visibility set.
pub fn is_visible(visible: &TileSet, p: IVec2) -> bool {
    key(p).is_some_and(|k| visible.contains(&k))
}

/// Fog-of-war state of a position, visible takes priority over explored.
pub fn classify(p: IVec2, visible: &TileSet, explored: &Explored) -> Visibility {
    if is_visible(visible, p) {
        Visibility::Visible
    } else if explored.contains(p) {
        Visibility::Explored
    } else {
        Visibility::Hidden
    }
}

/// Packed key of a position, none for positions that can't be packed.
fn key(p: IVec2) -> Option<u32> {
    let range = 0..=util::MAX_PACKED_COORD;
    (range.contains(&p.x) && range.contains(&p.y)).then(|| pack(p))
}
