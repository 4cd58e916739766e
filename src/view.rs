//! Text rendering of levels and game state.

use engine::{fov, prelude::*};

/// Remains of a dead enemy.
const CORPSE: char = '&';

/// Icon of an item type, `*` for types missing from the tables.
fn item_icon(data: &Data, kind: &str) -> char {
    data.armory.get(kind).map_or('*', |i| i.kind.icon())
}

/// Icon of an enemy type, the first letter of its name.
fn enemy_icon(kind: &str) -> char {
    kind.chars().next().unwrap_or('?')
}

/// Full map of a generated level with all spawns shown.
pub fn dungeon_map(dungeon: &Dungeon, data: &Data) -> String {
    let grid = &dungeon.grid;
    let mut overlay = HashMap::default();
    for s in &dungeon.item_spawns {
        overlay.insert(s.pos, item_icon(data, &s.kind));
    }
    for s in &dungeon.enemy_spawns {
        overlay.insert(s.pos, enemy_icon(&s.kind));
    }
    overlay.insert(dungeon.arrival, '@');

    let mut ret = String::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let p = ivec2(x, y);
            ret.push(
                overlay
                    .get(&p)
                    .copied()
                    .unwrap_or_else(|| grid.tile(p).into()),
            );
        }
        ret.push('\n');
    }
    ret
}

/// Fog-of-war view of the game as the player currently knows it.
pub fn fog_view(snap: &Snapshot, data: &Data) -> String {
    let grid = snap.grid;
    let mut overlay = HashMap::default();
    for s in &snap.items {
        overlay.insert(s.pos, item_icon(data, &s.kind));
    }
    // Living enemies go on top of corpses.
    for e in snap.enemies.iter().filter(|e| !e.alive) {
        overlay.insert(e.pos, CORPSE);
    }
    for e in snap.enemies.iter().filter(|e| e.alive) {
        overlay.insert(e.pos, enemy_icon(e.kind));
    }
    overlay.insert(snap.player.pos, '@');

    let mut ret = String::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let p = ivec2(x, y);
            let c = match fov::classify(p, snap.visible, snap.explored) {
                Visibility::Visible => overlay
                    .get(&p)
                    .copied()
                    .unwrap_or_else(|| grid.tile(p).into()),
                Visibility::Explored => grid.tile(p).into(),
                Visibility::Hidden => ' ',
            };
            ret.push(c);
        }
        ret.push('\n');
    }

    let p = &snap.player;
    ret.push_str(&format!(
        "depth {}  turn {}  hp {}/{}  hunger {:.0}  level {} ({} xp)\n",
        snap.depth, snap.turn, p.hp, p.max_hp, p.hunger, p.level, p.xp
    ));
    ret
}
