//! Headless player that heads for the stairs and fights whatever is in the
//! way.

use engine::{prelude::*, Scale};

/// Pick the input for the next tick.
pub fn drive(rt: &Runtime, scale: &Scale) -> Input {
    let player = rt.player();
    let pos = player.pos();

    if rt
        .enemies()
        .iter()
        .any(|e| e.is_alive() && (e.pos - pos).is_adjacent())
    {
        return Input {
            attack: true,
            ..Default::default()
        };
    }

    if rt.grid().tile(pos) == Tile::StairsDown {
        return Input {
            interact: true,
            ..Default::default()
        };
    }

    let Some(&next) = rt.grid().find_path(pos, rt.dungeon().descent).first()
    else {
        return Input::default();
    };

    // Stick input is in the player's frame, undo the facing.
    let dir = scale.grid_to_world(next) - player.world_pos;
    Input {
        axes: Vec2::from_angle(-player.facing)
            .rotate(dir)
            .normalize_or_zero(),
        ..Default::default()
    }
}
