//! Enemies figuring out what to do on their own.

use glam::IVec2;
use util::VecExt;

use crate::{Actor, EffectKind, TileGrid};

/// What an enemy does on its turn.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Decision {
    Wait,
    Attack,
    /// Move to an adjacent tile.
    Step(IVec2),
}

/// Decide the next action of `actor` pursuing `target`.
///
/// `blocked` tells whether some other creature currently stands on a tile.
pub fn decide(
    grid: &TileGrid,
    actor: &Actor,
    target: &Actor,
    blocked: impl Fn(IVec2) -> bool,
) -> Decision {
    if !actor.is_alive() || target.effects.has(EffectKind::Invisibility) {
        return Decision::Wait;
    }

    if (target.pos - actor.pos).is_adjacent() {
        return Decision::Attack;
    }

    match grid.find_path(actor.pos, target.pos).first() {
        Some(&step) if !blocked(step) => Decision::Step(step),
        Some(&step) => {
            log::debug!("{} at {} blocked at {step}", actor.kind, actor.pos);
            Decision::Wait
        }
        None => Decision::Wait,
    }
}
