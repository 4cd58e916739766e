pub use crate::{
    Actor, Config, Data, Dungeon, EffectKind, Event, Input, Outcome, Runtime,
    ScenarioStatus, Snapshot, StatusEffect, Tile, TileGrid, Visibility,
};
pub use glam::{ivec2, vec2, IVec2, Vec2};
pub use util::{GameRng, HashMap, HashSet, IndexMap, RngExt, VecExt};
