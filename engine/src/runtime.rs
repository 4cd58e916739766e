use std::f32::consts::TAU;

use anyhow::ensure;
use glam::{IVec2, Vec2};
use util::{level_seed, GameRng, VecExt};

use crate::{
    ai::{self, Decision},
    combat::{self, AttackResult},
    fov::{self, TileSet},
    msg::Listeners,
    Actor, Config, Data, Dungeon, EffectKind, Event, Explored, Outcome, Player,
    Receiver, Result, Scale, ScenarioStatus, Spawn, Tile, TileGrid, TurnClock,
    TurnState,
};

/// Input state for one tick, supplied by the input adapter.
#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct Input {
    /// Movement stick, forward is +x in the player's frame.
    pub axes: Vec2,
    /// Rotation stick, positive turns counterclockwise.
    pub rotation: f32,
    pub attack: bool,
    pub interact: bool,
}

/// Main data container for one run of the game.
pub struct Runtime {
    config: Config,
    data: Data,
    scale: Scale,
    seed: u32,
    /// Combat and AI randomness, level generation has its own streams.
    rng: GameRng,
    dungeon: Dungeon,
    player: Player,
    enemies: Vec<Actor>,
    items: Vec<Spawn>,
    clock: TurnClock,
    visible: TileSet,
    explored: Explored,
    listeners: Listeners,
}

impl Runtime {
    /// Start a new run on the first dungeon level.
    pub fn new(seed: u32, config: Config, data: Data) -> Result<Self> {
        let dungeon = Dungeon::generate(seed, 1, &config.dungeon, &data)?;
        Runtime::from_dungeon(seed, config, data, dungeon)
    }

    /// Start a run on a prebuilt level.
    pub fn from_dungeon(
        seed: u32,
        config: Config,
        data: Data,
        dungeon: Dungeon,
    ) -> Result<Self> {
        config.validate()?;
        let scale = config.scale()?;
        ensure!(
            dungeon.grid.is_walkable(dungeon.arrival),
            "level arrival point {} is not walkable",
            dungeon.arrival
        );
        let enemies = spawn_enemies(&dungeon, &data)?;

        let mut ret = Runtime {
            player: Player::new(&config, &scale, dungeon.arrival),
            items: dungeon.item_spawns.clone(),
            enemies,
            dungeon,
            config,
            data,
            scale,
            seed,
            // Depth 0 is never generated, use its stream for the run.
            rng: GameRng::new(level_seed(seed, 0)),
            clock: Default::default(),
            visible: Default::default(),
            explored: Default::default(),
            listeners: Default::default(),
        };
        ret.update_visibility();
        Ok(ret)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn grid(&self) -> &TileGrid {
        &self.dungeon.grid
    }

    pub fn depth(&self) -> u32 {
        self.dungeon.depth
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player access for the inventory layer.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Enemies of the current level in processing order, dead ones
    /// included.
    pub fn enemies(&self) -> &[Actor] {
        &self.enemies
    }

    /// Items lying on the floor.
    pub fn items(&self) -> &[Spawn] {
        &self.items
    }

    pub fn clock(&self) -> &TurnClock {
        &self.clock
    }

    pub fn turn(&self) -> u64 {
        self.clock.turn
    }

    pub fn visible(&self) -> &TileSet {
        &self.visible
    }

    pub fn explored(&self) -> &Explored {
        &self.explored
    }

    /// Register a new event listener.
    pub fn subscribe(&mut self) -> Receiver {
        self.listeners.subscribe()
    }

    pub fn status(&self) -> ScenarioStatus {
        if self.player.actor.is_alive() {
            ScenarioStatus::Ongoing
        } else {
            ScenarioStatus::Lost
        }
    }

    /// Living enemy at position.
    pub fn enemy_at(&self, p: IVec2) -> Option<&Actor> {
        self.enemies.iter().find(|e| e.is_alive() && e.pos == p)
    }

    /// Update the game state by one tick of `dt` seconds.
    pub fn step(&mut self, input: &Input, dt: f32) -> Result<()> {
        ensure!(dt.is_finite() && dt >= 0.0, "invalid time step {dt}");
        ensure!(
            input.axes.is_finite() && input.rotation.is_finite(),
            "non-finite input {input:?}"
        );

        if !self.player.actor.is_alive() {
            return Ok(());
        }

        self.player.facing = (self.player.facing
            + self.config.turn_speed * input.rotation * dt)
            .rem_euclid(TAU);

        let mut axes = input.axes;
        let len = axes.length();
        if len < self.config.deadzone {
            axes = Vec2::ZERO;
        } else if len > 1.0 {
            axes /= len;
        }

        if axes != Vec2::ZERO && dt > 0.0 {
            let dir = Vec2::from_angle(self.player.facing).rotate(axes);
            let moved = self.move_player(dir * self.config.move_speed * dt)?;
            self.clock.accumulate(moved);
        }

        if input.attack && self.player_attack() {
            self.advance_turn();
        }

        if input.interact {
            if let Outcome::Refused(reason) = self.descend()? {
                log::debug!("can't descend: {reason}");
            }
        }

        self.update_visibility();

        if self.check_turn_advancement() == TurnState::Advancing {
            self.advance_turn();
        }
        Ok(())
    }

    /// Is the player's movement enough for a turn to pass.
    pub fn check_turn_advancement(&self) -> TurnState {
        let threshold = TurnClock::threshold(
            self.config.move_threshold,
            &self.player.actor.effects,
        );
        self.clock.check(threshold)
    }

    /// Run a complete game turn.
    pub fn advance_turn(&mut self) {
        self.clock.advance();
        let turn = self.clock.turn;

        if self.player.decay_hunger(self.config.hunger_rate) {
            self.player.actor.take_damage(1);
            self.listeners.send(Event::Starving);
            if !self.player.actor.is_alive() {
                log::info!("player starved to death on turn {turn}");
            }
        }

        for kind in self.player.actor.effects.update() {
            self.listeners.send(Event::EffectExpired {
                target: self.player.actor.kind.clone(),
                kind,
            });
        }
        for e in self.enemies.iter_mut().filter(|e| e.is_alive()) {
            for kind in e.effects.update() {
                self.listeners.send(Event::EffectExpired {
                    target: e.kind.clone(),
                    kind,
                });
            }
        }

        self.enemy_turns();

        self.listeners.send(Event::Footstep { turn });
        self.update_visibility();
    }

    fn enemy_turns(&mut self) {
        for i in 0..self.enemies.len() {
            if !self.player.actor.is_alive() {
                break;
            }
            if !self.enemies[i].is_alive() {
                continue;
            }

            let player_pos = self.player.pos();
            let enemies = &self.enemies;
            let decision = ai::decide(
                &self.dungeon.grid,
                &enemies[i],
                &self.player.actor,
                |p| {
                    p == player_pos
                        || enemies.iter().any(|e| e.is_alive() && e.pos == p)
                },
            );

            match decision {
                Decision::Wait => {}
                Decision::Step(p) => self.enemies[i].pos = p,
                Decision::Attack => {
                    let result = combat::attack(
                        &mut self.rng,
                        &self.enemies[i],
                        &mut self.player.actor,
                    );
                    let target = self.player.actor.kind.clone();
                    self.report_attack(&result, target);
                    if result.killed {
                        log::info!(
                            "player was killed by {} on turn {}",
                            self.enemies[i].kind,
                            self.clock.turn
                        );
                    }
                }
            }
        }
    }

    /// Attack the first living enemy next to the player, return whether
    /// there was one.
    fn player_attack(&mut self) -> bool {
        let pos = self.player.pos();
        let Some(i) = self
            .enemies
            .iter()
            .position(|e| e.is_alive() && (e.pos - pos).is_adjacent())
        else {
            log::debug!("no enemy in reach at {pos}");
            return false;
        };

        let result = combat::attack(
            &mut self.rng,
            &self.player.actor,
            &mut self.enemies[i],
        );
        let target = self.enemies[i].kind.clone();
        self.report_attack(&result, target);

        if result.killed {
            let xp = self.enemies[i].xp;
            for level in self.player.gain_xp(xp) {
                self.listeners.send(Event::LevelUp { level });
            }
        }
        true
    }

    fn report_attack(&mut self, result: &AttackResult, target: String) {
        if !result.hit {
            self.listeners.send(Event::Miss { target });
            return;
        }
        if result.blocked {
            self.listeners.send(Event::Blocked { target });
            return;
        }
        self.listeners.send(Event::Hit {
            target: target.clone(),
            damage: result.damage,
            critical: result.critical,
        });
        if result.killed {
            self.listeners.send(Event::Kill { target });
        }
    }

    /// Move the player by a world space offset, sliding along walls.
    ///
    /// Return the distance actually moved.
    fn move_player(&mut self, delta: Vec2) -> Result<f32> {
        // Move in sub-tile increments so fast moves can't skip over walls.
        let max_step = self.scale.tile_size() * 0.5;
        let n = (delta.length() / max_step).ceil().max(1.0) as u32;
        let step = delta / n as f32;

        let mut total = 0.0;
        for _ in 0..n {
            let moved = self.slide(step)?;
            if moved == 0.0 {
                break;
            }
            total += moved;
        }
        Ok(total)
    }

    fn slide(&mut self, step: Vec2) -> Result<f32> {
        let from = self.player.world_pos;
        for delta in [step, Vec2::new(step.x, 0.0), Vec2::new(0.0, step.y)] {
            if delta == Vec2::ZERO {
                continue;
            }
            let to = from + delta;
            let cell = self.scale.world_to_grid(to)?;
            if self.can_enter(cell) {
                self.player.world_pos = to;
                self.player.actor.pos = cell;
                return Ok(delta.length());
            }
        }
        Ok(0.0)
    }

    fn can_enter(&self, p: IVec2) -> bool {
        self.dungeon.grid.is_walkable(p) && self.enemy_at(p).is_none()
    }

    /// Go down the stairs the player is standing on.
    pub fn descend(&mut self) -> Result<Outcome> {
        if !self.player.actor.is_alive() {
            return Ok(Outcome::refused("the dead can't climb stairs"));
        }
        if self.dungeon.grid.tile(self.player.pos()) != Tile::StairsDown {
            return Ok(Outcome::refused("not standing on stairs down"));
        }

        let depth = self.dungeon.depth + 1;
        let dungeon = Dungeon::generate(
            self.seed,
            depth,
            &self.config.dungeon,
            &self.data,
        )?;
        self.enemies = spawn_enemies(&dungeon, &self.data)?;
        self.items = dungeon.item_spawns.clone();
        self.player.teleport(&self.scale, dungeon.arrival);
        self.dungeon = dungeon;
        self.explored = Default::default();
        self.update_visibility();

        log::info!("descended to depth {depth} on turn {}", self.clock.turn);
        self.listeners.send(Event::Descended { depth });
        Ok(Outcome::Done(()))
    }

    /// Floor items the player can reach, with their indices.
    pub fn nearby_items(&self) -> impl Iterator<Item = (usize, &Spawn)> {
        let pos = self.player.pos();
        self.items
            .iter()
            .enumerate()
            .filter(move |(_, s)| within_reach(pos, s.pos))
    }

    /// Remove an item from the floor for the inventory layer.
    pub fn take_item(&mut self, index: usize) -> Outcome<Spawn> {
        let Some(item) = self.items.get(index) else {
            return Outcome::refused(format!("no item {index}"));
        };
        if !within_reach(self.player.pos(), item.pos) {
            return Outcome::refused(format!("{} is out of reach", item.kind));
        }
        Outcome::Done(self.items.remove(index))
    }

    /// What the renderer gets to see.
    pub fn snapshot(&self) -> Snapshot<'_> {
        let player = &self.player;
        Snapshot {
            grid: &self.dungeon.grid,
            player: PlayerView {
                pos: player.pos(),
                world_pos: player.world_pos,
                facing: player.facing,
                hp: player.actor.hp(),
                max_hp: player.actor.max_hp,
                hunger: player.hunger,
                level: player.level,
                xp: player.xp,
                alive: player.actor.is_alive(),
            },
            enemies: self
                .enemies
                .iter()
                .filter(|e| fov::is_visible(&self.visible, e.pos))
                .map(|e| EnemyView {
                    kind: &e.kind,
                    pos: e.pos,
                    alive: e.is_alive(),
                })
                .collect(),
            items: self
                .items
                .iter()
                .filter(|s| fov::is_visible(&self.visible, s.pos))
                .collect(),
            visible: &self.visible,
            explored: &self.explored,
            turn: self.clock.turn,
            depth: self.dungeon.depth,
        }
    }

    fn update_visibility(&mut self) {
        let effects = &self.player.actor.effects;
        let radius = self.config.sight_radius
            + effects.magnitude(EffectKind::Sight) as f32;
        self.visible = fov::visible_tiles(
            &self.dungeon.grid,
            self.player.pos(),
            radius,
            &self.scale,
        );
        self.explored.update(&self.visible);
    }
}

/// Read-only view of the game state for rendering.
#[derive(Clone, Debug)]
pub struct Snapshot<'a> {
    pub grid: &'a TileGrid,
    pub player: PlayerView,
    /// Enemies standing on visible tiles.
    pub enemies: Vec<EnemyView<'a>>,
    /// Items lying on visible tiles.
    pub items: Vec<&'a Spawn>,
    pub visible: &'a TileSet,
    pub explored: &'a Explored,
    pub turn: u64,
    pub depth: u32,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PlayerView {
    pub pos: IVec2,
    pub world_pos: Vec2,
    pub facing: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub hunger: f32,
    pub level: u32,
    pub xp: i32,
    pub alive: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct EnemyView<'a> {
    pub kind: &'a str,
    pub pos: IVec2,
    pub alive: bool,
}

/// Item pickup reach, includes diagonals.
fn within_reach(a: IVec2, b: IVec2) -> bool {
    a == b || (b - a).is_adjacent_8()
}

fn spawn_enemies(dungeon: &Dungeon, data: &Data) -> Result<Vec<Actor>> {
    dungeon
        .enemy_spawns
        .iter()
        .map(|s| Actor::spawn(&s.kind, s.pos, s.depth, data))
        .collect()
}

#[cfg(test)]
mod tests {
    use glam::ivec2;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Dice, Room, StatusEffect};

    /// Small hand-built level, player starts at (1, 1), stairs at (7, 3).
    fn fixture(
        enemies: &[(&str, IVec2)],
        items: &[(&str, IVec2)],
    ) -> Runtime {
        let grid: TileGrid = "
            #########
            #.......#
            #.......#
            #......>#
            #########"
            .parse()
            .unwrap();
        let spawns = |list: &[(&str, IVec2)]| {
            list.iter()
                .map(|&(kind, pos)| Spawn {
                    kind: kind.into(),
                    pos,
                    depth: 1,
                })
                .collect()
        };
        let dungeon = Dungeon {
            grid,
            rooms: vec![Room::new(1, 1, 7, 3)],
            descent: ivec2(7, 3),
            arrival: ivec2(1, 1),
            enemy_spawns: spawns(enemies),
            item_spawns: spawns(items),
            seed: 1,
            depth: 1,
        };
        let data = Data::get().clone();
        Runtime::from_dungeon(1, Config::default(), data, dungeon).unwrap()
    }

    fn walk(axes: Vec2) -> Input {
        Input {
            axes,
            ..Default::default()
        }
    }

    #[test]
    fn turn_advance_is_atomic() {
        let mut rt = fixture(&[], &[]);
        rt.clock.moved = 17.5;
        assert_eq!(rt.check_turn_advancement(), TurnState::Advancing);
        rt.advance_turn();
        assert_eq!(rt.turn(), 1);
        assert_eq!(rt.player.hunger, 99.0);
        assert_eq!(rt.clock.moved, 0.0);
        assert_eq!(rt.check_turn_advancement(), TurnState::Idle);
    }

    #[test]
    fn speed_needs_more_movement() {
        let mut rt = fixture(&[], &[]);
        rt.player
            .actor
            .effects
            .add(StatusEffect::new(EffectKind::Speed, 5));
        rt.clock.moved = 2.0;
        assert_eq!(rt.check_turn_advancement(), TurnState::Idle);
        rt.clock.moved = 4.0;
        assert_eq!(rt.check_turn_advancement(), TurnState::Advancing);
    }

    #[test]
    fn walking() {
        let mut rt = fixture(&[], &[]);
        assert_eq!(rt.player.world_pos, Vec2::new(3.0, 3.0));
        rt.step(&walk(Vec2::X), 0.25).unwrap();
        assert_eq!(rt.player.world_pos, Vec2::new(4.0, 3.0));
        assert_eq!(rt.player.pos(), ivec2(2, 1));
        assert_eq!(rt.clock.moved, 1.0);
        assert_eq!(rt.turn(), 0);

        rt.step(&walk(Vec2::X), 0.25).unwrap();
        assert_eq!(rt.turn(), 1);
        assert_eq!(rt.clock.moved, 0.0);
    }

    #[test]
    fn walls_block() {
        let mut rt = fixture(&[], &[]);
        // Move west into the wall, only the last world unit of the tile is
        // free.
        rt.step(&walk(-Vec2::X), 1.0).unwrap();
        assert_eq!(rt.player.pos(), ivec2(1, 1));
        assert!(rt.player.world_pos.x >= 2.0);
        assert!(rt.clock.moved <= 1.0);
    }

    #[test]
    fn slides_along_walls() {
        let mut rt = fixture(&[], &[]);
        // North-east, north is wall so slide east.
        rt.step(&walk(Vec2::new(1.0, -1.0)), 0.5).unwrap();
        assert!(rt.player.world_pos.x > 3.0);
        assert_eq!(rt.player.pos().y, 1);
    }

    #[test]
    fn deadzone() {
        let mut rt = fixture(&[], &[]);
        rt.step(&walk(Vec2::new(0.1, 0.0)), 1.0).unwrap();
        assert_eq!(rt.player.world_pos, Vec2::new(3.0, 3.0));
        assert_eq!(rt.clock.moved, 0.0);
    }

    #[test]
    fn rotation_turns_movement() {
        let mut rt = fixture(&[], &[]);
        let quarter = std::f32::consts::FRAC_PI_2 / rt.config.turn_speed;
        rt.step(
            &Input {
                rotation: 1.0,
                ..Default::default()
            },
            quarter,
        )
        .unwrap();
        // Forward is now +y.
        rt.step(&walk(Vec2::X), 0.25).unwrap();
        assert!((rt.player.world_pos - Vec2::new(3.0, 4.0)).length() < 1e-4);
    }

    #[test]
    fn bad_steps() {
        let mut rt = fixture(&[], &[]);
        assert!(rt.step(&Input::default(), -1.0).is_err());
        assert!(rt.step(&Input::default(), f32::NAN).is_err());
        assert!(rt.step(&walk(Vec2::new(f32::NAN, 0.0)), 0.1).is_err());
    }

    #[test]
    fn enemies_block_movement() {
        let mut rt = fixture(&[("rat", ivec2(2, 1))], &[]);
        rt.step(&walk(Vec2::X), 1.0).unwrap();
        assert_eq!(rt.player.pos(), ivec2(1, 1));
    }

    #[test]
    fn killing_grants_xp() {
        let mut rt =
            fixture(&[("rat", ivec2(2, 1)), ("bat", ivec2(1, 2))], &[]);
        let events = rt.subscribe();
        rt.player.actor.weapon = Some(Dice::new(1, 1, 500));
        rt.player.actor.attack_bonus = 100;
        let xp = rt.enemies[0].xp;

        rt.step(
            &Input {
                attack: true,
                ..Default::default()
            },
            0.1,
        )
        .unwrap();

        // First adjacent enemy in sequence order got it.
        assert!(!rt.enemies[0].is_alive());
        assert!(rt.enemies[1].is_alive());
        assert_eq!(rt.player.xp, xp);
        assert_eq!(rt.turn(), 1);

        let events: Vec<Event> = events.try_iter().collect();
        assert!(events.contains(&Event::Kill {
            target: "rat".into()
        }));
        assert!(events.contains(&Event::Footstep { turn: 1 }));
    }

    #[test]
    fn attacking_air_takes_no_turn() {
        let mut rt = fixture(&[], &[]);
        rt.step(
            &Input {
                attack: true,
                ..Default::default()
            },
            0.1,
        )
        .unwrap();
        assert_eq!(rt.turn(), 0);
    }

    #[test]
    fn enemies_approach_and_attack() {
        let mut rt = fixture(&[("goblin", ivec2(5, 1))], &[]);
        let events = rt.subscribe();
        rt.advance_turn();
        assert_eq!(rt.enemies[0].pos, ivec2(4, 1));
        rt.advance_turn();
        rt.advance_turn();
        assert_eq!(rt.enemies[0].pos, ivec2(2, 1));

        rt.advance_turn();
        let attacked = events.try_iter().any(|e| {
            matches!(
                e,
                Event::Hit { ref target, .. }
                | Event::Miss { ref target }
                | Event::Blocked { ref target } if target == "player"
            )
        });
        assert!(attacked);
    }

    #[test]
    fn invisible_player_is_left_alone() {
        let mut rt = fixture(&[("goblin", ivec2(5, 1))], &[]);
        rt.player
            .actor
            .effects
            .add(StatusEffect::new(EffectKind::Invisibility, 10));
        rt.advance_turn();
        assert_eq!(rt.enemies[0].pos, ivec2(5, 1));
    }

    #[test]
    fn enemies_dont_stack() {
        let mut rt =
            fixture(&[("rat", ivec2(4, 1)), ("rat", ivec2(5, 1))], &[]);
        // The rear rat's only short path goes through the front rat.
        rt.player.teleport(&rt.scale, ivec2(3, 1));
        rt.player.actor.effects.add(StatusEffect::new(EffectKind::Stone, 9));
        rt.advance_turn();
        assert_eq!(rt.enemies[0].pos, ivec2(4, 1));
        assert_eq!(rt.enemies[1].pos, ivec2(5, 1));
    }

    #[test]
    fn starvation() {
        let mut rt = fixture(&[], &[]);
        let events = rt.subscribe();
        rt.player.hunger = 0.0;
        let hp = rt.player.actor.hp();
        rt.advance_turn();
        assert_eq!(rt.player.actor.hp(), hp - 1);
        assert_eq!(events.try_recv(), Ok(Event::Starving));
    }

    #[test]
    fn effects_count_down_once_per_turn() {
        let mut rt = fixture(&[("rat", ivec2(6, 3))], &[]);
        let events = rt.subscribe();
        rt.player
            .actor
            .effects
            .add(StatusEffect::new(EffectKind::Strength, 1));
        rt.enemies[0].effects.add(StatusEffect::new(EffectKind::Stone, 2));
        rt.advance_turn();
        assert!(!rt.player.actor.effects.has(EffectKind::Strength));
        let stone = rt.enemies[0].effects.get(EffectKind::Stone).unwrap();
        assert_eq!(stone.turns_remaining, 1);
        assert_eq!(
            events.try_recv(),
            Ok(Event::EffectExpired {
                target: "player".into(),
                kind: EffectKind::Strength
            })
        );
    }

    #[test]
    fn descending() {
        let mut rt = fixture(&[], &[]);
        let events = rt.subscribe();
        assert!(!rt.descend().unwrap().is_done());

        rt.advance_turn();
        rt.player.teleport(&rt.scale, ivec2(7, 3));
        rt.player.actor.effects.add(StatusEffect::new(EffectKind::Sight, 9));
        assert!(rt.descend().unwrap().is_done());

        assert_eq!(rt.depth(), 2);
        assert_eq!(rt.turn(), 1);
        assert_eq!(rt.player.pos(), rt.dungeon.arrival);
        assert_eq!(rt.grid().tile(rt.player.pos()), Tile::StairsUp);
        assert!(rt.player.actor.effects.has(EffectKind::Sight));
        assert!(rt.explored.len() == rt.visible.len());
        assert!(events.try_iter().any(|e| e == Event::Descended { depth: 2 }));
    }

    #[test]
    fn interact_on_stairs() {
        let mut rt = fixture(&[], &[]);
        rt.player.teleport(&rt.scale, ivec2(7, 3));
        rt.step(
            &Input {
                interact: true,
                ..Default::default()
            },
            0.1,
        )
        .unwrap();
        assert_eq!(rt.depth(), 2);
    }

    #[test]
    fn item_reach() {
        let mut rt = fixture(
            &[],
            &[("ration", ivec2(2, 2)), ("dagger", ivec2(4, 2))],
        );
        let nearby: Vec<usize> = rt.nearby_items().map(|(i, _)| i).collect();
        assert_eq!(nearby, vec![0]);

        assert!(!rt.take_item(1).is_done());
        assert!(!rt.take_item(5).is_done());
        let Outcome::Done(item) = rt.take_item(0) else {
            panic!("diagonal item not reachable");
        };
        assert_eq!(item.kind, "ration");
        assert_eq!(rt.items().len(), 1);
    }

    #[test]
    fn snapshot_hides_unseen() {
        let mut rt =
            fixture(&[("rat", ivec2(7, 1)), ("bat", ivec2(2, 2))], &[]);
        rt.config.sight_radius = 4.0;
        rt.update_visibility();

        let snap = rt.snapshot();
        let kinds: Vec<&str> = snap.enemies.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["bat"]);
        assert_eq!(snap.player.pos, ivec2(1, 1));
        assert_eq!(snap.player.hp, 30);
        assert_eq!(snap.depth, 1);
        assert!(snap.explored.len() >= snap.visible.len());
    }

    #[test]
    fn sight_effect_widens_view() {
        let mut rt = fixture(&[], &[]);
        // One tile of sight.
        rt.config.sight_radius = rt.config.tile_size;
        rt.update_visibility();
        assert_eq!(rt.visible().len(), 5);
        assert!(!fov::is_visible(rt.visible(), ivec2(4, 1)));

        rt.player
            .actor
            .effects
            .add(StatusEffect::with_magnitude(EffectKind::Sight, 5, 4));
        rt.update_visibility();
        assert!(rt.visible().len() > 5);
        assert!(fov::is_visible(rt.visible(), ivec2(4, 1)));
        assert!(!fov::is_visible(rt.visible(), ivec2(7, 1)));
    }

    #[test]
    fn prebuilt_level_checks_config() {
        let dungeon = fixture(&[], &[]).dungeon.clone();
        for config in [
            Config {
                move_threshold: 0.0,
                ..Default::default()
            },
            Config {
                hunger_rate: -1.0,
                ..Default::default()
            },
        ] {
            let data = Data::get().clone();
            let rt = Runtime::from_dungeon(1, config, data, dungeon.clone());
            assert!(rt.is_err());
        }
    }

    #[test]
    fn dead_player_stops() {
        let mut rt = fixture(&[], &[]);
        rt.player.actor.take_damage(1000);
        assert_eq!(rt.status(), ScenarioStatus::Lost);
        rt.step(&walk(Vec2::X), 0.25).unwrap();
        assert_eq!(rt.player.world_pos, Vec2::new(3.0, 3.0));
        assert!(!rt.descend().unwrap().is_done());
    }

    #[test]
    fn new_run() {
        let rt = Runtime::new(42, Config::default(), Data::get().clone())
            .unwrap();
        assert_eq!(rt.depth(), 1);
        assert_eq!(rt.player.pos(), rt.dungeon.arrival);
        assert_eq!(rt.enemies.len(), rt.dungeon.enemy_spawns.len());
        assert_eq!(rt.status(), ScenarioStatus::Ongoing);
        assert!(fov::is_visible(rt.visible(), rt.player.pos()));
    }
}
