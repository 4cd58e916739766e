use engine::{prelude::*, DungeonConfig, TurnState};
use pretty_assertions::assert_eq;
use quickcheck_macros::quickcheck;

fn generate(seed: u32, depth: u32) -> Dungeon {
    Dungeon::generate(seed, depth, &DungeonConfig::default(), Data::get())
        .unwrap()
}

#[test]
fn seed_42_first_level() {
    let config = DungeonConfig::default();
    let d = generate(42, 1);

    let n = d.rooms.len() as i32;
    assert!(
        (config.min_rooms..=config.max_rooms).contains(&n),
        "{n} rooms"
    );
    let last = d.rooms.last().unwrap();
    assert!(last.contains(d.descent));
    assert_eq!(d.grid.tile(d.descent), Tile::StairsDown);
    assert!(d
        .enemy_spawns
        .iter()
        .chain(&d.item_spawns)
        .all(|s| s.pos != d.descent));
}

#[quickcheck]
fn generation_is_deterministic(seed: u32, depth: u8) -> bool {
    let depth = depth as u32 % 12 + 1;
    generate(seed, depth) == generate(seed, depth)
}

#[quickcheck]
fn rooms_never_overlap(seed: u32) -> bool {
    let d = generate(seed, 1);
    d.rooms.iter().enumerate().all(|(i, a)| {
        d.rooms[i + 1..].iter().all(|b| !a.intersects(b))
    })
}

#[quickcheck]
fn every_floor_tile_is_connected(seed: u32) -> bool {
    let d = generate(seed, 2);
    let reached: HashSet<IVec2> = util::dijkstra_map(
        |&p| d.grid.walk_neighbors(p).collect::<Vec<_>>(),
        [d.arrival],
    )
    .map(|(p, _)| p)
    .collect();

    let connected = d
        .grid
        .positions()
        .filter(|&p| d.grid.is_walkable(p))
        .all(|p| reached.contains(&p));
    connected
}

#[test]
fn turn_advance_resets_overshoot() {
    let mut rt = Runtime::new(7, Config::default(), Data::get().clone())
        .unwrap();
    let hunger = rt.player().hunger;
    let rate = rt.config().hunger_rate;

    // Walk back and forth until at least one turn is due, movement may
    // overshoot the threshold by a lot in one large step.
    let mut input = Input {
        axes: vec2(1.0, 0.0),
        ..Default::default()
    };
    for _ in 0..20 {
        if rt.turn() > 0 {
            break;
        }
        rt.step(&input, 0.3).unwrap();
        input.axes = -input.axes;
    }

    assert_eq!(rt.turn(), 1);
    assert_eq!(rt.player().hunger, hunger - rate);
    assert_eq!(rt.clock().moved, 0.0);
    assert_eq!(rt.check_turn_advancement(), TurnState::Idle);
}

#[test]
fn speed_effect_doubles_threshold() {
    let mut rt = Runtime::new(3, Config::default(), Data::get().clone())
        .unwrap();
    rt.player_mut()
        .actor
        .effects
        .add(StatusEffect::new(EffectKind::Speed, 50));
    let threshold = rt.config().move_threshold;

    let mut input = Input {
        axes: vec2(1.0, 0.0),
        ..Default::default()
    };
    let mut peak: f32 = 0.0;
    for _ in 0..1000 {
        if rt.turn() > 0 {
            break;
        }
        let before = rt.clock().moved;
        rt.step(&input, 0.05).unwrap();
        if rt.turn() == 0 && rt.clock().moved == before {
            // Hit something, turn around.
            input.axes = -input.axes;
        }
        peak = peak.max(rt.clock().moved);
    }

    assert_eq!(rt.turn(), 1);
    // Without speed the turn would have passed at the base threshold.
    assert!(peak > threshold, "peak movement {peak}");
}

#[test]
fn descend_needs_stairs() {
    let mut rt = Runtime::new(42, Config::default(), Data::get().clone())
        .unwrap();
    let events = rt.subscribe();
    assert!(!rt.descend().unwrap().is_done());

    let stairs = rt.dungeon().descent;
    let scale = rt.config().scale().unwrap();
    rt.player_mut().teleport(&scale, stairs);
    assert!(rt.descend().unwrap().is_done());
    assert_eq!(rt.depth(), 2);
    assert_eq!(rt.grid().tile(rt.player().pos()), Tile::StairsUp);
    assert_eq!(events.try_recv(), Ok(Event::Descended { depth: 2 }));
}

#[test]
fn replays_are_identical() {
    fn play(seed: u32) -> (Vec<Event>, String) {
        let data = Data::get().clone();
        let mut rt = Runtime::new(seed, Config::default(), data).unwrap();
        let events = rt.subscribe();
        for i in 0..400 {
            let angle = (i / 25) as f32;
            let input = Input {
                axes: Vec2::from_angle(angle),
                attack: i % 3 == 0,
                ..Default::default()
            };
            rt.step(&input, 0.1).unwrap();
        }
        let log = events.try_iter().collect();
        let state = format!("{:?} {:?}", rt.player(), rt.enemies());
        (log, state)
    }

    assert_eq!(play(99), play(99));
}
