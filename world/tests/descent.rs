use delve_core::{Command, Direction, Event};
use delve_system_pathfinding::find_path;
use delve_world::{self as world, query, GameConfig, World};

const ROUTE_BUDGET: u32 = 10_000;
const TURN_LIMIT: usize = 400;

/// Walks toward the stairs, bumping into anything standing in the way.
fn next_move(world: &World) -> Option<Direction> {
    let layout = query::layout(world);
    let from = query::player(world).cell();
    let stairs = layout.stairs_down()?;
    let route = find_path(layout.grid(), from, stairs, ROUTE_BUDGET)?;
    route
        .first()
        .and_then(|next| Direction::between(from, *next))
}

#[test]
fn walking_the_route_reaches_the_next_floor() {
    for seed in [3_u64, 17, 40] {
        let config = GameConfig {
            seed,
            ..GameConfig::default()
        };
        let mut events = Vec::new();
        let mut world = World::new(&config, &mut events).expect("valid config");

        for _ in 0..TURN_LIMIT {
            if query::floor(&world) > 1 || query::is_game_over(&world) {
                break;
            }
            let Some(direction) = next_move(&world) else {
                break;
            };
            world::apply(&mut world, Command::Move { direction }, &mut events);
        }

        assert!(
            query::floor(&world) > 1 || query::is_game_over(&world),
            "seed {seed} stalled on floor 1"
        );
        if query::floor(&world) > 1 {
            assert!(events
                .iter()
                .any(|event| matches!(event, Event::FloorEntered { floor: 2, .. })));
        }
    }
}

#[test]
fn opening_events_describe_the_first_floor() {
    let mut events = Vec::new();
    let world = World::new(&GameConfig::default(), &mut events).expect("valid config");
    let layout = query::layout(&world);

    assert_eq!(
        events.first(),
        Some(&Event::FloorEntered {
            floor: 1,
            width: layout.width(),
            height: layout.height(),
        })
    );
    assert!(events.contains(&Event::HpChanged { hp: 100, max_hp: 100 }));
    assert!(events.contains(&Event::Message {
        text: "--- Floor 1 ---".to_owned()
    }));
    assert_eq!(Some(query::player(&world).cell()), layout.player_start());
    assert!(query::visibility(&world).is_visible(query::player(&world).cell()));
}

#[test]
fn empty_slot_still_spends_a_turn() {
    let config = GameConfig {
        seed: 9,
        ..GameConfig::default()
    };
    let mut events = Vec::new();
    let mut world = World::new(&config, &mut events).expect("valid config");
    let turns_before = query::turn(&world);

    world::apply(&mut world, Command::UseItem { slot: 99 }, &mut events);
    assert_eq!(query::turn(&world), turns_before + 1);
    assert!(!query::is_game_over(&world));
}
