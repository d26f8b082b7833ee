use delve_core::{CellCoord, SeededRandom, Tile};
use delve_system_dungeon_generation::{generate, DungeonParams, ROOM_PADDING};
use proptest::prelude::*;

fn params_strategy() -> impl Strategy<Value = DungeonParams> {
    (20u32..70, 15u32..50, 3u32..7, 0u32..6, 1u32..16).prop_map(
        |(width, height, room_min_size, extra, max_rooms)| DungeonParams {
            width,
            height,
            room_min_size,
            room_max_size: room_min_size + extra,
            max_rooms,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn outer_border_is_always_wall(params in params_strategy(), seed in any::<u64>()) {
        let layout = generate(&params, &mut SeededRandom::from_seed(seed));
        let grid = layout.grid();
        for column in 0..params.width {
            prop_assert_eq!(grid.tile(CellCoord::new(column, 0)), Some(Tile::Wall));
            prop_assert_eq!(grid.tile(CellCoord::new(column, params.height - 1)), Some(Tile::Wall));
        }
        for row in 0..params.height {
            prop_assert_eq!(grid.tile(CellCoord::new(0, row)), Some(Tile::Wall));
            prop_assert_eq!(grid.tile(CellCoord::new(params.width - 1, row)), Some(Tile::Wall));
        }
    }

    #[test]
    fn rooms_are_carved_sized_and_apart(params in params_strategy(), seed in any::<u64>()) {
        let layout = generate(&params, &mut SeededRandom::from_seed(seed));
        prop_assert!(layout.rooms().len() <= params.max_rooms as usize);

        for (index, room) in layout.rooms().iter().enumerate() {
            let size = room.size();
            prop_assert!(size.width() >= params.room_min_size && size.width() <= params.room_max_size);
            prop_assert!(size.height() >= params.room_min_size && size.height() <= params.room_max_size);
            prop_assert!(room.cells().all(|cell| layout.grid().can_move_to(cell)));

            for other in &layout.rooms()[index + 1..] {
                prop_assert!(!room.intersects(other, ROOM_PADDING));
            }
        }
    }

    #[test]
    fn start_and_stairs_follow_room_order(params in params_strategy(), seed in any::<u64>()) {
        let layout = generate(&params, &mut SeededRandom::from_seed(seed));
        match (layout.rooms().first(), layout.rooms().last()) {
            (Some(first), Some(last)) => {
                prop_assert_eq!(layout.player_start(), Some(first.center()));
                prop_assert_eq!(layout.stairs_down(), Some(last.center()));
            }
            _ => {
                prop_assert_eq!(layout.player_start(), None);
                prop_assert_eq!(layout.stairs_down(), None);
            }
        }
    }
}
