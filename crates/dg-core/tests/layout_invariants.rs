use dg_core::dungeon::{Direction, Grid, Position, RoomVariant};
use dg_core::{DungeonRng, GenerationConfig, generate};
use proptest::prelude::*;
use strum::IntoEnumIterator;

fn check_boundaries(grid: &Grid) {
    let last_row = grid.height() - 1;
    let last_col = grid.width() - 1;
    for (pos, room) in grid.iter() {
        if pos.row == 0 {
            assert!(!room.contains_exit(Direction::North), "{room} at {pos}");
        }
        if pos.row == last_row {
            assert!(!room.contains_exit(Direction::South), "{room} at {pos}");
        }
        if pos.col == 0 {
            assert!(!room.contains_exit(Direction::West), "{room} at {pos}");
        }
        if pos.col == last_col {
            assert!(!room.contains_exit(Direction::East), "{room} at {pos}");
        }
    }
}

fn check_reciprocity(grid: &Grid) {
    for (pos, room) in grid.iter() {
        if room.is_empty() {
            continue;
        }
        for dir in Direction::iter() {
            let Some(next) = grid.neighbor(pos, dir) else {
                continue;
            };
            let other = grid[next];
            if other.is_empty() {
                continue;
            }
            assert_eq!(
                room.contains_exit(dir),
                other.contains_exit(dir.opposite()),
                "{room} at {pos} vs {other} at {next}"
            );
        }
    }
}

#[test]
fn test_quarter_rule_scenario() {
    let config = GenerationConfig::new(10, 10).with_empty_percent(25);
    assert_eq!(config.max_empty_cells(), 25);

    let mut rng = DungeonRng::new(42);
    let result = generate(&config, &mut rng);

    assert!(result.grid.count_empty() <= 25);
    check_boundaries(&result.grid);
    check_reciprocity(&result.grid);
}

#[test]
fn test_every_populated_room_is_reachable_from_start() {
    let config = GenerationConfig::new(12, 14);
    let result = generate(&config, &mut DungeonRng::new(5));
    let grid = &result.grid;

    let mut seen = vec![false; grid.len()];
    let mut stack = vec![result.start];
    seen[result.start.row * grid.width() + result.start.col] = true;
    while let Some(pos) = stack.pop() {
        for dir in grid[pos].exits().directions() {
            let next = grid.neighbor(pos, dir).unwrap();
            let idx = next.row * grid.width() + next.col;
            if !seen[idx] {
                seen[idx] = true;
                stack.push(next);
            }
        }
    }

    for (pos, room) in grid.iter() {
        let idx = pos.row * grid.width() + pos.col;
        assert_eq!(seen[idx], !room.is_empty(), "{room} at {pos}");
    }
}

#[test]
fn test_result_serializes_to_json() {
    let config = GenerationConfig::new(10, 11);
    let result = generate(&config, &mut DungeonRng::new(8));
    let json = serde_json::to_string(&result).unwrap();
    let back: dg_core::GenerationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
    assert_eq!(back.grid[back.start], RoomVariant::Nesw);
    assert_eq!(back.grid.get(Position::new(0, 0)), result.grid.get(Position::new(0, 0)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_generated_layouts_hold_invariants(
        seed in any::<u64>(),
        height in 10usize..=20,
        width in 10usize..=20,
        percent in 25u8..=75,
    ) {
        let config = GenerationConfig::new(height, width).with_empty_percent(percent);
        let result = generate(&config, &mut DungeonRng::new(seed));

        prop_assert_eq!(result.grid.height(), height);
        prop_assert_eq!(result.grid.width(), width);
        prop_assert!(result.grid.count_empty() <= config.max_empty_cells());

        prop_assert!((1..=height - 2).contains(&result.start.row));
        prop_assert!((1..=width - 2).contains(&result.start.col));
        prop_assert_eq!(result.grid[result.start], RoomVariant::Nesw);

        check_boundaries(&result.grid);
        check_reciprocity(&result.grid);
        prop_assert!(result.grid.violations().is_empty());
    }

    #[test]
    fn prop_seed_determines_layout(seed in any::<u64>(), percent in 25u8..=75) {
        let config = GenerationConfig::new(10, 13).with_empty_percent(percent);
        let a = generate(&config, &mut DungeonRng::new(seed));
        let b = generate(&config, &mut DungeonRng::new(seed));
        prop_assert_eq!(a.start, b.start);
        prop_assert_eq!(a.grid, b.grid);
    }

    #[test]
    fn prop_catalog_lookups_agree(index in 0usize..15) {
        let room = RoomVariant::all_nonempty()[index];
        for dir in Direction::iter() {
            prop_assert_eq!(room.contains_exit(dir), room.exits().has(dir));
            prop_assert_eq!(room.contains_exit(dir), room.name().contains(&dir.to_string()));
        }
    }
}
