//! Level generation — the nine-step pipeline that turns a seed and depth
//! into a playable [`Level`] (spec §4.E): seed the per-depth RNG, carve
//! the entrance (or a random) room, attach rooms until the budget is
//! spent, compute loop/chokepoint topology, place blueprint machines,
//! populate items, populate monsters, and place the stairs.

pub mod items;
pub mod machines;
pub mod monsters;
pub mod rooms;
pub mod stairs;
pub mod topology;

use dg_data::dungeon_profile::profile_for_depth;
use dg_types::grid::Pos;
use dg_types::level::Level;
use dg_types::rng::RngState;

use rooms::{attach_rooms, design_entrance_room, insert_room_at};

/// Tunable generation knobs, kept separate from [`crate::config::GameConfig`]
/// since these are level-shape parameters rather than whole-session
/// settings.
#[derive(Debug, Clone, Copy)]
pub struct LevelGenParams {
    pub max_room_count: u32,
    pub corridor_chance: i32,
    pub extra_items_per_level: i32,
    pub gold_accel: f64,
}

impl Default for LevelGenParams {
    fn default() -> Self {
        Self {
            max_room_count: 30,
            corridor_chance: 55,
            extra_items_per_level: 0,
            gold_accel: 1.0,
        }
    }
}

/// Run the full pipeline for `depth`, seeded from `run_seed` (spec §4.E
/// step 1: `RngState::reseed_for_depth` gives every depth its own
/// deterministic stream off the run seed).
pub fn generate_level(run_seed: u64, depth: u32, params: &LevelGenParams) -> Level {
    let rng = RngState::reseed_for_depth(run_seed, depth);
    let mut level = Level::new(depth, rng);
    let profile = profile_for_depth(depth);

    let entrance_anchor = Pos::new(40, 14);
    let entrance = design_entrance_room(entrance_anchor);
    insert_room_at(&mut level, &entrance);

    let mut rooms = vec![entrance.clone()];
    rooms.extend(attach_rooms(&mut level, params.max_room_count, params.corridor_chance));

    topology::compute_topology(&mut level);

    let mut next_machine_number = 0u32;
    machines::place_machines(&mut level, depth, profile, &rooms, &mut next_machine_number);

    let entrance_center = entrance.cells[entrance.cells.len() / 2];
    items::populate_items(&mut level, depth, entrance_center);
    monsters::populate_monsters(&mut level, depth);
    stairs::place_stairs(&mut level, entrance_center);

    level.discovered_stairs_up = depth == 1;
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_types::flags::CellFlags;

    #[test]
    fn generated_level_has_a_connected_entrance_room() {
        let level = generate_level(42, 1, &LevelGenParams::default());
        assert!(level.cell(Pos::new(40, 14)).dungeon.is_some());
    }

    #[test]
    fn generated_level_places_exactly_two_stairs_cells() {
        let level = generate_level(7, 3, &LevelGenParams::default());
        let stairs_count = level.cells.iter().filter(|c| c.flags.contains(CellFlags::HAS_STAIRS)).count();
        assert_eq!(stairs_count, 2);
    }

    #[test]
    fn same_seed_and_depth_produce_an_identically_sized_level() {
        let a = generate_level(99, 5, &LevelGenParams::default());
        let b = generate_level(99, 5, &LevelGenParams::default());
        let floor_count_a = a.cells.iter().filter(|c| c.dungeon.is_some()).count();
        let floor_count_b = b.cells.iter().filter(|c| c.dungeon.is_some()).count();
        assert_eq!(floor_count_a, floor_count_b);
    }

    #[test]
    fn a_generated_level_is_populated_with_items() {
        let level = generate_level(5, 4, &LevelGenParams::default());
        assert!(!level.items.is_empty());
    }
}
