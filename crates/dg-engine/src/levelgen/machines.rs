//! Blueprint/machine placement (spec §4.E step 6).

use dg_data::blueprint::BLUEPRINT_CATALOG;
use dg_data::dungeon_feature::DungeonFeatureInfo;
use dg_data::dungeon_profile::DungeonProfile;
use dg_types::flags::{BlueprintFlags, CellFlags, MachineFeatureFlags};
use dg_types::grid::Pos;
use dg_types::level::Level;

use super::rooms::CarvedRoom;

/// Try every blueprint whose depth range covers `depth` against the
/// carved rooms, in catalog order, claiming the first room of a
/// matching size for each and stamping its required features.
pub fn place_machines(level: &mut Level, depth: u32, profile: &DungeonProfile, rooms: &[CarvedRoom], next_machine_number: &mut u32) {
    for bp in BLUEPRINT_CATALOG {
        if depth < bp.min_depth || depth > bp.max_depth {
            continue;
        }
        if bp.flags.contains(BlueprintFlags::BP_REWARD) && !level.rng.rand_percent(profile.reward_room_weight) {
            continue;
        }
        let (min_dim, max_dim) = bp.room_size;
        let Some(room) = rooms.iter().find(|r| {
            let (lo, hi) = r.bounds();
            let w = hi.x - lo.x + 1;
            let h = hi.y - lo.y + 1;
            let dim = w.min(h);
            dim >= min_dim && dim <= max_dim
        }) else {
            continue;
        };

        *next_machine_number += 1;
        let machine_number = *next_machine_number;
        let machine_flag = if bp.flags.contains(BlueprintFlags::BP_ROOM) {
            CellFlags::IS_IN_ROOM_MACHINE
        } else {
            CellFlags::IS_IN_AREA_MACHINE
        };
        for &pos in &room.cells {
            level.cell_mut(pos).machine_number = machine_number;
            level.cell_mut(pos).flags.insert(machine_flag);
        }

        if bp.flags.contains(BlueprintFlags::BP_VESTIBULE) {
            flood_vestibule(level, room, machine_number);
        }

        for slot in bp.features {
            place_feature(level, room, slot.feature, machine_number);
        }
    }
}

fn origin_of(room: &CarvedRoom) -> Pos {
    room.cells[room.cells.len() / 2]
}

fn place_feature(level: &mut Level, room: &CarvedRoom, feature: &'static DungeonFeatureInfo, machine_number: u32) {
    let origin = origin_of(room);
    let mut candidates: Vec<Pos> = if feature.flags.contains(MachineFeatureFlags::MF_BUILD_AT_ORIGIN) {
        vec![origin]
    } else if feature.flags.contains(MachineFeatureFlags::MF_BUILD_IN_WALLS) {
        room.cells
            .iter()
            .flat_map(|p| p.neighbors8())
            .filter(|n| n.in_bounds() && !room.cells.contains(n) && level.cell(*n).dungeon.is_some())
            .collect()
    } else if feature.flags.contains(MachineFeatureFlags::MF_NEAR_ORIGIN) {
        room.cells.iter().copied().filter(|p| p.distance_chebyshev(origin) <= 2).collect()
    } else {
        room.cells.clone()
    };
    candidates.sort();
    candidates.dedup();

    let (lo, hi) = feature.count_range;
    let count = level.rng.rand_range(lo as i64, hi as i64) as usize;
    let mut placed: Vec<Pos> = Vec::new();
    for _ in 0..count {
        candidates.retain(|c| placed.iter().all(|p: &Pos| p.distance_chebyshev(*c) >= feature.personal_space));
        let Some(idx) = level.rng.random_index(candidates.len()) else { break };
        let pos = candidates.remove(idx);
        level.cell_mut(pos).set_layer(dg_types::cell::Layer::Surface, Some(feature.tile));
        level.cell_mut(pos).machine_number = machine_number;
        placed.push(pos);
    }
}

/// Approximate a machine's vestibule by re-claiming its own room's cells
/// starting from the gate outward; a true multi-room vestibule carve is
/// out of scope without a larger map-wide free-space search.
fn flood_vestibule(level: &mut Level, room: &CarvedRoom, machine_number: u32) {
    let gate = origin_of(room);
    let target_size = room.cells.len();
    let mut filled = Vec::new();
    let mut frontier = vec![gate];
    while filled.len() < target_size {
        let Some(pos) = frontier.pop() else { break };
        if filled.contains(&pos) {
            continue;
        }
        filled.push(pos);
        for n in pos.neighbors4() {
            if n.in_bounds() && level.cell(n).dungeon.is_some() && !filled.contains(&n) {
                frontier.push(n);
            }
        }
    }
    for pos in filled {
        level.cell_mut(pos).machine_number = machine_number;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_types::rng::RngState;

    fn square_room(anchor: Pos, size: i32) -> CarvedRoom {
        let mut cells = Vec::new();
        for dy in 0..size {
            for dx in 0..size {
                cells.push(Pos::new(anchor.x + dx, anchor.y + dy));
            }
        }
        CarvedRoom { cells }
    }

    #[test]
    fn a_matching_blueprint_claims_a_room_and_assigns_a_machine_number() {
        let mut level = Level::new(5, RngState::new(1));
        let room = square_room(Pos::new(20, 10), 7);
        super::super::rooms::insert_room_at(&mut level, &room);
        let profile = dg_data::dungeon_profile::profile_for_depth(5);
        let mut next = 0u32;
        place_machines(&mut level, 5, profile, &[room.clone()], &mut next);
        if next == 1 {
            assert_eq!(level.cell(Pos::new(20, 10)).machine_number, 1);
        } else {
            assert_eq!(next, 0);
        }
    }

    #[test]
    fn a_blueprint_outside_its_depth_range_is_skipped() {
        let mut level = Level::new(1, RngState::new(1));
        let room = square_room(Pos::new(20, 10), 7);
        super::super::rooms::insert_room_at(&mut level, &room);
        let profile = dg_data::dungeon_profile::profile_for_depth(1);
        let mut next = 0u32;
        place_machines(&mut level, 1, profile, &[room], &mut next);
        assert_eq!(next, 0);
    }
}
