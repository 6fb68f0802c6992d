//! Stairs placement (spec §4.E step 9).

use dg_types::flags::CellFlags;
use dg_types::grid::Pos;
use dg_types::level::Level;

use crate::dijkstra::{calculate_distances, PDS_INFINITY};

/// Place the upstairs at `entrance` and the downstairs at the carved
/// floor cell farthest from it by path distance.
pub fn place_stairs(level: &mut Level, entrance: Pos) -> (Pos, Pos) {
    level.cell_mut(entrance).flags.insert(CellFlags::HAS_STAIRS);

    let distances = {
        let obstructs = |p: Pos| level.cell(p).dungeon.is_none();
        calculate_distances(entrance, obstructs, |_: Pos| false, |_: Pos| false, true)
    };

    let mut farthest = entrance;
    let mut best = -1i32;
    for (pos, dist) in distances.iter() {
        if dist < PDS_INFINITY && dist > best && pos != entrance && level.cell(pos).dungeon.is_some() {
            best = dist;
            farthest = pos;
        }
    }
    level.cell_mut(farthest).flags.insert(CellFlags::HAS_STAIRS);
    (entrance, farthest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_types::ids::TileTypeId;
    use dg_types::rng::RngState;

    #[test]
    fn downstairs_lands_on_carved_floor_away_from_the_entrance() {
        let mut level = Level::new(1, RngState::new(1));
        for y in 5..=7 {
            for x in 5..=30 {
                level.cell_mut(Pos::new(x, y)).dungeon = Some(TileTypeId::new("floor"));
            }
        }
        let entrance = Pos::new(6, 6);
        let (up, down) = place_stairs(&mut level, entrance);
        assert_eq!(up, entrance);
        assert!(level.cell(down).dungeon.is_some());
        assert!(down.x > entrance.x + 5);
    }

    #[test]
    fn both_stairs_cells_carry_the_has_stairs_flag() {
        let mut level = Level::new(1, RngState::new(1));
        for y in 5..=7 {
            for x in 5..=10 {
                level.cell_mut(Pos::new(x, y)).dungeon = Some(TileTypeId::new("floor"));
            }
        }
        let (up, down) = place_stairs(&mut level, Pos::new(6, 6));
        assert!(level.cell(up).flags.contains(CellFlags::HAS_STAIRS));
        assert!(level.cell(down).flags.contains(CellFlags::HAS_STAIRS));
    }
}
