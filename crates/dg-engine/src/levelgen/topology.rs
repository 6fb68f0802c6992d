//! Loop and chokepoint topology analysis over the carved map (spec
//! §4.E step 5), consumed by the item-population heat map afterward.

use dg_types::flags::{CellFlags, TileFlags};
use dg_types::grid::{Grid, Pos, DCOLS, DROWS};
use dg_types::level::Level;

fn is_passable(level: &Level, pos: Pos) -> bool {
    level
        .cell(pos)
        .dungeon
        .as_ref()
        .and_then(dg_data::tile::tile_info)
        .map(|t| !t.flags.contains(TileFlags::OBSTRUCTS_PASSABILITY))
        .unwrap_or(false)
}

/// The eight neighbor offsets in angular order (N, NE, E, SE, S, SW, W,
/// NW), needed so a walk around the array is a walk around the cell —
/// `NB_DIRS`'s own ordering groups cardinals before diagonals and isn't
/// suitable for this.
const RING_ORDER: [(i32, i32); 8] = [(0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1)];

/// Number of contiguous passable runs around a cell's 8-neighbor ring.
/// A cell with more than one such run is a chokepoint: removing it would
/// split its neighbors into separate components.
pub fn passable_arc_count(level: &Level, pos: Pos) -> i32 {
    let ring: Vec<bool> = RING_ORDER
        .iter()
        .map(|&(dx, dy)| {
            let n = Pos::new(pos.x + dx, pos.y + dy);
            n.in_bounds() && is_passable(level, n)
        })
        .collect();
    let mut arcs = 0;
    for i in 0..ring.len() {
        let prev = ring[(i + ring.len() - 1) % ring.len()];
        if ring[i] && !prev {
            arcs += 1;
        }
    }
    arcs
}

pub fn compute_topology(level: &mut Level) {
    mark_chokepoints(level);
    mark_loops(level);
}

fn mark_chokepoints(level: &mut Level) {
    let targets: Vec<Pos> = (0..DROWS as i32)
        .flat_map(|y| (0..DCOLS as i32).map(move |x| Pos::new(x, y)))
        .filter(|&p| !p.is_border() && is_passable(level, p) && passable_arc_count(level, p) > 1)
        .collect();
    for p in targets {
        level.cell_mut(p).flags.insert(CellFlags::IS_CHOKEPOINT);
    }
}

fn loop_eligible(level: &Level, pos: Pos) -> bool {
    !pos.is_border() && is_passable(level, pos) && !level.cell(pos).flags.contains(CellFlags::IS_CHOKEPOINT)
}

/// A connected component (4-adjacency, passable, non-chokepoint) with
/// more edges than a spanning tree needs contains a cycle; every cell in
/// that component is flagged `IS_IN_LOOP`.
fn mark_loops(level: &mut Level) {
    let mut visited = Grid::alloc(0);
    for y in 0..DROWS as i32 {
        for x in 0..DCOLS as i32 {
            let start = Pos::new(x, y);
            if visited.get(start) == 1 || !loop_eligible(level, start) {
                continue;
            }
            let mut stack = vec![start];
            visited.set(start, 1);
            let mut component = Vec::new();
            let mut edges = 0i32;
            while let Some(p) = stack.pop() {
                component.push(p);
                for n in p.neighbors4() {
                    if !n.in_bounds() || !loop_eligible(level, n) {
                        continue;
                    }
                    edges += 1;
                    if visited.get(n) == 0 {
                        visited.set(n, 1);
                        stack.push(n);
                    }
                }
            }
            edges /= 2; // each undirected edge was counted from both ends
            if edges > component.len() as i32 - 1 {
                for p in component {
                    level.cell_mut(p).flags.insert(CellFlags::IS_IN_LOOP);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_types::ids::TileTypeId;
    use dg_types::rng::RngState;

    fn carve(level: &mut Level, positions: &[(i32, i32)]) {
        for &(x, y) in positions {
            level.cell_mut(Pos::new(x, y)).dungeon = Some(TileTypeId::new("floor"));
        }
    }

    #[test]
    fn a_four_way_junction_is_a_chokepoint() {
        let mut level = Level::new(1, RngState::new(1));
        carve(&mut level, &[(10, 10), (9, 10), (11, 10), (10, 9), (10, 11)]);
        assert!(passable_arc_count(&level, Pos::new(10, 10)) > 1);
    }

    #[test]
    fn a_straight_corridor_cell_is_not_a_chokepoint() {
        let mut level = Level::new(1, RngState::new(1));
        carve(&mut level, &[(10, 10), (9, 10), (11, 10)]);
        assert_eq!(passable_arc_count(&level, Pos::new(10, 10)), 1);
    }

    #[test]
    fn a_thick_ring_of_corridor_is_flagged_as_a_loop() {
        let mut level = Level::new(1, RngState::new(1));
        let ring: Vec<(i32, i32)> = (5..=11)
            .flat_map(|y| (5..=11).map(move |x| (x, y)))
            .filter(|&(x, y)| !(7..=9).contains(&x) || !(7..=9).contains(&y))
            .collect();
        carve(&mut level, &ring);
        compute_topology(&mut level);
        let any_loop = ring.iter().any(|&(x, y)| level.cell(Pos::new(x, y)).flags.contains(CellFlags::IS_IN_LOOP));
        assert!(any_loop);
    }
}
