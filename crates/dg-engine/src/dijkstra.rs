//! Dijkstra engine — the pathfinding core shared by AI, item placement,
//! and topology analysis (spec §4.C).
//!
//! The priority structure is a `BTreeSet<(i32, usize)>` keyed by current
//! distance rather than the source's doubly-linked list: the spec treats
//! the linked-list detail as an implementation floor, not a contract —
//! only the resulting distances are required to be deterministic, and a
//! `BTreeSet` relaxation gives the identical distances with `O(log n)`
//! updates instead of a linear walk-to-resort.

use std::collections::BTreeSet;

use dg_types::grid::{Grid, Pos, DCOLS, DROWS, FIRST_DIAGONAL, NB_DIRS};

/// Impassable; no path may cross this cell.
pub const PDS_FORBIDDEN: i32 = -1;
/// Blocks both straight passage and diagonal cut-through via this cell.
pub const PDS_OBSTRUCTION: i32 = -2;
/// Treated as "unreachable" by callers that only read distances.
pub const PDS_INFINITY: i32 = 30000;

fn cell_index(pos: Pos) -> usize {
    pos.y as usize * DCOLS + pos.x as usize
}

/// Diagonal movement between `from` and `to` is legal only when the two
/// intermediate cardinal cells are not both `PDS_OBSTRUCTION` (spec
/// §4.C). Border cells are always `PDS_OBSTRUCTION`, enforced by the
/// cost map construction, not checked again here.
fn diagonal_allowed(cost: &Grid, from: Pos, to: Pos) -> bool {
    let corner_a = Pos::new(to.x, from.y);
    let corner_b = Pos::new(from.x, to.y);
    !(cost.get(corner_a) == PDS_OBSTRUCTION && cost.get(corner_b) == PDS_OBSTRUCTION)
}

/// Pure relaxation core. `distance_map` is simultaneously input (cells
/// with a distance `< PDS_INFINITY` are sources) and output (shortest
/// distance from any source). `cost_map` entries are positive traversal
/// costs, or one of the two sentinels above.
pub fn dijkstra_scan(distance_map: &mut Grid, cost_map: &Grid, use_diagonals: bool) {
    let mut queue: BTreeSet<(i32, usize)> = BTreeSet::new();
    for y in 0..DROWS as i32 {
        for x in 0..DCOLS as i32 {
            let pos = Pos::new(x, y);
            let d = distance_map.get(pos);
            if d < PDS_INFINITY {
                queue.insert((d, cell_index(pos)));
            }
        }
    }

    let directions: &[usize] = if use_diagonals { &[0, 1, 2, 3, 4, 5, 6, 7] } else { &[0, 1, 2, 3] };

    while let Some((dist, idx)) = queue.pop_first() {
        let pos = Pos::new((idx % DCOLS) as i32, (idx / DCOLS) as i32);
        if dist > distance_map.get(pos) {
            continue; // stale entry superseded by a shorter relaxation
        }
        for &dir in directions {
            let neighbor = pos.neighbor(dir);
            if !neighbor.in_bounds() {
                continue;
            }
            let step_cost = cost_map.get(neighbor);
            if step_cost == PDS_FORBIDDEN || step_cost == PDS_OBSTRUCTION {
                continue;
            }
            if dir >= FIRST_DIAGONAL && !diagonal_allowed(cost_map, pos, neighbor) {
                continue;
            }
            let candidate = dist + step_cost;
            let n_idx = cell_index(neighbor);
            if candidate < distance_map.get(neighbor) {
                let old = distance_map.get(neighbor);
                if old < PDS_INFINITY {
                    queue.remove(&(old, n_idx));
                }
                distance_map.set(neighbor, candidate);
                queue.insert((candidate, n_idx));
            }
        }
    }
}

/// Terrain-aware entry point: derives a cost map from game state and a
/// single destination, then runs the scan (spec §4.C
/// `calculate_distances`). Bitflags describing "blocks passability" and
/// "traveler forbidden here" are supplied by the caller rather than read
/// from a concrete `Level`, so this stays reusable across AI, item
/// placement, and topology passes that each have their own notion of
/// what blocks movement.
pub fn calculate_distances(
    destination: Pos,
    obstructs_passability: impl Fn(Pos) -> bool,
    obstructs_diagonal: impl Fn(Pos) -> bool,
    forbidden: impl Fn(Pos) -> bool,
    eight_ways: bool,
) -> Grid {
    let mut cost = Grid::alloc(1);
    for y in 0..DROWS as i32 {
        for x in 0..DCOLS as i32 {
            let pos = Pos::new(x, y);
            if pos.is_border() {
                cost.set(pos, PDS_OBSTRUCTION);
                continue;
            }
            if forbidden(pos) {
                cost.set(pos, PDS_FORBIDDEN);
            } else if obstructs_passability(pos) {
                cost.set(
                    pos,
                    if obstructs_diagonal(pos) {
                        PDS_OBSTRUCTION
                    } else {
                        PDS_FORBIDDEN
                    },
                );
            } else {
                cost.set(pos, 1);
            }
        }
    }

    let mut distance = Grid::alloc(PDS_INFINITY);
    distance.set(destination, 0);
    dijkstra_scan(&mut distance, &cost, eight_ways);
    distance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_cost_map() -> Grid {
        let mut cost = Grid::alloc(1);
        for y in 0..DROWS as i32 {
            for x in 0..DCOLS as i32 {
                let pos = Pos::new(x, y);
                if pos.is_border() {
                    cost.set(pos, PDS_OBSTRUCTION);
                }
            }
        }
        cost
    }

    #[test]
    fn straight_line_distance_matches_chebyshev_with_diagonals() {
        let cost = open_cost_map();
        let mut distance = Grid::alloc(PDS_INFINITY);
        let dest = Pos::new(10, 10);
        distance.set(dest, 0);
        dijkstra_scan(&mut distance, &cost, true);
        let target = Pos::new(15, 13);
        assert_eq!(distance.get(target), dest.distance_chebyshev(target));
    }

    #[test]
    fn four_way_distance_is_manhattan_style() {
        let cost = open_cost_map();
        let mut distance = Grid::alloc(PDS_INFINITY);
        let dest = Pos::new(10, 10);
        distance.set(dest, 0);
        dijkstra_scan(&mut distance, &cost, false);
        let target = Pos::new(13, 10);
        assert_eq!(distance.get(target), 3);
    }

    #[test]
    fn forbidden_cell_is_unreachable() {
        let mut cost = open_cost_map();
        cost.set(Pos::new(5, 5), PDS_FORBIDDEN);
        let mut distance = Grid::alloc(PDS_INFINITY);
        distance.set(Pos::new(1, 1), 0);
        dijkstra_scan(&mut distance, &cost, true);
        assert_eq!(distance.get(Pos::new(5, 5)), PDS_INFINITY);
    }

    #[test]
    fn obstruction_blocks_diagonal_cut_through_both_corners() {
        let mut cost = open_cost_map();
        // Wall off both cardinal corners between (5,5) and (6,6): a
        // diagonal step between them must be rejected.
        cost.set(Pos::new(6, 5), PDS_OBSTRUCTION);
        cost.set(Pos::new(5, 6), PDS_OBSTRUCTION);
        let mut distance = Grid::alloc(PDS_INFINITY);
        distance.set(Pos::new(5, 5), 0);
        dijkstra_scan(&mut distance, &cost, true);
        // Going around costs at least 2 instead of a direct diagonal 1.
        assert!(distance.get(Pos::new(6, 6)) >= 2);
    }

    #[test]
    fn single_blocked_corner_still_allows_diagonal() {
        let mut cost = open_cost_map();
        cost.set(Pos::new(6, 5), PDS_OBSTRUCTION);
        let mut distance = Grid::alloc(PDS_INFINITY);
        distance.set(Pos::new(5, 5), 0);
        dijkstra_scan(&mut distance, &cost, true);
        assert_eq!(distance.get(Pos::new(6, 6)), 1);
    }

    #[test]
    fn calculate_distances_destination_is_zero() {
        let dest = Pos::new(20, 15);
        let distance = calculate_distances(dest, |_| false, |_| false, |_| false, true);
        assert_eq!(distance.get(dest), 0);
    }

    #[test]
    fn calculate_distances_respects_forbidden_predicate() {
        let dest = Pos::new(20, 15);
        let blocked = Pos::new(21, 15);
        let distance = calculate_distances(
            dest,
            |_| false,
            |_| false,
            move |p| p == blocked,
            true,
        );
        assert_eq!(distance.get(blocked), PDS_INFINITY);
    }
}
