//! Room carving — the six room shapes and the room-attachment loop
//! (spec §4.E steps 2-3).

use dg_types::grid::Pos;
use dg_types::ids::TileTypeId;
use dg_types::level::Level;
use dg_types::rng::RngState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomKind {
    Entrance,
    Cavern,
    Cross,
    Small,
    Circular,
    Chunky,
}

/// A carved room before it is stamped onto the level: the floor cells it
/// would occupy, plus one door candidate per cardinal direction.
#[derive(Debug, Clone)]
pub struct CarvedRoom {
    pub cells: Vec<Pos>,
}

impl CarvedRoom {
    fn from_cells(mut cells: Vec<Pos>) -> Self {
        cells.sort();
        cells.dedup();
        Self { cells }
    }

    pub fn bounds(&self) -> (Pos, Pos) {
        let min_x = self.cells.iter().map(|p| p.x).min().unwrap_or(0);
        let max_x = self.cells.iter().map(|p| p.x).max().unwrap_or(0);
        let min_y = self.cells.iter().map(|p| p.y).min().unwrap_or(0);
        let max_y = self.cells.iter().map(|p| p.y).max().unwrap_or(0);
        (Pos::new(min_x, min_y), Pos::new(max_x, max_y))
    }
}

fn rect(anchor: Pos, width: i32, height: i32) -> Vec<Pos> {
    let mut cells = Vec::with_capacity((width * height).max(0) as usize);
    for dy in 0..height {
        for dx in 0..width {
            cells.push(Pos::new(anchor.x + dx, anchor.y + dy));
        }
    }
    cells
}

/// The player's starting room: a T-shape, a wide room with a narrow
/// stem, so the stairs up always sit at a predictable corridor mouth.
pub fn design_entrance_room(anchor: Pos) -> CarvedRoom {
    let mut cells = rect(anchor, 9, 3);
    cells.extend(rect(Pos::new(anchor.x + 3, anchor.y - 3), 3, 3));
    CarvedRoom::from_cells(cells)
}

pub fn design_small_room(rng: &mut RngState, anchor: Pos) -> CarvedRoom {
    let width = rng.rand_range(3, 6) as i32;
    let height = rng.rand_range(2, 4) as i32;
    CarvedRoom::from_cells(rect(anchor, width, height))
}

pub fn design_cross_room(rng: &mut RngState, anchor: Pos) -> CarvedRoom {
    let horiz = rng.rand_range(5, 9) as i32;
    let vert = rng.rand_range(3, 7) as i32;
    let mut cells = rect(anchor, horiz, 3);
    cells.extend(rect(Pos::new(anchor.x + horiz / 2 - 1, anchor.y - (vert - 3) / 2), 3, vert));
    CarvedRoom::from_cells(cells)
}

pub fn design_chunky_room(rng: &mut RngState, anchor: Pos) -> CarvedRoom {
    let chunk_count = rng.rand_range(2, 4);
    let mut cells = Vec::new();
    for _ in 0..chunk_count {
        let dx = rng.rand_range(0, 4) as i32 - 2;
        let dy = rng.rand_range(0, 4) as i32 - 2;
        let w = rng.rand_range(3, 5) as i32;
        let h = rng.rand_range(3, 5) as i32;
        cells.extend(rect(Pos::new(anchor.x + dx, anchor.y + dy), w, h));
    }
    CarvedRoom::from_cells(cells)
}

pub fn design_circular_room(rng: &mut RngState, anchor: Pos) -> CarvedRoom {
    let radius = rng.rand_range(2, 5) as i32;
    let mut cells = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                cells.push(Pos::new(anchor.x + dx, anchor.y + dy));
            }
        }
    }
    CarvedRoom::from_cells(cells)
}

/// Cellular-automaton cavern: seed a random fill, apply one birth/survive
/// pass, then keep only the largest connected blob in the window.
pub fn design_cavern_room(rng: &mut RngState, anchor: Pos, width: i32, height: i32, fill_pct: i32) -> CarvedRoom {
    let idx = |x: i32, y: i32| (y * width + x) as usize;
    let mut live = vec![false; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            live[idx(x, y)] = rng.rand_percent(fill_pct);
        }
    }

    let count_neighbors = |live: &[bool], x: i32, y: i32| -> i32 {
        let mut n = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= width || ny >= height || live[idx(nx, ny)] {
                    n += 1;
                }
            }
        }
        n
    };

    let mut next = live.clone();
    for y in 0..height {
        for x in 0..width {
            let n = count_neighbors(&live, x, y);
            next[idx(x, y)] = if live[idx(x, y)] { n >= 4 } else { n >= 6 };
        }
    }

    let mut visited = vec![false; next.len()];
    let mut best: Vec<(i32, i32)> = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if !next[idx(x, y)] || visited[idx(x, y)] {
                continue;
            }
            let mut stack = vec![(x, y)];
            visited[idx(x, y)] = true;
            let mut blob = Vec::new();
            while let Some((cx, cy)) = stack.pop() {
                blob.push((cx, cy));
                for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                    let (nx, ny) = (cx + dx, cy + dy);
                    if nx >= 0 && ny >= 0 && nx < width && ny < height && next[idx(nx, ny)] && !visited[idx(nx, ny)] {
                        visited[idx(nx, ny)] = true;
                        stack.push((nx, ny));
                    }
                }
            }
            if blob.len() > best.len() {
                best = blob;
            }
        }
    }

    let cells = best.into_iter().map(|(x, y)| Pos::new(anchor.x + x, anchor.y + y)).collect();
    CarvedRoom::from_cells(cells)
}

pub fn design_random_room(rng: &mut RngState, kind: RoomKind, anchor: Pos) -> CarvedRoom {
    match kind {
        RoomKind::Entrance => design_entrance_room(anchor),
        RoomKind::Cavern => design_cavern_room(rng, anchor, 12, 8, 45),
        RoomKind::Cross => design_cross_room(rng, anchor),
        RoomKind::Small => design_small_room(rng, anchor),
        RoomKind::Circular => design_circular_room(rng, anchor),
        RoomKind::Chunky => design_chunky_room(rng, anchor),
    }
}

fn pick_room_kind(rng: &mut RngState) -> RoomKind {
    match rng.rand_range(0, 4) {
        0 => RoomKind::Cavern,
        1 => RoomKind::Cross,
        2 => RoomKind::Small,
        3 => RoomKind::Circular,
        _ => RoomKind::Chunky,
    }
}

/// A candidate room fits only if every one of its cells is in bounds,
/// uncarved, and not 8-adjacent to any already-carved cell outside the
/// room itself (spec §4.E step 3 `roomFitsAt`).
pub fn room_fits_at(level: &Level, room: &CarvedRoom) -> bool {
    if room.cells.is_empty() {
        return false;
    }
    for &pos in &room.cells {
        if !pos.in_bounds() || pos.is_border() {
            return false;
        }
        if level.cell(pos).dungeon.is_some() {
            return false;
        }
        for n in pos.neighbors8() {
            if !n.in_bounds() || room.cells.contains(&n) {
                continue;
            }
            if level.cell(n).dungeon.is_some() {
                return false;
            }
        }
    }
    true
}

pub fn insert_room_at(level: &mut Level, room: &CarvedRoom) {
    for &pos in &room.cells {
        level.cell_mut(pos).dungeon = Some(TileTypeId::new("floor"));
    }
}

fn insert_corridor(level: &mut Level, from: Pos, to: Pos) {
    let mut pos = from;
    while pos != to {
        if pos.in_bounds() && !pos.is_border() && level.cell(pos).dungeon.is_none() {
            level.cell_mut(pos).dungeon = Some(TileTypeId::new("floor"));
        }
        pos = Pos::new(pos.x + (to.x - pos.x).signum(), pos.y + (to.y - pos.y).signum());
    }
}

/// Repeatedly pick an existing floor cell, project a door site off one
/// of its cardinal sides, carve a randomly-kinded room there, and insert
/// it if it fits, optionally joined by a short corridor (spec §4.E step
/// 3). Returns every room actually inserted.
pub fn attach_rooms(level: &mut Level, max_room_count: u32, corridor_chance: i32) -> Vec<CarvedRoom> {
    let mut inserted = Vec::new();
    for _ in 0..max_room_count {
        let existing: Vec<Pos> = (0..dg_types::grid::DROWS as i32)
            .flat_map(|y| (0..dg_types::grid::DCOLS as i32).map(move |x| Pos::new(x, y)))
            .filter(|&p| level.cell(p).dungeon.is_some())
            .collect();
        if existing.is_empty() {
            break;
        }
        let Some(door_idx) = level.rng.random_index(existing.len()) else { break };
        let door_site = existing[door_idx];

        let dir = level.rng.random_index(dg_types::grid::FIRST_DIAGONAL).unwrap_or(0);
        let (dx, dy) = dg_types::grid::NB_DIRS[dir];
        let use_corridor = level.rng.rand_percent(corridor_chance);
        let gap = if use_corridor { level.rng.rand_range(2, 4) as i32 } else { 1 };
        let anchor = Pos::new(door_site.x + dx * gap, door_site.y + dy * gap);

        let kind = pick_room_kind(&mut level.rng);
        let room = design_random_room(&mut level.rng, kind, anchor);
        if !room_fits_at(level, &room) {
            continue;
        }
        if use_corridor {
            insert_corridor(level, door_site, anchor);
        }
        insert_room_at(level, &room);
        inserted.push(room);
    }
    inserted
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_types::rng::RngState;

    #[test]
    fn small_room_cells_are_all_inside_its_own_bounds() {
        let mut rng = RngState::new(5);
        let room = design_small_room(&mut rng, Pos::new(20, 10));
        let (lo, hi) = room.bounds();
        for &p in &room.cells {
            assert!(p.x >= lo.x && p.x <= hi.x && p.y >= lo.y && p.y <= hi.y);
        }
    }

    #[test]
    fn entrance_room_fits_on_an_empty_level() {
        let level = Level::new(1, RngState::new(1));
        let room = design_entrance_room(Pos::new(30, 15));
        assert!(room_fits_at(&level, &room));
    }

    #[test]
    fn a_room_cannot_be_inserted_on_top_of_another() {
        let mut level = Level::new(1, RngState::new(1));
        let first = design_small_room(&mut RngState::new(2), Pos::new(20, 10));
        insert_room_at(&mut level, &first);
        let overlapping = design_small_room(&mut RngState::new(2), Pos::new(20, 10));
        assert!(!room_fits_at(&level, &overlapping));
    }

    #[test]
    fn attaching_rooms_to_an_entrance_grows_the_floor_count() {
        let mut level = Level::new(1, RngState::new(9));
        let entrance = design_entrance_room(Pos::new(40, 14));
        insert_room_at(&mut level, &entrance);
        let before: usize = level.cells.iter().filter(|c| c.dungeon.is_some()).count();
        attach_rooms(&mut level, 20, 60);
        let after: usize = level.cells.iter().filter(|c| c.dungeon.is_some()).count();
        assert!(after >= before);
    }
}
