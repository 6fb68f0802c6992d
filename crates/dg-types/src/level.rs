//! Level and run-state aggregates (spec §3 "Level" and "Run state").

use serde::{Deserialize, Serialize};

use crate::cell::Pcell;
use crate::creature::Creature;
use crate::grid::{Grid, DCOLS, DROWS};
use crate::ids::{Arena, ArenaId};
use crate::item::Item;
use crate::rng::RngState;

/// One dungeon level: the cell grid plus everything that lives on it.
///
/// Creatures and items are arena-resident (spec §9, Design Notes on
/// cycles in ownership) so that a monster's leader or an item's
/// vorpal-enemy link can be held as a plain `ArenaId` without the level
/// owning a graph of strong references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub depth: u32,
    pub cells: Vec<Pcell>,
    pub creatures: Arena<Creature>,
    pub items: Arena<Item>,
    /// The arena id of the player's `Creature`, valid only while the
    /// player occupies this level.
    pub player_id: Option<ArenaId>,
    pub discovered_stairs_up: bool,
    pub discovered_stairs_down: bool,
    /// Per-level RNG state, reseeded from the run seed and depth at
    /// generation time (spec §4.A "reseed_for_depth").
    pub rng: RngState,
    pub visited: bool,
}

impl Level {
    pub fn new(depth: u32, rng: RngState) -> Self {
        Self {
            depth,
            cells: vec![Pcell::new(); DCOLS * DROWS],
            creatures: Arena::new(),
            items: Arena::new(),
            player_id: None,
            discovered_stairs_up: false,
            discovered_stairs_down: false,
            rng,
            visited: false,
        }
    }

    fn cell_index(pos: crate::grid::Pos) -> usize {
        pos.y as usize * DCOLS + pos.x as usize
    }

    pub fn cell(&self, pos: crate::grid::Pos) -> &Pcell {
        &self.cells[Self::cell_index(pos)]
    }

    pub fn cell_mut(&mut self, pos: crate::grid::Pos) -> &mut Pcell {
        let idx = Self::cell_index(pos);
        &mut self.cells[idx]
    }

    pub fn creature_at(&self, pos: crate::grid::Pos) -> Option<(ArenaId, &Creature)> {
        self.creatures.iter().find(|(_, c)| c.pos == pos)
    }

    pub fn living_creature_count(&self) -> usize {
        self.creatures.iter().filter(|(_, c)| !c.is_dead()).count()
    }
}

/// Bookkeeping for a single dungeon run, spanning all generated levels.
///
/// Only the current level's full cell/creature/item state is held live;
/// earlier levels are regenerated or reloaded on redescent per the
/// Non-goals around persistent-level storage, so `levels` here tracks the
/// minimal cross-level state (discovery, depth reached) rather than a
/// full history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub seed: u64,
    pub turn_number: u64,
    pub deepest_depth_reached: u32,
    pub current_depth: u32,
    pub gold_collected: i64,
    pub game_over: bool,
    pub victory: bool,
}

impl RunState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            turn_number: 0,
            deepest_depth_reached: 1,
            current_depth: 1,
            gold_collected: 0,
            game_over: false,
            victory: false,
        }
    }

    pub fn advance_to_depth(&mut self, depth: u32) {
        self.current_depth = depth;
        self.deepest_depth_reached = self.deepest_depth_reached.max(depth);
    }
}

/// Ensures a freshly-allocated grid has exactly `DCOLS * DROWS` cells,
/// matching the invariant the rest of the engine assumes when indexing
/// by `y * DCOLS + x`.
pub fn validate_grid_shape(grid: &Grid) {
    debug_assert_eq!(grid.iter().count(), DCOLS * DROWS);
}
