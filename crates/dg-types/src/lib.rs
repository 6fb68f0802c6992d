//! Core types for the dungeon-crawl simulation engine — zero external deps
//! beyond serde, bitflags, and the standard library.
//!
//! This crate defines every type shared across the engine: ids, fixed-point
//! arithmetic, RNG state, grid primitives, colors, flag words, and the
//! cell/item/creature/level data model. It has no game logic — just data
//! definitions and the small amount of arithmetic (fixed-point ops, RNG
//! draws, flood fill) that those definitions need to be usable on their own.

pub mod cell;
pub mod color;
pub mod creature;
pub mod fixed;
pub mod flags;
pub mod grid;
pub mod ids;
pub mod item;
pub mod level;
pub mod rng;

pub use cell::{Layer, Pcell, RememberedAppearance};
pub use color::Color;
pub use creature::{Creature, CreatureState, Status, StatusKind, Stats};
pub use fixed::{Fixed, FP_FACTOR};
pub use flags::{
    BlueprintFlags, CellFlags, CreatureFlags, HordeFlags, ItemCategoryMask, ItemFlags,
    MachineFeatureFlags, MonsterBehaviorFlags, TileFlags, TileMechFlags,
};
pub use grid::{Grid, Pos, DCOLS, DROWS, FIRST_DIAGONAL, NB_DIRS};
pub use ids::{
    Arena, ArenaId, BlueprintId, DungeonFeatureId, HordeId, MonsterClassId, MonsterTypeId,
    MutationId, TileTypeId,
};
pub use item::{Category, DamageRange, Item, ItemLocation};
pub use level::{Level, RunState};
pub use rng::{CosmeticRng, RngState};
