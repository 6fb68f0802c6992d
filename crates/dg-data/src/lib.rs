//! Static catalog data for the dungeon-crawl simulation engine.
//!
//! This crate contains every immutable game-content table the engine
//! reads: monster and monster-class info, terrain, dungeon features,
//! machine blueprints, horde spawn recipes, dungeon profiles, mutations,
//! per-category item catalogs, the item-generation probability vector
//! (including the metered scroll/potion frequency protocol), the
//! flare/light catalog, and shared color constants.
//!
//! Catalog *content* here is a representative sample, not the full game
//! content set — see the crate's tests for what each table is expected
//! to support.

pub mod blueprint;
pub mod colors;
pub mod dungeon_feature;
pub mod dungeon_profile;
pub mod flare;
pub mod item_catalog;
pub mod item_gen;
pub mod monster;
pub mod monster_class;
pub mod mutation;
pub mod tile;
