//! Dungeon-feature catalog — terrain spawn patterns placed by blueprints
//! and ambient level generation (spec §4.D "dungeon-feature catalog").

use dg_types::{DungeonFeatureId, MachineFeatureFlags, TileTypeId};

pub struct DungeonFeatureInfo {
    pub id: DungeonFeatureId,
    /// Terrain layer this feature stamps when it's placed.
    pub tile: TileTypeId,
    pub flags: MachineFeatureFlags,
    /// How many instances a single placement attempt spawns, before
    /// `personal_space` thins out cells too close to one another.
    pub count_range: (i32, i32),
    pub personal_space: i32,
}

macro_rules! feature {
    ($id:expr, tile:$tile:expr, flags:$flags:expr, count:($lo:expr, $hi:expr), space:$space:expr) => {
        DungeonFeatureInfo {
            id: DungeonFeatureId::new($id),
            tile: TileTypeId::new($tile),
            flags: $flags,
            count_range: ($lo, $hi),
            personal_space: $space,
        }
    };
}

pub static DUNGEON_FEATURE_CATALOG: &[DungeonFeatureInfo] = &[
    feature!("torch_wall_sconce", tile:"wall", flags: MachineFeatureFlags::MF_BUILD_IN_WALLS,
        count:(1, 3), space: 3),
    feature!("statuary_guardian", tile:"floor", flags: MachineFeatureFlags::MF_BUILD_AT_ORIGIN,
        count:(1, 1), space: 5),
    feature!("pressure_plate", tile:"floor", flags: MachineFeatureFlags::MF_NEAR_ORIGIN,
        count:(1, 1), space: 2),
];

pub fn feature_info(id: &DungeonFeatureId) -> Option<&'static DungeonFeatureInfo> {
    DUNGEON_FEATURE_CATALOG.iter().find(|f| &f.id == id)
}
