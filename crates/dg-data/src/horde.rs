//! Horde catalog — spawn recipes grouping a leader with escort members
//! (spec §3 "Horde entry", §4.D).

use dg_types::{HordeFlags, HordeId, MonsterTypeId, TileTypeId};

/// Count range plus clump factor for one member slot in a horde recipe.
pub struct MemberCount {
    pub monster: MonsterTypeId,
    pub lower: i32,
    pub upper: i32,
    pub clump_factor: u32,
}

pub struct HordeInfo {
    pub id: HordeId,
    pub leader: MonsterTypeId,
    pub members: &'static [MemberCount],
    pub min_level: u32,
    pub max_level: u32,
    pub frequency: i32,
    /// Terrain this horde is restricted to spawning in, if any.
    pub spawns_in: Option<TileTypeId>,
    pub flags: HordeFlags,
}

pub static HORDE_CATALOG: &[HordeInfo] = &[
    HordeInfo {
        id: HordeId::new("goblin_war_party"),
        leader: MonsterTypeId::new("goblin"),
        members: &[MemberCount {
            monster: MonsterTypeId::new("goblin_conjurer"),
            lower: 1,
            upper: 2,
            clump_factor: 1,
        }],
        min_level: 3,
        max_level: 10,
        frequency: 50,
        spawns_in: None,
        flags: HordeFlags::empty(),
    },
    HordeInfo {
        id: HordeId::new("captive_jackal"),
        leader: MonsterTypeId::new("jackal"),
        members: &[],
        min_level: 6,
        max_level: 6,
        frequency: 100,
        spawns_in: None,
        flags: HordeFlags::ALLIED_WITH_PLAYER,
    },
];

pub fn horde_info(id: &HordeId) -> Option<&'static HordeInfo> {
    HORDE_CATALOG.iter().find(|h| &h.id == id)
}

pub fn hordes_for_level(depth: u32) -> impl Iterator<Item = &'static HordeInfo> {
    HORDE_CATALOG
        .iter()
        .filter(move |h| h.min_level <= depth && depth <= h.max_level)
}
