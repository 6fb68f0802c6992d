//! Terrain catalog — per-`TileTypeId` passability, rendering, and
//! promotion behavior (spec §4.D "tile catalog").

use dg_types::{Color, TileFlags, TileMechFlags, TileTypeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireType {
    None,
    Burns,
    Explodes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoteType {
    /// This tile never promotes into another.
    None,
    /// Promotes when a machine circuit powers it.
    OnActivation,
    /// Promotes the turn after `chance_to_ignite` succeeds.
    OnIgnite,
}

pub struct TileTypeInfo {
    pub id: TileTypeId,
    pub flags: TileFlags,
    pub mech_flags: TileMechFlags,
    /// Higher draws on top when multiple layers are present on a cell.
    pub draw_priority: i32,
    pub fire_type: FireType,
    pub promote_type: PromoteType,
    pub promote_chance: i32,
    pub chance_to_ignite: i32,
    pub glow_light: Option<Color>,
    pub description: &'static str,
    pub flavor_text: &'static str,
}

macro_rules! tile {
    ($id:expr, $flags:expr, $mech:expr, prio:$prio:expr, fire:$fire:expr,
     promote:$promote:expr, promote_chance:$pc:expr, ignite_chance:$ic:expr,
     glow:$glow:expr, desc:$desc:expr, flavor:$flavor:expr) => {
        TileTypeInfo {
            id: TileTypeId::new($id),
            flags: $flags,
            mech_flags: $mech,
            draw_priority: $prio,
            fire_type: $fire,
            promote_type: $promote,
            promote_chance: $pc,
            chance_to_ignite: $ic,
            glow_light: $glow,
            description: $desc,
            flavor_text: $flavor,
        }
    };
}

pub static TILE_CATALOG: &[TileTypeInfo] = &[
    tile!("floor", TileFlags::empty(), TileMechFlags::empty(), prio:0,
        fire:FireType::None, promote:PromoteType::None, promote_chance:0, ignite_chance:0,
        glow:None, desc:"floor", flavor:"Plain stone flooring."),
    tile!("wall", TileFlags::OBSTRUCTS_PASSABILITY.union(TileFlags::OBSTRUCTS_DIAGONAL).union(TileFlags::OBSTRUCTS_GAS),
        TileMechFlags::empty(), prio:10,
        fire:FireType::None, promote:PromoteType::None, promote_chance:0, ignite_chance:0,
        glow:None, desc:"wall", flavor:"A solid stone wall."),
    tile!("lever_wall", TileFlags::OBSTRUCTS_PASSABILITY.union(TileFlags::OBSTRUCTS_DIAGONAL),
        TileMechFlags::IS_WIRED, prio:10,
        fire:FireType::None, promote:PromoteType::OnActivation, promote_chance:100, ignite_chance:0,
        glow:None, desc:"lever-wall", flavor:"Concealed machinery lurks behind this wall."),
    tile!("dry_grass", TileFlags::IS_FLAMMABLE, TileMechFlags::empty(), prio:1,
        fire:FireType::Burns, promote:PromoteType::OnIgnite, promote_chance:0, ignite_chance:10,
        glow:None, desc:"dry grass", flavor:"Dead grass crunches underfoot."),
    tile!("chasm_edge", TileFlags::AUTO_DESCENT, TileMechFlags::empty(), prio:2,
        fire:FireType::None, promote:PromoteType::None, promote_chance:0, ignite_chance:0,
        glow:None, desc:"chasm edge", flavor:"The floor drops away into darkness."),
    tile!("secret_door", TileFlags::OBSTRUCTS_PASSABILITY.union(TileFlags::IS_SECRET_DOOR),
        TileMechFlags::empty(), prio:10,
        fire:FireType::None, promote:PromoteType::None, promote_chance:0, ignite_chance:0,
        glow:None, desc:"wall", flavor:"Nothing unusual here, or so it seems."),
    tile!("circuit_breaker",
        TileFlags::empty(),
        TileMechFlags::IS_CIRCUIT_BREAKER.union(TileMechFlags::IS_WIRED).union(TileMechFlags::VANISHES_UPON_PROMOTION),
        prio:5,
        fire:FireType::None, promote:PromoteType::OnActivation, promote_chance:100, ignite_chance:0,
        glow:None, desc:"circuit breaker", flavor:"A fuse box, ready to cut power to the circuit."),
];

pub fn tile_info(id: &TileTypeId) -> Option<&'static TileTypeInfo> {
    TILE_CATALOG.iter().find(|t| &t.id == id)
}
