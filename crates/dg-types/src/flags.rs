//! Packed boolean flag words for cells, items, and creatures.
//!
//! Each flag set follows the teacher's `PlayerFlags` pattern: a
//! `bitflags!` struct over an unsigned integer, with hand-rolled
//! `Serialize`/`Deserialize` that (de)serializes the raw bits rather than
//! deriving per-flag fields.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

macro_rules! impl_bits_serde {
    ($name:ident, $repr:ty) => {
        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.bits().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                let bits = <$repr>::deserialize(deserializer)?;
                Ok($name::from_bits_truncate(bits))
            }
        }
    };
}

bitflags! {
    /// Per-cell flag word (spec §3 "Cell (`Pcell`)").
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CellFlags: u32 {
        const DISCOVERED                  = 1 << 0;
        const MAGIC_MAPPED                = 1 << 1;
        const HAS_PLAYER                  = 1 << 2;
        const HAS_MONSTER                 = 1 << 3;
        const HAS_ITEM                    = 1 << 4;
        const HAS_STAIRS                  = 1 << 5;
        const IS_IN_ROOM_MACHINE          = 1 << 6;
        const IS_IN_AREA_MACHINE          = 1 << 7;
        const IS_IN_LOOP                  = 1 << 8;
        const IS_CHOKEPOINT               = 1 << 9;
        const IS_POWERED                  = 1 << 10;
        const PRESSURE_PLATE_DEPRESSED    = 1 << 11;
        const IMPREGNABLE                 = 1 << 12;
        const CAUGHT_FIRE_THIS_TURN       = 1 << 13;
        const STABLE_MEMORY               = 1 << 14;
        const ITEM_DETECTED               = 1 << 15;
        const KNOWN_TO_BE_TRAP_FREE       = 1 << 16;
        const IN_FIELD_OF_VIEW            = 1 << 17;
    }
}
impl_bits_serde!(CellFlags, u32);

bitflags! {
    /// Terrain catalog flags — passability/behavior of a `TileType` entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TileFlags: u32 {
        const OBSTRUCTS_PASSABILITY  = 1 << 0;
        const OBSTRUCTS_DIAGONAL     = 1 << 1;
        const OBSTRUCTS_GAS          = 1 << 2;
        const IS_FIRE                = 1 << 3;
        const IS_FLAMMABLE           = 1 << 4;
        const AUTO_DESCENT           = 1 << 5;
        const ALLOWS_SUBMERGING      = 1 << 6;
        const IS_SECRET_DOOR         = 1 << 7;
    }
}
impl_bits_serde!(TileFlags, u32);

bitflags! {
    /// Terrain catalog "mech" flags — machine/promotion-related behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TileMechFlags: u32 {
        const PROMOTES_WITHOUT_KEY    = 1 << 0;
        const IS_WIRED                = 1 << 1;
        const IS_CIRCUIT_BREAKER      = 1 << 2;
        const VANISHES_UPON_PROMOTION = 1 << 3;
        const PROMOTES_ON_PLAYER_ENTRY = 1 << 4;
    }
}
impl_bits_serde!(TileMechFlags, u32);

bitflags! {
    /// Item flag word (spec §3 "Item").
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u32 {
        const IDENTIFIED          = 1 << 0;
        const CURSED              = 1 << 1;
        const RUNIC                = 1 << 2;
        const RUNIC_IDENTIFIED    = 1 << 3;
        const MAGIC_DETECTED      = 1 << 4;
        const PROTECTED           = 1 << 5;
        const FLAMMABLE           = 1 << 6;
        const ATTACKS_STAGGER     = 1 << 7;
        const ATTACKS_QUICKLY     = 1 << 8;
        const ATTACKS_EXTEND      = 1 << 9;
        const ATTACKS_PENETRATE   = 1 << 10;
        const ATTACKS_ALL_ADJACENT = 1 << 11;
        const LUNGE_ATTACKS       = 1 << 12;
        const PASS_ATTACKS        = 1 << 13;
        const SNEAK_ATTACK_BONUS  = 1 << 14;
        const EQUIPPED            = 1 << 15;
    }
}
impl_bits_serde!(ItemFlags, u32);

bitflags! {
    /// Creature bookkeeping flags (spec §3 "Creature").
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CreatureFlags: u32 {
        const IS_DYING                  = 1 << 0;
        const HAS_DIED                  = 1 << 1;
        const CAPTIVE                   = 1 << 2;
        const SEIZED                    = 1 << 3;
        const SEIZING                   = 1 << 4;
        const IS_DORMANT                = 1 << 5;
        const IS_FALLING                = 1 << 6;
        const ADMINISTRATIVE_DEATH      = 1 << 7;
        const APPROACHING_UPSTAIRS      = 1 << 8;
        const APPROACHING_DOWNSTAIRS    = 1 << 9;
        const PREPLACED                 = 1 << 10;
        const TELEPATHICALLY_REVEALED   = 1 << 11;
        const WILL_FLASH                = 1 << 12;
        const ABSORBING                 = 1 << 13;
    }
}
impl_bits_serde!(CreatureFlags, u32);

bitflags! {
    /// Monster catalog behavior/ability flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MonsterBehaviorFlags: u32 {
        const FLIES                      = 1 << 0;
        const FLITS                      = 1 << 1;
        const IMMOBILE                   = 1 << 2;
        const ATTACKABLE_THRU_WALLS      = 1 << 3;
        const INVULNERABLE               = 1 << 4;
        const GETS_TURN_ON_ACTIVATION    = 1 << 5;
        const INANIMATE                  = 1 << 6;
        const NEVER_SLEEPS               = 1 << 7;
        const FLEES_NEAR_DEATH           = 1 << 8;
        const MAINTAINS_DISTANCE         = 1 << 9;
    }
}
impl_bits_serde!(MonsterBehaviorFlags, u32);

bitflags! {
    /// Horde recipe flags (spec §4.D "Horde entry").
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HordeFlags: u32 {
        const NO_PERIODIC_SPAWN      = 1 << 0;
        const LEADER_CAPTIVE         = 1 << 1;
        const IS_SUMMONED            = 1 << 2;
        const ALLIED_WITH_PLAYER     = 1 << 3;
        const MACHINE_KENNEL         = 1 << 4;
        const MACHINE_BOSS           = 1 << 5;
        const NEVER_OOD              = 1 << 6;
        const MACHINE_WATER_MONSTER  = 1 << 7;
        const MACHINE_STATUE         = 1 << 8;
        const MACHINE_TURRET         = 1 << 9;
        const MACHINE_CAPTIVE        = 1 << 10;
        const MACHINE_THIEF          = 1 << 11;
        const SACRIFICE_TARGET       = 1 << 12;
        const VAMPIRE_FODDER         = 1 << 13;
        const MACHINE_LEGENDARY_ALLY = 1 << 14;
        const MACHINE_GOBLIN_WARREN = 1 << 15;
        const DIES_ON_LEADER_DEATH   = 1 << 16;
        const SUMMONED_AT_DISTANCE   = 1 << 17;
        const MACHINE_MUD            = 1 << 18;
    }
}
impl_bits_serde!(HordeFlags, u32);

bitflags! {
    /// Blueprint (machine) flags (spec §4.E step 6).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BlueprintFlags: u32 {
        const BP_ROOM            = 1 << 0;
        const BP_VESTIBULE       = 1 << 1;
        const BP_REWARD          = 1 << 2;
        const BP_ADOPT_ITEM      = 1 << 3;
        const BP_PURGE_INTERIOR  = 1 << 4;
        const BP_PURGE_LIQUIDS   = 1 << 5;
        const BP_IMPREGNABLE     = 1 << 6;
    }
}
impl_bits_serde!(BlueprintFlags, u32);

bitflags! {
    /// Per-feature candidate-cell flags within a blueprint (spec §7).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MachineFeatureFlags: u32 {
        const MF_BUILD_AT_ORIGIN  = 1 << 0;
        const MF_BUILD_IN_WALLS   = 1 << 1;
        const MF_NEAR_ORIGIN      = 1 << 2;
    }
}
impl_bits_serde!(MachineFeatureFlags, u32);

bitflags! {
    /// Item category bitmask (spec §3 "Item"; a single item has exactly
    /// one bit set, but generation probability tables weight whole sets).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ItemCategoryMask: u32 {
        const FOOD    = 1 << 0;
        const WEAPON  = 1 << 1;
        const ARMOR   = 1 << 2;
        const SCROLL  = 1 << 3;
        const POTION  = 1 << 4;
        const STAFF   = 1 << 5;
        const WAND    = 1 << 6;
        const GEM     = 1 << 7;
        const RING    = 1 << 8;
        const CHARM   = 1 << 9;
        const KEY     = 1 << 10;
        const GOLD    = 1 << 11;
        const AMULET  = 1 << 12;
    }
}
impl_bits_serde!(ItemCategoryMask, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_flags_player_monster_independent() {
        let mut f = CellFlags::empty();
        f.insert(CellFlags::HAS_PLAYER);
        assert!(f.contains(CellFlags::HAS_PLAYER));
        assert!(!f.contains(CellFlags::HAS_MONSTER));
        f.insert(CellFlags::HAS_ITEM);
        // HAS_ITEM may coexist with HAS_MONSTER (spec invariant) — verify
        // the flag set doesn't artificially couple them.
        f.insert(CellFlags::HAS_MONSTER);
        assert!(f.contains(CellFlags::HAS_ITEM) && f.contains(CellFlags::HAS_MONSTER));
    }

    #[test]
    fn bits_serde_round_trips() {
        let f = ItemFlags::CURSED | ItemFlags::RUNIC;
        let json = serde_json::to_string(&f).unwrap();
        let back: ItemFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(f, back);
    }
}
