//! Monster and monster-class catalogs — per-`MonsterTypeId` info structs
//! and their class groupings.
//!
//! Catalog *content* is out of scope; this table carries a representative
//! sample of entries sufficient to exercise spawn selection, stat lookup,
//! and class-based filtering end to end.

use dg_types::{DamageRange, MonsterBehaviorFlags, MonsterClassId, MonsterTypeId};

/// Static info for one monster type — the baseline the engine reads when
/// instantiating a `Creature` of this type (spec §4.D "monster catalog").
pub struct MonsterInfo {
    pub id: MonsterTypeId,
    pub class: MonsterClassId,
    pub max_hp: i32,
    pub accuracy: i32,
    pub defense: i32,
    pub attack: DamageRange,
    pub movement_duration: u32,
    pub attack_duration: u32,
    pub behavior: MonsterBehaviorFlags,
    /// Minimum dungeon depth this type is eligible to spawn at.
    pub min_depth: u32,
}

macro_rules! monster {
    ($id:expr, $class:expr, hp:$hp:expr, acc:$acc:expr, def:$def:expr,
     atk:($lo:expr, $hi:expr, $clump:expr), move_dur:$md:expr, atk_dur:$ad:expr,
     behavior:$b:expr, min_depth:$depth:expr) => {
        MonsterInfo {
            id: MonsterTypeId::new($id),
            class: MonsterClassId::new($class),
            max_hp: $hp,
            accuracy: $acc,
            defense: $def,
            attack: DamageRange::new($lo, $hi, $clump),
            movement_duration: $md,
            attack_duration: $ad,
            behavior: $b,
            min_depth: $depth,
        }
    };
}

pub static MONSTER_CATALOG: &[MonsterInfo] = &[
    monster!("rat", "vermin", hp:6, acc:50, def:0, atk:(1,2,1), move_dur:100, atk_dur:100,
        behavior: MonsterBehaviorFlags::empty(), min_depth: 1),
    monster!("jackal", "vermin", hp:8, acc:60, def:0, atk:(2,4,1), move_dur:50, atk_dur:100,
        behavior: MonsterBehaviorFlags::empty(), min_depth: 1),
    monster!("eel", "aquatic", hp:18, acc:70, def:0, atk:(3,9,2), move_dur:100, atk_dur:100,
        behavior: MonsterBehaviorFlags::FLITS, min_depth: 2),
    monster!("goblin", "goblinoid", hp:15, acc:70, def:10, atk:(3,8,1), move_dur:100, atk_dur:100,
        behavior: MonsterBehaviorFlags::empty(), min_depth: 3),
    monster!("goblin_conjurer", "goblinoid", hp:10, acc:70, def:0, atk:(2,4,1), move_dur:100, atk_dur:100,
        behavior: MonsterBehaviorFlags::GETS_TURN_ON_ACTIVATION, min_depth: 5),
    monster!("pink_jelly", "jelly", hp:50, acc:60, def:0, atk:(1,3,1), move_dur:200, atk_dur:100,
        behavior: MonsterBehaviorFlags::empty(), min_depth: 4),
    monster!("spectral_blade", "spectral", hp:1, acc:85, def:0, atk:(3,5,2), move_dur:100, atk_dur:50,
        behavior: MonsterBehaviorFlags::FLIES, min_depth: 8),
    monster!("dragon", "dragon", hp:300, acc:85, def:35, atk:(15,20,2), move_dur:100, atk_dur:100,
        behavior: MonsterBehaviorFlags::from_bits_truncate(
            MonsterBehaviorFlags::FLIES.bits() | MonsterBehaviorFlags::NEVER_SLEEPS.bits()
        ), min_depth: 24),
];

pub fn monster_info(id: &MonsterTypeId) -> Option<&'static MonsterInfo> {
    MONSTER_CATALOG.iter().find(|m| &m.id == id)
}

pub fn monsters_of_class<'a>(
    class: &'a MonsterClassId,
) -> impl Iterator<Item = &'static MonsterInfo> + 'a {
    MONSTER_CATALOG.iter().filter(move |m| &m.class == class)
}

pub fn monsters_eligible_at_depth(depth: u32) -> impl Iterator<Item = &'static MonsterInfo> {
    MONSTER_CATALOG.iter().filter(move |m| m.min_depth <= depth)
}
