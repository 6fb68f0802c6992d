//! Per-category item catalogs — food, weapon, armor, staff, ring, potion,
//! scroll, wand, charm, key (spec §4.D "item catalogs").
//!
//! Each catalog is a flat `&'static` table indexed by `ItemKindIndex`
//! (the position in the slice); callers look kinds up by index rather
//! than by name, matching how `Item::category` carries only the index.

use dg_types::DamageRange;

pub struct FoodInfo {
    pub name: &'static str,
    pub nutrition: i32,
}

pub static FOOD_CATALOG: &[FoodInfo] = &[
    FoodInfo {
        name: "mango",
        nutrition: 850,
    },
    FoodInfo {
        name: "ration of food",
        nutrition: 2000,
    },
];

pub struct WeaponInfo {
    pub name: &'static str,
    pub damage: DamageRange,
    pub strength_required: i32,
}

pub static WEAPON_CATALOG: &[WeaponInfo] = &[
    WeaponInfo {
        name: "dagger",
        damage: DamageRange::new(2, 4, 1),
        strength_required: 12,
    },
    WeaponInfo {
        name: "broadsword",
        damage: DamageRange::new(9, 22, 5),
        strength_required: 19,
    },
];

pub struct ArmorInfo {
    pub name: &'static str,
    pub armor_value: i32,
    pub strength_required: i32,
}

pub static ARMOR_CATALOG: &[ArmorInfo] = &[
    ArmorInfo {
        name: "leather armor",
        armor_value: 30,
        strength_required: 12,
    },
    ArmorInfo {
        name: "plate armor",
        armor_value: 110,
        strength_required: 19,
    },
];

pub struct StaffInfo {
    pub name: &'static str,
    pub max_charges: i32,
}

pub static STAFF_CATALOG: &[StaffInfo] = &[
    StaffInfo {
        name: "staff of firebolt",
        max_charges: 2,
    },
    StaffInfo {
        name: "staff of conjuration",
        max_charges: 2,
    },
];

pub struct RingInfo {
    pub name: &'static str,
}

pub static RING_CATALOG: &[RingInfo] = &[
    RingInfo { name: "ring of clairvoyance" },
    RingInfo { name: "ring of regeneration" },
];

pub struct PotionInfo {
    pub name: &'static str,
    pub is_good: bool,
}

pub static POTION_CATALOG: &[PotionInfo] = &[
    PotionInfo {
        name: "potion of life",
        is_good: true,
    },
    PotionInfo {
        name: "potion of incineration",
        is_good: false,
    },
];

pub struct ScrollInfo {
    pub name: &'static str,
    pub is_good: bool,
}

pub static SCROLL_CATALOG: &[ScrollInfo] = &[
    ScrollInfo {
        name: "scroll of enchanting",
        is_good: true,
    },
    ScrollInfo {
        name: "scroll of aggravate monsters",
        is_good: false,
    },
];

pub struct WandInfo {
    pub name: &'static str,
    pub max_charges: i32,
}

pub static WAND_CATALOG: &[WandInfo] = &[WandInfo {
    name: "wand of teleportation",
    max_charges: 2,
}];

pub struct CharmInfo {
    pub name: &'static str,
    pub recharge_delay: i32,
}

pub static CHARM_CATALOG: &[CharmInfo] = &[CharmInfo {
    name: "charm of health",
    recharge_delay: 15000,
}];

pub struct KeyInfo {
    pub name: &'static str,
}

pub static KEY_CATALOG: &[KeyInfo] = &[KeyInfo { name: "door key" }];
