//! Item model.
//!
//! Per the Design Notes (spec §9 "Dynamic dispatch on item/monster
//! categories"), the source's runtime dispatch on a category tag becomes
//! a tagged union here: each `Category` arm carries the data specific to
//! that kind of item, so an exhaustive `match` on `Category` is checked
//! by the compiler whenever a new category lands.

use serde::{Deserialize, Serialize};

use crate::flags::ItemFlags;
use crate::grid::Pos;
use crate::ids::ArenaId;

/// A lower/upper/clump-factor damage roll, shared by weapons and some
/// monster attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRange {
    pub lower: i32,
    pub upper: i32,
    pub clump_factor: u32,
}

impl DamageRange {
    pub const fn new(lower: i32, upper: i32, clump_factor: u32) -> Self {
        Self {
            lower,
            upper,
            clump_factor,
        }
    }
}

/// Catalog index into a per-category item table (spec §3 "kind index
/// into the category's catalog").
pub type ItemKindIndex = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponData {
    pub kind: ItemKindIndex,
    pub damage: DamageRange,
    pub strength_required: i32,
    pub quiver_number: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorData {
    pub kind: ItemKindIndex,
    pub armor_value: i32,
    pub strength_required: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffOrWandData {
    pub kind: ItemKindIndex,
    pub charges: i32,
    pub max_charges: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharmData {
    pub kind: ItemKindIndex,
    pub recharge_delay: i32,
    pub ticks_until_recharged: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingData {
    pub kind: ItemKindIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyData {
    /// The machine number this key opens, or `None` for a generic key.
    pub machine_number: Option<u32>,
}

/// Tagged item category. One arm per category named in spec §3, each
/// carrying the fields that only make sense for that category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Food { kind: ItemKindIndex },
    Weapon(WeaponData),
    Armor(ArmorData),
    Scroll { kind: ItemKindIndex },
    Potion { kind: ItemKindIndex },
    Staff(StaffOrWandData),
    Wand(StaffOrWandData),
    Gem { kind: ItemKindIndex },
    Ring(RingData),
    Charm(CharmData),
    Key(KeyData),
    Gold { amount: i32 },
    Amulet,
}

impl Category {
    pub fn kind_index(&self) -> Option<ItemKindIndex> {
        match self {
            Category::Food { kind }
            | Category::Scroll { kind }
            | Category::Potion { kind }
            | Category::Gem { kind } => Some(*kind),
            Category::Weapon(w) => Some(w.kind),
            Category::Armor(a) => Some(a.kind),
            Category::Staff(s) | Category::Wand(s) => Some(s.kind),
            Category::Ring(r) => Some(r.kind),
            Category::Charm(c) => Some(c.kind),
            Category::Key(_) | Category::Gold { .. } | Category::Amulet => None,
        }
    }
}

/// Where an item currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemLocation {
    /// On the floor of a level, at this position.
    Floor(Pos),
    /// In a player's pack, at this inventory letter ('a'..='z').
    Pack(char),
    /// Equipped (weapon/armor/ring slot); still "in the pack" for
    /// ownership purposes but flagged `EQUIPPED`.
    Equipped(char),
    /// Carried by a creature that is not the player (e.g. a monster that
    /// picked something up), by arena id.
    CarriedBy(ArenaId),
}

/// A single item instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub category: Category,
    pub flags: ItemFlags,
    /// Positive magnitude of enchantment; cursed items have `enchant1 <= 0`,
    /// positively enchanted items have `enchant1 > 0` (spec §3 invariant).
    pub enchant1: i32,
    /// Secondary enchant slot: selects a runic variant for runic items,
    /// or is otherwise a secondary kind index.
    pub enchant2: i32,
    pub location: ItemLocation,
    pub origin_depth: u32,
    pub spawn_turn_number: u64,
}

impl Item {
    pub fn is_cursed(&self) -> bool {
        self.enchant1 <= 0 && self.flags.contains(ItemFlags::IDENTIFIED)
    }

    pub fn is_positively_enchanted(&self) -> bool {
        self.enchant1 > 0
    }

    pub fn category_mask_bit(&self) -> u32 {
        match self.category {
            Category::Food { .. } => 1 << 0,
            Category::Weapon(_) => 1 << 1,
            Category::Armor(_) => 1 << 2,
            Category::Scroll { .. } => 1 << 3,
            Category::Potion { .. } => 1 << 4,
            Category::Staff(_) => 1 << 5,
            Category::Wand(_) => 1 << 6,
            Category::Gem { .. } => 1 << 7,
            Category::Ring(_) => 1 << 8,
            Category::Charm(_) => 1 << 9,
            Category::Key(_) => 1 << 10,
            Category::Gold { .. } => 1 << 11,
            Category::Amulet => 1 << 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item(enchant1: i32, identified: bool) -> Item {
        let mut flags = ItemFlags::empty();
        if identified {
            flags.insert(ItemFlags::IDENTIFIED);
        }
        Item {
            category: Category::Weapon(WeaponData {
                kind: 0,
                damage: DamageRange::new(2, 4, 1),
                strength_required: 12,
                quiver_number: None,
            }),
            flags,
            enchant1,
            enchant2: 0,
            location: ItemLocation::Floor(Pos::new(1, 1)),
            origin_depth: 1,
            spawn_turn_number: 0,
        }
    }

    #[test]
    fn cursed_requires_nonpositive_enchant_and_identification() {
        let cursed = sample_item(-1, true);
        assert!(cursed.is_cursed());
        let unidentified = sample_item(-1, false);
        // Not flagged cursed in play until identified, matching the
        // "cursed implies enchant1 <= 0" invariant direction only.
        assert!(!unidentified.is_cursed());
    }

    #[test]
    fn positive_enchant_is_not_cursed() {
        let blessed = sample_item(2, true);
        assert!(!blessed.is_cursed());
        assert!(blessed.is_positively_enchanted());
    }

    #[test]
    fn category_mask_bit_is_single_bit() {
        let item = sample_item(0, true);
        assert_eq!(item.category_mask_bit().count_ones(), 1);
    }
}
