//! Item generation probability tables, including the metered-item
//! protocol: scroll and potion frequencies are cloned per level and
//! depleted as the level's population is rolled, while the `&'static`
//! baseline tables here are never mutated (spec §4.D, §4.E step 5).

use dg_types::ItemCategoryMask;

/// One weighted slot in the 13-category item-generation vector (spec
/// §4.D "item-generation probability vector over 13 category slots").
pub struct CategoryWeight {
    pub category: ItemCategoryMask,
    pub weight: i32,
}

pub static ITEM_CATEGORY_WEIGHTS: &[CategoryWeight] = &[
    CategoryWeight { category: ItemCategoryMask::FOOD, weight: 18 },
    CategoryWeight { category: ItemCategoryMask::WEAPON, weight: 12 },
    CategoryWeight { category: ItemCategoryMask::ARMOR, weight: 10 },
    CategoryWeight { category: ItemCategoryMask::SCROLL, weight: 15 },
    CategoryWeight { category: ItemCategoryMask::POTION, weight: 20 },
    CategoryWeight { category: ItemCategoryMask::STAFF, weight: 5 },
    CategoryWeight { category: ItemCategoryMask::WAND, weight: 3 },
    CategoryWeight { category: ItemCategoryMask::GEM, weight: 2 },
    CategoryWeight { category: ItemCategoryMask::RING, weight: 5 },
    CategoryWeight { category: ItemCategoryMask::CHARM, weight: 5 },
    CategoryWeight { category: ItemCategoryMask::KEY, weight: 1 },
    CategoryWeight { category: ItemCategoryMask::GOLD, weight: 3 },
    CategoryWeight { category: ItemCategoryMask::AMULET, weight: 1 },
];

pub fn total_weight() -> i32 {
    ITEM_CATEGORY_WEIGHTS.iter().map(|c| c.weight).sum()
}

/// Pick a category from the weighted vector given a roll in
/// `[0, total_weight())`.
pub fn category_for_roll(roll: i32) -> ItemCategoryMask {
    let mut remaining = roll;
    for slot in ITEM_CATEGORY_WEIGHTS {
        if remaining < slot.weight {
            return slot.category;
        }
        remaining -= slot.weight;
    }
    ITEM_CATEGORY_WEIGHTS.last().unwrap().category
}

/// Baseline per-kind frequency for a metered category (scroll/potion).
/// Cloned into a `MeteredFrequencies` at level-generation time; the
/// static table underneath is read-only.
pub static SCROLL_BASE_FREQUENCIES: &[i32] = &[40, 10]; // enchanting, aggravate_monsters
pub static POTION_BASE_FREQUENCIES: &[i32] = &[25, 15]; // life, incineration

/// A per-level working copy of a metered category's frequency vector.
/// Rolling an item of kind `i` decrements `frequencies[i]` by one
/// (floored at zero), so repeat rolls of a rare kind become rarer within
/// a single level without ever touching the `&'static` baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeteredFrequencies {
    frequencies: Vec<i32>,
}

impl MeteredFrequencies {
    pub fn from_baseline(baseline: &'static [i32]) -> Self {
        Self {
            frequencies: baseline.to_vec(),
        }
    }

    pub fn total(&self) -> i32 {
        self.frequencies.iter().sum()
    }

    pub fn kind_for_roll(&self, roll: i32) -> usize {
        let mut remaining = roll;
        for (i, &freq) in self.frequencies.iter().enumerate() {
            if remaining < freq {
                return i;
            }
            remaining -= freq;
        }
        self.frequencies.len() - 1
    }

    pub fn deplete(&mut self, kind: usize) {
        if let Some(f) = self.frequencies.get_mut(kind) {
            *f = (*f - 1).max(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_weights_sum_matches_total_weight() {
        let manual: i32 = ITEM_CATEGORY_WEIGHTS.iter().map(|c| c.weight).sum();
        assert_eq!(manual, total_weight());
    }

    #[test]
    fn category_for_roll_picks_first_slot_on_zero() {
        assert_eq!(category_for_roll(0), ItemCategoryMask::FOOD);
    }

    #[test]
    fn category_for_roll_past_end_falls_back_to_last_slot() {
        assert_eq!(category_for_roll(total_weight() + 100), ItemCategoryMask::AMULET);
    }

    #[test]
    fn metered_frequencies_deplete_without_mutating_baseline() {
        let mut metered = MeteredFrequencies::from_baseline(SCROLL_BASE_FREQUENCIES);
        metered.deplete(0);
        assert_eq!(metered.frequencies[0], SCROLL_BASE_FREQUENCIES[0] - 1);
        assert_eq!(SCROLL_BASE_FREQUENCIES[0], 40);
    }

    #[test]
    fn deplete_floors_at_zero() {
        let mut metered = MeteredFrequencies::from_baseline(&[1]);
        metered.deplete(0);
        metered.deplete(0);
        assert_eq!(metered.frequencies[0], 0);
    }
}
