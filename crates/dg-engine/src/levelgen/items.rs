//! Item population (spec §4.E step 7): the heat map, metered
//! scroll/potion frequencies, the food schedule, gold self-correction,
//! and the post-amulet lumenstone/gem substitution.

use dg_data::item_gen::{self, MeteredFrequencies, POTION_BASE_FREQUENCIES, SCROLL_BASE_FREQUENCIES};
use dg_types::flags::{CellFlags, ItemCategoryMask, ItemFlags, TileFlags};
use dg_types::grid::{Grid, Pos, DCOLS, DROWS};
use dg_types::item::{Category, Item, ItemLocation};
use dg_types::level::Level;
use dg_types::rng::RngState;

use super::topology;

pub const AMULET_LEVEL: u32 = 26;
const LUMENSTONE_DISTRIBUTION: &[i32] = &[2, 2, 1, 1, 1];

/// Per-level bookkeeping threaded through the whole population pass:
/// the metered scroll/potion tables (each level gets its own clone of
/// the baseline frequencies) and the running food/gold totals that feed
/// the self-correction math.
pub struct ItemPopulationState {
    scrolls: MeteredFrequencies,
    potions: MeteredFrequencies,
    food_spawned: i32,
}

impl ItemPopulationState {
    pub fn new() -> Self {
        Self {
            scrolls: MeteredFrequencies::from_baseline(SCROLL_BASE_FREQUENCIES),
            potions: MeteredFrequencies::from_baseline(POTION_BASE_FREQUENCIES),
            food_spawned: 0,
        }
    }
}

impl Default for ItemPopulationState {
    fn default() -> Self {
        Self::new()
    }
}

/// `3 + geometric(60%)` plus an early-level bonus, pre-amulet; past the
/// amulet depth, a fixed lumenstone count per the distribution table.
pub fn number_of_items(depth: u32, rng: &mut RngState, extra_items_per_level: i32) -> i32 {
    if depth > AMULET_LEVEL {
        let idx = (depth - AMULET_LEVEL - 1) as usize;
        return LUMENSTONE_DISTRIBUTION.get(idx).copied().unwrap_or(1);
    }
    let mut n = 3;
    while rng.rand_percent(60) {
        n += 1;
    }
    if depth <= 2 {
        n += 2;
    } else if depth <= 4 {
        n += 1;
    }
    n + extra_items_per_level
}

fn aggregate_gold_lower_bound(d: f64) -> f64 {
    d.powf(3.05) + 320.0 * d
}

fn aggregate_gold_upper_bound(d: f64) -> f64 {
    d.powf(3.05) + 420.0 * d
}

/// `min(5, depth*accel/4)` plus a decaying-chance extension, capped at 10
/// piles.
pub fn number_of_gold_piles(depth: u32, accel: f64, rng: &mut RngState) -> i32 {
    let base = (5i32).min(((depth as f64) * accel / 4.0) as i32).max(0);
    let mut piles = base;
    let mut chance = 60;
    while chance > 0 && piles < 10 && rng.rand_percent(chance) {
        piles += 1;
        chance -= 15;
    }
    piles
}

/// Self-correct one pile's amount so the running total over the level
/// stays within `[aggregateGoldLowerBound, aggregateGoldUpperBound]`,
/// biasing each remaining pile toward the midpoint of what's left.
pub fn gold_pile_amount(depth: u32, accel: f64, pile_index: i32, piles: i32, running_total: i64, rng: &mut RngState) -> i32 {
    let d = (depth as f64) * accel - 1.0;
    let lower = aggregate_gold_lower_bound(d.max(0.0));
    let upper = aggregate_gold_upper_bound(d.max(0.0));
    let target_total = (lower + upper) / 2.0;
    let remaining_piles = (piles - pile_index).max(1) as f64;
    let base_share = ((target_total - running_total as f64) / remaining_piles).max(1.0);
    let jitter = rng.rand_range(0, 4) as i64 - 2;
    (base_share as i64 + jitter).max(1) as i32
}

/// `foodLeft <= foodNeeded` forces the next item to FOOD.
pub fn food_schedule_forces_food(depth: u32, food_spawned: i32, ration_power: i32, rng: &mut RngState) -> bool {
    const FP_FACTOR: i32 = 1;
    let food_left = (food_spawned + ration_power / 3) * 4 * FP_FACTOR;
    let pow_food = 10 + depth as i32 * 2;
    let random_offset = rng.rand_range(0, 9) as i32;
    let food_needed = (pow_food + random_offset * FP_FACTOR) * ration_power * 45 / 100;
    food_left <= food_needed
}

/// Build the placement heat map: cells in a wall, loop, chokepoint, or
/// machine are zeroed, everything else starts at 50000 and is
/// flood-filled outward from the upstairs, costing +10 per door crossed
/// and +3000 per secret door. Islands the flood never reaches are
/// zeroed too, since they behave like walls for placement purposes.
pub fn build_heat_map(level: &Level, upstairs: Pos) -> Grid {
    let mut heat = Grid::alloc(50000);
    for y in 0..DROWS as i32 {
        for x in 0..DCOLS as i32 {
            let pos = Pos::new(x, y);
            let cell = level.cell(pos);
            let blocked = cell.dungeon.is_none()
                || cell.flags.contains(CellFlags::IS_IN_LOOP)
                || cell.flags.contains(CellFlags::IS_CHOKEPOINT)
                || cell.flags.contains(CellFlags::IS_IN_ROOM_MACHINE)
                || cell.flags.contains(CellFlags::IS_IN_AREA_MACHINE)
                || topology::passable_arc_count(level, pos) > 1;
            if blocked {
                heat.set(pos, 0);
            }
        }
    }

    let mut visited = Grid::alloc(0);
    let mut frontier = vec![(upstairs, 50000i32)];
    visited.set(upstairs, 1);
    while let Some((pos, value)) = frontier.pop() {
        if heat.get(pos) != 0 {
            heat.set(pos, value);
        }
        for n in pos.neighbors4() {
            if !n.in_bounds() || visited.get(n) == 1 || level.cell(n).dungeon.is_none() {
                continue;
            }
            visited.set(n, 1);
            let is_secret = level
                .cell(n)
                .dungeon
                .as_ref()
                .and_then(dg_data::tile::tile_info)
                .map(|t| t.flags.contains(TileFlags::IS_SECRET_DOOR))
                .unwrap_or(false);
            let delta = if is_secret { 3000 } else { 10 };
            frontier.push((n, (value - delta).max(0)));
        }
    }

    for y in 0..DROWS as i32 {
        for x in 0..DCOLS as i32 {
            let pos = Pos::new(x, y);
            if heat.get(pos) == 50000 && visited.get(pos) == 0 {
                heat.set(pos, 0);
            }
        }
    }
    heat
}

/// Pick a location weighted by heat, then cool the 11x11 neighborhood
/// around it: cells sharing the chosen value are divided by ten (floor
/// 1), the chosen cell itself drops to zero.
pub fn pick_and_cool(heat: &mut Grid, rng: &mut RngState) -> Option<Pos> {
    let total = heat.sum();
    if total <= 0 {
        return None;
    }
    let mut remaining = rng.rand_range(1, total);
    let mut chosen = None;
    'scan: for y in 0..DROWS as i32 {
        for x in 0..DCOLS as i32 {
            let pos = Pos::new(x, y);
            let v = heat.get(pos) as i64;
            if v <= 0 {
                continue;
            }
            if remaining <= v {
                chosen = Some(pos);
                break 'scan;
            }
            remaining -= v;
        }
    }
    let pos = chosen?;
    let chosen_value = heat.get(pos);
    for dy in -5..=5 {
        for dx in -5..=5 {
            let n = Pos::new(pos.x + dx, pos.y + dy);
            if n.in_bounds() && heat.get(n) == chosen_value {
                heat.set(n, (heat.get(n) / 10).max(1));
            }
        }
    }
    heat.set(pos, 0);
    Some(pos)
}

fn roll_category(rng: &mut RngState) -> ItemCategoryMask {
    let roll = rng.rand_range(0, (item_gen::total_weight() - 1) as i64) as i32;
    item_gen::category_for_roll(roll)
}

fn random_floor_cell(level: &mut Level) -> Option<Pos> {
    let candidates: Vec<Pos> = (0..DROWS as i32)
        .flat_map(|y| (0..DCOLS as i32).map(move |x| Pos::new(x, y)))
        .filter(|&p| {
            let c = level.cell(p);
            c.dungeon.is_some() && !c.flags.contains(CellFlags::HAS_ITEM) && !c.flags.contains(CellFlags::HAS_STAIRS)
        })
        .collect();
    let idx = level.rng.random_index(candidates.len())?;
    Some(candidates[idx])
}

fn instantiate_item(rng: &mut RngState, category_mask: ItemCategoryMask, depth: u32, pos: Pos) -> Item {
    use dg_data::item_catalog::*;
    let pick = |len: usize, rng: &mut RngState| rng.random_index(len).unwrap_or(0) as u16;

    let category = if category_mask == ItemCategoryMask::FOOD {
        Category::Food { kind: pick(FOOD_CATALOG.len(), rng) }
    } else if category_mask == ItemCategoryMask::WEAPON {
        let i = pick(WEAPON_CATALOG.len(), rng) as usize;
        let w = &WEAPON_CATALOG[i];
        Category::Weapon(dg_types::item::WeaponData {
            kind: i as u16,
            damage: w.damage,
            strength_required: w.strength_required,
            quiver_number: None,
        })
    } else if category_mask == ItemCategoryMask::ARMOR {
        let i = pick(ARMOR_CATALOG.len(), rng) as usize;
        let a = &ARMOR_CATALOG[i];
        Category::Armor(dg_types::item::ArmorData { kind: i as u16, armor_value: a.armor_value, strength_required: a.strength_required })
    } else if category_mask == ItemCategoryMask::SCROLL {
        Category::Scroll { kind: pick(SCROLL_CATALOG.len(), rng) }
    } else if category_mask == ItemCategoryMask::POTION {
        Category::Potion { kind: pick(POTION_CATALOG.len(), rng) }
    } else if category_mask == ItemCategoryMask::STAFF {
        let i = pick(STAFF_CATALOG.len(), rng) as usize;
        let s = &STAFF_CATALOG[i];
        Category::Staff(dg_types::item::StaffOrWandData { kind: i as u16, charges: s.max_charges, max_charges: s.max_charges })
    } else if category_mask == ItemCategoryMask::WAND {
        let i = pick(WAND_CATALOG.len(), rng) as usize;
        let w = &WAND_CATALOG[i];
        Category::Wand(dg_types::item::StaffOrWandData { kind: i as u16, charges: w.max_charges, max_charges: w.max_charges })
    } else if category_mask == ItemCategoryMask::GEM {
        Category::Gem { kind: 0 }
    } else if category_mask == ItemCategoryMask::RING {
        Category::Ring(dg_types::item::RingData { kind: pick(RING_CATALOG.len(), rng) })
    } else if category_mask == ItemCategoryMask::CHARM {
        let i = pick(CHARM_CATALOG.len(), rng) as usize;
        Category::Charm(dg_types::item::CharmData { kind: i as u16, recharge_delay: CHARM_CATALOG[i].recharge_delay, ticks_until_recharged: 0 })
    } else if category_mask == ItemCategoryMask::KEY {
        Category::Key(dg_types::item::KeyData { machine_number: None })
    } else if category_mask == ItemCategoryMask::GOLD {
        Category::Gold { amount: 0 }
    } else {
        Category::Amulet
    };

    Item {
        category,
        flags: ItemFlags::empty(),
        enchant1: 0,
        enchant2: 0,
        location: ItemLocation::Floor(pos),
        origin_depth: depth,
        spawn_turn_number: 0,
    }
}

fn meter_item(state: &mut ItemPopulationState, item: &Item) {
    match &item.category {
        Category::Scroll { kind } => state.scrolls.deplete(*kind as usize),
        Category::Potion { kind } => state.potions.deplete(*kind as usize),
        _ => {}
    }
}

/// Run the whole item-population pass for one level: non-gold items via
/// the heat map (food bypasses it onto any open floor cell, per spec),
/// then gold piles self-corrected against the aggregate bounds.
pub fn populate_items(level: &mut Level, depth: u32, upstairs: Pos) {
    let mut state = ItemPopulationState::new();
    let count = number_of_items(depth, &mut level.rng, 0);
    let mut heat = build_heat_map(level, upstairs);

    for _ in 0..count {
        let force_food = depth <= AMULET_LEVEL && food_schedule_forces_food(depth, state.food_spawned, 45, &mut level.rng);
        let category = if depth > AMULET_LEVEL {
            ItemCategoryMask::GEM
        } else if force_food {
            ItemCategoryMask::FOOD
        } else {
            roll_category(&mut level.rng)
        };

        let pos = if category == ItemCategoryMask::FOOD {
            random_floor_cell(level)
        } else {
            pick_and_cool(&mut heat, &mut level.rng)
        };
        let Some(pos) = pos else { continue };

        let item = instantiate_item(&mut level.rng, category, depth, pos);
        meter_item(&mut state, &item);
        if matches!(item.category, Category::Food { .. }) {
            state.food_spawned += 1;
        }
        level.items.insert(item);
        level.cell_mut(pos).flags.insert(CellFlags::HAS_ITEM);
    }

    if depth <= AMULET_LEVEL {
        let accel = 1.0;
        let piles = number_of_gold_piles(depth, accel, &mut level.rng);
        let mut running = 0i64;
        for p in 0..piles {
            let Some(pos) = random_floor_cell(level) else { break };
            let amount = gold_pile_amount(depth, accel, p, piles, running, &mut level.rng);
            running += amount as i64;
            level.items.insert(Item {
                category: Category::Gold { amount },
                flags: ItemFlags::empty(),
                enchant1: 0,
                enchant2: 0,
                location: ItemLocation::Floor(pos),
                origin_depth: depth,
                spawn_turn_number: 0,
            });
            level.cell_mut(pos).flags.insert(CellFlags::HAS_ITEM);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_types::ids::TileTypeId;

    fn carve_room(level: &mut Level, min: Pos, max: Pos) {
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                level.cell_mut(Pos::new(x, y)).dungeon = Some(TileTypeId::new("floor"));
            }
        }
    }

    #[test]
    fn number_of_items_past_amulet_follows_the_lumenstone_table() {
        let mut rng = RngState::new(1);
        assert_eq!(number_of_items(AMULET_LEVEL + 1, &mut rng, 0), 2);
        assert_eq!(number_of_items(AMULET_LEVEL + 3, &mut rng, 0), 1);
    }

    #[test]
    fn heat_map_zeroes_unreachable_and_carved_but_looped_cells() {
        let mut level = Level::new(1, RngState::new(1));
        carve_room(&mut level, Pos::new(5, 5), Pos::new(10, 8));
        let heat = build_heat_map(&level, Pos::new(5, 5));
        assert_eq!(heat.get(Pos::new(0, 0)), 0);
        assert!(heat.get(Pos::new(6, 6)) > 0);
    }

    #[test]
    fn cooling_zeroes_the_chosen_cell_and_divides_matching_neighbors() {
        let mut heat = Grid::alloc(100);
        let mut rng = RngState::new(3);
        let pos = pick_and_cool(&mut heat, &mut rng).unwrap();
        assert_eq!(heat.get(pos), 0);
        let neighbor = Pos::new(pos.x + 1, pos.y);
        if neighbor.in_bounds() {
            assert_eq!(heat.get(neighbor), 10);
        }
    }

    #[test]
    fn gold_pile_count_is_capped_at_ten() {
        let mut rng = RngState::new(1);
        let piles = number_of_gold_piles(50, 1.0, &mut rng);
        assert!(piles <= 10);
    }
}
