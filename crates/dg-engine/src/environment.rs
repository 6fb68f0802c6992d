//! Environment tick — fire spread, gas diffusion, auto-descent, and tile
//! promotion (spec §4.G `updateEnvironment`).
//!
//! Runs periodically off the scheduler's tick counter, not once per
//! player turn: `environment_update_period` in [`crate::config::GameConfig`]
//! controls the cadence.

use dg_data::tile::{tile_info, FireType, PromoteType};
use dg_types::cell::Layer;
use dg_types::flags::{CellFlags, TileFlags, TileMechFlags};
use dg_types::grid::Pos;
use dg_types::level::Level;

/// One full environment pass: falls, fire, gas, and promotion, in that
/// order, matching the source's step ordering for `updateEnvironment`.
pub fn update_environment(level: &mut Level) {
    monsters_fall(level);
    spread_fire(level);
    diffuse_gas(level);
    promote_ready_tiles(level);
}

/// Creatures standing on an `AUTO_DESCENT` tile (chasm edges collapsing
/// underfoot) drop to the next depth. The actual depth transition is the
/// caller's job; this only flags it via `IS_FALLING` so the scheduler can
/// act on dying-creature removal and `playerMoves` step 13's stairs logic
/// can react on the player's next action.
fn monsters_fall(level: &mut Level) {
    let falling: Vec<_> = level
        .creatures
        .iter()
        .filter(|(_, c)| tile_at(level, c.pos, Layer::Dungeon).map_or(false, |t| t.flags.contains(TileFlags::AUTO_DESCENT)))
        .map(|(id, _)| id)
        .collect();
    for id in falling {
        if let Some(creature) = level.creatures.get_mut(id) {
            creature.flags.insert(dg_types::flags::CreatureFlags::IS_FALLING);
        }
    }
}

fn tile_at(level: &Level, pos: Pos, layer: Layer) -> Option<&'static dg_data::tile::TileTypeInfo> {
    let id = level.cell(pos).layer(layer)?;
    tile_info(id)
}

/// Fire propagation: every cell already on fire exposes its flammable
/// neighbors; each exposure adds to that neighbor's `caught_fire_this_turn`
/// odds via the tile's `chance_to_ignite`, rolled once the neighbor has
/// been exposed (spec §4.G `exposeTileToFire`).
fn spread_fire(level: &mut Level) {
    let burning: Vec<Pos> = (0..dg_types::grid::DROWS as i32)
        .flat_map(|y| (0..dg_types::grid::DCOLS as i32).map(move |x| Pos::new(x, y)))
        .filter(|&p| {
            tile_at(level, p, Layer::Dungeon)
                .map(|t| t.fire_type != FireType::None && level.cell(p).flags.contains(CellFlags::CAUGHT_FIRE_THIS_TURN))
                .unwrap_or(false)
        })
        .collect();

    for pos in burning {
        for n in pos.neighbors8() {
            if !n.in_bounds() {
                continue;
            }
            let Some(tile) = tile_at(level, n, Layer::Surface).or_else(|| tile_at(level, n, Layer::Dungeon)) else {
                continue;
            };
            if !tile.flags.contains(TileFlags::IS_FLAMMABLE) {
                continue;
            }
            if level.rng.rand_percent(tile.chance_to_ignite) {
                level.cell_mut(n).flags.insert(CellFlags::CAUGHT_FIRE_THIS_TURN);
            }
        }
    }
}

/// Volumetric gas diffusion. Each cell's gas volume spreads a fraction to
/// its passable, non-gas-obstructing neighbors; fractional spread is
/// rounded stochastically via the level RNG so volume isn't silently lost
/// to integer truncation over many ticks (spec §4.G gas diffusion).
fn diffuse_gas(level: &mut Level) {
    let mut deltas: Vec<(Pos, i16)> = Vec::new();
    for y in 0..dg_types::grid::DROWS as i32 {
        for x in 0..dg_types::grid::DCOLS as i32 {
            let pos = Pos::new(x, y);
            let volume = level.cell(pos).volume;
            if volume == 0 {
                continue;
            }
            let passable_neighbors: Vec<Pos> = pos
                .neighbors8()
                .into_iter()
                .filter(|&n| {
                    n.in_bounds()
                        && tile_at(level, n, Layer::Dungeon)
                            .map(|t| !t.flags.contains(TileFlags::OBSTRUCTS_GAS))
                            .unwrap_or(true)
                })
                .collect();
            if passable_neighbors.is_empty() {
                continue;
            }
            let share = volume as u32 / 8;
            let remainder = volume as u32 % 8;
            for (i, &n) in passable_neighbors.iter().enumerate() {
                let mut amount = share;
                if (i as u32) < remainder && level.rng.rand_percent(50) {
                    amount += 1;
                }
                if amount > 0 {
                    deltas.push((n, amount as i16));
                    deltas.push((pos, -(amount as i16)));
                }
            }
        }
    }
    for (pos, delta) in deltas {
        let cell = level.cell_mut(pos);
        cell.volume = (cell.volume as i16 + delta).clamp(0, 255) as u8;
    }
}

/// Any cell whose surface/dungeon layer is due to promote (caught fire,
/// or an un-keyed promotion-without-key tile whose roll hit) flips to its
/// successor tile. Which tile a promotion targets is catalog data outside
/// this crate's scope; this drives the roll and the generic "promotion is
/// due" signal that the levelgen/machine layer consumes.
fn promote_ready_tiles(level: &mut Level) {
    for y in 0..dg_types::grid::DROWS as i32 {
        for x in 0..dg_types::grid::DCOLS as i32 {
            let pos = Pos::new(x, y);
            for layer in [Layer::Dungeon, Layer::Surface] {
                let Some(id) = level.cell(pos).layer(layer).copied() else {
                    continue;
                };
                let Some(info) = tile_info(&id) else { continue };
                let due = match info.promote_type {
                    PromoteType::None => false,
                    PromoteType::OnActivation => false, // driven by activate_machine, not the tick
                    PromoteType::OnIgnite => level.cell(pos).flags.contains(CellFlags::CAUGHT_FIRE_THIS_TURN),
                };
                if due && level.rng.rand_percent(info.promote_chance) {
                    promote_tile(level, pos, layer);
                }
            }
        }
    }
}

/// Clear a layer after its promotion has been resolved by the caller (the
/// successor tile id is catalog-driven and assigned by levelgen/machine
/// code; this just performs the generic "this tile is gone" half).
pub fn promote_tile(level: &mut Level, pos: Pos, layer: Layer) {
    let mech = level
        .cell(pos)
        .layer(layer)
        .and_then(tile_info)
        .map(|t| t.mech_flags)
        .unwrap_or(TileMechFlags::empty());
    if mech.contains(TileMechFlags::VANISHES_UPON_PROMOTION) {
        level.cell_mut(pos).set_layer(layer, None);
    }
    level.cell_mut(pos).flags.remove(CellFlags::CAUGHT_FIRE_THIS_TURN);
}

/// Power a machine's wired tiles (spec §4.G `activateMachine`). Every cell
/// belonging to machine `n` with `IS_WIRED` promotes immediately, regardless
/// of its own ignite/activation roll; a cell whose tile is a circuit
/// breaker cuts the circuit at that cell instead of promoting, and any
/// machine monster flagged `GETS_TURN_ON_ACTIVATION` acts immediately.
/// `IS_POWERED` is momentary — cleared again once every target has been
/// visited, since it only exists to let `promote_tile` and its callers see
/// which cell caused the current promotion.
pub fn activate_machine(level: &mut Level, machine_number: u32) {
    let targets: Vec<Pos> = (0..dg_types::grid::DROWS as i32)
        .flat_map(|y| (0..dg_types::grid::DCOLS as i32).map(move |x| Pos::new(x, y)))
        .filter(|&p| level.cell(p).machine_number == machine_number)
        .collect();
    for pos in &targets {
        let pos = *pos;
        let mech = tile_at(level, pos, Layer::Dungeon).map(|t| t.mech_flags).unwrap_or(TileMechFlags::empty());
        if mech.contains(TileMechFlags::IS_CIRCUIT_BREAKER) {
            continue;
        }
        level.cell_mut(pos).flags.insert(CellFlags::IS_POWERED);
        if mech.contains(TileMechFlags::IS_WIRED) {
            promote_tile(level, pos, Layer::Dungeon);
        }
        if let Some((creature_id, behavior)) = level.creature_at(pos).map(|(id, c)| (id, c.behavior)) {
            if behavior.contains(dg_types::flags::MonsterBehaviorFlags::GETS_TURN_ON_ACTIVATION) {
                if let Some(c) = level.creatures.get_mut(creature_id) {
                    c.next_turn = 0;
                }
            }
        }
    }
    for pos in targets {
        level.cell_mut(pos).flags.remove(CellFlags::IS_POWERED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_types::ids::TileTypeId;
    use dg_types::rng::RngState;

    #[test]
    fn auto_descent_tile_flags_occupant_as_falling() {
        let mut level = Level::new(1, RngState::new(1));
        let pos = Pos::new(5, 5);
        level.cell_mut(pos).dungeon = Some(TileTypeId::new("chasm_edge"));
        let id = level.creatures.insert(dg_types::creature::Creature {
            is_player: true,
            monster_type: None,
            pos,
            stats: dg_types::creature::Stats {
                hp: 10,
                max_hp: 10,
                accuracy: 0,
                defense: 0,
                regen_rate: 0,
            },
            state: dg_types::creature::CreatureState::Wandering,
            flags: dg_types::flags::CreatureFlags::empty(),
            behavior: dg_types::flags::MonsterBehaviorFlags::empty(),
            statuses: Vec::new(),
            leader: None,
            vorpal_enemy: None,
            next_turn: 0,
            ticks_per_turn: 100,
        });
        monsters_fall(&mut level);
        assert!(level
            .creatures
            .get(id)
            .unwrap()
            .flags
            .contains(dg_types::flags::CreatureFlags::IS_FALLING));
    }

    #[test]
    fn gas_diffusion_conserves_total_volume_within_rounding() {
        let mut level = Level::new(1, RngState::new(7));
        level.cell_mut(Pos::new(10, 10)).volume = 80;
        let before: i64 = level.cells.iter().map(|c| c.volume as i64).sum();
        diffuse_gas(&mut level);
        let after: i64 = level.cells.iter().map(|c| c.volume as i64).sum();
        assert_eq!(before, after);
    }

    #[test]
    fn activate_machine_touches_only_its_own_cells_and_clears_power_after() {
        let mut level = Level::new(1, RngState::new(1));
        level.cell_mut(Pos::new(2, 2)).machine_number = 3;
        level.cell_mut(Pos::new(2, 2)).dungeon = Some(TileTypeId::new("lever_wall"));
        level.cell_mut(Pos::new(3, 3)).machine_number = 4;
        activate_machine(&mut level, 3);
        // IS_POWERED is momentary: the promotion it triggers has already
        // happened, so it's cleared again before activate_machine returns.
        assert!(!level.cell(Pos::new(2, 2)).flags.contains(CellFlags::IS_POWERED));
        assert!(!level.cell(Pos::new(3, 3)).flags.contains(CellFlags::IS_POWERED));
    }

    #[test]
    fn activate_machine_skips_circuit_breaker_cells() {
        let mut level = Level::new(1, RngState::new(1));
        let pos = Pos::new(2, 2);
        level.cell_mut(pos).machine_number = 3;
        level.cell_mut(pos).dungeon = Some(TileTypeId::new("circuit_breaker"));
        activate_machine(&mut level, 3);
        assert!(!level.cell(pos).flags.contains(CellFlags::IS_POWERED));
        // a breaker never promotes even though it's wired and would
        // otherwise vanish on promotion — the guard short-circuits it
        // before `promote_tile` ever runs.
        assert!(level.cell(pos).dungeon.is_some());
    }

    #[test]
    fn activate_machine_grants_a_turn_to_flagged_machine_monsters() {
        let mut level = Level::new(1, RngState::new(1));
        let pos = Pos::new(2, 2);
        level.cell_mut(pos).machine_number = 3;
        let id = level.creatures.insert(dg_types::creature::Creature {
            is_player: false,
            monster_type: None,
            pos,
            stats: dg_types::creature::Stats { hp: 10, max_hp: 10, accuracy: 0, defense: 0, regen_rate: 0 },
            state: dg_types::creature::CreatureState::Dormant,
            flags: dg_types::flags::CreatureFlags::empty(),
            behavior: dg_types::flags::MonsterBehaviorFlags::GETS_TURN_ON_ACTIVATION,
            statuses: Vec::new(),
            leader: None,
            vorpal_enemy: None,
            next_turn: 9999,
            ticks_per_turn: 100,
        });
        activate_machine(&mut level, 3);
        assert_eq!(level.creatures.get(id).unwrap().next_turn, 0);
    }
}
